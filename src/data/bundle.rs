use super::value::Scalar;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// Invocation metadata carried alongside the input data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BundleMeta {
    /// `true` when the call populates dropdown options rather than running the operation.
    #[serde(default)]
    pub prefill: bool,
    /// Zero-based page index for sources that page their results during prefill.
    #[serde(default)]
    pub page: u32,
    /// Optional page size hint from the host platform.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Per-invocation execution context handed to perform routines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bundle {
    #[serde(default, alias = "inputData")]
    pub input_data: AHashMap<String, Scalar>,
    #[serde(default)]
    pub meta: BundleMeta,
}

impl Bundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bundle for a dropdown-population pass, starting at the first page.
    pub fn prefill() -> Self {
        Self {
            input_data: AHashMap::new(),
            meta: BundleMeta {
                prefill: true,
                ..BundleMeta::default()
            },
        }
    }

    pub fn with_input(mut self, key: &str, value: impl Into<Scalar>) -> Self {
        self.input_data.insert(key.to_string(), value.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.meta.page = page;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.meta.limit = Some(limit);
        self
    }

    /// The value of a previously filled field, treating `null` as absent.
    pub fn input(&self, key: &str) -> Option<&Scalar> {
        self.input_data.get(key).filter(|v| !v.is_null())
    }

    /// Returns a copy of this bundle pointing at the following page.
    ///
    /// Paging is driven by the caller: every page is its own resolution call.
    pub fn next_page(&self) -> Self {
        let mut next = self.clone();
        next.meta.page = next.meta.page.saturating_add(1);
        next
    }
}
