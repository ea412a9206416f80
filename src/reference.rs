use crate::error::ReferenceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed `dynamic` reference: `"<source>.<valueField>.<labelField>"`.
///
/// `source` is either a trigger key or a resource list alias (`"{resourceKey}List"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DynamicReference {
    pub source: String,
    pub value_field: String,
    pub label_field: String,
}

impl DynamicReference {
    /// Splits a raw reference on `.`. No escaping is defined, so a field name can
    /// never contain a dot.
    pub fn parse(raw: &str) -> Result<Self, ReferenceError> {
        let segments: Vec<&str> = raw.split('.').collect();
        let [source, value_field, label_field] = segments.as_slice() else {
            return Err(ReferenceError::InvalidReferenceFormat {
                raw: raw.to_string(),
                segments: segments.len(),
            });
        };

        if let Some(index) = [source, value_field, label_field]
            .iter()
            .position(|s| s.trim().is_empty())
        {
            return Err(ReferenceError::EmptySegment {
                raw: raw.to_string(),
                index,
            });
        }

        Ok(Self {
            source: source.to_string(),
            value_field: value_field.to_string(),
            label_field: label_field.to_string(),
        })
    }
}

impl FromStr for DynamicReference {
    type Err = ReferenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DynamicReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.source, self.value_field, self.label_field)
    }
}
