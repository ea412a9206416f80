use crate::data::{Bundle, Record, Scalar};
use crate::error::PerformError;

/// Defines the contract for a data-producing operation.
///
/// Implementations may issue network requests, read earlier field values from
/// `bundle.input_data` to chain dependent dropdowns, and switch into a paging code
/// path when `bundle.meta.prefill` is set. Timeouts and cancellation are theirs to
/// handle; the resolver calls `perform` once and returns whatever it gets.
pub trait Perform: Send + Sync {
    fn perform(&self, bundle: &Bundle) -> Result<Vec<Record>, PerformError>;
}

impl<F> Perform for F
where
    F: Fn(&Bundle) -> Result<Vec<Record>, PerformError> + Send + Sync,
{
    fn perform(&self, bundle: &Bundle) -> Result<Vec<Record>, PerformError> {
        self(bundle)
    }
}

/// A perform routine serving a fixed record set.
///
/// Useful for sample data, offline previews and tests. It can narrow its records by
/// an earlier field value and hand them out page by page during prefill.
#[derive(Debug, Clone, Default)]
pub struct StaticRecords {
    records: Vec<Record>,
    filter: Option<(String, String)>,
    page_size: Option<usize>,
}

impl StaticRecords {
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            filter: None,
            page_size: None,
        }
    }

    /// Keeps only records whose `record_field` equals `inputData[input_key]`.
    /// When the input is absent the filter does not apply.
    pub fn filtered_by(mut self, input_key: &str, record_field: &str) -> Self {
        self.filter = Some((input_key.to_string(), record_field.to_string()));
        self
    }

    /// Serves `page_size` records per page, but only on prefill passes.
    pub fn paged(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    fn matches(&self, record: &Record, bundle: &Bundle) -> bool {
        match &self.filter {
            Some((input_key, record_field)) => match bundle.input(input_key) {
                Some(expected) => record.get(record_field) == Some(expected),
                None => true,
            },
            None => true,
        }
    }

    fn page_bounds(&self, bundle: &Bundle) -> Option<(usize, usize)> {
        if !bundle.meta.prefill {
            return None;
        }
        let size = bundle
            .meta
            .limit
            .map(|l| l as usize)
            .or(self.page_size)?
            .max(1);
        let start = (bundle.meta.page as usize).saturating_mul(size);
        Some((start, size))
    }
}

impl Perform for StaticRecords {
    fn perform(&self, bundle: &Bundle) -> Result<Vec<Record>, PerformError> {
        let matching = self.records.iter().filter(|r| self.matches(r, bundle));
        let records = match self.page_bounds(bundle) {
            Some((start, size)) => matching.skip(start).take(size).cloned().collect(),
            None => matching.cloned().collect(),
        };
        Ok(records)
    }
}

/// Builds a record from `(field, value)` pairs.
pub fn record<const N: usize>(fields: [(&str, Scalar); N]) -> Record {
    fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}
