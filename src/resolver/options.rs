use crate::data::{Record, Scalar};
use crate::error::ResolveError;
use crate::reference::DynamicReference;
use serde::Serialize;
use std::fmt;

/// One selectable entry of a dynamic dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropdownOption {
    pub value: Scalar,
    pub label: String,
}

impl fmt::Display for DropdownOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.value)
    }
}

/// Ordered options, in the order the source returned its records.
pub type OptionList = Vec<DropdownOption>;

/// Maps records into options through the reference's value and label fields.
///
/// A record lacking either field (or holding `null` there) is a data-shape error;
/// it is never skipped or given an empty label.
pub fn to_options(
    records: &[Record],
    reference: &DynamicReference,
) -> Result<OptionList, ResolveError> {
    records
        .iter()
        .enumerate()
        .map(|(record_index, record)| {
            let value = extract(record, &reference.value_field, record_index, reference)?;
            let label = extract(record, &reference.label_field, record_index, reference)?;
            Ok(DropdownOption {
                value: value.clone(),
                label: label.to_string(),
            })
        })
        .collect()
}

fn extract<'r>(
    record: &'r Record,
    field: &str,
    record_index: usize,
    reference: &DynamicReference,
) -> Result<&'r Scalar, ResolveError> {
    record
        .get(field)
        .filter(|v| !v.is_null())
        .ok_or_else(|| ResolveError::MissingField {
            source_key: reference.source.clone(),
            field: field.to_string(),
            record_index,
        })
}
