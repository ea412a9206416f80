use crate::error::ManifestError;
use crate::registry::{OperationRegistry, SourceEntry, SourceKind};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};

/// A dynamic field as recorded in the manifest.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestField {
    pub operation_key: String,
    pub field_key: String,
    pub reference: String,
    pub source_key: String,
    pub value_field: String,
    pub label_field: String,
    pub source_kind: SourceKind,
    pub depends_on: Vec<String>,
}

/// The input field order of one operation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestOperation {
    pub operation_key: String,
    pub field_order: Vec<String>,
}

/// A callable-free snapshot of a validated registry.
///
/// UI layers use it to learn which fields are dynamic, where their options come
/// from and in which order fields must be filled, without loading the app itself.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ResolutionManifest {
    pub sources: Vec<SourceEntry>,
    pub operations: Vec<ManifestOperation>,
    pub fields: Vec<ManifestField>,
}

impl OperationRegistry {
    /// Snapshots the registry. Every list in the manifest is sorted by key.
    pub fn manifest(&self) -> ResolutionManifest {
        let sources = self.sources().into_iter().cloned().collect();

        let operations = self
            .operation_keys()
            .into_iter()
            .filter_map(|key| {
                self.field_order(key).map(|order| ManifestOperation {
                    operation_key: key.to_string(),
                    field_order: order.to_vec(),
                })
            })
            .collect();

        let fields = self
            .dynamic_fields()
            .into_iter()
            .map(|f| ManifestField {
                operation_key: f.operation_key.clone(),
                field_key: f.field_key.clone(),
                reference: f.reference.to_string(),
                source_key: f.reference.source.clone(),
                value_field: f.reference.value_field.clone(),
                label_field: f.reference.label_field.clone(),
                source_kind: f.source_kind,
                depends_on: f.depends_on.clone(),
            })
            .collect();

        ResolutionManifest {
            sources,
            operations,
            fields,
        }
    }
}

impl ResolutionManifest {
    /// The dynamic fields of one operation, in manifest order.
    pub fn fields_of<'a>(&'a self, operation_key: &'a str) -> impl Iterator<Item = &'a ManifestField> {
        self.fields
            .iter()
            .filter(move |f| f.operation_key == operation_key)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ManifestError> {
        encode_to_vec(self, standard()).map_err(|e| ManifestError::Encode(e.to_string()))
    }

    /// Deserializes a manifest from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ManifestError> {
        decode_from_slice(bytes, standard())
            .map(|(manifest, _)| manifest) // bincode 2 returns a tuple (data, bytes_read)
            .map_err(|e| ManifestError::Decode(e.to_string()))
    }

    /// Saves the manifest to a file using the bincode format.
    pub fn save(&self, path: &str) -> Result<(), ManifestError> {
        let bytes = self.to_bytes()?;
        let mut file = fs::File::create(path).map_err(|e| io_error(path, e))?;
        file.write_all(&bytes).map_err(|e| io_error(path, e))?;
        Ok(())
    }

    /// Loads a manifest from a file.
    pub fn from_file(path: &str) -> Result<Self, ManifestError> {
        let mut file = fs::File::open(path).map_err(|e| io_error(path, e))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).map_err(|e| io_error(path, e))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        serde_json::to_string_pretty(self).map_err(|e| ManifestError::Json(e.to_string()))
    }
}

fn io_error(path: &str, e: std::io::Error) -> ManifestError {
    ManifestError::Io {
        path: path.to_string(),
        message: e.to_string(),
    }
}
