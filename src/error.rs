use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// The error type perform routines report back to the resolver.
pub type PerformError = Box<dyn StdError + Send + Sync>;

/// Errors that can occur while parsing a `dynamic` reference string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReferenceError {
    #[error(
        "Invalid dynamic reference '{raw}': expected '<source>.<valueField>.<labelField>', found {segments} segment(s)"
    )]
    InvalidReferenceFormat { raw: String, segments: usize },

    #[error("Invalid dynamic reference '{raw}': segment {index} is empty")]
    EmptySegment { raw: String, index: usize },
}

/// Errors that can occur while building an `OperationRegistry` from an app definition.
///
/// All of these are configuration errors: they are raised once, at registration,
/// and never at dropdown-render time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Field '{field_key}' of operation '{operation_key}' has a malformed dynamic reference: {cause}")]
    InvalidReference {
        operation_key: String,
        field_key: String,
        cause: ReferenceError,
    },

    #[error(
        "Field '{field_key}' of operation '{operation_key}' references unknown dynamic source '{source_key}'"
    )]
    UnknownDynamicSource {
        operation_key: String,
        field_key: String,
        source_key: String,
    },

    #[error("Dynamic source '{source_key}' is declared more than once: {claimants}")]
    AmbiguousDynamicSource {
        source_key: String,
        claimants: String,
    },

    #[error("No perform routine was registered for dynamic source '{0}'")]
    MissingPerform(String),

    #[error("A perform routine was registered for '{0}', which is neither a trigger nor a resource")]
    OrphanPerform(String),

    #[error("Operation '{operation_key}' declares input field '{field_key}' more than once")]
    DuplicateFieldKey {
        operation_key: String,
        field_key: String,
    },

    #[error(
        "Field '{field_key}' of operation '{operation_key}' depends on '{dependency}', which is not an input field of that operation"
    )]
    UnknownDependency {
        operation_key: String,
        field_key: String,
        dependency: String,
    },

    #[error("Operation '{operation_key}' has a field dependency cycle: {path}")]
    DependencyCycle { operation_key: String, path: String },
}

/// Errors that can occur while resolving the options of a dynamic field.
#[derive(Error, Debug, Clone)]
pub enum ResolveError {
    #[error(transparent)]
    InvalidReference(#[from] ReferenceError),

    #[error("Dynamic source '{0}' is not registered")]
    UnknownDynamicSource(String),

    #[error("Dynamic source '{source_key}' failed to produce records: {cause}")]
    SourceOperationFailed {
        source_key: String,
        cause: Arc<dyn StdError + Send + Sync>,
    },

    #[error("Record {record_index} returned by '{source_key}' has no value for field '{field}'")]
    MissingField {
        source_key: String,
        field: String,
        record_index: usize,
    },

    #[error("Operation '{operation_key}' has no input field '{field_key}'")]
    UnknownField {
        operation_key: String,
        field_key: String,
    },

    #[error("Field '{field_key}' of operation '{operation_key}' is not a dynamic field")]
    NotDynamic {
        operation_key: String,
        field_key: String,
    },

    #[error(
        "Field '{field_key}' depends on '{dependency}', which has no value in the bundle's input data yet"
    )]
    UnsatisfiedDependency {
        field_key: String,
        dependency: String,
    },
}

impl ResolveError {
    /// Whether a user-triggered reload of the dropdown may succeed.
    ///
    /// Only failures of the underlying data fetch qualify; every other variant
    /// points to a definition or data-shape problem that a retry cannot fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ResolveError::SourceOperationFailed { .. })
    }
}

/// Errors that can occur while saving, loading or exporting a `ResolutionManifest`.
#[derive(Error, Debug, Clone)]
pub enum ManifestError {
    #[error("I/O error on manifest file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Manifest serialization failed: {0}")]
    Encode(String),

    #[error("Manifest deserialization failed: {0}")]
    Decode(String),

    #[error("Manifest JSON export failed: {0}")]
    Json(String),
}

/// Errors that can occur when converting a custom user format into a Sentaku `AppDefinition`.
#[derive(Error, Debug, Clone)]
pub enum AppConversionError {
    #[error("Invalid app definition: {0}")]
    ValidationError(String),

    #[error("Failed to parse app definition JSON: {0}")]
    JsonParseError(String),
}
