//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the sentaku crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use sentaku::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let app = AppDefinition::from_file("path/to/app.json")?;
//! let registry = OperationRegistry::builder(app)
//!     .with_perform("project", StaticRecords::default())
//!     .build()?;
//!
//! let bundle = Bundle::prefill().with_input("project_id", 123);
//! let options = DynamicFieldResolver::new(&registry).resolve_raw("project.id.name", &bundle)?;
//! println!("Options: {:?}", options);
//! # Ok(())
//! # }
//! ```

// Registration and resolution
pub use crate::registry::{OperationRegistry, Perform, RegistryBuilder, StaticRecords};
pub use crate::resolver::{DropdownOption, DynamicFieldResolver, OptionList};

// Definitions
pub use crate::app::{
    AppDefinition, FieldSpec, IntoApp, OperationDefinition, ResourceDefinition,
    TriggerDefinition,
};
pub use crate::reference::DynamicReference;

// Runtime data
pub use crate::data::{Bundle, BundleMeta, Record, Scalar};

// Manifest
pub use crate::manifest::ResolutionManifest;

// Error types
pub use crate::error::{
    AppConversionError, ManifestError, PerformError, ReferenceError, RegistryError, ResolveError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
