//! # Sentaku - Dynamic Dropdown Resolution
//!
//! **Sentaku** resolves the options of *dynamic dropdowns*: input fields of an
//! integration app whose choices are fetched live from another operation of the
//! same app instead of being listed statically.
//!
//! A field opts in with a `dynamic` reference of the form
//! `"<source>.<valueField>.<labelField>"`, where `source` is either a trigger key or
//! the list alias of a resource (`"{resourceKey}List"`).
//!
//! ## Core Workflow
//!
//! 1.  **Describe Your App**: Load an `AppDefinition` from JSON, build it in code, or
//!     implement `IntoApp` for your own format.
//! 2.  **Register**: Use `OperationRegistry::builder` to attach a perform routine to
//!     every trigger and resource, then `build()` it. Every reference is parsed and
//!     resolved here, once; malformed references, unknown or ambiguous sources and
//!     field dependency cycles are rejected before any dropdown is rendered.
//! 3.  **Resolve**: Create a `DynamicFieldResolver` over the registry and ask it for
//!     the options of a field, passing the current `Bundle`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sentaku::prelude::*;
//! use sentaku::registry::perform::record;
//!
//! fn main() -> Result<()> {
//!     let app = AppDefinition::new()
//!         .with_resource(ResourceDefinition::new("project", "Project"))
//!         .with_trigger(
//!             TriggerDefinition::new("new_task", "Task")
//!                 .with_field(FieldSpec::new("project_id", "Project").dynamic("projectList.id.name")),
//!         );
//!
//!     let projects = StaticRecords::new(vec![
//!         record([("id", 123.into()), ("name", "Project 1".into())]),
//!     ]);
//!     let tasks = StaticRecords::new(vec![]);
//!
//!     let registry = OperationRegistry::builder(app)
//!         .with_perform("project", projects)
//!         .with_perform("new_task", tasks)
//!         .build()?;
//!
//!     let resolver = DynamicFieldResolver::new(&registry);
//!     let options = resolver.resolve_field("new_task", "project_id", &Bundle::prefill())?;
//!     for option in &options {
//!         println!("{}", option);
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod data;
pub mod error;
pub mod manifest;
pub mod prelude;
pub mod reference;
pub mod registry;
pub mod resolver;
