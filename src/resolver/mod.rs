use crate::data::{Bundle, Record};
use crate::error::ResolveError;
use crate::reference::DynamicReference;
use crate::registry::{CompiledField, Operation, OperationRegistry};
use std::sync::Arc;
use tracing::{debug, warn};

mod options;

pub use options::{to_options, DropdownOption, OptionList};

/// Resolves the options of dynamic dropdown fields against a registry.
///
/// The resolver is stateless: every call stands on its own and nothing is cached
/// between bundles, since earlier field values may change between calls. It only
/// borrows the registry, so any number of resolvers can run on different threads.
#[derive(Clone, Copy)]
pub struct DynamicFieldResolver<'r> {
    registry: &'r OperationRegistry,
}

impl<'r> DynamicFieldResolver<'r> {
    pub fn new(registry: &'r OperationRegistry) -> Self {
        Self { registry }
    }

    /// Parses a raw `dynamic` string. Registered fields are parsed once at build
    /// time; this is for references that arrive from elsewhere.
    pub fn parse_reference(&self, raw: &str) -> Result<DynamicReference, ResolveError> {
        Ok(DynamicReference::parse(raw)?)
    }

    /// Finds the operation a reference names.
    pub fn resolve_source(&self, reference: &DynamicReference) -> Result<&'r Operation, ResolveError> {
        self.registry
            .source(&reference.source)
            .ok_or_else(|| ResolveError::UnknownDynamicSource(reference.source.clone()))
    }

    /// Runs the operation's perform routine with the bundle.
    pub fn invoke(&self, operation: &Operation, bundle: &Bundle) -> Result<Vec<Record>, ResolveError> {
        operation
            .perform_routine()
            .perform(bundle)
            .map_err(|cause| {
                warn!(source = operation.key(), error = %cause, "dynamic source failed");
                ResolveError::SourceOperationFailed {
                    source_key: operation.key().to_string(),
                    cause: Arc::from(cause),
                }
            })
    }

    /// Source lookup, invocation and option mapping in one call.
    pub fn resolve(
        &self,
        reference: &DynamicReference,
        bundle: &Bundle,
    ) -> Result<OptionList, ResolveError> {
        let operation = self.resolve_source(reference)?;
        let records = self.invoke(operation, bundle)?;
        let options = to_options(&records, reference)?;
        debug!(
            reference = %reference,
            prefill = bundle.meta.prefill,
            page = bundle.meta.page,
            options = options.len(),
            "dynamic dropdown resolved"
        );
        Ok(options)
    }

    /// Parses and resolves a raw reference string.
    pub fn resolve_raw(&self, raw: &str, bundle: &Bundle) -> Result<OptionList, ResolveError> {
        let reference = self.parse_reference(raw)?;
        self.resolve(&reference, bundle)
    }

    /// Resolves a registered field through its pre-parsed reference, after checking
    /// that every field it depends on already has a value in the bundle.
    pub fn resolve_field(
        &self,
        operation_key: &str,
        field_key: &str,
        bundle: &Bundle,
    ) -> Result<OptionList, ResolveError> {
        let field = self.compiled_field(operation_key, field_key)?;
        if let Some(dependency) = field.depends_on.iter().find(|d| bundle.input(d).is_none()) {
            return Err(ResolveError::UnsatisfiedDependency {
                field_key: field_key.to_string(),
                dependency: dependency.clone(),
            });
        }
        self.resolve(&field.reference, bundle)
    }

    fn compiled_field(
        &self,
        operation_key: &str,
        field_key: &str,
    ) -> Result<&'r CompiledField, ResolveError> {
        if let Some(field) = self.registry.dynamic_field(operation_key, field_key) {
            return Ok(field);
        }
        match self.registry.input_field(operation_key, field_key) {
            Some(_) => Err(ResolveError::NotDynamic {
                operation_key: operation_key.to_string(),
                field_key: field_key.to_string(),
            }),
            None => Err(ResolveError::UnknownField {
                operation_key: operation_key.to_string(),
                field_key: field_key.to_string(),
            }),
        }
    }
}
