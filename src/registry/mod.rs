use crate::app::{AppDefinition, FieldSpec, TriggerDefinition};
use crate::error::RegistryError;
use crate::reference::DynamicReference;
use ahash::AHashMap;
use itertools::Itertools;
use std::sync::Arc;
use tracing::debug;

mod dependency;
pub mod perform;
pub mod sources;

use dependency::DependencyGraph;
pub use perform::{Perform, StaticRecords};
pub use sources::{SourceEntry, SourceKind, LIST_ALIAS_SUFFIX};
use sources::SourceTable;

/// A dynamic field whose reference was parsed and resolved at registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledField {
    pub operation_key: String,
    pub field_key: String,
    pub reference: DynamicReference,
    pub source_kind: SourceKind,
    pub depends_on: Vec<String>,
}

/// A registered data-producing operation: the source entry plus its perform routine.
#[derive(Clone)]
pub struct Operation {
    pub entry: SourceEntry,
    perform: Arc<dyn Perform>,
}

impl Operation {
    pub fn key(&self) -> &str {
        &self.entry.source_key
    }

    pub fn perform_routine(&self) -> &dyn Perform {
        self.perform.as_ref()
    }
}

impl std::fmt::Debug for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Operation")
            .field("entry", &self.entry)
            .finish_non_exhaustive()
    }
}

/// The immutable, validated registry of dropdown sources.
///
/// Built once per app by `RegistryBuilder::build`; read-only afterwards and safe to
/// share across threads.
pub struct OperationRegistry {
    app: AppDefinition,
    sources: SourceTable,
    operations: AHashMap<String, Operation>,
    input_fields: AHashMap<String, AHashMap<String, FieldSpec>>,
    dynamic_fields: AHashMap<(String, String), CompiledField>,
    field_order: AHashMap<String, Vec<String>>,
}

/// Collects an app definition and the perform routines for its sources.
pub struct RegistryBuilder {
    app: AppDefinition,
    performs: AHashMap<String, Arc<dyn Perform>>,
}

impl RegistryBuilder {
    pub fn new(app: AppDefinition) -> Self {
        Self {
            app,
            performs: AHashMap::new(),
        }
    }

    /// Registers the perform routine for a trigger key or a resource.
    ///
    /// A resource may be addressed either by its own key or by its list alias. When
    /// a trigger shares the resource's key, only the alias reaches the resource.
    pub fn with_perform(mut self, key: &str, perform: impl Perform + 'static) -> Self {
        self.performs.insert(key.to_string(), Arc::new(perform));
        self
    }

    /// Same as `with_perform`, for routines that are already shared.
    pub fn with_shared_perform(mut self, key: &str, perform: Arc<dyn Perform>) -> Self {
        self.performs.insert(key.to_string(), perform);
        self
    }

    /// Validates the whole app definition and freezes it into a registry.
    pub fn build(self) -> Result<OperationRegistry, RegistryError> {
        let table = SourceTable::build(&self.app)?;
        let operations = self.bind_performs(&table)?;

        let mut input_fields = AHashMap::new();
        let mut dynamic_fields = AHashMap::new();
        let mut field_order = AHashMap::new();

        for (operation_key, operation) in sources::operations(&self.app) {
            let fields = &operation.input_fields;
            check_unique_keys(&operation_key, fields)?;

            for field in fields {
                if let Some(compiled) = compile_field(&operation_key, field, &table)? {
                    dynamic_fields.insert(
                        (operation_key.clone(), field.key.clone()),
                        compiled,
                    );
                }
            }

            let order = DependencyGraph::new(&operation_key, fields).order()?;
            field_order.insert(operation_key.clone(), order);
            input_fields.insert(
                operation_key,
                fields
                    .iter()
                    .map(|f| (f.key.clone(), f.clone()))
                    .collect::<AHashMap<_, _>>(),
            );
        }

        debug!(
            sources = operations.len(),
            dynamic_fields = dynamic_fields.len(),
            "dropdown registry built"
        );

        Ok(OperationRegistry {
            app: self.app,
            sources: table,
            operations,
            input_fields,
            dynamic_fields,
            field_order,
        })
    }

    /// Pairs every source with its perform routine.
    fn bind_performs(
        &self,
        sources: &SourceTable,
    ) -> Result<AHashMap<String, Operation>, RegistryError> {
        if let Some(orphan) = self
            .performs
            .keys()
            .filter(|key| !sources.contains(key) && !self.is_resource_key(key))
            .sorted()
            .next()
        {
            return Err(RegistryError::OrphanPerform(orphan.clone()));
        }

        sources
            .entries()
            .into_iter()
            .map(|entry| {
                let perform = self
                    .performs
                    .get(&entry.source_key)
                    .or_else(|| match entry.kind {
                        // A resource key shared with a trigger belongs to the trigger;
                        // the list operation must then be registered under its alias.
                        SourceKind::ResourceList if !sources.is_trigger(&entry.declared_key) => {
                            self.performs.get(&entry.declared_key)
                        }
                        _ => None,
                    })
                    .cloned()
                    .ok_or_else(|| RegistryError::MissingPerform(entry.source_key.clone()))?;
                Ok((
                    entry.source_key.clone(),
                    Operation {
                        entry: entry.clone(),
                        perform,
                    },
                ))
            })
            .collect()
    }

    fn is_resource_key(&self, key: &str) -> bool {
        self.app
            .resources
            .iter()
            .any(|r| r.key == key && r.list.is_some())
    }
}

fn check_unique_keys(operation_key: &str, fields: &[FieldSpec]) -> Result<(), RegistryError> {
    match fields.iter().map(|f| f.key.as_str()).duplicates().next() {
        Some(dup) => Err(RegistryError::DuplicateFieldKey {
            operation_key: operation_key.to_string(),
            field_key: dup.to_string(),
        }),
        None => Ok(()),
    }
}

/// Parses and resolves a field's `dynamic` reference, if it has one.
fn compile_field(
    operation_key: &str,
    field: &FieldSpec,
    sources: &SourceTable,
) -> Result<Option<CompiledField>, RegistryError> {
    let Some(raw) = &field.dynamic else {
        return Ok(None);
    };

    let reference =
        DynamicReference::parse(raw).map_err(|cause| RegistryError::InvalidReference {
            operation_key: operation_key.to_string(),
            field_key: field.key.clone(),
            cause,
        })?;

    let entry =
        sources
            .get(&reference.source)
            .ok_or_else(|| RegistryError::UnknownDynamicSource {
                operation_key: operation_key.to_string(),
                field_key: field.key.clone(),
                source_key: reference.source.clone(),
            })?;

    Ok(Some(CompiledField {
        operation_key: operation_key.to_string(),
        field_key: field.key.clone(),
        source_kind: entry.kind,
        depends_on: field.depends_on.clone(),
        reference,
    }))
}

impl OperationRegistry {
    pub fn builder(app: AppDefinition) -> RegistryBuilder {
        RegistryBuilder::new(app)
    }

    /// Looks up a source: resource list aliases first, then trigger keys.
    pub fn source(&self, source_key: &str) -> Option<&Operation> {
        let entry = self.sources.get(source_key)?;
        self.operations.get(&entry.source_key)
    }

    /// The pre-parsed reference of a dynamic field.
    pub fn dynamic_field(&self, operation_key: &str, field_key: &str) -> Option<&CompiledField> {
        self.dynamic_fields
            .get(&(operation_key.to_string(), field_key.to_string()))
    }

    /// The declared input field of an operation, dynamic or not.
    pub fn input_field(&self, operation_key: &str, field_key: &str) -> Option<&FieldSpec> {
        self.input_fields.get(operation_key)?.get(field_key)
    }

    /// An operation's input field keys, each after the fields it depends on.
    pub fn field_order(&self, operation_key: &str) -> Option<&[String]> {
        self.field_order.get(operation_key).map(Vec::as_slice)
    }

    /// Every dynamic field, sorted by operation key, then field key.
    pub fn dynamic_fields(&self) -> Vec<&CompiledField> {
        self.dynamic_fields
            .values()
            .sorted_by(|a, b| {
                (&a.operation_key, &a.field_key).cmp(&(&b.operation_key, &b.field_key))
            })
            .collect()
    }

    /// Keys of every operation with input fields, sorted.
    pub fn operation_keys(&self) -> Vec<&str> {
        self.field_order.keys().map(String::as_str).sorted().collect()
    }

    /// Every registered source, sorted by key.
    pub fn sources(&self) -> Vec<&SourceEntry> {
        self.sources.entries()
    }

    /// Fields of the same operation whose options must be reloaded when
    /// `field_key` changes.
    ///
    /// Fields naming `field_key` in `depends_on` are always listed. When `field_key`
    /// sets `alters_dynamic_fields`, every later dynamic field without declared
    /// dependencies is listed too, since it may read any earlier input.
    pub fn dependents_of(&self, operation_key: &str, field_key: &str) -> Vec<&str> {
        let order = self.field_order(operation_key).unwrap_or_default();
        let alters = self
            .input_field(operation_key, field_key)
            .is_some_and(|f| f.alters_dynamic_fields);
        let position = order.iter().position(|key| key == field_key);

        order
            .iter()
            .enumerate()
            .filter_map(|(index, key)| {
                self.input_field(operation_key, key).map(|f| (index, f))
            })
            .filter(|(index, f)| {
                f.depends_on.iter().any(|d| d == field_key)
                    || (alters
                        && f.dynamic.is_some()
                        && f.depends_on.is_empty()
                        && position.is_some_and(|p| *index > p))
            })
            .map(|(_, f)| f.key.as_str())
            .collect()
    }

    /// Triggers offered in end-user trigger selection. Hidden triggers are left
    /// out, though they stay resolvable as dropdown sources.
    pub fn visible_triggers(&self) -> impl Iterator<Item = &TriggerDefinition> {
        self.app.triggers.iter().filter(|t| !t.display.hidden)
    }

    pub fn app(&self) -> &AppDefinition {
        &self.app
    }
}
