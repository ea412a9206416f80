use crate::app::{AppDefinition, OperationDefinition};
use crate::error::RegistryError;
use ahash::AHashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Suffix turning a resource key into its list-operation alias.
pub const LIST_ALIAS_SUFFIX: &str = "List";

/// Where a dynamic source comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// A resource's `list` method, addressed as `"{resourceKey}List"`.
    ResourceList,
    Trigger,
}

/// One entry of the source lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// The key a `dynamic` reference uses to name this source.
    pub source_key: String,
    /// The trigger or resource key the source was declared under.
    pub declared_key: String,
    pub kind: SourceKind,
    pub hidden: bool,
}

/// The explicit source lookup table, built once from the triggers and resources.
///
/// Lookups never concatenate strings: every resource alias is materialized here.
#[derive(Debug, Clone, Default)]
pub(crate) struct SourceTable {
    list_aliases: AHashMap<String, SourceEntry>,
    triggers: AHashMap<String, SourceEntry>,
}

impl SourceTable {
    pub(crate) fn build(app: &AppDefinition) -> Result<Self, RegistryError> {
        let resource_aliases = app.resources.iter().filter_map(|resource| {
            resource.list.as_ref().map(|list| SourceEntry {
                source_key: format!("{}{}", resource.key, LIST_ALIAS_SUFFIX),
                declared_key: resource.key.clone(),
                kind: SourceKind::ResourceList,
                hidden: list.display.hidden,
            })
        });
        let triggers = app.triggers.iter().map(|trigger| SourceEntry {
            source_key: trigger.key.clone(),
            declared_key: trigger.key.clone(),
            kind: SourceKind::Trigger,
            hidden: trigger.display.hidden,
        });

        // Aliases first, so a collision error lists the resource before the trigger.
        let grouped = resource_aliases
            .chain(triggers)
            .into_group_map_by(|entry| entry.source_key.clone());

        let mut table = Self::default();
        for (source_key, mut claimants) in grouped.into_iter().sorted_by(|a, b| a.0.cmp(&b.0)) {
            if claimants.len() > 1 {
                return Err(RegistryError::AmbiguousDynamicSource {
                    source_key,
                    claimants: claimants.iter().map(describe).join(", "),
                });
            }
            if let Some(entry) = claimants.pop() {
                match entry.kind {
                    SourceKind::ResourceList => table.list_aliases.insert(source_key, entry),
                    SourceKind::Trigger => table.triggers.insert(source_key, entry),
                };
            }
        }
        Ok(table)
    }

    /// Lookup order: resource list aliases, then trigger keys. Collisions are
    /// rejected by `build`, so at most one entry can match.
    pub(crate) fn get(&self, source_key: &str) -> Option<&SourceEntry> {
        self.list_aliases
            .get(source_key)
            .or_else(|| self.triggers.get(source_key))
    }

    pub(crate) fn is_trigger(&self, key: &str) -> bool {
        self.triggers.contains_key(key)
    }

    pub(crate) fn contains(&self, source_key: &str) -> bool {
        self.get(source_key).is_some()
    }

    /// All entries, sorted by source key.
    pub(crate) fn entries(&self) -> Vec<&SourceEntry> {
        self.list_aliases
            .values()
            .chain(self.triggers.values())
            .sorted_by(|a, b| a.source_key.cmp(&b.source_key))
            .collect()
    }
}

fn describe(entry: &SourceEntry) -> String {
    match entry.kind {
        SourceKind::ResourceList => format!("list of resource '{}'", entry.declared_key),
        SourceKind::Trigger => format!("trigger '{}'", entry.declared_key),
    }
}

/// Every operation whose input fields take part in registration, keyed by the
/// name used to address it from `resolve_field`.
pub(crate) fn operations(app: &AppDefinition) -> Vec<(String, &OperationDefinition)> {
    let triggers = app
        .triggers
        .iter()
        .map(|t| (t.key.clone(), &t.operation));
    let lists = app.resources.iter().filter_map(|r| {
        r.list
            .as_ref()
            .map(|l| (format!("{}{}", r.key, LIST_ALIAS_SUFFIX), &l.operation))
    });
    lists.chain(triggers).collect()
}
