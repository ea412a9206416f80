use serde::{Deserialize, Serialize};

/// The complete, canonical definition of an integration app, ready for registration.
/// This is the target structure for any custom data model conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppDefinition {
    #[serde(default)]
    pub triggers: Vec<TriggerDefinition>,
    #[serde(default)]
    pub resources: Vec<ResourceDefinition>,
}

/// A user-defined operation producing a list of records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub key: String,
    #[serde(default)]
    pub noun: String,
    #[serde(default)]
    pub display: DisplayDefinition,
    #[serde(default)]
    pub operation: OperationDefinition,
}

/// A grouping of operations for one entity type. Only `list` takes part in
/// dropdown resolution, under the alias `"{key}List"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceDefinition {
    pub key: String,
    #[serde(default)]
    pub noun: String,
    #[serde(default)]
    pub list: Option<ResourceMethodDefinition>,
}

/// One method (list, create, ...) of a resource.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceMethodDefinition {
    #[serde(default)]
    pub display: DisplayDefinition,
    #[serde(default)]
    pub operation: OperationDefinition,
}

/// How an operation is presented to end users.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayDefinition {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Hidden operations are left out of selection UIs but remain dropdown sources.
    #[serde(default)]
    pub hidden: bool,
}

/// The input surface of an operation. The perform routine itself is supplied
/// separately at registration time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperationDefinition {
    #[serde(default, alias = "inputFields")]
    pub input_fields: Vec<FieldSpec>,
}

/// Defines a single input field of an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub key: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub label: String,
    /// `"<source>.<valueField>.<labelField>"` when the options are fetched live.
    #[serde(default)]
    pub dynamic: Option<String>,
    #[serde(default, alias = "helpText")]
    pub help_text: Option<String>,
    /// Sibling fields whose values this field's source reads from `inputData`.
    #[serde(default, alias = "dependsOn")]
    pub depends_on: Vec<String>,
    /// A change of this field invalidates the options of later dynamic fields
    /// that declare no `depends_on`. See `OperationRegistry::dependents_of`.
    #[serde(default, alias = "altersDynamicFields")]
    pub alters_dynamic_fields: bool,
}

impl FieldSpec {
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            required: false,
            label: label.to_string(),
            dynamic: None,
            help_text: None,
            depends_on: Vec::new(),
            alters_dynamic_fields: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn dynamic(mut self, reference: &str) -> Self {
        self.dynamic = Some(reference.to_string());
        self
    }

    pub fn help_text(mut self, text: &str) -> Self {
        self.help_text = Some(text.to_string());
        self
    }

    pub fn depends_on(mut self, field_key: &str) -> Self {
        self.depends_on.push(field_key.to_string());
        self
    }

    pub fn alters_dynamic_fields(mut self) -> Self {
        self.alters_dynamic_fields = true;
        self
    }
}

impl TriggerDefinition {
    pub fn new(key: &str, noun: &str) -> Self {
        Self {
            key: key.to_string(),
            noun: noun.to_string(),
            display: DisplayDefinition::default(),
            operation: OperationDefinition::default(),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.display.hidden = true;
        self
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.operation.input_fields.push(field);
        self
    }
}

impl ResourceDefinition {
    /// A resource with an empty `list` method.
    pub fn new(key: &str, noun: &str) -> Self {
        Self {
            key: key.to_string(),
            noun: noun.to_string(),
            list: Some(ResourceMethodDefinition::default()),
        }
    }

    pub fn with_list_field(mut self, field: FieldSpec) -> Self {
        self.list
            .get_or_insert_with(ResourceMethodDefinition::default)
            .operation
            .input_fields
            .push(field);
        self
    }
}

impl AppDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trigger(mut self, trigger: TriggerDefinition) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn with_resource(mut self, resource: ResourceDefinition) -> Self {
        self.resources.push(resource);
        self
    }
}
