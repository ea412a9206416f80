use super::definition::AppDefinition;
use crate::error::AppConversionError;

/// A trait for custom data models that can be converted into a Sentaku `AppDefinition`.
///
/// This is the extension point for hosts that keep their app definitions in a
/// format of their own. Implement it on your top-level struct and hand the result
/// to `OperationRegistry::builder`.
///
/// # Example
///
/// ```rust,no_run
/// use sentaku::app::{AppDefinition, FieldSpec, IntoApp, TriggerDefinition};
/// use sentaku::error::AppConversionError;
///
/// struct MyForm { name: String, choices_from: Option<String> }
/// struct MyApp { forms: Vec<MyForm> }
///
/// impl IntoApp for MyApp {
///     fn into_app(self) -> Result<AppDefinition, AppConversionError> {
///         let mut trigger = TriggerDefinition::new("new_item", "Item");
///         for form in self.forms {
///             let mut field = FieldSpec::new(&form.name, &form.name);
///             field.dynamic = form.choices_from;
///             trigger = trigger.with_field(field);
///         }
///         Ok(AppDefinition::new().with_trigger(trigger))
///     }
/// }
/// ```
pub trait IntoApp {
    /// Consumes the object and converts it into a Sentaku app definition.
    fn into_app(self) -> Result<AppDefinition, AppConversionError>;
}

impl IntoApp for AppDefinition {
    fn into_app(self) -> Result<AppDefinition, AppConversionError> {
        Ok(self)
    }
}

impl AppDefinition {
    /// Parses an app definition from its JSON form (snake_case or camelCase keys).
    pub fn from_json(json: &str) -> Result<Self, AppConversionError> {
        serde_json::from_str(json).map_err(|e| AppConversionError::JsonParseError(e.to_string()))
    }

    /// Loads an app definition from a JSON file.
    pub fn from_file(path: &str) -> Result<Self, AppConversionError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppConversionError::ValidationError(format!("Could not read '{}': {}", path, e))
        })?;
        Self::from_json(&content)
    }
}
