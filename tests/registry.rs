//! Tests for registration: source table, validation and field ordering.
mod common;
use common::*;
use sentaku::prelude::*;
use sentaku::registry::SourceKind;

fn empty() -> StaticRecords {
    StaticRecords::default()
}

#[test]
fn test_tracker_app_registers() {
    let registry = create_tracker_registry();

    let keys: Vec<_> = registry.sources().iter().map(|s| s.source_key.clone()).collect();
    assert_eq!(keys, vec!["assignee", "new_task", "project", "projectList"]);

    let field = registry
        .dynamic_field("new_task", "project_id")
        .expect("project_id is dynamic");
    assert_eq!(field.reference.source, "projectList");
    assert_eq!(field.source_kind, SourceKind::ResourceList);

    assert!(registry.dynamic_field("new_task", "title").is_none());
    assert!(registry.input_field("new_task", "title").is_some());
}

#[test]
fn test_resource_list_alias_resolves_to_list_operation() {
    let registry = create_tracker_registry();
    let operation = registry.source("projectList").expect("alias registered");
    assert_eq!(operation.entry.kind, SourceKind::ResourceList);
    assert_eq!(operation.entry.declared_key, "project");
}

#[test]
fn test_trigger_key_resolves_to_trigger() {
    let registry = create_tracker_registry();
    let operation = registry.source("project").expect("trigger registered");
    assert_eq!(operation.entry.kind, SourceKind::Trigger);
}

#[test]
fn test_hidden_trigger_is_resolvable_but_not_visible() {
    let registry = create_tracker_registry();
    assert!(registry.source("assignee").is_some());
    assert!(registry.source("assignee").unwrap().entry.hidden);

    let visible: Vec<_> = registry.visible_triggers().map(|t| t.key.as_str()).collect();
    assert_eq!(visible, vec!["project", "new_task"]);
}

#[test]
fn test_field_order_respects_dependencies() {
    let app = AppDefinition::new()
        .with_trigger(TriggerDefinition::new("user", "User"))
        .with_trigger(
            TriggerDefinition::new("create", "Thing")
                .with_field(FieldSpec::new("assignee_id", "Assignee").depends_on("project_id"))
                .with_field(FieldSpec::new("project_id", "Project").depends_on("workspace_id"))
                .with_field(FieldSpec::new("workspace_id", "Workspace")),
        );
    let registry = OperationRegistry::builder(app)
        .with_perform("user", empty())
        .with_perform("create", empty())
        .build()
        .unwrap();

    assert_eq!(
        registry.field_order("create").unwrap(),
        &["workspace_id", "project_id", "assignee_id"]
    );
    assert_eq!(registry.dependents_of("create", "project_id"), vec!["assignee_id"]);
}

#[test]
fn test_malformed_reference_fails_at_registration() {
    let app = AppDefinition::new().with_trigger(
        TriggerDefinition::new("create", "Thing")
            .with_field(FieldSpec::new("project_id", "Project").dynamic("project.id")),
    );
    let result = OperationRegistry::builder(app)
        .with_perform("create", empty())
        .build();

    match result.err().unwrap() {
        RegistryError::InvalidReference {
            operation_key,
            field_key,
            cause,
        } => {
            assert_eq!(operation_key, "create");
            assert_eq!(field_key, "project_id");
            assert!(matches!(cause, ReferenceError::InvalidReferenceFormat { segments: 2, .. }));
        }
        other => panic!("Expected InvalidReference error, got {:?}", other),
    }
}

#[test]
fn test_unknown_source_fails_at_registration() {
    let app = AppDefinition::new().with_trigger(
        TriggerDefinition::new("create", "Thing")
            .with_field(FieldSpec::new("project_id", "Project").dynamic("projectList.id.name")),
    );
    let result = OperationRegistry::builder(app)
        .with_perform("create", empty())
        .build();

    match result.err().unwrap() {
        RegistryError::UnknownDynamicSource { source_key, .. } => {
            assert_eq!(source_key, "projectList");
        }
        other => panic!("Expected UnknownDynamicSource error, got {:?}", other),
    }
}

#[test]
fn test_alias_colliding_with_trigger_is_ambiguous() {
    let app = AppDefinition::new()
        .with_resource(ResourceDefinition::new("project", "Project"))
        .with_trigger(TriggerDefinition::new("projectList", "Project"));
    let result = OperationRegistry::builder(app)
        .with_perform("project", empty())
        .with_perform("projectList", empty())
        .build();

    match result.err().unwrap() {
        RegistryError::AmbiguousDynamicSource {
            source_key,
            claimants,
        } => {
            assert_eq!(source_key, "projectList");
            assert_eq!(claimants, "list of resource 'project', trigger 'projectList'");
        }
        other => panic!("Expected AmbiguousDynamicSource error, got {:?}", other),
    }
}

#[test]
fn test_duplicate_trigger_keys_are_ambiguous() {
    let app = AppDefinition::new()
        .with_trigger(TriggerDefinition::new("project", "Project"))
        .with_trigger(TriggerDefinition::new("project", "Project"));
    let result = OperationRegistry::builder(app)
        .with_perform("project", empty())
        .build();
    assert!(matches!(
        result.err().unwrap(),
        RegistryError::AmbiguousDynamicSource { .. }
    ));
}

#[test]
fn test_missing_perform_is_rejected() {
    let app = AppDefinition::new().with_trigger(TriggerDefinition::new("project", "Project"));
    let result = OperationRegistry::builder(app).build();
    assert_eq!(
        result.err().unwrap(),
        RegistryError::MissingPerform("project".to_string())
    );
}

#[test]
fn test_key_shared_with_trigger_does_not_bind_resource_list() {
    let app = AppDefinition::new()
        .with_resource(ResourceDefinition::new("project", "Project"))
        .with_trigger(TriggerDefinition::new("project", "Project"));
    let result = OperationRegistry::builder(app).with_perform("project", empty()).build();
    assert_eq!(
        result.err().unwrap(),
        RegistryError::MissingPerform("projectList".to_string())
    );
}

#[test]
fn test_resource_key_binds_list_when_no_trigger_shares_it() {
    let app = AppDefinition::new().with_resource(ResourceDefinition::new("project", "Project"));
    let registry = OperationRegistry::builder(app)
        .with_perform("project", empty())
        .build()
        .unwrap();
    assert_eq!(registry.source("projectList").unwrap().entry.declared_key, "project");
}

#[test]
fn test_altering_field_invalidates_later_undeclared_dropdowns() {
    let app = AppDefinition::new()
        .with_trigger(TriggerDefinition::new("user", "User"))
        .with_trigger(
            TriggerDefinition::new("create", "Thing")
                .with_field(FieldSpec::new("workspace_id", "Workspace").dynamic("user.id.name"))
                .with_field(
                    FieldSpec::new("project_id", "Project")
                        .dynamic("user.id.name")
                        .alters_dynamic_fields(),
                )
                .with_field(FieldSpec::new("owner_id", "Owner").dynamic("user.id.name"))
                .with_field(
                    FieldSpec::new("assignee_id", "Assignee")
                        .dynamic("user.id.name")
                        .depends_on("project_id"),
                )
                .with_field(
                    FieldSpec::new("reviewer_id", "Reviewer")
                        .dynamic("user.id.name")
                        .depends_on("workspace_id"),
                )
                .with_field(FieldSpec::new("title", "Title")),
        );
    let registry = OperationRegistry::builder(app)
        .with_perform("user", empty())
        .with_perform("create", empty())
        .build()
        .unwrap();

    assert_eq!(
        registry.dependents_of("create", "project_id"),
        vec!["owner_id", "assignee_id"]
    );
    assert_eq!(registry.dependents_of("create", "workspace_id"), vec!["reviewer_id"]);
    assert!(registry.dependents_of("create", "title").is_empty());
}

#[test]
fn test_perform_for_unknown_key_is_rejected() {
    let app = AppDefinition::new().with_trigger(TriggerDefinition::new("project", "Project"));
    let result = OperationRegistry::builder(app)
        .with_perform("project", empty())
        .with_perform("projcet", empty())
        .build();
    assert_eq!(
        result.err().unwrap(),
        RegistryError::OrphanPerform("projcet".to_string())
    );
}

#[test]
fn test_duplicate_field_keys_are_rejected() {
    let app = AppDefinition::new().with_trigger(
        TriggerDefinition::new("create", "Thing")
            .with_field(FieldSpec::new("title", "Title"))
            .with_field(FieldSpec::new("title", "Title again")),
    );
    let result = OperationRegistry::builder(app)
        .with_perform("create", empty())
        .build();
    assert_eq!(
        result.err().unwrap(),
        RegistryError::DuplicateFieldKey {
            operation_key: "create".to_string(),
            field_key: "title".to_string()
        }
    );
}

#[test]
fn test_unknown_dependency_is_rejected() {
    let app = AppDefinition::new().with_trigger(
        TriggerDefinition::new("create", "Thing")
            .with_field(FieldSpec::new("assignee_id", "Assignee").depends_on("project_id")),
    );
    let result = OperationRegistry::builder(app)
        .with_perform("create", empty())
        .build();
    assert!(matches!(
        result.err().unwrap(),
        RegistryError::UnknownDependency { dependency, .. } if dependency == "project_id"
    ));
}

#[test]
fn test_dependency_cycle_is_rejected() {
    let app = AppDefinition::new().with_trigger(
        TriggerDefinition::new("create", "Thing")
            .with_field(FieldSpec::new("a", "A").depends_on("c"))
            .with_field(FieldSpec::new("b", "B").depends_on("a"))
            .with_field(FieldSpec::new("c", "C").depends_on("b")),
    );
    let result = OperationRegistry::builder(app)
        .with_perform("create", empty())
        .build();

    match result.err().unwrap() {
        RegistryError::DependencyCycle {
            operation_key,
            path,
        } => {
            assert_eq!(operation_key, "create");
            assert_eq!(path, "a -> c -> b -> a");
        }
        other => panic!("Expected DependencyCycle error, got {:?}", other),
    }
}

#[test]
fn test_resource_list_fields_are_validated() {
    let app = AppDefinition::new().with_resource(
        ResourceDefinition::new("task", "Task")
            .with_list_field(FieldSpec::new("project_id", "Project").dynamic("nowhere.id.name")),
    );
    let result = OperationRegistry::builder(app)
        .with_perform("task", empty())
        .build();

    match result.err().unwrap() {
        RegistryError::UnknownDynamicSource { operation_key, .. } => {
            assert_eq!(operation_key, "taskList");
        }
        other => panic!("Expected UnknownDynamicSource error, got {:?}", other),
    }
}

#[test]
fn test_app_definition_from_camel_case_json() {
    let json = r#"{
        "resources": [{ "key": "project", "noun": "Project", "list": { "operation": {} } }],
        "triggers": [{
            "key": "new_task",
            "noun": "Task",
            "display": { "label": "New Task", "description": "Triggers on new tasks." },
            "operation": {
                "inputFields": [
                    { "key": "project_id", "label": "Project", "required": true,
                      "dynamic": "projectList.id.name", "helpText": "Pick one.",
                      "altersDynamicFields": true },
                    { "key": "tag", "label": "Tag", "dependsOn": ["project_id"] }
                ]
            }
        }]
    }"#;
    let app = AppDefinition::from_json(json).expect("valid JSON");
    let fields = &app.triggers[0].operation.input_fields;
    assert_eq!(fields[0].help_text.as_deref(), Some("Pick one."));
    assert!(fields[0].alters_dynamic_fields);
    assert_eq!(fields[1].depends_on, vec!["project_id"]);

    let registry = OperationRegistry::builder(app)
        .with_perform("project", empty())
        .with_perform("new_task", empty())
        .build()
        .unwrap();
    assert_eq!(registry.dynamic_fields().len(), 1);
}
