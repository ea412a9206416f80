//! Common test utilities for building app definitions, sources and bundles.
use sentaku::prelude::*;
use sentaku::registry::perform::record;

/// A small project-tracker app.
///
/// - resource `project` with a `list` method (alias `projectList`)
/// - trigger `project`, a second way to list projects
/// - hidden trigger `assignee`, listing users per project
/// - trigger `new_task` whose `assignee_id` depends on `project_id`
#[allow(dead_code)]
pub fn create_tracker_app() -> AppDefinition {
    AppDefinition::new()
        .with_resource(ResourceDefinition::new("project", "Project"))
        .with_trigger(TriggerDefinition::new("project", "Project"))
        .with_trigger(TriggerDefinition::new("assignee", "User").hidden())
        .with_trigger(
            TriggerDefinition::new("new_task", "Task")
                .with_field(
                    FieldSpec::new("project_id", "Project")
                        .required()
                        .dynamic("projectList.id.name")
                        .alters_dynamic_fields(),
                )
                .with_field(
                    FieldSpec::new("assignee_id", "Assignee")
                        .dynamic("assignee.id.name")
                        .depends_on("project_id")
                        .help_text("Only members of the selected project are listed."),
                )
                .with_field(FieldSpec::new("title", "Title").required()),
        )
}

#[allow(dead_code)]
pub fn create_projects() -> Vec<Record> {
    vec![
        record([("id", 123.into()), ("name", "Project 1".into())]),
        record([("id", 456.into()), ("name", "Project 2".into())]),
        record([("id", 789.into()), ("name", "Project 3".into())]),
    ]
}

#[allow(dead_code)]
pub fn create_assignees() -> Vec<Record> {
    vec![
        record([("id", 1.into()), ("name", "Ada".into()), ("project_id", 123.into())]),
        record([("id", 2.into()), ("name", "Grace".into()), ("project_id", 456.into())]),
        record([("id", 3.into()), ("name", "Linus".into()), ("project_id", 123.into())]),
    ]
}

/// Builds the tracker registry with static sources for every operation.
#[allow(dead_code)]
pub fn create_tracker_registry() -> OperationRegistry {
    OperationRegistry::builder(create_tracker_app())
        .with_perform("projectList", StaticRecords::new(create_projects()).paged(2))
        .with_perform(
            "project",
            StaticRecords::new(vec![record([("id", 1.into()), ("name", "From trigger".into())])]),
        )
        .with_perform(
            "assignee",
            StaticRecords::new(create_assignees()).filtered_by("project_id", "project_id"),
        )
        .with_perform("new_task", StaticRecords::default())
        .build()
        .expect("tracker app should register")
}
