//! Tests for parsing `dynamic` reference strings.
use sentaku::prelude::*;

#[test]
fn test_parse_three_segments() {
    let reference = DynamicReference::parse("projectList.id.name").expect("valid reference");
    assert_eq!(reference.source, "projectList");
    assert_eq!(reference.value_field, "id");
    assert_eq!(reference.label_field, "name");
    assert_eq!(reference.to_string(), "projectList.id.name");
}

#[test]
fn test_parse_round_trips_through_display() {
    for raw in ["project.id.name", "assignee.user_id.full_name", "a.b.c"] {
        let reference: DynamicReference = raw.parse().unwrap();
        assert_eq!(reference.to_string(), raw);
    }
}

#[test]
fn test_wrong_segment_count_is_rejected() {
    for (raw, segments) in [
        ("project", 1),
        ("project.id", 2),
        ("project.id.name.extra", 4),
        ("", 1),
    ] {
        match DynamicReference::parse(raw) {
            Err(ReferenceError::InvalidReferenceFormat { raw: r, segments: s }) => {
                assert_eq!(r, raw);
                assert_eq!(s, segments);
            }
            other => panic!("Expected InvalidReferenceFormat for '{}', got {:?}", raw, other),
        }
    }
}

#[test]
fn test_empty_segment_is_rejected() {
    let err = DynamicReference::parse("project..name").unwrap_err();
    assert_eq!(
        err,
        ReferenceError::EmptySegment {
            raw: "project..name".to_string(),
            index: 1
        }
    );
}
