//! Tests for resources module

use super::*;
use crate::context::bind;
use crate::error::Error;
use crate::schema::{field, Field, FieldType};
use crate::types::ReplicationMethod;
use test_case::test_case;

const ID_FIELDS: &[Field] = &[field("id", FieldType::Integer)];

fn child(name: &'static str, parent: &'static str, path: &'static str) -> ResourceDefinition {
    ResourceDefinition {
        parent: Some(parent),
        binding: &[],
        ..ResourceDefinition::top_level(name, path, &["id"], ID_FIELDS)
    }
}

#[test]
fn test_builtin_catalog_is_valid() {
    let catalog = Catalog::learndash();
    assert_eq!(catalog.len(), 16);
    assert!(!catalog.is_empty());
}

#[test]
fn test_builtin_parents_precede_children() {
    let catalog = Catalog::learndash();
    let names: Vec<_> = catalog.resources().map(|r| r.name).collect();

    for resource in catalog.resources() {
        if let Some(parent) = resource.parent {
            let parent_pos = names.iter().position(|n| *n == parent).unwrap();
            let child_pos = names.iter().position(|n| *n == resource.name).unwrap();
            assert!(parent_pos < child_pos, "{} before {}", parent, resource.name);
        }
    }
}

#[test_case("courses", None, "/sfwd-courses" ; "courses")]
#[test_case("courses_users", Some("courses"), "/sfwd-courses/{course_id}/users" ; "course users")]
#[test_case("user_course_progress", Some("courses_users"), "/users/{user_id}/course-progress" ; "course progress")]
#[test_case("user_course_progress_steps", Some("user_course_progress"), "/users/{user_id}/course-progress/{course_id}/steps" ; "progress steps")]
#[test_case("quizzes", None, "/sfwd-quiz" ; "quizzes")]
fn test_builtin_definition(name: &str, parent: Option<&str>, path: &str) {
    let catalog = Catalog::learndash();
    let resource = catalog.get(name).unwrap();
    assert_eq!(resource.parent, parent);
    assert_eq!(resource.path, path);
}

#[test]
fn test_child_key_fields_include_injected_keys() {
    let catalog = Catalog::learndash();
    for resource in catalog.resources().filter(|r| r.is_child()) {
        for key in resource.inject {
            assert!(
                resource.fields.iter().any(|f| f.name == *key),
                "{} does not declare injected field {}",
                resource.name,
                key
            );
        }
    }
}

#[test]
fn test_post_types_are_incremental() {
    let catalog = Catalog::learndash();
    let courses = catalog.get("courses").unwrap();
    assert_eq!(courses.replication_method(), ReplicationMethod::Incremental);
    assert_eq!(courses.replication.unwrap().param, "modified_after");

    let users = catalog.get("courses_users").unwrap();
    assert_eq!(users.replication_method(), ReplicationMethod::FullTable);
}

#[test]
fn test_user_children_ignore_parent_replication_keys() {
    let catalog = Catalog::learndash();
    assert!(
        catalog
            .get("user_quiz_progress")
            .unwrap()
            .ignore_parent_replication_keys
    );
    assert!(!catalog.get("courses_users").unwrap().ignore_parent_replication_keys);
}

#[test]
fn test_children_of_in_declaration_order() {
    let catalog = Catalog::learndash();
    let children: Vec<_> = catalog.children_of("courses").map(|r| r.name).collect();
    assert_eq!(
        children,
        vec!["courses_users", "courses_prerequisites", "courses_groups"]
    );
    assert_eq!(catalog.children_of("lessons").count(), 0);
}

#[test]
fn test_lineage() {
    let catalog = Catalog::learndash();
    assert_eq!(
        catalog.lineage("user_course_progress_steps").unwrap(),
        vec![
            "courses",
            "courses_users",
            "user_course_progress",
            "user_course_progress_steps"
        ]
    );
    assert_eq!(catalog.lineage("lessons").unwrap(), vec!["lessons"]);
    assert!(matches!(
        catalog.lineage("nope"),
        Err(Error::StreamNotFound { .. })
    ));
}

#[test]
fn test_schema_from_fields() {
    let catalog = Catalog::learndash();
    let schema = catalog.get("courses_users").unwrap().schema();
    assert!(schema.is_required("id"));
    assert!(schema.is_required("course_id"));
    assert!(schema.get_property("avatar_urls").is_some());
}

#[test]
fn test_rejects_duplicate_names() {
    let a = ResourceDefinition::top_level("a", "/a", &["id"], ID_FIELDS);
    assert!(Catalog::new(vec![a, a]).is_err());
}

#[test]
fn test_rejects_unknown_parent() {
    let mut orphan = child("orphan", "missing", "/orphan/{x}");
    orphan.binding = &[crate::context::BindingRule { key: "x", source: "id" }];
    let err = Catalog::new(vec![orphan]).unwrap_err();
    assert!(err.to_string().contains("unknown parent"));
}

#[test]
fn test_rejects_parent_without_binding() {
    let parent = ResourceDefinition::top_level("parent", "/parent", &["id"], ID_FIELDS);
    let unbound = child("unbound", "parent", "/parent/items");
    let err = Catalog::new(vec![parent, unbound]).unwrap_err();
    assert!(err.to_string().contains("no binding rules"));
}

#[test]
fn test_rejects_unbound_placeholder() {
    const BINDING: &[crate::context::BindingRule] = &[bind("parent_id", "id")];
    let parent = ResourceDefinition::top_level("parent", "/parent", &["id"], ID_FIELDS);
    let mut bad = child("bad", "parent", "/parent/{other_id}/items");
    bad.binding = BINDING;
    let err = Catalog::new(vec![parent, bad]).unwrap_err();
    assert!(err.to_string().contains("other_id"));
}

#[test]
fn test_rejects_unbound_injection() {
    const BINDING: &[crate::context::BindingRule] = &[bind("parent_id", "id")];
    let parent = ResourceDefinition::top_level("parent", "/parent", &["id"], ID_FIELDS);
    let mut bad = child("bad", "parent", "/parent/{parent_id}/items");
    bad.binding = BINDING;
    bad.inject = &["user_id"];
    let err = Catalog::new(vec![parent, bad]).unwrap_err();
    assert!(err.to_string().contains("user_id"));
}

#[test]
fn test_rejects_undeclared_replication_key() {
    let mut bad = ResourceDefinition::top_level("bad", "/bad", &["id"], ID_FIELDS);
    bad.replication = Some(Replication {
        key: "modified",
        param: "modified_after",
    });
    assert!(Catalog::new(vec![bad]).is_err());
}

#[test]
fn test_rejects_cycles() {
    const BINDING: &[crate::context::BindingRule] = &[bind("x", "id")];
    let mut a = child("a", "b", "/a/{x}");
    a.binding = BINDING;
    let mut b = child("b", "a", "/b/{x}");
    b.binding = BINDING;
    let err = Catalog::new(vec![a, b]).unwrap_err();
    assert!(err.to_string().contains("cyclic"));
}

#[test]
fn test_require_missing_stream() {
    let catalog = Catalog::learndash();
    assert!(matches!(
        catalog.require("sfwd-nothing"),
        Err(Error::StreamNotFound { stream }) if stream == "sfwd-nothing"
    ));
}
