//! Path template rendering
//!
//! Resource paths carry `{placeholder}` segments, e.g.
//! `/sfwd-courses/{course_id}/users`, bound from an [`ExtractionContext`].

use crate::context::ExtractionContext;
use crate::error::{Error, Result};
use crate::types::scalar_to_string;
use regex::Regex;
use std::sync::LazyLock;

/// Regex for matching path placeholders: {name}
static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").unwrap());

/// List placeholder names in a path template, in order of appearance
pub fn placeholders(template: &str) -> Vec<&str> {
    PLACEHOLDER_REGEX
        .captures_iter(template)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Substitute every placeholder in `template` from `context`
///
/// A placeholder without a scalar value in the context fails with
/// [`Error::ContextBinding`] naming `resource`.
pub fn render_path(resource: &str, template: &str, context: &ExtractionContext) -> Result<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last = 0;

    for cap in PLACEHOLDER_REGEX.captures_iter(template) {
        let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        let value = context
            .get(name.as_str())
            .and_then(scalar_to_string)
            .ok_or_else(|| Error::context_binding(resource, name.as_str()))?;

        rendered.push_str(&template[last..whole.start()]);
        rendered.push_str(&value);
        last = whole.end();
    }

    rendered.push_str(&template[last..]);
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholders() {
        assert_eq!(
            placeholders("/users/{user_id}/course-progress/{course_id}/steps"),
            vec!["user_id", "course_id"]
        );
        assert!(placeholders("/sfwd-courses").is_empty());
    }

    #[test]
    fn test_render_without_placeholders() {
        let rendered = render_path("courses", "/sfwd-courses", &ExtractionContext::empty()).unwrap();
        assert_eq!(rendered, "/sfwd-courses");
    }

    #[test]
    fn test_render_single_placeholder() {
        let context = ExtractionContext::empty().with("course_id", 17);
        let rendered =
            render_path("courses_users", "/sfwd-courses/{course_id}/users", &context).unwrap();
        assert_eq!(rendered, "/sfwd-courses/17/users");
    }

    #[test]
    fn test_render_multiple_placeholders() {
        let context = ExtractionContext::empty()
            .with("user_id", 3)
            .with("course_id", json!("42"));
        let rendered = render_path(
            "user_course_progress_steps",
            "/users/{user_id}/course-progress/{course_id}/steps",
            &context,
        )
        .unwrap();
        assert_eq!(rendered, "/users/3/course-progress/42/steps");
    }

    #[test]
    fn test_render_missing_placeholder() {
        let err = render_path(
            "courses_users",
            "/sfwd-courses/{course_id}/users",
            &ExtractionContext::empty(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::ContextBinding { ref resource, ref key }
                if resource == "courses_users" && key == "course_id"
        ));
    }

    #[test]
    fn test_render_non_scalar_value() {
        let context = ExtractionContext::empty().with("course_id", json!({"id": 1}));
        assert!(render_path("courses_users", "/sfwd-courses/{course_id}/users", &context).is_err());
    }
}
