//! Built-in LearnDash resource table
//!
//! Paths are relative to `{api_url}/wp-json/ldlms/v2`.

use super::types::{Replication, ResourceDefinition};
use crate::context::{bind, BindingRule};
use crate::schema::{field, Field, FieldType};

/// Path prefix of the LearnDash v2 REST API
pub const API_PREFIX: &str = "/wp-json/ldlms/v2";

const INTEGER: FieldType = FieldType::Integer;
const NUMBER: FieldType = FieldType::Number;
const BOOLEAN: FieldType = FieldType::Boolean;
const STRING: FieldType = FieldType::String;
const DATETIME: FieldType = FieldType::DateTime;
const OBJECT: FieldType = FieldType::Object;
const STRINGS: FieldType = FieldType::Array(&FieldType::String);
const INTEGERS: FieldType = FieldType::Array(&FieldType::Integer);

const BY_COURSE: &[BindingRule] = &[bind("course_id", "id")];
const BY_USER: &[BindingRule] = &[bind("user_id", "id")];
const BY_USER_COURSE: &[BindingRule] = &[
    bind("user_id", "user_id"),
    bind("course_id", "course"),
];

const MODIFIED: Option<Replication> = Some(Replication {
    key: "modified",
    param: "modified_after",
});

// ============================================================================
// Field tables
// ============================================================================

const COURSE_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("guid", OBJECT),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("featured_media", INTEGER),
    field("menu_order", INTEGER),
    field("template", STRING),
    field("categories", STRINGS),
    field("tags", STRINGS),
    field("ld_course_category", INTEGERS),
    field("ld_course_tag", INTEGERS),
    field("materials_enabled", BOOLEAN),
    field("materials", STRING),
    field("certificate", INTEGER),
    field("disable_content_table", BOOLEAN),
    field("lessons_per_page", BOOLEAN),
    field("lesson_per_page_custom", INTEGER),
    field("topic_per_page_custom", INTEGER),
    field("price_type", STRING),
    field("prerequisite_enabled", BOOLEAN),
    field("prerequisite_compare", STRING),
    field("prerequisites", STRINGS),
    field("points_enabled", BOOLEAN),
    field("points_access", NUMBER),
    field("points_amount", NUMBER),
    field("progression_disabled", BOOLEAN),
    field("expire_access", BOOLEAN),
    field("expire_access_days", INTEGER),
    field("expire_access_delete_progress", BOOLEAN),
];

const LESSON_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("menu_order", INTEGER),
    field("course", INTEGER),
    field("is_sample", BOOLEAN),
    field("materials_enabled", BOOLEAN),
    field("materials", STRING),
    field("video_enabled", BOOLEAN),
    field("video_url", STRING),
    field("forced_lesson_time_enabled", BOOLEAN),
    field("forced_lesson_time", STRING),
    field("visible_type", STRING),
    field("visible_after", INTEGER),
    field("visible_after_specific_date", STRING),
    field("ld_lesson_category", INTEGERS),
    field("ld_lesson_tag", INTEGERS),
];

const TOPIC_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("menu_order", INTEGER),
    field("course", INTEGER),
    field("lesson", INTEGER),
    field("materials_enabled", BOOLEAN),
    field("materials", STRING),
    field("video_enabled", BOOLEAN),
    field("video_url", STRING),
    field("forced_lesson_time_enabled", BOOLEAN),
    field("forced_lesson_time", STRING),
    field("ld_topic_category", INTEGERS),
    field("ld_topic_tag", INTEGERS),
];

const QUIZ_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("menu_order", INTEGER),
    field("course", INTEGER),
    field("lesson", INTEGER),
    field("certificate", INTEGER),
    field("threshold", NUMBER),
    field("passing_percentage", NUMBER),
    field("retry_restrictions_enabled", BOOLEAN),
    field("retry_repeats", STRING),
    field("quiz_time_limit_enabled", BOOLEAN),
    field("quiz_time_limit_time", INTEGER),
    field("quiz_materials_enabled", BOOLEAN),
    field("quiz_materials", STRING),
    field("ld_quiz_category", INTEGERS),
    field("ld_quiz_tag", INTEGERS),
];

const QUESTION_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("menu_order", INTEGER),
    field("quiz", INTEGER),
    field("question_type", STRING),
    field("points_total", NUMBER),
    field("points_per_answer", BOOLEAN),
    field("points_show_in_message", BOOLEAN),
    field("points_diff_modus", BOOLEAN),
    field("disable_correct", BOOLEAN),
    field("correct_message", STRING),
    field("incorrect_message", STRING),
    field("correct_same", BOOLEAN),
    field("hints_enabled", BOOLEAN),
    field("hints_message", STRING),
    field("answers", OBJECT),
];

const ASSIGNMENT_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("author", INTEGER),
    field("course", INTEGER),
    field("lesson", INTEGER),
    field("topic", INTEGER),
    field("approved_status", STRING),
    field("points_enabled", BOOLEAN),
    field("points_max", INTEGER),
    field("points_awarded", INTEGER),
];

const ESSAY_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("course", INTEGER),
    field("lesson", INTEGER),
    field("topic", INTEGER),
    field("quiz", INTEGER),
    field("question_id", INTEGER),
    field("points_max", INTEGER),
    field("points_awarded", INTEGER),
];

const GROUP_FIELDS: &[Field] = &[
    field("date", DATETIME),
    field("date_gmt", DATETIME),
    field("id", INTEGER),
    field("modified", DATETIME),
    field("modified_gmt", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
    field("content", OBJECT),
    field("author", INTEGER),
    field("menu_order", INTEGER),
    field("price_type", STRING),
    field("materials_enabled", BOOLEAN),
    field("materials", STRING),
    field("certificate", INTEGER),
    field("ld_group_category", INTEGERS),
    field("ld_group_tag", INTEGERS),
];

const COURSE_USER_FIELDS: &[Field] = &[
    field("id", INTEGER),
    field("course_id", INTEGER),
    field("name", STRING),
    field("url", STRING),
    field("description", STRING),
    field("link", STRING),
    field("slug", STRING),
    field("avatar_urls", OBJECT),
];

const COURSE_LINK_FIELDS: &[Field] = &[
    field("id", INTEGER),
    field("course_id", INTEGER),
    field("date", DATETIME),
    field("modified", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
];

const USER_LINK_FIELDS: &[Field] = &[
    field("id", INTEGER),
    field("user_id", INTEGER),
    field("date", DATETIME),
    field("modified", DATETIME),
    field("slug", STRING),
    field("status", STRING),
    field("type", STRING),
    field("link", STRING),
    field("title", OBJECT),
];

const USER_COURSE_PROGRESS_FIELDS: &[Field] = &[
    field("user_id", INTEGER),
    field("course", INTEGER),
    field("progress_status", STRING),
    field("last_step", INTEGER),
    field("steps_completed", INTEGER),
    field("steps_total", INTEGER),
    field("date_started", DATETIME),
    field("date_completed", DATETIME),
];

const USER_COURSE_PROGRESS_STEP_FIELDS: &[Field] = &[
    field("user_id", INTEGER),
    field("course_id", INTEGER),
    field("step", INTEGER),
    field("step_type", STRING),
    field("step_status", STRING),
    field("date_started", DATETIME),
    field("date_completed", DATETIME),
];

const USER_QUIZ_PROGRESS_FIELDS: &[Field] = &[
    field("id", INTEGER),
    field("user_id", INTEGER),
    field("quiz", INTEGER),
    field("course", INTEGER),
    field("lesson", INTEGER),
    field("topic", INTEGER),
    field("user", INTEGER),
    field("percentage", NUMBER),
    field("timespent", NUMBER),
    field("has_graded", BOOLEAN),
    field("started", DATETIME),
    field("completed", DATETIME),
    field("points_scored", INTEGER),
    field("points_total", INTEGER),
    field("score", INTEGER),
    field("count", INTEGER),
    field("pass", BOOLEAN),
    field("statistic", INTEGER),
];

// ============================================================================
// Definitions
// ============================================================================

const fn post_type(
    name: &'static str,
    path: &'static str,
    fields: &'static [Field],
) -> ResourceDefinition {
    let mut def = ResourceDefinition::top_level(name, path, &["id"], fields);
    def.replication = MODIFIED;
    def
}

const fn course_child(
    name: &'static str,
    path: &'static str,
    fields: &'static [Field],
) -> ResourceDefinition {
    ResourceDefinition {
        name,
        path,
        key_fields: &["id", "course_id"],
        parent: Some("courses"),
        binding: BY_COURSE,
        inject: &["course_id"],
        replication: None,
        ignore_parent_replication_keys: false,
        fields,
    }
}

const fn user_child(
    name: &'static str,
    path: &'static str,
    key_fields: &'static [&'static str],
    fields: &'static [Field],
) -> ResourceDefinition {
    ResourceDefinition {
        name,
        path,
        key_fields,
        parent: Some("courses_users"),
        binding: BY_USER,
        inject: &["user_id"],
        replication: None,
        ignore_parent_replication_keys: true,
        fields,
    }
}

/// Every resource the tap knows, parents before children
pub fn learndash_resources() -> Vec<ResourceDefinition> {
    vec![
        post_type("courses", "/sfwd-courses", COURSE_FIELDS),
        course_child(
            "courses_users",
            "/sfwd-courses/{course_id}/users",
            COURSE_USER_FIELDS,
        ),
        course_child(
            "courses_prerequisites",
            "/sfwd-courses/{course_id}/prerequisites",
            COURSE_LINK_FIELDS,
        ),
        course_child(
            "courses_groups",
            "/sfwd-courses/{course_id}/groups",
            COURSE_LINK_FIELDS,
        ),
        user_child(
            "user_course_progress",
            "/users/{user_id}/course-progress",
            &["user_id", "course"],
            USER_COURSE_PROGRESS_FIELDS,
        ),
        ResourceDefinition {
            name: "user_course_progress_steps",
            path: "/users/{user_id}/course-progress/{course_id}/steps",
            key_fields: &["user_id", "course_id", "step"],
            parent: Some("user_course_progress"),
            binding: BY_USER_COURSE,
            inject: &["user_id", "course_id"],
            replication: None,
            ignore_parent_replication_keys: true,
            fields: USER_COURSE_PROGRESS_STEP_FIELDS,
        },
        user_child(
            "user_courses",
            "/users/{user_id}/courses",
            &["id", "user_id"],
            USER_LINK_FIELDS,
        ),
        user_child(
            "user_groups",
            "/users/{user_id}/groups",
            &["id", "user_id"],
            USER_LINK_FIELDS,
        ),
        user_child(
            "user_quiz_progress",
            "/users/{user_id}/quiz-progress",
            &["id", "user_id"],
            USER_QUIZ_PROGRESS_FIELDS,
        ),
        post_type("assignments", "/sfwd-assignment", ASSIGNMENT_FIELDS),
        post_type("essays", "/sfwd-essays", ESSAY_FIELDS),
        post_type("groups", "/groups", GROUP_FIELDS),
        post_type("lessons", "/sfwd-lessons", LESSON_FIELDS),
        post_type("questions", "/sfwd-question", QUESTION_FIELDS),
        post_type("quizzes", "/sfwd-quiz", QUIZ_FIELDS),
        post_type("topics", "/sfwd-topic", TOPIC_FIELDS),
    ]
}
