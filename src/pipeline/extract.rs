// src/pipeline/extract.rs

//! Instructor extraction.

use std::collections::HashSet;

use crate::models::{Course, Document};

/// Collect the unique instructor names of a document.
///
/// Courses without an instructor contribute the `"TBD"` placeholder.
/// Names are compared as exact strings.
pub fn extract_instructors(document: &Document<Course>) -> HashSet<String> {
    document
        .courses()
        .map(|course| course.instructor_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(value: serde_json::Value) -> HashSet<String> {
        extract_instructors(&Document::from_value(value).unwrap())
    }

    fn set(items: &[&str]) -> HashSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_returns_unique_instructors() {
        let found = names(json!([
            {"instructor": "Alice"},
            {"instructor": "Alice"},
            {"instructor": "Bob"},
            {"instructor": "John"},
            {"instructor": "John"},
        ]));
        assert_eq!(found, set(&["Alice", "Bob", "John"]));
    }

    #[test]
    fn test_missing_instructor_is_placeholder() {
        let found = names(json!([
            {"instructor": "Alice"},
            {"instructor": "Bob"},
            {"name": "John Doe"},
        ]));
        assert_eq!(found, set(&["Alice", "Bob", "TBD"]));
    }

    #[test]
    fn test_only_placeholder_when_no_instructors() {
        assert_eq!(names(json!([{"name": "John Doe"}])), set(&["TBD"]));
    }

    #[test]
    fn test_empty_document() {
        assert!(names(json!([])).is_empty());
        assert!(names(json!({})).is_empty());
    }

    #[test]
    fn test_walks_every_term() {
        let found = names(json!({
            "202001": [{"instructor": "Alice"}],
            "202002": [{"instructor": "Bob"}, {"instructor": "Alice"}],
        }));
        assert_eq!(found, set(&["Alice", "Bob"]));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let found = names(json!([[{"instructor": "alice"}], [{"instructor": "Alice"}]]));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_insensitive_to_course_order() {
        let forward = names(json!([{"instructor": "A"}, {"instructor": "B"}, {}]));
        let backward = names(json!([{}, {"instructor": "B"}, {"instructor": "A"}]));
        assert_eq!(forward, backward);
    }
}
