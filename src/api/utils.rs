//! Utility functions for the API

/// Keep a form value only when it has some content
///
/// Missing, empty and whitespace-only values are all treated as absent
pub fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
