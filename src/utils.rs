use std::env::var;

use uuid::Uuid;

/// Get the value of ENV var, or a default
///
/// Only when:
/// - It is set
/// - It is not empty
pub fn env_var_or_else(var_name: &'static str, or_else: fn() -> String) -> String {
    env_var(var_name).unwrap_or_else(or_else)
}

/// Get the value of ENV var when it is set and not empty
pub fn env_var(var_name: &'static str) -> Option<String> {
    var(var_name).ok().filter(|value| !value.is_empty())
}

/// Generate a resource ID when the client did not provide one
///
/// Millisecond timestamp first so IDs roughly sort by creation, followed by a short random part to
/// keep IDs generated within the same millisecond apart
pub fn generate_id() -> String {
    let timestamp = chrono::Utc::now().timestamp_millis();
    let random = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(6)
        .collect::<String>();

    format!("{timestamp}{random}")
}
