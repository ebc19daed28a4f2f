//! String utility functions

/// Uppercase the first character, leave the rest untouched
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trim and lowercase for case-insensitive label matching
pub fn normalize_label(text: &str) -> String {
    text.trim().to_lowercase()
}
