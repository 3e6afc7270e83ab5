//! Resolve a Wistia video identifier from free-form input.
//!
//! Accepts share links (`?wvideo=<id>`), media pages (`/medias/<id>`),
//! embed URLs (`/embed/iframe/<id>`) and bare alphanumeric ids.

use std::sync::OnceLock;

use regex::Regex;

use super::error::ExtractError;

/// Patterns tried in priority order; the first match wins
fn patterns() -> &'static [Regex; 3] {
    static PATTERNS: OnceLock<[Regex; 3]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(r"wvideo=([a-zA-Z0-9]+)").expect("valid wvideo pattern"),
            Regex::new(r"medias/([a-zA-Z0-9]+)").expect("valid medias pattern"),
            Regex::new(r"embed/iframe/([a-zA-Z0-9]+)").expect("valid embed pattern"),
        ]
    })
}

/// Extract the video id from `input`, or `None` if it cannot be resolved
pub fn resolve(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for pattern in patterns() {
        if let Some(id) = pattern.captures(input).and_then(|c| c.get(1)) {
            return Some(id.as_str().to_string());
        }
    }

    input
        .chars()
        .all(|c| c.is_ascii_alphanumeric())
        .then(|| input.to_string())
}

/// Like [`resolve`], but as a `Result` carrying the input error
pub fn resolve_id(input: &str) -> Result<String, ExtractError> {
    resolve(input).ok_or(ExtractError::Input)
}

/// Whether `input` resolves to an id
pub fn is_valid_input(input: &str) -> bool {
    resolve(input).is_some()
}
