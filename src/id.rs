//! ID and timestamp utilities for Loops

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Current wall-clock time in UTC
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Generate a unique loop ID
///
/// Format: hyphenated UUID v4
/// Example: `6f1c2a9e-3b4d-4e5f-8a7b-1c2d3e4f5a6b`
pub fn generate_loop_id() -> String {
    Uuid::new_v4().to_string()
}

/// Shortened form of an ID for display (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((idx, _)) => &id[..idx],
        None => id,
    }
}
