//! MIME-type pattern library.
//!
//! File-upload attributes (`accept`) carry lists of MIME-type strings.
//! Each string must match one of a fixed set of per-category patterns;
//! anything outside these categories is rejected.

use once_cell::sync::Lazy;
use regex::Regex;

/// The media categories a file field may accept.
pub const CATEGORIES: &[&str] = &["image", "audio", "video", "application", "text", "font"];

static PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    CATEGORIES
        .iter()
        .map(|category| {
            // RFC 6838 restricted-name for the subtype, anchored per category.
            Regex::new(&format!(
                r"^{category}/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*$"
            ))
            .expect("mime pattern is valid")
        })
        .collect()
});

/// Whether a string is a well-formed MIME type in a known category.
pub fn is_valid_mime_type(value: &str) -> bool {
    PATTERNS.iter().any(|p| p.is_match(value))
}
