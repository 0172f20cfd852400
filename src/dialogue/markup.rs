//! Inline tag removal. Entities are left alone; only `<...>` tags go.

use once_cell::sync::Lazy;
use regex::Regex;

static TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^<]+?>").unwrap());

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlStripper;

impl HtmlStripper {
    pub fn new() -> Self {
        Self
    }

    /// Remove tags and surrounding whitespace
    pub fn strip(&self, text: &str) -> String {
        TAG_REGEX.replace_all(text, "").trim().to_string()
    }
}
