//! Query normalization applied before any text leaves the process.

use regex::Regex;
use std::sync::LazyLock;

static LINE_BREAKS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\r\n]+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static COMMAS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*,(?:\s*,)*\s*").unwrap());

/// Raw user text plus the normalized form sent to providers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeQuery {
    pub raw: String,
    pub normalized: String,
}

impl GeocodeQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            normalized: normalize_query(raw),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Collapse line breaks into `", "`, whitespace runs into one space and
/// repeated commas into a single `", "`, then trim.
///
/// `"123 Main St\n\nSpringfield,, IL"` becomes `"123 Main St, Springfield, IL"`.
pub fn normalize_query(text: &str) -> String {
    let text = LINE_BREAKS_RE.replace_all(text, ", ");
    let text = WHITESPACE_RE.replace_all(&text, " ");
    let text = COMMAS_RE.replace_all(&text, ", ");
    text.trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}
