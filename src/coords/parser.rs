//! Recognizes explicit coordinate pairs in free text.
//!
//! Formats are tried in a fixed order:
//!   1. plain decimal pair   `34.0522, -118.2437`   (anchored)
//!   2. labeled pair         `lat: 40.7, lon: -74`  (anywhere in the text)
//!   3. cardinal pair        `34.05° S, 118.24° W`  (anywhere in the text)
//!
//! The first format that matches structurally decides the outcome. If its
//! numbers are out of range the parse yields `None` without trying the
//! remaining formats.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::types::Coordinate;

// Signed decimal. Digits are ASCII only; `\d` in `regex` also accepts other scripts.
const NUM: &str = r"[-+]?[0-9]+(?:\.[0-9]+)?";

static PLAIN_PAIR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!(r"^({NUM})\s*,\s*({NUM})$")).unwrap());

static LABELED_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)lat(?:itude)?:\s*({NUM})\s*,?\s*lon(?:gitude)?:\s*({NUM})")).unwrap()
});

static CARDINAL_PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)({NUM})\s*°?\s*([NS])\s*,?\s*({NUM})\s*°?\s*([EW])")).unwrap()
});

/// The textual shape a coordinate was recognized in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFormat {
    PlainPair,
    LabeledPair,
    CardinalPair,
}

impl CoordinateFormat {
    /// Priority order in which recognizers run.
    pub const ORDER: [CoordinateFormat; 3] = [
        CoordinateFormat::PlainPair,
        CoordinateFormat::LabeledPair,
        CoordinateFormat::CardinalPair,
    ];

    /// Structural match only: returns the raw numbers without a range check.
    fn structural_match(self, text: &str) -> Option<(f64, f64)> {
        match self {
            Self::PlainPair => {
                let caps = PLAIN_PAIR_RE.captures(text)?;
                Some((number(&caps, 1)?, number(&caps, 2)?))
            }
            Self::LabeledPair => {
                let caps = LABELED_PAIR_RE.captures(text)?;
                Some((number(&caps, 1)?, number(&caps, 2)?))
            }
            Self::CardinalPair => {
                let caps = CARDINAL_PAIR_RE.captures(text)?;
                let lat = apply_hemisphere(number(&caps, 1)?, &caps[2], "S");
                let lon = apply_hemisphere(number(&caps, 3)?, &caps[4], "W");
                Some((lat, lon))
            }
        }
    }
}

/// Parse `text` as an explicit coordinate pair. No network access.
pub fn parse_coordinates(text: &str) -> Option<Coordinate> {
    parse_coordinates_with_format(text).map(|(_, coord)| coord)
}

/// Like [`parse_coordinates`], also reporting which format matched.
pub fn parse_coordinates_with_format(text: &str) -> Option<(CoordinateFormat, Coordinate)> {
    let text = text.trim();
    let (format, lat, lon) = CoordinateFormat::ORDER
        .iter()
        .find_map(|f| f.structural_match(text).map(|(lat, lon)| (*f, lat, lon)))?;
    Coordinate::new(lat, lon).map(|coord| (format, coord))
}

fn number(caps: &Captures<'_>, index: usize) -> Option<f64> {
    caps.get(index)?.as_str().parse().ok()
}

// The hemisphere letter decides the sign; any literal sign is discarded.
fn apply_hemisphere(value: f64, letter: &str, negative: &str) -> f64 {
    if letter.eq_ignore_ascii_case(negative) {
        -value.abs()
    } else {
        value.abs()
    }
}
