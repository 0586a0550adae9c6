//! Score normalization: raw backend score payload to chart entries.
//!
//! The score endpoint has shipped in two shapes over time:
//!
//! ```text
//! [{"intelligence": "Logical", "score": 40}, {"intelligence": {"name": "Musical"}, "score": 12}]
//! {"Logical": 40, "Musical": 12}
//! ```
//!
//! [`normalize`] accepts either and produces one [`ScoreEntry`] per input
//! entry, in input order. It never fails: labels that are missing or set to
//! a placeholder fall back to a fixed list of dimension names, and scores
//! that are missing or not numeric become zero. Malformed payloads are
//! logged and degrade to an empty profile.

use std::str::FromStr;

use aadya_types::ScoreEntry;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, warn};

/// Dimension names used when the backend omits a label, in chart order.
pub const DEFAULT_FALLBACK_LABELS: [&str; 8] = [
    "Logical",
    "Musical",
    "Naturalist",
    "Existential",
    "Interpersonal",
    "Kinesthetic",
    "Linguistic",
    "Intrapersonal",
];

/// Labels the backend emits when it has no real dimension name.
const PLACEHOLDER_LABELS: [&str; 2] = ["Type", "Unknown"];

/// Convert a raw score payload into ordered chart entries.
///
/// Label priority for the entry at `index`:
/// 1. the backend label, unless empty or a placeholder (`"Type"`, `"Unknown"`)
/// 2. `fallback_labels[index]`
/// 3. `"Type {index + 1}"`
///
/// The output has exactly one entry per input entry and `value` is passed
/// through unclamped.
pub fn normalize<S: AsRef<str>>(raw: &Value, fallback_labels: &[S]) -> Vec<ScoreEntry> {
    match raw {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let (label, score) = split_array_item(index, item);
                entry(index, label, score, fallback_labels)
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .enumerate()
            .map(|(index, (key, score))| entry(index, Some(key.as_str()), Some(score), fallback_labels))
            .collect(),
        Value::Null => {
            debug!("score payload is null, treating as empty");
            Vec::new()
        }
        other => {
            warn!(payload = %other, "score payload is neither a list nor a map");
            Vec::new()
        }
    }
}

/// Pull the label candidate and the score out of one array element.
fn split_array_item(index: usize, item: &Value) -> (Option<&str>, Option<&Value>) {
    let Value::Object(fields) = item else {
        warn!(index, item = %item, "score entry is not an object");
        return (None, None);
    };
    let label = match fields.get("intelligence") {
        Some(Value::String(name)) => Some(name.as_str()),
        Some(Value::Object(dimension)) => dimension.get("name").and_then(Value::as_str),
        _ => None,
    };
    (label, fields.get("score"))
}

fn entry<S: AsRef<str>>(
    index: usize,
    label: Option<&str>,
    score: Option<&Value>,
    fallback_labels: &[S],
) -> ScoreEntry {
    ScoreEntry {
        label: resolve_label(index, label, fallback_labels),
        value: score.map_or(Decimal::ZERO, |value| coerce_score(index, value)),
    }
}

/// Apply the label priority rules for the entry at `index`.
pub fn resolve_label<S: AsRef<str>>(index: usize, label: Option<&str>, fallback_labels: &[S]) -> String {
    if let Some(name) = label.filter(|name| !name.is_empty() && !PLACEHOLDER_LABELS.contains(name)) {
        return name.to_owned();
    }
    fallback_labels.get(index).map_or_else(
        || format!("Type {}", index.saturating_add(1)),
        |fallback| fallback.as_ref().to_owned(),
    )
}

/// Read a score as a decimal. Anything that is not a number (or a numeric
/// string) counts as zero.
fn coerce_score(index: usize, value: &Value) -> Decimal {
    let parsed = match value {
        Value::Number(number) => number
            .as_i64()
            .map(Decimal::from)
            .or_else(|| number.as_u64().map(Decimal::from))
            .or_else(|| parse_decimal(&number.to_string())),
        Value::String(text) => parse_decimal(text.trim()),
        Value::Null => Some(Decimal::ZERO),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        warn!(index, score = %value, "non-numeric score, using 0");
        Decimal::ZERO
    })
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}
