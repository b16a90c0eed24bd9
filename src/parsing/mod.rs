//! Parsers for the JSON index files and for textual melody patterns.
//!
//! This module provides parsers for:
//!
//! - **Melody index files**: one record per chorale with its four parts as
//!   parallel `pitches`/`durations`/`measures` arrays, or as a `notes` list
//! - **Cadence index files**: one record per cadence excerpt with a `voices`
//!   object keyed by voice name (`midi`/`durations` arrays, `null` for rests)
//! - **Pattern text**: note-name/duration tokens such as `C:1 E:1 G:2`
//!
//! ## Example
//!
//! ```rust
//! use chorale_motif::parsing::melody_index::parse_melody_index;
//! use chorale_motif::parsing::pattern_text::parse_pattern;
//!
//! let json = r#"[{"riem": 1, "bwv": "269", "parts": [
//!     {"name": "Soprano", "pitches": [67, 67, 69], "durations": [1.0, 1.0, 2.0],
//!      "measures": [1, 1, 1]}
//! ]}]"#;
//! let pieces = parse_melody_index(json).unwrap();
//! assert_eq!(pieces.len(), 1);
//!
//! let pattern = parse_pattern("G:1 A:2").unwrap();
//! assert_eq!(pattern.len(), 2);
//! ```
//!
//! ## Record Fields
//!
//! | Field | Index | Description | Required |
//! |-------|-------|-------------|----------|
//! | riem / riemenschneider / id | melody | Primary piece number | Yes |
//! | bwv | both | BWV catalog number | No |
//! | parts | melody | Voice arrays, named or positional | Yes |
//! | id | cadence | Cadence excerpt identifier | No |
//! | voices | cadence | Voice arrays keyed by voice name | Yes |

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use thiserror::Error;

pub mod cadence_index;
pub mod melody_index;
pub mod pattern_text;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),
}

/// Accept a non-negative integer given as a JSON number or a numeric string
pub(crate) fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_u32))
}

/// Accept a string or a number, keeping its textual form
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn value_to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Convert raw JSON pitch values to MIDI numbers, keeping `null` as a rest
pub(crate) fn convert_pitches(raw: &[Option<i64>]) -> Result<Vec<Option<u8>>, String> {
    raw.iter()
        .map(|p| match p {
            None => Ok(None),
            Some(v) => u8::try_from(*v)
                .ok()
                .filter(|m| *m <= crate::utils::validation::MAX_MIDI_PITCH)
                .map(Some)
                .ok_or_else(|| format!("pitch {v} is not a MIDI note number")),
        })
        .collect()
}

/// Convert raw JSON durations; a missing or non-positive duration is an error
pub(crate) fn convert_durations(raw: &[Option<f64>]) -> Result<Vec<f64>, String> {
    raw.iter()
        .map(|d| match d {
            Some(v) if crate::utils::validation::is_valid_duration(*v) => Ok(*v),
            Some(v) => Err(format!("duration {v} is not positive")),
            None => Err("missing duration".to_string()),
        })
        .collect()
}

/// Convert raw JSON measure numbers; anything unusable becomes unknown
pub(crate) fn convert_measures(raw: &[Option<i64>]) -> Vec<Option<u32>> {
    raw.iter()
        .map(|m| m.and_then(|v| u32::try_from(v).ok()).filter(|v| *v > 0))
        .collect()
}
