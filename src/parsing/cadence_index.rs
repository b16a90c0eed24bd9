use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use crate::catalog::cadence::CadenceEntry;
use crate::core::piece::PieceEntry;
use crate::core::types::{PieceId, VoiceName};
use crate::core::voice::VoiceData;
use crate::parsing::{
    convert_durations, convert_measures, convert_pitches, lenient_string, lenient_u32, ParseError,
};

#[derive(Debug, Deserialize)]
struct CadenceRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,

    #[serde(default, alias = "riem", deserialize_with = "lenient_u32")]
    riemenschneider: Option<u32>,

    #[serde(default, deserialize_with = "lenient_string")]
    bwv: Option<String>,

    #[serde(default, alias = "title")]
    chorale_title: Option<String>,

    #[serde(default, deserialize_with = "lenient_u32")]
    start_measure: Option<u32>,

    #[serde(default, deserialize_with = "lenient_u32")]
    end_measure: Option<u32>,

    #[serde(default)]
    cadence_type: Option<String>,

    #[serde(default)]
    voices: BTreeMap<String, CadenceVoiceRecord>,
}

#[derive(Debug, Deserialize)]
struct CadenceVoiceRecord {
    #[serde(default)]
    midi: Option<Vec<Option<i64>>>,

    #[serde(default)]
    durations: Option<Vec<Option<f64>>>,

    #[serde(default)]
    measures: Option<Vec<Option<i64>>>,
}

/// Parse a cadence index file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or a parse error if
/// the content is not a cadence index.
pub fn parse_cadence_index_file(path: &Path) -> Result<Vec<CadenceEntry>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_cadence_index(&content)
}

/// Parse cadence index JSON, given either as an array of records or as an
/// object whose values are records
///
/// Records without a Riemenschneider number are dropped with a warning.
///
/// # Errors
///
/// Returns `ParseError::Json` for malformed JSON or records, and
/// `ParseError::InvalidFormat` if the top level is neither an array nor an object.
pub fn parse_cadence_index(json: &str) -> Result<Vec<CadenceEntry>, ParseError> {
    let raw: Vec<Value> = match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        other => {
            return Err(ParseError::InvalidFormat(format!(
                "expected an array or object of cadences, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut cadences = Vec::with_capacity(raw.len());
    for (position, value) in raw.into_iter().enumerate() {
        let record: CadenceRecord = serde_json::from_value(value)?;
        if let Some(cadence) = convert_record(position, record) {
            cadences.push(cadence);
        }
    }
    Ok(cadences)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn convert_record(position: usize, record: CadenceRecord) -> Option<CadenceEntry> {
    let Some(number) = record.riemenschneider else {
        warn!(position, cadence = ?record.id, "cadence has no Riemenschneider number, skipped");
        return None;
    };

    let mut id = PieceId::new(number);
    if let Some(cadence_id) = &record.id {
        id = id.with_secondary(cadence_id.clone());
    }

    let mut piece = PieceEntry::new(id);
    if let Some(title) = record.chorale_title {
        piece = piece.with_title(title);
    }

    for (name, voice) in record.voices {
        let Some(voice_name) = VoiceName::parse(&name) else {
            warn!(cadence = %piece.id, voice = %name, "unknown voice name, skipped");
            continue;
        };

        // Absent arrays stay empty; the matcher treats such a voice as unmatched
        let converted = convert_pitches(&voice.midi.unwrap_or_default()).and_then(|pitches| {
            Ok(VoiceData {
                pitches,
                durations: convert_durations(&voice.durations.unwrap_or_default())?,
                measures: convert_measures(&voice.measures.unwrap_or_default()),
            })
        });

        match converted {
            Ok(data) => {
                piece.voices.insert(voice_name, data);
            }
            Err(reason) => {
                warn!(cadence = %piece.id, voice = %voice_name, %reason, "invalid voice, skipped");
            }
        }
    }

    Some(CadenceEntry {
        piece,
        bwv: record.bwv,
        start_measure: record.start_measure,
        end_measure: record.end_measure,
        cadence_type: record.cadence_type,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const CADENCES: &str = r#"[
        {
            "id": "bwv269_cad01",
            "riemenschneider": 1,
            "bwv": "269",
            "chorale_title": "Aus meines Herzens Grunde",
            "start_measure": 1,
            "end_measure": 2,
            "cadence_type": "authentic",
            "voices": {
                "soprano": {"midi": [67, 67, 62, 64, null, 66],
                            "names": ["G4", "G4", "D4", "E4", "rest", "F#4"],
                            "durations": [1.0, 1.0, 1.0, 1.0, 1.0, 1.0],
                            "intervals": [null, 0, -5, 2, null, null]},
                "bass": {"midi": [43, 47], "durations": [1.0, 1.0]}
            },
            "soprano_signature": "67,67,62,64,66"
        },
        {
            "id": "orphan_cad02",
            "voices": {"soprano": {"midi": [60], "durations": [1.0]}}
        }
    ]"#;

    #[test]
    fn test_parse_cadence_array() {
        let cadences = parse_cadence_index(CADENCES).unwrap();
        assert_eq!(cadences.len(), 1);

        let cadence = &cadences[0];
        assert_eq!(cadence.piece.id, PieceId::new(1).with_secondary("bwv269_cad01"));
        assert_eq!(cadence.start_measure, Some(1));
        assert_eq!(cadence.cadence_type.as_deref(), Some("authentic"));
        assert_eq!(cadence.piece.title.as_deref(), Some("Aus meines Herzens Grunde"));

        let soprano = cadence.piece.voice(VoiceName::Soprano).unwrap();
        assert_eq!(soprano.pitches[4], None);
        assert!(soprano.is_well_formed());
        assert!(soprano.measures.is_empty());
        assert_eq!(cadence.piece.voices.len(), 2);
    }

    #[test]
    fn test_parse_cadence_object() {
        let json = r#"{
            "b": {"id": "b", "riemenschneider": 2, "voices": {"alto": {"midi": [62], "durations": [2.0]}}},
            "a": {"id": "a", "riemenschneider": "3", "voices": {"tenor": {"midi": [55], "durations": [1.0]}}}
        }"#;
        let cadences = parse_cadence_index(json).unwrap();
        assert_eq!(cadences.len(), 2);
        assert!(cadences.iter().any(|c| c.piece.id.number == 3));
    }

    #[test]
    fn test_voice_without_durations_is_kept_empty() {
        let json = r#"[{"id": "x", "riemenschneider": 4,
            "voices": {"soprano": {"midi": [60, 62]}, "descant": {"midi": [72], "durations": [1.0]}}}]"#;
        let cadences = parse_cadence_index(json).unwrap();
        let piece = &cadences[0].piece;
        assert_eq!(piece.voices.len(), 1);
        let soprano = piece.voice(VoiceName::Soprano).unwrap();
        assert!(soprano.is_empty());
        assert!(!soprano.is_well_formed());
    }

    #[test]
    fn test_rejects_scalar_top_level() {
        assert!(matches!(
            parse_cadence_index("42"),
            Err(ParseError::InvalidFormat(_))
        ));
    }
}
