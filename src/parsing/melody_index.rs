use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::core::note::Note;
use crate::core::piece::PieceEntry;
use crate::core::types::{PieceId, VoiceName};
use crate::core::voice::VoiceData;
use crate::parsing::{
    convert_durations, convert_measures, convert_pitches, lenient_string, lenient_u32, ParseError,
};

/// A melody index file: a list of pieces, or a single per-piece notes file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MelodyFile {
    Entries(Vec<MelodyRecord>),
    Single(MelodyRecord),
}

#[derive(Debug, Deserialize)]
struct MelodyRecord {
    #[serde(default, alias = "riemenschneider", deserialize_with = "lenient_u32")]
    riem: Option<u32>,

    #[serde(default, deserialize_with = "lenient_u32")]
    id: Option<u32>,

    #[serde(default, deserialize_with = "lenient_string")]
    bwv: Option<String>,

    #[serde(default)]
    title: Option<String>,

    #[serde(default)]
    parts: Vec<PartRecord>,
}

#[derive(Debug, Deserialize)]
struct PartRecord {
    #[serde(default)]
    index: Option<usize>,

    #[serde(default)]
    name: Option<String>,

    #[serde(default)]
    pitches: Option<Vec<Option<i64>>>,

    #[serde(default)]
    durations: Option<Vec<Option<f64>>>,

    #[serde(default)]
    measures: Option<Vec<Option<i64>>>,

    /// Per-note objects, used when the arrays are absent
    #[serde(default)]
    notes: Option<Vec<NoteRecord>>,
}

#[derive(Debug, Deserialize)]
struct NoteRecord {
    #[serde(default)]
    time: Option<f64>,

    #[serde(default)]
    pitch: Option<i64>,

    #[serde(default)]
    duration: Option<f64>,

    #[serde(default)]
    measure: Option<i64>,
}

/// Parse a melody index file
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or a parse error if
/// the content is not a melody index.
pub fn parse_melody_index_file(path: &Path) -> Result<Vec<PieceEntry>, ParseError> {
    let content = std::fs::read_to_string(path)?;
    parse_melody_index(&content)
}

/// Parse melody index JSON into piece entries, in file order
///
/// Records without a piece number or without any usable part are dropped
/// with a warning; they are corpus defects, not reasons to reject the file.
///
/// # Errors
///
/// Returns `ParseError::Json` if the text is not valid JSON of the expected shape.
pub fn parse_melody_index(json: &str) -> Result<Vec<PieceEntry>, ParseError> {
    let records = match serde_json::from_str::<MelodyFile>(json)? {
        MelodyFile::Entries(records) => records,
        MelodyFile::Single(record) => vec![record],
    };

    let mut pieces = Vec::with_capacity(records.len());
    for (position, record) in records.into_iter().enumerate() {
        if let Some(piece) = convert_record(position, record) {
            pieces.push(piece);
        }
    }
    Ok(pieces)
}

fn convert_record(position: usize, record: MelodyRecord) -> Option<PieceEntry> {
    let Some(number) = record.riem.or(record.id) else {
        warn!(position, "melody index entry has no piece number, skipped");
        return None;
    };

    let mut id = PieceId::new(number);
    if let Some(bwv) = &record.bwv {
        id = id.with_secondary(format!("BWV {bwv}"));
    }

    let mut entry = PieceEntry::new(id);
    if let Some(title) = record.title {
        entry = entry.with_title(title);
    }

    for (part_position, part) in record.parts.into_iter().enumerate() {
        let Some(voice_name) = resolve_voice_name(&part, part_position) else {
            warn!(
                piece = number,
                part = ?part.name,
                "part is not one of the four chorale voices, skipped"
            );
            continue;
        };

        match convert_part(part) {
            Ok(Some(voice)) => {
                entry.voices.insert(voice_name, voice);
            }
            Ok(None) => {}
            Err(reason) => {
                warn!(piece = number, voice = %voice_name, %reason, "invalid part, skipped");
            }
        }
    }

    if entry.voices.is_empty() {
        warn!(piece = number, "no valid parts, skipped");
        return None;
    }
    Some(entry)
}

fn resolve_voice_name(part: &PartRecord, position: usize) -> Option<VoiceName> {
    if let Some(name) = part.name.as_deref().and_then(VoiceName::parse) {
        return Some(name);
    }
    // Unnamed or oddly named parts fall back to their position in the score
    if part.name.is_some() && part.index.is_none() {
        return None;
    }
    VoiceName::from_part_index(part.index.unwrap_or(position))
}

/// Build voice arrays from a part; `Ok(None)` means the part has no notes
fn convert_part(part: PartRecord) -> Result<Option<VoiceData>, String> {
    if part.pitches.is_none() && part.durations.is_none() {
        return match part.notes {
            Some(notes) => convert_notes(notes),
            None => Ok(None),
        };
    }

    // Array lengths are kept as given; the matcher skips mismatched voices
    let voice = VoiceData {
        pitches: convert_pitches(&part.pitches.unwrap_or_default())?,
        durations: convert_durations(&part.durations.unwrap_or_default())?,
        measures: convert_measures(&part.measures.unwrap_or_default()),
    };

    if voice.is_empty() && voice.pitches.is_empty() {
        return Ok(None);
    }
    Ok(Some(voice))
}

fn convert_notes(mut records: Vec<NoteRecord>) -> Result<Option<VoiceData>, String> {
    if records.iter().all(|n| n.time.is_some()) {
        records.sort_by(|a, b| {
            a.time
                .partial_cmp(&b.time)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    let mut notes = Vec::with_capacity(records.len());
    for record in records {
        // Rests and incomplete notes are not part of a melody line
        let (Some(pitch), Some(duration)) = (record.pitch, record.duration) else {
            continue;
        };

        let pitch = convert_pitches(&[Some(pitch)])?[0];
        let duration = convert_durations(&[Some(duration)])?[0];
        let measure = convert_measures(&[record.measure])[0];

        notes.push(Note {
            pitch,
            duration,
            measure,
        });
    }

    if notes.is_empty() {
        return Ok(None);
    }
    Ok(Some(VoiceData::from_notes(&notes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_PIECES: &str = r#"[
        {
            "riem": 1,
            "bwv": "269",
            "parts": [
                {"index": 0, "name": "Soprano", "pitches": [67, 67, 62, 64],
                 "durations": [1.0, 1.0, 1.0, 1.0], "intervals": [0, -5, 2],
                 "measures": [1, 1, 1, 1]},
                {"index": 3, "name": "Bass", "pitches": [43, 47, 50],
                 "durations": [1.0, 1.0, 2.0], "measures": [1, 1, 1]}
            ]
        },
        {
            "riem": "2",
            "bwv": 347,
            "title": "Ach Gott, vom Himmel sieh darein",
            "parts": [
                {"index": 1, "name": "Alto", "pitches": [62, 64],
                 "durations": [2.0, 2.0]}
            ]
        }
    ]"#;

    #[test]
    fn test_parse_melody_index() {
        let pieces = parse_melody_index(TWO_PIECES).unwrap();
        assert_eq!(pieces.len(), 2);

        let first = &pieces[0];
        assert_eq!(first.id, PieceId::new(1).with_secondary("BWV 269"));
        let soprano = first.voice(VoiceName::Soprano).unwrap();
        assert_eq!(soprano.pitches, vec![Some(67), Some(67), Some(62), Some(64)]);
        assert_eq!(soprano.measure_at(3), Some(1));
        assert!(first.voice(VoiceName::Bass).is_some());
        assert!(first.voice(VoiceName::Alto).is_none());

        let second = &pieces[1];
        assert_eq!(second.id.number, 2);
        assert_eq!(second.id.secondary.as_deref(), Some("BWV 347"));
        assert_eq!(second.title.as_deref(), Some("Ach Gott, vom Himmel sieh darein"));
        assert!(second.voice(VoiceName::Alto).unwrap().measures.is_empty());
    }

    #[test]
    fn test_entries_without_number_or_parts_are_dropped() {
        let json = r#"[
            {"bwv": "1", "parts": [{"name": "Soprano", "pitches": [60], "durations": [1.0]}]},
            {"riem": 9, "parts": []},
            {"id": 10, "parts": [{"name": "Tenor", "pitches": [55], "durations": [4.0]}]}
        ]"#;
        let pieces = parse_melody_index(json).unwrap();
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].id, PieceId::new(10));
    }

    #[test]
    fn test_positional_part_names() {
        let json = r#"[{"riem": 3, "parts": [
            {"pitches": [72], "durations": [1.0]},
            {"pitches": [67], "durations": [1.0]},
            {"name": "Part 3", "index": 2, "pitches": [64], "durations": [1.0]},
            {"name": "Continuo", "pitches": [48], "durations": [1.0]}
        ]}]"#;
        let pieces = parse_melody_index(json).unwrap();
        let piece = &pieces[0];
        assert_eq!(piece.voices.len(), 3);
        assert!(piece.voice(VoiceName::Soprano).is_some());
        assert!(piece.voice(VoiceName::Alto).is_some());
        assert!(piece.voice(VoiceName::Tenor).is_some());
        assert!(piece.voice(VoiceName::Bass).is_none());
    }

    #[test]
    fn test_mismatched_arrays_survive_parsing() {
        let json = r#"[{"riem": 4, "parts": [
            {"name": "Soprano", "pitches": [60, 64, 67, 64, 60], "durations": [1.0, 1.0, 1.0, 1.0]}
        ]}]"#;
        let pieces = parse_melody_index(json).unwrap();
        let soprano = pieces[0].voice(VoiceName::Soprano).unwrap();
        assert!(!soprano.is_well_formed());
    }

    #[test]
    fn test_invalid_part_values_are_skipped() {
        let json = r#"[{"riem": 5, "parts": [
            {"name": "Soprano", "pitches": [200], "durations": [1.0]},
            {"name": "Alto", "pitches": [60], "durations": [-1.0]},
            {"name": "Tenor", "pitches": [55], "durations": [1.0]}
        ]}]"#;
        let pieces = parse_melody_index(json).unwrap();
        assert_eq!(pieces[0].voices.len(), 1);
        assert!(pieces[0].voice(VoiceName::Tenor).is_some());
    }

    #[test]
    fn test_single_notes_file() {
        let json = r#"{
            "riem": 7,
            "bwv": "253",
            "tempo_qpm": 80,
            "parts": [
                {"name": "Soprano", "index": 0, "notes": [
                    {"time": 1.0, "pitch": 69, "duration": 1.0, "measure": 1},
                    {"time": 0.0, "pitch": 67, "duration": 1.0, "measure": 1},
                    {"time": 2.0, "pitch": null, "duration": 1.0, "measure": 1},
                    {"time": 3.0, "pitch": 71, "duration": 2.0, "measure": 2}
                ]}
            ]
        }"#;
        let pieces = parse_melody_index(json).unwrap();
        assert_eq!(pieces.len(), 1);
        let soprano = pieces[0].voice(VoiceName::Soprano).unwrap();
        assert_eq!(soprano.pitches, vec![Some(67), Some(69), Some(71)]);
        assert_eq!(soprano.durations, vec![1.0, 1.0, 2.0]);
        assert_eq!(soprano.measures, vec![Some(1), Some(1), Some(2)]);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            parse_melody_index("{not json"),
            Err(ParseError::Json(_))
        ));
    }
}
