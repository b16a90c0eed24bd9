use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

use crate::catalog::source::VoiceSource;
use crate::catalog::store::IndexError;
use crate::core::piece::PieceEntry;
use crate::core::types::{PieceId, VoiceName};
use crate::core::voice::VoiceData;
use crate::parsing::cadence_index::{parse_cadence_index, parse_cadence_index_file};

/// A cadence excerpt: a short four-voice passage cut from a chorale
#[derive(Debug, Clone, PartialEq)]
pub struct CadenceEntry {
    /// Voices of the excerpt; the id's secondary part is the excerpt id
    pub piece: PieceEntry,

    pub bwv: Option<String>,

    /// Measures of the source chorale the excerpt spans
    pub start_measure: Option<u32>,
    pub end_measure: Option<u32>,

    /// Classification carried through for display
    pub cadence_type: Option<String>,
}

/// The cadence-level voice index
#[derive(Debug, Default)]
pub struct CadenceIndex {
    pub cadences: Vec<CadenceEntry>,
}

impl CadenceIndex {
    /// Build an index, keeping the first cadence for each id
    pub fn new(cadences: Vec<CadenceEntry>) -> Self {
        let mut seen = HashSet::new();
        let cadences = cadences
            .into_iter()
            .filter(|cadence| {
                let fresh = seen.insert(cadence.piece.id.clone());
                if !fresh {
                    warn!(cadence = %cadence.piece.id, "duplicate cadence id in index, skipped");
                }
                fresh
            })
            .collect();
        Self { cadences }
    }

    /// Load a cadence index from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, IndexError> {
        let index = Self::new(parse_cadence_index_file(path)?);
        info!(cadences = index.len(), path = %path.display(), "loaded cadence index");
        Ok(index)
    }

    /// Parse a cadence index from a JSON string
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        Ok(Self::new(parse_cadence_index(json)?))
    }

    /// Find a cadence by its full id
    pub fn get(&self, id: &PieceId) -> Option<&CadenceEntry> {
        self.cadences.iter().find(|c| &c.piece.id == id)
    }

    pub fn len(&self) -> usize {
        self.cadences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cadences.is_empty()
    }
}

impl VoiceSource for CadenceIndex {
    fn piece_count(&self) -> usize {
        self.cadences.len()
    }

    fn piece_id(&self, index: usize) -> &PieceId {
        &self.cadences[index].piece.id
    }

    fn voice(&self, index: usize, name: VoiceName) -> Option<&VoiceData> {
        self.cadences[index].piece.voice(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_and_lookup() {
        let json = r#"[
            {"id": "bwv1_cad01", "riemenschneider": 1,
             "voices": {"soprano": {"midi": [67, 69], "durations": [1.0, 1.0]}}},
            {"id": "bwv1_cad02", "riemenschneider": 1,
             "voices": {"soprano": {"midi": [71, 72], "durations": [1.0, 2.0]}}}
        ]"#;
        let index = CadenceIndex::from_json(json).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.piece_count(), 2);

        let second = PieceId::new(1).with_secondary("bwv1_cad02");
        assert_eq!(index.piece_id(1), &second);
        assert!(index.get(&second).is_some());
        assert!(index.voice(0, VoiceName::Soprano).is_some());
        assert!(index.voice(0, VoiceName::Bass).is_none());
    }

    #[test]
    fn test_duplicate_cadence_ids_keep_first() {
        let json = r#"[
            {"id": "bwv1_cad01", "riemenschneider": 1, "cadence_type": "authentic",
             "voices": {"bass": {"midi": [43, 48], "durations": [2.0, 2.0]}}},
            {"id": "bwv1_cad01", "riemenschneider": 1, "cadence_type": "half",
             "voices": {"bass": {"midi": [43, 48], "durations": [2.0, 2.0]}}}
        ]"#;
        let index = CadenceIndex::from_json(json).unwrap();
        assert_eq!(index.len(), 1);

        let id = PieceId::new(1).with_secondary("bwv1_cad01");
        assert_eq!(index.get(&id).unwrap().cadence_type.as_deref(), Some("authentic"));
    }

    #[test]
    fn test_missing_file() {
        let result = CadenceIndex::load_from_file(Path::new("/nonexistent/cadences.json"));
        assert!(result.is_err());
    }
}
