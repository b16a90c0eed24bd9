use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

use crate::catalog::source::VoiceSource;
use crate::core::piece::PieceEntry;
use crate::core::types::{PieceId, VoiceName};
use crate::core::voice::VoiceData;
use crate::parsing::melody_index::{parse_melody_index, parse_melody_index_file};
use crate::parsing::ParseError;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Failed to read index: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse index: {0}")]
    ParseError(#[from] ParseError),

    #[error("Failed to serialize index: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Export format version for compatibility checking
pub const INDEX_VERSION: &str = "1.0.0";

/// Serializable export format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexData {
    pub version: String,
    pub pieces: Vec<PieceEntry>,
}

/// The piece-level melody index
///
/// Built once at load time and read-only afterwards. Pieces keep their
/// insertion order, which is the order every search visits them in.
#[derive(Debug)]
pub struct MelodyIndex {
    /// All pieces in build order
    pub pieces: Vec<PieceEntry>,

    /// Index: piece ID -> position in `pieces`
    id_to_index: HashMap<PieceId, usize>,

    /// Index: piece number -> positions of pieces sharing it
    number_to_indices: HashMap<u32, Vec<usize>>,
}

impl MelodyIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self {
            pieces: Vec::new(),
            id_to_index: HashMap::new(),
            number_to_indices: HashMap::new(),
        }
    }

    /// Load a melody index from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> Result<Self, IndexError> {
        let index = Self::from_pieces(parse_melody_index_file(path)?);
        info!(pieces = index.len(), path = %path.display(), "loaded melody index");
        Ok(index)
    }

    /// Parse a melody index from JSON, either the corpus file shape or an
    /// export produced by [`MelodyIndex::to_json`]
    ///
    /// # Errors
    ///
    /// Returns `IndexError` if the JSON matches neither shape.
    pub fn from_json(json: &str) -> Result<Self, IndexError> {
        if let Ok(data) = serde_json::from_str::<IndexData>(json) {
            if data.version != INDEX_VERSION {
                warn!(
                    expected = INDEX_VERSION,
                    found = %data.version,
                    "index version mismatch"
                );
            }
            return Ok(Self::from_pieces(data.pieces));
        }
        Ok(Self::from_pieces(parse_melody_index(json)?))
    }

    pub fn from_pieces(pieces: Vec<PieceEntry>) -> Self {
        let mut index = Self::new();
        for piece in pieces {
            index.add_piece(piece);
        }
        index
    }

    /// Add a piece to the end of the index
    ///
    /// Returns `false` and drops the piece if its id is already present; the
    /// first piece with an id wins.
    pub fn add_piece(&mut self, piece: PieceEntry) -> bool {
        let position = self.pieces.len();

        if self.id_to_index.contains_key(&piece.id) {
            warn!(piece = %piece.id, "duplicate piece id in index, skipped");
            return false;
        }
        self.id_to_index.insert(piece.id.clone(), position);
        self.number_to_indices
            .entry(piece.id.number)
            .or_default()
            .push(position);

        self.pieces.push(piece);
        true
    }

    /// Get a piece by ID
    pub fn get(&self, id: &PieceId) -> Option<&PieceEntry> {
        self.id_to_index.get(id).map(|&idx| &self.pieces[idx])
    }

    /// Find pieces by their primary number
    pub fn find_by_number(&self, number: u32) -> Vec<&PieceEntry> {
        self.number_to_indices
            .get(&number)
            .map(|indices| indices.iter().map(|&idx| &self.pieces[idx]).collect())
            .unwrap_or_default()
    }

    /// Export the index to JSON
    ///
    /// # Errors
    ///
    /// Returns `IndexError::SerializeError` if serialization fails.
    pub fn to_json(&self) -> Result<String, IndexError> {
        let data = IndexData {
            version: INDEX_VERSION.to_string(),
            pieces: self.pieces.clone(),
        };
        Ok(serde_json::to_string_pretty(&data)?)
    }

    /// Number of pieces in the index
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

impl Default for MelodyIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceSource for MelodyIndex {
    fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    fn piece_id(&self, index: usize) -> &PieceId {
        &self.pieces[index].id
    }

    fn voice(&self, index: usize, name: VoiceName) -> Option<&VoiceData> {
        self.pieces[index].voice(name)
    }
}
