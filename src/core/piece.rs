use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::types::{PieceId, VoiceName};
use crate::core::voice::VoiceData;

/// A piece in an index with its voices
///
/// Voices are keyed by name; iteration follows declared voice order.
/// Different voices of one piece may have different lengths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieceEntry {
    pub id: PieceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub voices: BTreeMap<VoiceName, VoiceData>,
}

impl PieceEntry {
    pub fn new(id: PieceId) -> Self {
        Self {
            id,
            title: None,
            voices: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_voice(mut self, name: VoiceName, voice: VoiceData) -> Self {
        self.voices.insert(name, voice);
        self
    }

    pub fn voice(&self, name: VoiceName) -> Option<&VoiceData> {
        self.voices.get(&name)
    }

    /// Total notes across all voices
    pub fn note_count(&self) -> usize {
        self.voices.values().map(VoiceData::len).sum()
    }

    /// Title for display, falling back to the id
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => format!("{}. {title}", self.id.number),
            None => self.id.to_string(),
        }
    }
}
