use crate::core::piece::PieceEntry;
use crate::core::types::{PieceId, VoiceName};
use crate::core::voice::VoiceData;

/// Read access to an indexed corpus, as the matcher sees it
///
/// Pieces are addressed by position in index-build order so that every scan
/// visits them in the same order.
pub trait VoiceSource {
    /// Number of pieces in the index
    fn piece_count(&self) -> usize;

    /// Identifier of the piece at `index`
    fn piece_id(&self, index: usize) -> &PieceId;

    /// Arrays for one voice of the piece at `index`, if the piece has that voice
    fn voice(&self, index: usize, name: VoiceName) -> Option<&VoiceData>;
}

impl VoiceSource for [PieceEntry] {
    fn piece_count(&self) -> usize {
        self.len()
    }

    fn piece_id(&self, index: usize) -> &PieceId {
        &self[index].id
    }

    fn voice(&self, index: usize, name: VoiceName) -> Option<&VoiceData> {
        self[index].voice(name)
    }
}

impl VoiceSource for Vec<PieceEntry> {
    fn piece_count(&self) -> usize {
        self.as_slice().piece_count()
    }

    fn piece_id(&self, index: usize) -> &PieceId {
        self.as_slice().piece_id(index)
    }

    fn voice(&self, index: usize, name: VoiceName) -> Option<&VoiceData> {
        self.as_slice().voice(index, name)
    }
}
