use serde::Serialize;
use std::collections::BTreeMap;

use crate::catalog::source::VoiceSource;
use crate::core::types::VoiceName;

/// Per-voice totals across an index
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VoiceStats {
    /// Pieces that have this voice
    pub pieces: usize,
    /// Notes (including rests) in this voice across all pieces
    pub notes: usize,
    /// Voices whose arrays disagree in length and can never match
    pub malformed: usize,
}

/// Summary of an index's contents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub pieces: usize,
    pub voices: BTreeMap<VoiceName, VoiceStats>,
}

impl IndexStats {
    /// Walk every voice of every piece once
    pub fn collect<S: VoiceSource + ?Sized>(source: &S) -> Self {
        let mut stats = Self {
            pieces: source.piece_count(),
            voices: BTreeMap::new(),
        };

        for index in 0..source.piece_count() {
            for name in VoiceName::ALL {
                let Some(voice) = source.voice(index, name) else {
                    continue;
                };
                let entry = stats.voices.entry(name).or_default();
                entry.pieces += 1;
                entry.notes += voice.len();
                if !voice.is_well_formed() {
                    entry.malformed += 1;
                }
            }
        }

        stats
    }

    pub fn total_notes(&self) -> usize {
        self.voices.values().map(|v| v.notes).sum()
    }

    pub fn malformed_voices(&self) -> usize {
        self.voices.values().map(|v| v.malformed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceEntry;
    use crate::core::types::PieceId;
    use crate::core::voice::VoiceData;

    #[test]
    fn test_collect_stats() {
        let pieces = vec![
            PieceEntry::new(PieceId::new(1))
                .with_voice(VoiceName::Soprano, VoiceData::new(vec![60, 62], vec![1.0, 1.0]))
                .with_voice(VoiceName::Bass, VoiceData::new(vec![48], vec![2.0])),
            PieceEntry::new(PieceId::new(2)).with_voice(
                VoiceName::Soprano,
                VoiceData::new(vec![60, 62, 64], vec![1.0, 1.0]),
            ),
        ];

        let stats = IndexStats::collect(&pieces);
        assert_eq!(stats.pieces, 2);
        assert_eq!(stats.voices[&VoiceName::Soprano].pieces, 2);
        assert_eq!(stats.voices[&VoiceName::Soprano].notes, 4);
        assert_eq!(stats.voices[&VoiceName::Soprano].malformed, 1);
        assert_eq!(stats.voices[&VoiceName::Bass].notes, 1);
        assert!(!stats.voices.contains_key(&VoiceName::Alto));
        assert_eq!(stats.total_notes(), 5);
        assert_eq!(stats.malformed_voices(), 1);
    }
}
