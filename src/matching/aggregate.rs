use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::core::types::{Measure, PieceId, VoiceName};
use crate::matching::engine::Match;

/// Where in a piece a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MatchLocation {
    pub voice: VoiceName,
    pub measure: Measure,
    pub start: usize,
}

/// Group matches by piece id
///
/// Each piece's list keeps the order the matcher found its matches in
/// (voice order, then offset order). Repeated (voice, measure) pairs from
/// overlapping windows are kept.
pub fn group_by_piece(matches: &[Match]) -> BTreeMap<PieceId, Vec<MatchLocation>> {
    let mut grouped: BTreeMap<PieceId, Vec<MatchLocation>> = BTreeMap::new();
    for m in matches {
        grouped.entry(m.piece.clone()).or_default().push(MatchLocation {
            voice: m.voice,
            measure: m.measure,
            start: m.start,
        });
    }
    grouped
}

/// Distinct piece ids among the matches
pub fn matched_pieces(matches: &[Match]) -> BTreeSet<PieceId> {
    matches.iter().map(|m| m.piece.clone()).collect()
}

/// Fold one piece's locations into distinct known measures per voice
///
/// Voices appear in the order they were first seen, measures in first-seen
/// order. Matches with an unknown measure are dropped from the listing; a
/// voice whose matches all lack a measure still appears with no measures.
pub fn unique_measures(locations: &[MatchLocation]) -> Vec<(VoiceName, Vec<u32>)> {
    let mut folded: Vec<(VoiceName, Vec<u32>)> = Vec::new();
    for location in locations {
        let position = match folded.iter().position(|(voice, _)| *voice == location.voice) {
            Some(position) => position,
            None => {
                folded.push((location.voice, Vec::new()));
                folded.len() - 1
            }
        };

        if let Some(measure) = location.measure {
            let measures = &mut folded[position].1;
            if !measures.contains(&measure) {
                measures.push(measure);
            }
        }
    }
    folded
}
