use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::source::VoiceSource;
use crate::core::pattern::{DerivedPattern, Pattern};
use crate::core::types::{MatchMode, Measure, PieceId, VoiceName};
use crate::matching::window::ScanVoice;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("{mode} search needs at least {required} notes, pattern has {actual}")]
    InsufficientPatternLength {
        mode: MatchMode,
        required: usize,
        actual: usize,
    },
}

/// One aligned occurrence of a pattern
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub piece: PieceId,
    pub voice: VoiceName,

    /// Offset of the first matched note within the voice
    pub start: usize,

    /// Measure of the first matched note, if the index records it
    pub measure: Measure,
}

/// Result of a search request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The pattern was empty: no melodic filter is active
    #[default]
    Inactive,
    /// The search ran; the list may be empty
    Matches(Vec<Match>),
}

impl SearchOutcome {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Matches(_))
    }

    /// Matches found, empty when inactive
    pub fn matches(&self) -> &[Match] {
        match self {
            Self::Inactive => &[],
            Self::Matches(matches) => matches,
        }
    }

    pub fn into_matches(self) -> Vec<Match> {
        match self {
            Self::Inactive => Vec::new(),
            Self::Matches(matches) => matches,
        }
    }
}

/// Configuration for the pattern matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchingConfig {
    pub mode: MatchMode,

    /// Smallest pattern accepted in any mode. `None` uses the mode's own
    /// minimum; relative mode never accepts fewer than 2 notes.
    pub min_notes: Option<usize>,

    /// Voices to scan. Order and repeats are ignored: voices are always
    /// scanned once each, top to bottom.
    pub voices: Vec<VoiceName>,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            mode: MatchMode::default(),
            min_notes: None,
            voices: VoiceName::ALL.to_vec(),
        }
    }
}

impl MatchingConfig {
    /// Whole-chorale melody search: at least 2 notes in either mode
    pub fn melody(mode: MatchMode) -> Self {
        Self {
            mode,
            min_notes: Some(2),
            ..Self::default()
        }
    }

    /// Cadence search over a single selected voice; single-note patterns
    /// are accepted in absolute mode
    pub fn cadence(mode: MatchMode, voice: VoiceName) -> Self {
        Self {
            mode,
            min_notes: None,
            voices: vec![voice],
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Minimum pattern length for the configured mode
    pub fn required_notes(&self) -> usize {
        self.min_notes
            .unwrap_or(0)
            .max(self.mode.min_notes())
    }
}

/// Slides a pattern over every voice of every piece in a source
pub struct PatternMatcher<'a, S: VoiceSource + ?Sized> {
    source: &'a S,
    config: MatchingConfig,
}

impl<'a, S: VoiceSource + ?Sized> PatternMatcher<'a, S> {
    /// Create a matcher with default configuration
    pub fn new(source: &'a S) -> Self {
        Self {
            source,
            config: MatchingConfig::default(),
        }
    }

    /// Create a matcher with custom configuration
    pub fn with_config(source: &'a S, config: MatchingConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Search for a pattern
    ///
    /// An empty pattern yields [`SearchOutcome::Inactive`] without scanning.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InsufficientPatternLength` when the pattern is
    /// non-empty but shorter than the configured minimum.
    pub fn search(&self, pattern: &Pattern) -> Result<SearchOutcome, SearchError> {
        self.search_derived(&pattern.derive())
    }

    /// Search for an already derived pattern
    ///
    /// # Errors
    ///
    /// See [`PatternMatcher::search`].
    pub fn search_derived(&self, pattern: &DerivedPattern) -> Result<SearchOutcome, SearchError> {
        if pattern.is_empty() {
            return Ok(SearchOutcome::Inactive);
        }

        let required = self.config.required_notes();
        if pattern.len() < required {
            return Err(SearchError::InsufficientPatternLength {
                mode: self.config.mode,
                required,
                actual: pattern.len(),
            });
        }

        // Declared voice order, each voice once, whatever the config lists
        let voices: Vec<VoiceName> = VoiceName::ALL
            .into_iter()
            .filter(|v| self.config.voices.contains(v))
            .collect();

        let mut matches = Vec::new();
        for index in 0..self.source.piece_count() {
            for &voice_name in &voices {
                self.scan_voice(index, voice_name, pattern, &mut matches);
            }
        }

        debug!(
            mode = %self.config.mode,
            notes = pattern.len(),
            matches = matches.len(),
            "search finished"
        );
        Ok(SearchOutcome::Matches(matches))
    }

    fn scan_voice(
        &self,
        index: usize,
        voice_name: VoiceName,
        pattern: &DerivedPattern,
        matches: &mut Vec<Match>,
    ) {
        let Some(voice) = self.source.voice(index, voice_name) else {
            return;
        };
        if voice.len() < pattern.len() {
            return;
        }

        let relative = self.config.mode == MatchMode::Relative;
        let Some(scan) = ScanVoice::prepare(voice, relative) else {
            debug!(
                piece = %self.source.piece_id(index),
                voice = %voice_name,
                pitches = voice.pitches.len(),
                durations = voice.durations.len(),
                measures = voice.measures.len(),
                "malformed voice skipped"
            );
            return;
        };

        for start in scan.starts(pattern.len()) {
            let hit = match self.config.mode {
                MatchMode::Absolute => scan.matches_absolute(pattern, start),
                MatchMode::Relative => scan.matches_relative(pattern, start),
            };
            if hit {
                matches.push(Match {
                    piece: self.source.piece_id(index).clone(),
                    voice: voice_name,
                    start,
                    measure: voice.measure_at(start),
                });
            }
        }
    }
}

/// Search all four voices of a source with the mode's own minimum length
///
/// # Errors
///
/// Returns `SearchError::InsufficientPatternLength` for a single-note
/// relative search.
pub fn search<S: VoiceSource + ?Sized>(
    pattern: &Pattern,
    mode: MatchMode,
    source: &S,
) -> Result<SearchOutcome, SearchError> {
    PatternMatcher::with_config(source, MatchingConfig::default().with_mode(mode)).search(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::piece::PieceEntry;
    use crate::core::voice::VoiceData;

    fn make_test_index() -> Vec<PieceEntry> {
        vec![
            PieceEntry::new(PieceId::new(1))
                .with_voice(
                    VoiceName::Soprano,
                    VoiceData::new(vec![60, 64, 67, 64, 60], vec![1.0, 1.0, 1.0, 1.0, 2.0])
                        .with_measures(vec![1, 1, 1, 1, 2]),
                )
                .with_voice(
                    VoiceName::Bass,
                    VoiceData::new(vec![48, 52, 55], vec![1.0, 1.0, 2.0])
                        .with_measures(vec![1, 1, 1]),
                ),
            PieceEntry::new(PieceId::new(2)).with_voice(
                VoiceName::Alto,
                VoiceData::new(vec![62, 66, 69, 66], vec![1.0, 1.0, 1.0, 1.0]),
            ),
        ]
    }

    fn starts(outcome: &SearchOutcome) -> Vec<(u32, VoiceName, usize)> {
        outcome
            .matches()
            .iter()
            .map(|m| (m.piece.number, m.voice, m.start))
            .collect()
    }

    #[test]
    fn test_absolute_scenario() {
        let index = make_test_index();
        let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0)]).unwrap();

        let outcome = search(&pattern, MatchMode::Absolute, &index).unwrap();
        assert_eq!(
            starts(&outcome),
            vec![(1, VoiceName::Soprano, 0), (1, VoiceName::Bass, 0)]
        );
        assert_eq!(outcome.matches()[0].measure, Some(1));
    }

    #[test]
    fn test_relative_scenario() {
        let index = make_test_index();
        let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0)]).unwrap();

        let outcome = search(&pattern, MatchMode::Relative, &index).unwrap();
        // Major third up in quarters: C-E, C-E in the bass, D-F# in the alto
        assert_eq!(
            starts(&outcome),
            vec![
                (1, VoiceName::Soprano, 0),
                (1, VoiceName::Bass, 0),
                (2, VoiceName::Alto, 0),
            ]
        );
        assert_eq!(outcome.matches()[2].measure, None);
    }

    #[test]
    fn test_overlapping_matches_are_all_reported() {
        let index = vec![PieceEntry::new(PieceId::new(3)).with_voice(
            VoiceName::Tenor,
            VoiceData::new(vec![55, 55, 55, 55], vec![1.0; 4]).with_measures(vec![1, 1, 1, 1]),
        )];
        let pattern = Pattern::from_pairs(&[(7, 1.0), (7, 1.0)]).unwrap();

        let outcome = search(&pattern, MatchMode::Absolute, &index).unwrap();
        assert_eq!(outcome.matches().len(), 3);
        assert!(outcome.matches().iter().all(|m| m.measure == Some(1)));
    }

    #[test]
    fn test_empty_pattern_is_inactive() {
        let index = make_test_index();
        let outcome = search(&Pattern::new(), MatchMode::Relative, &index).unwrap();
        assert_eq!(outcome, SearchOutcome::Inactive);
        assert!(!outcome.is_active());
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn test_minimum_length_boundary() {
        let index = make_test_index();
        let single = Pattern::from_pairs(&[(7, 2.0)]).unwrap();

        let err = search(&single, MatchMode::Relative, &index).unwrap_err();
        assert_eq!(
            err,
            SearchError::InsufficientPatternLength {
                mode: MatchMode::Relative,
                required: 2,
                actual: 1
            }
        );

        let outcome = search(&single, MatchMode::Absolute, &index).unwrap();
        assert_eq!(starts(&outcome), vec![(1, VoiceName::Bass, 2)]);
    }

    #[test]
    fn test_melody_preset_rejects_single_note() {
        let index = make_test_index();
        let single = Pattern::from_pairs(&[(7, 2.0)]).unwrap();
        let matcher =
            PatternMatcher::with_config(&index, MatchingConfig::melody(MatchMode::Absolute));

        assert!(matches!(
            matcher.search(&single),
            Err(SearchError::InsufficientPatternLength { required: 2, .. })
        ));
    }

    #[test]
    fn test_cadence_preset_scans_one_voice() {
        let index = make_test_index();
        let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0)]).unwrap();
        let matcher = PatternMatcher::with_config(
            &index,
            MatchingConfig::cadence(MatchMode::Absolute, VoiceName::Bass),
        );

        let outcome = matcher.search(&pattern).unwrap();
        assert_eq!(starts(&outcome), vec![(1, VoiceName::Bass, 0)]);
    }

    #[test]
    fn test_voices_scanned_in_declared_order_once() {
        let index = make_test_index();
        let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0)]).unwrap();
        let config = MatchingConfig {
            voices: vec![VoiceName::Bass, VoiceName::Soprano, VoiceName::Bass],
            ..MatchingConfig::default()
        };

        let outcome = PatternMatcher::with_config(&index, config)
            .search(&pattern)
            .unwrap();
        assert_eq!(
            starts(&outcome),
            vec![(1, VoiceName::Soprano, 0), (1, VoiceName::Bass, 0)]
        );
    }

    #[test]
    fn test_malformed_voice_contributes_nothing() {
        let index = vec![
            PieceEntry::new(PieceId::new(4)).with_voice(
                VoiceName::Soprano,
                VoiceData::new(vec![60, 64, 67, 64, 60], vec![1.0, 1.0, 1.0, 1.0]),
            ),
            PieceEntry::new(PieceId::new(5)).with_voice(
                VoiceName::Soprano,
                VoiceData::new(vec![60, 64], vec![1.0, 1.0]),
            ),
        ];
        let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0)]).unwrap();

        let outcome = search(&pattern, MatchMode::Absolute, &index).unwrap();
        assert_eq!(starts(&outcome), vec![(5, VoiceName::Soprano, 0)]);
    }

    #[test]
    fn test_voice_shorter_than_pattern() {
        let index = make_test_index();
        let pattern =
            Pattern::from_pairs(&[(0, 1.0), (4, 1.0), (7, 1.0), (4, 1.0), (0, 2.0), (0, 1.0)])
                .unwrap();
        let outcome = search(&pattern, MatchMode::Absolute, &index).unwrap();
        assert!(outcome.is_active());
        assert!(outcome.matches().is_empty());
    }

    #[test]
    fn test_works_through_trait_object() {
        let index = make_test_index();
        let source: &dyn VoiceSource = &index;
        let pattern = Pattern::from_pairs(&[(2, 1.0), (6, 1.0)]).unwrap();

        let outcome = PatternMatcher::new(source).search(&pattern).unwrap();
        assert_eq!(starts(&outcome), vec![(2, VoiceName::Alto, 0)]);
    }

    #[test]
    fn test_required_notes() {
        assert_eq!(MatchingConfig::default().required_notes(), 1);
        assert_eq!(
            MatchingConfig::default()
                .with_mode(MatchMode::Relative)
                .required_notes(),
            2
        );
        let config = MatchingConfig {
            min_notes: Some(3),
            ..MatchingConfig::default()
        };
        assert_eq!(config.required_notes(), 3);
    }
}
