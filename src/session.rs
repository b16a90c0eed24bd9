//! Search session state.
//!
//! A [`SearchSession`] owns everything a melodic search page keeps between
//! user actions: the pattern being entered, the matching configuration and
//! the last result set. The index is borrowed read-only.
//!
//! Any edit to the pattern or mode discards the stored results. Until the
//! next successful search the session reports no active filter, and every
//! piece passes.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::source::VoiceSource;
use crate::core::pattern::{Pattern, PatternError};
use crate::core::types::{MatchMode, PieceId, VoiceName};
use crate::matching::aggregate::{group_by_piece, matched_pieces, MatchLocation};
use crate::matching::engine::{
    Match, MatchingConfig, PatternMatcher, SearchError, SearchOutcome,
};

pub struct SearchSession<'a, S: VoiceSource + ?Sized> {
    source: &'a S,
    config: MatchingConfig,
    pattern: Pattern,
    outcome: SearchOutcome,
    item_names: (&'static str, &'static str),
}

impl<'a, S: VoiceSource + ?Sized> SearchSession<'a, S> {
    pub fn new(source: &'a S, config: MatchingConfig) -> Self {
        Self {
            source,
            config,
            pattern: Pattern::new(),
            outcome: SearchOutcome::Inactive,
            item_names: ("piece", "pieces"),
        }
    }

    /// Name the indexed items in the summary line, e.g. `("cadence", "cadences")`
    #[must_use]
    pub fn with_item_names(mut self, singular: &'static str, plural: &'static str) -> Self {
        self.item_names = (singular, plural);
        self
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn config(&self) -> &MatchingConfig {
        &self.config
    }

    /// Append a note to the pattern
    ///
    /// # Errors
    ///
    /// Returns `PatternError` if the note is out of range; the session is unchanged.
    pub fn add_note(&mut self, pitch_class: i64, duration: f64) -> Result<(), PatternError> {
        self.pattern.append(pitch_class, duration)?;
        self.outcome = SearchOutcome::Inactive;
        Ok(())
    }

    /// Replace the whole pattern
    pub fn set_pattern(&mut self, pattern: Pattern) {
        self.pattern = pattern;
        self.outcome = SearchOutcome::Inactive;
    }

    /// Empty the pattern and drop the active filter
    pub fn clear(&mut self) {
        self.pattern.clear();
        self.outcome = SearchOutcome::Inactive;
    }

    pub fn set_mode(&mut self, mode: MatchMode) {
        if self.config.mode != mode {
            self.config.mode = mode;
            self.outcome = SearchOutcome::Inactive;
        }
    }

    /// Search the index with the current pattern and store the result
    ///
    /// # Errors
    ///
    /// Returns `SearchError::InsufficientPatternLength` if the pattern is too
    /// short for the mode. The search does not run and any stored result is
    /// kept.
    pub fn run(&mut self) -> Result<&SearchOutcome, SearchError> {
        let matcher = PatternMatcher::with_config(self.source, self.config.clone());
        self.outcome = matcher.search(&self.pattern)?;
        Ok(&self.outcome)
    }

    pub fn outcome(&self) -> &SearchOutcome {
        &self.outcome
    }

    pub fn matches(&self) -> &[Match] {
        self.outcome.matches()
    }

    /// Stored matches grouped by piece
    pub fn hits(&self) -> BTreeMap<PieceId, Vec<MatchLocation>> {
        group_by_piece(self.outcome.matches())
    }

    /// Pieces containing the pattern, or `None` when no filter is active
    pub fn matching_pieces(&self) -> Option<BTreeSet<PieceId>> {
        match &self.outcome {
            SearchOutcome::Inactive => None,
            SearchOutcome::Matches(matches) => Some(matched_pieces(matches)),
        }
    }

    /// Whether a piece survives the melodic filter
    pub fn passes_filter(&self, piece: &PieceId) -> bool {
        match &self.outcome {
            SearchOutcome::Inactive => true,
            SearchOutcome::Matches(matches) => matches.iter().any(|m| &m.piece == piece),
        }
    }

    /// Keep the ids that survive the melodic filter, in their original order
    pub fn filter<'p, I>(&self, pieces: I) -> Vec<&'p PieceId>
    where
        I: IntoIterator<Item = &'p PieceId>,
    {
        let matched = self.matching_pieces();
        pieces
            .into_iter()
            .filter(|id| matched.as_ref().map_or(true, |set| set.contains(*id)))
            .collect()
    }

    /// One-line description of the stored result, empty when inactive
    pub fn summary(&self) -> String {
        let Some(pieces) = self.matching_pieces() else {
            return String::new();
        };
        let count = pieces.len();
        let noun = if count == 1 {
            self.item_names.0
        } else {
            self.item_names.1
        };

        let voices: BTreeSet<VoiceName> = self.config.voices.iter().copied().collect();
        match voices.first() {
            Some(voice) if voices.len() == 1 => {
                format!("{count} {noun} found in {}.", voice.label())
            }
            _ => format!("{count} {noun} found."),
        }
    }
}
