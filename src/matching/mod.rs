//! Melodic pattern matching and result aggregation.
//!
//! This module provides the core search functionality:
//!
//! - [`PatternMatcher`]: Slides a pattern across every voice of an index
//! - [`MatchingConfig`]: Mode, minimum pattern length and voices to scan
//! - [`group_by_piece`]: Groups raw matches per piece for display
//!
//! ## Matching Algorithm
//!
//! For every piece (in index order) and every configured voice (in voice
//! order), every start offset `i` in `0..=N-L` is tested:
//!
//! 1. **Absolute mode**: each voice pitch folded mod 12 equals the pattern's
//!    pitch class, and each duration equals the pattern's duration exactly
//! 2. **Relative mode**: each upward interval mod 12 between adjacent voice
//!    notes equals the pattern's interval, and durations match exactly
//!
//! Rhythm is never transposed: only pitch is folded. Voices whose arrays
//! disagree in length are skipped, never reported as errors. Overlapping
//! matches are all reported.
//!
//! ## Example
//!
//! ```rust
//! use chorale_motif::core::pattern::Pattern;
//! use chorale_motif::core::piece::PieceEntry;
//! use chorale_motif::core::types::{MatchMode, PieceId, VoiceName};
//! use chorale_motif::core::voice::VoiceData;
//! use chorale_motif::matching::{group_by_piece, MatchingConfig, PatternMatcher};
//!
//! let index = vec![PieceEntry::new(PieceId::new(1)).with_voice(
//!     VoiceName::Soprano,
//!     VoiceData::new(vec![60, 64, 67, 64, 60], vec![1.0, 1.0, 1.0, 1.0, 2.0])
//!         .with_measures(vec![1, 1, 1, 1, 2]),
//! )];
//!
//! let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0)]).unwrap();
//! let matcher = PatternMatcher::with_config(&index, MatchingConfig::melody(MatchMode::Absolute));
//! let outcome = matcher.search(&pattern).unwrap();
//!
//! let grouped = group_by_piece(outcome.matches());
//! assert_eq!(grouped[&PieceId::new(1)][0].measure, Some(1));
//! ```

pub mod aggregate;
pub mod engine;
pub(crate) mod window;

pub use aggregate::{group_by_piece, matched_pieces, unique_measures, MatchLocation};
pub use engine::{search, Match, MatchingConfig, PatternMatcher, SearchError, SearchOutcome};
