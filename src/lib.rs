//! # chorale-motif
//!
//! A library for finding melodic patterns in the voices of four-part chorales.
//!
//! A pattern is a short sequence of notes, each a pitch class and a duration.
//! The matcher slides it across every voice of every piece in an index and
//! reports each aligned occurrence with the piece, voice, offset and measure
//! where it starts.
//!
//! ## Features
//!
//! - **Absolute matching**: Same pitch classes in any octave, same rhythm
//! - **Relative matching**: Same intervals mod 12 in any key, same rhythm
//! - **Two index layouts**: Whole-chorale melody indices and cadence excerpts
//! - **Session filtering**: Keep a pattern and result set between edits and
//!   filter piece lists by it
//!
//! ## Example
//!
//! ```rust
//! use chorale_motif::{MatchMode, MelodyIndex, Pattern, PatternMatcher};
//! use chorale_motif::matching::MatchingConfig;
//!
//! let json = r#"[{"riem": 12, "title": "Example",
//!     "parts": [{"name": "Soprano", "pitches": [67, 71, 74], "durations": [1, 1, 2]}]}]"#;
//! let index = MelodyIndex::from_json(json).unwrap();
//!
//! // D-F# in quarters is G-B transposed
//! let pattern = Pattern::from_pairs(&[(2, 1.0), (6, 1.0)]).unwrap();
//! let matcher = PatternMatcher::with_config(&index, MatchingConfig::melody(MatchMode::Relative));
//! let outcome = matcher.search(&pattern).unwrap();
//!
//! assert_eq!(outcome.matches().len(), 1);
//! assert_eq!(outcome.matches()[0].start, 0);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: Melody and cadence indices
//! - [`core`]: Notes, voices, pieces and patterns
//! - [`matching`]: Pattern matcher and result aggregation
//! - [`parsing`]: Parsers for index files and pattern text
//! - [`session`]: Search state kept between user actions
//! - [`cli`]: Command-line interface implementation

pub mod catalog;
pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod session;
pub mod utils;

// Re-export commonly used types for convenience
pub use catalog::cadence::CadenceIndex;
pub use catalog::source::VoiceSource;
pub use catalog::store::MelodyIndex;
pub use core::pattern::Pattern;
pub use core::piece::PieceEntry;
pub use core::types::*;
pub use matching::engine::{Match, PatternMatcher, SearchOutcome};
pub use session::SearchSession;
