//! Core data types for melodic search over a chorale corpus.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Note`]: A single pitch (or rest) with a duration and optional measure
//! - [`VoiceData`]: One voice of a piece as parallel pitch/duration/measure arrays
//! - [`PieceEntry`]: A piece with its soprano, alto, tenor and bass voices
//! - [`Pattern`]: The user's melodic query, built one note at a time
//! - [`PieceId`], [`VoiceName`], [`MatchMode`]: Identification and search types
//!
//! ## Pitch Representation
//!
//! Voices store MIDI note numbers. Patterns store pitch classes (0 = C, 11 = B),
//! so every comparison folds voice pitches modulo 12:
//!
//! | MIDI | Name | Pitch class |
//! |------|------|-------------|
//! | 60   | C4   | 0           |
//! | 64   | E4   | 4           |
//! | 67   | G4   | 7           |
//! | 72   | C5   | 0           |
//!
//! Intervals are always the upward distance modulo 12, so a descending major
//! third (E down to C) is 8, not -4.
//!
//! [`Note`]: note::Note
//! [`VoiceData`]: voice::VoiceData
//! [`PieceEntry`]: piece::PieceEntry
//! [`Pattern`]: pattern::Pattern
//! [`PieceId`]: types::PieceId
//! [`VoiceName`]: types::VoiceName
//! [`MatchMode`]: types::MatchMode

pub mod note;
pub mod pattern;
pub mod piece;
pub mod types;
pub mod voice;
