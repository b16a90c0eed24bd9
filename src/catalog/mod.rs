//! Voice index storage and access.
//!
//! An index holds the precomputed voice arrays of a corpus. It is built once
//! when the corpus is loaded and never modified afterwards. Two shapes exist:
//!
//! - [`MelodyIndex`]: one entry per chorale, keyed by Riemenschneider number
//! - [`CadenceIndex`]: one entry per cadence excerpt cut from a chorale
//!
//! Both implement [`VoiceSource`], the only view of an index the matcher
//! needs, so a search runs the same way over either shape (or over a plain
//! `Vec<PieceEntry>` in tests).
//!
//! ## Example
//!
//! ```rust,no_run
//! use chorale_motif::catalog::store::MelodyIndex;
//! use chorale_motif::catalog::stats::IndexStats;
//! use std::path::Path;
//!
//! let index = MelodyIndex::load_from_file(Path::new("data/melody_index.json")).unwrap();
//! let stats = IndexStats::collect(&index);
//! println!("{} pieces, {} notes", stats.pieces, stats.total_notes());
//! ```
//!
//! [`MelodyIndex`]: store::MelodyIndex
//! [`CadenceIndex`]: cadence::CadenceIndex
//! [`VoiceSource`]: source::VoiceSource

pub mod cadence;
pub mod source;
pub mod stats;
pub mod store;
