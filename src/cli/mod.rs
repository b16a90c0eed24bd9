//! Command-line interface for chorale-motif.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **search**: Find a melodic pattern in a melody or cadence index
//! - **index**: Show statistics for an index and optionally list its pieces
//!
//! ## Usage
//!
//! ```text
//! # Exact pitch classes and rhythm in every voice
//! chorale-motif search melody_index.json --pattern "C:1 E:1 G:2"
//!
//! # Transposition-invariant search in the bass of each cadence
//! chorale-motif search cadences_meta.json --kind cadence --voice bass \
//!     --mode relative --pattern "G(½) C(½)"
//!
//! # JSON output for scripting
//! chorale-motif search melody_index.json --pattern "D:1 F#:1" --format json
//!
//! # Index statistics
//! chorale-motif index melody_index.json --list
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::catalog::cadence::CadenceIndex;
use crate::catalog::source::VoiceSource;
use crate::catalog::store::MelodyIndex;
use crate::core::piece::PieceEntry;
use crate::core::types::PieceId;

pub mod index;
pub mod search;

#[derive(Parser)]
#[command(name = "chorale-motif")]
#[command(version)]
#[command(about = "Search chorale voices for melodic patterns")]
#[command(
    long_about = "chorale-motif finds every place a short melodic pattern occurs in the voices of a chorale index.\n\nPatterns match in one of two modes:\n- absolute: same pitch classes (octave ignored) and same durations\n- relative: same intervals mod 12 and same durations, in any key"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search an index for a melodic pattern
    Search(search::SearchArgs),

    /// Show statistics for an index
    Index(index::IndexArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Layout of the index file
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum IndexKind {
    /// Whole chorales, one record per piece
    #[default]
    Melody,
    /// Cadence excerpts keyed by cadence id
    Cadence,
}

impl IndexKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Melody => "melody",
            Self::Cadence => "cadence",
        }
    }

    /// Singular and plural names of the entries, for summaries
    pub fn item_names(self) -> (&'static str, &'static str) {
        match self {
            Self::Melody => ("piece", "pieces"),
            Self::Cadence => ("cadence", "cadences"),
        }
    }
}

/// An index loaded from disk
pub enum LoadedIndex {
    Melody(MelodyIndex),
    Cadence(CadenceIndex),
}

impl LoadedIndex {
    /// Load an index file of the given kind
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path, kind: IndexKind) -> anyhow::Result<Self> {
        let loaded = match kind {
            IndexKind::Melody => Self::Melody(MelodyIndex::load_from_file(path)?),
            IndexKind::Cadence => Self::Cadence(CadenceIndex::load_from_file(path)?),
        };
        Ok(loaded)
    }

    pub fn source(&self) -> &dyn VoiceSource {
        match self {
            Self::Melody(index) => index,
            Self::Cadence(index) => index,
        }
    }

    /// Pieces in index order
    pub fn entries(&self) -> Vec<&PieceEntry> {
        match self {
            Self::Melody(index) => index.pieces.iter().collect(),
            Self::Cadence(index) => index.cadences.iter().map(|c| &c.piece).collect(),
        }
    }

    pub fn entry(&self, id: &PieceId) -> Option<&PieceEntry> {
        match self {
            Self::Melody(index) => index.get(id),
            Self::Cadence(index) => index.get(id).map(|c| &c.piece),
        }
    }

    /// Extra description shown next to a piece, if the index carries one
    pub fn detail(&self, id: &PieceId) -> Option<String> {
        let Self::Cadence(index) = self else {
            return None;
        };
        let cadence = index.get(id)?;

        let mut parts = Vec::new();
        if let Some(kind) = &cadence.cadence_type {
            parts.push(kind.clone());
        }
        match (cadence.start_measure, cadence.end_measure) {
            (Some(start), Some(end)) if start != end => parts.push(format!("mm. {start}-{end}")),
            (Some(start), _) => parts.push(format!("m. {start}")),
            _ => {}
        }

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    pub fn len(&self) -> usize {
        self.source().piece_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
