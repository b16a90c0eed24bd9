use serde::{Deserialize, Serialize};

/// Measure number a note starts in. `None` means the measure is unknown,
/// which is distinct from any real measure number.
pub type Measure = Option<u32>;

/// Identifier of a piece (or cadence excerpt) in an index
///
/// `number` is the primary catalog number (Riemenschneider numbering for the
/// chorales). `secondary` carries an optional second identifier such as the
/// BWV number or a cadence excerpt id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId {
    pub number: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
}

impl PieceId {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            secondary: None,
        }
    }

    #[must_use]
    pub fn with_secondary(mut self, secondary: impl Into<String>) -> Self {
        self.secondary = Some(secondary.into());
        self
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.secondary {
            Some(secondary) => write!(f, "{} ({secondary})", self.number),
            None => write!(f, "{}", self.number),
        }
    }
}

/// One of the four chorale voices, ordered top to bottom
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum VoiceName {
    Soprano,
    Alto,
    Tenor,
    Bass,
}

impl VoiceName {
    /// All voices in declared (scan) order
    pub const ALL: [VoiceName; 4] = [Self::Soprano, Self::Alto, Self::Tenor, Self::Bass];

    /// Parse a part name as it appears in corpus files ("Soprano", "S", "bass", ...)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "soprano" | "s" | "sop" | "cantus" => Some(Self::Soprano),
            "alto" | "a" | "alt" => Some(Self::Alto),
            "tenor" | "t" | "ten" => Some(Self::Tenor),
            "bass" | "b" | "bas" | "basso" => Some(Self::Bass),
            _ => None,
        }
    }

    /// Voice for a zero-based part position in a four-part score
    pub fn from_part_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Capitalized name for display
    pub fn label(self) -> &'static str {
        match self {
            Self::Soprano => "Soprano",
            Self::Alto => "Alto",
            Self::Tenor => "Tenor",
            Self::Bass => "Bass",
        }
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Soprano => write!(f, "soprano"),
            Self::Alto => write!(f, "alto"),
            Self::Tenor => write!(f, "tenor"),
            Self::Bass => write!(f, "bass"),
        }
    }
}

/// How pattern pitches are compared against a voice
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Literal pitch class and duration at every position
    #[default]
    Absolute,
    /// Interval sequence (mod 12) and duration, independent of transposition
    Relative,
}

impl MatchMode {
    /// Smallest pattern this mode can meaningfully search for
    pub fn min_notes(self) -> usize {
        match self {
            Self::Absolute => 1,
            // A single note carries no interval
            Self::Relative => 2,
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absolute => write!(f, "absolute"),
            Self::Relative => write!(f, "relative"),
        }
    }
}
