use serde::{Deserialize, Serialize};

use crate::core::note::{interval, pitch_class, Note};
use crate::core::types::Measure;

/// One voice of a piece stored as parallel arrays
///
/// `pitches`, `durations` and `measures` are expected to have the same length.
/// `measures` may also be empty when the source carries no measure numbers.
/// Nothing here enforces the invariant: index files are external data and a
/// voice that breaks it is simply never matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VoiceData {
    /// MIDI note numbers; `None` marks a rest
    pub pitches: Vec<Option<u8>>,

    /// Durations in quarter notes
    pub durations: Vec<f64>,

    /// Measure each note starts in
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub measures: Vec<Measure>,
}

impl VoiceData {
    pub fn new(pitches: Vec<u8>, durations: Vec<f64>) -> Self {
        Self {
            pitches: pitches.into_iter().map(Some).collect(),
            durations,
            measures: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_measures(mut self, measures: Vec<u32>) -> Self {
        self.measures = measures.into_iter().map(Some).collect();
        self
    }

    pub fn from_notes(notes: &[Note]) -> Self {
        let has_measures = notes.iter().any(|n| n.measure.is_some());
        Self {
            pitches: notes.iter().map(|n| n.pitch).collect(),
            durations: notes.iter().map(|n| n.duration).collect(),
            measures: if has_measures {
                notes.iter().map(|n| n.measure).collect()
            } else {
                Vec::new()
            },
        }
    }

    /// Number of notes, taken from the duration array
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    /// Check that the parallel arrays line up
    pub fn is_well_formed(&self) -> bool {
        self.pitches.len() == self.durations.len()
            && (self.measures.is_empty() || self.measures.len() == self.durations.len())
    }

    /// Measure of the note at `index`, unknown when the voice has no measures
    pub fn measure_at(&self, index: usize) -> Measure {
        self.measures.get(index).copied().flatten()
    }

    /// Pitch class of every note; rests stay `None`
    pub fn pitch_classes(&self) -> Vec<Option<u8>> {
        self.pitches.iter().map(|p| p.map(pitch_class)).collect()
    }

    /// Upward interval mod 12 between each pair of adjacent notes.
    ///
    /// Has one entry fewer than the voice; an interval touching a rest is `None`.
    pub fn intervals(&self) -> Vec<Option<u8>> {
        self.pitches
            .windows(2)
            .map(|pair| match (pair[0], pair[1]) {
                (Some(a), Some(b)) => Some(interval(a, b)),
                _ => None,
            })
            .collect()
    }
}
