use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::note::{duration_label, interval, pitch_class_name};
use crate::utils::validation::{is_valid_duration, is_valid_pitch_class};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    #[error("Invalid pitch class {0}: expected 0-11")]
    InvalidPitchClass(i64),

    #[error("Invalid duration {0}: must be a positive number of quarter notes")]
    InvalidDuration(f64),

    #[error("Unknown note name '{0}'")]
    UnknownNoteName(String),

    #[error("Invalid pattern token '{token}': {reason}")]
    InvalidToken { token: String, reason: String },
}

/// One user-entered pattern element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PatternNote {
    pub pitch_class: u8,
    pub duration: f64,
}

/// A melodic query built one note at a time
///
/// Pitches are pitch classes, so a pattern is octave-agnostic by construction.
/// The only mutations are [`Pattern::append`] and [`Pattern::clear`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pattern {
    notes: Vec<PatternNote>,
}

/// Snapshot of a pattern in the form the matcher consumes
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedPattern {
    pub pitches: Vec<u8>,
    pub durations: Vec<f64>,
    /// `(pitches[i + 1] - pitches[i] + 12) % 12`; empty for patterns shorter than 2
    pub intervals: Vec<u8>,
}

impl DerivedPattern {
    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pattern from (pitch class, duration) pairs
    ///
    /// # Errors
    ///
    /// Returns the first validation error encountered.
    pub fn from_pairs(pairs: &[(i64, f64)]) -> Result<Self, PatternError> {
        let mut pattern = Self::new();
        for &(pitch_class, duration) in pairs {
            pattern.append(pitch_class, duration)?;
        }
        Ok(pattern)
    }

    /// Append a note to the end of the pattern
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidPitchClass` if `pitch_class` is outside 0-11,
    /// or `PatternError::InvalidDuration` if `duration` is not positive and finite.
    pub fn append(&mut self, pitch_class: i64, duration: f64) -> Result<(), PatternError> {
        if !is_valid_pitch_class(pitch_class) {
            return Err(PatternError::InvalidPitchClass(pitch_class));
        }
        if !is_valid_duration(duration) {
            return Err(PatternError::InvalidDuration(duration));
        }

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // checked 0..12 above
        self.notes.push(PatternNote {
            pitch_class: pitch_class as u8,
            duration,
        });
        Ok(())
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn notes(&self) -> &[PatternNote] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Split the current notes into pitch, duration and interval sequences
    pub fn derive(&self) -> DerivedPattern {
        let pitches: Vec<u8> = self.notes.iter().map(|n| n.pitch_class).collect();
        let durations = self.notes.iter().map(|n| n.duration).collect();
        let intervals = pitches.windows(2).map(|w| interval(w[0], w[1])).collect();

        DerivedPattern {
            pitches,
            durations,
            intervals,
        }
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.notes.is_empty() {
            return write!(f, "(No melody entered)");
        }

        let parts: Vec<String> = self
            .notes
            .iter()
            .map(|n| {
                format!(
                    "{}({})",
                    pitch_class_name(n.pitch_class),
                    duration_label(n.duration)
                )
            })
            .collect();
        write!(f, "{}", parts.join(" – "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_and_derive() {
        let pattern = Pattern::from_pairs(&[(0, 1.0), (4, 1.0), (7, 2.0)]).unwrap();
        let derived = pattern.derive();

        assert_eq!(derived.pitches, vec![0, 4, 7]);
        assert_eq!(derived.durations, vec![1.0, 1.0, 2.0]);
        assert_eq!(derived.intervals, vec![4, 3]);
        assert_eq!(derived.len(), 3);
    }

    #[test]
    fn test_descending_interval_wraps() {
        let pattern = Pattern::from_pairs(&[(4, 1.0), (0, 1.0), (11, 1.0)]).unwrap();
        assert_eq!(pattern.derive().intervals, vec![8, 11]);
    }

    #[test]
    fn test_single_note_has_no_intervals() {
        let pattern = Pattern::from_pairs(&[(9, 0.5)]).unwrap();
        let derived = pattern.derive();
        assert_eq!(derived.len(), 1);
        assert!(derived.intervals.is_empty());
    }

    #[test]
    fn test_append_validation() {
        let mut pattern = Pattern::new();
        assert_eq!(
            pattern.append(12, 1.0),
            Err(PatternError::InvalidPitchClass(12))
        );
        assert_eq!(
            pattern.append(-1, 1.0),
            Err(PatternError::InvalidPitchClass(-1))
        );
        assert_eq!(pattern.append(0, 0.0), Err(PatternError::InvalidDuration(0.0)));
        assert!(pattern.is_empty());
    }

    #[test]
    fn test_clear_resets_derivation() {
        let mut pattern = Pattern::from_pairs(&[(0, 1.0), (2, 1.0)]).unwrap();
        pattern.clear();
        let derived = pattern.derive();
        assert!(derived.is_empty());
        assert!(derived.intervals.is_empty());

        pattern.append(5, 2.0).unwrap();
        assert_eq!(pattern.derive().pitches, vec![5]);
    }

    #[test]
    fn test_display() {
        assert_eq!(Pattern::new().to_string(), "(No melody entered)");
        let pattern = Pattern::from_pairs(&[(0, 1.0), (6, 0.5)]).unwrap();
        assert_eq!(pattern.to_string(), "C(¼) – F#(8th)");
    }
}
