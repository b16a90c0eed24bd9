use serde::{Deserialize, Serialize};

use crate::core::types::Measure;

/// Pitch class names using sharps, indexed by pitch class
pub const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// A single note of a voice
///
/// `pitch` is a MIDI note number; `None` marks a rest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Option<u8>,

    /// Length in quarter notes (quarter = 1.0)
    pub duration: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measure: Measure,
}

impl Note {
    pub fn new(pitch: u8, duration: f64) -> Self {
        Self {
            pitch: Some(pitch),
            duration,
            measure: None,
        }
    }

    pub fn rest(duration: f64) -> Self {
        Self {
            pitch: None,
            duration,
            measure: None,
        }
    }

    #[must_use]
    pub fn in_measure(mut self, measure: u32) -> Self {
        self.measure = Some(measure);
        self
    }

    pub fn pitch_class(&self) -> Option<u8> {
        self.pitch.map(pitch_class)
    }
}

/// Fold a MIDI pitch to its pitch class (0 = C, 11 = B)
#[inline]
pub fn pitch_class(midi: u8) -> u8 {
    midi % 12
}

/// Upward distance in semitones from one pitch class to the next, in `0..12`
#[inline]
pub fn interval(from: u8, to: u8) -> u8 {
    (to % 12 + 12 - from % 12) % 12
}

/// Parse a note name such as `C`, `F#`, `Bb` or `Eb4` into a pitch class.
///
/// The octave number, if any, is ignored.
pub fn parse_pitch_class(name: &str) -> Option<u8> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();

    let base: i32 = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave) = if let Some(stripped) = rest.strip_prefix('#') {
        (1, stripped)
    } else if let Some(stripped) = rest.strip_prefix('b') {
        (-1, stripped)
    } else {
        (0, rest)
    };

    let octave = octave.strip_prefix('-').unwrap_or(octave);
    if !octave.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)] // rem_euclid(12) is 0..12
    Some((base + accidental).rem_euclid(12) as u8)
}

/// Name of a pitch class, using sharps
pub fn pitch_class_name(pc: u8) -> &'static str {
    PITCH_CLASS_NAMES[usize::from(pc % 12)]
}

/// Parse a duration given as a number of quarter notes or a note-value label
pub fn parse_duration(s: &str) -> Option<f64> {
    let value = match s.trim().to_lowercase().as_str() {
        "16th" | "sixteenth" | "s" => 0.25,
        "8th" | "eighth" | "e" => 0.5,
        "q" | "quarter" | "¼" => 1.0,
        "h" | "half" | "½" => 2.0,
        "w" | "whole" => 4.0,
        other => other.parse::<f64>().ok()?,
    };
    Some(value)
}

/// Short label for a duration, falling back to the number itself
pub fn duration_label(duration: f64) -> String {
    #[allow(clippy::float_cmp)] // labels only exist for exact note values
    let label = if duration == 0.25 {
        "16th"
    } else if duration == 0.5 {
        "8th"
    } else if duration == 1.0 {
        "¼"
    } else if duration == 2.0 {
        "½"
    } else if duration == 4.0 {
        "w"
    } else {
        return duration.to_string();
    };
    label.to_string()
}
