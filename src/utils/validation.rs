//! Centralized validation helpers.

/// Highest MIDI note number
pub const MAX_MIDI_PITCH: u8 = 127;

/// Number of pitch classes in an octave
pub const PITCH_CLASSES: u8 = 12;

/// Check that a value is a pitch class (0-11).
///
/// # Examples
///
/// ```
/// use chorale_motif::utils::validation::is_valid_pitch_class;
///
/// assert!(is_valid_pitch_class(0));
/// assert!(is_valid_pitch_class(11));
/// assert!(!is_valid_pitch_class(12));
/// assert!(!is_valid_pitch_class(-1));
/// ```
#[must_use]
pub fn is_valid_pitch_class(value: i64) -> bool {
    (0..i64::from(PITCH_CLASSES)).contains(&value)
}

/// Check that a value is a MIDI note number (0-127).
#[must_use]
pub fn is_valid_midi_pitch(value: i64) -> bool {
    (0..=i64::from(MAX_MIDI_PITCH)).contains(&value)
}

/// Check that a duration is a usable note length: finite and strictly positive.
///
/// # Examples
///
/// ```
/// use chorale_motif::utils::validation::is_valid_duration;
///
/// assert!(is_valid_duration(0.25));
/// assert!(!is_valid_duration(0.0));
/// assert!(!is_valid_duration(f64::NAN));
/// ```
#[must_use]
pub fn is_valid_duration(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midi_range() {
        assert!(is_valid_midi_pitch(0));
        assert!(is_valid_midi_pitch(127));
        assert!(!is_valid_midi_pitch(128));
        assert!(!is_valid_midi_pitch(-3));
    }

    #[test]
    fn test_duration_rejects_negative_and_infinite() {
        assert!(!is_valid_duration(-1.0));
        assert!(!is_valid_duration(f64::INFINITY));
        assert!(is_valid_duration(4.0));
    }
}
