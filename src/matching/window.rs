//! Per-voice window checks.
//!
//! A [`ScanVoice`] is a voice folded to pitch classes once, so every window
//! test is a plain slice comparison. Rests fold to `None` and never compare
//! equal to a pattern value.

use crate::core::pattern::DerivedPattern;
use crate::core::voice::VoiceData;

/// A well-formed voice prepared for scanning
#[derive(Debug)]
pub struct ScanVoice<'a> {
    pitch_classes: Vec<Option<u8>>,
    intervals: Vec<Option<u8>>,
    durations: &'a [f64],
}

impl<'a> ScanVoice<'a> {
    /// Prepare a voice, or `None` if its arrays disagree in length
    pub fn prepare(voice: &'a VoiceData, with_intervals: bool) -> Option<Self> {
        if !voice.is_well_formed() {
            return None;
        }

        Some(Self {
            pitch_classes: voice.pitch_classes(),
            intervals: if with_intervals {
                voice.intervals()
            } else {
                Vec::new()
            },
            durations: &voice.durations,
        })
    }

    fn len(&self) -> usize {
        self.durations.len()
    }

    /// Start offsets a pattern of `pattern_len` notes can be aligned at
    pub fn starts(&self, pattern_len: usize) -> std::ops::Range<usize> {
        if pattern_len == 0 || self.len() < pattern_len {
            return 0..0;
        }
        0..self.len() - pattern_len + 1
    }

    /// Exact duration equality at every position of the window
    #[allow(clippy::float_cmp)] // durations compare by exact unit value
    pub fn rhythm_matches(&self, pattern: &DerivedPattern, start: usize) -> bool {
        self.durations[start..start + pattern.len()] == pattern.durations[..]
    }

    /// Pitch class and duration at every position
    pub fn matches_absolute(&self, pattern: &DerivedPattern, start: usize) -> bool {
        let window = &self.pitch_classes[start..start + pattern.len()];
        window
            .iter()
            .zip(&pattern.pitches)
            .all(|(pc, target)| *pc == Some(*target))
            && self.rhythm_matches(pattern, start)
    }

    /// Interval sequence and duration at every position
    ///
    /// A voice prepared without intervals matches no multi-note pattern.
    pub fn matches_relative(&self, pattern: &DerivedPattern, start: usize) -> bool {
        if !self.rhythm_matches(pattern, start) {
            return false;
        }
        let Some(window) = self.intervals.get(start..start + pattern.intervals.len()) else {
            return false;
        };
        window
            .iter()
            .zip(&pattern.intervals)
            .all(|(iv, target)| *iv == Some(*target))
    }
}
