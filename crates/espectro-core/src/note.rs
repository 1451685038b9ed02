//! Equal-tempered note math.
//!
//! Converts between frequencies in Hz and note names with octaves, using
//! A4 = 440 Hz as the reference (MIDI note 69). Shared by the spectrum
//! display (grid labels) and the dominant-frequency timeline (human-readable
//! entries).

use thiserror::Error;

/// The twelve semitone names of an octave, starting at C.
pub const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Semitone offset of A within [`NOTE_NAMES`].
const A_SEMITONE: i32 = 9;

/// MIDI number of A4.
const A4_MIDI: i32 = 69;

/// Reference tuning frequency for A4, in Hz.
pub const A4_HZ: f32 = 440.0;

/// A note name with its octave and canonical equal-tempered frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteLabel {
    /// Note name from [`NOTE_NAMES`].
    pub name: &'static str,
    /// Octave in scientific pitch notation (A4 = 440 Hz, C4 = middle C).
    pub octave: i32,
    /// Equal-tempered frequency of this note, in Hz.
    pub frequency_hz: f32,
}

impl std::fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.name, self.octave)
    }
}

/// Errors from note/frequency conversion.
#[derive(Debug, Error, PartialEq)]
pub enum NoteError {
    /// Frequency was zero, negative, or non-finite.
    #[error("frequency {0} Hz cannot be mapped to a note")]
    InvalidFrequency(f32),

    /// Note name not present in [`NOTE_NAMES`].
    #[error("unknown note name '{0}'")]
    UnknownNote(String),
}

/// Convert a frequency to the nearest equal-tempered note.
///
/// Computes the semitone distance from A4 as `12 * log2(f / 440)`, rounds to
/// the nearest semitone, and derives name and octave from the resulting MIDI
/// number.
///
/// Non-positive or non-finite input is a programming error (the callers
/// work on a fixed, validated frequency range), so it fails loudly in
/// debug builds and returns an error rather than guessing a note.
pub fn frequency_to_note(freq_hz: f32) -> Result<NoteLabel, NoteError> {
    if !freq_hz.is_finite() || freq_hz <= 0.0 {
        debug_assert!(
            false,
            "frequency_to_note called with invalid frequency {freq_hz}"
        );
        return Err(NoteError::InvalidFrequency(freq_hz));
    }

    let semitones_from_a4 = 12.0 * (freq_hz / A4_HZ).log2();
    let midi = semitones_from_a4.round() as i32 + A4_MIDI;
    Ok(label_for_midi(midi))
}

/// Convert a note name and octave to its equal-tempered frequency.
pub fn note_to_frequency(name: &str, octave: i32) -> Result<f32, NoteError> {
    let semitone = NOTE_NAMES
        .iter()
        .position(|&n| n == name)
        .ok_or_else(|| NoteError::UnknownNote(name.to_string()))? as i32;

    let semitones_from_a4 = semitone - A_SEMITONE + (octave - 4) * 12;
    Ok(A4_HZ * (semitones_from_a4 as f32 / 12.0).exp2())
}

/// Frequency of a MIDI note number.
pub fn midi_to_frequency(midi: i32) -> f32 {
    A4_HZ * ((midi - A4_MIDI) as f32 / 12.0).exp2()
}

/// Note label for a MIDI note number.
pub fn label_for_midi(midi: i32) -> NoteLabel {
    let octave = midi.div_euclid(12) - 1;
    let name = NOTE_NAMES[midi.rem_euclid(12) as usize];
    NoteLabel {
        name,
        octave,
        frequency_hz: midi_to_frequency(midi),
    }
}

/// The C of every octave whose frequency falls inside `[min_freq, max_freq]`.
///
/// These are the gridline positions of the spectrum display. Labels depend
/// only on the fixed display range, so the renderer computes them once per
/// draw and caches the result.
pub fn note_gridlines(min_freq: f32, max_freq: f32) -> Vec<NoteLabel> {
    debug_assert!(min_freq > 0.0 && max_freq > min_freq);
    (-1..=10)
        .map(|octave| {
            // C is semitone 0, so its MIDI number is 12 * (octave + 1)
            label_for_midi(12 * (octave + 1))
        })
        .filter(|label| label.frequency_hz >= min_freq && label.frequency_hz <= max_freq)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_a4_is_440() {
        let label = frequency_to_note(440.0).unwrap();
        assert_eq!(label.name, "A");
        assert_eq!(label.octave, 4);
        assert!((label.frequency_hz - 440.0).abs() < 1e-3);
    }

    #[test]
    fn test_middle_c() {
        let label = frequency_to_note(261.63).unwrap();
        assert_eq!(label.name, "C");
        assert_eq!(label.octave, 4);
    }

    #[test]
    fn test_rounds_to_nearest_semitone() {
        // 450 Hz is ~0.39 semitones above A4: still A4
        let label = frequency_to_note(450.0).unwrap();
        assert_eq!((label.name, label.octave), ("A", 4));

        // 460 Hz is ~0.77 semitones above A4: rounds up to A#4
        let label = frequency_to_note(460.0).unwrap();
        assert_eq!((label.name, label.octave), ("A#", 4));
    }

    #[test]
    fn test_note_to_frequency_reference_points() {
        assert!((note_to_frequency("A", 4).unwrap() - 440.0).abs() < 1e-3);
        assert!((note_to_frequency("C", 4).unwrap() - 261.626).abs() < 0.01);
        assert!((note_to_frequency("E", 2).unwrap() - 82.407).abs() < 0.01);
    }

    #[test]
    fn test_unknown_note_name() {
        assert_eq!(
            note_to_frequency("H", 4).unwrap_err(),
            NoteError::UnknownNote("H".to_string())
        );
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_invalid_frequency_rejected() {
        assert!(frequency_to_note(0.0).is_err());
        assert!(frequency_to_note(-10.0).is_err());
        assert!(frequency_to_note(f32::NAN).is_err());
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_invalid_frequency_asserts_in_debug() {
        let _ = frequency_to_note(0.0);
    }

    #[test]
    fn test_roundtrip_midi_range() {
        for midi in 12..=120 {
            let freq = midi_to_frequency(midi);
            let label = frequency_to_note(freq).unwrap();
            let expected = label_for_midi(midi);
            assert_eq!(
                (label.name, label.octave),
                (expected.name, expected.octave),
                "roundtrip failed for midi {midi}"
            );
        }
    }

    #[test]
    fn test_gridlines_cover_display_range() {
        let lines = note_gridlines(20.0, 8000.0);
        // C1 (~32.7 Hz) through C8 (~4186 Hz)
        assert_eq!(lines.len(), 8);
        assert_eq!((lines[0].name, lines[0].octave), ("C", 1));
        assert_eq!(
            (lines.last().unwrap().name, lines.last().unwrap().octave),
            ("C", 8)
        );
        for pair in lines.windows(2) {
            assert!(pair[0].frequency_hz < pair[1].frequency_hz);
        }
    }

    #[test]
    fn test_display_format() {
        assert_eq!(label_for_midi(69).to_string(), "A4");
        assert_eq!(label_for_midi(60).to_string(), "C4");
    }
}
