//! Pitch <-> MIDI note number mapping
//!
//! Encoding is exact for any spelling. Decoding picks one canonical spelling
//! per pitch class, preferring sharps, so a D-flat comes back as C-sharp.
//! Round trips preserve the sounding pitch, not the written spelling.

use crate::models::{Pitch, Step};

/// Canonical spelling per pitch class (index = midi % 12)
const SPELLINGS: [(Step, Option<i8>); 12] = [
    (Step::C, None),
    (Step::C, Some(1)),
    (Step::D, None),
    (Step::D, Some(1)),
    (Step::E, None),
    (Step::F, None),
    (Step::F, Some(1)),
    (Step::G, None),
    (Step::G, Some(1)),
    (Step::A, None),
    (Step::A, Some(1)),
    (Step::B, None),
];

/// Convert a written pitch to a MIDI note number
///
/// `midi = (octave + 1) * 12 + semitone(step) + alter`, clamped to 0-127.
/// MIDI 60 = C4 (middle C).
pub fn pitch_to_midi(pitch: &Pitch) -> u8 {
    let alter = pitch.alter.unwrap_or(0) as i32;
    let midi = (pitch.octave as i32 + 1) * 12 + pitch.step.semitone() + alter;
    midi.clamp(0, 127) as u8
}

/// Convert a MIDI note number to its canonical (sharp-preferring) spelling
pub fn midi_to_pitch(midi: u8) -> Pitch {
    let (step, alter) = SPELLINGS[(midi % 12) as usize];
    let octave = (midi / 12) as i8 - 1;
    Pitch::new(step, alter, octave)
}
