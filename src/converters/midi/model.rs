/// MIDI-shaped in-memory interchange types
///
/// These sit between the byte-level codec and the score tree: the decoder
/// produces `NoteEvent`s from track chunks, the encoder produces a `MidiData`
/// from a score. Times and durations are in ticks.
use serde::{Deserialize, Serialize};

/// Header chunk fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    pub format: u16,
    pub num_tracks: u16,
    pub ticks_per_beat: u16, // Ticks per quarter note
}

/// A sounding note recovered from (or destined for) a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteEvent {
    pub time: u32,
    pub duration: u32,
    pub midi: u8, // MIDI note number 0-127
}

/// Encoded score: one note array per part plus per-part channel/program
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MidiData {
    pub header: Header,
    pub tracks: Vec<Vec<NoteEvent>>,
    #[serde(default)]
    pub channels: Vec<Option<u8>>,
    #[serde(default)]
    pub programs: Vec<Option<u8>>,
}

impl NoteEvent {
    pub fn new(time: u32, duration: u32, midi: u8) -> Self {
        Self {
            time,
            duration,
            midi,
        }
    }

    /// Tick at which the note stops sounding
    pub fn end(&self) -> u32 {
        self.time.saturating_add(self.duration)
    }
}
