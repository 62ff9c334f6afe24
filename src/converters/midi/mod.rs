//! Standard MIDI File codec
//!
//! Decodes SMF bytes into a score tree and writes encoded `MidiData` back out
//! as SMF bytes. The score-to-`MidiData` direction lives in
//! [`crate::renderers::midi`].

mod model;
mod parse;
mod pitch;
mod reader;
mod track;
mod write;

pub use model::*;
pub use parse::{from_midi, read_header, read_note_events, reconstruct_timeline};
pub use pitch::{midi_to_pitch, pitch_to_midi};
pub use reader::ByteReader;
pub use track::{read_track_notes, NoteAccumulator, TrackReader};
pub use write::{write_smf, WriteSettings};

use thiserror::Error;

/// Top-level codec error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MidiError {
    /// Chunk magic is not what the file layout requires
    #[error("expected {expected:?} chunk at offset {offset}, found {found:?}")]
    InvalidChunk {
        expected: &'static str,
        found: String,
        offset: usize,
    },

    /// Division field uses SMPTE frames instead of ticks per quarter note
    #[error("unsupported SMPTE time division 0x{0:04X}")]
    UnsupportedTiming(u16),

    /// Byte stream ended early or contains an impossible encoding
    #[error("malformed midi file: {0}")]
    Malformed(#[from] MalformedError),

    #[error("midi write error: {0}")]
    Write(String),
}

/// Structural damage found while reading bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedError {
    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("variable-length quantity at offset {offset} exceeds 4 bytes")]
    VlqTooLong { offset: usize },

    #[error("header chunk length {length} is shorter than 6 bytes")]
    HeaderTooShort { length: u32 },

    #[error("data byte at offset {offset} with no running status")]
    MissingRunningStatus { offset: usize },
}

impl MidiError {
    /// True for damage in the byte stream (as opposed to wrong chunk magic)
    pub fn is_malformed(&self) -> bool {
        matches!(self, MidiError::Malformed(_))
    }
}

pub type Result<T> = std::result::Result<T, MidiError>;
