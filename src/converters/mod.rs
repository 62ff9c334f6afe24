//! Format converters
//!
//! This module contains converters between binary interchange formats and the
//! score tree.

pub mod midi;

// Re-export for convenience
pub use midi::{from_midi, write_smf, MalformedError, MidiData, MidiError, NoteEvent, WriteSettings};
