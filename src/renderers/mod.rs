//! Renderers
//!
//! Score-tree walkers that produce export-shaped data.

pub mod midi;

pub use midi::{to_midi, to_note_sequences, NoteSequence};
