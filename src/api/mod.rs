//! JavaScript-facing API
//!
//! - `helpers`: serialization and error conversion across the JS boundary
//! - `export`: MIDI import/export entry points

pub mod export;
pub mod helpers;

pub use export::{export_midi_js, from_midi_js, note_sequences_js, to_midi_js};
