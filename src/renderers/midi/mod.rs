//! Score-to-MIDI encoding
//!
//! This module turns a score tree into MIDI-shaped data: each part becomes a
//! flat `(time, duration, midi)` timeline carrying the part's MIDI channel and
//! program. Serializing that data to file bytes is done by
//! [`crate::converters::midi::write_smf`].
//!
//! # Usage
//! ```rust,ignore
//! use score_interchange::renderers::midi::to_midi;
//! use score_interchange::converters::midi::{write_smf, WriteSettings};
//!
//! let data = to_midi(&score);
//! let mut bytes = Vec::new();
//! write_smf(&data, &WriteSettings::default(), &mut bytes)?;
//! ```

pub mod converter;
pub mod defaults;

pub use converter::{sequence_part, to_midi, to_note_sequences, NoteSequence};
pub use defaults::{DEFAULT_FORMAT, DEFAULT_TPQ, DEFAULT_VELOCITY};
