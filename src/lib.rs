//! Music notation interchange
//!
//! Standard MIDI File codec and score-tree timelines:
//! - [`from_midi`]: SMF bytes → score tree (one monophonic part)
//! - [`to_midi`]: score tree → MIDI-shaped tracks
//! - [`write_smf`]: MIDI-shaped tracks → SMF bytes
//!
//! Everything is synchronous and allocation-only; each call is independent.

pub mod api;
pub mod converters;
pub mod models;
pub mod renderers;

// Re-export commonly used types
pub use converters::midi::{
    from_midi, write_smf, Header, MalformedError, MidiData, MidiError, NoteEvent, WriteSettings,
};
pub use models::*;
pub use renderers::midi::{to_midi, to_note_sequences, NoteSequence};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if console_log::init_with_level(log::Level::Debug).is_err() {
            log::warn!("logger already initialized");
        }
    }

    log::info!("score-interchange WASM module initialized");
}
