//! MIDI import/export operations for the WASM API
//!
//! - `fromMidi`: SMF bytes → score tree
//! - `toMidi`: score tree → MIDI-shaped data (no file bytes)
//! - `noteSequences`: score tree → per-part note timelines
//! - `exportMidi`: score tree → SMF bytes

use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize, js_error, serialize};
use crate::converters::midi::{from_midi, write_smf, WriteSettings};
use crate::models::Score;
use crate::renderers::midi::{to_midi, to_note_sequences};

// ============================================================================
// MIDI Import
// ============================================================================

/// Decode a Standard MIDI File into a score tree
///
/// # Returns
/// Score object (single part `P1`, single measure `1`)
#[wasm_bindgen(js_name = fromMidi)]
pub fn from_midi_js(bytes: &[u8]) -> Result<JsValue, JsValue> {
    log::info!("fromMidi called with {} bytes", bytes.len());

    let score = from_midi(bytes).map_err(|e| js_error("MIDI import error", e))?;
    serialize(&score, "Score serialization error")
}

// ============================================================================
// MIDI Export
// ============================================================================

/// Encode a score tree as MIDI-shaped data
///
/// # Returns
/// `{header, tracks, channels, programs}`
#[wasm_bindgen(js_name = toMidi)]
pub fn to_midi_js(score: JsValue) -> Result<JsValue, JsValue> {
    let score: Score = deserialize(score, "Invalid score")?;
    log::info!("toMidi called with {} parts", score.parts.len());

    serialize(&to_midi(&score), "MIDI data serialization error")
}

/// Flatten every part of a score tree into `(time, duration, midi)` events
#[wasm_bindgen(js_name = noteSequences)]
pub fn note_sequences_js(score: JsValue) -> Result<JsValue, JsValue> {
    let score: Score = deserialize(score, "Invalid score")?;
    serialize(&to_note_sequences(&score), "Note sequence serialization error")
}

/// Encode a score tree and write it as a Standard MIDI File
///
/// # Parameters
/// - `velocity`: note-on velocity, use 0 for default (64)
///
/// # Returns
/// MIDI file as Uint8Array
#[wasm_bindgen(js_name = exportMidi)]
pub fn export_midi_js(score: JsValue, velocity: u8) -> Result<js_sys::Uint8Array, JsValue> {
    let score: Score = deserialize(score, "Invalid score")?;

    let mut settings = WriteSettings::default();
    if velocity != 0 {
        settings.velocity = velocity;
    }

    let mut midi_bytes = Vec::new();
    write_smf(&to_midi(&score), &settings, &mut midi_bytes)
        .map_err(|e| js_error("MIDI export error", e))?;

    log::info!("exportMidi generated {} bytes", midi_bytes.len());

    let uint8_array = js_sys::Uint8Array::new_with_length(midi_bytes.len() as u32);
    uint8_array.copy_from(&midi_bytes);
    Ok(uint8_array)
}
