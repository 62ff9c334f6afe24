//! Score-to-MIDI conversion
//!
//! Flattens each part of a score tree into a linear note timeline and packs
//! the timelines into a MIDI-shaped `MidiData`.

use serde::{Deserialize, Serialize};

use super::defaults::{DEFAULT_FORMAT, DEFAULT_TPQ};
use crate::converters::midi::{pitch_to_midi, Header, MidiData, NoteEvent};
use crate::models::{Part, Score};

/// One part's flattened timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSequence {
    pub part_id: String,
    pub notes: Vec<NoteEvent>,
}

/// Flatten a part into `(time, duration, midi)` events
///
/// Measures and their content are walked in document order with a single
/// cursor in the part's raw duration units (no normalization against
/// divisions). Pitched notes emit an event and advance the cursor; rests only
/// advance it.
pub fn sequence_part(part: &Part) -> Vec<NoteEvent> {
    let mut notes = Vec::new();
    let mut cursor = 0u32;

    for measure in &part.measures {
        for note in &measure.content {
            if let Some(pitch) = &note.pitch {
                notes.push(NoteEvent::new(cursor, note.duration, pitch_to_midi(pitch)));
            }
            cursor = cursor.saturating_add(note.duration);
        }
    }

    notes
}

/// Flatten every part of a score, keeping part ids
pub fn to_note_sequences(score: &Score) -> Vec<NoteSequence> {
    score
        .parts
        .iter()
        .map(|part| NoteSequence {
            part_id: part.id.clone(),
            notes: sequence_part(part),
        })
        .collect()
}

/// Encode a score as MIDI-shaped data, one track per part
///
/// Channel and program come from the first MIDI instrument declared for the
/// part in the part list, if any. The header's ticks per beat is always
/// [`DEFAULT_TPQ`]; note times are the score's raw duration units, so a
/// consumer needs the score's divisions to interpret them.
///
/// Never fails.
pub fn to_midi(score: &Score) -> MidiData {
    let mut tracks = Vec::with_capacity(score.parts.len());
    let mut channels = Vec::with_capacity(score.parts.len());
    let mut programs = Vec::with_capacity(score.parts.len());

    for part in &score.parts {
        let instrument = score
            .score_part(&part.id)
            .and_then(|sp| sp.first_midi_instrument());

        tracks.push(sequence_part(part));
        channels.push(instrument.and_then(|i| i.midi_channel));
        programs.push(instrument.and_then(|i| i.midi_program));
    }

    log::debug!(
        "encoded {} parts, {} notes",
        tracks.len(),
        tracks.iter().map(Vec::len).sum::<usize>()
    );

    MidiData {
        header: Header {
            format: DEFAULT_FORMAT,
            num_tracks: score.parts.len().min(u16::MAX as usize) as u16,
            ticks_per_beat: DEFAULT_TPQ,
        },
        tracks,
        channels,
        programs,
    }
}
