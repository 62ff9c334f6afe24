//! Score tree exchanged with the notation collaborators
//!
//! This is the partwise shape the MusicXML/JSON/YAML layers produce and consume.
//! Field names serialize in camelCase so the tree can cross the JSON and JS
//! boundaries unchanged.
//!
//! ```text
//! Score
//! ├── partList.scoreParts[]      (id, partName, midiInstruments[])
//! └── parts[]
//!     └── measures[]
//!         └── content[]          Note { pitch | rest, duration }
//! ```

use serde::{Deserialize, Serialize};

use super::pitch::Pitch;

/// Version string written on freshly built scores
pub const SCORE_VERSION: &str = "4.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub version: String,
    pub part_list: PartList,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartList {
    pub score_parts: Vec<ScorePart>,
}

/// Part-list entry describing one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePart {
    pub id: String,
    pub part_name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub midi_instruments: Vec<MidiInstrument>,
}

/// MIDI playback settings declared for a part (MusicXML numbering, 1-based)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MidiInstrument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midi_channel: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub midi_program: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub id: String,
    pub measures: Vec<Measure>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measure {
    pub number: String,
    #[serde(default)]
    pub content: Vec<Note>,
}

/// A note or a rest. Exactly one of `pitch` and `rest` is present on
/// values built through [`Note::pitched`] and [`Note::rest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<Pitch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest: Option<Rest>,
    /// Duration in the part's own time units
    pub duration: u32,
}

/// Rest marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rest {}

impl Score {
    pub fn new(part_list: PartList, parts: Vec<Part>) -> Self {
        Self {
            version: SCORE_VERSION.to_string(),
            part_list,
            parts,
        }
    }

    /// Look up the part-list entry for a part id
    pub fn score_part(&self, id: &str) -> Option<&ScorePart> {
        self.part_list.score_parts.iter().find(|p| p.id == id)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Score> {
        serde_json::from_str(json)
    }
}

impl ScorePart {
    pub fn new(id: impl Into<String>, part_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            part_name: part_name.into(),
            midi_instruments: Vec::new(),
        }
    }

    /// First declared MIDI instrument, which drives MIDI channel/program
    pub fn first_midi_instrument(&self) -> Option<&MidiInstrument> {
        self.midi_instruments.first()
    }
}

impl Measure {
    pub fn new(number: impl Into<String>, content: Vec<Note>) -> Self {
        Self {
            number: number.into(),
            content,
        }
    }
}

impl Note {
    pub fn pitched(pitch: Pitch, duration: u32) -> Self {
        Self {
            pitch: Some(pitch),
            rest: None,
            duration,
        }
    }

    pub fn rest(duration: u32) -> Self {
        Self {
            pitch: None,
            rest: Some(Rest {}),
            duration,
        }
    }

    pub fn is_rest(&self) -> bool {
        self.rest.is_some()
    }
}
