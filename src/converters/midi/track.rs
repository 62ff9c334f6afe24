//! Track chunk walking and note-on/note-off pairing
//!
//! A track chunk is a run of `(delta-time, event)` pairs. [`TrackReader`]
//! walks them with MIDI running status, feeds note messages into a
//! [`NoteAccumulator`], and skips everything else by its declared or fixed
//! length.

use crate::converters::midi::model::NoteEvent;
use crate::converters::midi::reader::ByteReader;
use crate::converters::midi::MalformedError;

const META_END_OF_TRACK: u8 = 0x2F;

/// Open onset per MIDI pitch for one track
///
/// At most one onset is open per pitch. A second note-on for a pitch that is
/// already sounding replaces the earlier onset, which is then lost.
#[derive(Debug, Clone)]
pub struct NoteAccumulator {
    active: [Option<u32>; 128],
    events: Vec<NoteEvent>,
}

impl Default for NoteAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl NoteAccumulator {
    pub fn new() -> Self {
        Self {
            active: [None; 128],
            events: Vec::new(),
        }
    }

    pub fn note_on(&mut self, pitch: u8, time: u32) {
        let slot = &mut self.active[(pitch & 0x7F) as usize];
        if let Some(earlier) = slot.replace(time) {
            log::debug!("pitch {} retriggered at {}, dropping onset at {}", pitch, time, earlier);
        }
    }

    pub fn note_off(&mut self, pitch: u8, time: u32) {
        let pitch = pitch & 0x7F;
        match self.active[pitch as usize].take() {
            Some(onset) if time > onset => {
                log::trace!("note {} from {} to {}", pitch, onset, time);
                self.events.push(NoteEvent::new(onset, time - onset, pitch));
            }
            Some(onset) => {
                log::debug!("dropping zero-length note {} at {}", pitch, onset);
            }
            None => {
                log::trace!("dropping unmatched note-off for pitch {} at {}", pitch, time);
            }
        }
    }

    /// Completed notes in emission order. Notes still open are dropped.
    pub fn finish(self) -> Vec<NoteEvent> {
        let dangling = self.active.iter().filter(|slot| slot.is_some()).count();
        if dangling > 0 {
            log::debug!("dropping {} notes still sounding at end of track", dangling);
        }
        self.events
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    EndOfTrack,
}

/// Event walker over exactly one track chunk's bytes
pub struct TrackReader<'a> {
    reader: ByteReader<'a>,
    clock: u32,
    running_status: Option<u8>,
    notes: NoteAccumulator,
}

impl<'a> TrackReader<'a> {
    /// `reader` must cover the chunk body only (see [`ByteReader::take`])
    pub fn new(reader: ByteReader<'a>) -> Self {
        Self {
            reader,
            clock: 0,
            running_status: None,
            notes: NoteAccumulator::new(),
        }
    }

    /// Walk the chunk until end-of-track or its last byte and return its notes
    pub fn read_notes(mut self) -> Result<Vec<NoteEvent>, MalformedError> {
        while !self.reader.is_at_end() {
            if self.next_event()? == Flow::EndOfTrack {
                break;
            }
        }
        Ok(self.notes.finish())
    }

    fn next_event(&mut self) -> Result<Flow, MalformedError> {
        // Delta time
        let delta = self.reader.read_vlq()?;
        self.clock = self.clock.saturating_add(delta);

        // Status byte, or the first data byte under running status
        let offset = self.reader.position();
        let byte = self.reader.read_u8()?;
        let (status, pending) = if byte & 0x80 != 0 {
            self.running_status = Some(byte);
            (byte, None)
        } else {
            match self.running_status {
                Some(status) => (status, Some(byte)),
                None => return Err(MalformedError::MissingRunningStatus { offset }),
            }
        };

        self.dispatch(status, pending)
    }

    fn dispatch(&mut self, status: u8, mut pending: Option<u8>) -> Result<Flow, MalformedError> {
        match status & 0xF0 {
            0x80 => {
                let key = self.data_byte(&mut pending)?;
                self.data_byte(&mut pending)?;
                self.notes.note_off(key, self.clock);
            }
            0x90 => {
                let key = self.data_byte(&mut pending)?;
                let vel = self.data_byte(&mut pending)?;
                if vel == 0 {
                    self.notes.note_off(key, self.clock);
                } else {
                    self.notes.note_on(key, self.clock);
                }
            }
            0xC0 | 0xD0 => {
                self.data_byte(&mut pending)?;
            }
            0xA0 | 0xB0 | 0xE0 => {
                self.data_byte(&mut pending)?;
                self.data_byte(&mut pending)?;
            }
            _ => return self.system_event(status, pending),
        }
        Ok(Flow::Continue)
    }

    fn system_event(
        &mut self,
        status: u8,
        mut pending: Option<u8>,
    ) -> Result<Flow, MalformedError> {
        match status {
            0xFF => {
                let kind = self.data_byte(&mut pending)?;
                let len = self.reader.read_vlq()? as usize;
                self.reader.skip(len)?;
                if kind == META_END_OF_TRACK {
                    return Ok(Flow::EndOfTrack);
                }
            }
            0xF0 | 0xF7 => {
                // A pending data byte is a complete one-byte length
                let len = match pending.take() {
                    Some(len) => len as usize,
                    None => self.reader.read_vlq()? as usize,
                };
                self.reader.skip(len)?;
            }
            0xF2 => {
                self.data_byte(&mut pending)?;
                self.data_byte(&mut pending)?;
            }
            0xF1 | 0xF3 => {
                self.data_byte(&mut pending)?;
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    fn data_byte(&mut self, pending: &mut Option<u8>) -> Result<u8, MalformedError> {
        match pending.take() {
            Some(byte) => Ok(byte),
            None => self.reader.read_u8(),
        }
    }
}

/// Read all completed notes from one track chunk body
pub fn read_track_notes(body: ByteReader<'_>) -> Result<Vec<NoteEvent>, MalformedError> {
    TrackReader::new(body).read_notes()
}
