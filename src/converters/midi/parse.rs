use crate::converters::midi::{
    model::*, pitch::midi_to_pitch, reader::ByteReader, track::read_track_notes, MalformedError,
    MidiError, Result,
};
use crate::models::{Measure, Note, Part, PartList, Score, ScorePart};

const HEADER_MAGIC: &str = "MThd";
const TRACK_MAGIC: &str = "MTrk";

/// Bytes of format/numTracks/division every header chunk carries
const HEADER_FIELDS_LEN: u32 = 6;

/// Division values with the high bit set are SMPTE frame timing
const SMPTE_DIVISION_FLAG: u16 = 0x8000;

const DECODED_PART_ID: &str = "P1";
const DECODED_PART_NAME: &str = "Part 1";
const DECODED_MEASURE_NUMBER: &str = "1";

/// Decode Standard MIDI File bytes into a score tree
///
/// Every track's notes are merged into one monophonic line inside a single
/// part `P1` with a single measure `1`. Gaps between notes become rests.
/// Simultaneous notes are not grouped into chords or voices; they follow
/// each other in onset order.
///
/// Durations are in the file's ticks; the header's ticks per beat is not
/// recorded in the tree.
///
/// # Errors
/// Fails without a partial result on bad chunk magic, SMPTE timing or
/// truncated/malformed data.
pub fn from_midi(bytes: &[u8]) -> Result<Score> {
    let (header, events) = read_note_events(bytes)?;
    let content = reconstruct_timeline(&events);

    log::debug!(
        "decoded {} notes from {} tracks (format {}, {} ticks/beat) into {} items",
        events.len(),
        header.num_tracks,
        header.format,
        header.ticks_per_beat,
        content.len()
    );

    let part_list = PartList {
        score_parts: vec![ScorePart::new(DECODED_PART_ID, DECODED_PART_NAME)],
    };
    let part = Part {
        id: DECODED_PART_ID.to_string(),
        measures: vec![Measure::new(DECODED_MEASURE_NUMBER, content)],
    };

    Ok(Score::new(part_list, vec![part]))
}

/// Read the header and every track, returning all notes ordered by onset
///
/// The sort is stable: notes with equal onsets keep file order (track by
/// track, then emission order within a track).
pub fn read_note_events(bytes: &[u8]) -> Result<(Header, Vec<NoteEvent>)> {
    let mut reader = ByteReader::new(bytes);
    let header = read_header(&mut reader)?;

    let mut events = Vec::new();
    for index in 0..header.num_tracks {
        expect_chunk(&mut reader, TRACK_MAGIC)?;
        let len = reader.read_u32_be()?;
        let body = reader.take(len as usize)?;
        let notes = read_track_notes(body)?;
        log::trace!("track {}: {} bytes, {} notes", index, len, notes.len());
        events.extend(notes);
    }

    events.sort_by_key(|e| e.time);
    Ok((header, events))
}

/// Read the `MThd` chunk, skipping any bytes past the standard six
pub fn read_header(reader: &mut ByteReader<'_>) -> Result<Header> {
    expect_chunk(reader, HEADER_MAGIC)?;
    let length = reader.read_u32_be()?;
    if length < HEADER_FIELDS_LEN {
        return Err(MalformedError::HeaderTooShort { length }.into());
    }

    let mut body = reader.take(length as usize)?;
    let format = body.read_u16_be()?;
    let num_tracks = body.read_u16_be()?;
    let division = body.read_u16_be()?;

    if division & SMPTE_DIVISION_FLAG != 0 {
        return Err(MidiError::UnsupportedTiming(division));
    }

    Ok(Header {
        format,
        num_tracks,
        ticks_per_beat: division,
    })
}

/// Lay time-ordered notes out as one line of notes and rests
///
/// A running cursor starts at 0. Each event starting after the cursor is
/// preceded by a rest filling the gap; the cursor then moves to the event's
/// end. Overlapping events produce no rest.
pub fn reconstruct_timeline(events: &[NoteEvent]) -> Vec<Note> {
    let mut content = Vec::with_capacity(events.len());
    let mut cursor = 0u32;

    for event in events {
        if event.time > cursor {
            content.push(Note::rest(event.time - cursor));
        }
        content.push(Note::pitched(midi_to_pitch(event.midi), event.duration));
        cursor = event.end();
    }

    content
}

fn expect_chunk(reader: &mut ByteReader<'_>, magic: &'static str) -> Result<()> {
    let offset = reader.position();
    let tag = reader.read_tag()?;
    if tag.as_slice() != magic.as_bytes() {
        return Err(MidiError::InvalidChunk {
            expected: magic,
            found: String::from_utf8_lossy(&tag).into_owned(),
            offset,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Pitch, Step};

    fn header_bytes(division: u16, num_tracks: u16) -> Vec<u8> {
        let mut bytes = b"MThd".to_vec();
        bytes.extend_from_slice(&6u32.to_be_bytes());
        bytes.extend_from_slice(&1u16.to_be_bytes());
        bytes.extend_from_slice(&num_tracks.to_be_bytes());
        bytes.extend_from_slice(&division.to_be_bytes());
        bytes
    }

    fn track_bytes(body: &[u8]) -> Vec<u8> {
        let mut bytes = b"MTrk".to_vec();
        bytes.extend_from_slice(&(body.len() as u32).to_be_bytes());
        bytes.extend_from_slice(body);
        bytes
    }

    #[test]
    fn test_read_header_skips_extra_header_bytes() {
        let mut bytes = b"MThd".to_vec();
        bytes.extend_from_slice(&8u32.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x01, 0x00, 0x02, 0x00, 0x60, 0xAA, 0xBB]);
        bytes.extend_from_slice(b"MTrk");

        let mut reader = ByteReader::new(&bytes);
        let header = read_header(&mut reader).unwrap();
        assert_eq!(
            header,
            Header {
                format: 1,
                num_tracks: 2,
                ticks_per_beat: 96
            }
        );
        assert_eq!(reader.position(), 16);
    }

    #[test]
    fn test_read_header_rejects_smpte_division() {
        let bytes = header_bytes(0xE728, 0);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(read_header(&mut reader), Err(MidiError::UnsupportedTiming(0xE728)));
    }

    #[test]
    fn test_read_header_rejects_short_length() {
        let mut bytes = b"MThd".to_vec();
        bytes.extend_from_slice(&4u32.to_be_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 1]);
        let mut reader = ByteReader::new(&bytes);
        assert_eq!(
            read_header(&mut reader),
            Err(MidiError::Malformed(MalformedError::HeaderTooShort { length: 4 }))
        );
    }

    #[test]
    fn test_bad_track_magic() {
        let mut bytes = header_bytes(480, 1);
        bytes.extend_from_slice(b"MTrx\x00\x00\x00\x00");
        assert_eq!(
            read_note_events(&bytes),
            Err(MidiError::InvalidChunk {
                expected: "MTrk",
                found: "MTrx".to_string(),
                offset: 14
            })
        );
    }

    #[test]
    fn test_tracks_merge_stably_by_onset() {
        let mut bytes = header_bytes(480, 2);
        // Track 0: E4 at 0..10, G4 at 20..30
        bytes.extend(track_bytes(&[
            0x00, 0x90, 0x40, 0x40, 0x0A, 0x80, 0x40, 0x40, //
            0x0A, 0x90, 0x43, 0x40, 0x0A, 0x80, 0x43, 0x40,
        ]));
        // Track 1: C4 at 0..5
        bytes.extend(track_bytes(&[0x00, 0x90, 0x3C, 0x40, 0x05, 0x80, 0x3C, 0x40]));

        let (header, events) = read_note_events(&bytes).unwrap();
        assert_eq!(header.num_tracks, 2);
        assert_eq!(
            events,
            vec![
                NoteEvent::new(0, 10, 64),
                NoteEvent::new(0, 5, 60),
                NoteEvent::new(20, 10, 67),
            ]
        );
    }

    #[test]
    fn test_reconstruct_inserts_rest_for_gap() {
        let events = [NoteEvent::new(0, 100, 60), NoteEvent::new(250, 50, 62)];
        assert_eq!(
            reconstruct_timeline(&events),
            vec![
                Note::pitched(Pitch::natural(Step::C, 4), 100),
                Note::rest(150),
                Note::pitched(Pitch::natural(Step::D, 4), 50),
            ]
        );
    }

    #[test]
    fn test_reconstruct_leading_rest() {
        let events = [NoteEvent::new(96, 96, 61)];
        assert_eq!(
            reconstruct_timeline(&events),
            vec![Note::rest(96), Note::pitched(Pitch::new(Step::C, Some(1), 4), 96)]
        );
    }

    #[test]
    fn test_reconstruct_overlap_has_no_rest() {
        let events = [NoteEvent::new(0, 480, 60), NoteEvent::new(0, 240, 64)];
        let content = reconstruct_timeline(&events);
        assert_eq!(content.len(), 2);
        assert!(content.iter().all(|n| !n.is_rest()));
    }

    #[test]
    fn test_truncated_track_chunk() {
        let mut bytes = header_bytes(480, 1);
        bytes.extend_from_slice(b"MTrk");
        bytes.extend_from_slice(&20u32.to_be_bytes());
        bytes.extend_from_slice(&[0x00, 0x90, 0x3C, 0x40]);
        let err = from_midi(&bytes).unwrap_err();
        assert!(err.is_malformed());
    }
}
