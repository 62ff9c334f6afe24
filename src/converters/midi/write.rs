use crate::converters::midi::{model::*, MidiError, Result};
use crate::renderers::midi::defaults::{assign_channel, DEFAULT_VELOCITY};
use midly::num::{u15, u28, u4, u7};
use midly::{Format, MetaMessage, MidiMessage, Smf, Timing, Track, TrackEvent, TrackEventKind};

/// Largest delta time a track event can carry (28-bit VLQ)
const MAX_DELTA: u32 = 0x0FFF_FFFF;

/// Options for SMF serialization
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSettings {
    /// Note-on velocity for every note (1-127)
    pub velocity: u8,
}

impl Default for WriteSettings {
    fn default() -> Self {
        Self {
            velocity: DEFAULT_VELOCITY,
        }
    }
}

/// Write encoded MIDI data as a Standard MIDI File
///
/// One SMF track per `MidiData` track. Channels and programs use MusicXML's
/// 1-based numbering and are converted to 0-based wire values; a track with no
/// channel gets one assigned from its index. Zero-duration notes are not
/// written.
///
/// # Errors
/// Fails when two consecutive events are further apart than a delta time can
/// express.
pub fn write_smf(data: &MidiData, settings: &WriteSettings, out: &mut Vec<u8>) -> Result<()> {
    let format = match data.header.format {
        0 => Format::SingleTrack,
        2 => Format::Sequential,
        _ => Format::Parallel,
    };
    let ticks_per_beat = data.header.ticks_per_beat.min(0x7FFF);

    let tracks: Vec<Track<'static>> = data
        .tracks
        .iter()
        .enumerate()
        .map(|(index, notes)| {
            let channel = data
                .channels
                .get(index)
                .copied()
                .flatten()
                .map(|c| c.saturating_sub(1).min(15))
                .unwrap_or_else(|| assign_channel(index));
            let program = data
                .programs
                .get(index)
                .copied()
                .flatten()
                .map(|p| p.saturating_sub(1).min(127));
            build_track(notes, channel, program, settings.velocity)
        })
        .collect::<Result<_>>()?;

    let smf = Smf {
        header: midly::Header {
            format,
            timing: Timing::Metrical(u15::from(ticks_per_beat)),
        },
        tracks,
    };

    smf.write(out)
        .map_err(|e| MidiError::Write(format!("Failed to write MIDI: {}", e)))?;

    log::debug!(
        "wrote {} tracks at {} ticks/beat ({} bytes)",
        data.tracks.len(),
        ticks_per_beat,
        out.len()
    );
    Ok(())
}

fn build_track(
    notes: &[NoteEvent],
    channel: u8,
    program: Option<u8>,
    velocity: u8,
) -> Result<Track<'static>> {
    let channel = u4::from(channel);
    let velocity = u7::from(velocity.clamp(1, 127));

    // (absolute tick, note-on?, message); offs sort ahead of ons at equal ticks
    let mut timed: Vec<(u32, bool, MidiMessage)> = Vec::with_capacity(notes.len() * 2);
    for note in notes {
        if note.duration == 0 {
            log::debug!("skipping zero-length note {} at {}", note.midi, note.time);
            continue;
        }
        let key = u7::from(note.midi.min(127));
        timed.push((note.time, true, MidiMessage::NoteOn { key, vel: velocity }));
        timed.push((note.end(), false, MidiMessage::NoteOff { key, vel: u7::from(0) }));
    }
    timed.sort_by_key(|(tick, is_on, _)| (*tick, *is_on));

    let mut events = Vec::with_capacity(timed.len() + 2);
    if let Some(program) = program {
        events.push(TrackEvent {
            delta: u28::from(0),
            kind: TrackEventKind::Midi {
                channel,
                message: MidiMessage::ProgramChange {
                    program: u7::from(program),
                },
            },
        });
    }

    let mut prev_tick = 0u32;
    for (tick, _, message) in timed {
        let delta = tick.saturating_sub(prev_tick);
        if delta > MAX_DELTA {
            return Err(MidiError::Write(format!(
                "delta of {} ticks at tick {} exceeds the {} tick limit",
                delta, tick, MAX_DELTA
            )));
        }
        events.push(TrackEvent {
            delta: u28::from(delta),
            kind: TrackEventKind::Midi { channel, message },
        });
        prev_tick = tick;
    }

    events.push(TrackEvent {
        delta: u28::from(0),
        kind: TrackEventKind::Meta(MetaMessage::EndOfTrack),
    });

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(
        tracks: Vec<Vec<NoteEvent>>,
        channels: Vec<Option<u8>>,
        programs: Vec<Option<u8>>,
    ) -> MidiData {
        MidiData {
            header: Header {
                format: 1,
                num_tracks: tracks.len() as u16,
                ticks_per_beat: 480,
            },
            tracks,
            channels,
            programs,
        }
    }

    #[test]
    fn test_write_minimal_smf() {
        let data = data(vec![vec![NoteEvent::new(0, 480, 60)]], vec![Some(1)], vec![Some(1)]);

        let mut out = Vec::new();
        write_smf(&data, &WriteSettings::default(), &mut out).expect("Failed to write SMF");

        assert_eq!(&out[0..4], b"MThd");
        // Format 1, one track, 480 ticks per quarter
        assert_eq!(&out[8..14], &[0x00, 0x01, 0x00, 0x01, 0x01, 0xE0]);
        assert_eq!(&out[14..18], b"MTrk");
    }

    #[test]
    fn test_written_events_are_parsed_back_by_midly() {
        let data = data(
            vec![vec![NoteEvent::new(0, 240, 60), NoteEvent::new(240, 240, 62)]],
            vec![Some(3)],
            vec![Some(41)],
        );
        let mut out = Vec::new();
        write_smf(&data, &WriteSettings { velocity: 90 }, &mut out).unwrap();

        let smf = Smf::parse(&out).expect("midly should parse our output");
        assert_eq!(smf.header.timing, Timing::Metrical(u15::from(480)));
        let track = &smf.tracks[0];

        // program change, on, off, on, off, end of track
        assert_eq!(track.len(), 6);
        assert_eq!(
            track[0].kind,
            TrackEventKind::Midi {
                channel: u4::from(2),
                message: MidiMessage::ProgramChange { program: u7::from(40) },
            }
        );
        assert_eq!(
            track[1].kind,
            TrackEventKind::Midi {
                channel: u4::from(2),
                message: MidiMessage::NoteOn { key: u7::from(60), vel: u7::from(90) },
            }
        );
        // note-off of C4 precedes note-on of D4 at tick 240
        assert_eq!(track[2].delta.as_int(), 240);
        assert!(matches!(
            track[2].kind,
            TrackEventKind::Midi { message: MidiMessage::NoteOff { .. }, .. }
        ));
        assert_eq!(track[3].delta.as_int(), 0);
        assert_eq!(track[5].kind, TrackEventKind::Meta(MetaMessage::EndOfTrack));
    }

    #[test]
    fn test_missing_channel_is_assigned_from_index() {
        let data = data(
            vec![vec![], vec![NoteEvent::new(0, 10, 64)]],
            vec![None, None],
            vec![None, None],
        );
        let mut out = Vec::new();
        write_smf(&data, &WriteSettings::default(), &mut out).unwrap();

        let smf = Smf::parse(&out).unwrap();
        assert_eq!(smf.tracks.len(), 2);
        assert_eq!(smf.tracks[0].len(), 1); // end of track only
        match smf.tracks[1][0].kind {
            TrackEventKind::Midi { channel, .. } => assert_eq!(channel.as_int(), 1),
            ref other => panic!("unexpected event {:?}", other),
        }
    }

    fn note_messages(out: &[u8]) -> Vec<(u32, bool, u8)> {
        let smf = Smf::parse(out).unwrap();
        let mut tick = 0;
        smf.tracks[0]
            .iter()
            .filter_map(|event| {
                tick += event.delta.as_int();
                match event.kind {
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOn { key, .. },
                        ..
                    } => Some((tick, true, key.as_int())),
                    TrackEventKind::Midi {
                        message: MidiMessage::NoteOff { key, .. },
                        ..
                    } => Some((tick, false, key.as_int())),
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn test_zero_length_notes_are_not_written() {
        let data = data(
            vec![vec![NoteEvent::new(0, 0, 60), NoteEvent::new(100, 10, 62)]],
            vec![Some(1)],
            vec![None],
        );
        let mut out = Vec::new();
        write_smf(&data, &WriteSettings::default(), &mut out).unwrap();

        assert_eq!(note_messages(&out), vec![(100, true, 62), (110, false, 62)]);
    }

    #[test]
    fn test_delta_beyond_28_bits_is_an_error() {
        let data = data(
            vec![vec![NoteEvent::new(0x1000_0000, 10, 60)]],
            vec![Some(1)],
            vec![None],
        );
        let mut out = Vec::new();
        let result = write_smf(&data, &WriteSettings::default(), &mut out);
        assert!(matches!(result, Err(MidiError::Write(_))));
    }

    #[test]
    fn test_largest_delta_is_written_exactly() {
        let data = data(
            vec![vec![NoteEvent::new(MAX_DELTA, 10, 60)]],
            vec![Some(1)],
            vec![None],
        );
        let mut out = Vec::new();
        write_smf(&data, &WriteSettings::default(), &mut out).unwrap();

        assert_eq!(
            note_messages(&out),
            vec![(MAX_DELTA, true, 60), (MAX_DELTA + 10, false, 60)]
        );
    }
}
