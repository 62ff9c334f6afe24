//! Default values for MIDI export
//!
//! Provides the fixed time base, velocity and channel assignment used when a
//! score does not say otherwise.

/// Ticks per quarter note written into every encoded header
///
/// Independent of the score's own divisions: encoded times are the score's
/// raw duration units.
pub const DEFAULT_TPQ: u16 = 480;

/// SMF format of encoded data (one track per part)
pub const DEFAULT_FORMAT: u16 = 1;

/// Default MIDI velocity (1-127, where 64 is "normal")
pub const DEFAULT_VELOCITY: u8 = 64;

/// Assign MIDI channel from part index
/// - Channels 0-15 are available
/// - Channel 9 (10 in 1-indexed) is reserved for drums
/// - Skip channel 9 for melodic instruments
pub fn assign_channel(part_index: usize) -> u8 {
    let channel = part_index % 16;
    if channel >= 9 {
        ((channel + 1) % 16) as u8
    } else {
        channel as u8
    }
}
