use log::trace;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PracticeError;

/// Buffers longer than this are rejected outright.
pub const MAX_MESSAGE_LEN: usize = 256;

const TIMING_CLOCK: u8 = 0xF8;
const ACTIVE_SENSING: u8 = 0xFE;

/// A MIDI channel, stored 0-based as it appears on the wire. Serialized as
/// the 1-based number players see on their devices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MidiChannel(u8);

impl MidiChannel {
    pub fn new(index: u8) -> Result<Self, PracticeError> {
        if index < 16 {
            Ok(MidiChannel(index))
        } else {
            Err(PracticeError::InvalidMidiChannel(index))
        }
    }

    /// Wire value, 0-15.
    pub fn index(self) -> u8 {
        self.0
    }

    /// Display value, 1-16.
    pub fn number(self) -> u8 {
        self.0 + 1
    }

    fn from_status(status: u8) -> Self {
        MidiChannel(status & 0x0F)
    }
}

impl TryFrom<u8> for MidiChannel {
    type Error = PracticeError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        MidiChannel::new(index)
    }
}

impl Serialize for MidiChannel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.number())
    }
}

impl<'de> Deserialize<'de> for MidiChannel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let number = u8::deserialize(deserializer)?;
        number
            .checked_sub(1)
            .and_then(|index| MidiChannel::new(index).ok())
            .ok_or_else(|| {
                de::Error::custom(format!("MIDI channel {} is out of range (expected 1-16)", number))
            })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MidiEvent {
    NoteOn {
        channel: MidiChannel,
        note: u8,
        velocity: u8,
    },
    NoteOff {
        channel: MidiChannel,
        note: u8,
        velocity: u8,
    },
    ControlChange {
        channel: MidiChannel,
        controller: u8,
        value: u8,
    },
    ProgramChange {
        channel: MidiChannel,
        program: u8,
    },
    /// 14-bit bend, 8192 is centre.
    PitchBend {
        channel: MidiChannel,
        value: u16,
    },
    Other {
        status: u8,
        data: Vec<u8>,
    },
}

impl MidiEvent {
    pub fn channel(&self) -> Option<MidiChannel> {
        match self {
            MidiEvent::NoteOn { channel, .. }
            | MidiEvent::NoteOff { channel, .. }
            | MidiEvent::ControlChange { channel, .. }
            | MidiEvent::ProgramChange { channel, .. }
            | MidiEvent::PitchBend { channel, .. } => Some(*channel),
            MidiEvent::Other { .. } => None,
        }
    }
}

/// Decode one MIDI message. Returns `None` for anything that should not reach
/// the practice session: empty or oversized buffers, clock and active-sensing
/// bytes, data bytes above 127, and truncated channel messages.
pub fn decode_message(data: &[u8]) -> Option<MidiEvent> {
    let (&status, payload) = data.split_first()?;

    if data.len() > MAX_MESSAGE_LEN {
        trace!("rejecting oversized MIDI buffer ({} bytes)", data.len());
        return None;
    }
    if status == TIMING_CLOCK || status == ACTIVE_SENSING {
        return None;
    }
    if status < 0x80 {
        trace!("rejecting MIDI buffer without status byte: {:#04x}", status);
        return None;
    }
    // SysEx terminates with 0xF7, the only status byte allowed in a payload.
    let is_sysex = status == 0xF0;
    if payload
        .iter()
        .any(|&b| b > 0x7F && !(is_sysex && b == 0xF7))
    {
        trace!("rejecting MIDI buffer with out-of-range data byte");
        return None;
    }

    let channel = MidiChannel::from_status(status);
    let event = match status & 0xF0 {
        0x80 => {
            let (note, velocity) = two_data_bytes(payload)?;
            MidiEvent::NoteOff {
                channel,
                note,
                velocity,
            }
        }
        0x90 => {
            let (note, velocity) = two_data_bytes(payload)?;
            if velocity == 0 {
                MidiEvent::NoteOff {
                    channel,
                    note,
                    velocity,
                }
            } else {
                MidiEvent::NoteOn {
                    channel,
                    note,
                    velocity,
                }
            }
        }
        0xB0 => {
            let (controller, value) = two_data_bytes(payload)?;
            MidiEvent::ControlChange {
                channel,
                controller,
                value,
            }
        }
        0xC0 => MidiEvent::ProgramChange {
            channel,
            program: *payload.first()?,
        },
        0xE0 => {
            let (lsb, msb) = two_data_bytes(payload)?;
            MidiEvent::PitchBend {
                channel,
                value: ((msb as u16) << 7) | lsb as u16,
            }
        }
        _ => MidiEvent::Other {
            status,
            data: payload.to_vec(),
        },
    };
    Some(event)
}

fn two_data_bytes(payload: &[u8]) -> Option<(u8, u8)> {
    match payload {
        [a, b, ..] => Some((*a, *b)),
        _ => {
            trace!("rejecting truncated MIDI channel message");
            None
        }
    }
}
