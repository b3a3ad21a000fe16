//! Both input paths, a connected MIDI keyboard and the on-screen piano, end
//! up here as the same pressed/released pair.

use serde::{Deserialize, Serialize};

use crate::error::PracticeError;
use crate::theory::notes::validate_midi_note;

use super::decode::{decode_message, MidiEvent};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "kind", content = "note", rename_all = "snake_case")]
pub enum NoteInput {
    Pressed(u8),
    Released(u8),
}

impl NoteInput {
    pub fn note(self) -> u8 {
        match self {
            NoteInput::Pressed(n) | NoteInput::Released(n) => n,
        }
    }

    /// Note-on and note-off only; every other message carries no note input.
    pub fn from_event(event: &MidiEvent) -> Option<NoteInput> {
        match *event {
            MidiEvent::NoteOn { note, .. } => Some(NoteInput::Pressed(note)),
            MidiEvent::NoteOff { note, .. } => Some(NoteInput::Released(note)),
            _ => None,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Option<NoteInput> {
        decode_message(data).as_ref().and_then(NoteInput::from_event)
    }

    /// A tap on the virtual keyboard.
    pub fn virtual_press(note: i32) -> Result<NoteInput, PracticeError> {
        validate_midi_note(note).map(NoteInput::Pressed)
    }

    pub fn virtual_release(note: i32) -> Result<NoteInput, PracticeError> {
        validate_midi_note(note).map(NoteInput::Released)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes() {
        assert_eq!(NoteInput::from_bytes(&[0x90, 60, 80]), Some(NoteInput::Pressed(60)));
        assert_eq!(NoteInput::from_bytes(&[0x90, 60, 0]), Some(NoteInput::Released(60)));
        assert_eq!(NoteInput::from_bytes(&[0x80, 62, 0]), Some(NoteInput::Released(62)));
        assert_eq!(NoteInput::from_bytes(&[0xB0, 64, 127]), None);
        assert_eq!(NoteInput::from_bytes(&[0xF8]), None);
    }

    #[test]
    fn test_virtual_paths_converge() {
        assert_eq!(
            NoteInput::virtual_press(60),
            Ok(NoteInput::from_bytes(&[0x95, 60, 1]).unwrap())
        );
        assert_eq!(NoteInput::virtual_release(64), Ok(NoteInput::Released(64)));
    }

    #[test]
    fn test_virtual_rejects_out_of_range() {
        assert_eq!(
            NoteInput::virtual_press(128),
            Err(PracticeError::InvalidMidiNote(128))
        );
        assert!(NoteInput::virtual_release(-5).is_err());
    }
}
