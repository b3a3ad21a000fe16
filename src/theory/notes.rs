use serde::{Deserialize, Serialize};

use crate::error::PracticeError;

/// Highest valid MIDI note number.
pub const MIDI_NOTE_MAX: u8 = 127;

/// One of the twelve chromatic pitch classes, spelled with sharps.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub enum MusicalNote {
    #[default]
    C,
    #[serde(rename = "C#")]
    CSharp,
    D,
    #[serde(rename = "D#")]
    DSharp,
    E,
    F,
    #[serde(rename = "F#")]
    FSharp,
    G,
    #[serde(rename = "G#")]
    GSharp,
    A,
    #[serde(rename = "A#")]
    ASharp,
    B,
}

impl MusicalNote {
    pub const ALL: [MusicalNote; 12] = [
        MusicalNote::C,
        MusicalNote::CSharp,
        MusicalNote::D,
        MusicalNote::DSharp,
        MusicalNote::E,
        MusicalNote::F,
        MusicalNote::FSharp,
        MusicalNote::G,
        MusicalNote::GSharp,
        MusicalNote::A,
        MusicalNote::ASharp,
        MusicalNote::B,
    ];

    /// Semitones above C, 0..=11.
    pub fn pitch_class(self) -> u8 {
        self as u8
    }

    /// Pitch class for any integer, wrapping around the octave.
    pub fn from_pitch_class(pc: i32) -> Self {
        Self::ALL[pc.rem_euclid(12) as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            MusicalNote::C => "C",
            MusicalNote::CSharp => "C#",
            MusicalNote::D => "D",
            MusicalNote::DSharp => "D#",
            MusicalNote::E => "E",
            MusicalNote::F => "F",
            MusicalNote::FSharp => "F#",
            MusicalNote::G => "G",
            MusicalNote::GSharp => "G#",
            MusicalNote::A => "A",
            MusicalNote::ASharp => "A#",
            MusicalNote::B => "B",
        }
    }

    pub fn transpose(self, semitones: i32) -> Self {
        Self::from_pitch_class(self.pitch_class() as i32 + semitones)
    }

    /// Parse a pitch-class spelling such as "C", "F#" or "Bb".
    pub fn parse(name: &str) -> Result<Self, String> {
        let name = name.trim();
        let mut chars = name.chars();
        let step = chars
            .next()
            .ok_or_else(|| "Empty note name".to_string())?;
        let base = letter_semitones(step.to_ascii_uppercase())
            .ok_or_else(|| format!("Invalid note name: {}", name))?;

        let mut alter = 0;
        for c in chars {
            match c {
                '#' | '♯' => alter += 1,
                'b' | '♭' => alter -= 1,
                _ => return Err(format!("Invalid note name: {}", name)),
            }
        }
        Ok(Self::from_pitch_class(base + alter))
    }
}

fn letter_semitones(step: char) -> Option<i32> {
    match step {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// MIDI number for a note in a given octave, where C4 is 60.
pub fn midi_from_pitch(note: MusicalNote, octave: i32) -> i32 {
    (octave + 1) * 12 + note.pitch_class() as i32
}

/// Accepts an untrusted note number and narrows it to a valid MIDI note.
pub fn validate_midi_note(midi: i32) -> Result<u8, PracticeError> {
    if (0..=MIDI_NOTE_MAX as i32).contains(&midi) {
        Ok(midi as u8)
    } else {
        Err(PracticeError::InvalidMidiNote(midi))
    }
}

/// A pitch class placed in a specific octave; the form highlights are reported in.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NotePosition {
    pub note: MusicalNote,
    pub octave: i8,
}

impl NotePosition {
    pub fn new(note: MusicalNote, octave: i8) -> Self {
        NotePosition { note, octave }
    }

    pub fn from_midi(midi: u8) -> Self {
        NotePosition {
            note: MusicalNote::from_pitch_class(midi as i32),
            octave: (midi / 12) as i8 - 1,
        }
    }

    pub fn midi(&self) -> i32 {
        midi_from_pitch(self.note, self.octave as i32)
    }

    /// The MIDI number, if this position lies on the MIDI keyboard.
    pub fn to_midi_note(&self) -> Option<u8> {
        validate_midi_note(self.midi()).ok()
    }

    pub fn label(&self) -> String {
        format!("{}{}", self.note.name(), self.octave)
    }
}
