use serde::{Deserialize, Serialize};

use super::notes::{midi_from_pitch, MusicalNote};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArpeggioType {
    #[default]
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Minor7,
    Major7,
}

impl ArpeggioType {
    pub const ALL: [ArpeggioType; 7] = [
        ArpeggioType::Major,
        ArpeggioType::Minor,
        ArpeggioType::Diminished,
        ArpeggioType::Augmented,
        ArpeggioType::Dominant7,
        ArpeggioType::Minor7,
        ArpeggioType::Major7,
    ];

    /// Chord tones within one octave, root first.
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ArpeggioType::Major => &[0, 4, 7],
            ArpeggioType::Minor => &[0, 3, 7],
            ArpeggioType::Diminished => &[0, 3, 6],
            ArpeggioType::Augmented => &[0, 4, 8],
            ArpeggioType::Dominant7 => &[0, 4, 7, 10],
            ArpeggioType::Minor7 => &[0, 3, 7, 10],
            ArpeggioType::Major7 => &[0, 4, 7, 11],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ArpeggioType::Major => "Major",
            ArpeggioType::Minor => "Minor",
            ArpeggioType::Diminished => "Diminished",
            ArpeggioType::Augmented => "Augmented",
            ArpeggioType::Dominant7 => "Dominant 7th",
            ArpeggioType::Minor7 => "Minor 7th",
            ArpeggioType::Major7 => "Major 7th",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ArpeggioOctaves {
    #[default]
    One,
    Two,
}

impl ArpeggioOctaves {
    pub fn count(self) -> i32 {
        match self {
            ArpeggioOctaves::One => 1,
            ArpeggioOctaves::Two => 2,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Arpeggio {
    pub root: MusicalNote,
    pub arpeggio_type: ArpeggioType,
    pub octaves: ArpeggioOctaves,
}

pub fn get_arpeggio(
    root: MusicalNote,
    arpeggio_type: ArpeggioType,
    octaves: ArpeggioOctaves,
) -> Arpeggio {
    Arpeggio {
        root,
        arpeggio_type,
        octaves,
    }
}

impl Arpeggio {
    /// Offsets climbing through every octave and ending on the top root.
    pub fn ascending_offsets(&self) -> Vec<i32> {
        let intervals = self.arpeggio_type.intervals();
        let span = self.octaves.count();
        let mut offsets: Vec<i32> = (0..span)
            .flat_map(|octave| intervals.iter().map(move |&i| octave * 12 + i))
            .collect();
        offsets.push(span * 12);
        offsets
    }

    /// Up then down, the top note played once.
    pub fn full_sequence(&self) -> Vec<i32> {
        let up = self.ascending_offsets();
        let mut sequence = up.clone();
        sequence.extend(up.iter().rev().skip(1));
        sequence
    }

    /// The full up/down sequence as MIDI notes, rooted in `octave`.
    pub fn midi_notes(&self, octave: i32) -> Vec<i32> {
        let root = midi_from_pitch(self.root, octave);
        self.full_sequence().iter().map(|&o| root + o).collect()
    }

    pub fn name(&self) -> String {
        let span = match self.octaves {
            ArpeggioOctaves::One => "1 octave",
            ArpeggioOctaves::Two => "2 octaves",
        };
        format!(
            "{} {} Arpeggio ({})",
            self.root.name(),
            self.arpeggio_type.display_name(),
            span
        )
    }
}
