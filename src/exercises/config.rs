use serde::{Deserialize, Serialize};

use crate::theory::arpeggios::{ArpeggioOctaves, ArpeggioType};
use crate::theory::chords::ChordType;
use crate::theory::notes::MusicalNote;
use crate::theory::progressions::{default_progression, ChordProgression};
use crate::theory::scales::ScaleType;

/// Octave the right hand plays in; the left hand plays one octave lower.
pub const RIGHT_HAND_OCTAVE: i32 = 4;
pub const LEFT_HAND_OCTAVE: i32 = RIGHT_HAND_OCTAVE - 1;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum HandSelection {
    Left,
    #[default]
    Right,
    Both,
}

impl HandSelection {
    pub fn display_name(self) -> &'static str {
        match self {
            HandSelection::Left => "Left Hand",
            HandSelection::Right => "Right Hand",
            HandSelection::Both => "Both Hands",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PracticeMode {
    #[default]
    Scales,
    Arpeggios,
    ChordsByKey,
    ChordsByType,
    ChordProgressions,
}

impl PracticeMode {
    pub const ALL: [PracticeMode; 5] = [
        PracticeMode::Scales,
        PracticeMode::Arpeggios,
        PracticeMode::ChordsByKey,
        PracticeMode::ChordsByType,
        PracticeMode::ChordProgressions,
    ];
}

/// Everything one practice mode needs to build its exercise.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ExerciseConfig {
    Scales {
        key: MusicalNote,
        scale_type: ScaleType,
        hands: HandSelection,
    },
    Arpeggios {
        root: MusicalNote,
        arpeggio_type: ArpeggioType,
        octaves: ArpeggioOctaves,
        hands: HandSelection,
    },
    ChordsByKey {
        key: MusicalNote,
        scale_type: ScaleType,
    },
    ChordsByType {
        chord_type: ChordType,
        include_inversions: bool,
    },
    ChordProgressions {
        key: MusicalNote,
        progression: ChordProgression,
    },
}

impl ExerciseConfig {
    pub fn mode(&self) -> PracticeMode {
        match self {
            ExerciseConfig::Scales { .. } => PracticeMode::Scales,
            ExerciseConfig::Arpeggios { .. } => PracticeMode::Arpeggios,
            ExerciseConfig::ChordsByKey { .. } => PracticeMode::ChordsByKey,
            ExerciseConfig::ChordsByType { .. } => PracticeMode::ChordsByType,
            ExerciseConfig::ChordProgressions { .. } => PracticeMode::ChordProgressions,
        }
    }
}

/// The flat set of selections a configuration screen edits. Only the fields
/// relevant to `mode` feed into the generated exercise.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PracticeSettings {
    pub mode: PracticeMode,
    pub key: MusicalNote,
    pub scale_type: ScaleType,
    pub root_note: MusicalNote,
    pub arpeggio_type: ArpeggioType,
    pub arpeggio_octaves: ArpeggioOctaves,
    pub chord_progression: Option<ChordProgression>,
    pub chord_type: ChordType,
    pub include_inversions: bool,
    pub hand_selection: HandSelection,
}

impl PracticeSettings {
    pub fn to_config(&self) -> ExerciseConfig {
        match self.mode {
            PracticeMode::Scales => ExerciseConfig::Scales {
                key: self.key,
                scale_type: self.scale_type,
                hands: self.hand_selection,
            },
            PracticeMode::Arpeggios => ExerciseConfig::Arpeggios {
                root: self.root_note,
                arpeggio_type: self.arpeggio_type,
                octaves: self.arpeggio_octaves,
                hands: self.hand_selection,
            },
            PracticeMode::ChordsByKey => ExerciseConfig::ChordsByKey {
                key: self.key,
                scale_type: self.scale_type,
            },
            PracticeMode::ChordsByType => ExerciseConfig::ChordsByType {
                chord_type: self.chord_type,
                include_inversions: self.include_inversions,
            },
            PracticeMode::ChordProgressions => ExerciseConfig::ChordProgressions {
                key: self.key,
                progression: self
                    .chord_progression
                    .clone()
                    .unwrap_or_else(default_progression),
            },
        }
    }
}
