use serde::{Deserialize, Serialize};

use crate::error::PracticeError;

use super::chords::{get_chord, voice_lead, Chord, ChordInversion, ChordType};
use super::notes::MusicalNote;
use super::scales::{get_scale, ScaleType};

/// A chord symbol relative to the key, e.g. "ii", "V7" or "bVII".
///
/// Degrees are zero-based and resolve against the major scale of the key;
/// `accidental` shifts the root chromatically.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RomanNumeral {
    pub symbol: String,
    pub degree: usize,
    pub accidental: i32,
    pub chord_type: ChordType,
}

const NUMERALS: [(&str, usize); 7] = [
    ("VII", 6),
    ("III", 2),
    ("VI", 5),
    ("IV", 3),
    ("II", 1),
    ("V", 4),
    ("I", 0),
];

impl RomanNumeral {
    pub fn parse(symbol: &str) -> Result<Self, PracticeError> {
        let invalid = || PracticeError::InvalidRomanNumeral(symbol.to_string());
        let trimmed = symbol.trim();

        let (accidental, rest) = if let Some(rest) = trimmed.strip_prefix('b') {
            (-1, rest)
        } else if let Some(rest) = trimmed.strip_prefix('#') {
            (1, rest)
        } else {
            (0, trimmed)
        };

        let (numeral, degree) = NUMERALS
            .iter()
            .find_map(|&(numeral, degree)| {
                let head = rest.get(..numeral.len())?;
                if head == numeral || head == numeral.to_lowercase() {
                    Some((head, degree))
                } else {
                    None
                }
            })
            .ok_or_else(invalid)?;
        let upper = numeral.chars().all(|c| c.is_ascii_uppercase());
        let suffix = &rest[numeral.len()..];

        let chord_type = match (suffix, upper) {
            ("", true) => ChordType::Major,
            ("", false) => ChordType::Minor,
            ("7", true) => ChordType::Dominant7,
            ("7", false) => ChordType::Minor7,
            ("maj7" | "M7", _) => ChordType::Major7,
            ("°" | "o" | "dim", _) => ChordType::Diminished,
            ("°7" | "o7" | "dim7", _) => ChordType::Diminished7,
            ("ø" | "ø7", _) => ChordType::HalfDiminished7,
            ("+" | "aug", _) => ChordType::Augmented,
            _ => return Err(invalid()),
        };

        Ok(RomanNumeral {
            symbol: trimmed.to_string(),
            degree,
            accidental,
            chord_type,
        })
    }

    /// Concrete root of this numeral in `key`.
    pub fn root_in(&self, key: MusicalNote) -> MusicalNote {
        let scale = get_scale(key, ScaleType::Major);
        key.transpose(scale.degree_offset(self.degree) + self.accidental)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionDifficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Whether chords are re-voiced to minimise hand movement or all played in
/// root position.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VoiceLeading {
    Smooth,
    RootPosition,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChordProgression {
    pub name: String,
    pub numerals: Vec<RomanNumeral>,
    pub difficulty: ProgressionDifficulty,
    pub voice_leading: VoiceLeading,
}

impl ChordProgression {
    pub fn new(
        name: &str,
        symbols: &[&str],
        difficulty: ProgressionDifficulty,
        voice_leading: VoiceLeading,
    ) -> Result<Self, PracticeError> {
        let numerals = symbols
            .iter()
            .map(|s| RomanNumeral::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ChordProgression {
            name: name.to_string(),
            numerals,
            difficulty,
            voice_leading,
        })
    }

    pub fn roman_numerals(&self) -> Vec<&str> {
        self.numerals.iter().map(|n| n.symbol.as_str()).collect()
    }
}

pub const DEFAULT_PROGRESSION_NAME: &str = "I-V";

const LIBRARY: [(&str, &[&str], ProgressionDifficulty); 12] = [
    ("I-V", &["I", "V"], ProgressionDifficulty::Beginner),
    ("I-IV-V-I", &["I", "IV", "V", "I"], ProgressionDifficulty::Beginner),
    ("I-V-vi-IV", &["I", "V", "vi", "IV"], ProgressionDifficulty::Beginner),
    ("I-vi-IV-V", &["I", "vi", "IV", "V"], ProgressionDifficulty::Beginner),
    ("ii-V-I", &["ii", "V", "I"], ProgressionDifficulty::Intermediate),
    ("vi-IV-I-V", &["vi", "IV", "I", "V"], ProgressionDifficulty::Intermediate),
    ("I-IV-vi-V", &["I", "IV", "vi", "V"], ProgressionDifficulty::Intermediate),
    ("i-iv-v-i", &["i", "iv", "v", "i"], ProgressionDifficulty::Intermediate),
    ("i-bVI-bIII-bVII", &["i", "bVI", "bIII", "bVII"], ProgressionDifficulty::Intermediate),
    ("I-bVII-IV-I", &["I", "bVII", "IV", "I"], ProgressionDifficulty::Intermediate),
    ("ii7-V7-Imaj7", &["ii7", "V7", "Imaj7"], ProgressionDifficulty::Advanced),
    ("iii-vi-ii-V-I", &["iii", "vi", "ii", "V", "I"], ProgressionDifficulty::Advanced),
];

/// Built-in progressions, easiest first.
pub fn progression_library() -> Vec<ChordProgression> {
    LIBRARY
        .iter()
        .filter_map(|&(name, symbols, difficulty)| {
            ChordProgression::new(name, symbols, difficulty, VoiceLeading::Smooth).ok()
        })
        .collect()
}

pub fn find_progression(name: &str) -> Result<ChordProgression, PracticeError> {
    progression_library()
        .into_iter()
        .find(|p| p.name == name)
        .ok_or_else(|| PracticeError::UnknownProgression(name.to_string()))
}

/// The I-V progression used when chord-progression practice starts without
/// an explicit selection.
pub fn default_progression() -> ChordProgression {
    ChordProgression {
        name: DEFAULT_PROGRESSION_NAME.to_string(),
        numerals: vec![
            RomanNumeral {
                symbol: "I".to_string(),
                degree: 0,
                accidental: 0,
                chord_type: ChordType::Major,
            },
            RomanNumeral {
                symbol: "V".to_string(),
                degree: 4,
                accidental: 0,
                chord_type: ChordType::Major,
            },
        ],
        difficulty: ProgressionDifficulty::Beginner,
        voice_leading: VoiceLeading::Smooth,
    }
}

pub fn generate_progression_chords(progression: &ChordProgression, key: MusicalNote) -> Vec<Chord> {
    let chords: Vec<(MusicalNote, ChordType)> = progression
        .numerals
        .iter()
        .map(|n| (n.root_in(key), n.chord_type))
        .collect();

    match progression.voice_leading {
        VoiceLeading::Smooth => voice_lead(&chords),
        VoiceLeading::RootPosition => chords
            .into_iter()
            .map(|(root, chord_type)| get_chord(root, chord_type, ChordInversion::Root))
            .collect(),
    }
}
