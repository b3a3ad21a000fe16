use serde::{Deserialize, Serialize};

use super::notes::{midi_from_pitch, MusicalNote, NotePosition};
use super::scales::Scale;

/// Octave the root sits in when no voicing decision has moved it.
pub const CHORD_BASE_OCTAVE: i8 = 4;

/// Voiced chords are kept within C3..=C6 so they stay playable by one hand
/// near the middle of the keyboard.
pub const VOICING_LOW: i32 = 48;
pub const VOICING_HIGH: i32 = 84;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChordType {
    #[default]
    Major,
    Minor,
    Diminished,
    Augmented,
    Major7,
    Minor7,
    Dominant7,
    Diminished7,
    HalfDiminished7,
}

impl ChordType {
    pub const ALL: [ChordType; 9] = [
        ChordType::Major,
        ChordType::Minor,
        ChordType::Diminished,
        ChordType::Augmented,
        ChordType::Major7,
        ChordType::Minor7,
        ChordType::Dominant7,
        ChordType::Diminished7,
        ChordType::HalfDiminished7,
    ];

    /// Semitones above the root, in root position.
    pub fn intervals(self) -> &'static [i32] {
        match self {
            ChordType::Major => &[0, 4, 7],
            ChordType::Minor => &[0, 3, 7],
            ChordType::Diminished => &[0, 3, 6],
            ChordType::Augmented => &[0, 4, 8],
            ChordType::Major7 => &[0, 4, 7, 11],
            ChordType::Minor7 => &[0, 3, 7, 10],
            ChordType::Dominant7 => &[0, 4, 7, 10],
            ChordType::Diminished7 => &[0, 3, 6, 9],
            ChordType::HalfDiminished7 => &[0, 3, 6, 10],
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            ChordType::Major => "",
            ChordType::Minor => "m",
            ChordType::Diminished => "°",
            ChordType::Augmented => "+",
            ChordType::Major7 => "maj7",
            ChordType::Minor7 => "m7",
            ChordType::Dominant7 => "7",
            ChordType::Diminished7 => "°7",
            ChordType::HalfDiminished7 => "ø7",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChordType::Major => "Major",
            ChordType::Minor => "Minor",
            ChordType::Diminished => "Diminished",
            ChordType::Augmented => "Augmented",
            ChordType::Major7 => "Major 7th",
            ChordType::Minor7 => "Minor 7th",
            ChordType::Dominant7 => "Dominant 7th",
            ChordType::Diminished7 => "Diminished 7th",
            ChordType::HalfDiminished7 => "Half-diminished 7th",
        }
    }

    /// Triad quality from the third and fifth above the root.
    pub fn from_triad_intervals(third: i32, fifth: i32) -> Option<ChordType> {
        match (third.rem_euclid(12), fifth.rem_euclid(12)) {
            (4, 7) => Some(ChordType::Major),
            (3, 7) => Some(ChordType::Minor),
            (3, 6) => Some(ChordType::Diminished),
            (4, 8) => Some(ChordType::Augmented),
            _ => None,
        }
    }
}

/// Which chord tones are lifted an octave: first inversion lifts the lowest
/// tone, second inversion lifts the two lowest.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChordInversion {
    #[default]
    Root,
    First,
    Second,
}

impl ChordInversion {
    pub const ALL: [ChordInversion; 3] = [
        ChordInversion::Root,
        ChordInversion::First,
        ChordInversion::Second,
    ];

    /// Number of bass tones moved up an octave.
    pub fn rotation(self) -> usize {
        match self {
            ChordInversion::Root => 0,
            ChordInversion::First => 1,
            ChordInversion::Second => 2,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChordInversion::Root => "Root Position",
            ChordInversion::First => "1st Inversion",
            ChordInversion::Second => "2nd Inversion",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Chord {
    pub root: MusicalNote,
    pub chord_type: ChordType,
    pub inversion: ChordInversion,
    /// Octave of the root before inversion is applied.
    pub octave: i8,
}

pub fn get_chord(root: MusicalNote, chord_type: ChordType, inversion: ChordInversion) -> Chord {
    Chord {
        root,
        chord_type,
        inversion,
        octave: CHORD_BASE_OCTAVE,
    }
}

impl Chord {
    pub fn in_octave(self, octave: i8) -> Self {
        Chord { octave, ..self }
    }

    /// Offsets from the root MIDI note, lowest voice first.
    pub fn offsets(&self) -> Vec<i32> {
        let mut offsets = self.chord_type.intervals().to_vec();
        offsets.rotate_left(self.inversion.rotation());
        let lifted = offsets.len() - self.inversion.rotation();
        for offset in &mut offsets[lifted..] {
            *offset += 12;
        }
        offsets
    }

    /// Chord tones in voicing order.
    pub fn pitch_classes(&self) -> Vec<MusicalNote> {
        self.offsets()
            .iter()
            .map(|&offset| self.root.transpose(offset))
            .collect()
    }

    pub fn midi_notes(&self) -> Vec<i32> {
        let root = midi_from_pitch(self.root, self.octave as i32);
        self.offsets().iter().map(|&offset| root + offset).collect()
    }

    pub fn positions(&self) -> Vec<NotePosition> {
        self.midi_notes()
            .into_iter()
            .filter_map(|midi| u8::try_from(midi).ok())
            .map(NotePosition::from_midi)
            .collect()
    }

    /// Lead-sheet symbol such as "Dm" or "G7".
    pub fn symbol(&self) -> String {
        format!("{}{}", self.root.name(), self.chord_type.symbol())
    }

    /// Symbol plus inversion, e.g. "C Major (1st Inversion)".
    pub fn display_name(&self) -> String {
        let base = format!("{} {}", self.root.name(), self.chord_type.display_name());
        match self.inversion {
            ChordInversion::Root => base,
            inversion => format!("{} ({})", base, inversion.display_name()),
        }
    }
}

/// Triad built by stacking thirds on a zero-based scale degree.
pub fn diatonic_triad(scale: &Scale, degree: usize) -> Chord {
    let root_offset = scale.degree_offset(degree);
    let third = scale.degree_offset(degree + 2) - root_offset;
    let fifth = scale.degree_offset(degree + 4) - root_offset;
    let chord_type = ChordType::from_triad_intervals(third, fifth).unwrap_or(ChordType::Major);
    get_chord(scale.degree(degree), chord_type, ChordInversion::Root)
}

/// Total distance between two voicings, measured from each note to the
/// nearest note of the other chord in both directions.
pub fn voice_movement(from: &[i32], to: &[i32]) -> i32 {
    fn one_way(a: &[i32], b: &[i32]) -> i32 {
        a.iter()
            .map(|x| b.iter().map(|y| (x - y).abs()).min().unwrap_or(0))
            .sum()
    }
    one_way(from, to) + one_way(to, from)
}

/// Picks the inversion and octave of `root`/`chord_type` that moves least from
/// `previous`, staying inside the voicing range.
pub fn closest_voicing(previous: &Chord, root: MusicalNote, chord_type: ChordType) -> Chord {
    let previous_notes = previous.midi_notes();
    let mut best: Option<(Chord, (i32, usize, u8))> = None;

    for octave in [CHORD_BASE_OCTAVE, CHORD_BASE_OCTAVE - 1] {
        for inversion in ChordInversion::ALL {
            let candidate = get_chord(root, chord_type, inversion).in_octave(octave);
            let notes = candidate.midi_notes();
            let in_range = notes
                .iter()
                .all(|&n| (VOICING_LOW..=VOICING_HIGH).contains(&n));
            if !in_range {
                continue;
            }
            let rank = (
                voice_movement(&previous_notes, &notes),
                inversion.rotation(),
                (octave != CHORD_BASE_OCTAVE) as u8,
            );
            let is_better = match &best {
                None => true,
                Some((_, best_rank)) => rank < *best_rank,
            };
            if is_better {
                best = Some((candidate, rank));
            }
        }
    }

    best.map(|(chord, _)| chord)
        .unwrap_or_else(|| get_chord(root, chord_type, ChordInversion::Root))
}

/// Voices a chord sequence: the first chord in root position at the base
/// octave, every following chord as close as possible to its predecessor.
pub fn voice_lead(chords: &[(MusicalNote, ChordType)]) -> Vec<Chord> {
    let mut voiced: Vec<Chord> = Vec::with_capacity(chords.len());
    for &(root, chord_type) in chords {
        let chord = match voiced.last() {
            Some(previous) => closest_voicing(previous, root, chord_type),
            None => get_chord(root, chord_type, ChordInversion::Root),
        };
        voiced.push(chord);
    }
    voiced
}
