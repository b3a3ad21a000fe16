use serde::{Deserialize, Serialize};

use super::notes::{midi_from_pitch, MusicalNote};

/// The eight supported scale patterns. `Major` and `Minor` carry the same
/// intervals as `Ionian`-style major and `Aeolian` but are listed separately
/// because they are the everyday names users pick from.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ScaleType {
    #[default]
    Major,
    Minor,
    Dorian,
    Phrygian,
    Lydian,
    Mixolydian,
    Aeolian,
    Locrian,
}

impl ScaleType {
    pub const ALL: [ScaleType; 8] = [
        ScaleType::Major,
        ScaleType::Minor,
        ScaleType::Dorian,
        ScaleType::Phrygian,
        ScaleType::Lydian,
        ScaleType::Mixolydian,
        ScaleType::Aeolian,
        ScaleType::Locrian,
    ];

    /// Semitone steps between consecutive degrees, ending on the octave.
    pub fn intervals(self) -> [u8; 7] {
        match self {
            ScaleType::Major => [2, 2, 1, 2, 2, 2, 1],
            ScaleType::Minor | ScaleType::Aeolian => [2, 1, 2, 2, 1, 2, 2],
            ScaleType::Dorian => [2, 1, 2, 2, 2, 1, 2],
            ScaleType::Phrygian => [1, 2, 2, 2, 1, 2, 2],
            ScaleType::Lydian => [2, 2, 2, 1, 2, 2, 1],
            ScaleType::Mixolydian => [2, 2, 1, 2, 2, 1, 2],
            ScaleType::Locrian => [1, 2, 2, 1, 2, 2, 2],
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ScaleType::Major => "Major",
            ScaleType::Minor => "Minor",
            ScaleType::Dorian => "Dorian",
            ScaleType::Phrygian => "Phrygian",
            ScaleType::Lydian => "Lydian",
            ScaleType::Mixolydian => "Mixolydian",
            ScaleType::Aeolian => "Aeolian",
            ScaleType::Locrian => "Locrian",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Scale {
    pub key: MusicalNote,
    pub scale_type: ScaleType,
    pub intervals: [u8; 7],
}

pub fn get_scale(key: MusicalNote, scale_type: ScaleType) -> Scale {
    Scale {
        key,
        scale_type,
        intervals: scale_type.intervals(),
    }
}

impl Scale {
    /// Semitone offsets of each degree from the tonic, 0 through 12.
    pub fn offsets(&self) -> [i32; 8] {
        let mut offsets = [0i32; 8];
        for (i, &step) in self.intervals.iter().enumerate() {
            offsets[i + 1] = offsets[i] + step as i32;
        }
        offsets
    }

    /// The seven degrees plus the closing octave.
    pub fn notes(&self) -> Vec<MusicalNote> {
        self.offsets()
            .iter()
            .map(|&offset| self.key.transpose(offset))
            .collect()
    }

    /// Pitch class of a zero-based degree; degrees past the seventh wrap.
    pub fn degree(&self, degree: usize) -> MusicalNote {
        self.key.transpose(self.degree_offset(degree))
    }

    /// Semitones from the tonic to a zero-based degree, counting upward
    /// through further octaves for degrees of 7 and above.
    pub fn degree_offset(&self, degree: usize) -> i32 {
        let offsets = self.offsets();
        (degree / 7) as i32 * 12 + offsets[degree % 7]
    }

    /// Ascending MIDI notes of the scale starting on the tonic in `octave`.
    pub fn midi_notes(&self, octave: i32) -> Vec<i32> {
        let tonic = midi_from_pitch(self.key, octave);
        self.offsets().iter().map(|&offset| tonic + offset).collect()
    }

    /// Up to the octave and back down, without repeating the top note.
    pub fn up_down_midi(&self, octave: i32) -> Vec<i32> {
        let up = self.midi_notes(octave);
        let mut sequence = up.clone();
        sequence.extend(up.iter().rev().skip(1));
        sequence
    }

    pub fn name(&self) -> String {
        format!("{} {}", self.key.name(), self.scale_type.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_closure_all_keys_and_types() {
        for key in MusicalNote::ALL {
            for scale_type in ScaleType::ALL {
                let scale = get_scale(key, scale_type);
                let notes = scale.notes();
                assert_eq!(notes.len(), 8, "{} has wrong length", scale.name());
                assert_eq!(notes.first(), notes.last(), "{} does not close", scale.name());
                let sum: u32 = scale.intervals.iter().map(|&i| i as u32).sum();
                assert_eq!(sum, 12, "{} intervals sum to {}", scale.name(), sum);
            }
        }
    }

    #[test]
    fn test_c_major_notes() {
        let notes = get_scale(MusicalNote::C, ScaleType::Major).notes();
        assert_eq!(
            notes,
            vec![
                MusicalNote::C,
                MusicalNote::D,
                MusicalNote::E,
                MusicalNote::F,
                MusicalNote::G,
                MusicalNote::A,
                MusicalNote::B,
                MusicalNote::C,
            ]
        );
    }

    #[test]
    fn test_a_minor_matches_aeolian() {
        let minor = get_scale(MusicalNote::A, ScaleType::Minor);
        let aeolian = get_scale(MusicalNote::A, ScaleType::Aeolian);
        assert_eq!(minor.notes(), aeolian.notes());
        assert_eq!(minor.degree(2), MusicalNote::C);
    }

    #[test]
    fn test_d_dorian_is_white_keys() {
        let notes = get_scale(MusicalNote::D, ScaleType::Dorian).notes();
        assert!(notes.iter().all(|n| !n.name().contains('#')));
    }

    #[test]
    fn test_up_down_midi() {
        let sequence = get_scale(MusicalNote::C, ScaleType::Major).up_down_midi(4);
        assert_eq!(sequence.len(), 15);
        assert_eq!(sequence[0], 60);
        assert_eq!(sequence[7], 72);
        assert_eq!(sequence[8], 71);
        assert_eq!(*sequence.last().unwrap(), 60);
    }

    #[test]
    fn test_degree_offset_wraps_octave() {
        let scale = get_scale(MusicalNote::C, ScaleType::Major);
        assert_eq!(scale.degree_offset(0), 0);
        assert_eq!(scale.degree_offset(4), 7);
        assert_eq!(scale.degree_offset(7), 12);
        assert_eq!(scale.degree_offset(9), 16);
    }
}
