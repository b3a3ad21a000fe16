use serde::{Deserialize, Serialize};

use crate::exercises::types::{PracticeExercise, PracticeStep};
use crate::theory::notes::NotePosition;

/// Width of the on-screen keyboard viewport.
pub const KEYBOARD_WINDOW_KEYS: u8 = 49;

/// Bounds of an 88-key piano, A0 to C8.
pub const PIANO_LOWEST: u8 = 21;
pub const PIANO_HIGHEST: u8 = 108;

/// Window centre used when there is nothing to show.
const DEFAULT_CENTER: u8 = 60;

/// A contiguous run of keys, inclusive at both ends.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyboardRange {
    pub lowest: u8,
    pub highest: u8,
}

impl KeyboardRange {
    pub fn contains(&self, midi: u8) -> bool {
        (self.lowest..=self.highest).contains(&midi)
    }

    pub fn key_count(&self) -> usize {
        (self.highest - self.lowest) as usize + 1
    }

    pub fn start(&self) -> NotePosition {
        NotePosition::from_midi(self.lowest)
    }

    pub fn end(&self) -> NotePosition {
        NotePosition::from_midi(self.highest)
    }
}

/// A 49-key window centred on `low..=high`, shifted to contain both
/// extremes and then clamped to the piano.
pub fn window_for_span(low: u8, high: u8) -> KeyboardRange {
    let width = KEYBOARD_WINDOW_KEYS as i32 - 1;
    let (low, high) = (low.min(high) as i32, low.max(high) as i32);

    let center = (low + high) / 2;
    let mut start = center - width / 2;
    if low < start {
        start = low;
    }
    if high > start + width {
        start = high - width;
    }
    let start = start.clamp(PIANO_LOWEST as i32, PIANO_HIGHEST as i32 - width);

    KeyboardRange {
        lowest: start as u8,
        highest: (start + width) as u8,
    }
}

/// Keyboard window sized to the whole exercise so it never needs to scroll.
/// Depends only on the exercise, not on progress through it.
pub fn keyboard_range(exercise: Option<&PracticeExercise>) -> KeyboardRange {
    match exercise.and_then(|e| e.note_span()) {
        Some((low, high)) => window_for_span(low, high),
        None => window_for_span(DEFAULT_CENTER, DEFAULT_CENTER),
    }
}

/// Notes to light up for a step; empty when there is no step.
pub fn step_highlight(step: Option<&PracticeStep>) -> Vec<NotePosition> {
    step.map(|s| s.notes.iter().map(|&n| NotePosition::from_midi(n)).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::config::{ExerciseConfig, HandSelection};
    use crate::exercises::generators::initialize_exercise;
    use crate::theory::arpeggios::{ArpeggioOctaves, ArpeggioType};
    use crate::theory::chords::ChordType;
    use crate::theory::notes::MusicalNote;
    use crate::theory::progressions::progression_library;
    use crate::theory::scales::ScaleType;

    #[test]
    fn test_window_is_49_keys_and_centered() {
        let range = window_for_span(60, 72);
        assert_eq!(range.key_count(), 49);
        assert_eq!(range, KeyboardRange { lowest: 42, highest: 90 });
    }

    #[test]
    fn test_window_clamps_to_piano() {
        let low = window_for_span(21, 30);
        assert_eq!(low.lowest, PIANO_LOWEST);
        assert_eq!(low.key_count(), 49);

        let high = window_for_span(100, 108);
        assert_eq!(high.highest, PIANO_HIGHEST);
        assert_eq!(high.key_count(), 49);
    }

    #[test]
    fn test_empty_exercise_uses_default_window() {
        let range = keyboard_range(None);
        assert!(range.contains(60));
        assert_eq!(range.key_count(), 49);
    }

    #[test]
    fn test_step_highlight() {
        let step = PracticeStep::simultaneous(vec![60, 64, 67]);
        let labels: Vec<String> = step_highlight(Some(&step)).iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["C4", "E4", "G4"]);
        assert!(step_highlight(None).is_empty());
    }

    #[test]
    fn test_range_contains_every_generated_exercise() {
        let mut configs = Vec::new();
        for key in MusicalNote::ALL {
            for hands in [HandSelection::Left, HandSelection::Right, HandSelection::Both] {
                for scale_type in ScaleType::ALL {
                    configs.push(ExerciseConfig::Scales { key, scale_type, hands });
                }
                for arpeggio_type in ArpeggioType::ALL {
                    for octaves in [ArpeggioOctaves::One, ArpeggioOctaves::Two] {
                        configs.push(ExerciseConfig::Arpeggios {
                            root: key,
                            arpeggio_type,
                            octaves,
                            hands,
                        });
                    }
                }
            }
            for scale_type in ScaleType::ALL {
                configs.push(ExerciseConfig::ChordsByKey { key, scale_type });
            }
            for progression in progression_library() {
                configs.push(ExerciseConfig::ChordProgressions { key, progression });
            }
        }
        for chord_type in ChordType::ALL {
            for include_inversions in [false, true] {
                configs.push(ExerciseConfig::ChordsByType {
                    chord_type,
                    include_inversions,
                });
            }
        }

        for config in &configs {
            let exercise = initialize_exercise(config);
            let range = keyboard_range(Some(&exercise));
            assert_eq!(range.key_count(), KEYBOARD_WINDOW_KEYS as usize);
            for note in exercise.all_notes() {
                assert!(
                    range.contains(note),
                    "{} not in {:?} for {}",
                    note,
                    range,
                    exercise.metadata.title
                );
            }
        }
    }
}
