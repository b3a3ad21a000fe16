use crate::theory::arpeggios::{get_arpeggio, ArpeggioOctaves, ArpeggioType};
use crate::theory::chords::{diatonic_triad, get_chord, voice_lead, Chord, ChordInversion, ChordType};
use crate::theory::notes::{MusicalNote, MIDI_NOTE_MAX};
use crate::theory::progressions::{generate_progression_chords, ChordProgression};
use crate::theory::scales::{get_scale, ScaleType};

use super::config::{ExerciseConfig, HandSelection, PracticeMode, LEFT_HAND_OCTAVE, RIGHT_HAND_OCTAVE};
use super::types::{ExerciseMetadata, PracticeExercise, PracticeStep, StepMetadata};

/// Builds the exercise for a configuration. Identical configurations always
/// produce identical exercises.
pub fn initialize_exercise(config: &ExerciseConfig) -> PracticeExercise {
    match config {
        ExerciseConfig::Scales {
            key,
            scale_type,
            hands,
        } => generate_scale(*key, *scale_type, *hands),
        ExerciseConfig::Arpeggios {
            root,
            arpeggio_type,
            octaves,
            hands,
        } => generate_arpeggio(*root, *arpeggio_type, *octaves, *hands),
        ExerciseConfig::ChordsByKey { key, scale_type } => generate_chords_by_key(*key, *scale_type),
        ExerciseConfig::ChordsByType {
            chord_type,
            include_inversions,
        } => generate_chords_by_type(*chord_type, *include_inversions),
        ExerciseConfig::ChordProgressions { key, progression } => {
            generate_chord_progression(*key, progression)
        }
    }
}

fn to_midi(note: i32) -> u8 {
    note.clamp(0, MIDI_NOTE_MAX as i32) as u8
}

fn build_exercise(
    title: String,
    mode: PracticeMode,
    steps: Vec<PracticeStep>,
    chords: Vec<Chord>,
) -> PracticeExercise {
    PracticeExercise {
        steps,
        metadata: ExerciseMetadata {
            title,
            mode,
            chords,
        },
    }
}

/// One step per position. With both hands the two sequences are zipped into
/// pairs; `zip` stops at the shorter side so no step is left unpaired.
fn hand_steps(right: &[i32], left: &[i32], hands: HandSelection) -> Vec<PracticeStep> {
    let single = |notes: &[i32], hand: HandSelection| -> Vec<PracticeStep> {
        notes
            .iter()
            .map(|&n| {
                PracticeStep::sequential(to_midi(n)).with_metadata(StepMetadata {
                    hand: Some(hand),
                    ..StepMetadata::default()
                })
            })
            .collect()
    };

    match hands {
        HandSelection::Right => single(right, HandSelection::Right),
        HandSelection::Left => single(left, HandSelection::Left),
        HandSelection::Both => left
            .iter()
            .zip(right.iter())
            .map(|(&l, &r)| PracticeStep::paired(to_midi(l), to_midi(r)))
            .collect(),
    }
}

fn chord_step(chord: &Chord, label: String, roman_numeral: Option<String>) -> PracticeStep {
    let notes = chord.midi_notes().into_iter().map(to_midi).collect();
    PracticeStep::simultaneous(notes).with_metadata(StepMetadata {
        label: Some(label),
        roman_numeral,
        chord: Some(*chord),
        hand: None,
    })
}

fn generate_scale(key: MusicalNote, scale_type: ScaleType, hands: HandSelection) -> PracticeExercise {
    let scale = get_scale(key, scale_type);
    let right = scale.up_down_midi(RIGHT_HAND_OCTAVE);
    let left = scale.up_down_midi(LEFT_HAND_OCTAVE);

    build_exercise(
        format!("{} Scale ({})", scale.name(), hands.display_name()),
        PracticeMode::Scales,
        hand_steps(&right, &left, hands),
        Vec::new(),
    )
}

fn generate_arpeggio(
    root: MusicalNote,
    arpeggio_type: ArpeggioType,
    octaves: ArpeggioOctaves,
    hands: HandSelection,
) -> PracticeExercise {
    let arpeggio = get_arpeggio(root, arpeggio_type, octaves);
    let right = arpeggio.midi_notes(RIGHT_HAND_OCTAVE);
    let left = arpeggio.midi_notes(LEFT_HAND_OCTAVE);

    build_exercise(
        format!("{} ({})", arpeggio.name(), hands.display_name()),
        PracticeMode::Arpeggios,
        hand_steps(&right, &left, hands),
        Vec::new(),
    )
}

const ROMAN_DEGREES: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Roman numeral for a diatonic triad: case follows the third, with a
/// marker for diminished and augmented triads.
fn triad_numeral(degree: usize, chord_type: ChordType) -> String {
    let numeral = ROMAN_DEGREES[degree % 7];
    match chord_type {
        ChordType::Minor => numeral.to_lowercase(),
        ChordType::Diminished => format!("{}°", numeral.to_lowercase()),
        ChordType::Augmented => format!("{}+", numeral),
        _ => numeral.to_string(),
    }
}

/// Diatonic triads on every degree and back to the tonic, voiced smoothly.
fn generate_chords_by_key(key: MusicalNote, scale_type: ScaleType) -> PracticeExercise {
    let scale = get_scale(key, scale_type);
    let triads: Vec<Chord> = (0..=7).map(|degree| diatonic_triad(&scale, degree)).collect();
    let voiced = voice_lead(
        &triads
            .iter()
            .map(|c| (c.root, c.chord_type))
            .collect::<Vec<_>>(),
    );

    let steps = voiced
        .iter()
        .enumerate()
        .map(|(degree, chord)| {
            chord_step(
                chord,
                chord.symbol(),
                Some(triad_numeral(degree, chord.chord_type)),
            )
        })
        .collect();

    build_exercise(
        format!("Chords in {}", scale.name()),
        PracticeMode::ChordsByKey,
        steps,
        voiced,
    )
}

/// Chord planing: the same chord type on all twelve roots, optionally
/// through every inversion on each root.
fn generate_chords_by_type(chord_type: ChordType, include_inversions: bool) -> PracticeExercise {
    let inversions: &[ChordInversion] = if include_inversions {
        &ChordInversion::ALL
    } else {
        &[ChordInversion::Root]
    };

    let chords: Vec<Chord> = MusicalNote::ALL
        .iter()
        .flat_map(|&root| {
            inversions
                .iter()
                .map(move |&inversion| get_chord(root, chord_type, inversion))
        })
        .collect();

    let steps = chords
        .iter()
        .map(|chord| chord_step(chord, chord.display_name(), None))
        .collect();

    let title = if include_inversions {
        format!("{} Chords with Inversions", chord_type.display_name())
    } else {
        format!("{} Chords", chord_type.display_name())
    };

    build_exercise(title, PracticeMode::ChordsByType, steps, chords)
}

fn generate_chord_progression(key: MusicalNote, progression: &ChordProgression) -> PracticeExercise {
    let chords = generate_progression_chords(progression, key);

    let steps = chords
        .iter()
        .zip(progression.numerals.iter())
        .map(|(chord, numeral)| chord_step(chord, chord.symbol(), Some(numeral.symbol.clone())))
        .collect();

    build_exercise(
        format!("{} in {}", progression.name, key.name()),
        PracticeMode::ChordProgressions,
        steps,
        chords,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exercises::types::StepType;
    use crate::theory::progressions::{default_progression, find_progression};
    use pretty_assertions::assert_eq;

    fn scale_config(hands: HandSelection) -> ExerciseConfig {
        ExerciseConfig::Scales {
            key: MusicalNote::C,
            scale_type: ScaleType::Major,
            hands,
        }
    }

    #[test]
    fn test_right_hand_scale() {
        let exercise = initialize_exercise(&scale_config(HandSelection::Right));
        assert_eq!(exercise.len(), 15);
        assert!(exercise.steps.iter().all(|s| s.step_type == StepType::Sequential));
        assert_eq!(exercise.steps[0].notes, vec![60]);
        assert_eq!(exercise.steps[7].notes, vec![72]);
        assert_eq!(exercise.steps[14].notes, vec![60]);
    }

    #[test]
    fn test_left_hand_scale_is_an_octave_lower() {
        let exercise = initialize_exercise(&scale_config(HandSelection::Left));
        assert_eq!(exercise.steps[0].notes, vec![48]);
        assert_eq!(exercise.steps[0].metadata.hand, Some(HandSelection::Left));
    }

    #[test]
    fn test_both_hands_scale_pairs() {
        let exercise = initialize_exercise(&scale_config(HandSelection::Both));
        assert_eq!(exercise.len(), 15);
        assert_eq!(exercise.steps[0].notes, vec![48, 60]);
        assert_eq!(exercise.steps[1].notes, vec![50, 62]);
        for step in &exercise.steps {
            assert_eq!(step.step_type, StepType::Paired);
            assert_eq!(step.notes.len(), 2);
            assert_eq!(step.notes[1] - step.notes[0], 12);
        }
    }

    #[test]
    fn test_hand_steps_never_dangle() {
        let steps = hand_steps(&[60, 62, 64], &[48, 50], HandSelection::Both);
        assert_eq!(steps.len(), 2);
        assert!(steps.iter().all(|s| s.notes.len() == 2));
    }

    #[test]
    fn test_arpeggio_both_hands() {
        let exercise = initialize_exercise(&ExerciseConfig::Arpeggios {
            root: MusicalNote::C,
            arpeggio_type: ArpeggioType::Major,
            octaves: ArpeggioOctaves::Two,
            hands: HandSelection::Both,
        });
        assert_eq!(exercise.len(), 13);
        assert_eq!(exercise.steps[0].notes, vec![48, 60]);
        assert_eq!(exercise.steps[6].notes, vec![72, 84]);
        assert_eq!(exercise.metadata.mode, PracticeMode::Arpeggios);
    }

    #[test]
    fn test_chords_by_key_c_major() {
        let exercise = initialize_exercise(&ExerciseConfig::ChordsByKey {
            key: MusicalNote::C,
            scale_type: ScaleType::Major,
        });
        assert_eq!(exercise.len(), 8);
        assert_eq!(exercise.chords().len(), 8);
        assert!(exercise.steps.iter().all(|s| s.step_type == StepType::Simultaneous));
        assert_eq!(exercise.steps[0].notes, vec![60, 64, 67]);

        let numerals: Vec<&str> = exercise
            .steps
            .iter()
            .filter_map(|s| s.metadata.roman_numeral.as_deref())
            .collect();
        assert_eq!(numerals, vec!["I", "ii", "iii", "IV", "V", "vi", "vii°", "I"]);
    }

    #[test]
    fn test_chords_by_type_cycles_all_roots() {
        let plain = initialize_exercise(&ExerciseConfig::ChordsByType {
            chord_type: ChordType::Minor,
            include_inversions: false,
        });
        assert_eq!(plain.len(), 12);
        assert_eq!(plain.chords()[1].root, MusicalNote::CSharp);

        let inverted = initialize_exercise(&ExerciseConfig::ChordsByType {
            chord_type: ChordType::Minor,
            include_inversions: true,
        });
        assert_eq!(inverted.len(), 36);
        assert_eq!(inverted.chords()[0].inversion, ChordInversion::Root);
        assert_eq!(inverted.chords()[1].inversion, ChordInversion::First);
        assert_eq!(inverted.chords()[2].inversion, ChordInversion::Second);
        assert_eq!(inverted.chords()[3].root, MusicalNote::CSharp);
    }

    #[test]
    fn test_chord_progression_metadata() {
        let exercise = initialize_exercise(&ExerciseConfig::ChordProgressions {
            key: MusicalNote::G,
            progression: find_progression("ii-V-I").unwrap(),
        });
        assert_eq!(exercise.len(), 3);
        let labels: Vec<&str> = exercise
            .steps
            .iter()
            .filter_map(|s| s.metadata.label.as_deref())
            .collect();
        assert_eq!(labels, vec!["Am", "D", "G"]);
        assert_eq!(exercise.steps[0].metadata.roman_numeral.as_deref(), Some("ii"));
    }

    #[test]
    fn test_default_progression_exercise() {
        let exercise = initialize_exercise(&ExerciseConfig::ChordProgressions {
            key: MusicalNote::C,
            progression: default_progression(),
        });
        assert_eq!(exercise.len(), 2);
        assert_eq!(exercise.steps[0].notes, vec![60, 64, 67]);
        assert_eq!(exercise.steps[1].notes, vec![59, 62, 67]);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let configs = vec![
            scale_config(HandSelection::Both),
            ExerciseConfig::Arpeggios {
                root: MusicalNote::FSharp,
                arpeggio_type: ArpeggioType::Dominant7,
                octaves: ArpeggioOctaves::One,
                hands: HandSelection::Right,
            },
            ExerciseConfig::ChordsByKey {
                key: MusicalNote::E,
                scale_type: ScaleType::Dorian,
            },
            ExerciseConfig::ChordsByType {
                chord_type: ChordType::Dominant7,
                include_inversions: true,
            },
            ExerciseConfig::ChordProgressions {
                key: MusicalNote::ASharp,
                progression: find_progression("iii-vi-ii-V-I").unwrap(),
            },
        ];
        for config in &configs {
            assert_eq!(initialize_exercise(config), initialize_exercise(config));
        }
    }

    #[test]
    fn test_steps_are_never_empty() {
        for key in MusicalNote::ALL {
            for scale_type in ScaleType::ALL {
                let exercise = initialize_exercise(&ExerciseConfig::ChordsByKey { key, scale_type });
                assert!(exercise.steps.iter().all(|s| !s.notes.is_empty()));
            }
        }
    }
}
