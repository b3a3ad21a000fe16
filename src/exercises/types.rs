use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::theory::chords::Chord;

use super::config::{HandSelection, PracticeMode};

/// How the notes of a step must be played for the step to count.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StepType {
    /// A single note.
    Sequential,
    /// Two notes, one per hand, in either order.
    Paired,
    /// Exactly the chord: no missing and no extra notes.
    Simultaneous,
}

/// Display and debug information carried alongside a step.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StepMetadata {
    pub label: Option<String>,
    pub roman_numeral: Option<String>,
    pub chord: Option<Chord>,
    pub hand: Option<HandSelection>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PracticeStep {
    pub notes: Vec<u8>,
    pub step_type: StepType,
    pub metadata: StepMetadata,
}

impl PracticeStep {
    pub fn sequential(note: u8) -> Self {
        PracticeStep {
            notes: vec![note],
            step_type: StepType::Sequential,
            metadata: StepMetadata::default(),
        }
    }

    pub fn paired(left: u8, right: u8) -> Self {
        PracticeStep {
            notes: vec![left, right],
            step_type: StepType::Paired,
            metadata: StepMetadata {
                hand: Some(HandSelection::Both),
                ..StepMetadata::default()
            },
        }
    }

    pub fn simultaneous(notes: Vec<u8>) -> Self {
        PracticeStep {
            notes,
            step_type: StepType::Simultaneous,
            metadata: StepMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: StepMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The notes as a set, for exact-match comparison against held notes.
    pub fn expected_set(&self) -> BTreeSet<u8> {
        self.notes.iter().copied().collect()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExerciseMetadata {
    pub title: String,
    pub mode: PracticeMode,
    /// Chords in step order, for modes built from chords.
    pub chords: Vec<Chord>,
}

/// The complete, immutable sequence of steps for one configuration.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PracticeExercise {
    pub steps: Vec<PracticeStep>,
    pub metadata: ExerciseMetadata,
}

impl PracticeExercise {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&PracticeStep> {
        self.steps.get(index)
    }

    /// Every note referenced by any step, in step order.
    pub fn all_notes(&self) -> impl Iterator<Item = u8> + '_ {
        self.steps.iter().flat_map(|s| s.notes.iter().copied())
    }

    /// Lowest and highest note across the exercise.
    pub fn note_span(&self) -> Option<(u8, u8)> {
        let low = self.all_notes().min()?;
        let high = self.all_notes().max()?;
        Some((low, high))
    }

    pub fn chords(&self) -> &[Chord] {
        &self.metadata.chords
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(steps: Vec<PracticeStep>) -> PracticeExercise {
        PracticeExercise {
            steps,
            metadata: ExerciseMetadata {
                title: "test".to_string(),
                mode: PracticeMode::Scales,
                chords: Vec::new(),
            },
        }
    }

    #[test]
    fn test_step_constructors() {
        let step = PracticeStep::paired(48, 60);
        assert_eq!(step.notes, vec![48, 60]);
        assert_eq!(step.step_type, StepType::Paired);
        assert_eq!(step.metadata.hand, Some(HandSelection::Both));

        let chord = PracticeStep::simultaneous(vec![67, 60, 64]);
        assert_eq!(chord.expected_set().into_iter().collect::<Vec<_>>(), vec![60, 64, 67]);
    }

    #[test]
    fn test_note_span() {
        let ex = exercise(vec![
            PracticeStep::sequential(62),
            PracticeStep::simultaneous(vec![55, 59, 74]),
        ]);
        assert_eq!(ex.note_span(), Some((55, 74)));
        assert_eq!(ex.len(), 2);
    }

    #[test]
    fn test_empty_exercise_has_no_span() {
        let ex = exercise(Vec::new());
        assert!(ex.is_empty());
        assert_eq!(ex.note_span(), None);
        assert!(ex.step(0).is_none());
    }
}
