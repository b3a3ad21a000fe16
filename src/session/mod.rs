//! The practice-session state machine.
//!
//! [`transition`] is a pure function from the current state and an event to
//! the next state plus the effects the host should act on (new highlight,
//! completion). [`PracticeSession`] owns the settings, the exercise and the
//! state, and is what a practice screen holds on to.
//!
//! A session is driven from a single event loop and is not internally
//! synchronised. Every configuration setter deactivates practice before the
//! exercise is rebuilt, so note events that arrive mid-reconfiguration are
//! ignored.

pub mod highlight;

use std::collections::BTreeSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::exercises::config::{HandSelection, PracticeMode, PracticeSettings};
use crate::exercises::generators::initialize_exercise;
use crate::exercises::types::{PracticeExercise, PracticeStep, StepType};
use crate::midi::input::NoteInput;
use crate::theory::arpeggios::{ArpeggioOctaves, ArpeggioType};
use crate::theory::chords::ChordType;
use crate::theory::notes::{MusicalNote, NotePosition};
use crate::theory::progressions::ChordProgression;
use crate::theory::scales::ScaleType;

use highlight::{keyboard_range, step_highlight, KeyboardRange};

/// What happens after an exercise is completed and has reset to its first step.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestartPolicy {
    /// Practice stays inactive until `start` is called again.
    #[default]
    RequireStart,
    /// The first note pressed after a completion restarts practice and is
    /// counted against the first step.
    AutoStartOnFirstNote,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SessionOptions {
    pub restart_policy: RestartPolicy,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    pub step_index: usize,
    pub active: bool,
    pub held_notes: BTreeSet<u8>,
    /// Set on completion; cleared by start, reset and reconfiguration.
    pub just_completed: bool,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "note", rename_all = "snake_case")]
pub enum SessionEvent {
    Start,
    Reset,
    NotePressed(u8),
    NoteReleased(u8),
}

impl From<NoteInput> for SessionEvent {
    fn from(input: NoteInput) -> Self {
        match input {
            NoteInput::Pressed(note) => SessionEvent::NotePressed(note),
            NoteInput::Released(note) => SessionEvent::NoteReleased(note),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionEffect {
    /// Notes the keyboard should light up; empty means none.
    HighlightChanged(Vec<NotePosition>),
    StepAdvanced(usize),
    ExerciseCompleted,
}

fn highlight_for(exercise: Option<&PracticeExercise>, index: usize) -> SessionEffect {
    SessionEffect::HighlightChanged(step_highlight(exercise.and_then(|e| e.step(index))))
}

fn rewind(state: &mut SessionState) {
    state.step_index = 0;
    state.held_notes.clear();
    state.just_completed = false;
}

/// Apply one event. Never fails: events that do not apply in the current
/// state produce the unchanged state and no effects.
pub fn transition(
    state: &SessionState,
    exercise: Option<&PracticeExercise>,
    options: &SessionOptions,
    event: SessionEvent,
) -> (SessionState, Vec<SessionEffect>) {
    let mut next = state.clone();
    let mut effects = Vec::new();

    match event {
        SessionEvent::Start => {
            rewind(&mut next);
            next.active = true;
            effects.push(highlight_for(exercise, 0));
        }
        SessionEvent::Reset => {
            rewind(&mut next);
            next.active = false;
            effects.push(highlight_for(exercise, 0));
        }
        SessionEvent::NotePressed(note) => {
            let Some(exercise) = exercise.filter(|e| !e.is_empty()) else {
                return (next, effects);
            };
            if !next.active {
                let resume = next.just_completed
                    && options.restart_policy == RestartPolicy::AutoStartOnFirstNote;
                if !resume {
                    return (next, effects);
                }
                debug!("restarting practice on first note after completion");
                rewind(&mut next);
                next.active = true;
            }
            let Some(step) = exercise.step(next.step_index) else {
                return (next, effects);
            };
            if step_satisfied_by_press(step, &mut next.held_notes, note) {
                advance(&mut next, exercise, &mut effects);
            }
        }
        SessionEvent::NoteReleased(note) => {
            if !next.active {
                return (next, effects);
            }
            next.held_notes.remove(&note);
            // Releasing an extra note can leave exactly the chord held.
            let Some(exercise) = exercise else {
                return (next, effects);
            };
            if let Some(step) = exercise.step(next.step_index) {
                if step.step_type == StepType::Simultaneous
                    && !next.held_notes.is_empty()
                    && next.held_notes == step.expected_set()
                {
                    advance(&mut next, exercise, &mut effects);
                }
            }
        }
    }

    (next, effects)
}

/// Records a press against the current step and reports whether the step is
/// now complete.
fn step_satisfied_by_press(step: &PracticeStep, held: &mut BTreeSet<u8>, note: u8) -> bool {
    match step.step_type {
        StepType::Sequential => step.notes.first() == Some(&note),
        StepType::Paired => {
            if step.notes.contains(&note) {
                held.insert(note);
            }
            step.notes.iter().all(|n| held.contains(n))
        }
        StepType::Simultaneous => {
            held.insert(note);
            *held == step.expected_set()
        }
    }
}

fn advance(state: &mut SessionState, exercise: &PracticeExercise, effects: &mut Vec<SessionEffect>) {
    state.held_notes.clear();
    state.step_index += 1;

    if state.step_index >= exercise.len() {
        info!("exercise completed: {}", exercise.metadata.title);
        state.active = false;
        effects.push(SessionEffect::ExerciseCompleted);
        rewind(state);
        state.just_completed = true;
        effects.push(highlight_for(Some(exercise), 0));
    } else {
        debug!("advanced to step {}/{}", state.step_index + 1, exercise.len());
        effects.push(SessionEffect::StepAdvanced(state.step_index));
        effects.push(highlight_for(Some(exercise), state.step_index));
    }
}

/// Owns the practice configuration, the exercise generated from it and the
/// progress through that exercise.
#[derive(Clone, Debug, Default)]
pub struct PracticeSession {
    settings: PracticeSettings,
    options: SessionOptions,
    exercise: Option<PracticeExercise>,
    state: SessionState,
}

impl PracticeSession {
    /// A session with no exercise yet. Note events are ignored until the
    /// first exercise is initialized.
    pub fn new(options: SessionOptions) -> Self {
        PracticeSession {
            options,
            ..PracticeSession::default()
        }
    }

    pub fn with_settings(settings: PracticeSettings, options: SessionOptions) -> Self {
        let mut session = PracticeSession {
            settings,
            options,
            exercise: None,
            state: SessionState::default(),
        };
        session.initialize_exercise();
        session
    }

    /// Deactivate, rebuild the exercise from the current settings and rewind.
    pub fn initialize_exercise(&mut self) -> Vec<SessionEffect> {
        self.state.active = false;
        let exercise = initialize_exercise(&self.settings.to_config());
        debug!(
            "initialized exercise '{}' with {} steps",
            exercise.metadata.title,
            exercise.len()
        );
        self.exercise = Some(exercise);
        rewind(&mut self.state);
        vec![highlight_for(self.exercise.as_ref(), 0)]
    }

    pub fn apply(&mut self, event: SessionEvent) -> Vec<SessionEffect> {
        let (next, effects) = transition(&self.state, self.exercise.as_ref(), &self.options, event);
        self.state = next;
        effects
    }

    pub fn start_practice(&mut self) -> Vec<SessionEffect> {
        debug!("practice started");
        self.apply(SessionEvent::Start)
    }

    pub fn reset_practice(&mut self) -> Vec<SessionEffect> {
        debug!("practice reset");
        self.apply(SessionEvent::Reset)
    }

    pub fn handle_note_pressed(&mut self, note: u8) -> Vec<SessionEffect> {
        self.apply(SessionEvent::NotePressed(note))
    }

    pub fn handle_note_released(&mut self, note: u8) -> Vec<SessionEffect> {
        self.apply(SessionEvent::NoteReleased(note))
    }

    /// Shared entry point for the MIDI keyboard and the on-screen piano.
    pub fn handle_input(&mut self, input: NoteInput) -> Vec<SessionEffect> {
        self.apply(input.into())
    }

    /// Decode a raw MIDI buffer and feed any note input into the session.
    pub fn handle_midi_message(&mut self, data: &[u8]) -> Vec<SessionEffect> {
        match NoteInput::from_bytes(data) {
            Some(input) => self.handle_input(input),
            None => Vec::new(),
        }
    }

    fn reconfigure(&mut self, update: impl FnOnce(&mut PracticeSettings)) -> Vec<SessionEffect> {
        self.state.active = false;
        update(&mut self.settings);
        self.initialize_exercise()
    }

    pub fn set_settings(&mut self, settings: PracticeSettings) -> Vec<SessionEffect> {
        self.reconfigure(|s| *s = settings)
    }

    pub fn set_practice_mode(&mut self, mode: PracticeMode) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.mode = mode)
    }

    pub fn set_selected_key(&mut self, key: MusicalNote) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.key = key)
    }

    pub fn set_selected_scale_type(&mut self, scale_type: ScaleType) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.scale_type = scale_type)
    }

    pub fn set_selected_root_note(&mut self, root_note: MusicalNote) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.root_note = root_note)
    }

    pub fn set_selected_arpeggio_type(&mut self, arpeggio_type: ArpeggioType) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.arpeggio_type = arpeggio_type)
    }

    pub fn set_selected_arpeggio_octaves(&mut self, octaves: ArpeggioOctaves) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.arpeggio_octaves = octaves)
    }

    /// `None` clears the selection; chord-progression practice then falls
    /// back to I-V.
    pub fn set_selected_chord_progression(
        &mut self,
        progression: Option<ChordProgression>,
    ) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.chord_progression = progression)
    }

    pub fn set_selected_chord_type(&mut self, chord_type: ChordType) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.chord_type = chord_type)
    }

    pub fn set_include_inversions(&mut self, include: bool) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.include_inversions = include)
    }

    pub fn set_selected_hand_selection(&mut self, hands: HandSelection) -> Vec<SessionEffect> {
        self.reconfigure(|s| s.hand_selection = hands)
    }

    pub fn set_options(&mut self, options: SessionOptions) {
        self.options = options;
    }

    pub fn settings(&self) -> &PracticeSettings {
        &self.settings
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn exercise(&self) -> Option<&PracticeExercise> {
        self.exercise.as_ref()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        self.state.active
    }

    pub fn current_step_index(&self) -> usize {
        self.state.step_index
    }

    pub fn current_step(&self) -> Option<&PracticeStep> {
        self.exercise.as_ref()?.step(self.state.step_index)
    }

    pub fn held_notes(&self) -> &BTreeSet<u8> {
        &self.state.held_notes
    }

    /// (steps completed, total steps) in the current run.
    pub fn progress(&self) -> (usize, usize) {
        let total = self.exercise.as_ref().map_or(0, |e| e.len());
        (self.state.step_index, total)
    }

    pub fn highlighted_notes(&self) -> Vec<NotePosition> {
        step_highlight(self.current_step())
    }

    pub fn keyboard_range(&self) -> KeyboardRange {
        keyboard_range(self.exercise.as_ref())
    }
}
