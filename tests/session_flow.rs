use keyboard_practice::exercises::config::{HandSelection, PracticeMode, PracticeSettings};
use keyboard_practice::exercises::types::StepType;
use keyboard_practice::midi::encode::{note_off_bytes, note_on_bytes};
use keyboard_practice::midi::decode::MidiChannel;
use keyboard_practice::session::{PracticeSession, RestartPolicy, SessionEffect, SessionOptions};
use keyboard_practice::theory::chords::ChordType;
use keyboard_practice::theory::notes::MusicalNote;
use keyboard_practice::theory::progressions::find_progression;
use pretty_assertions::assert_eq;

fn completions(effects: &[SessionEffect]) -> usize {
    effects
        .iter()
        .filter(|e| **e == SessionEffect::ExerciseCompleted)
        .count()
}

/// Plays every step of the current exercise through the MIDI path.
fn play_through(session: &mut PracticeSession) -> Vec<SessionEffect> {
    let channel = MidiChannel::new(0).unwrap();
    let steps = session.exercise().unwrap().steps.clone();
    let mut effects = Vec::new();
    for step in &steps {
        for &note in &step.notes {
            effects.extend(session.handle_midi_message(&note_on_bytes(channel, note, 80)));
        }
        for &note in &step.notes {
            effects.extend(session.handle_midi_message(&note_off_bytes(channel, note)));
        }
    }
    effects
}

#[test]
fn test_both_hands_scale_played_through() {
    let settings = PracticeSettings {
        mode: PracticeMode::Scales,
        key: MusicalNote::G,
        hand_selection: HandSelection::Both,
        ..PracticeSettings::default()
    };
    let mut session = PracticeSession::with_settings(settings, SessionOptions::default());
    let exercise = session.exercise().unwrap();
    assert!(exercise.steps.iter().all(|s| s.step_type == StepType::Paired));
    assert_eq!(exercise.steps[0].notes, vec![55, 67]);

    session.start_practice();
    let effects = play_through(&mut session);
    assert_eq!(completions(&effects), 1);
    assert!(!session.is_active());
    assert_eq!(session.current_step_index(), 0);
}

#[test]
fn test_chord_progression_with_wrong_notes() {
    let settings = PracticeSettings {
        mode: PracticeMode::ChordProgressions,
        key: MusicalNote::C,
        chord_progression: Some(find_progression("I-IV-V-I").unwrap()),
        ..PracticeSettings::default()
    };
    let mut session = PracticeSession::with_settings(settings, SessionOptions::default());
    session.start_practice();

    // C major plus a stray D blocks the step until the D is lifted.
    for note in [60, 62, 64, 67] {
        session.handle_note_pressed(note);
    }
    assert_eq!(session.current_step_index(), 0);
    session.handle_note_released(62);
    assert_eq!(session.current_step_index(), 1);
    assert_eq!(session.held_notes().len(), 0);
}

#[test]
fn test_chords_by_type_exposes_chord_list() {
    let settings = PracticeSettings {
        mode: PracticeMode::ChordsByType,
        chord_type: ChordType::Diminished,
        include_inversions: true,
        ..PracticeSettings::default()
    };
    let session = PracticeSession::with_settings(settings, SessionOptions::default());
    let exercise = session.exercise().unwrap();
    assert_eq!(exercise.chords().len(), 36);
    assert_eq!(exercise.len(), exercise.chords().len());
    for (step, chord) in exercise.steps.iter().zip(exercise.chords()) {
        let expected: Vec<u8> = chord.midi_notes().iter().map(|&n| n as u8).collect();
        assert_eq!(step.notes, expected);
    }
}

#[test]
fn test_repeat_with_auto_start() {
    let options = SessionOptions {
        restart_policy: RestartPolicy::AutoStartOnFirstNote,
    };
    let mut session = PracticeSession::with_settings(PracticeSettings::default(), options);
    session.start_practice();
    assert_eq!(completions(&play_through(&mut session)), 1);
    assert_eq!(completions(&play_through(&mut session)), 1);
}

#[test]
fn test_repeat_requires_start_by_default() {
    let mut session =
        PracticeSession::with_settings(PracticeSettings::default(), SessionOptions::default());
    session.start_practice();
    assert_eq!(completions(&play_through(&mut session)), 1);
    assert_eq!(completions(&play_through(&mut session)), 0);
    session.start_practice();
    assert_eq!(completions(&play_through(&mut session)), 1);
}

#[test]
fn test_reconfigure_mid_exercise() {
    let mut session =
        PracticeSession::with_settings(PracticeSettings::default(), SessionOptions::default());
    session.start_practice();
    session.handle_note_pressed(60);
    session.handle_note_pressed(62);
    assert_eq!(session.current_step_index(), 2);

    session.set_practice_mode(PracticeMode::ChordsByKey);
    assert!(!session.is_active());
    assert_eq!(session.current_step_index(), 0);
    assert_eq!(session.exercise().unwrap().metadata.mode, PracticeMode::ChordsByKey);

    let range = session.keyboard_range();
    for note in session.exercise().unwrap().all_notes() {
        assert!(range.contains(note));
    }
}
