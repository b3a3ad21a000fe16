use log::warn;
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod error;
pub mod exercises;
pub mod midi;
pub mod session;
pub mod theory;

use error::PracticeError;
use exercises::config::{HandSelection, PracticeMode, PracticeSettings};
use midi::decode::{decode_message, MidiChannel};
use midi::input::NoteInput;
use session::highlight::keyboard_range;
use session::{PracticeSession, SessionEffect, SessionOptions};
use theory::arpeggios::{ArpeggioOctaves, ArpeggioType};
use theory::chords::ChordType;
use theory::notes::MusicalNote;
use theory::progressions::find_progression;
use theory::scales::ScaleType;

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| js_error(PracticeError::Serialization(e.to_string())))
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| js_error(PracticeError::Serialization(e.to_string())))
}

/// Like `from_js`, but `null`/`undefined` yield the default.
fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T, JsValue> {
    if value.is_null() || value.is_undefined() {
        Ok(T::default())
    } else {
        from_js(value)
    }
}

fn js_error(error: PracticeError) -> JsValue {
    JsValue::from_str(&error.to_string())
}

/// Build the exercise for a settings object, returning a PracticeExercise.
#[wasm_bindgen]
pub fn generate_exercise(settings_js: JsValue) -> Result<JsValue, JsValue> {
    let settings: PracticeSettings = from_js_or_default(settings_js)?;
    let exercise = exercises::generators::initialize_exercise(&settings.to_config());
    to_js(&exercise)
}

/// The 49-key window for the exercise a settings object produces.
#[wasm_bindgen]
pub fn keyboard_range_for(settings_js: JsValue) -> Result<JsValue, JsValue> {
    let settings: PracticeSettings = from_js_or_default(settings_js)?;
    let exercise = exercises::generators::initialize_exercise(&settings.to_config());
    to_js(&keyboard_range(Some(&exercise)))
}

/// Decode one raw MIDI message. Returns `null` for filtered or malformed input.
#[wasm_bindgen]
pub fn decode_midi(bytes: &[u8]) -> Result<JsValue, JsValue> {
    match decode_message(bytes) {
        Some(event) => to_js(&event),
        None => Ok(JsValue::NULL),
    }
}

/// Note-on bytes for echoing a virtual key press to a device. `channel` is
/// 0-15; velocity defaults to 100.
#[wasm_bindgen]
pub fn midi_note_on(channel: u8, note: i32, velocity: Option<u8>) -> Result<Vec<u8>, JsValue> {
    let channel = MidiChannel::new(channel).map_err(js_error)?;
    let note = theory::notes::validate_midi_note(note).map_err(js_error)?;
    let velocity = velocity.unwrap_or(midi::encode::DEFAULT_VELOCITY);
    Ok(midi::encode::note_on_bytes(channel, note, velocity).to_vec())
}

#[wasm_bindgen]
pub fn midi_note_off(channel: u8, note: i32) -> Result<Vec<u8>, JsValue> {
    let channel = MidiChannel::new(channel).map_err(js_error)?;
    let note = theory::notes::validate_midi_note(note).map_err(js_error)?;
    Ok(midi::encode::note_off_bytes(channel, note).to_vec())
}

#[wasm_bindgen]
pub fn list_chord_progressions() -> Result<JsValue, JsValue> {
    to_js(&exercises::catalog::get_progression_catalog())
}

#[wasm_bindgen]
pub fn get_practice_catalog() -> Result<JsValue, JsValue> {
    to_js(&exercises::catalog::get_practice_catalog())
}

/// A practice session owned by one practice screen. Highlight, step and
/// completion effects are delivered to the registered JS callbacks.
#[wasm_bindgen]
pub struct PracticeSessionHandle {
    session: PracticeSession,
    on_highlight: Option<js_sys::Function>,
    on_step: Option<js_sys::Function>,
    on_complete: Option<js_sys::Function>,
}

impl PracticeSessionHandle {
    fn dispatch(&self, effects: Vec<SessionEffect>) -> Result<(), JsValue> {
        for effect in effects {
            match effect {
                SessionEffect::HighlightChanged(notes) => {
                    if let Some(callback) = &self.on_highlight {
                        callback.call1(&JsValue::NULL, &to_js(&notes)?)?;
                    }
                }
                SessionEffect::StepAdvanced(index) => {
                    if let Some(callback) = &self.on_step {
                        callback.call1(&JsValue::NULL, &JsValue::from(index as u32))?;
                    }
                }
                SessionEffect::ExerciseCompleted => {
                    if let Some(callback) = &self.on_complete {
                        callback.call0(&JsValue::NULL)?;
                    }
                }
            }
        }
        Ok(())
    }
}

#[wasm_bindgen]
impl PracticeSessionHandle {
    #[wasm_bindgen(constructor)]
    pub fn new(settings_js: JsValue, options_js: JsValue) -> Result<PracticeSessionHandle, JsValue> {
        let settings: PracticeSettings = from_js_or_default(settings_js)?;
        let options: SessionOptions = from_js_or_default(options_js)?;
        Ok(PracticeSessionHandle {
            session: PracticeSession::with_settings(settings, options),
            on_highlight: None,
            on_step: None,
            on_complete: None,
        })
    }

    /// Called with an array of `{ note, octave }`; an empty array clears the highlight.
    pub fn set_highlight_callback(&mut self, callback: js_sys::Function) {
        self.on_highlight = Some(callback);
    }

    /// Called with the new step index after every advance.
    pub fn set_step_callback(&mut self, callback: js_sys::Function) {
        self.on_step = Some(callback);
    }

    /// Called with no arguments when an exercise is completed.
    pub fn set_completion_callback(&mut self, callback: js_sys::Function) {
        self.on_complete = Some(callback);
    }

    pub fn start(&mut self) -> Result<(), JsValue> {
        let effects = self.session.start_practice();
        self.dispatch(effects)
    }

    pub fn reset(&mut self) -> Result<(), JsValue> {
        let effects = self.session.reset_practice();
        self.dispatch(effects)
    }

    /// On-screen key press. Rejects notes outside 0-127.
    pub fn note_pressed(&mut self, note: i32) -> Result<(), JsValue> {
        let input = NoteInput::virtual_press(note).map_err(js_error)?;
        let effects = self.session.handle_input(input);
        self.dispatch(effects)
    }

    pub fn note_released(&mut self, note: i32) -> Result<(), JsValue> {
        let input = NoteInput::virtual_release(note).map_err(js_error)?;
        let effects = self.session.handle_input(input);
        self.dispatch(effects)
    }

    /// Raw bytes from a connected MIDI device.
    pub fn midi_message(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        let effects = self.session.handle_midi_message(bytes);
        self.dispatch(effects)
    }

    pub fn configure(&mut self, settings_js: JsValue) -> Result<(), JsValue> {
        let settings: PracticeSettings = from_js(settings_js)?;
        let effects = self.session.set_settings(settings);
        self.dispatch(effects)
    }

    pub fn set_options(&mut self, options_js: JsValue) -> Result<(), JsValue> {
        let options: SessionOptions = from_js(options_js)?;
        self.session.set_options(options);
        Ok(())
    }

    pub fn set_practice_mode(&mut self, mode_js: JsValue) -> Result<(), JsValue> {
        let mode: PracticeMode = from_js(mode_js)?;
        let effects = self.session.set_practice_mode(mode);
        self.dispatch(effects)
    }

    pub fn set_selected_key(&mut self, key: &str) -> Result<(), JsValue> {
        let key = MusicalNote::parse(key).map_err(|e| JsValue::from_str(&e))?;
        let effects = self.session.set_selected_key(key);
        self.dispatch(effects)
    }

    pub fn set_selected_scale_type(&mut self, scale_type_js: JsValue) -> Result<(), JsValue> {
        let scale_type: ScaleType = from_js(scale_type_js)?;
        let effects = self.session.set_selected_scale_type(scale_type);
        self.dispatch(effects)
    }

    pub fn set_selected_root_note(&mut self, root: &str) -> Result<(), JsValue> {
        let root = MusicalNote::parse(root).map_err(|e| JsValue::from_str(&e))?;
        let effects = self.session.set_selected_root_note(root);
        self.dispatch(effects)
    }

    pub fn set_selected_arpeggio_type(&mut self, arpeggio_type_js: JsValue) -> Result<(), JsValue> {
        let arpeggio_type: ArpeggioType = from_js(arpeggio_type_js)?;
        let effects = self.session.set_selected_arpeggio_type(arpeggio_type);
        self.dispatch(effects)
    }

    pub fn set_selected_arpeggio_octaves(&mut self, octaves_js: JsValue) -> Result<(), JsValue> {
        let octaves: ArpeggioOctaves = from_js(octaves_js)?;
        let effects = self.session.set_selected_arpeggio_octaves(octaves);
        self.dispatch(effects)
    }

    /// Select a library progression by name. Unknown names and `undefined`
    /// clear the selection, which falls back to I-V.
    pub fn set_selected_chord_progression(&mut self, name: Option<String>) -> Result<(), JsValue> {
        let progression = name.and_then(|name| match find_progression(&name) {
            Ok(progression) => Some(progression),
            Err(e) => {
                warn!("{}; falling back to the default progression", e);
                None
            }
        });
        let effects = self.session.set_selected_chord_progression(progression);
        self.dispatch(effects)
    }

    pub fn set_selected_chord_type(&mut self, chord_type_js: JsValue) -> Result<(), JsValue> {
        let chord_type: ChordType = from_js(chord_type_js)?;
        let effects = self.session.set_selected_chord_type(chord_type);
        self.dispatch(effects)
    }

    pub fn set_include_inversions(&mut self, include: bool) -> Result<(), JsValue> {
        let effects = self.session.set_include_inversions(include);
        self.dispatch(effects)
    }

    pub fn set_selected_hand_selection(&mut self, hands_js: JsValue) -> Result<(), JsValue> {
        let hands: HandSelection = from_js(hands_js)?;
        let effects = self.session.set_selected_hand_selection(hands);
        self.dispatch(effects)
    }

    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    pub fn current_step_index(&self) -> usize {
        self.session.current_step_index()
    }

    pub fn step_count(&self) -> usize {
        self.session.progress().1
    }

    pub fn exercise(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.exercise())
    }

    pub fn settings(&self) -> Result<JsValue, JsValue> {
        to_js(self.session.settings())
    }

    pub fn highlighted_notes(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.highlighted_notes())
    }

    pub fn keyboard_range(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.keyboard_range())
    }
}
