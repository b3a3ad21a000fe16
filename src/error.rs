use thiserror::Error;

/// Errors raised for caller contract violations.
///
/// User-driven input (MIDI bytes, wrong notes) never produces one of these:
/// malformed MIDI decodes to `None` and wrong notes are ignored by the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PracticeError {
    /// A MIDI channel outside 0-15 (0-based).
    #[error("MIDI channel {0} is out of range (expected 0-15)")]
    InvalidMidiChannel(u8),

    /// A note number outside 0-127.
    #[error("MIDI note {0} is out of range (expected 0-127)")]
    InvalidMidiNote(i32),

    /// A progression symbol that does not parse as a roman numeral.
    #[error("Invalid roman numeral: {0}")]
    InvalidRomanNumeral(String),

    #[error("Unknown chord progression: {0}")]
    UnknownProgression(String),

    /// Failure converting values across the host boundary.
    #[error("Serialization error: {0}")]
    Serialization(String),
}
