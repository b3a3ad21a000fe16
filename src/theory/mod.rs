//! Pure music-theory tables: pitch classes, scales, chords, arpeggios and
//! roman-numeral progressions. Nothing here holds state.

pub mod arpeggios;
pub mod chords;
pub mod notes;
pub mod progressions;
pub mod scales;
