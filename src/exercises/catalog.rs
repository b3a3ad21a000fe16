use serde::Serialize;

use crate::theory::progressions::{progression_library, ProgressionDifficulty};

use super::config::PracticeMode;

#[derive(Serialize, Clone, Debug)]
pub struct ProgressionEntry {
    pub name: String,
    pub roman_numerals: Vec<String>,
    pub difficulty: ProgressionDifficulty,
}

#[derive(Serialize, Clone, Debug)]
pub struct PracticeModeEntry {
    pub mode: PracticeMode,
    pub name: String,
    pub description: String,
    pub difficulty: u8,
    /// Settings fields that affect this mode's exercise.
    pub settings: Vec<String>,
    pub uses_hand_selection: bool,
}

fn entry(
    mode: PracticeMode,
    name: &str,
    description: &str,
    difficulty: u8,
    settings: &[&str],
) -> PracticeModeEntry {
    PracticeModeEntry {
        mode,
        name: name.to_string(),
        description: description.to_string(),
        difficulty,
        settings: settings.iter().map(|s| s.to_string()).collect(),
        uses_hand_selection: settings.contains(&"hand_selection"),
    }
}

/// Practice modes in the order a configuration screen lists them.
pub fn get_practice_catalog() -> Vec<PracticeModeEntry> {
    PracticeMode::ALL
        .iter()
        .map(|&mode| match mode {
            PracticeMode::Scales => entry(
                mode,
                "Scales",
                "Play a scale up and back down, one hand or both hands together",
                1,
                &["key", "scale_type", "hand_selection"],
            ),
            PracticeMode::Arpeggios => entry(
                mode,
                "Arpeggios",
                "Broken chords across one or two octaves",
                2,
                &["root_note", "arpeggio_type", "arpeggio_octaves", "hand_selection"],
            ),
            PracticeMode::ChordsByKey => entry(
                mode,
                "Chords by Key",
                "Every diatonic triad of a key, voiced to keep the hand close",
                2,
                &["key", "scale_type"],
            ),
            PracticeMode::ChordsByType => entry(
                mode,
                "Chords by Type",
                "One chord shape moved through all twelve roots",
                3,
                &["chord_type", "include_inversions"],
            ),
            PracticeMode::ChordProgressions => entry(
                mode,
                "Chord Progressions",
                "Common progressions played in any key",
                3,
                &["key", "chord_progression"],
            ),
        })
        .collect()
}

/// The progression library as a configuration screen displays it.
pub fn get_progression_catalog() -> Vec<ProgressionEntry> {
    progression_library()
        .iter()
        .map(|p| ProgressionEntry {
            name: p.name.clone(),
            roman_numerals: p.roman_numerals().iter().map(|s| s.to_string()).collect(),
            difficulty: p.difficulty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_structure() {
        let catalog = get_practice_catalog();
        assert_eq!(catalog.len(), PracticeMode::ALL.len());
        for (entry, mode) in catalog.iter().zip(PracticeMode::ALL) {
            assert_eq!(entry.mode, mode);
            assert!(!entry.settings.is_empty());
            assert!((1..=3).contains(&entry.difficulty));
        }
    }

    #[test]
    fn test_hand_selection_only_for_single_line_modes() {
        let with_hands: Vec<PracticeMode> = get_practice_catalog()
            .into_iter()
            .filter(|e| e.uses_hand_selection)
            .map(|e| e.mode)
            .collect();
        assert_eq!(with_hands, vec![PracticeMode::Scales, PracticeMode::Arpeggios]);
    }

    #[test]
    fn test_progression_difficulty_progression() {
        let progressions = get_progression_catalog();
        assert_eq!(progressions[0].name, "I-V");
        for pair in progressions.windows(2) {
            assert!(
                pair[0].difficulty <= pair[1].difficulty,
                "'{}' listed after harder progression",
                pair[1].name
            );
        }
    }
}
