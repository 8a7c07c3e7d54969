/*!
 * Common test utilities for the reelwright test suite
 */

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use reelwright::characters::{Character, CharacterRegistry};
use reelwright::script::{DialogueLine, Role};


/// Route library logs through env_logger (RUST_LOG) once per test binary
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Registry with two characters, "Peter" (white captions) and "Stewie" (yellow)
pub fn sample_registry() -> CharacterRegistry {
    CharacterRegistry::new()
        .with_character(
            "Peter",
            Character {
                voice_id: "voice-peter".to_string(),
                portrait: PathBuf::from("images/peter.png"),
                color: "white".to_string(),
            },
        )
        .with_character(
            "Stewie",
            Character {
                voice_id: "voice-stewie".to_string(),
                portrait: PathBuf::from("images/stewie.png"),
                color: "yellow".to_string(),
            },
        )
}

/// The sample registry in `characters.json` form
pub const SAMPLE_CHARACTERS_JSON: &str = r#"{
  "Peter": { "reference_id": "voice-peter", "image": "images/peter.png", "color": "white" },
  "Stewie": { "reference_id": "voice-stewie", "image": "images/stewie.png", "color": "yellow" }
}"#;

/// A voiced dialogue line with placeholder assets
pub fn dialogue_line(index: usize, speaker: &str, text: &str, duration: f64) -> DialogueLine {
    let role = if index % 2 == 0 {
        Role::Explainer
    } else {
        Role::Contrarian
    };
    DialogueLine {
        index,
        speaker: speaker.to_string(),
        role,
        text: text.to_string(),
        voice_id: format!("voice-{}", speaker.to_lowercase()),
        image_path: PathBuf::from(format!("images/{}.png", speaker.to_lowercase())),
        audio_path: PathBuf::from(format!("audio/{:03}_{}.mp3", index, speaker)),
        audio_duration_secs: duration,
    }
}

/// A short alternating conversation between Peter and Stewie
pub fn sample_dialogue() -> Vec<DialogueLine> {
    vec![
        dialogue_line(0, "Peter", "the quick brown fox jumps", 5.0),
        dialogue_line(1, "Stewie", "nonsense, foxes never jump", 2.0),
        dialogue_line(2, "Peter", "they do when it matters", 3.5),
    ]
}

/// Script JSON as the language model would return it
pub fn sample_script_json(topic: &str) -> String {
    format!(
        r#"{{
  "topic": "{topic}",
  "length_seconds": 30,
  "dialogue": [
    {{ "speaker": "Peter", "role": "explainer", "text": "Tides come from the moon pulling on the ocean" }},
    {{ "speaker": "Stewie", "role": "contrarian", "text": "So the moon is just a giant bathtub drain" }},
    {{ "speaker": "Peter", "role": "explainer", "text": "More like a magnet for water, but gentler" }}
  ]
}}"#
    )
}

/// Quiz JSON as the language model would return it
pub fn sample_quiz_json() -> String {
    r#"{
  "topic": "tides",
  "video": "001.mp4",
  "questions": [
    { "question": "What causes tides?", "choices": ["Wind", "The moon", "Fish", "Boats"], "correct_index": 1 },
    { "question": "Who explains?", "choices": ["Stewie", "Nobody", "Peter", "The moon"], "correct_index": 2 },
    { "question": "Who disagrees?", "choices": ["Stewie", "Peter", "Lois", "Brian"], "correct_index": 0 }
  ]
}"#
    .to_string()
}
