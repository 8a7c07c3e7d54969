use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::characters::Character;
use crate::file_utils::FileManager;

// @module: Dialogue script data model

/// Part a character plays in the dialogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Explains the topic; always speaks first
    Explainer,
    /// Disagrees or misunderstands, humorously
    Contrarian,
}

impl Role {
    /// The role expected to speak after this one
    pub fn next(self) -> Self {
        match self {
            Self::Explainer => Self::Contrarian,
            Self::Contrarian => Self::Explainer,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explainer => write!(f, "explainer"),
            Self::Contrarian => write!(f, "contrarian"),
        }
    }
}

/// A single turn as produced by the script generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub speaker: String,
    pub role: Role,
    pub text: String,
}

impl ScriptLine {
    pub fn new(speaker: impl Into<String>, role: Role, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            role,
            text: text.into(),
        }
    }

    /// Attach synthesized audio and the character's assets to this line
    pub fn into_dialogue_line(
        self,
        index: usize,
        character: &Character,
        audio_path: PathBuf,
        audio_duration_secs: f64,
    ) -> DialogueLine {
        DialogueLine {
            index,
            speaker: self.speaker,
            role: self.role,
            text: self.text,
            voice_id: character.voice_id.clone(),
            image_path: character.portrait.clone(),
            audio_path,
            audio_duration_secs,
        }
    }
}

/// Script as returned by the language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueScript {
    pub topic: String,

    /// Requested video length; a target for the model, not enforced
    #[serde(default)]
    pub length_seconds: u32,

    pub dialogue: Vec<ScriptLine>,
}

impl DialogueScript {
    /// Index of the first line that breaks explainer/contrarian alternation
    pub fn first_alternation_break(&self) -> Option<usize> {
        let mut expected = Role::Explainer;
        for (index, line) in self.dialogue.iter().enumerate() {
            if line.role != expected {
                return Some(index);
            }
            expected = expected.next();
        }
        None
    }

    /// "Speaker: text" transcript, one line per turn
    pub fn transcript(&self) -> String {
        transcript_of(self.dialogue.iter().map(|l| (l.speaker.as_str(), l.text.as_str())))
    }
}

/// A dialogue line with its audio attached
///
/// Created by the speech stage and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub index: usize,
    pub speaker: String,
    pub role: Role,
    pub text: String,
    pub voice_id: String,
    pub image_path: PathBuf,
    /// Opaque handle to the synthesized audio asset
    pub audio_path: PathBuf,
    pub audio_duration_secs: f64,
}

/// Script whose lines all carry audio, as saved to `final_script.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoicedScript {
    pub topic: String,
    #[serde(default)]
    pub length_seconds: u32,
    pub dialogue: Vec<DialogueLine>,
}

impl VoicedScript {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse voiced script: {:?}", path))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize voiced script")?;
        FileManager::write_to_file(path, &json)
    }

    pub fn transcript(&self) -> String {
        transcript_of(self.dialogue.iter().map(|l| (l.speaker.as_str(), l.text.as_str())))
    }
}

fn transcript_of<'a>(lines: impl Iterator<Item = (&'a str, &'a str)>) -> String {
    lines
        .map(|(speaker, text)| format!("{}: {}", speaker, text))
        .collect::<Vec<_>>()
        .join("\n")
}
