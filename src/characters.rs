use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::errors::TimelineError;

// @module: Character registry (name -> voice, portrait, caption colour)

/// One character as described in `characters.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    // @field: Voice model id sent to the speech provider
    #[serde(rename = "reference_id")]
    pub voice_id: String,

    // @field: Portrait image shown while the character speaks
    #[serde(rename = "image")]
    pub portrait: PathBuf,

    // @field: Caption colour (ffmpeg colour name or hex)
    #[serde(default = "default_caption_color")]
    pub color: String,
}

fn default_caption_color() -> String {
    "white".to_string()
}

/// Static lookup table of known characters
///
/// Backed by a `BTreeMap` so iteration order (and anything serialized from it)
/// is stable between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CharacterRegistry {
    characters: BTreeMap<String, Character>,
}

impl CharacterRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from the JSON object format used by `characters.json`
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse character registry JSON")
    }

    /// Load a registry from a `characters.json` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read character file: {:?}", path))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Invalid character file: {:?}", path))
    }

    /// Add or replace a character
    pub fn insert(&mut self, name: impl Into<String>, character: Character) {
        self.characters.insert(name.into(), character);
    }

    /// Builder form of [`insert`](Self::insert)
    pub fn with_character(mut self, name: impl Into<String>, character: Character) -> Self {
        self.insert(name, character);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.characters.contains_key(name)
    }

    /// Resolve a speaker, failing with `UnknownCharacter` when absent
    pub fn lookup(&self, name: &str) -> Result<&Character, TimelineError> {
        self.characters
            .get(name)
            .ok_or_else(|| TimelineError::UnknownCharacter(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
