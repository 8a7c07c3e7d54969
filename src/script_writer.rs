/*!
 * Dialogue script generation.
 *
 * Builds the script prompt for an (explainer, contrarian) pair, asks a
 * `TextGenerator` for the script and validates what comes back against the
 * character registry.
 */

use log::{info, warn};
use std::sync::Arc;

use crate::characters::CharacterRegistry;
use crate::errors::ScriptError;
use crate::providers::{strip_code_fences, TextGenerator};
use crate::script::DialogueScript;

/// What the script should be about and who performs it
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptRequest {
    pub topic: String,
    /// Target video length in seconds
    pub length_seconds: u32,
    pub explainer: String,
    pub contrarian: String,
}

impl ScriptRequest {
    pub fn new(
        topic: impl Into<String>,
        length_seconds: u32,
        explainer: impl Into<String>,
        contrarian: impl Into<String>,
    ) -> Self {
        Self {
            topic: topic.into(),
            length_seconds,
            explainer: explainer.into(),
            contrarian: contrarian.into(),
        }
    }
}

/// Build the prompt asking for a JSON dialogue script
pub fn build_script_prompt(request: &ScriptRequest) -> String {
    let ScriptRequest {
        topic,
        length_seconds,
        explainer,
        contrarian,
    } = request;

    format!(
        r#"Create a funny but educational short-form video dialogue script.

Topic: {topic}
Length: {length_seconds} seconds

Characters:
Explainer: {explainer}
Contrarian: {contrarian}

Requirements:
- Explainer starts first
- Characters strictly alternate dialogue
- Contrarian disagrees or misunderstands humorously
- Each dialogue line must be its own entry
- Return ONLY valid JSON
- No markdown
- No extra text

Use this EXACT schema and EXACT character names:

{{
  "topic": "{topic}",
  "length_seconds": {length_seconds},
  "dialogue": [
    {{
      "speaker": "{explainer}",
      "role": "explainer",
      "text": "dialogue here"
    }},
    {{
      "speaker": "{contrarian}",
      "role": "contrarian",
      "text": "dialogue here"
    }}
  ]
}}
"#
    )
}

/// Parse and validate a script returned by the model
pub fn parse_script(
    raw: &str,
    registry: &CharacterRegistry,
) -> Result<DialogueScript, ScriptError> {
    let script: DialogueScript = serde_json::from_str(strip_code_fences(raw))
        .map_err(|e| ScriptError::Malformed(e.to_string()))?;

    if script.dialogue.is_empty() {
        return Err(ScriptError::EmptyDialogue);
    }

    if script.topic.trim().is_empty() {
        return Err(ScriptError::Malformed("topic is blank".to_string()));
    }

    if let Some(unknown) = script
        .dialogue
        .iter()
        .find(|line| !registry.contains(&line.speaker))
    {
        return Err(ScriptError::UnknownCharacter(unknown.speaker.clone()));
    }

    if let Some(index) = script.dialogue.iter().position(|line| line.text.trim().is_empty()) {
        return Err(ScriptError::Malformed(format!("line {} has no text", index)));
    }

    if let Some(index) = script.first_alternation_break() {
        warn!("Script breaks explainer/contrarian alternation at line {}", index);
    }

    Ok(script)
}

/// Generates dialogue scripts with an injected text generator
#[derive(Debug, Clone)]
pub struct ScriptWriter {
    generator: Arc<dyn TextGenerator>,
    temperature: f32,
}

impl ScriptWriter {
    pub fn new(generator: Arc<dyn TextGenerator>, temperature: f32) -> Self {
        Self {
            generator,
            temperature,
        }
    }

    /// Generate a script for `request`
    ///
    /// Both characters are checked against the registry before the model is
    /// called, and every speaker in the answer is checked again afterwards.
    pub async fn write(
        &self,
        request: &ScriptRequest,
        registry: &CharacterRegistry,
    ) -> Result<DialogueScript, ScriptError> {
        for name in [&request.explainer, &request.contrarian] {
            if !registry.contains(name) {
                return Err(ScriptError::UnknownCharacter(name.clone()));
            }
        }

        info!(
            "Writing script about '{}' for {} and {}",
            request.topic, request.explainer, request.contrarian
        );

        let prompt = build_script_prompt(request);
        let raw = self.generator.generate(&prompt, self.temperature).await?;
        let script = parse_script(&raw, registry)?;

        info!("Script ready: {} lines", script.dialogue.len());
        Ok(script)
    }
}
