use anyhow::{Context, Result};
use futures::stream::{self, StreamExt, TryStreamExt};
use indicatif::ProgressBar;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::characters::CharacterRegistry;
use crate::file_utils::FileManager;
use crate::media::MediaProbe;
use crate::providers::SpeechSynthesizer;
use crate::script::{DialogueLine, DialogueScript, VoicedScript};

// @module: Speech synthesis for every script line

/// File name for one synthesized line, e.g. `003_Peter.mp3`
pub fn audio_file_name(index: usize, speaker: &str, extension: &str) -> String {
    let safe_speaker: String = speaker
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{:03}_{}.{}", index, safe_speaker, extension)
}

/// Voices a script line by line
///
/// Lines are synthesized concurrently (bounded by `concurrency`) and come back
/// in script order.
#[derive(Debug, Clone)]
pub struct SpeechStage {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    probe: Arc<dyn MediaProbe>,
    audio_dir: PathBuf,
    concurrency: usize,
}

impl SpeechStage {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        probe: Arc<dyn MediaProbe>,
        audio_dir: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Self {
        Self {
            synthesizer,
            probe,
            audio_dir: audio_dir.into(),
            concurrency: concurrency.max(1),
        }
    }

    /// Synthesize every line of `script` and attach audio and character assets
    pub async fn voice(
        &self,
        script: &DialogueScript,
        registry: &CharacterRegistry,
        progress: &ProgressBar,
    ) -> Result<VoicedScript> {
        FileManager::ensure_dir(&self.audio_dir)?;

        // Resolve every speaker before spending any synthesis requests
        let characters = script
            .dialogue
            .iter()
            .map(|line| registry.lookup(&line.speaker))
            .collect::<Result<Vec<_>, _>>()?;

        progress.set_length(script.dialogue.len() as u64);
        info!("Synthesizing {} lines", script.dialogue.len());

        let dialogue: Vec<DialogueLine> = stream::iter(
            script.dialogue.iter().cloned().zip(characters).enumerate(),
        )
        .map(|(index, (line, character))| async move {
            let path = self
                .audio_dir
                .join(audio_file_name(index, &line.speaker, self.synthesizer.audio_extension()));

            debug!("Generating audio for {} (line {})", line.speaker, index);
            let audio = self
                .synthesizer
                .synthesize(&line.text, &character.voice_id)
                .await
                .with_context(|| format!("Speech synthesis failed for line {} ({})", index, line.speaker))?;
            FileManager::write_bytes(&path, &audio)?;

            let duration = self
                .probe
                .duration_secs(&path)
                .await
                .with_context(|| format!("Failed to read duration of {:?}", path))?;

            progress.inc(1);
            Ok::<_, anyhow::Error>(line.into_dialogue_line(index, character, path, duration))
        })
        .buffered(self.concurrency)
        .try_collect()
        .await?;

        progress.finish_and_clear();

        Ok(VoicedScript {
            topic: script.topic.clone(),
            length_seconds: script.length_seconds,
            dialogue,
        })
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }
}
