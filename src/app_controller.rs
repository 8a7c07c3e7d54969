use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::app_config::Config;
use crate::archive;
use crate::characters::CharacterRegistry;
use crate::media::{FfprobeProbe, MediaProbe};
use crate::providers::fish_audio::FishAudio;
use crate::providers::openai::OpenAI;
use crate::providers::{SpeechSynthesizer, TextGenerator};
use crate::quiz;
use crate::render::{Compositor, FfmpegCompositor};
use crate::script::VoicedScript;
use crate::script_writer::{ScriptRequest, ScriptWriter};
use crate::speech::SpeechStage;
use crate::timeline::{BackgroundSource, Timeline, TimelineAssembler};

// @module: Application controller for the video pipeline

/// External services the pipeline depends on
#[derive(Debug, Clone)]
pub struct Collaborators {
    // @field: Script and quiz writer
    pub text: Arc<dyn TextGenerator>,
    // @field: Line voicing
    pub speech: Arc<dyn SpeechSynthesizer>,
    // @field: Duration and size probing
    pub probe: Arc<dyn MediaProbe>,
    // @field: Final render
    pub compositor: Arc<dyn Compositor>,
}

impl Collaborators {
    /// Production collaborators built from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            text: Arc::new(OpenAI::new(
                &config.script.api_key,
                &config.script.endpoint,
                &config.script.model,
                config.script.timeout_secs,
            )),
            speech: Arc::new(FishAudio::new(
                &config.speech.api_key,
                &config.speech.endpoint,
                &config.speech.format,
                config.speech.timeout_secs,
            )),
            probe: Arc::new(FfprobeProbe::new(&config.render.ffprobe_path)),
            compositor: Arc::new(FfmpegCompositor::new(config.render.clone())),
        }
    }
}

/// Files produced by one pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Archived video, e.g. `posted/004.mp4`
    pub video_path: PathBuf,
    /// Quiz for the video, when quizzes are enabled
    pub quiz_path: Option<PathBuf>,
    /// Length of the rendered video in seconds
    pub duration_secs: f64,
}

/// Main application controller: script, speech, timeline, render, archive, quiz
#[derive(Debug)]
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Known characters
    registry: CharacterRegistry,
    collaborators: Collaborators,
}

impl Controller {
    // @method: Create a controller with production providers
    pub fn with_config(config: Config) -> Result<Self> {
        let registry = CharacterRegistry::from_file(&config.paths.characters_file)?;
        let collaborators = Collaborators::from_config(&config);
        Ok(Self::with_collaborators(config, registry, collaborators))
    }

    /// Create a controller around explicit collaborators
    pub fn with_collaborators(
        config: Config,
        registry: CharacterRegistry,
        collaborators: Collaborators,
    ) -> Self {
        Self {
            config,
            registry,
            collaborators,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &CharacterRegistry {
        &self.registry
    }

    /// Run the whole pipeline for one video
    pub async fn run(&self, request: ScriptRequest) -> Result<RunSummary> {
        let start_time = Instant::now();
        let paths = &self.config.paths;

        // 1. Script
        let writer = ScriptWriter::new(self.collaborators.text.clone(), self.config.script.temperature);
        let script = writer
            .write(&request, &self.registry)
            .await
            .context("Script generation failed")?;

        // 2. Speech
        let stage = SpeechStage::new(
            self.collaborators.speech.clone(),
            self.collaborators.probe.clone(),
            &paths.audio_dir,
            self.config.speech.concurrent_requests,
        );
        let progress = Self::progress_bar(script.dialogue.len() as u64);
        let voiced = stage.voice(&script, &self.registry, &progress).await?;
        voiced
            .save(&paths.script_file)
            .with_context(|| format!("Failed to save script to {:?}", paths.script_file))?;
        info!("Saved voiced script to {:?}", paths.script_file);

        // 3. Timeline
        let background_path = archive::pick_random_background(&paths.backgrounds_dir)?;
        let timeline = self.assemble(&voiced, &background_path).await?;

        // 4. Render and archive
        self.collaborators
            .compositor
            .render(&timeline, &paths.output_file)
            .await
            .context("Rendering failed")?;

        let video_path = archive::archive_video(&paths.output_file, &paths.posted_dir)?;
        archive::clear_directory_files(&paths.audio_dir)?;

        // 5. Quiz
        let quiz_path = if self.config.quiz.enabled {
            let path = quiz::write_quiz_for_video(
                self.collaborators.text.as_ref(),
                &voiced,
                &video_path,
                &paths.quizzes_dir,
                self.config.quiz.question_count,
                self.config.quiz.temperature,
                self.config.quiz.max_attempts,
            )
            .await
            .with_context(|| format!("Quiz generation failed for {:?}", video_path))?;
            Some(path)
        } else {
            None
        };

        info!(
            "Done: {:?} ({:.1}s video) in {:.1}s",
            video_path,
            timeline.total_duration,
            start_time.elapsed().as_secs_f64()
        );

        Ok(RunSummary {
            video_path,
            quiz_path,
            duration_secs: timeline.total_duration,
        })
    }

    /// Build the timeline for a voiced script saved on disk
    pub async fn assemble_from_script(&self, script_path: &Path, background: &Path) -> Result<Timeline> {
        let voiced = VoicedScript::load(script_path)?;
        self.assemble(&voiced, background).await
    }

    async fn assemble(&self, voiced: &VoicedScript, background: &Path) -> Result<Timeline> {
        let (width, height) = self
            .collaborators
            .probe
            .dimensions(background)
            .await
            .with_context(|| format!("Failed to read background dimensions of {:?}", background))?;
        let source = BackgroundSource::new(background, width, height);

        let assembler = TimelineAssembler::new(&self.registry, &self.config.layout);
        let timeline = assembler
            .assemble(&voiced.topic, &source, &voiced.dialogue)
            .context("Timeline assembly failed")?;
        Ok(timeline)
    }

    fn progress_bar(len: u64) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} lines ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%)"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }
}
