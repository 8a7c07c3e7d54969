use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};
use url::Url;

use crate::file_utils::FileManager;
use crate::timeline::LayoutConfig;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Script generation (language model) settings
    #[serde(default)]
    pub script: ScriptConfig,

    /// Speech synthesis settings
    #[serde(default)]
    pub speech: SpeechConfig,

    /// Comprehension quiz settings
    #[serde(default)]
    pub quiz: QuizConfig,

    /// Canvas and text layout
    #[serde(default)]
    pub layout: LayoutConfig,

    /// ffmpeg encoding settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Working files and directories
    #[serde(default)]
    pub paths: PathsConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Language model settings for script and quiz generation
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ScriptConfig {
    // @field: Model name
    #[serde(default = "default_script_model")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_openai_endpoint")]
    pub endpoint: String,

    /// Sampling temperature; high values give funnier, less predictable dialogue
    #[serde(default = "default_script_temperature")]
    pub temperature: f32,

    // @field: Timeout seconds
    #[serde(default = "default_llm_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            model: default_script_model(),
            api_key: String::new(),
            endpoint: default_openai_endpoint(),
            temperature: default_script_temperature(),
            timeout_secs: default_llm_timeout_secs(),
        }
    }
}

/// Text-to-speech settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SpeechConfig {
    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "default_fish_audio_endpoint")]
    pub endpoint: String,

    /// Audio format requested from the provider
    #[serde(default = "default_audio_format")]
    pub format: String,

    /// Maximum number of lines synthesized at the same time
    #[serde(default = "default_concurrent_requests")]
    pub concurrent_requests: usize,

    // @field: Timeout seconds
    #[serde(default = "default_tts_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_fish_audio_endpoint(),
            format: default_audio_format(),
            concurrent_requests: default_concurrent_requests(),
            timeout_secs: default_tts_timeout_secs(),
        }
    }
}

/// Quiz generation settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct QuizConfig {
    /// Whether a quiz is generated after each render
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Number of multiple choice questions
    #[serde(default = "default_question_count")]
    pub question_count: usize,

    /// Attempts before giving up on valid JSON
    #[serde(default = "default_quiz_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_script_temperature")]
    pub temperature: f32,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            question_count: default_question_count(),
            max_attempts: default_quiz_attempts(),
            temperature: default_script_temperature(),
        }
    }
}

/// Encoding settings passed to ffmpeg
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RenderConfig {
    /// ffmpeg executable
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg_path: String,

    /// ffprobe executable
    #[serde(default = "default_ffprobe")]
    pub ffprobe_path: String,

    /// Font used for title and captions
    #[serde(default = "default_font_path")]
    pub font_path: PathBuf,

    #[serde(default = "default_fps")]
    pub fps: u32,

    #[serde(default = "default_video_codec")]
    pub video_codec: String,

    #[serde(default = "default_audio_codec")]
    pub audio_codec: String,

    #[serde(default = "default_preset")]
    pub preset: String,

    #[serde(default = "default_threads")]
    pub threads: u32,

    /// Kill ffmpeg if it runs longer than this
    #[serde(default = "default_render_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg(),
            ffprobe_path: default_ffprobe(),
            font_path: default_font_path(),
            fps: default_fps(),
            video_codec: default_video_codec(),
            audio_codec: default_audio_codec(),
            preset: default_preset(),
            threads: default_threads(),
            timeout_secs: default_render_timeout_secs(),
        }
    }
}

/// Files and directories used by the pipeline
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathsConfig {
    #[serde(default = "default_characters_file")]
    pub characters_file: PathBuf,

    /// Pool of looping background videos (*.mp4)
    #[serde(default = "default_backgrounds_dir")]
    pub backgrounds_dir: PathBuf,

    /// Scratch directory for synthesized line audio
    #[serde(default = "default_audio_dir")]
    pub audio_dir: PathBuf,

    /// Archive of finished videos (NNN.mp4)
    #[serde(default = "default_posted_dir")]
    pub posted_dir: PathBuf,

    /// Quizzes matching archived videos (NNN.json)
    #[serde(default = "default_quizzes_dir")]
    pub quizzes_dir: PathBuf,

    /// Where the renderer writes before archiving
    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    /// Voiced script written after speech synthesis
    #[serde(default = "default_script_file")]
    pub script_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            characters_file: default_characters_file(),
            backgrounds_dir: default_backgrounds_dir(),
            audio_dir: default_audio_dir(),
            posted_dir: default_posted_dir(),
            quizzes_dir: default_quizzes_dir(),
            output_file: default_output_file(),
            script_file: default_script_file(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_script_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_fish_audio_endpoint() -> String {
    "https://api.fish.audio".to_string()
}

fn default_script_temperature() -> f32 {
    0.9
}

fn default_llm_timeout_secs() -> u64 {
    120
}

fn default_tts_timeout_secs() -> u64 {
    60
}

fn default_audio_format() -> String {
    "mp3".to_string()
}

fn default_concurrent_requests() -> usize {
    4
}

fn default_true() -> bool {
    true
}

fn default_question_count() -> usize {
    3
}

fn default_quiz_attempts() -> u32 {
    5
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

fn default_font_path() -> PathBuf {
    PathBuf::from("/System/Library/Fonts/Supplemental/Impact.ttf")
}

fn default_fps() -> u32 {
    30
}

fn default_video_codec() -> String {
    "libx264".to_string()
}

fn default_audio_codec() -> String {
    "aac".to_string()
}

fn default_preset() -> String {
    "ultrafast".to_string()
}

fn default_threads() -> u32 {
    4
}

fn default_render_timeout_secs() -> u64 {
    1800
}

fn default_characters_file() -> PathBuf {
    PathBuf::from("characters.json")
}

fn default_backgrounds_dir() -> PathBuf {
    PathBuf::from("backgrounds")
}

fn default_audio_dir() -> PathBuf {
    PathBuf::from("audio")
}

fn default_posted_dir() -> PathBuf {
    PathBuf::from("posted")
}

fn default_quizzes_dir() -> PathBuf {
    PathBuf::from("quizzes")
}

fn default_output_file() -> PathBuf {
    PathBuf::from("final_video.mp4")
}

fn default_script_file() -> PathBuf {
    PathBuf::from("final_script.json")
}

impl Config {
    /// Load a configuration file, or write and return the default one when missing
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let content = FileManager::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            return Ok((config, false));
        }

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        FileManager::write_to_file(path, &config_json)
            .with_context(|| format!("Failed to write default config to file: {:?}", path))?;
        Ok((config, true))
    }

    /// Validate the configuration for consistency and required values
    ///
    /// Credentials are checked separately by [`validate_credentials`](Self::validate_credentials)
    /// because offline commands never talk to a provider.
    pub fn validate(&self) -> Result<()> {
        self.layout
            .validate()
            .map_err(|e| anyhow!("Invalid layout: {}", e))?;

        Url::parse(&self.script.endpoint)
            .with_context(|| format!("Invalid script endpoint: {}", self.script.endpoint))?;
        Url::parse(&self.speech.endpoint)
            .with_context(|| format!("Invalid speech endpoint: {}", self.speech.endpoint))?;

        if self.speech.concurrent_requests == 0 {
            return Err(anyhow!("speech.concurrent_requests must be at least 1"));
        }
        if self.quiz.enabled && self.quiz.max_attempts == 0 {
            return Err(anyhow!("quiz.max_attempts must be at least 1"));
        }
        if self.quiz.enabled && self.quiz.question_count == 0 {
            return Err(anyhow!("quiz.question_count must be at least 1"));
        }
        if self.render.fps == 0 {
            return Err(anyhow!("render.fps must be positive"));
        }

        Ok(())
    }

    /// Check that API keys are present for the online providers
    pub fn validate_credentials(&self) -> Result<()> {
        if self.script.api_key.trim().is_empty() {
            return Err(anyhow!(
                "OpenAI API key is required (set script.api_key or OPENAI_API_KEY)"
            ));
        }
        if self.speech.api_key.trim().is_empty() {
            return Err(anyhow!(
                "Fish Audio API key is required (set speech.api_key or FISHAUDIO_API_KEY)"
            ));
        }
        Ok(())
    }
}
