/*!
 * # Reelwright - narrated dialogue shorts
 *
 * A Rust library that turns a topic and two characters into a vertical
 * short-form video: a generated dialogue script, one voiced audio clip per
 * line, a looping background, speaker portraits and word-chunked captions.
 *
 * ## Features
 *
 * - Dialogue script generation with an injected text model (OpenAI)
 * - Concurrent speech synthesis per line (Fish Audio)
 * - Deterministic timeline assembly:
 *   - Back-to-back line timing from audio durations
 *   - Caption chunks of a fixed number of words with proportional timing
 *   - Background cover fitting, title, portraits and captions in z-order
 * - Rendering through ffmpeg
 * - Archiving of finished videos and matching comprehension quizzes
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `timeline`: pure timeline assembly:
 *   - `timeline::timing`: line scheduling
 *   - `timeline::captions`: caption chunking
 *   - `timeline::layout`: canvas geometry and cover fitting
 *   - `timeline::layers`: layer and timeline types
 *   - `timeline::assembler`: the layer assembler
 * - `characters`: character registry (voice and portrait per name)
 * - `script`: script and dialogue line types
 * - `script_writer`: script prompt and validation
 * - `speech`: speech synthesis stage
 * - `media`: ffprobe-backed media inspection
 * - `render`: the compositor boundary and its ffmpeg implementation
 * - `archive`: background selection and output housekeeping
 * - `quiz`: comprehension quiz generation
 * - `providers`: clients for the external services:
 *   - `providers::openai`: OpenAI Responses API client
 *   - `providers::fish_audio`: Fish Audio TTS client
 *   - `providers::mock`: in-memory providers for tests
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::too_many_arguments)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod archive;
pub mod characters;
pub mod errors;
pub mod file_utils;
pub mod media;
pub mod providers;
pub mod quiz;
pub mod render;
pub mod script;
pub mod script_writer;
pub mod speech;
pub mod timeline;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Collaborators, Controller, RunSummary};
pub use characters::{Character, CharacterRegistry};
pub use errors::{AppError, ProviderError, QuizError, RenderError, ScriptError, TimelineError};
pub use script::{DialogueLine, DialogueScript, Role, ScriptLine, VoicedScript};
pub use script_writer::ScriptRequest;
pub use timeline::{BackgroundSource, Layer, LayoutConfig, Timeline, TimelineAssembler};
