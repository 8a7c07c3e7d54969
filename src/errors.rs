/*!
 * Error types for the reelwright application.
 *
 * Timeline assembly, the provider clients and the post-render steps each get
 * their own error enum, using the thiserror crate for ergonomic definitions.
 * `AppError` wraps all of them for callers that want a single type.
 */

use thiserror::Error;

/// Errors raised while turning dialogue lines into a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Negative/NaN durations, bad layout values or malformed text
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A speaker that is not present in the character registry
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    /// The dialogue has no lines, so there is nothing to narrate
    #[error("Dialogue is empty")]
    EmptyDialogue,
}

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while generating the dialogue script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// Error from the text generation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The model answered with something that is not a usable script
    #[error("Malformed script: {0}")]
    Malformed(String),

    /// A requested or generated speaker is missing from the registry
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    /// The model returned a script without dialogue lines
    #[error("Generated script has no dialogue")]
    EmptyDialogue,
}

/// Errors that can occur while generating a comprehension quiz
#[derive(Error, Debug)]
pub enum QuizError {
    /// Every attempt returned nothing usable
    #[error("Failed to generate valid quiz JSON after {attempts} attempts")]
    AttemptsExhausted {
        /// Number of attempts that were made
        attempts: u32,
    },

    /// The attempt budget was zero
    #[error("Quiz attempt budget must be at least 1")]
    NoAttempts,
}

/// Errors that can occur while rendering the final video
#[derive(Error, Debug)]
pub enum RenderError {
    /// The external tool could not be started
    #[error("Failed to launch {tool}: {message}")]
    Launch {
        /// Tool name (ffmpeg, ffprobe)
        tool: String,
        /// Underlying OS error
        message: String,
    },

    /// The external tool ran and reported a failure
    #[error("{tool} failed: {message}")]
    ToolFailed {
        /// Tool name (ffmpeg, ffprobe)
        tool: String,
        /// Filtered stderr output
        message: String,
    },

    /// The timeline cannot be expressed as a render job
    #[error("Unrenderable timeline: {0}")]
    Unrenderable(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from timeline assembly
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from script generation
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from quiz generation
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),

    /// Error from rendering
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
