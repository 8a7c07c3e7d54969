/*!
 * Provider implementations for the external services the pipeline talks to.
 *
 * - OpenAI: text generation for scripts and quizzes (Responses API)
 * - Fish Audio: text-to-speech for each dialogue line
 * - Mock: scripted in-memory providers for tests
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// Common trait for text generation providers
///
/// Implementations are passed explicitly to the script writer and the quiz
/// generator so neither depends on a process-wide client.
#[async_trait]
pub trait TextGenerator: Send + Sync + Debug {
    /// Generate a completion for a single prompt
    ///
    /// # Arguments
    /// * `prompt` - The full prompt text
    /// * `temperature` - Sampling temperature
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The generated text (may be empty) or an error
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError>;
}

/// Common trait for speech synthesis providers
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + Debug {
    /// Convert one line of text into encoded audio using the given voice
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ProviderError>;

    /// File extension of the audio returned by `synthesize`
    fn audio_extension(&self) -> &str {
        "mp3"
    }
}

/// Strip a surrounding markdown code fence from a model answer
///
/// Models asked for bare JSON still sometimes wrap it in ```json fences.
pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Map an HTTP error status to a provider error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        code => ProviderError::ApiError {
            status_code: code,
            message: body,
        },
    }
}

/// Map a transport error to a provider error
pub(crate) fn transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

pub mod fish_audio;
pub mod mock;
pub mod openai;
