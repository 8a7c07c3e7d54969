use async_trait::async_trait;
use bytes::Bytes;
use log::{debug, error};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{status_error, transport_error, SpeechSynthesizer};

/// Fish Audio text-to-speech client
#[derive(Debug)]
pub struct FishAudio {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. `https://api.fish.audio`
    endpoint: String,
    /// Audio container requested from the API
    format: String,
}

/// TTS request body
#[derive(Debug, Serialize)]
pub struct TtsRequest<'a> {
    /// Text to speak
    text: &'a str,
    /// Voice model id
    reference_id: &'a str,
    /// Output format (mp3, wav, opus)
    format: &'a str,
}

impl FishAudio {
    /// Create a new Fish Audio client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        format: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            format: format.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for FishAudio {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ProviderError> {
        let api_url = format!("{}/v1/tts", self.endpoint.trim_end_matches('/'));
        let request = TtsRequest {
            text,
            reference_id: voice_id,
            format: &self.format,
        };

        let response = self
            .client
            .post(&api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Fish Audio API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if audio.is_empty() {
            return Err(ProviderError::ParseError(
                "Fish Audio returned an empty audio body".to_string(),
            ));
        }

        debug!("Synthesized {} bytes with voice {}", audio.len(), voice_id);
        Ok(audio)
    }

    fn audio_extension(&self) -> &str {
        &self.format
    }
}
