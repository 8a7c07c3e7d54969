use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::errors::ProviderError;
use crate::providers::{status_error, transport_error, TextGenerator};

/// OpenAI client for the Responses API
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API base URL, e.g. `https://api.openai.com/v1`
    endpoint: String,
    /// Model used for every request
    model: String,
}

/// Responses API request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// Prompt text
    input: String,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

impl OpenAIRequest {
    /// Create a new request
    pub fn new(model: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: input.into(),
            temperature: None,
        }
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Responses API response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Convenience aggregate some deployments include
    #[serde(default)]
    pub output_text: Option<String>,

    /// Output items (messages, tool calls, ...)
    #[serde(default)]
    pub output: Vec<OutputItem>,
}

/// One output item of a response
#[derive(Debug, Deserialize)]
pub struct OutputItem {
    /// Item type, `message` for text answers
    #[serde(rename = "type", default)]
    pub item_type: String,

    /// Content blocks of a message item
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

/// Content block inside an output message
#[derive(Debug, Deserialize)]
pub struct OutputContent {
    /// Block type, `output_text` for text
    #[serde(rename = "type", default)]
    pub content_type: String,

    /// Text of the block, when present
    #[serde(default)]
    pub text: Option<String>,
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Send a request to the Responses API
    pub async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let api_url = format!("{}/responses", self.endpoint.trim_end_matches('/'));

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
            error!("OpenAI API error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }

    /// Extract the answer text from a response
    ///
    /// Prefers the aggregated `output_text`, then the first text block of any
    /// output message. Returns an empty string when neither is present.
    pub fn extract_text(response: &OpenAIResponse) -> String {
        if let Some(text) = response.output_text.as_deref().filter(|t| !t.is_empty()) {
            return text.to_string();
        }

        response
            .output
            .iter()
            .flat_map(|item| item.content.iter())
            .filter(|c| c.content_type == "output_text" || c.content_type.is_empty())
            .find_map(|c| c.text.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for OpenAI {
    async fn generate(&self, prompt: &str, temperature: f32) -> Result<String, ProviderError> {
        debug!("Requesting completion from {} ({} chars)", self.model, prompt.len());
        let request = OpenAIRequest::new(self.model.clone(), prompt).temperature(temperature);
        let response = self.complete(request).await?;
        Ok(Self::extract_text(&response))
    }
}
