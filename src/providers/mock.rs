/*!
 * Mock provider implementations for testing.
 *
 * - `MockTextGenerator` replays a scripted sequence of replies and records
 *   every prompt it receives
 * - `MockSynthesizer` returns fixed audio bytes and can be told to fail for a
 *   given voice
 */

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::errors::ProviderError;
use crate::providers::{SpeechSynthesizer, TextGenerator};

/// One scripted reply of the mock text generator
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Succeed with this text
    Text(String),
    /// Fail with a request error
    Fail(String),
}

/// Text generator that replays scripted replies in order
///
/// Once the script runs out the last reply is repeated.
#[derive(Debug, Default)]
pub struct MockTextGenerator {
    replies: Mutex<VecDeque<MockReply>>,
    last: Mutex<Option<MockReply>>,
    prompts: Mutex<Vec<String>>,
    request_count: AtomicUsize,
}

impl MockTextGenerator {
    /// Create a mock with the given reply script
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Self::default()
        }
    }

    /// Create a mock that always answers with `text`
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![MockReply::Text(text.into())])
    }

    /// Create a mock that always fails
    pub fn failing() -> Self {
        Self::new(vec![MockReply::Fail("mock failure".to_string())])
    }

    /// Number of `generate` calls so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    fn next_reply(&self) -> MockReply {
        let next = self.replies.lock().ok().and_then(|mut r| r.pop_front());
        let mut last = match self.last.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(reply) = next {
            *last = Some(reply);
        }
        (*last)
            .clone()
            .unwrap_or_else(|| MockReply::Fail("no scripted reply".to_string()))
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, prompt: &str, _temperature: f32) -> Result<String, ProviderError> {
        self.request_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        match self.next_reply() {
            MockReply::Text(text) => Ok(text),
            MockReply::Fail(message) => Err(ProviderError::RequestFailed(message)),
        }
    }
}

/// Speech synthesizer that returns canned bytes
#[derive(Debug, Clone)]
pub struct MockSynthesizer {
    audio: Bytes,
    failing_voice: Option<String>,
    calls: Arc<Mutex<Vec<(String, String)>>>,
}

impl Default for MockSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSynthesizer {
    /// Create a working mock
    pub fn new() -> Self {
        Self {
            audio: Bytes::from_static(b"ID3mock-audio"),
            failing_voice: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Fail every request that uses `voice_id`
    pub fn failing_for(mut self, voice_id: impl Into<String>) -> Self {
        self.failing_voice = Some(voice_id.into());
        self
    }

    /// (text, voice id) pairs received so far
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Bytes, ProviderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((text.to_string(), voice_id.to_string()));
        }

        if self.failing_voice.as_deref() == Some(voice_id) {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: format!("mock synthesis failure for {}", voice_id),
            });
        }

        Ok(self.audio.clone())
    }
}
