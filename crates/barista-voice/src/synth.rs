//! Speech-synthesis trait, HTTP client, and the best-effort wrapper.

use async_trait::async_trait;
use base64::Engine;
use tracing::{debug, warn};

use barista_core::error::BaristaError;

/// Errors from the speech-synthesis subsystem.
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("synthesis service unreachable: {0}")]
    Transport(String),
    #[error("synthesis returned empty audio")]
    EmptyAudio,
}

impl From<VoiceError> for BaristaError {
    fn from(err: VoiceError) -> Self {
        BaristaError::Voice(err.to_string())
    }
}

impl From<reqwest::Error> for VoiceError {
    fn from(err: reqwest::Error) -> Self {
        VoiceError::Transport(err.to_string())
    }
}

/// An external text-to-speech service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio byte stream.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError>;
}

/// HTTP synthesizer POSTing `{text, voice}` and receiving raw audio bytes.
pub struct HttpSpeech {
    client: reqwest::Client,
    base_url: String,
    voice: String,
}

impl HttpSpeech {
    pub fn new(base_url: impl Into<String>, voice: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            voice: voice.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for HttpSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        let url = format!("{}/synthesize", self.base_url.trim_end_matches('/'));
        let body = serde_json::json!({"text": text, "voice": self.voice});

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Err(VoiceError::EmptyAudio);
        }
        debug!(bytes = bytes.len(), "Speech synthesized");
        Ok(bytes.to_vec())
    }
}

/// Synthesize `text` and base64-encode the audio for transport, swallowing
/// failures. `None` means "no audio"; the caller's turn proceeds without it.
pub async fn synthesize_best_effort(
    synth: &dyn SpeechSynthesizer,
    text: &str,
) -> Option<String> {
    match synth.synthesize(text).await {
        Ok(audio) => Some(base64::engine::general_purpose::STANDARD.encode(audio)),
        Err(e) => {
            warn!(error = %e, "Speech synthesis failed — continuing without audio");
            None
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticSpeech(Vec<u8>);

    #[async_trait]
    impl SpeechSynthesizer for StaticSpeech {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, VoiceError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenSpeech;

    #[async_trait]
    impl SpeechSynthesizer for BrokenSpeech {
        async fn synthesize(&self, _text: &str) -> Result<Vec<u8>, VoiceError> {
            Err(VoiceError::Transport("socket closed".to_string()))
        }
    }

    #[tokio::test]
    async fn test_best_effort_encodes_base64() {
        let synth = StaticSpeech(vec![1, 2, 3]);
        let audio = synthesize_best_effort(&synth, "your latte is ready").await;
        assert_eq!(audio.as_deref(), Some("AQID"));
    }

    #[tokio::test]
    async fn test_best_effort_swallows_failure() {
        let audio = synthesize_best_effort(&BrokenSpeech, "hello").await;
        assert!(audio.is_none());
    }

    #[tokio::test]
    async fn test_http_speech_posts_text_and_voice() {
        let server = httpmock::MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(httpmock::Method::POST)
                .path("/synthesize")
                .json_body(serde_json::json!({
                    "text": "order up",
                    "voice": "en-US-counter"
                }));
            then.status(200).body(&[0u8, 1, 2, 3][..]);
        });

        let synth = HttpSpeech::new(server.base_url(), "en-US-counter");
        let audio = synth.synthesize("order up").await.unwrap();
        mock.assert();
        assert_eq!(audio, vec![0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_http_speech_error_status() {
        let server = httpmock::MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/synthesize");
            then.status(502);
        });

        let synth = HttpSpeech::new(server.base_url(), "en-US-counter");
        let err = synth.synthesize("order up").await.unwrap_err();
        assert!(matches!(err, VoiceError::Transport(_)));
    }

    #[tokio::test]
    async fn test_http_speech_empty_body_is_error() {
        let server = httpmock::MockServer::start();
        server.mock(|when, then| {
            when.method(httpmock::Method::POST).path("/synthesize");
            then.status(200);
        });

        let synth = HttpSpeech::new(server.base_url(), "en-US-counter");
        let err = synth.synthesize("order up").await.unwrap_err();
        assert!(matches!(err, VoiceError::EmptyAudio));
    }
}
