//! Oracle trait and the HTTP chat-completion client.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, trace};

use barista_core::types::{DialogueTurn, Speaker};

use crate::error::OracleError;

/// The external natural-language understanding/generation service.
///
/// Given an instruction prompt and the dialogue so far, returns raw text
/// expected, but not guaranteed, to be a JSON object matching the schema
/// described in the prompt.
#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(
        &self,
        system: &str,
        history: &[DialogueTurn],
    ) -> Result<String, OracleError>;
}

/// Oracle client speaking the chat-completions wire format.
pub struct HttpOracle {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl HttpOracle {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    fn role_of(speaker: Speaker) -> &'static str {
        match speaker {
            Speaker::Customer => "user",
            Speaker::Assistant => "assistant",
        }
    }
}

#[async_trait]
impl Oracle for HttpOracle {
    async fn complete(
        &self,
        system: &str,
        history: &[DialogueTurn],
    ) -> Result<String, OracleError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.base_url.trim_end_matches('/')
        );

        let mut messages = vec![serde_json::json!({"role": "system", "content": system})];
        messages.extend(history.iter().map(|turn| {
            serde_json::json!({"role": Self::role_of(turn.speaker), "content": turn.text})
        }));

        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });
        trace!(%url, turns = history.len(), "Oracle request");

        let mut req = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let resp = req.send().await?.error_for_status()?;
        let completion: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(OracleError::EmptyCompletion)?;

        debug!(len = content.len(), "Oracle completion received");
        Ok(content)
    }
}

// =============================================================================
// Tests
// =============================================================================
