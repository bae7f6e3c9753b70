use crate::config::PersonaConfig;
use crate::error::PersonaError;
use crate::prompt;
use crate::PersonaResponder;
use advisor_types::{IntentSignal, Speaker, TranscriptEntry};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Maximum caller input forwarded to the model (16 KiB).
const MAX_INPUT_BYTES: usize = 16 * 1024;

#[derive(Debug, Serialize, PartialEq)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenates every text block. Tool-use and other blocks are ignored.
    fn into_text(self) -> Result<String, PersonaError> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        let text = text.trim();
        if text.is_empty() {
            return Err(PersonaError::MalformedOutput(
                "completion contained no text".to_string(),
            ));
        }
        Ok(text.to_string())
    }
}

fn role_of(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::Caller => "user",
        Speaker::Assistant => "assistant",
    }
}

/// Maps the transcript plus the current input onto the strictly alternating
/// user/assistant sequence the Messages API requires.
///
/// Consecutive entries from the same speaker are merged and any leading
/// assistant turns (the greeting) are dropped, since the first message must
/// come from the user.
fn build_messages(history: &[TranscriptEntry], input: &str) -> Vec<Message> {
    let mut messages: Vec<Message> = Vec::with_capacity(history.len() + 1);

    let turns = history
        .iter()
        .map(|entry| (role_of(entry.speaker), entry.text.as_str()))
        .chain(std::iter::once(("user", input)));

    for (role, text) in turns {
        let text = text.trim();
        if text.is_empty() {
            continue;
        }
        match messages.last_mut() {
            Some(last) if last.role == role => {
                last.content.push('\n');
                last.content.push_str(text);
            }
            None if role == "assistant" => {}
            _ => messages.push(Message {
                role,
                content: text.to_string(),
            }),
        }
    }

    messages
}

/// Persona backed by the Anthropic Messages API.
#[derive(Debug, Clone)]
pub struct AnthropicResponder {
    config: PersonaConfig,
    client: reqwest::Client,
}

impl AnthropicResponder {
    pub fn new(config: PersonaConfig) -> Result<Self, PersonaError> {
        if config.api_key.trim().is_empty() {
            return Err(PersonaError::Config(
                "Anthropic API key is not configured. Set persona.api_key in config \
                 or the ANTHROPIC_API_KEY environment variable."
                    .to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| PersonaError::Config(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }
}

#[async_trait]
impl PersonaResponder for AnthropicResponder {
    async fn respond(
        &self,
        input: &str,
        intent: &IntentSignal,
        history: &[TranscriptEntry],
    ) -> Result<String, PersonaError> {
        if input.len() > MAX_INPUT_BYTES {
            return Err(PersonaError::Completion(format!(
                "input exceeds maximum size: {} bytes (limit: {} bytes)",
                input.len(),
                MAX_INPUT_BYTES
            )));
        }

        let request = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system: prompt::system_prompt(&self.config.advisor_name, intent),
            messages: build_messages(history, input),
        };

        let url = format!("{}/v1/messages", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| PersonaError::Completion(format!("Anthropic request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersonaError::Completion(format!(
                "Anthropic returned {}: {}",
                status, body
            )));
        }

        let body: MessagesResponse = response.json().await.map_err(|e| {
            PersonaError::MalformedOutput(format!("failed to decode completion: {}", e))
        })?;

        let text = body.into_text()?;
        tracing::debug!(
            model = %self.config.model,
            chars = text.len(),
            history = history.len(),
            "anthropic completion finished"
        );
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: &'static str, content: &str) -> Message {
        Message {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn leading_greeting_is_dropped() {
        let history = vec![TranscriptEntry::assistant("Hi, I'm Pepper.")];
        assert_eq!(
            build_messages(&history, "Should I hire?"),
            vec![msg("user", "Should I hire?")]
        );
    }

    #[test]
    fn turns_alternate_and_repeats_merge() {
        let history = vec![
            TranscriptEntry::assistant("Hi."),
            TranscriptEntry::caller("I sell candles."),
            TranscriptEntry::assistant("Tell me more."),
            TranscriptEntry::caller("Margins are thin."),
        ];
        assert_eq!(
            build_messages(&history, "Should I raise prices?"),
            vec![
                msg("user", "I sell candles."),
                msg("assistant", "Tell me more."),
                msg("user", "Margins are thin.\nShould I raise prices?"),
            ]
        );
    }

    #[test]
    fn text_blocks_are_concatenated() {
        let body: MessagesResponse = serde_json::from_str(
            r#"{"content":[
                {"type":"text","text":"Raise them. "},
                {"type":"tool_use","id":"x","name":"n","input":{}},
                {"type":"text","text":"Then test."}
            ]}"#,
        )
        .unwrap();
        assert_eq!(body.into_text().unwrap(), "Raise them. Then test.");
    }

    #[test]
    fn no_text_is_malformed() {
        let body: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert!(matches!(
            body.into_text(),
            Err(PersonaError::MalformedOutput(_))
        ));
    }

    #[test]
    fn missing_key_is_rejected() {
        let err = AnthropicResponder::new(PersonaConfig::default()).unwrap_err();
        assert!(matches!(err, PersonaError::Config(_)));
    }
}
