//! TwiML rendering for orchestrator instructions.

use crate::clips::ClipStore;
use advisor_types::Instruction;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use std::fmt::Write;

/// Path the gateway posts finished recordings to.
pub const PROCESS_AUDIO_PATH: &str = "/twilio/webhook/process-audio";

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// A rendered TwiML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Twiml(pub String);

impl Twiml {
    /// A document with no verbs. The gateway carries on unchanged.
    pub fn empty() -> Self {
        Self(format!("{}<Response/>", XML_DECLARATION))
    }
}

impl IntoResponse for Twiml {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "application/xml")], self.0).into_response()
    }
}

/// Settings shared by every rendered document.
#[derive(Debug, Clone)]
pub struct TwimlRenderer {
    public_url: String,
    say_voice: String,
    language: String,
}

impl TwimlRenderer {
    pub fn new(
        public_url: impl Into<String>,
        say_voice: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            public_url: public_url.into().trim_end_matches('/').to_string(),
            say_voice: say_voice.into(),
            language: language.into(),
        }
    }

    pub fn audio_url(&self, clip_id: &str) -> String {
        format!("{}/audio/{}", self.public_url, clip_id)
    }

    /// Renders instructions, parking synthesized audio in `clips` so the
    /// gateway can fetch it.
    pub fn render(&self, instructions: &[Instruction], clips: &ClipStore) -> Twiml {
        let mut xml = String::from(XML_DECLARATION);
        xml.push_str("<Response>");

        for instruction in instructions {
            match instruction {
                Instruction::Speak(utterance) => {
                    let clip_id = match &utterance.audio {
                        Some(audio) if !audio.is_empty() => match clips.insert(audio) {
                            Ok(clip_id) => Some(clip_id),
                            Err(e) => {
                                tracing::warn!(error = %e, "could not store clip, reading text aloud");
                                None
                            }
                        },
                        _ => None,
                    };
                    match clip_id {
                        Some(clip_id) => {
                            let _ = write!(
                                xml,
                                "<Play>{}</Play>",
                                escape(&self.audio_url(&clip_id))
                            );
                        }
                        None => self.say(&mut xml, &utterance.text),
                    }
                }
                Instruction::Capture {
                    max_duration_secs,
                    silence_timeout_secs,
                    no_input_prompt,
                } => {
                    let action = format!("{}{}", self.public_url, PROCESS_AUDIO_PATH);
                    let _ = write!(
                        xml,
                        r#"<Record action="{}" method="POST" maxLength="{}" timeout="{}" playBeep="false" trim="trim-silence"/>"#,
                        escape(&action),
                        max_duration_secs,
                        silence_timeout_secs
                    );
                    // Only reached when the caller stayed silent.
                    self.say(&mut xml, no_input_prompt);
                    xml.push_str("<Hangup/>");
                }
                Instruction::Hangup => xml.push_str("<Hangup/>"),
            }
        }

        xml.push_str("</Response>");
        Twiml(xml)
    }

    fn say(&self, xml: &mut String, text: &str) {
        let _ = write!(
            xml,
            r#"<Say voice="{}" language="{}">{}</Say>"#,
            escape(&self.say_voice),
            escape(&self.language),
            escape(text)
        );
    }
}

/// Escapes text for XML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
