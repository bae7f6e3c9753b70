#![allow(dead_code)]

use advisor_call::{CallError, CallServices, Orchestrator, RecordingFetcher};
use advisor_persona::{PersonaError, PersonaResponder};
use advisor_types::{CallPolicy, IntentSignal, Tone, TranscriptEntry};
use advisor_voice::{SpeechToText, TextToSpeech, Transcription, VoiceError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Speech-to-text that replays a queue of canned results. An exhausted
/// queue answers with a failed recognition.
#[derive(Default)]
pub struct ScriptedStt {
    results: Mutex<VecDeque<Result<Transcription, VoiceError>>>,
    pub calls: AtomicUsize,
}

impl ScriptedStt {
    pub fn new(results: Vec<Result<Transcription, VoiceError>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn heard(transcripts: &[(&str, f32)]) -> Self {
        Self::new(
            transcripts
                .iter()
                .map(|(text, confidence)| Ok(Transcription::recognized(*text, *confidence)))
                .collect(),
        )
    }
}

#[async_trait]
impl SpeechToText for ScriptedStt {
    async fn transcribe(&self, _audio_data: &[u8]) -> Result<Transcription, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Transcription::unrecognized()))
    }
}

/// Text-to-speech that records every request.
#[derive(Default)]
pub struct RecordingTts {
    pub requests: Mutex<Vec<(String, Tone)>>,
    pub fail: bool,
}

impl RecordingTts {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn tones(&self) -> Vec<Tone> {
        self.requests.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }
}

#[async_trait]
impl TextToSpeech for RecordingTts {
    async fn synthesize(&self, text: &str, tone: Tone) -> Result<Option<Vec<u8>>, VoiceError> {
        self.requests.lock().unwrap().push((text.to_string(), tone));
        if self.fail {
            return Err(VoiceError::Synthesis("provider down".to_string()));
        }
        Ok(Some(vec![0u8; 320]))
    }
}

/// Persona behaviour for a test.
pub enum PersonaMode {
    Reply(String),
    Fail,
    Stall,
}

pub struct FakePersona {
    mode: PersonaMode,
    pub calls: AtomicUsize,
    pub seen_history: Mutex<Vec<Vec<TranscriptEntry>>>,
}

impl FakePersona {
    pub fn replying(text: &str) -> Self {
        Self::with_mode(PersonaMode::Reply(text.to_string()))
    }

    pub fn with_mode(mode: PersonaMode) -> Self {
        Self {
            mode,
            calls: AtomicUsize::new(0),
            seen_history: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PersonaResponder for FakePersona {
    async fn respond(
        &self,
        _input: &str,
        _intent: &IntentSignal,
        history: &[TranscriptEntry],
    ) -> Result<String, PersonaError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_history.lock().unwrap().push(history.to_vec());
        match &self.mode {
            PersonaMode::Reply(text) => Ok(text.clone()),
            PersonaMode::Fail => Err(PersonaError::Completion("model overloaded".to_string())),
            PersonaMode::Stall => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
        }
    }
}

/// Recording fetcher that hands back a fixed buffer.
pub struct FixedRecordings {
    pub fail: bool,
}

#[async_trait]
impl RecordingFetcher for FixedRecordings {
    async fn fetch(&self, recording_ref: &str) -> Result<Vec<u8>, CallError> {
        if self.fail {
            return Err(CallError::Recording(format!("404 for {}", recording_ref)));
        }
        Ok(vec![1u8; 1024])
    }
}

pub struct Harness {
    pub stt: Arc<ScriptedStt>,
    pub tts: Arc<RecordingTts>,
    pub persona: Arc<FakePersona>,
    pub orchestrator: Orchestrator,
}

pub fn harness(stt: ScriptedStt, tts: RecordingTts, persona: FakePersona) -> Harness {
    harness_with_policy(stt, tts, persona, CallPolicy::default())
}

pub fn harness_with_policy(
    stt: ScriptedStt,
    tts: RecordingTts,
    persona: FakePersona,
    policy: CallPolicy,
) -> Harness {
    let stt = Arc::new(stt);
    let tts = Arc::new(tts);
    let persona = Arc::new(persona);
    let services = CallServices {
        stt: stt.clone(),
        tts: tts.clone(),
        persona: persona.clone(),
        recordings: Arc::new(FixedRecordings { fail: false }),
    };
    Harness {
        stt,
        tts,
        persona,
        orchestrator: Orchestrator::new(services, policy),
    }
}
