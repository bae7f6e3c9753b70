use crate::error::CallError;
use crate::intent::IntentAnalyzer;
use crate::recording::RecordingFetcher;
use crate::session::CallSession;
use crate::truncate::truncate_at_sentence;
use advisor_persona::PersonaResponder;
use advisor_types::{
    CallPolicy, CallState, CallStatus, ErrorKind, Instruction, IntentSignal, Tone,
    TranscriptEntry, Utterance,
};
use advisor_voice::{SpeechToText, TextToSpeech, Transcription};
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{info, warn};

/// The external collaborators a call depends on.
#[derive(Clone)]
pub struct CallServices {
    pub stt: Arc<dyn SpeechToText>,
    pub tts: Arc<dyn TextToSpeech>,
    pub persona: Arc<dyn PersonaResponder>,
    pub recordings: Arc<dyn RecordingFetcher>,
}

/// A one-off persona answer outside of a phone call.
#[derive(Debug, Clone)]
pub struct Consultation {
    pub response: String,
    pub tone: Tone,
    pub intent: IntentSignal,
    pub audio: Option<Vec<u8>>,
}

/// Drives call sessions through the call-turn state machine.
///
/// Holds only read-only configuration and shared provider handles, so one
/// orchestrator serves every concurrent call.
pub struct Orchestrator {
    services: CallServices,
    policy: CallPolicy,
    analyzer: IntentAnalyzer,
}

impl Orchestrator {
    pub fn new(services: CallServices, policy: CallPolicy) -> Self {
        Self {
            services,
            policy,
            analyzer: IntentAnalyzer::default(),
        }
    }

    pub fn with_analyzer(mut self, analyzer: IntentAnalyzer) -> Self {
        self.analyzer = analyzer;
        self
    }

    pub fn policy(&self) -> &CallPolicy {
        &self.policy
    }

    /// Derives the intent signal for a transcript.
    pub fn analyze(&self, transcript: &str, confidence: f32) -> IntentSignal {
        self.analyzer.analyze(transcript, confidence)
    }

    /// Handles the gateway's new-call notification: greet, then listen.
    pub async fn start_call(&self, session: &mut CallSession) -> Result<Vec<Instruction>, CallError> {
        ensure_live(session)?;
        if session.state() != CallState::Greeting {
            return Err(CallError::UnexpectedCallback {
                callback: "call-start",
                state: session.state(),
            });
        }

        let deadline = self.turn_deadline();
        let greeting = self.policy.script.greeting.clone();
        let utterance = self.speak(session, &greeting, Tone::Confident, deadline).await;
        session.record(TranscriptEntry::assistant(greeting));
        session.transition(CallState::AwaitingSpeech)?;

        info!(
            call_id = %session.call_id(),
            caller = %session.caller_address(),
            "call started"
        );
        Ok(vec![Instruction::Speak(utterance), self.capture()])
    }

    /// Handles a finished recording: transcribe, respond, and decide whether
    /// to keep listening.
    pub async fn on_audio_captured(
        &self,
        session: &mut CallSession,
        recording_ref: &str,
    ) -> Result<Vec<Instruction>, CallError> {
        ensure_live(session)?;
        if session.state() != CallState::AwaitingSpeech {
            return Err(CallError::UnexpectedCallback {
                callback: "audio-captured",
                state: session.state(),
            });
        }
        session.transition(CallState::Processing)?;
        let deadline = self.turn_deadline();

        let transcription = match self.transcribe(recording_ref, deadline).await {
            Ok(t) => t,
            Err(reason) => {
                warn!(call_id = %session.call_id(), error = %reason, "transcription failed");
                return self.recover_from_transcription_failure(session);
            }
        };

        let transcript = transcription.transcript;
        let intent = self.analyze(&transcript, transcription.confidence);
        session.record(TranscriptEntry::caller(transcript.clone()));
        session.transition(CallState::Responding)?;

        let history = session.transcript_history();
        let context = &history[..history.len() - 1];
        let outcome = self
            .bounded(
                "persona",
                deadline,
                self.services.persona.respond(&transcript, &intent, context),
            )
            .await;
        let reply = match outcome {
            Ok(text) => text,
            Err(reason) => {
                warn!(call_id = %session.call_id(), error = %reason, "persona responder failed");
                session.note_error(ErrorKind::Responder);
                self.policy.script.responder_fallback.clone()
            }
        };

        let tone = Tone::for_intent(&intent);
        let spoken = self.fit_to_turn(&reply);
        let utterance = self.speak(session, &spoken, tone, deadline).await;
        session.record(TranscriptEntry::assistant(spoken));
        session.complete_turn();
        session.transition(CallState::AwaitingFollowup)?;

        info!(
            call_id = %session.call_id(),
            turn = session.turn_count(),
            tone = %tone,
            decision = intent.is_decision_request,
            "turn completed"
        );
        self.follow_up(session, utterance)
    }

    /// Handles the gateway reporting that the caller said nothing.
    pub fn on_no_input(&self, session: &mut CallSession) -> Result<Vec<Instruction>, CallError> {
        ensure_live(session)?;
        if session.state() != CallState::AwaitingSpeech {
            return Err(CallError::UnexpectedCallback {
                callback: "no-input",
                state: session.state(),
            });
        }

        session.note_error(ErrorKind::NoInput);
        session.terminate();
        info!(call_id = %session.call_id(), "no input from caller, ending call");
        Ok(vec![
            Instruction::say(self.policy.script.no_input.clone()),
            Instruction::Hangup,
        ])
    }

    /// Applies a gateway status report. Returns whether the session changed.
    ///
    /// Final statuses terminate the call. Repeats and reports for a call
    /// that already ended are no-ops.
    pub fn on_call_status(&self, session: &mut CallSession, status: CallStatus) -> bool {
        if session.is_terminated() || !status.is_final() {
            return false;
        }
        session.terminate();
        info!(
            call_id = %session.call_id(),
            status = status.as_str(),
            turns = session.turn_count(),
            "call ended by gateway"
        );
        true
    }

    /// Ends a live call after a malformed or out-of-order gateway callback,
    /// with the generic apology.
    pub fn abort(&self, session: &mut CallSession) -> Vec<Instruction> {
        session.note_error(ErrorKind::GatewayProtocol);
        session.terminate();
        warn!(call_id = %session.call_id(), "call aborted after gateway protocol error");
        self.apology()
    }

    /// The generic apology and hang-up, for callbacks that cannot be tied to
    /// a usable session.
    pub fn apology(&self) -> Vec<Instruction> {
        vec![
            Instruction::say(self.policy.script.apology.clone()),
            Instruction::Hangup,
        ]
    }

    /// Answers a typed challenge with the same persona, tone and fallback
    /// rules as a phone turn.
    pub async fn consult(&self, challenge: &str) -> Consultation {
        let deadline = self.turn_deadline();
        let intent = self.analyze(challenge, 1.0);
        let response = match self
            .bounded(
                "persona",
                deadline,
                self.services.persona.respond(challenge, &intent, &[]),
            )
            .await
        {
            Ok(text) => text,
            Err(reason) => {
                warn!(error = %reason, "persona responder failed");
                self.policy.script.responder_fallback.clone()
            }
        };

        let tone = Tone::for_intent(&intent);
        let audio = match self
            .bounded("tts", deadline, self.services.tts.synthesize(&response, tone))
            .await
        {
            Ok(audio) => audio,
            Err(reason) => {
                warn!(error = %reason, "synthesis failed");
                None
            }
        };

        Consultation {
            response,
            tone,
            intent,
            audio,
        }
    }

    fn capture(&self) -> Instruction {
        Instruction::Capture {
            max_duration_secs: self.policy.capture_max_seconds,
            silence_timeout_secs: self.policy.silence_timeout_seconds,
            no_input_prompt: self.policy.script.no_input.clone(),
        }
    }

    /// When the gateway's current callback must be answered by.
    fn turn_deadline(&self) -> Instant {
        Instant::now() + self.policy.turn_timeout()
    }

    /// Runs one provider call under the per-call timeout, cut short by
    /// whatever remains before `deadline`.
    async fn bounded<T, E, F>(
        &self,
        operation: &'static str,
        deadline: Instant,
        call: F,
    ) -> Result<T, String>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let after = self.policy.provider_timeout().min(remaining);
        match tokio::time::timeout(after, call).await {
            Ok(result) => result.map_err(|e| e.to_string()),
            Err(_) => Err(CallError::Timeout { operation, after }.to_string()),
        }
    }

    /// Downloads and transcribes a recording. Any outcome that does not
    /// yield a usable, confident transcript is an error.
    async fn transcribe(
        &self,
        recording_ref: &str,
        deadline: Instant,
    ) -> Result<Transcription, String> {
        let audio = self
            .bounded(
                "recording fetch",
                deadline,
                self.services.recordings.fetch(recording_ref),
            )
            .await?;
        let transcription = self
            .bounded("stt", deadline, self.services.stt.transcribe(&audio))
            .await?;

        if !transcription.success || transcription.transcript.trim().is_empty() {
            return Err("no speech recognized".to_string());
        }
        if transcription.confidence < self.policy.min_confidence {
            return Err(format!(
                "confidence {:.2} below threshold {:.2}",
                transcription.confidence, self.policy.min_confidence
            ));
        }
        Ok(transcription)
    }

    fn recover_from_transcription_failure(
        &self,
        session: &mut CallSession,
    ) -> Result<Vec<Instruction>, CallError> {
        let failures = session.note_transcription_failure();

        if failures > self.policy.max_transcription_retries {
            session.terminate();
            info!(
                call_id = %session.call_id(),
                failures,
                "repeated transcription failure, ending call"
            );
            return Ok(vec![
                Instruction::say(self.policy.script.transcription_closing.clone()),
                Instruction::Hangup,
            ]);
        }

        session.transition(CallState::AwaitingSpeech)?;
        Ok(vec![
            Instruction::say(self.policy.script.reprompt.clone()),
            self.capture(),
        ])
    }

    /// Cuts an over-long reply at a sentence boundary and invites the
    /// caller to continue.
    fn fit_to_turn(&self, reply: &str) -> String {
        let (kept, truncated) = truncate_at_sentence(reply, self.policy.max_response_chars);
        if truncated {
            format!("{} {}", kept, self.policy.script.truncation_question)
        } else {
            kept
        }
    }

    /// Synthesizes `text`, falling back to having the gateway read it.
    async fn speak(
        &self,
        session: &mut CallSession,
        text: &str,
        tone: Tone,
        deadline: Instant,
    ) -> Utterance {
        match self
            .bounded("tts", deadline, self.services.tts.synthesize(text, tone))
            .await
        {
            Ok(Some(audio)) => Utterance::synthesized(text, tone, audio),
            Ok(None) => {
                warn!(call_id = %session.call_id(), "synthesis produced no audio");
                session.note_error(ErrorKind::Synthesis);
                Utterance::unsynthesized(text, tone)
            }
            Err(reason) => {
                warn!(call_id = %session.call_id(), error = %reason, "synthesis failed");
                session.note_error(ErrorKind::Synthesis);
                Utterance::unsynthesized(text, tone)
            }
        }
    }

    fn follow_up(
        &self,
        session: &mut CallSession,
        reply: Utterance,
    ) -> Result<Vec<Instruction>, CallError> {
        if session.turn_count() >= self.policy.max_turns {
            session.terminate();
            info!(
                call_id = %session.call_id(),
                turns = session.turn_count(),
                "turn limit reached, closing call"
            );
            return Ok(vec![
                Instruction::Speak(reply),
                Instruction::say(self.policy.script.closing.clone()),
                Instruction::Hangup,
            ]);
        }

        session.transition(CallState::AwaitingSpeech)?;
        Ok(vec![
            Instruction::Speak(reply),
            Instruction::say(self.policy.script.followup_prompt.clone()),
            self.capture(),
        ])
    }
}

fn ensure_live(session: &CallSession) -> Result<(), CallError> {
    if session.is_terminated() {
        return Err(CallError::SessionTerminated(session.call_id().to_string()));
    }
    Ok(())
}
