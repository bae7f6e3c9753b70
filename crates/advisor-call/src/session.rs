//! Per-call session state.

use crate::error::CallError;
use advisor_types::{CallState, ErrorKind, TranscriptEntry};

/// Everything the orchestrator knows about one telephone call.
///
/// Only the orchestrator mutates a session. Fields are read through
/// accessors so the state machine cannot be bypassed.
#[derive(Debug, Clone)]
pub struct CallSession {
    call_id: String,
    caller_address: String,
    callee_address: String,
    turn_count: u32,
    state: CallState,
    transcript_history: Vec<TranscriptEntry>,
    last_error: Option<ErrorKind>,
    transcription_failures: u32,
}

impl CallSession {
    pub fn new(
        call_id: impl Into<String>,
        caller_address: impl Into<String>,
        callee_address: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            caller_address: caller_address.into(),
            callee_address: callee_address.into(),
            turn_count: 0,
            state: CallState::Greeting,
            transcript_history: Vec::new(),
            last_error: None,
            transcription_failures: 0,
        }
    }

    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    pub fn caller_address(&self) -> &str {
        &self.caller_address
    }

    pub fn callee_address(&self) -> &str {
        &self.callee_address
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn state(&self) -> CallState {
        self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminal()
    }

    pub fn transcript_history(&self) -> &[TranscriptEntry] {
        &self.transcript_history
    }

    pub fn last_error(&self) -> Option<ErrorKind> {
        self.last_error
    }

    pub fn transcription_failures(&self) -> u32 {
        self.transcription_failures
    }

    /// Moves to `next` if the edge is legal.
    pub(crate) fn transition(&mut self, next: CallState) -> Result<(), CallError> {
        if !self.state.can_transition_to(next) {
            return Err(CallError::IllegalTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(
            call_id = %self.call_id,
            from = %self.state,
            to = %next,
            "call state transition"
        );
        self.state = next;
        Ok(())
    }

    /// Ends the call from any live state. A no-op once terminated.
    pub(crate) fn terminate(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!(call_id = %self.call_id, from = %self.state, "call terminated");
            self.state = CallState::Terminated;
        }
    }

    pub(crate) fn record(&mut self, entry: TranscriptEntry) {
        self.transcript_history.push(entry);
    }

    pub(crate) fn complete_turn(&mut self) {
        self.turn_count += 1;
    }

    pub(crate) fn note_error(&mut self, kind: ErrorKind) {
        self.last_error = Some(kind);
    }

    /// Counts a failed transcription and returns the total for this call.
    /// The count is never reset, so the retry budget spans the whole call.
    pub(crate) fn note_transcription_failure(&mut self) -> u32 {
        self.note_error(ErrorKind::Transcription);
        self.transcription_failures += 1;
        self.transcription_failures
    }
}
