//! Telephony gateway webhooks.
//!
//! Every handler answers `200` with TwiML, even for malformed callbacks:
//! the gateway has no use for an HTTP error and would play its own generic
//! failure message instead of ours.

use crate::sessions::{CallHandle, Lookup};
use crate::twiml::Twiml;
use crate::AppState;
use advisor_call::{CallError, CallSession};
use advisor_types::{CallStatus, Instruction};
use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Form body of the new-call webhook.
#[derive(Debug, Deserialize)]
pub struct IncomingCallForm {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "To")]
    pub to: Option<String>,
}

/// Form body of the recording-finished webhook.
#[derive(Debug, Deserialize)]
pub struct RecordingForm {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "RecordingUrl")]
    pub recording_url: Option<String>,
    /// Recording length in seconds, as a decimal string.
    #[serde(rename = "RecordingDuration")]
    pub recording_duration: Option<String>,
}

/// Form body of the status callback.
#[derive(Debug, Deserialize)]
pub struct CallStatusForm {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "CallStatus")]
    pub call_status: Option<String>,
}

/// Form body of the fallback webhook.
#[derive(Debug, Deserialize)]
pub struct FallbackForm {
    #[serde(rename = "CallSid")]
    pub call_sid: Option<String>,
    #[serde(rename = "ErrorCode")]
    pub error_code: Option<String>,
}

fn accept<T>(form: Result<Form<T>, FormRejection>, callback: &'static str) -> Option<T> {
    match form {
        Ok(Form(value)) => Some(value),
        Err(rejection) => {
            warn!(callback, error = %rejection, "malformed gateway callback");
            None
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Generic apology for callbacks that cannot be tied to a live call.
fn apology(state: &AppState) -> Twiml {
    state
        .twiml
        .render(&state.orchestrator.apology(), &state.clips)
}

fn hangup(state: &AppState) -> Twiml {
    state.twiml.render(&[Instruction::Hangup], &state.clips)
}

/// Turns an orchestrator outcome into TwiML and retires finished sessions.
fn conclude(
    state: &AppState,
    handle: &CallHandle,
    session: &mut CallSession,
    result: Result<Vec<Instruction>, CallError>,
) -> Twiml {
    let call_id = session.call_id().to_string();

    let instructions = match result {
        Ok(instructions) => instructions,
        Err(CallError::SessionTerminated(_)) => vec![Instruction::Hangup],
        Err(e) => {
            warn!(call_id = %call_id, state = %session.state(), error = %e, "gateway protocol error");
            state.orchestrator.abort(session)
        }
    };

    if handle.is_hung_up() {
        info!(call_id = %call_id, "caller hung up during turn, discarding result");
        return hangup(state);
    }
    if session.is_terminated() {
        state.sessions.finish(&call_id);
    }

    state.twiml.render(&instructions, &state.clips)
}

/// Handler for `POST /twilio/webhook/incoming-call`.
pub async fn incoming_call_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<IncomingCallForm>, FormRejection>,
) -> Twiml {
    let Some(form) = accept(form, "incoming-call") else {
        return apology(&state);
    };
    let Some(call_sid) = non_empty(form.call_sid) else {
        warn!(callback = "incoming-call", "callback without CallSid");
        return apology(&state);
    };

    let session = CallSession::new(
        call_sid.clone(),
        form.from.unwrap_or_default(),
        form.to.unwrap_or_default(),
    );
    let Some(handle) = state.sessions.open(session) else {
        warn!(call_id = %call_sid, "incoming-call for a call that is already known");
        return apology(&state);
    };

    let mut session = handle.session.lock().await;
    let result = state.orchestrator.start_call(&mut session).await;
    conclude(&state, &handle, &mut session, result)
}

/// Handler for `POST /twilio/webhook/process-audio`.
///
/// A missing recording or one of zero seconds means the caller said nothing.
pub async fn process_audio_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<RecordingForm>, FormRejection>,
) -> Twiml {
    let Some(form) = accept(form, "process-audio") else {
        return apology(&state);
    };
    let Some(call_sid) = non_empty(form.call_sid) else {
        warn!(callback = "process-audio", "callback without CallSid");
        return apology(&state);
    };

    let handle = match state.sessions.lookup(&call_sid) {
        Lookup::Live(handle) => handle,
        Lookup::Ended => {
            debug!(call_id = %call_sid, "recording for an ended call ignored");
            return hangup(&state);
        }
        Lookup::Unknown => {
            warn!(call_id = %call_sid, "recording for an unknown call");
            return apology(&state);
        }
    };
    handle.touch();

    let silent = form
        .recording_duration
        .as_deref()
        .and_then(|d| d.trim().parse::<f64>().ok())
        .is_some_and(|secs| secs <= 0.0);
    let recording = non_empty(form.recording_url).filter(|_| !silent);

    let mut session = handle.session.lock().await;
    let result = match recording {
        Some(url) => state.orchestrator.on_audio_captured(&mut session, &url).await,
        None => state.orchestrator.on_no_input(&mut session),
    };
    conclude(&state, &handle, &mut session, result)
}

/// Handler for `POST /twilio/webhook/call-status`.
///
/// Always answers an empty document. Repeated or late reports are no-ops.
pub async fn call_status_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<CallStatusForm>, FormRejection>,
) -> Twiml {
    let Some(form) = accept(form, "call-status") else {
        return Twiml::empty();
    };
    let (Some(call_sid), Some(raw_status)) = (non_empty(form.call_sid), non_empty(form.call_status))
    else {
        warn!(callback = "call-status", "callback without CallSid or CallStatus");
        return Twiml::empty();
    };
    let status: CallStatus = match raw_status.parse() {
        Ok(status) => status,
        Err(e) => {
            warn!(call_id = %call_sid, error = %e, "unrecognized call status");
            return Twiml::empty();
        }
    };

    match state.sessions.lookup(&call_sid) {
        Lookup::Live(handle) => {
            handle.touch();
            if status.is_final() {
                // Raised before waiting so an in-flight turn discards its result.
                handle.mark_hung_up();
                let mut session = handle.session.lock().await;
                state.orchestrator.on_call_status(&mut session, status);
                state.sessions.finish(&call_sid);
            } else {
                debug!(call_id = %call_sid, status = %status, "call progress");
            }
        }
        Lookup::Ended | Lookup::Unknown => {
            debug!(call_id = %call_sid, status = %status, "status for inactive call ignored");
        }
    }

    Twiml::empty()
}

/// Handler for `POST /twilio/webhook/voice-fallback`.
///
/// The gateway calls this when one of our responses failed on its side.
pub async fn voice_fallback_handler(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<FallbackForm>, FormRejection>,
) -> Twiml {
    let Some(form) = accept(form, "voice-fallback") else {
        return apology(&state);
    };
    let call_sid = non_empty(form.call_sid);
    warn!(
        call_id = call_sid.as_deref().unwrap_or("<none>"),
        error_code = form.error_code.as_deref().unwrap_or("<none>"),
        "gateway invoked voice fallback"
    );

    let Some(call_sid) = call_sid else {
        return apology(&state);
    };
    let Lookup::Live(handle) = state.sessions.lookup(&call_sid) else {
        return apology(&state);
    };

    let mut session = handle.session.lock().await;
    let instructions = state.orchestrator.abort(&mut session);
    state.sessions.finish(&call_sid);
    state.twiml.render(&instructions, &state.clips)
}
