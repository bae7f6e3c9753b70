use advisor_types::CallState;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallError {
    #[error("illegal transition {from} -> {to}")]
    IllegalTransition { from: CallState, to: CallState },

    #[error("call {0} has already terminated")]
    SessionTerminated(String),

    #[error("unexpected {callback} callback in state {state}")]
    UnexpectedCallback {
        callback: &'static str,
        state: CallState,
    },

    #[error("recording fetch failed: {0}")]
    Recording(String),

    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },
}
