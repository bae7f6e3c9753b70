use crate::error::CallError;
use async_trait::async_trait;

/// Downloads audio the telephony gateway recorded for a turn.
///
/// `recording_ref` is whatever reference the gateway handed back in its
/// callback, typically a URL.
#[async_trait]
pub trait RecordingFetcher: Send + Sync {
    async fn fetch(&self, recording_ref: &str) -> Result<Vec<u8>, CallError>;
}
