use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("STT error: {0}")]
    Transcription(String),

    #[error("TTS error: {0}")]
    Synthesis(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
