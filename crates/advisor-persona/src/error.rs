use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersonaError {
    #[error("completion failed: {0}")]
    Completion(String),

    #[error("malformed completion output: {0}")]
    MalformedOutput(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
