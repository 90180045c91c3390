use thiserror::Error;

#[derive(Debug, Error)]
pub enum PromptDeckError {
    #[error("unauthorized")]
    Auth,
    #[error("configuration error: {0}")]
    Config(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("upstream error: {0}")]
    Upstream(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub type Result<T> = std::result::Result<T, PromptDeckError>;
