use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Acquisition error: {message}")]
    Acquire { message: String },

    #[error("Parser error: {message}")]
    Parser { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Subprocess error: {message}")]
    Subprocess { message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },
}

pub type Result<T> = std::result::Result<T, ScanError>;
