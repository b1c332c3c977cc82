//! Error types for vocalis-spk

use std::path::PathBuf;
use thiserror::Error;
use vocalis_core::Error as CoreError;

/// Speech synthesis errors
#[derive(Error, Debug)]
pub enum SpeechError {
    #[error("eSpeak NG not found at {path}")]
    ToolMissing { path: PathBuf },

    #[error("Operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Engine error: {0}")]
    Engine(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<SpeechError> for CoreError {
    fn from(err: SpeechError) -> Self {
        CoreError::Speech(err.to_string())
    }
}
