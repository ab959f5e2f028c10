//! Error types for the practice core

use thiserror::Error;

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised around the scorer. Scoring itself never fails.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transcription unavailable: {0}")]
    TranscriptionUnavailable(String),

    #[error("Invalid threshold {name}: {value} (expected a value in 0.0..=1.0)")]
    InvalidThreshold { name: &'static str, value: f64 },

    #[error("Practice session error: {0}")]
    Session(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
