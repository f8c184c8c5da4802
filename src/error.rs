//! Crate error type
//!
//! Gameplay commands never fail (they return `bool`); only storage and
//! configuration plumbing produce errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    InvalidTuning(&'static str),
}

pub type Result<T> = std::result::Result<T, Error>;
