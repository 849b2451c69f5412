//! Error types for the converter.

use thiserror::Error;

/// Errors surfaced by a conversion.
///
/// Almost everything inside the pipeline is recovered locally (bad style
/// blocks, unsupported selectors, missing properties); only genuinely
/// unusable input reaches the caller.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid HTML input: {0}")]
    InvalidHtml(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
