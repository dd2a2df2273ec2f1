//! Error types raised by repository implementations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by repository implementations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("logo ref {0:?} does not point inside the sponsors directory")]
    InvalidLogoRef(String),

    #[error("logo source {} is not a file", .0.display())]
    NotAFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, RepositoryError>;
