//! Host-side errors
//!
//! Only the start sequence and storage can fail. The simulation itself has no
//! error paths: invalid jumps are ignored and running out of levels just keeps
//! the last one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("no element with id '{0}'")]
    MissingElement(&'static str),
    #[error("element '{0}' is not a canvas")]
    NotACanvas(&'static str),
    #[error("failed to create render surface: {0}")]
    Surface(String),
    #[error("no suitable graphics adapter: {0}")]
    Adapter(String),
    #[error("failed to create graphics device: {0}")]
    Device(String),
    #[error("local storage unavailable")]
    StorageUnavailable,
    #[error("storage write failed for '{0}'")]
    StorageWrite(String),
    #[error("invalid stored data: {0}")]
    Json(#[from] serde_json::Error),
}
