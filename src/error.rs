//! Error types for the gallery
//!
//! Discovery never fails as a whole: probe-level problems are folded into
//! "absent" outcomes (see `discovery::probe::ProbeError`). The errors here
//! cover configuration loading and the manual collection operations.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid site url {url:?}: {reason}")]
    InvalidSiteUrl { url: String, reason: String },

    #[error("photo already in gallery: {0}")]
    DuplicatePhoto(String),

    #[error("photo not in gallery: {0}")]
    PhotoNotFound(String),
}

pub type Result<T> = std::result::Result<T, GalleryError>;
