//! Memorial gallery
//!
//! Finds the photos of a static memorial site without a directory listing
//! and models the gallery that shows them.

pub mod config;
pub mod discovery;
pub mod error;
pub mod gallery;

pub use config::AppConfig;
pub use error::{GalleryError, Result};
