/// Gallery data model
///
/// This module holds what the discovery engine hands to the renderer:
/// - Photo descriptors and their derived text (photo.rs)
/// - The deduplicated collection with filtering and manual edits (collection.rs)

pub mod collection;
pub mod photo;

pub use collection::{CategoryFilter, PhotoCollection};
pub use photo::{Category, CropHint, PhotoDescriptor};
