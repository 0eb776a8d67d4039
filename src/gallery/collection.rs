//! Ordered, deduplicated photo collection
//!
//! Populated once per discovery run. The add/remove operations exist for
//! manual testing from the shell; everything else reads.
use std::collections::HashSet;

use super::photo::{Category, CropHint, PhotoDescriptor};
use crate::error::{GalleryError, Result};

/// Category filter as offered by the gallery filter buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, photo: &PhotoDescriptor) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => photo.category == *category,
        }
    }
}

/// Photos in discovery order, unique by `path`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhotoCollection {
    photos: Vec<PhotoDescriptor>,
}

impl PhotoCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build descriptors for confirmed paths, keeping the first occurrence of each
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let photos = paths
            .into_iter()
            .filter(|path| seen.insert(path.as_ref().to_string()))
            .map(|path| PhotoDescriptor::from_path(path.as_ref()))
            .collect();

        Self { photos }
    }

    pub fn len(&self) -> usize {
        self.photos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PhotoDescriptor> {
        self.photos.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PhotoDescriptor> {
        self.photos.get(index)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.photos.iter().any(|photo| photo.path == path)
    }

    pub fn paths(&self) -> Vec<&str> {
        self.photos.iter().map(|photo| photo.path.as_str()).collect()
    }

    pub fn clear(&mut self) {
        self.photos.clear();
    }

    /// Add a descriptor; a second photo with the same path is rejected
    pub fn add(&mut self, photo: PhotoDescriptor) -> Result<()> {
        if self.contains(&photo.path) {
            return Err(GalleryError::DuplicatePhoto(photo.path));
        }
        tracing::info!("➕ Added photo: {}", photo.path);
        self.photos.push(photo);
        Ok(())
    }

    /// Add a photo by path with derived title and description
    pub fn add_path(&mut self, path: &str) -> Result<()> {
        self.add(PhotoDescriptor::from_path(path))
    }

    pub fn remove(&mut self, path: &str) -> Result<PhotoDescriptor> {
        let index = self
            .photos
            .iter()
            .position(|photo| photo.path == path)
            .ok_or_else(|| GalleryError::PhotoNotFound(path.to_string()))?;

        tracing::info!("➖ Removed photo: {}", path);
        Ok(self.photos.remove(index))
    }

    /// Photos visible under a filter, in collection order
    pub fn filter(&self, filter: CategoryFilter) -> Vec<&PhotoDescriptor> {
        self.photos.iter().filter(|photo| filter.matches(photo)).collect()
    }

    /// Counter text: "N" for all photos, "k of N" for a category
    pub fn count_label(&self, filter: CategoryFilter) -> String {
        match filter {
            CategoryFilter::All => self.len().to_string(),
            CategoryFilter::Only(_) => {
                format!("{} of {}", self.filter(filter).len(), self.len())
            }
        }
    }

    pub fn apply_crop(&mut self, crop_hint: CropHint) {
        for photo in &mut self.photos {
            photo.crop_hint = crop_hint;
        }
    }
}
