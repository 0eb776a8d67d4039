//! Photo descriptors handed to the gallery renderer
//!
//! A descriptor is only built for a path that a probe confirmed (or for a
//! fallback entry that is trusted without confirmation). All display text
//! is derived from the filename stem since there is no metadata source.
use serde::{Deserialize, Serialize};
use std::fmt;

/// Gallery category tag
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Family,
    Memories,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Family, Category::Memories];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Family => "family",
            Category::Memories => "memories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which part of the photo stays visible when a tile crops it
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CropHint {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl CropHint {
    pub const ALL: [CropHint; 5] = [
        CropHint::Top,
        CropHint::Bottom,
        CropHint::Left,
        CropHint::Right,
        CropHint::Center,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CropHint::Top => "top",
            CropHint::Bottom => "bottom",
            CropHint::Left => "left",
            CropHint::Right => "right",
            CropHint::Center => "center",
        }
    }
}

impl fmt::Display for CropHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single photo in the gallery
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PhotoDescriptor {
    /// Relative resource path (e.g., "assets/photos/photo1.jpeg"), unique per collection
    pub path: String,
    pub alt_text: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub crop_hint: CropHint,
}

impl PhotoDescriptor {
    /// Build a descriptor with text derived from the filename stem
    pub fn from_path(path: impl Into<String>) -> Self {
        let path = path.into();
        let stem = file_stem(&path).to_string();

        Self {
            alt_text: format!("Family Photo - {}", stem),
            title: format!("Family Memory - {}", stem),
            description: format!("Precious family moment captured in {}", stem),
            path,
            category: Category::default(),
            crop_hint: CropHint::default(),
        }
    }

    /// Build a descriptor with caller-supplied text; alt text mirrors the title
    pub fn custom(
        path: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        category: Category,
    ) -> Self {
        let title = title.into();
        Self {
            path: path.into(),
            alt_text: title.clone(),
            title,
            description: description.into(),
            category,
            crop_hint: CropHint::default(),
        }
    }

    pub fn stem(&self) -> &str {
        file_stem(&self.path)
    }
}

/// File name after the last '/', cut at the first '.'
///
/// "assets/photos/4EF15CBC 2.jpeg" -> "4EF15CBC 2"
pub fn file_stem(path: &str) -> &str {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.split('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_text() {
        let photo = PhotoDescriptor::from_path("assets/photos/photo3.jpeg");

        assert_eq!(photo.stem(), "photo3");
        assert_eq!(photo.alt_text, "Family Photo - photo3");
        assert_eq!(photo.title, "Family Memory - photo3");
        assert_eq!(photo.description, "Precious family moment captured in photo3");
        assert_eq!(photo.category, Category::Family);
        assert_eq!(photo.crop_hint, CropHint::Top);
    }

    #[test]
    fn test_stem_stops_at_first_dot() {
        assert_eq!(file_stem("assets/photos/archive.tar.gz"), "archive");
        assert_eq!(file_stem("plain"), "plain");
        assert_eq!(
            file_stem("assets/photos/4EBE2B21-F290-4FAE-8469-0EDAD7AC5C2F_1_105_c 2.jpeg"),
            "4EBE2B21-F290-4FAE-8469-0EDAD7AC5C2F_1_105_c 2"
        );
    }

    #[test]
    fn test_custom_descriptor() {
        let photo = PhotoDescriptor::custom(
            "assets/photos/beach.jpg",
            "Summer",
            "At the beach",
            Category::Memories,
        );
        assert_eq!(photo.alt_text, "Summer");
        assert_eq!(photo.category, Category::Memories);
    }

    #[test]
    fn test_category_serializes_lowercase() {
        let json = serde_json::to_string(&Category::Memories).unwrap();
        assert_eq!(json, "\"memories\"");
        let hint: CropHint = serde_json::from_str("\"center\"").unwrap();
        assert_eq!(hint, CropHint::Center);
    }
}
