//! Candidate path generation
//!
//! There is no directory listing to read, so candidates are guessed from a
//! fixed vocabulary. Generation is pure: no I/O, same plan in, same
//! sequence out.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Numbered filenames: `{prefix}1` through `{prefix}{max}`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    pub prefix: String,
    pub max: u32,
}

impl Sequence {
    pub fn new(prefix: &str, max: u32) -> Self {
        Self { prefix: prefix.to_string(), max }
    }
}

/// Everything needed to guess candidate paths inside one folder
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CandidatePlan {
    /// Folder the filenames live in, relative to the site root
    pub base_folder: String,
    /// Extensions without the leading dot
    pub extensions: Vec<String>,
    pub sequences: Vec<Sequence>,
    /// Descriptive or time-based stems crossed with every extension
    pub stems: Vec<String>,
    /// Literal filenames from earlier versions of the site
    pub known_files: Vec<String>,
}

impl Default for CandidatePlan {
    fn default() -> Self {
        Self {
            base_folder: "assets/photos".to_string(),
            extensions: ["jpeg", "jpg", "png", "webp", "gif", "svg"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            sequences: vec![
                Sequence::new("photo", 10),
                Sequence::new("image", 5),
                Sequence::new("img", 5),
            ],
            stems: ["photo", "manohar", "family", "memories", "memory", "legacy", "2023", "2024"]
                .iter()
                .map(|stem| stem.to_string())
                .collect(),
            known_files: [
                "20BCD3A6-E208-4B4A-A9F5-C4E7E213AC19_1_105_c.jpeg",
                "4EBE2B21-F290-4FAE-8469-0EDAD7AC5C2F_1_105_c 2.jpeg",
                "4EF15CBC-ADC7-4577-8EBC-00C0351B49D0 2.jpeg",
                "31206909-F1F9-4374-B24D-1AB4647F0D70_1_201_a.jpeg",
            ]
            .iter()
            .map(|name| name.to_string())
            .collect(),
        }
    }
}

impl CandidatePlan {
    /// A plan that only tries the given literal filenames
    pub fn literal<S: AsRef<str>>(base_folder: &str, files: &[S]) -> Self {
        Self {
            base_folder: base_folder.to_string(),
            extensions: Vec::new(),
            sequences: Vec::new(),
            stems: Vec::new(),
            known_files: files.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    /// Join a filename onto the base folder
    pub fn path_for(&self, file_name: &str) -> String {
        join_path(&self.base_folder, file_name)
    }

    /// Candidate paths in probe order: sequences, then stems, then known files.
    /// Repeats are dropped at first occurrence.
    pub fn generate(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut push = |path: String| {
            if seen.insert(path.clone()) {
                candidates.push(path);
            }
        };

        for sequence in &self.sequences {
            for n in 1..=sequence.max {
                for ext in &self.extensions {
                    push(self.path_for(&format!("{}{}.{}", sequence.prefix, n, ext)));
                }
            }
        }

        for stem in &self.stems {
            for ext in &self.extensions {
                push(self.path_for(&format!("{}.{}", stem, ext)));
            }
        }

        for name in &self.known_files {
            push(self.path_for(name));
        }

        candidates
    }
}

pub(crate) fn join_path(base: &str, file_name: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        file_name.to_string()
    } else {
        format!("{}/{}", base, file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let plan = CandidatePlan::default();
        assert_eq!(plan.generate(), plan.generate());
    }

    #[test]
    fn test_default_plan_shape() {
        let plan = CandidatePlan::default();
        let candidates = plan.generate();

        // (10 + 5 + 5) numbered names and 8 stems, 6 extensions each, plus 4 literals
        assert_eq!(candidates.len(), (20 + 8) * 6 + 4);
        assert_eq!(candidates[0], "assets/photos/photo1.jpeg");
        assert_eq!(candidates[1], "assets/photos/photo1.jpg");
        assert_eq!(
            candidates.last().map(String::as_str),
            Some("assets/photos/31206909-F1F9-4374-B24D-1AB4647F0D70_1_201_a.jpeg")
        );
        assert!(candidates.contains(&"assets/photos/2024.webp".to_string()));
    }

    #[test]
    fn test_repeats_are_dropped() {
        let plan = CandidatePlan {
            base_folder: "assets/photos/".to_string(),
            extensions: vec!["jpg".to_string()],
            sequences: vec![Sequence::new("photo", 2)],
            stems: vec!["photo1".to_string(), "family".to_string()],
            known_files: vec!["family.jpg".to_string(), "extra.png".to_string()],
        };

        assert_eq!(
            plan.generate(),
            vec![
                "assets/photos/photo1.jpg",
                "assets/photos/photo2.jpg",
                "assets/photos/family.jpg",
                "assets/photos/extra.png",
            ]
        );
    }

    #[test]
    fn test_literal_plan() {
        let plan = CandidatePlan::literal("assets", &["a.jpg", "b.jpg"]);
        assert_eq!(plan.generate(), vec!["assets/a.jpg", "assets/b.jpg"]);
    }

    #[test]
    fn test_join_path_without_base() {
        assert_eq!(join_path("", "a.jpg"), "a.jpg");
        assert_eq!(join_path("photos//", "a.jpg"), "photos/a.jpg");
    }
}
