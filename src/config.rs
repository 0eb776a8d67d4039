//! Application configuration
//!
//! Read from `config.json` in the user's config directory:
//! - Linux: ~/.config/memorial-gallery/config.json
//! - macOS: ~/Library/Application Support/memorial-gallery/config.json
//! - Windows: %APPDATA%\memorial-gallery\config.json
//!
//! Every field is optional. A missing file means defaults.
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::discovery::{
    CandidatePlan, CapabilityProfile, DiscoveryEngine, FallbackPlan, FsProber, HttpProber,
    ProfileKind, SiteProber,
};
use crate::error::{GalleryError, Result};

const APP_DIR: &str = "memorial-gallery";
const CONFIG_FILE: &str = "config.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Local folder the relative photo paths resolve against
    pub site_root: Option<PathBuf>,
    /// Hosted site to probe over HTTP instead of the local folder
    pub site_url: Option<String>,
    pub profile: ProfileKind,
    /// Replaces the preset selected by `profile` entirely
    pub profile_overrides: Option<CapabilityProfile>,
    pub candidates: CandidatePlan,
    pub fallback: FallbackPlan,
}

impl AppConfig {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location, or defaults if there is none
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::info!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(GalleryError::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&text).map_err(|source| GalleryError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("📁 Config loaded from {}", path.display());
        Ok(config)
    }

    pub fn capability_profile(&self) -> CapabilityProfile {
        self.profile_overrides
            .unwrap_or_else(|| CapabilityProfile::for_kind(self.profile))
    }

    pub fn site_root(&self) -> PathBuf {
        self.site_root.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    /// HTTP prober when a site url is set, local folder otherwise
    pub fn prober(&self) -> Result<SiteProber> {
        match &self.site_url {
            Some(url) => Ok(SiteProber::Remote(HttpProber::new(url)?)),
            None => Ok(SiteProber::Local(FsProber::new(self.site_root()))),
        }
    }

    pub fn engine(&self) -> Result<DiscoveryEngine<SiteProber>> {
        let engine = DiscoveryEngine::new(
            Arc::new(self.prober()?),
            self.candidates.clone(),
            self.capability_profile(),
        )
        .with_fallback(self.fallback.clone());
        Ok(engine)
    }
}
