//! Existence probes
//!
//! A probe answers one question for one candidate path: can this be loaded
//! as an image? Errors never escape a probe. `probe_with_timeout` folds
//! them, and any probe that takes too long, into a non-confirmed outcome.
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use thiserror::Error;
use tokio::io::AsyncReadExt;

use crate::error::GalleryError;

/// Bytes read from a local file to sniff its format
const HEADER_LEN: u64 = 512;

/// Result of one probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Exists,
    Absent,
    /// No answer within the probe timeout; treated as absent
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, ProbeOutcome::Exists)
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("cannot resolve {path:?}: {reason}")]
    Resolve { path: String, reason: String },
}

/// Something that can check whether a relative resource path is a loadable image
pub trait Prober: Send + Sync + 'static {
    /// `Ok(true)` if the resource exists and is an image, `Ok(false)` if not
    fn probe(&self, path: &str) -> impl Future<Output = Result<bool, ProbeError>> + Send;
}

/// Run one probe, bounded by `limit`
///
/// Always resolves: a probe that neither confirms nor denies within the
/// limit is dropped and reported as `TimedOut`.
pub async fn probe_with_timeout<P: Prober>(prober: &P, path: &str, limit: Duration) -> ProbeOutcome {
    match tokio::time::timeout(limit, prober.probe(path)).await {
        Ok(Ok(true)) => ProbeOutcome::Exists,
        Ok(Ok(false)) => ProbeOutcome::Absent,
        Ok(Err(e)) => {
            tracing::debug!("probe error for {}: {}", path, e);
            ProbeOutcome::Absent
        }
        Err(_) => ProbeOutcome::TimedOut,
    }
}

/// Whether a file header belongs to an image a browser would render
pub fn looks_like_image(header: &[u8]) -> bool {
    image::guess_format(header).is_ok() || looks_like_svg(header)
}

fn looks_like_svg(header: &[u8]) -> bool {
    let text = String::from_utf8_lossy(header);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

/// Probes files under a local site root
#[derive(Debug, Clone)]
pub struct FsProber {
    root: PathBuf,
}

impl FsProber {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative resource path onto the root; parent components are refused
    pub fn resolve(&self, path: &str) -> Result<PathBuf, ProbeError> {
        let relative = Path::new(path);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ProbeError::Resolve {
                path: path.to_string(),
                reason: "path leaves the site root".to_string(),
            });
        }
        Ok(self.root.join(relative))
    }
}

impl Prober for FsProber {
    async fn probe(&self, path: &str) -> Result<bool, ProbeError> {
        let full_path = self.resolve(path)?;

        let file = match tokio::fs::File::open(&full_path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e.into()),
        };

        let mut header = Vec::with_capacity(HEADER_LEN as usize);
        file.take(HEADER_LEN).read_to_end(&mut header).await?;

        Ok(looks_like_image(&header))
    }
}

/// Probes resources on a hosted site with plain GET requests
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
    site_url: Url,
}

impl HttpProber {
    pub fn new(site_url: &str) -> Result<Self, GalleryError> {
        let invalid = |reason: String| GalleryError::InvalidSiteUrl {
            url: site_url.to_string(),
            reason,
        };

        let mut url = Url::parse(site_url).map_err(|e| invalid(e.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(invalid("url cannot be a base".to_string()));
        }
        // Relative joins replace the last segment unless the base ends in '/'
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        Ok(Self {
            client: reqwest::Client::new(),
            site_url: url,
        })
    }

    pub fn resolve(&self, path: &str) -> Result<Url, ProbeError> {
        self.site_url.join(path).map_err(|e| ProbeError::Resolve {
            path: path.to_string(),
            reason: e.to_string(),
        })
    }
}

impl Prober for HttpProber {
    async fn probe(&self, path: &str) -> Result<bool, ProbeError> {
        let url = self.resolve(path)?;
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Ok(false);
        }

        // The body is never read; dropping the response closes the request
        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|content_type| content_type.starts_with("image/"));

        Ok(is_image)
    }
}

/// The prober a configured site uses: local folder or hosted URL
#[derive(Debug, Clone)]
pub enum SiteProber {
    Local(FsProber),
    Remote(HttpProber),
}

impl Prober for SiteProber {
    async fn probe(&self, path: &str) -> Result<bool, ProbeError> {
        match self {
            SiteProber::Local(prober) => prober.probe(path).await,
            SiteProber::Remote(prober) => prober.probe(path).await,
        }
    }
}
