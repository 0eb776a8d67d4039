//! Capability profiles
//!
//! The caller picks the profile; nothing here sniffs the host. Constrained
//! hosts (phones, slow links) get shorter timeouts and smaller batches.
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    #[default]
    Desktop,
    Constrained,
}

/// Timing and batching knobs for one discovery run
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityProfile {
    /// Per-probe wait before a candidate counts as absent
    pub probe_timeout_ms: u64,
    /// Probes issued concurrently per batch
    pub batch_size: usize,
    /// Pause between batches
    pub batch_pause_ms: u64,
    /// Bound on the candidate sweep; results so far are kept
    pub scan_deadline_ms: u64,
    /// Bound on the whole run, fallback included
    pub safety_deadline_ms: u64,
}

impl CapabilityProfile {
    pub fn desktop() -> Self {
        Self {
            probe_timeout_ms: 3_000,
            batch_size: 10,
            batch_pause_ms: 100,
            scan_deadline_ms: 12_000,
            safety_deadline_ms: 20_000,
        }
    }

    pub fn constrained() -> Self {
        Self {
            probe_timeout_ms: 2_000,
            batch_size: 5,
            batch_pause_ms: 100,
            scan_deadline_ms: 8_000,
            safety_deadline_ms: 20_000,
        }
    }

    pub fn for_kind(kind: ProfileKind) -> Self {
        match kind {
            ProfileKind::Desktop => Self::desktop(),
            ProfileKind::Constrained => Self::constrained(),
        }
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Never zero, so the scheduler always makes progress
    pub fn batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn batch_pause(&self) -> Duration {
        Duration::from_millis(self.batch_pause_ms)
    }

    pub fn scan_deadline(&self) -> Duration {
        Duration::from_millis(self.scan_deadline_ms)
    }

    pub fn safety_deadline(&self) -> Duration {
        Duration::from_millis(self.safety_deadline_ms)
    }
}

impl Default for CapabilityProfile {
    fn default() -> Self {
        Self::desktop()
    }
}
