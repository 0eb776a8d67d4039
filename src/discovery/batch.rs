//! Batched probing
//!
//! Candidates are probed in fixed-size batches. Probes inside a batch run
//! concurrently; the next batch starts only after every probe of the
//! current one has settled, plus a short pause. Confirmed paths are
//! appended as each batch settles, so a caller that stops waiting keeps
//! everything from the batches that finished.
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;

use super::probe::{probe_with_timeout, ProbeOutcome, Prober};
use super::profile::CapabilityProfile;

/// Only the first few misses are logged
const LOGGED_MISSES: usize = 20;

/// Progress after one settled batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    /// 1-based index of the batch that just settled
    pub batch: usize,
    pub batches: usize,
    pub tested: usize,
    pub total: usize,
    /// Confirmed paths so far, all batches
    pub found: usize,
}

impl BatchProgress {
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.tested as f32 / self.total as f32
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScheduler {
    batch_size: usize,
    probe_timeout: Duration,
    pause: Duration,
}

impl BatchScheduler {
    pub fn new(batch_size: usize, probe_timeout: Duration, pause: Duration) -> Self {
        Self {
            batch_size: batch_size.max(1),
            probe_timeout,
            pause,
        }
    }

    pub fn from_profile(profile: &CapabilityProfile) -> Self {
        Self::new(profile.batch_size(), profile.probe_timeout(), profile.batch_pause())
    }

    pub fn with_probe_timeout(self, probe_timeout: Duration) -> Self {
        Self { probe_timeout, ..self }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Probe every candidate, appending confirmed paths to `confirmed`
    ///
    /// `on_batch` is called once per settled batch. Paths already present in
    /// `confirmed` are not added twice.
    pub async fn run<P, F>(
        &self,
        prober: &Arc<P>,
        candidates: &[String],
        confirmed: &mut Vec<String>,
        mut on_batch: F,
    ) where
        P: Prober,
        F: FnMut(&BatchProgress),
    {
        let total = candidates.len();
        let batches = total.div_ceil(self.batch_size);
        let mut tested = 0;

        for (index, batch) in candidates.chunks(self.batch_size).enumerate() {
            let outcomes = self.probe_batch(prober, batch, tested).await;
            tested += batch.len();

            for (path, outcome) in batch.iter().zip(outcomes) {
                if outcome.is_confirmed() && !confirmed.contains(path) {
                    tracing::info!("✅ Found photo: {}", path);
                    confirmed.push(path.clone());
                }
            }

            on_batch(&BatchProgress {
                batch: index + 1,
                batches,
                tested,
                total,
                found: confirmed.len(),
            });

            if tested < total && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }
    }

    /// Issue one probe task per path and wait for all of them
    ///
    /// Outcomes come back in `batch` order. Dropping this future aborts
    /// the probes still in flight.
    async fn probe_batch<P: Prober>(
        &self,
        prober: &Arc<P>,
        batch: &[String],
        offset: usize,
    ) -> Vec<ProbeOutcome> {
        let mut probes = JoinSet::new();

        for (i, path) in batch.iter().enumerate() {
            let prober = Arc::clone(prober);
            let path = path.clone();
            let limit = self.probe_timeout;
            probes.spawn(async move { (i, probe_with_timeout(prober.as_ref(), &path, limit).await) });
        }

        let mut outcomes = vec![ProbeOutcome::Absent; batch.len()];
        while let Some(joined) = probes.join_next().await {
            match joined {
                Ok((i, outcome)) => {
                    if !outcome.is_confirmed() && offset + i < LOGGED_MISSES {
                        tracing::debug!("❌ Photo not available: {} ({:?})", batch[i], outcome);
                    }
                    outcomes[i] = outcome;
                }
                Err(e) => tracing::warn!("⚠️  Probe task failed: {}", e),
            }
        }

        outcomes
    }
}
