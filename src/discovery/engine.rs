//! Discovery orchestrator
//!
//! Owns one discovery run from Idle to Complete:
//!
//! 1. Scanning: generated candidates go through the batch scheduler,
//!    bounded by the scan deadline.
//! 2. Found if anything was confirmed, otherwise Empty and the fallback
//!    list is probed. Only when that is empty too, and the plan trusts it,
//!    is the list used without confirmation.
//! 3. Finalizing builds the collection; Complete is terminal until refresh.
//!
//! The whole run is bounded by the safety deadline. When it fires the run
//! completes with whatever was confirmed so far.
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::batch::BatchScheduler;
use super::candidates::CandidatePlan;
use super::probe::Prober;
use super::profile::CapabilityProfile;
use super::progress::{band_percent, LogObserver, Notice, NoticeLevel, Phase, ProgressObserver, Status};
use crate::gallery::PhotoCollection;

/// Last-resort filenames, relative to the candidate base folder
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct FallbackPlan {
    pub files: Vec<String>,
    pub probe_timeout_ms: u64,
    /// Use `files` as-is when none of them can be confirmed
    pub trust_unconfirmed: bool,
}

impl Default for FallbackPlan {
    fn default() -> Self {
        Self {
            files: (1..=5).map(|n| format!("photo{}.jpeg", n)).collect(),
            probe_timeout_ms: 3_000,
            trust_unconfirmed: false,
        }
    }
}

impl FallbackPlan {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

/// How the final collection came about
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Candidate scanning confirmed at least one photo
    Found,
    /// Scanning found nothing; some fallback entries were confirmed
    FallbackConfirmed,
    /// Nothing confirmed; the trusted fallback list is shown unchecked
    FallbackAssumed,
    Empty,
}

/// Everything the renderer and the loading screen need after a run
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoveryReport {
    pub photos: PhotoCollection,
    pub outcome: Outcome,
    pub notice: Notice,
    /// Candidates probed during the scan
    pub tested: usize,
    /// The safety deadline cut the run short
    pub stalled: bool,
    pub elapsed: Duration,
    pub finished_at: DateTime<Utc>,
}

impl DiscoveryReport {
    pub fn count(&self) -> usize {
        self.photos.len()
    }
}

fn notice_for(outcome: Outcome, count: usize) -> Notice {
    match outcome {
        Outcome::Found => {
            Notice::new(NoticeLevel::Success, format!("Gallery loaded! Found {} photos", count))
        }
        Outcome::FallbackConfirmed => Notice::new(
            NoticeLevel::Warning,
            format!("No photos found by scanning, loaded {} fallback photos", count),
        ),
        Outcome::FallbackAssumed => Notice::new(
            NoticeLevel::Warning,
            format!("No photos confirmed, showing {} fallback photos", count),
        ),
        Outcome::Empty => Notice::new(NoticeLevel::Warning, "No photos found"),
    }
}

/// Discovers photos for one site and keeps the resulting collection
pub struct DiscoveryEngine<P: Prober> {
    prober: Arc<P>,
    plan: CandidatePlan,
    fallback: FallbackPlan,
    profile: CapabilityProfile,
    observer: Box<dyn ProgressObserver>,
    phase: Phase,
    outcome: Outcome,
    tested: usize,
    collection: PhotoCollection,
    last_report: Option<DiscoveryReport>,
}

impl<P: Prober> DiscoveryEngine<P> {
    pub fn new(prober: Arc<P>, plan: CandidatePlan, profile: CapabilityProfile) -> Self {
        Self {
            prober,
            plan,
            fallback: FallbackPlan::default(),
            profile,
            observer: Box::new(LogObserver),
            phase: Phase::Idle,
            outcome: Outcome::Empty,
            tested: 0,
            collection: PhotoCollection::new(),
            last_report: None,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPlan) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn with_observer(mut self, observer: impl ProgressObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn collection(&self) -> &PhotoCollection {
        &self.collection
    }

    /// Manual edits between runs; the next refresh replaces them
    pub fn collection_mut(&mut self) -> &mut PhotoCollection {
        &mut self.collection
    }

    pub fn last_report(&self) -> Option<&DiscoveryReport> {
        self.last_report.as_ref()
    }

    /// Run discovery once
    ///
    /// A completed engine returns its last report without probing again;
    /// use `refresh` to rescan.
    pub async fn run(&mut self) -> DiscoveryReport {
        if self.phase == Phase::Complete {
            if let Some(report) = &self.last_report {
                tracing::debug!("Discovery already complete, reusing last report");
                return report.clone();
            }
        }

        let started = Instant::now();
        self.collection.clear();
        self.outcome = Outcome::Empty;
        self.tested = 0;
        self.set_status(Status::new(Phase::Idle, 0, "Initializing..."));

        let mut confirmed = Vec::new();
        let safety = self.profile.safety_deadline();
        let stalled = tokio::time::timeout(safety, self.sweep(&mut confirmed))
            .await
            .is_err();

        if stalled {
            tracing::warn!(
                "🚨 Safety deadline reached after {:?}, completing with {} photos",
                safety,
                confirmed.len()
            );
            self.settle_stalled(&mut confirmed);
        }

        let count = confirmed.len();
        self.set_status(Status {
            found: count,
            ..Status::new(
                Phase::Finalizing,
                100,
                format!("Finalizing gallery with {} photos...", count),
            )
        });
        self.collection = PhotoCollection::from_paths(&confirmed);

        let report = DiscoveryReport {
            photos: self.collection.clone(),
            outcome: self.outcome,
            notice: notice_for(self.outcome, self.collection.len()),
            tested: self.tested,
            stalled,
            elapsed: started.elapsed(),
            finished_at: Utc::now(),
        };

        self.set_status(Status {
            found: report.count(),
            ..Status::new(Phase::Complete, 100, "Ready!")
        });
        tracing::info!("📊 {} ({:?})", report.notice.text, report.elapsed);

        self.last_report = Some(report.clone());
        report
    }

    /// Forget the last run and discover again
    pub async fn refresh(&mut self) -> DiscoveryReport {
        tracing::info!("🔄 Scanning for new photos...");
        self.phase = Phase::Idle;
        self.last_report = None;
        self.run().await
    }

    /// Scan, then fall back. Confirmed paths land in `confirmed` as soon
    /// as each batch settles, so they survive cancellation.
    async fn sweep(&mut self, confirmed: &mut Vec<String>) {
        let candidates = self.plan.generate();
        let total = candidates.len();
        tracing::info!("🔍 Testing {} possible photo patterns...", total);
        self.set_status(Status {
            total,
            ..Status::new(Phase::Scanning, 10, "Scanning for photos...")
        });

        let prober = Arc::clone(&self.prober);
        let scheduler = BatchScheduler::from_profile(&self.profile);
        let deadline = self.profile.scan_deadline();

        let scan = scheduler.run(&prober, &candidates, confirmed, |progress| {
            self.tested = progress.tested;
            self.observer.on_status(&Status {
                phase: Phase::Scanning,
                percent: band_percent(10, 80, progress.tested, progress.total),
                label: format!("Testing photo pattern {} of {}...", progress.tested, progress.total),
                tested: progress.tested,
                total: progress.total,
                found: progress.found,
            });
        });

        if tokio::time::timeout(deadline, scan).await.is_err() {
            tracing::warn!(
                "⏱️  Scan deadline reached ({:?}), proceeding with {} photos",
                deadline,
                confirmed.len()
            );
        }

        if !confirmed.is_empty() {
            self.outcome = Outcome::Found;
            self.set_status(Status {
                found: confirmed.len(),
                ..Status::new(Phase::Found, 80, format!("Found {} photos", confirmed.len()))
            });
            return;
        }

        self.set_status(Status::new(Phase::Empty, 80, "No photos found, trying fallback list..."));
        self.probe_fallback(confirmed).await;
    }

    async fn probe_fallback(&mut self, confirmed: &mut Vec<String>) {
        let files: Vec<String> = self
            .fallback
            .files
            .iter()
            .map(|name| self.plan.path_for(name))
            .collect();
        if files.is_empty() {
            return;
        }

        tracing::warn!("🚨 Loading fallback photos...");
        let prober = Arc::clone(&self.prober);
        let scheduler = BatchScheduler::from_profile(&self.profile)
            .with_probe_timeout(self.fallback.probe_timeout());

        scheduler
            .run(&prober, &files, confirmed, |progress| {
                self.observer.on_status(&Status {
                    phase: Phase::Empty,
                    percent: band_percent(80, 95, progress.tested, progress.total),
                    label: "Loading fallback photos...".to_string(),
                    tested: progress.tested,
                    total: progress.total,
                    found: progress.found,
                });
            })
            .await;

        if !confirmed.is_empty() {
            self.outcome = Outcome::FallbackConfirmed;
        } else if self.fallback.trust_unconfirmed {
            tracing::warn!("⚠️  No fallback photo confirmed, using the list unchecked");
            confirmed.extend(files);
            self.outcome = Outcome::FallbackAssumed;
        }
    }

    /// Decide the outcome when the safety deadline interrupted the sweep
    fn settle_stalled(&mut self, confirmed: &mut Vec<String>) {
        if !confirmed.is_empty() {
            if self.phase == Phase::Empty {
                self.outcome = Outcome::FallbackConfirmed;
            } else {
                self.outcome = Outcome::Found;
                self.set_status(Status {
                    found: confirmed.len(),
                    ..Status::new(Phase::Found, 80, format!("Found {} photos", confirmed.len()))
                });
            }
            return;
        }

        if self.phase != Phase::Empty {
            self.set_status(Status::new(Phase::Empty, 80, "No photos found"));
        }
        if self.fallback.trust_unconfirmed {
            confirmed.extend(self.fallback.files.iter().map(|name| self.plan.path_for(name)));
            self.outcome = if confirmed.is_empty() {
                Outcome::Empty
            } else {
                Outcome::FallbackAssumed
            };
        } else {
            self.outcome = Outcome::Empty;
        }
    }

    fn set_status(&mut self, status: Status) {
        if status.phase != self.phase {
            tracing::info!("Discovery phase: {} -> {}", self.phase, status.phase);
            self.phase = status.phase;
        }
        self.observer.on_status(&status);
    }
}

// Implement Debug by hand, the observer is a trait object
impl<P: Prober> fmt::Debug for DiscoveryEngine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscoveryEngine")
            .field("plan", &self.plan)
            .field("fallback", &self.fallback)
            .field("profile", &self.profile)
            .field("phase", &self.phase)
            .field("photos", &self.collection.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::probe::scripted::{Script, ScriptedProber};
    use std::sync::Mutex;

    fn profile() -> CapabilityProfile {
        CapabilityProfile {
            probe_timeout_ms: 3_000,
            batch_size: 2,
            batch_pause_ms: 100,
            scan_deadline_ms: 12_000,
            safety_deadline_ms: 20_000,
        }
    }

    fn fallback(files: &[&str]) -> FallbackPlan {
        FallbackPlan {
            files: files.iter().map(|f| f.to_string()).collect(),
            ..FallbackPlan::default()
        }
    }

    fn engine(prober: &Arc<ScriptedProber>, files: &[&str]) -> DiscoveryEngine<ScriptedProber> {
        DiscoveryEngine::new(
            Arc::clone(prober),
            CandidatePlan::literal("assets", files),
            profile(),
        )
        .with_fallback(fallback(&[]))
    }

    /// Observer that keeps the distinct phases it saw, in order
    fn phase_recorder() -> (Arc<Mutex<Vec<Phase>>>, impl ProgressObserver + 'static) {
        let phases = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&phases);
        let observer = move |status: &Status| {
            let mut phases = sink.lock().unwrap();
            if phases.last() != Some(&status.phase) {
                phases.push(status.phase);
            }
        };
        (phases, observer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_found_in_two_batches() {
        let prober = Arc::new(ScriptedProber::existing(&["assets/a.jpg", "assets/c.jpg"]));
        let (phases, observer) = phase_recorder();
        let mut engine = engine(&prober, &["a.jpg", "b.jpg", "c.jpg"]).with_observer(observer);

        let report = engine.run().await;

        assert_eq!(report.outcome, Outcome::Found);
        assert_eq!(report.count(), 2);
        assert_eq!(report.photos.paths(), vec!["assets/a.jpg", "assets/c.jpg"]);
        assert_eq!(report.tested, 3);
        assert!(!report.stalled);
        assert_eq!(report.notice.level, NoticeLevel::Success);
        assert_eq!(report.notice.text, "Gallery loaded! Found 2 photos");
        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(
            *phases.lock().unwrap(),
            vec![Phase::Idle, Phase::Scanning, Phase::Found, Phase::Finalizing, Phase::Complete]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_dynamic_results_take_precedence() {
        let prober = Arc::new(ScriptedProber::existing(&["assets/a.jpg", "assets/f1.jpg"]));
        let mut engine =
            engine(&prober, &["a.jpg", "b.jpg"]).with_fallback(fallback(&["f1.jpg"]));

        let report = engine.run().await;

        assert_eq!(report.outcome, Outcome::Found);
        assert_eq!(report.photos.paths(), vec!["assets/a.jpg"]);
        assert!(!prober.calls().contains(&"assets/f1.jpg".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_confirms_subset() {
        let prober = Arc::new(ScriptedProber::existing(&["assets/f1.jpg"]));
        let (phases, observer) = phase_recorder();
        let mut engine = engine(&prober, &["a.jpg", "b.jpg"])
            .with_fallback(fallback(&["f1.jpg", "f2.jpg"]))
            .with_observer(observer);

        let report = engine.run().await;

        assert_eq!(report.outcome, Outcome::FallbackConfirmed);
        assert_eq!(report.photos.paths(), vec!["assets/f1.jpg"]);
        assert_eq!(report.count(), 1);
        assert_eq!(report.notice.level, NoticeLevel::Warning);
        assert_eq!(
            *phases.lock().unwrap(),
            vec![Phase::Idle, Phase::Scanning, Phase::Empty, Phase::Finalizing, Phase::Complete]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_everything_absent_is_empty_not_error() {
        let prober = Arc::new(ScriptedProber::new());
        let mut engine = engine(&prober, &["a.jpg", "b.jpg"])
            .with_fallback(fallback(&["f1.jpg", "f2.jpg"]));

        let report = engine.run().await;

        assert_eq!(report.outcome, Outcome::Empty);
        assert!(report.photos.is_empty());
        assert_eq!(report.notice, Notice::new(NoticeLevel::Warning, "No photos found"));
        assert_eq!(engine.phase(), Phase::Complete);
        assert_eq!(prober.calls().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fallback_uses_its_own_short_timeout() {
        let prober = Arc::new(
            ScriptedProber::existing(&["assets/f1.jpg"]).with("assets/f2.jpg", Script::Hang),
        );
        let mut engine = DiscoveryEngine::new(
            Arc::clone(&prober),
            CandidatePlan::literal("assets", &["a.jpg"]),
            CapabilityProfile {
                probe_timeout_ms: 60_000,
                scan_deadline_ms: 120_000,
                safety_deadline_ms: 120_000,
                ..profile()
            },
        )
        .with_fallback(FallbackPlan {
            probe_timeout_ms: 500,
            ..fallback(&["f1.jpg", "f2.jpg"])
        });

        let report = engine.run().await;

        assert!(!report.stalled);
        assert_eq!(report.outcome, Outcome::FallbackConfirmed);
        assert_eq!(report.photos.paths(), vec!["assets/f1.jpg"]);
        assert!(report.elapsed >= Duration::from_millis(500));
        assert!(report.elapsed < Duration::from_secs(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_trusted_fallback_used_unconfirmed() {
        let prober = Arc::new(ScriptedProber::new());
        let mut engine = engine(&prober, &["a.jpg"]).with_fallback(FallbackPlan {
            trust_unconfirmed: true,
            ..fallback(&["f1.jpg", "f2.jpg"])
        });

        let report = engine.run().await;

        assert_eq!(report.outcome, Outcome::FallbackAssumed);
        assert_eq!(report.photos.paths(), vec!["assets/f1.jpg", "assets/f2.jpg"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_safety_deadline_keeps_partial_results() {
        let prober = Arc::new(
            ScriptedProber::existing(&["assets/p1.jpg", "assets/p2.jpg", "assets/p3.jpg"])
                .with("assets/p4.jpg", Script::Hang),
        );
        let mut engine = DiscoveryEngine::new(
            Arc::clone(&prober),
            CandidatePlan::literal("assets", &["p1.jpg", "p2.jpg", "p3.jpg", "p4.jpg", "p5.jpg"]),
            CapabilityProfile {
                probe_timeout_ms: 60_000,
                batch_size: 3,
                batch_pause_ms: 100,
                scan_deadline_ms: 60_000,
                safety_deadline_ms: 5_000,
            },
        )
        .with_fallback(fallback(&["f1.jpg"]));

        let report = engine.run().await;

        assert!(report.stalled);
        assert_eq!(report.outcome, Outcome::Found);
        assert_eq!(
            report.photos.paths(),
            vec!["assets/p1.jpg", "assets/p2.jpg", "assets/p3.jpg"]
        );
        assert!(report.elapsed >= Duration::from_secs(5));
        assert!(report.elapsed < Duration::from_secs(6));
        assert_eq!(engine.phase(), Phase::Complete);
        assert!(!prober.calls().contains(&"assets/f1.jpg".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_safety_deadline_with_nothing_uses_trusted_fallback() {
        let prober = Arc::new(ScriptedProber::new().with("assets/a.jpg", Script::Hang));
        let mut engine = DiscoveryEngine::new(
            Arc::clone(&prober),
            CandidatePlan::literal("assets", &["a.jpg"]),
            CapabilityProfile {
                probe_timeout_ms: 60_000,
                safety_deadline_ms: 1_000,
                ..profile()
            },
        )
        .with_fallback(FallbackPlan {
            trust_unconfirmed: true,
            ..fallback(&["f1.jpg"])
        });

        let report = engine.run().await;

        assert!(report.stalled);
        assert_eq!(report.outcome, Outcome::FallbackAssumed);
        assert_eq!(report.photos.paths(), vec!["assets/f1.jpg"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_deadline_stops_sweep() {
        let prober = Arc::new(
            ScriptedProber::existing(&["assets/a.jpg"]).with("assets/c.jpg", Script::Hang),
        );
        let mut engine = DiscoveryEngine::new(
            Arc::clone(&prober),
            CandidatePlan::literal("assets", &["a.jpg", "b.jpg", "c.jpg", "d.jpg", "e.jpg"]),
            CapabilityProfile {
                probe_timeout_ms: 10_000,
                scan_deadline_ms: 1_000,
                ..profile()
            },
        );

        let report = engine.run().await;

        assert!(!report.stalled);
        assert_eq!(report.outcome, Outcome::Found);
        assert_eq!(report.photos.paths(), vec!["assets/a.jpg"]);
        assert_eq!(report.tested, 2);
        assert!(!prober.calls().contains(&"assets/e.jpg".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_is_idempotent_until_refresh() {
        let prober = Arc::new(ScriptedProber::existing(&["assets/a.jpg"]));
        let mut engine = engine(&prober, &["a.jpg", "b.jpg"]);

        let first = engine.run().await;
        let second = engine.run().await;
        assert_eq!(first, second);
        assert_eq!(prober.calls().len(), 2);

        engine.collection_mut().add_path("assets/manual.jpg").unwrap();
        assert_eq!(engine.collection().len(), 2);

        let refreshed = engine.refresh().await;
        assert_eq!(prober.calls().len(), 4);
        assert_eq!(refreshed.photos.paths(), vec!["assets/a.jpg"]);
        assert_eq!(engine.collection().paths(), vec!["assets/a.jpg"]);
        assert_eq!(engine.last_report(), Some(&refreshed));
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_reaches_full_scan() {
        let prober = Arc::new(ScriptedProber::existing(&["assets/a.jpg"]));
        let statuses = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&statuses);
        let mut engine = engine(&prober, &["a.jpg", "b.jpg", "c.jpg"])
            .with_observer(move |status: &Status| sink.lock().unwrap().push(status.clone()));

        engine.run().await;

        let statuses = statuses.lock().unwrap();
        let scans: Vec<_> = statuses
            .iter()
            .filter(|s| s.phase == Phase::Scanning && s.tested > 0)
            .collect();
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[1].percent, 80);
        assert_eq!(scans[1].label, "Testing photo pattern 3 of 3...");
        assert_eq!(statuses.last().map(|s| s.label.as_str()), Some("Ready!"));
        assert!(statuses.windows(2).all(|w| w[0].percent <= w[1].percent));
    }
}
