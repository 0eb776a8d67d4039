/// Photo discovery
///
/// The site has no directory listing, so photos are found by guessing:
/// - Candidate filename generation (candidates.rs)
/// - Existence probes for local folders and hosted sites (probe.rs)
/// - Batched concurrent probing (batch.rs)
/// - Desktop vs constrained timing (profile.rs)
/// - Loading-screen progress and notices (progress.rs)
/// - The Idle..Complete orchestrator with fallback and deadlines (engine.rs)

pub mod batch;
pub mod candidates;
pub mod engine;
pub mod probe;
pub mod profile;
pub mod progress;

pub use batch::{BatchProgress, BatchScheduler};
pub use candidates::{CandidatePlan, Sequence};
pub use engine::{DiscoveryEngine, DiscoveryReport, FallbackPlan, Outcome};
pub use probe::{FsProber, HttpProber, ProbeOutcome, Prober, SiteProber};
pub use profile::{CapabilityProfile, ProfileKind};
pub use progress::{Notice, NoticeLevel, Phase, ProgressObserver, Status};
