//! Progress reporting for the loading screen
use serde::{Deserialize, Serialize};
use std::fmt;

/// Orchestrator lifecycle: Idle -> Scanning -> (Found | Empty) -> Finalizing -> Complete
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Idle,
    Scanning,
    Found,
    Empty,
    Finalizing,
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Scanning => "scanning",
            Phase::Found => "found",
            Phase::Empty => "empty",
            Phase::Finalizing => "finalizing",
            Phase::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// Snapshot pushed to the loading screen
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub phase: Phase,
    /// 0..=100
    pub percent: u8,
    pub label: String,
    /// Candidates probed so far in the current sweep
    pub tested: usize,
    pub total: usize,
    /// Photos confirmed so far
    pub found: usize,
}

impl Status {
    pub fn new(phase: Phase, percent: u8, label: impl Into<String>) -> Self {
        Self {
            phase,
            percent: percent.min(100),
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }
}

/// Map `done / total` onto the percentage band `[from, to]`
pub fn band_percent(from: u8, to: u8, done: usize, total: usize) -> u8 {
    if total == 0 {
        return to;
    }
    let span = f64::from(to.saturating_sub(from));
    let share = done.min(total) as f64 / total as f64;
    from + (span * share).round() as u8
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
}

/// Final banner text for the user
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self { level, text: text.into() }
    }
}

/// Receives every status update of a discovery run
pub trait ProgressObserver: Send {
    fn on_status(&mut self, status: &Status);
}

impl<F> ProgressObserver for F
where
    F: FnMut(&Status) + Send,
{
    fn on_status(&mut self, status: &Status) {
        self(status)
    }
}

/// Writes progress to the log only
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl ProgressObserver for LogObserver {
    fn on_status(&mut self, status: &Status) {
        tracing::debug!("⏳ [{:>3}%] {}: {}", status.percent, status.phase, status.label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_percent() {
        assert_eq!(band_percent(10, 80, 0, 10), 10);
        assert_eq!(band_percent(10, 80, 5, 10), 45);
        assert_eq!(band_percent(10, 80, 10, 10), 80);
        assert_eq!(band_percent(10, 80, 12, 10), 80);
        assert_eq!(band_percent(80, 95, 0, 0), 95);
    }

    #[test]
    fn test_status_clamps_percent() {
        let status = Status::new(Phase::Complete, 140, "Ready!");
        assert_eq!(status.percent, 100);
        assert_eq!(status.fraction(), 1.0);
    }

    #[test]
    fn test_closure_observer() {
        let mut seen = Vec::new();
        {
            let mut observer = |status: &Status| seen.push(status.phase);
            observer.on_status(&Status::new(Phase::Scanning, 10, "Scanning for photos..."));
            observer.on_status(&Status::new(Phase::Found, 80, "Found 2 photos"));
        }
        assert_eq!(seen, vec![Phase::Scanning, Phase::Found]);
    }
}
