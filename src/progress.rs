//! Structured progress reporting for long searches.
//!
//! The engine calls a [`ProgressSink`] synchronously, in-line with the search, at
//! coarse points: index build, candidate build per category, and every
//! `tick_interval` combinations of an enumeration loop. A sink must return
//! promptly; it runs on the search thread.

use std::fmt;

use serde::Serialize;

/// Search phase an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Building the spatial grid index.
    IndexBuild,
    /// Building per-point candidate lists.
    CandidateBuild,
    /// Enumerating assignments that cover every category.
    FullCoverage,
    /// Enumerating assignments over category subsets.
    Degradation,
    /// Search finished.
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::IndexBuild => "index_build",
            Stage::CandidateBuild => "candidate_build",
            Stage::FullCoverage => "full_coverage",
            Stage::Degradation => "degradation",
            Stage::Done => "done",
        };
        f.write_str(name)
    }
}

/// A single progress event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressEvent {
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    pub message: String,
}

impl ProgressEvent {
    pub fn new(stage: Stage, message: impl Into<String>) -> Self {
        Self {
            stage,
            category: None,
            current: None,
            total: None,
            message: message.into(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_counts(mut self, current: u64, total: u64) -> Self {
        self.current = Some(current);
        self.total = Some(total);
        self
    }
}

/// Observer for search progress. Purely observational.
pub trait ProgressSink {
    fn on_event(&mut self, event: &ProgressEvent);
}

impl<F: FnMut(&ProgressEvent)> ProgressSink for F {
    #[inline]
    fn on_event(&mut self, event: &ProgressEvent) {
        self(event)
    }
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline(always)]
    fn on_event(&mut self, _event: &ProgressEvent) {}
}

/// Sink that forwards events to `tracing` at INFO level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_event(&mut self, event: &ProgressEvent) {
        tracing::info!(
            stage = %event.stage,
            category = event.category.as_deref(),
            current = event.current,
            total = event.total,
            "{}",
            event.message
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_sink_records_events() {
        let mut seen = Vec::new();
        {
            let mut sink = |e: &ProgressEvent| seen.push(e.clone());
            sink.on_event(&ProgressEvent::new(Stage::IndexBuild, "building"));
            sink.on_event(
                &ProgressEvent::new(Stage::FullCoverage, "scanning")
                    .with_category("A")
                    .with_counts(5, 10),
            );
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].category.as_deref(), Some("A"));
        assert_eq!(seen[1].current, Some(5));
        assert_eq!(seen[1].total, Some(10));
    }

    #[test]
    fn test_event_json_shape() {
        let event = ProgressEvent::new(Stage::CandidateBuild, "candidates").with_category("B");
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["stage"], "candidate_build");
        assert_eq!(json["category"], "B");
        assert!(json.get("current").is_none());
    }
}
