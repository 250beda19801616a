//! Per-run output structures.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::NormalizedItem;

/// Ranked items of every source collected in one run.
///
/// Serializes as a plain `{source_id: [item, ...]}` object, which is both the
/// local file format and the stored document body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunOutput {
    sources: BTreeMap<String, Vec<NormalizedItem>>,
}

impl RunOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the ranked items of a source, replacing any earlier entry.
    pub fn insert(&mut self, source_id: impl Into<String>, items: Vec<NormalizedItem>) {
        self.sources.insert(source_id.into(), items);
    }

    pub fn get(&self, source_id: &str) -> Option<&[NormalizedItem]> {
        self.sources.get(source_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[NormalizedItem])> {
        self.sources
            .iter()
            .map(|(source, items)| (source.as_str(), items.as_slice()))
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Total number of items across all sources.
    pub fn item_count(&self) -> usize {
        self.sources.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }
}

/// Outcome of writing to a single destination.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SinkOutcome {
    Written { location: String },
    Skipped { reason: String },
    Failed { error: String },
}

/// Per-destination outcomes of one persistence pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PersistReport {
    pub outcomes: Vec<(String, SinkOutcome)>,
}

impl PersistReport {
    pub fn record(&mut self, destination: impl Into<String>, outcome: SinkOutcome) {
        self.outcomes.push((destination.into(), outcome));
    }

    pub fn written(&self) -> usize {
        self.count(|o| matches!(o, SinkOutcome::Written { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, SinkOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, SinkOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&SinkOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Everything a trigger needs to report about a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output: RunOutput,
    /// Sources whose fetch failed
    pub failed_sources: Vec<String>,
    pub report: PersistReport,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl RunSummary {
    pub fn elapsed_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds()
    }
}
