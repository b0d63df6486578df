pub mod machine;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const STATE_VERSION: &str = "1";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Research,
    Red,
    Green,
    Refactor,
    Architecture,
}

impl Phase {
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Research => "research",
            Phase::Red => "red",
            Phase::Green => "green",
            Phase::Refactor => "refactor",
            Phase::Architecture => "architecture",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted workflow record, one per project root (`.agents/workflow.json`).
///
/// Every field defaults on load so records written by older hook versions,
/// which only carried `version` and `currentPhase`, still deserialize.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub current_phase: Option<Phase>,
    #[serde(default)]
    pub current_work_item: Option<String>,
    #[serde(default)]
    pub work_item_started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_items: Vec<String>,
    #[serde(default)]
    pub stats: WorkflowStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStats {
    #[serde(default)]
    pub commits_observed: u64,
    #[serde(default)]
    pub phase_changes: u64,
    #[serde(default)]
    pub items_completed: u64,
}

fn default_version() -> String {
    STATE_VERSION.to_string()
}

impl Default for WorkflowState {
    fn default() -> Self {
        Self {
            version: default_version(),
            current_phase: None,
            current_work_item: None,
            work_item_started_at: None,
            last_updated: None,
            completed_items: Vec::new(),
            stats: WorkflowStats::default(),
        }
    }
}

impl WorkflowState {
    /// The phase, but only while a work item is active.
    pub fn active_phase(&self) -> Option<Phase> {
        self.current_work_item.as_ref().and(self.current_phase)
    }

    fn mark_completed(&mut self, slug: &str) {
        if !self.completed_items.iter().any(|s| s == slug) {
            self.completed_items.push(slug.to_string());
        }
    }
}

impl std::fmt::Display for WorkflowStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "commits={}, phase_changes={}, items_completed={}",
            self.commits_observed, self.phase_changes, self.items_completed
        )
    }
}
