//! Append-only log of completed tasks, most recent first.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Frozen copy of a task at the moment it was completed.
///
/// Persisted with the same shape as [`Task`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryEntry {
    task: Task,
}

/// Whether a history entry was finished in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionOutcome {
    OnTime,
    Late,
}

impl CompletionOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CompletionOutcome::OnTime => "Completed on time",
            CompletionOutcome::Late => "Completed late",
        }
    }
}

impl HistoryEntry {
    pub fn snapshot(task: &Task) -> Self {
        Self { task: task.clone() }
    }

    pub fn id(&self) -> &str {
        &self.task.id
    }

    pub fn task(&self) -> &Task {
        &self.task
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.task.completed_at
    }

    pub fn outcome(&self) -> CompletionOutcome {
        if self.task.completed_on_time() {
            CompletionOutcome::OnTime
        } else {
            CompletionOutcome::Late
        }
    }
}

/// Ordered history of completions. Unbounded.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from a persisted list, keeping the first record seen for
    /// each id.
    pub fn load(entries: Vec<HistoryEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|entry| seen.insert(entry.id().to_string()))
            .collect();
        Self { entries }
    }

    /// Prepend a new entry.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.insert(0, entry);
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
