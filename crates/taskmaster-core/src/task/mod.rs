//! Task records and their lifecycle.
//!
//! A task is created `pending` and transitions exactly once to `completed`:
//!
//!   PENDING ─────────> COMPLETED (terminal)
//!
//! `overdue` is never stored. It is derived at read time from the due date
//! while the task is still pending, see [`Task::display_status`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

/// Stored task status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not yet completed. Documents written by older builds may carry
    /// `"overdue"`; that value is read back as pending.
    #[default]
    #[serde(alias = "overdue")]
    Pending,
    /// Completed (terminal state)
    Completed,
}

/// Status as presented to the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DisplayStatus {
    Pending,
    Overdue,
    Completed,
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DisplayStatus::Pending => "pending",
            DisplayStatus::Overdue => "overdue",
            DisplayStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        };
        f.write_str(s)
    }
}

impl FromStr for Priority {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(ValidationError::InvalidValue {
                field: "priority".to_string(),
                message: format!("expected low, medium or high, got '{other}'"),
            }),
        }
    }
}

/// User input for a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub category: String,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_date,
            priority: Priority::default(),
            category: String::new(),
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// A tracked task.
///
/// Invariant: `completed_at` is `Some` iff `status == Completed`. The only
/// writer of either field is [`Task::into_completed`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique identifier (UUID v4)
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    pub priority: Priority,
    /// Timeliness points awarded on completion (0 while pending)
    #[serde(default)]
    pub points: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Build a pending task from a draft, assigning a fresh id.
    ///
    /// # Errors
    /// Returns an error if the title is blank.
    pub fn from_draft(draft: TaskDraft) -> Result<Self, ValidationError> {
        let title = draft.title.trim().to_string();
        if title.is_empty() {
            return Err(ValidationError::Blank {
                field: "title".to_string(),
            });
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            title,
            description: draft.description,
            due_date: draft.due_date,
            status: TaskStatus::Pending,
            priority: draft.priority,
            points: 0.0,
            category: draft.category.trim().to_string(),
            completed_at: None,
        })
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Consume a pending task and return its completed form.
    pub fn into_completed(self, points: f64, at: DateTime<Utc>) -> Self {
        Self {
            status: TaskStatus::Completed,
            points,
            completed_at: Some(at),
            ..self
        }
    }

    /// Whether the task was finished at or before its due date.
    ///
    /// A completed task without a completion instant is treated as late.
    pub fn completed_on_time(&self) -> bool {
        match (self.status, self.completed_at) {
            (TaskStatus::Completed, Some(at)) => at <= self.due_date,
            _ => false,
        }
    }

    /// Status for display, deriving `overdue` from `now`.
    pub fn display_status(&self, now: DateTime<Utc>) -> DisplayStatus {
        match self.status {
            TaskStatus::Completed => DisplayStatus::Completed,
            TaskStatus::Pending if now > self.due_date => DisplayStatus::Overdue,
            TaskStatus::Pending => DisplayStatus::Pending,
        }
    }
}
