//! Per-user state container.
//!
//! A [`Session`] owns one user's tasks, profile and history. State changes
//! only through the scoring engine's transitions; each accepted transition
//! is written to the key-value store before it is installed in memory.
//!
//! Documents are read once in [`Session::open`] and written wholesale after
//! every change. A completion touches three documents and writes them in one
//! [`KvStore::set_many`] batch. Two processes sharing a store will overwrite
//! each other.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::events::Event;
use crate::history::{HistoryEntry, HistoryLog};
use crate::identity::validate_username;
use crate::profile::UserProfile;
use crate::scoring::{self, Completion};
use crate::storage::{keys, KvStore};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};

/// Outcome of an accepted completion.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport {
    pub completion: Completion,
    pub events: Vec<Event>,
}

impl CompletionReport {
    pub fn promoted(&self) -> bool {
        self.completion.rank_change.promoted()
    }
}

pub struct Session<'a, S: KvStore> {
    store: &'a S,
    username: String,
    tasks: TaskStore,
    profile: UserProfile,
    history: HistoryLog,
}

/// Read and decode one document. Missing documents are `None`; documents
/// that fail to decode are logged and also treated as missing.
fn load_document<T: DeserializeOwned>(store: &impl KvStore, key: &str) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            tracing::warn!(key, error = %e, "discarding corrupt document");
            Ok(None)
        }
    }
}

fn write_document<T: Serialize + ?Sized>(store: &impl KvStore, key: &str, value: &T) -> Result<()> {
    store.set(key, &serde_json::to_string(value)?)
}

impl<'a, S: KvStore> Session<'a, S> {
    /// Load `username`'s documents from `store`.
    ///
    /// # Errors
    /// Fails on a blank username or one containing `:`, or if the store
    /// itself cannot be read. Corrupt documents are replaced by empty
    /// defaults.
    pub fn open(store: &'a S, username: &str) -> Result<Self> {
        Self::open_at(store, username, Utc::now())
    }

    /// Like [`Session::open`], stamping a fresh profile with `now`.
    ///
    /// # Errors
    /// See [`Session::open`].
    pub fn open_at(store: &'a S, username: &str, now: DateTime<Utc>) -> Result<Self> {
        let username = validate_username(username)?;
        let tasks: Vec<Task> = load_document(store, &keys::tasks(username))?.unwrap_or_default();
        let history: Vec<HistoryEntry> =
            load_document(store, &keys::history(username))?.unwrap_or_default();
        let mut profile: UserProfile = load_document(store, &keys::profile(username))?
            .unwrap_or_else(|| UserProfile::new(username, now));
        profile.username = username.to_string();

        tracing::debug!(
            username,
            tasks = tasks.len(),
            history = history.len(),
            "session opened"
        );

        Ok(Self {
            store,
            username: username.to_string(),
            tasks: TaskStore::from_tasks(tasks),
            profile,
            history: HistoryLog::load(history),
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn tasks(&self) -> &[Task] {
        self.tasks.tasks()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.get(id)
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn history(&self) -> &[HistoryEntry] {
        self.history.entries()
    }

    /// Create a pending task and persist the task list.
    ///
    /// # Errors
    /// Fails on a blank title or a storage error; nothing changes then.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<(Task, Event)> {
        let mut tasks = self.tasks.clone();
        let task = tasks.add_task(draft)?;
        write_document(self.store, &keys::tasks(&self.username), tasks.tasks())?;
        self.tasks = tasks;

        tracing::info!(task_id = %task.id, title = %task.title, "task added");
        let event = Event::TaskAdded {
            task_id: task.id.clone(),
            at: Utc::now(),
        };
        Ok((task, event))
    }

    /// Complete a task now, using the local calendar day for streaks.
    ///
    /// # Errors
    /// See [`Session::complete_task_at`].
    pub fn complete_task(&mut self, id: &str) -> Result<Option<CompletionReport>> {
        self.complete_task_at(id, Utc::now(), Local::now().date_naive())
    }

    /// Complete task `id` at `now`, counting it toward calendar day `today`.
    ///
    /// Unknown or already completed ids return `Ok(None)` and change nothing.
    ///
    /// # Errors
    /// Fails on clock skew or a storage error; nothing changes then.
    pub fn complete_task_at(
        &mut self,
        id: &str,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> Result<Option<CompletionReport>> {
        let Some(completion) =
            scoring::complete_task(id, self.tasks.tasks(), &self.profile, now, today)?
        else {
            tracing::debug!(task_id = id, "completion ignored: unknown or already completed");
            return Ok(None);
        };

        let mut tasks = self.tasks.clone();
        tasks.replace(completion.task.clone());
        let mut history = self.history.clone();
        history.append(completion.history_entry.clone());

        let tasks_key = keys::tasks(&self.username);
        let profile_key = keys::profile(&self.username);
        let history_key = keys::history(&self.username);
        let tasks_json = serde_json::to_string(tasks.tasks())?;
        let profile_json = serde_json::to_string(&completion.profile)?;
        let history_json = serde_json::to_string(history.entries())?;
        self.store.set_many(&[
            (tasks_key.as_str(), tasks_json.as_str()),
            (profile_key.as_str(), profile_json.as_str()),
            (history_key.as_str(), history_json.as_str()),
        ])?;

        self.tasks = tasks;
        self.history = history;
        self.profile = completion.profile.clone();

        let mut events = vec![Event::TaskCompleted {
            task_id: completion.task.id.clone(),
            points: completion.timeliness_points,
            streak_bonus: completion.streak_bonus,
            streak: completion.profile.streak,
            at: now,
        }];
        tracing::info!(
            task_id = id,
            points = completion.timeliness_points,
            streak = completion.profile.streak,
            total = completion.profile.points,
            "task completed"
        );

        if completion.rank_change.promoted() {
            tracing::info!(
                from = %completion.rank_change.previous,
                to = %completion.rank_change.current,
                "rank promoted"
            );
            events.push(Event::RankPromoted {
                from: completion.rank_change.previous.clone(),
                to: completion.rank_change.current.clone(),
                at: now,
            });
        }

        Ok(Some(CompletionReport { completion, events }))
    }
}
