//! # TaskMaster Core Library
//!
//! Business logic for TaskMaster, a personal task tracker with gamified
//! progress. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Scoring engine**: pure functions computing timeliness points, streaks,
//!   streak bonuses, rank and precision from a completion
//! - **Session**: per-user state container; every change flows through the
//!   engine and is persisted afterwards
//! - **Storage**: SQLite key-value documents and TOML configuration
//! - **Identity**: local-only login with hashed credentials
//!
//! ## Key Components
//!
//! - [`Session`]: tasks, profile and history of the logged-in user
//! - [`scoring::complete_task`]: the completion transition
//! - [`Database`]: key-value persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod history;
pub mod identity;
pub mod profile;
pub mod rank;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod store;
pub mod task;

pub use error::{AuthError, ConfigError, CoreError, DatabaseError, EngineError, ValidationError};
pub use events::Event;
pub use history::{CompletionOutcome, HistoryEntry, HistoryLog};
pub use identity::{Credentials, IdentityProvider, LocalIdentity, User};
pub use profile::{PrecisionTier, UserProfile};
pub use rank::{determine_rank, Rank, RankChange, RANKS};
pub use scoring::Completion;
pub use session::{CompletionReport, Session};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use store::TaskStore;
pub use task::{DisplayStatus, Priority, Task, TaskDraft, TaskStatus};
