mod config;
pub mod database;
pub mod memory;

pub use config::{Config, DisplayConfig, LogConfig};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Key-value persistence of JSON documents.
///
/// Writes replace the whole value under a key. There are no transactions.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several documents at once. Either every entry is stored or
    /// none is.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<()>;
}

/// Storage keys, namespaced by user so accounts never share documents.
///
/// Every key family has its own fixed prefix. Usernames never contain `:`,
/// so no username can produce a key from another family.
pub mod keys {
    pub const CURRENT_USER: &str = "session:currentUser";

    pub fn tasks(username: &str) -> String {
        format!("user:{username}:tasks")
    }

    pub fn profile(username: &str) -> String {
        format!("user:{username}:profile")
    }

    pub fn history(username: &str) -> String {
        format!("user:{username}:taskHistory")
    }

    pub fn credentials(username: &str) -> String {
        format!("credentials:{username}")
    }
}

/// Returns the TaskMaster data directory.
///
/// `TASKMASTER_DATA_DIR` wins when set. Otherwise `~/.config/taskmaster`, or
/// `~/.config/taskmaster-dev` when `TASKMASTER_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("TASKMASTER_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env =
                std::env::var("TASKMASTER_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("taskmaster-dev")
            } else {
                base_dir.join("taskmaster")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| ConfigError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::keys;

    #[test]
    fn keys_are_namespaced_per_user() {
        assert_eq!(keys::tasks("ada"), "user:ada:tasks");
        assert_eq!(keys::profile("ada"), "user:ada:profile");
        assert_eq!(keys::history("ada"), "user:ada:taskHistory");
        assert_ne!(keys::tasks("ada"), keys::tasks("bob"));
    }

    #[test]
    fn key_families_never_collide() {
        let pairs = [
            ("credentials", "tasks"),
            ("credentials", "profile"),
            ("credentials", "taskHistory"),
            ("session", "currentUser"),
        ];
        for (user, other) in pairs {
            let user_keys = [keys::tasks(user), keys::profile(user), keys::history(user)];
            assert!(!user_keys.contains(&keys::credentials(other)));
            assert!(!user_keys.iter().any(|k| k == keys::CURRENT_USER));
        }
    }
}
