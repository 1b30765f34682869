pub mod auth;
pub mod config;
pub mod history;
pub mod stats;
pub mod task;

use chrono::{DateTime, Local, Utc};
use taskmaster_core::{CoreError, Database, LocalIdentity, Session};

/// Open the logged-in user's session on `db`.
pub fn open_session(db: &Database) -> Result<Session<'_, Database>, CoreError> {
    let user = LocalIdentity::new(db).require_user()?;
    Session::open(db, &user.username)
}

/// Render an instant in local time with a chrono format string.
pub fn format_time(at: DateTime<Utc>, format: &str) -> String {
    at.with_timezone(&Local).format(format).to_string()
}
