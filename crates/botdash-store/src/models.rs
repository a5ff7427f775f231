//! Store input types. Ids and creation timestamps are assigned by the store,
//! so none of these carry them.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCommand {
    pub name: String,
    pub description: String,
    pub usage: String,
    pub active: bool,
}

/// Partial update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub usage: Option<String>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLog {
    pub event_type: String,
    pub server: String,
    pub user: String,
    pub details: String,
}

impl NewLog {
    pub fn new(
        event_type: impl Into<String>,
        server: impl Into<String>,
        user: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            server: server.into(),
            user: user.into(),
            details: details.into(),
        }
    }
}

/// Complete statistics record. Replacing stats never merges with the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBotStat {
    pub uptime: String,
    pub servers: u64,
    pub commands: u64,
    pub memory_usage: String,
    pub api_latency: i64,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Outcome of an update that must keep command names unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UniqueWrite {
    Written(botdash_types::models::Command),
    /// No command with the requested id
    Missing,
    /// Another command already uses the requested name
    NameTaken,
}
