use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fixed id of the single `BotStat` record.
pub const BOT_STAT_ID: u32 = 1;

/// A user-invocable slash command as shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub usage: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// An immutable event log entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: u64,
    pub event_type: String,
    pub server: String,
    pub user: String,
    pub details: String,
    pub timestamp: DateTime<Utc>,
}

/// Snapshot of the bot's operational metrics. Only one exists at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotStat {
    pub id: u32,
    pub uptime: String,
    pub servers: u64,
    pub commands: u64,
    pub memory_usage: String,
    /// Milliseconds.
    pub api_latency: i64,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
