use anyhow::Result;
use chrono::Utc;

use crate::MemStore;
use crate::models::{NewBotStat, NewCommand};

/// Commands the simulator knows how to answer.
const BUILTIN_COMMANDS: &[(&str, &str, &str)] = &[
    ("ping", "Check the bot's response time", "/ping"),
    ("help", "List all available commands", "/help"),
    ("uptime", "Show how long the bot has been online", "/uptime"),
    ("stats", "Show bot statistics", "/stats"),
];

/// Inserts the built-in commands and a zeroed statistics record.
pub fn run(store: &MemStore) -> Result<()> {
    for (name, description, usage) in BUILTIN_COMMANDS {
        store.create_command(NewCommand {
            name: name.to_string(),
            description: description.to_string(),
            usage: usage.to_string(),
            active: true,
        })?;
    }

    let now = Utc::now();
    store.replace_bot_stats(NewBotStat {
        uptime: "0s".to_string(),
        servers: 0,
        commands: 0,
        memory_usage: "0 MB".to_string(),
        api_latency: 0,
        started_at: now,
        updated_at: now,
    })?;

    Ok(())
}
