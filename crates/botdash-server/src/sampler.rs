use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use botdash_gateway::ChatClient;
use botdash_store::MemStore;
use botdash_store::models::NewBotStat;
use botdash_types::models::BotStat;

/// Background task that refreshes the statistics record on an interval.
pub async fn run_stats_loop(
    store: Arc<MemStore>,
    chat: Arc<dyn ChatClient>,
    booted_at: DateTime<Utc>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);

    loop {
        interval.tick().await;

        match sample(&store, chat.as_ref(), booted_at) {
            Ok(stat) => debug!("Stats refreshed: uptime {}, {}", stat.uptime, stat.memory_usage),
            Err(e) => warn!("Stats refresh error: {:#}", e),
        }
    }
}

/// Replace the statistics record with a fresh snapshot. `startedAt` carries over
/// from the previous record when there is one.
pub fn sample(store: &MemStore, chat: &dyn ChatClient, booted_at: DateTime<Utc>) -> Result<BotStat> {
    let now = Utc::now();
    let started_at = store
        .get_bot_stats()?
        .map_or(booted_at, |stat| stat.started_at);
    let uptime = (now - started_at).to_std().unwrap_or_default();

    store.replace_bot_stats(NewBotStat {
        uptime: format_uptime(uptime),
        servers: chat.guild_count(),
        commands: store.count_commands()? as u64,
        memory_usage: memory_usage(),
        api_latency: chat.latency_ms(),
        started_at,
        updated_at: now,
    })
}

/// `"1d 2h 3m 4s"`, leading zero units omitted.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (days, hours, minutes, seconds) = (
        secs / 86_400,
        (secs % 86_400) / 3_600,
        (secs % 3_600) / 60,
        secs % 60,
    );

    let mut parts = Vec::with_capacity(4);
    if days > 0 {
        parts.push(format!("{}d", days));
    }
    if days > 0 || hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if days > 0 || hours > 0 || minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", seconds));
    parts.join(" ")
}

/// Resident set size of this process, or "0 MB" where it cannot be read.
fn memory_usage() -> String {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| parse_vm_rss_kb(&status))
        .map_or_else(|| "0 MB".to_string(), |kb| format!("{:.2} MB", kb as f64 / 1024.0))
}

fn parse_vm_rss_kb(status: &str) -> Option<u64> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("VmRSS:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}
