//! Dashboard-side dry run of a slash command.
//!
//! Resolves the command against the store and renders the canned reply the bot
//! would give, without touching the chat platform. Every attempt is logged.

use anyhow::Result;
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rand::Rng;
use serde_json::Value;
use tracing::debug;

use botdash_store::MemStore;
use botdash_store::models::NewLog;
use botdash_types::api::TestCommandResponse;
use botdash_types::models::BotStat;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validation::Payload;

/// Simulated ping latency range, in milliseconds.
const PING_RANGE_MS: std::ops::Range<u32> = 20..70;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Simulation {
    Replied(String),
    Unknown(String),
}

/// Bare command token: surrounding whitespace trimmed, leading `/` dropped,
/// cut at the first space.
pub fn command_token(text: &str) -> &str {
    let text = text.trim();
    let text = text.strip_prefix('/').unwrap_or(text);
    text.split(' ').next().unwrap_or_default()
}

/// Resolve `text` and render a reply, then append a "Test" log entry.
pub fn simulate(store: &MemStore, text: &str) -> Result<Simulation> {
    let token = command_token(text);

    let outcome = match store.get_command_by_name(token)? {
        None => Simulation::Unknown(token.to_string()),
        Some(_) => Simulation::Replied(render(store, token, text)?),
    };

    store.create_log(NewLog::new(
        "Test",
        "Dashboard",
        "Dashboard user",
        format!("Test command executed: {}", text),
    ))?;
    debug!("Simulated '{}': {:?}", text, outcome);

    Ok(outcome)
}

fn render(store: &MemStore, token: &str, text: &str) -> Result<String> {
    let reply = match token {
        "ping" => {
            let latency = rand::rng().random_range(PING_RANGE_MS);
            format!("Pong! Latency: {}ms", latency)
        }
        "help" => store
            .list_commands()?
            .into_iter()
            .filter(|c| c.active)
            .map(|c| format!("/{} - {}", c.name, c.description))
            .collect::<Vec<_>>()
            .join("\n"),
        "uptime" => {
            let stat = store.get_bot_stats()?;
            format!("Bot uptime: {}", uptime_of(stat.as_ref()))
        }
        "stats" => {
            let stat = store.get_bot_stats()?;
            format!(
                "Servers: {}\nCommands: {}\nMemory usage: {}\nUptime: {}",
                stat.as_ref().map_or(0, |s| s.servers),
                stat.as_ref().map_or(0, |s| s.commands),
                stat.as_ref().map_or("0 MB", |s| s.memory_usage.as_str()),
                uptime_of(stat.as_ref()),
            )
        }
        _ => format!("Executed command: {}", text),
    };
    Ok(reply)
}

fn uptime_of(stat: Option<&BotStat>) -> &str {
    stat.map_or("unknown", |s| s.uptime.as_str())
}

/// POST /api/test-command
pub async fn test_command(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> ApiResult<Response> {
    let text = match payload.get("command") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return Err(ApiError::invalid("Command is required")),
    };

    let response = match simulate(&state.store, &text)? {
        Simulation::Replied(response) => (
            StatusCode::OK,
            Json(TestCommandResponse {
                message: "Command executed successfully".to_string(),
                response,
            }),
        )
            .into_response(),
        Simulation::Unknown(token) => (
            StatusCode::NOT_FOUND,
            Json(TestCommandResponse {
                message: format!("Command '{}' not found", token),
                response: format!("Unknown command: {}", token),
            }),
        )
            .into_response(),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use botdash_store::models::{CommandPatch, NewBotStat};
    use chrono::Utc;

    fn reply(outcome: Simulation) -> String {
        match outcome {
            Simulation::Replied(r) => r,
            other => panic!("expected a reply, got {:?}", other),
        }
    }

    #[test]
    fn token_strips_slash_and_arguments() {
        assert_eq!(command_token("/ping"), "ping");
        assert_eq!(command_token("ping"), "ping");
        assert_eq!(command_token("/echo hello world"), "echo");
        assert_eq!(command_token("/"), "");
        assert_eq!(command_token("  /uptime now "), "uptime");
    }

    #[test]
    fn ping_latency_in_range() {
        let store = MemStore::seeded().unwrap();
        for _ in 0..20 {
            let r = reply(simulate(&store, "/ping").unwrap());
            let ms: u32 = r
                .strip_prefix("Pong! Latency: ")
                .and_then(|rest| rest.strip_suffix("ms"))
                .unwrap()
                .parse()
                .unwrap();
            assert!(PING_RANGE_MS.contains(&ms));
        }
    }

    #[test]
    fn help_lists_only_active_commands() {
        let store = MemStore::seeded().unwrap();
        let uptime = store.get_command_by_name("uptime").unwrap().unwrap();
        store
            .update_command(
                uptime.id,
                CommandPatch {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let r = reply(simulate(&store, "/help").unwrap());
        assert_eq!(
            r,
            "/ping - Check the bot's response time\n\
             /help - List all available commands\n\
             /stats - Show bot statistics"
        );
    }

    #[test]
    fn stats_fall_back_to_placeholders() {
        let store = MemStore::new();
        store
            .create_command(botdash_store::models::NewCommand {
                name: "stats".into(),
                description: "d".into(),
                usage: "/stats".into(),
                active: true,
            })
            .unwrap();

        let r = reply(simulate(&store, "/stats").unwrap());
        assert_eq!(r, "Servers: 0\nCommands: 0\nMemory usage: 0 MB\nUptime: unknown");
    }

    #[test]
    fn uptime_reads_stats() {
        let store = MemStore::seeded().unwrap();
        let now = Utc::now();
        store
            .replace_bot_stats(NewBotStat {
                uptime: "1h 2m 3s".into(),
                servers: 3,
                commands: 4,
                memory_usage: "20.00 MB".into(),
                api_latency: 40,
                started_at: now,
                updated_at: now,
            })
            .unwrap();

        let r = reply(simulate(&store, "/uptime").unwrap());
        assert_eq!(r, "Bot uptime: 1h 2m 3s");
    }

    #[test]
    fn unhandled_command_echoes_text() {
        let store = MemStore::new();
        store
            .create_command(botdash_store::models::NewCommand {
                name: "echo".into(),
                description: "d".into(),
                usage: "/echo".into(),
                active: true,
            })
            .unwrap();

        let r = reply(simulate(&store, "/echo hi there").unwrap());
        assert_eq!(r, "Executed command: /echo hi there");

        let r = reply(simulate(&store, "  /echo padded ").unwrap());
        assert_eq!(r, "Executed command:   /echo padded ");
        let logs = store.list_logs(Some(1)).unwrap();
        assert_eq!(logs[0].details, "Test command executed:   /echo padded ");
    }

    #[test]
    fn every_attempt_is_logged() {
        let store = MemStore::seeded().unwrap();
        simulate(&store, "/ping").unwrap();
        let outcome = simulate(&store, "/nonexistent").unwrap();
        assert_eq!(outcome, Simulation::Unknown("nonexistent".into()));

        let logs = store.list_logs(None).unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.event_type == "Test"));
        assert_eq!(logs[0].details, "Test command executed: /nonexistent");
    }
}
