pub mod models;
pub mod queries;
pub mod seed;

use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::info;

use botdash_types::models::{BotStat, Command, Log};

/// In-memory store for commands, logs and the bot statistics record.
///
/// State lives for the lifetime of the process. Every access goes through a
/// single mutex so id assignment and log ordering stay consistent when
/// handlers run on several worker threads.
pub struct MemStore {
    state: Mutex<StoreState>,
}

#[derive(Debug)]
struct StoreState {
    /// Keyed by id; ids are assigned monotonically so key order is insertion order.
    commands: BTreeMap<u64, Command>,
    logs: Vec<Log>,
    bot_stat: Option<BotStat>,
    next_command_id: u64,
    next_log_id: u64,
}

impl Default for StoreState {
    fn default() -> Self {
        Self {
            commands: BTreeMap::new(),
            logs: Vec::new(),
            bot_stat: None,
            next_command_id: 1,
            next_log_id: 1,
        }
    }
}

impl MemStore {
    /// Empty store: no commands, no logs, no statistics.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Store holding the built-in commands and a zeroed statistics record.
    pub fn seeded() -> Result<Self> {
        let store = Self::new();
        seed::run(&store)?;
        info!("Store seeded with built-in commands");
        Ok(store)
    }

    fn with_state<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&StoreState) -> T,
    {
        let state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("Store lock poisoned: {}", e))?;
        Ok(f(&state))
    }

    fn with_state_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> T,
    {
        let mut state = self
            .state
            .lock()
            .map_err(|e| anyhow::anyhow!("Store lock poisoned: {}", e))?;
        Ok(f(&mut state))
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}
