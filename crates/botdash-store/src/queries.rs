use anyhow::Result;
use chrono::Utc;

use botdash_types::models::{BOT_STAT_ID, BotStat, Command, Log};

use crate::{MemStore, StoreState};
use crate::models::{CommandPatch, NewBotStat, NewCommand, NewLog, UniqueWrite};

impl MemStore {
    // -- Commands --

    /// All commands in insertion order.
    pub fn list_commands(&self) -> Result<Vec<Command>> {
        self.with_state(|s| s.commands.values().cloned().collect())
    }

    pub fn get_command(&self, id: u64) -> Result<Option<Command>> {
        self.with_state(|s| s.commands.get(&id).cloned())
    }

    /// First command whose name equals `name` exactly.
    pub fn get_command_by_name(&self, name: &str) -> Result<Option<Command>> {
        self.with_state(|s| s.commands.values().find(|c| c.name == name).cloned())
    }

    pub fn count_commands(&self) -> Result<usize> {
        self.with_state(|s| s.commands.len())
    }

    /// Inserts a command under the next id. Ids are never reused, even after deletes.
    pub fn create_command(&self, new: NewCommand) -> Result<Command> {
        self.with_state_mut(|s| insert_command(s, new))
    }

    /// Merges the supplied fields onto an existing command.
    /// Returns `None` when no command has this id.
    pub fn update_command(&self, id: u64, patch: CommandPatch) -> Result<Option<Command>> {
        self.with_state_mut(|s| apply_patch(s.commands.get_mut(&id), patch))
    }

    /// Like [`MemStore::create_command`], but refuses a name already in use.
    /// The check and the insert happen under the same lock; `None` means the name is taken.
    pub fn create_command_unique(&self, new: NewCommand) -> Result<Option<Command>> {
        self.with_state_mut(|s| {
            if s.commands.values().any(|c| c.name == new.name) {
                return None;
            }
            Some(insert_command(s, new))
        })
    }

    /// Like [`MemStore::update_command`], but refuses renaming onto another command's name.
    pub fn update_command_unique(&self, id: u64, patch: CommandPatch) -> Result<UniqueWrite> {
        self.with_state_mut(|s| {
            if !s.commands.contains_key(&id) {
                return UniqueWrite::Missing;
            }
            if let Some(name) = &patch.name {
                if s.commands.values().any(|c| c.id != id && &c.name == name) {
                    return UniqueWrite::NameTaken;
                }
            }
            match apply_patch(s.commands.get_mut(&id), patch) {
                Some(command) => UniqueWrite::Written(command),
                None => UniqueWrite::Missing,
            }
        })
    }

    /// Returns true if a command existed and was removed.
    pub fn delete_command(&self, id: u64) -> Result<bool> {
        self.with_state_mut(|s| s.commands.remove(&id).is_some())
    }

    // -- Logs --

    /// Logs newest first, truncated to `limit` entries after sorting.
    pub fn list_logs(&self, limit: Option<usize>) -> Result<Vec<Log>> {
        self.with_state(|s| {
            let mut logs = s.logs.clone();
            // Equal timestamps fall back to id so the most recent insert still wins.
            logs.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            if let Some(limit) = limit {
                logs.truncate(limit);
            }
            logs
        })
    }

    pub fn create_log(&self, new: NewLog) -> Result<Log> {
        self.with_state_mut(|s| {
            let id = s.next_log_id;
            s.next_log_id += 1;

            let log = Log {
                id,
                event_type: new.event_type,
                server: new.server,
                user: new.user,
                details: new.details,
                timestamp: Utc::now(),
            };
            s.logs.push(log.clone());
            log
        })
    }

    // -- Stats --

    pub fn get_bot_stats(&self) -> Result<Option<BotStat>> {
        self.with_state(|s| s.bot_stat.clone())
    }

    /// Overwrites the statistics record entirely.
    pub fn replace_bot_stats(&self, new: NewBotStat) -> Result<BotStat> {
        self.with_state_mut(|s| {
            let stat = BotStat {
                id: BOT_STAT_ID,
                uptime: new.uptime,
                servers: new.servers,
                commands: new.commands,
                memory_usage: new.memory_usage,
                api_latency: new.api_latency,
                started_at: new.started_at,
                updated_at: new.updated_at,
            };
            s.bot_stat = Some(stat.clone());
            stat
        })
    }
}

fn insert_command(state: &mut StoreState, new: NewCommand) -> Command {
    let id = state.next_command_id;
    state.next_command_id += 1;

    let command = Command {
        id,
        name: new.name,
        description: new.description,
        usage: new.usage,
        active: new.active,
        created_at: Utc::now(),
    };
    state.commands.insert(id, command.clone());
    command
}

fn apply_patch(command: Option<&mut Command>, patch: CommandPatch) -> Option<Command> {
    let command = command?;
    if let Some(name) = patch.name {
        command.name = name;
    }
    if let Some(description) = patch.description {
        command.description = description;
    }
    if let Some(usage) = patch.usage {
        command.usage = usage;
    }
    if let Some(active) = patch.active {
        command.active = active;
    }
    Some(command.clone())
}
