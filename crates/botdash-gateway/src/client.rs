/// What the dashboard needs from the chat-platform client.
///
/// The API layer only ever reads liveness and a couple of metrics through this
/// trait; commands, logs and stats live in the store.
pub trait ChatClient: Send + Sync {
    /// True once the platform session has completed its handshake.
    fn is_ready(&self) -> bool;

    /// True once the session has been ready at least once, even if it has
    /// since disconnected.
    fn has_initialized(&self) -> bool;

    /// Number of guilds (servers) the bot is a member of.
    fn guild_count(&self) -> u64;

    /// Last measured round trip to the platform, in milliseconds.
    fn latency_ms(&self) -> i64;

    /// Ask the running session to tear down and reconnect.
    fn request_restart(&self) -> anyhow::Result<()>;
}
