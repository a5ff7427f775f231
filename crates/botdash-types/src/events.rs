/// Lifecycle events published by the chat-platform collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayEvent {
    /// The platform session finished its handshake
    Ready { guilds: u64, latency_ms: i64 },

    /// The session dropped or was torn down
    Disconnected { reason: String },

    /// The dashboard asked for the session to be re-established
    RestartRequested,
}
