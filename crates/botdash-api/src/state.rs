use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{error, warn};

use botdash_gateway::ChatClient;
use botdash_store::MemStore;
use botdash_store::models::NewLog;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Arc<MemStore>,
    pub chat: Arc<dyn ChatClient>,
    pub fault_policy: FaultPolicy,
    healthy: AtomicBool,
}

/// What to do after a fault was caught and recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FaultPolicy {
    /// Log it and keep reporting healthy.
    #[default]
    Continue,
    /// Log it and report unhealthy on `/health` from then on.
    Unhealthy,
}

impl FromStr for FaultPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "unhealthy" => Ok(Self::Unhealthy),
            other => Err(anyhow::anyhow!(
                "Unknown fault policy '{}' (expected 'continue' or 'unhealthy')",
                other
            )),
        }
    }
}

impl AppStateInner {
    pub fn new(store: Arc<MemStore>, chat: Arc<dyn ChatClient>, fault_policy: FaultPolicy) -> Self {
        Self {
            store,
            chat,
            fault_policy,
            healthy: AtomicBool::new(true),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Acquire)
    }

    /// Write a caught fault to the event log and apply the fault policy.
    /// Never fails: if the store itself is broken the fault only reaches tracing.
    pub fn record_fault(&self, source: &str, details: &str) {
        error!("Unhandled fault in {}: {}", source, details);

        let entry = NewLog::new("Error", "System", source, details);
        if let Err(e) = self.store.create_log(entry) {
            error!("Failed to record fault in event log: {:#}", e);
        }

        if self.fault_policy == FaultPolicy::Unhealthy && self.healthy.swap(false, Ordering::AcqRel) {
            warn!("Marking service unhealthy after fault in {}", source);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use botdash_gateway::GatewayHandle;

    fn state(policy: FaultPolicy) -> AppStateInner {
        AppStateInner::new(
            Arc::new(MemStore::new()),
            Arc::new(GatewayHandle::new()),
            policy,
        )
    }

    #[test]
    fn parses_fault_policy() {
        assert_eq!("continue".parse::<FaultPolicy>().unwrap(), FaultPolicy::Continue);
        assert_eq!(" Unhealthy ".parse::<FaultPolicy>().unwrap(), FaultPolicy::Unhealthy);
        assert!("crash".parse::<FaultPolicy>().is_err());
    }

    #[test]
    fn fault_is_logged_and_service_stays_healthy() {
        let state = state(FaultPolicy::Continue);
        state.record_fault("gateway", "socket reset");

        let logs = state.store.list_logs(None).unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].event_type, "Error");
        assert_eq!(logs[0].details, "socket reset");
        assert!(state.is_healthy());
    }

    #[test]
    fn unhealthy_policy_flips_health() {
        let state = state(FaultPolicy::Unhealthy);
        assert!(state.is_healthy());
        state.record_fault("handler", "boom");
        assert!(!state.is_healthy());
    }
}
