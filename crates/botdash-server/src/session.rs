use std::time::{Duration, Instant};

use anyhow::Result;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

use botdash_api::AppState;
use botdash_gateway::GatewayHandle;
use botdash_types::events::GatewayEvent;

const HEARTBEAT: Duration = Duration::from_secs(30);
const RETRY_DELAY: Duration = Duration::from_secs(15);

/// Drives the [`GatewayHandle`] from a reachable platform endpoint.
///
/// Each successful probe of `url` counts as a handshake and its round trip as
/// the latency. A restart request tears the session down and reconnects.
/// The first failure of an outage is written to the event log; retries that
/// keep failing only reach tracing.
pub async fn run_session(
    gateway: GatewayHandle,
    state: AppState,
    client: reqwest::Client,
    url: String,
    guilds: u64,
) {
    let mut events = gateway.subscribe();
    let mut outage = Outage::default();

    loop {
        match probe(&client, &url).await {
            Ok(latency) => {
                outage.recover();
                gateway.mark_ready(guilds, latency);
            }
            Err(e) => {
                gateway.mark_disconnected("handshake failed");
                outage.fail(&state, &format!("Handshake with {} failed: {:#}", url, e));
                tokio::time::sleep(RETRY_DELAY).await;
                continue;
            }
        }

        let mut heartbeat = tokio::time::interval(HEARTBEAT);
        heartbeat.tick().await;

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Ok(GatewayEvent::RestartRequested) => {
                        info!("Restarting gateway session");
                        gateway.mark_disconnected("restart requested");
                        break;
                    }
                    Ok(_) | Err(RecvError::Lagged(_)) => {}
                    Err(RecvError::Closed) => return,
                },
                _ = heartbeat.tick() => match probe(&client, &url).await {
                    Ok(latency) => gateway.record_latency(latency),
                    Err(e) => {
                        gateway.mark_disconnected("heartbeat failed");
                        outage.fail(&state, &format!("Heartbeat to {} failed: {:#}", url, e));
                        break;
                    }
                },
            }
        }
    }
}

/// Tracks whether the session is already known to be down.
#[derive(Debug, Default)]
struct Outage {
    active: bool,
}

impl Outage {
    fn fail(&mut self, state: &AppState, details: &str) {
        if self.active {
            warn!("Gateway still unreachable: {}", details);
        } else {
            self.active = true;
            state.record_fault("gateway session", details);
        }
    }

    fn recover(&mut self) {
        if self.active {
            info!("Gateway reachable again");
        }
        self.active = false;
    }
}

/// Round trip to the gateway endpoint, in milliseconds.
async fn probe(client: &reqwest::Client, url: &str) -> Result<i64> {
    let start = Instant::now();
    client.get(url).send().await?.error_for_status()?;
    Ok(start.elapsed().as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use botdash_api::{AppStateInner, FaultPolicy};
    use botdash_store::MemStore;

    fn state(policy: FaultPolicy) -> AppState {
        Arc::new(AppStateInner::new(
            Arc::new(MemStore::new()),
            Arc::new(GatewayHandle::new()),
            policy,
        ))
    }

    fn error_count(state: &AppState) -> usize {
        state
            .store
            .list_logs(None)
            .unwrap()
            .iter()
            .filter(|l| l.event_type == "Error")
            .count()
    }

    #[test]
    fn repeated_failures_log_once_per_outage() {
        let state = state(FaultPolicy::Continue);
        let mut outage = Outage::default();

        for _ in 0..5 {
            outage.fail(&state, "connection refused");
        }
        assert_eq!(error_count(&state), 1);

        outage.recover();
        outage.fail(&state, "connection refused");
        assert_eq!(error_count(&state), 2);
    }

    #[test]
    fn recovery_without_outage_logs_nothing() {
        let state = state(FaultPolicy::Unhealthy);
        let mut outage = Outage::default();
        outage.recover();
        assert_eq!(error_count(&state), 0);
        assert!(state.is_healthy());
    }
}
