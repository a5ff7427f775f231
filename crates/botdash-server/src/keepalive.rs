use std::time::Duration;

use tracing::{info, warn};

/// Background task that calls the service's own health endpoint.
///
/// Outcomes only go to the log; a failed check never stops the loop.
pub async fn run_keepalive_loop(client: reqwest::Client, url: String, period: Duration) {
    let mut interval = tokio::time::interval(period);
    // First tick completes immediately; the server may not be listening yet.
    interval.tick().await;

    loop {
        interval.tick().await;

        match check(&client, &url).await {
            Ok(status) if status.is_success() => info!("Keep-alive: {} answered {}", url, status),
            Ok(status) => warn!("Keep-alive: {} answered {}", url, status),
            Err(e) => warn!("Keep-alive error: {:#}", e),
        }
    }
}

async fn check(client: &reqwest::Client, url: &str) -> anyhow::Result<reqwest::StatusCode> {
    let response = client.get(url).send().await?;
    Ok(response.status())
}
