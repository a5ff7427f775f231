mod config;
mod keepalive;
mod sampler;
mod session;
mod supervisor;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use botdash_api::{AppState, AppStateInner};
use botdash_gateway::GatewayHandle;
use botdash_store::MemStore;

use crate::config::Config;
use crate::supervisor::supervise;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "botdash=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    let booted_at = chrono::Utc::now();

    // Shared state
    let store = Arc::new(if config.seed {
        MemStore::seeded()?
    } else {
        MemStore::new()
    });
    let gateway = GatewayHandle::new();
    let state: AppState = Arc::new(AppStateInner::new(
        store.clone(),
        Arc::new(gateway.clone()),
        config.fault_policy,
    ));

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    // Background tasks
    match config.gateway_url.clone() {
        Some(url) => supervise(
            state.clone(),
            "gateway session",
            session::run_session(gateway.clone(), state.clone(), http.clone(), url, config.guild_count),
        ),
        None => warn!("BOTDASH_GATEWAY_URL is not set; the chat client stays offline"),
    }
    supervise(
        state.clone(),
        "stats sampler",
        sampler::run_stats_loop(store, state.chat.clone(), booted_at, config.stats_interval),
    );
    supervise(
        state.clone(),
        "keep-alive",
        keepalive::run_keepalive_loop(
            http,
            format!("{}/health", config.public_url),
            config.keepalive_interval,
        ),
    );

    let app = botdash_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Bot dashboard listening on {}", addr);
    info!("Fault policy: {:?}", config.fault_policy);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
