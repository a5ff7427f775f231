pub mod commands;
pub mod error;
pub mod logs;
pub mod middleware;
pub mod simulator;
pub mod state;
pub mod stats;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};

pub use state::{AppState, AppStateInner, FaultPolicy};

/// All dashboard routes, wrapped in the fault-recording boundary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(stats::get_status))
        .route("/api/stats", get(stats::get_stats).put(stats::replace_stats))
        .route(
            "/api/commands",
            get(commands::list_commands).post(commands::create_command),
        )
        .route(
            "/api/commands/{id}",
            get(commands::get_command)
                .patch(commands::update_command)
                .delete(commands::delete_command),
        )
        .route("/api/logs", get(logs::list_logs).post(logs::create_log))
        .route("/api/test-command", post(simulator::test_command))
        .route("/api/restart", post(stats::restart))
        .route("/health", get(stats::health))
        .layer(middleware::fault_boundary(state.clone()))
        .with_state(state)
}
