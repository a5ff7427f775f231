use std::future::Future;

use tracing::info;

use botdash_api::AppState;
use botdash_api::middleware::panic_message;

/// Spawn a background task whose panic is recorded as a fault instead of
/// silently ending the task.
pub fn supervise<F>(state: AppState, name: &'static str, task: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = tokio::spawn(task);
    tokio::spawn(async move {
        match handle.await {
            Ok(()) => info!("Task '{}' finished", name),
            Err(e) if e.is_panic() => {
                let payload = e.into_panic();
                state.record_fault(name, &panic_message(payload.as_ref()));
            }
            Err(e) => info!("Task '{}' cancelled: {}", name, e),
        }
    });
}
