use std::future::Future;

use tokio::task::JoinHandle;
use tracing::Instrument;

/// Runs `future` on the Tokio runtime inside a span carrying the task name.
///
/// The output comes back through the returned handle; a panic in the task
/// surfaces as a `JoinError` when it is awaited.
pub fn spawn_named_task<F>(name: &'static str, future: F) -> JoinHandle<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    let span = tracing::info_span!("background_task", task = name);
    tokio::spawn(future.instrument(span))
}
