//! # Dispatcher
//!
//! Runs each inbound update as its own tokio task so the transport that
//! delivered it can be answered right away.
//!
//! * In-flight runs are bounded by a semaphore. The permit is taken inside the
//!   task, so [`Dispatcher::dispatch`] itself never waits.
//! * Each task is an error boundary: a returned error or a panic is logged and
//!   goes no further.
//! * Tasks are tracked so shutdown can wait for in-flight runs.

use std::{future::Future, panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio_util::task::TaskTracker;

use crate::types::Update;

pub trait UpdateHandler {
    fn handle_update(&self, update: Update) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl<T: UpdateHandler + Send + Sync> UpdateHandler for Arc<T> {
    async fn handle_update(&self, update: Update) -> anyhow::Result<()> {
        (**self).handle_update(update).await
    }
}

#[derive(Debug)]
pub struct Dispatcher<H> {
    handler: Arc<H>,
    permits: Arc<Semaphore>,
    tracker: TaskTracker,
}

impl<H> Clone for Dispatcher<H> {
    fn clone(&self) -> Self {
        Self {
            handler: self.handler.clone(),
            permits: self.permits.clone(),
            tracker: self.tracker.clone(),
        }
    }
}

impl<H> Dispatcher<H>
where
    H: UpdateHandler + Send + Sync + 'static,
{
    pub const DEFAULT_MAX_CONCURRENT_RUNS: usize = 8;

    pub fn new(handler: H, max_concurrent_runs: usize) -> Self {
        Self {
            handler: Arc::new(handler),
            permits: Arc::new(Semaphore::new(max_concurrent_runs.max(1))),
            tracker: TaskTracker::new(),
        }
    }

    /// Schedules `update` and returns immediately
    pub fn dispatch(&self, update: Update) {
        let handler = self.handler.clone();
        let permits = self.permits.clone();
        let update_id = update.update_id;

        self.tracker.spawn(async move {
            let Ok(_permit) = permits.acquire_owned().await else {
                tracing::warn!(update_id, "Dispatcher closed, dropping update");
                return;
            };

            let run = AssertUnwindSafe(handler.handle_update(update)).catch_unwind();
            match run.await {
                Ok(Ok(())) => tracing::debug!(update_id, "Update handled"),
                Ok(Err(e)) => tracing::error!(error = ?e, update_id, "Update handling failed"),
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_default();
                    tracing::error!(update_id, %reason, "Update handler panicked");
                }
            }
        });
    }

    /// Number of runs currently scheduled or executing
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits for every dispatched run to finish
    pub async fn shutdown(&self) {
        self.tracker.close();
        tracing::info!(in_flight = self.tracker.len(), "Waiting for in-flight runs");
        self.tracker.wait().await;
    }
}
