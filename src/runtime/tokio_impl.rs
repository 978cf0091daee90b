//! Tokio runtime implementation.

use std::future::Future;

use log::warn;
use tokio::runtime::Handle;

use super::Spawner;

/// Tokio task spawner.
pub struct TokioSpawner;

impl Spawner for TokioSpawner {
    fn spawn_detached<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Dropping the JoinHandle detaches the task.
        match Handle::try_current() {
            Ok(handle) => drop(handle.spawn(future)),
            Err(e) => warn!("dropping task, no tokio runtime is running: {}", e),
        }
    }
}

/// The spawner of the selected runtime.
pub type RuntimeSpawner = TokioSpawner;
