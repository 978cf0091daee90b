//! async-std runtime implementation.

use std::future::Future;

use super::Spawner;

/// async-std task spawner.
pub struct AsyncStdSpawner;

impl Spawner for AsyncStdSpawner {
    fn spawn_detached<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // async-std keeps running tasks whose JoinHandle is dropped.
        drop(async_std::task::spawn(future));
    }
}

/// The spawner of the selected runtime.
pub type RuntimeSpawner = AsyncStdSpawner;
