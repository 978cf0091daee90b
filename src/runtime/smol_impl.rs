//! smol runtime implementation.

use std::future::Future;

use super::Spawner;

/// smol task spawner.
pub struct SmolSpawner;

impl Spawner for SmolSpawner {
    fn spawn_detached<F>(future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // A dropped smol Task is cancelled, so it has to be detached explicitly.
        smol::spawn(future).detach();
    }
}

/// The spawner of the selected runtime.
pub type RuntimeSpawner = SmolSpawner;
