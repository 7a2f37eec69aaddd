//! Terrain generation on a worker thread.

use std::{
    sync::mpsc::{self, Receiver, TryRecvError},
    thread::{self, JoinHandle},
};

use log::{debug, warn};
use wildlands_core::TileGrid;

use crate::{TerrainError, TerrainGenerator};

type Outcome = Result<TileGrid, TerrainError>;

/// Handle to a grid being generated in the background.
///
/// The grid is published exactly once; the frame loop polls until it arrives.
#[derive(Debug)]
pub struct PendingTerrain {
    receiver: Receiver<Outcome>,
    worker: Option<JoinHandle<()>>,
    delivered: bool,
}

impl PendingTerrain {
    /// Returns the finished grid if the worker has published it.
    ///
    /// Yields `None` while generation is still running and after the grid has
    /// already been handed out.
    pub fn poll(&mut self) -> Option<Outcome> {
        if self.delivered {
            return None;
        }
        let outcome = match self.receiver.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(TerrainError::WorkerDisconnected),
        };
        self.delivered = true;
        self.join_worker();
        Some(outcome)
    }

    /// Blocks until the worker publishes the grid.
    pub fn wait(mut self) -> Outcome {
        if self.delivered {
            return Err(TerrainError::WorkerDisconnected);
        }
        let outcome = self
            .receiver
            .recv()
            .unwrap_or(Err(TerrainError::WorkerDisconnected));
        self.delivered = true;
        self.join_worker();
        outcome
    }

    fn join_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("terrain worker panicked");
            }
        }
    }
}

/// Starts generating a `columns` x `rows` grid from `seed` on a worker thread.
pub fn spawn_generation(
    generator: TerrainGenerator,
    columns: u32,
    rows: u32,
    seed: u64,
) -> Result<PendingTerrain, TerrainError> {
    let (sender, receiver) = mpsc::channel();
    let worker = thread::Builder::new()
        .name("terrain-generation".to_owned())
        .spawn(move || {
            let outcome = generator.generate(columns, rows, seed);
            if sender.send(outcome).is_err() {
                debug!("terrain result dropped: nobody is waiting for seed {seed}");
            }
        })?;

    Ok(PendingTerrain {
        receiver,
        worker: Some(worker),
        delivered: false,
    })
}
