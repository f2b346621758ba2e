//! Replication engine
//!
//! Owns the run: validates the source root before any concurrent work
//! begins, wires the producer, worker pool and shutdown controller to the
//! shared queue, and joins every thread exactly once before the final
//! statistics are read. There is no ambient global state; everything the
//! threads share travels through explicit `Arc`s.

use crate::config::Config;
use crate::core::producer::Producer;
use crate::core::queue::JobQueue;
use crate::core::shutdown::ShutdownController;
use crate::core::stats::Report;
use crate::core::worker::spawn_workers;
use crate::error::{MirrorError, Result};
use std::fs;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Orchestrates one directory-tree replication run.
#[derive(Debug)]
pub struct MirrorEngine {
    config: Config,
    shutdown: Arc<ShutdownController>,
}

impl MirrorEngine {
    /// Create an engine for the given configuration.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            shutdown: Arc::new(ShutdownController::new()),
        }
    }

    /// The shutdown controller, for wiring up an interrupt handler or
    /// requesting an early stop from another thread.
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Execute the replication run.
    ///
    /// Returns the final report after every spawned thread has been
    /// joined. The only fatal failure past this point is an unreadable
    /// source root, detected here before any thread or queue exists.
    pub fn execute(&self) -> Result<Report> {
        let start = Instant::now();

        let _ = fs::read_dir(&self.config.source).map_err(|source| {
            MirrorError::SourceRootUnreadable {
                path: self.config.source.clone(),
                source,
            }
        })?;

        let queue = Arc::new(JobQueue::new(self.config.buffer_size));
        let config = Arc::new(self.config.clone());

        let producer = Producer::new(
            Arc::clone(&config),
            Arc::clone(&queue),
            Arc::clone(&self.shutdown),
        );
        let producer_handle = thread::spawn(move || producer.run());
        let worker_handles = spawn_workers(self.config.workers, Arc::clone(&queue));

        // Join in normal thread context, producer first. The producer marks
        // the queue completed on every exit path, so the workers drain what
        // is buffered and terminate.
        if producer_handle.join().is_err() {
            tracing::error!("producer thread panicked");
            self.shutdown.begin_draining();
            queue.mark_completed();
        }
        for handle in worker_handles {
            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }
        self.shutdown.mark_stopped();

        Ok(Report {
            workers: self.config.workers,
            buffer_size: self.config.buffer_size,
            stats: queue.stats_snapshot(),
            elapsed: start.elapsed(),
            interrupted: self.shutdown.stop_requested(),
        })
    }
}
