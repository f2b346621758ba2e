//! Traversal producer
//!
//! A single thread walks the source tree in depth-first pre-order,
//! mirrors every directory at the destination, opens the handle pair for
//! every regular file and enqueues one job per file. Because one thread
//! issues the directory creation and the enqueue serially, a job's
//! destination directory always exists before any worker can observe the
//! job.
//!
//! Failure policy: the engine has already verified the source root, so
//! every failure seen here is per-item. A directory that cannot be
//! mirrored causes its whole subtree to be skipped; a file that cannot be
//! opened is skipped. Both are logged and counted, and the walk continues.

use crate::config::Config;
use crate::core::queue::{CopyJob, JobQueue};
use crate::core::shutdown::ShutdownController;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// The single traversal producer.
#[derive(Debug)]
pub struct Producer {
    config: Arc<Config>,
    queue: Arc<JobQueue>,
    shutdown: Arc<ShutdownController>,
}

impl Producer {
    /// Create a producer over the shared queue and shutdown controller.
    pub fn new(
        config: Arc<Config>,
        queue: Arc<JobQueue>,
        shutdown: Arc<ShutdownController>,
    ) -> Self {
        Self {
            config,
            queue,
            shutdown,
        }
    }

    /// Walk the source tree and enqueue one job per regular file.
    ///
    /// Always ends by transitioning the run to draining and marking the
    /// queue completed, exactly once, whether the walk finished or was
    /// aborted by a stop request.
    pub fn run(&self) {
        let mut walker = WalkDir::new(&self.config.source)
            .follow_links(false)
            .into_iter();

        while let Some(entry) = walker.next() {
            if self.shutdown.stop_requested() {
                tracing::debug!("producer observed stop request, aborting traversal");
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("traversal error: {err}");
                    self.queue.record_error();
                    continue;
                }
            };

            let rel = entry
                .path()
                .strip_prefix(&self.config.source)
                .unwrap_or_else(|_| entry.path());
            let dest_path = self.config.dest.join(rel);
            let file_type = entry.file_type();

            if file_type.is_dir() {
                if !self.mirror_directory(&dest_path) {
                    walker.skip_current_dir();
                }
            } else if file_type.is_file() {
                match self.open_pair(entry.path(), &dest_path) {
                    Ok(job) => self.queue.enqueue(job),
                    Err(err) => {
                        tracing::warn!("skipping '{}': {err}", entry.path().display());
                        self.queue.record_error();
                    }
                }
            }
            // Symlinks, sockets, devices: skipped without error.
        }

        self.shutdown.begin_draining();
        self.queue.mark_completed();
    }

    /// Create one destination directory. Returns false when the subtree
    /// below it must be skipped.
    fn mirror_directory(&self, dest_path: &Path) -> bool {
        match fs::create_dir(dest_path) {
            Ok(()) => {
                self.queue.record_dir_created();
                true
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                self.queue.record_dir_created();
                true
            }
            Err(err) => {
                tracing::warn!("cannot create '{}': {err}, skipping subtree", dest_path.display());
                self.queue.record_error();
                false
            }
        }
    }

    /// Open the source handle for reading and the destination handle with
    /// create/truncate semantics.
    fn open_pair(&self, source_path: &Path, dest_path: &Path) -> io::Result<CopyJob> {
        let source = File::open(source_path)?;
        let dest = File::create(dest_path)?;
        Ok(CopyJob {
            source_path: source_path.to_path_buf(),
            dest_path: dest_path.to_path_buf(),
            source,
            dest,
        })
    }
}
