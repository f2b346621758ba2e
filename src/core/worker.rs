//! Worker pool
//!
//! A fixed pool of symmetric threads that pop jobs off the bounded queue
//! and stream-copy file contents in fixed-size chunks. All file I/O runs
//! outside the queue's lock; only the counter updates take it. Each job's
//! handles are owned by the job and close by drop on every exit path.

use crate::core::queue::{CopyJob, JobQueue};
use std::io::{Read, Write};
use std::sync::Arc;
use std::thread;

/// Chunk size for the stream-copy loop.
pub const COPY_CHUNK_SIZE: usize = 64 * 1024;

/// Spawn `count` worker threads over the shared queue.
///
/// Each worker terminates when `dequeue` reports end-of-stream. The
/// returned handles must all be joined before the statistics are read.
pub fn spawn_workers(count: usize, queue: Arc<JobQueue>) -> Vec<thread::JoinHandle<()>> {
    let mut handles = Vec::with_capacity(count);

    for worker_id in 0..count {
        let queue = Arc::clone(&queue);

        let handle = thread::spawn(move || {
            let mut chunk = vec![0u8; COPY_CHUNK_SIZE];

            while let Some(job) = queue.dequeue() {
                copy_job(&queue, job, &mut chunk);
            }

            tracing::debug!("worker {worker_id} shutting down");
        });

        handles.push(handle);
    }

    handles
}

/// Stream-copy one job. Any read or write failure abandons the file,
/// counts one error and leaves the partially written destination in
/// place; a clean end-of-file counts the file as copied.
fn copy_job(queue: &JobQueue, mut job: CopyJob, chunk: &mut [u8]) {
    loop {
        let read = match job.source.read(chunk) {
            Ok(0) => {
                queue.record_file_copied();
                return;
            }
            Ok(n) => n,
            Err(err) => {
                tracing::warn!("read error on '{}': {err}", job.source_path.display());
                queue.record_error();
                return;
            }
        };

        if let Err(err) = job.dest.write_all(&chunk[..read]) {
            tracing::warn!("write error on '{}': {err}", job.dest_path.display());
            queue.record_error();
            return;
        }
        queue.record_bytes(read as u64);
    }
}
