//! Bounded job queue
//!
//! A fixed-capacity circular buffer of copy jobs shared between the single
//! traversal producer and the worker pool. One mutex guards the ring, the
//! completion flag and the run statistics; holding a single lock for all of
//! them rules out lock-ordering hazards. Two condition variables provide the
//! blocking `enqueue`/`dequeue` contract: the producer blocks while the ring
//! is full (backpressure) and workers block while it is empty and more jobs
//! may still arrive.

use crate::core::stats::Stats;
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Condvar, Mutex};

/// One unit of work: a single regular file to copy.
///
/// Both handles are opened by the producer; ownership moves through the
/// queue to exactly one worker, which closes them (by drop) on every exit
/// path.
#[derive(Debug)]
pub struct CopyJob {
    /// Source file path, for diagnostics
    pub source_path: PathBuf,
    /// Destination file path, for diagnostics
    pub dest_path: PathBuf,
    /// Open source handle (read)
    pub source: File,
    /// Open destination handle (create/truncate)
    pub dest: File,
}

/// Ring state and statistics, all behind the queue's single mutex.
#[derive(Debug)]
struct QueueInner {
    slots: Vec<Option<CopyJob>>,
    head: usize,
    tail: usize,
    count: usize,
    /// Monotonic: once true, no further jobs will ever be enqueued.
    completed: bool,
    stats: Stats,
}

/// Fixed-capacity FIFO queue with blocking enqueue/dequeue and a
/// monotonic completion flag.
#[derive(Debug)]
pub struct JobQueue {
    inner: Mutex<QueueInner>,
    not_empty: Condvar,
    not_full: Condvar,
    capacity: usize,
}

impl JobQueue {
    /// Create a queue with the given capacity (must be positive, which the
    /// configuration layer guarantees).
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Self {
            inner: Mutex::new(QueueInner {
                slots,
                head: 0,
                tail: 0,
                count: 0,
                completed: false,
                stats: Stats::default(),
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    /// Queue capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of jobs currently buffered.
    pub fn len(&self) -> usize {
        self.lock_inner().count
    }

    /// Whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a job, blocking while the queue is full.
    ///
    /// Only the producer calls this, and it stops calling before it marks
    /// completion, so the wait only ever ends by a worker freeing a slot.
    pub fn enqueue(&self, job: CopyJob) {
        let mut inner = self.lock_inner();
        while inner.count == self.capacity {
            inner = self.wait(&self.not_full, inner);
        }

        let tail = inner.tail;
        inner.slots[tail] = Some(job);
        inner.tail = (tail + 1) % self.capacity;
        inner.count += 1;
        drop(inner);

        self.not_empty.notify_one();
    }

    /// Remove the oldest job, blocking while the queue is empty and not yet
    /// completed. Returns `None` at definitive end-of-stream: the queue is
    /// empty and no job will ever arrive again.
    pub fn dequeue(&self) -> Option<CopyJob> {
        let mut inner = self.lock_inner();
        while inner.count == 0 && !inner.completed {
            inner = self.wait(&self.not_empty, inner);
        }

        if inner.count == 0 {
            return None;
        }

        let head = inner.head;
        let job = inner.slots[head].take();
        debug_assert!(job.is_some(), "occupied slot at head");
        inner.head = (head + 1) % self.capacity;
        inner.count -= 1;
        drop(inner);

        self.not_full.notify_one();
        job
    }

    /// Signal that no further jobs will ever be enqueued.
    ///
    /// Wakes every blocked consumer so all idle workers observe
    /// end-of-stream promptly, not one at a time.
    pub fn mark_completed(&self) {
        let mut inner = self.lock_inner();
        inner.completed = true;
        drop(inner);

        self.not_empty.notify_all();
    }

    /// Whether completion has been signaled.
    pub fn is_completed(&self) -> bool {
        self.lock_inner().completed
    }

    /// Record a directory created at the destination.
    pub fn record_dir_created(&self) {
        self.lock_inner().stats.dirs_created += 1;
    }

    /// Record a file copied to completion.
    pub fn record_file_copied(&self) {
        self.lock_inner().stats.files_copied += 1;
    }

    /// Record bytes written to a destination file.
    pub fn record_bytes(&self, bytes: u64) {
        self.lock_inner().stats.bytes_copied += bytes;
    }

    /// Record a per-item failure.
    pub fn record_error(&self) {
        self.lock_inner().stats.errors += 1;
    }

    /// Snapshot the aggregated statistics.
    ///
    /// Consistent as a final report only once every producer and worker
    /// thread has been joined.
    pub fn stats_snapshot(&self) -> Stats {
        self.lock_inner().stats.clone()
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, QueueInner> {
        // A poisoned mutex means a worker panicked mid-update; the counters
        // are still individually valid, so keep going.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn wait<'a>(
        &self,
        condvar: &Condvar,
        guard: std::sync::MutexGuard<'a, QueueInner>,
    ) -> std::sync::MutexGuard<'a, QueueInner> {
        condvar.wait(guard).unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;
    use tempfile::TempDir;

    fn make_job(dir: &std::path::Path, seq: usize) -> CopyJob {
        let source_path = dir.join(format!("src-{seq}"));
        let dest_path = dir.join(format!("dst-{seq}"));
        let mut source = File::create(&source_path).unwrap();
        source.write_all(b"payload").unwrap();
        CopyJob {
            source: File::open(&source_path).unwrap(),
            dest: File::create(&dest_path).unwrap(),
            source_path,
            dest_path,
        }
    }

    fn job_seq(job: &CopyJob) -> usize {
        job.source_path
            .file_name()
            .unwrap()
            .to_str()
            .unwrap()
            .trim_start_matches("src-")
            .parse()
            .unwrap()
    }

    #[test]
    fn test_fifo_order_single_consumer() {
        let dir = TempDir::new().unwrap();
        let queue = JobQueue::new(4);

        for seq in 0..4 {
            queue.enqueue(make_job(dir.path(), seq));
        }
        queue.mark_completed();

        for expected in 0..4 {
            let job = queue.dequeue().unwrap();
            assert_eq!(job_seq(&job), expected);
        }
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_dequeue_returns_none_only_when_drained() {
        let dir = TempDir::new().unwrap();
        let queue = JobQueue::new(2);

        queue.enqueue(make_job(dir.path(), 0));
        queue.mark_completed();

        // Completion does not discard the buffered job.
        assert!(queue.dequeue().is_some());
        assert!(queue.dequeue().is_none());
        assert!(queue.dequeue().is_none());
    }

    #[test]
    fn test_enqueue_blocks_at_capacity() {
        let dir = TempDir::new().unwrap();
        let queue = Arc::new(JobQueue::new(1));
        queue.enqueue(make_job(dir.path(), 0));

        let producer = {
            let queue = Arc::clone(&queue);
            let job = make_job(dir.path(), 1);
            thread::spawn(move || queue.enqueue(job))
        };

        // The producer must still be blocked: the single slot is occupied.
        thread::sleep(Duration::from_millis(50));
        assert_eq!(queue.len(), 1);

        assert!(queue.dequeue().is_some());
        producer.join().unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_mark_completed_wakes_all_idle_consumers() {
        let queue = Arc::new(JobQueue::new(4));

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.dequeue().is_none())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.mark_completed();

        for consumer in consumers {
            assert!(consumer.join().unwrap());
        }
    }

    #[test]
    fn test_stats_accumulate_under_queue_lock() {
        let queue = JobQueue::new(1);
        queue.record_dir_created();
        queue.record_file_copied();
        queue.record_bytes(128);
        queue.record_bytes(64);
        queue.record_error();

        let stats = queue.stats_snapshot();
        assert_eq!(stats.dirs_created, 1);
        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.bytes_copied, 192);
        assert_eq!(stats.errors, 1);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        /// Under randomized interleavings the queue never exceeds its
        /// capacity, and every job is delivered exactly once.
        #[test]
        fn prop_occupancy_bounded_and_no_job_lost(
            capacity in 1usize..6,
            jobs in 1usize..24,
            workers in 1usize..5,
        ) {
            let dir = TempDir::new().unwrap();
            let queue = Arc::new(JobQueue::new(capacity));
            let delivered = Arc::new(AtomicUsize::new(0));

            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    let queue = Arc::clone(&queue);
                    let delivered = Arc::clone(&delivered);
                    thread::spawn(move || {
                        while queue.dequeue().is_some() {
                            prop_assert!(queue.len() <= queue.capacity());
                            delivered.fetch_add(1, Ordering::SeqCst);
                        }
                        Ok(())
                    })
                })
                .collect();

            for seq in 0..jobs {
                queue.enqueue(make_job(dir.path(), seq));
                prop_assert!(queue.len() <= capacity);
            }
            queue.mark_completed();

            for handle in handles {
                handle.join().unwrap()?;
            }
            prop_assert_eq!(delivered.load(Ordering::SeqCst), jobs);
        }
    }
}
