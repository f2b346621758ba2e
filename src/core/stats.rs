//! Run statistics and the end-of-run report
//!
//! The counters are a passive structure mutated through the job queue,
//! under the queue's own mutex. They are only read as a whole after every
//! producer and worker thread has been joined, at which point no further
//! locking is needed.

use std::time::Duration;

/// Shared run counters. All fields are monotonically non-decreasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stats {
    /// Regular files copied to completion
    pub files_copied: u64,
    /// Bytes written to destination files
    pub bytes_copied: u64,
    /// Directories created at the destination, including the root
    pub dirs_created: u64,
    /// Per-item failures (open, create, read, write)
    pub errors: u64,
}

/// Final report for a replication run, produced exactly once after all
/// threads have terminated.
#[derive(Debug, Clone)]
pub struct Report {
    /// Number of worker threads used
    pub workers: usize,
    /// Capacity of the bounded job queue
    pub buffer_size: usize,
    /// Aggregated counters
    pub stats: Stats,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
    /// Whether the run was cut short by an operator interrupt
    pub interrupted: bool,
}

impl Report {
    /// Directories created below the destination root.
    pub fn dirs_excluding_root(&self) -> u64 {
        self.stats.dirs_created.saturating_sub(1)
    }

    /// Whether the run finished without any per-item error.
    pub fn is_clean(&self) -> bool {
        self.stats.errors == 0
    }

    /// Elapsed wall-clock time as `MM:SS.mmm`.
    pub fn format_elapsed(&self) -> String {
        let total_millis = self.elapsed.as_millis();
        let minutes = total_millis / 60_000;
        let seconds = (total_millis / 1_000) % 60;
        let millis = total_millis % 1_000;
        format!("{minutes:02}:{seconds:02}.{millis:03}")
    }

    /// Print the human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Replication Summary ===");
        println!("Workers:       {}", self.workers);
        println!("Buffer size:   {}", self.buffer_size);
        println!("Regular files: {}", self.stats.files_copied);
        println!("Directories:   {}", self.dirs_excluding_root());
        println!(
            "Bytes copied:  {} ({})",
            self.stats.bytes_copied,
            humansize::format_size(self.stats.bytes_copied, humansize::BINARY)
        );
        println!("Errors:        {}", self.stats.errors);
        println!("Elapsed:       {} (min:sec.ms)", self.format_elapsed());

        if self.interrupted {
            println!("\nRun interrupted; totals cover the work completed before the stop.");
        }
    }
}
