//! # MirrorCP - Concurrent Directory-Tree Replication
//!
//! MirrorCP mirrors a directory tree using a single traversal producer, a
//! bounded job queue and a fixed pool of copy workers. The producer walks
//! the source tree depth-first, recreates its directory structure at the
//! destination and enqueues one job per regular file; workers stream-copy
//! file contents while shared counters track progress. The queue's fixed
//! capacity bounds memory and open-handle usage regardless of tree size.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mirrorcp::config::Config;
//! use mirrorcp::core::MirrorEngine;
//! use std::path::PathBuf;
//!
//! let config = Config {
//!     buffer_size: 16,
//!     workers: 4,
//!     source: PathBuf::from("/source"),
//!     dest: PathBuf::from("/destination"),
//! };
//!
//! let report = MirrorEngine::new(config).execute().unwrap();
//! report.print_summary();
//! ```
//!
//! ## Interruption
//!
//! A run can be stopped cooperatively at any point: the shutdown
//! controller's flag is observed by the producer at its next loop check,
//! buffered jobs drain, and every thread is joined before the report is
//! produced.
//!
//! ```no_run
//! use mirrorcp::config::Config;
//! use mirrorcp::core::MirrorEngine;
//! # use std::path::PathBuf;
//! # let config = Config { buffer_size: 16, workers: 4,
//! #     source: PathBuf::from("/s"), dest: PathBuf::from("/d") };
//!
//! let engine = MirrorEngine::new(config);
//! engine.shutdown_controller().install_interrupt_handler().unwrap();
//! let report = engine.execute().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod core;
pub mod error;

// Re-export commonly used types
pub use crate::config::{CliArgs, Config};
pub use crate::core::{MirrorEngine, Report, Stats};
pub use crate::error::{MirrorError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude module for convenient imports
pub mod prelude {
    //! Convenient re-exports for common usage
    //!
    //! ```no_run
    //! use mirrorcp::prelude::*;
    //! ```

    pub use crate::config::{CliArgs, Config};
    pub use crate::core::{
        CopyJob, JobQueue, MirrorEngine, Producer, Report, RunState, ShutdownController, Stats,
    };
    pub use crate::error::{MirrorError, Result};
}
