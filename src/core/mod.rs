//! Core replication engine module
//!
//! Provides the bounded job queue, traversal producer, worker pool,
//! shutdown controller and the engine that orchestrates them.

mod engine;
mod producer;
mod queue;
mod shutdown;
mod stats;
mod worker;

pub use engine::*;
pub use producer::*;
pub use queue::*;
pub use shutdown::*;
pub use stats::*;
pub use worker::*;
