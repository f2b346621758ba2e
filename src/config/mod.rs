//! Configuration module for MirrorCP
//!
//! Provides CLI argument parsing and the validated, immutable run
//! configuration shared by the producer and workers.

mod settings;

pub use settings::*;
