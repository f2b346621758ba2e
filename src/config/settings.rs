//! Configuration settings for MirrorCP
//!
//! Defines the CLI surface and the validated run configuration. The
//! configuration is built once at startup, before any thread or queue
//! exists, and is never mutated afterwards.

use crate::error::{MirrorError, Result};
use clap::Parser;
use std::path::PathBuf;

/// MirrorCP - concurrent directory-tree replication
#[derive(Parser, Debug, Clone)]
#[command(name = "mirrorcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Replicate a directory tree with a bounded queue and a pool of copy workers")]
#[command(long_about = r#"
MirrorCP walks a source directory tree with a single producer thread,
recreates its directory structure at the destination and hands every
regular file to a fixed pool of worker threads through a bounded job
queue. The queue bounds memory and open-handle usage regardless of the
size of the source tree.

Examples:
  mirrorcp 16 4 /data/src /data/dst     # 16-slot queue, 4 workers
  mirrorcp 1 1 ./in ./out               # fully serialized copy
"#)]
pub struct CliArgs {
    /// Capacity of the bounded job queue (must be > 0)
    #[arg(value_name = "BUFFER_SIZE")]
    pub buffer_size: i64,

    /// Number of worker threads (must be > 0)
    #[arg(value_name = "NUM_WORKERS")]
    pub workers: i64,

    /// Source directory
    #[arg(value_name = "SOURCE_DIR")]
    pub source: PathBuf,

    /// Destination directory
    #[arg(value_name = "DEST_DIR")]
    pub dest: PathBuf,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress the final report)
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

/// Validated, immutable run configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Capacity of the bounded job queue
    pub buffer_size: usize,
    /// Number of worker threads
    pub workers: usize,
    /// Source root directory
    pub source: PathBuf,
    /// Destination root directory
    pub dest: PathBuf,
}

impl Config {
    /// Build a configuration from parsed CLI arguments.
    ///
    /// Rejects non-positive sizes before any thread or shared resource is
    /// created.
    pub fn from_cli(args: &CliArgs) -> Result<Self> {
        if args.buffer_size <= 0 {
            return Err(MirrorError::config(format!(
                "buffer size must be > 0 (got {})",
                args.buffer_size
            )));
        }
        if args.workers <= 0 {
            return Err(MirrorError::config(format!(
                "number of workers must be > 0 (got {})",
                args.workers
            )));
        }

        Ok(Self {
            buffer_size: args.buffer_size as usize,
            workers: args.workers as usize,
            source: args.source.clone(),
            dest: args.dest.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(buffer_size: i64, workers: i64) -> CliArgs {
        CliArgs {
            buffer_size,
            workers,
            source: PathBuf::from("/src"),
            dest: PathBuf::from("/dst"),
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_valid_config() {
        let config = Config::from_cli(&args(8, 4)).unwrap();
        assert_eq!(config.buffer_size, 8);
        assert_eq!(config.workers, 4);
        assert_eq!(config.source, PathBuf::from("/src"));
    }

    #[test]
    fn test_rejects_zero_buffer() {
        assert!(Config::from_cli(&args(0, 4)).is_err());
    }

    #[test]
    fn test_rejects_negative_workers() {
        let err = Config::from_cli(&args(8, -2)).unwrap_err();
        assert!(err.to_string().contains("workers"));
    }

    #[test]
    fn test_cli_positional_order() {
        let args =
            CliArgs::try_parse_from(["mirrorcp", "16", "4", "/data/src", "/data/dst"]).unwrap();
        assert_eq!(args.buffer_size, 16);
        assert_eq!(args.workers, 4);
        assert_eq!(args.source, PathBuf::from("/data/src"));
        assert_eq!(args.dest, PathBuf::from("/data/dst"));
    }

    #[test]
    fn test_cli_missing_args_is_usage_error() {
        assert!(CliArgs::try_parse_from(["mirrorcp", "16", "4"]).is_err());
    }
}
