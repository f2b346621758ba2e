//! MirrorCP CLI - concurrent directory-tree replication
//!
//! Parses the positional arguments, wires the interrupt handler and runs
//! the engine. Exit codes: 0 on normal completion (including runs with
//! per-item errors), 1 on configuration or root-traversal failure, 130
//! when the run was interrupted.

use clap::Parser;
use mirrorcp::config::{CliArgs, Config};
use mirrorcp::core::MirrorEngine;
use mirrorcp::error::Result;
use tracing_subscriber::EnvFilter;

/// Exit status for an interrupted run, mirroring the shell convention.
const EXIT_INTERRUPTED: i32 = 130;

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    match run(&args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(args: &CliArgs) -> Result<i32> {
    let config = Config::from_cli(args)?;

    if args.verbose > 0 {
        print_config(&config);
    }

    let engine = MirrorEngine::new(config);
    engine.shutdown_controller().install_interrupt_handler()?;

    let report = engine.execute()?;

    if !args.quiet {
        report.print_summary();
    }

    Ok(if report.interrupted {
        EXIT_INTERRUPTED
    } else {
        0
    })
}

fn print_config(config: &Config) {
    println!("=== Configuration ===");
    println!("Source:      {:?}", config.source);
    println!("Destination: {:?}", config.dest);
    println!("Workers:     {}", config.workers);
    println!("Buffer size: {}", config.buffer_size);
    println!();
}
