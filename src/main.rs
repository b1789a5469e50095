//! Account ledger CLI
//!
//! Replays an operation script against a set of accounts and prints a report
//! of their final states.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > accounts.csv
//! cargo run -- --report statements operations.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 operations.csv
//! RUST_LOG=debug cargo run -- operations.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr, filtered by `RUST_LOG`
//! (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, output failure)

use account_ledger::cli;
use account_ledger::strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = {
        let config = if args.strategy == cli::StrategyType::Async {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, args.report)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.input_file, &mut output) {
        tracing::error!(error = %e, "processing failed");
        process::exit(1);
    }
}
