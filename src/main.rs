//! Entry-point discovery - Command-line tool for inventorying Java entry points.
//!
//! This binary scans a Java repository, classifies every class by the framework markers it
//! carries, and reports the externally triggerable members it finds (HTTP endpoints, message
//! listeners, scheduled tasks, batch jobs, command-line mains and application bootstraps)
//! together with the shapes of the request payloads they accept.
//!
//! # Usage
//!
//! ```bash
//! entrypoint-discovery [OPTIONS] <PROJECT_PATH>
//! ```
//!
//! # Examples
//!
//! Write a YAML report:
//! ```bash
//! entrypoint-discovery ./payments-service -o entry-points.yaml
//! ```
//!
//! Print JSON without payload schemas:
//! ```bash
//! entrypoint-discovery ./payments-service -f json --no-schemas
//! ```

use anyhow::Result;
use clap::Parser;
use entrypoint_discovery::cli;
use log::info;

fn main() -> Result<()> {
    // Parse once to read the verbose flag before the logger exists, validate afterwards
    let args_for_verbose = cli::CliArgs::parse();

    let log_level = if args_for_verbose.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Entry-point discovery starting...");

    let args = cli::parse_args_from_parsed(args_for_verbose)?;

    cli::run(args)?;

    info!("Entry-point discovery completed successfully");

    Ok(())
}
