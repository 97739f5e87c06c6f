//! Client from Source - Command-line tool for generating TypeScript API clients.
//!
//! This binary reads Spring-style annotated controller classes (Groovy or Java), runs
//! them through the external Groovy parser and prints one typed client class per
//! controller.
//!
//! # Usage
//!
//! ```bash
//! client-from-source [OPTIONS] <PATH>...
//! ```
//!
//! # Examples
//!
//! Generate clients for two controllers:
//! ```bash
//! client-from-source OrderController.groovy CustomerController.groovy
//! ```
//!
//! Generate clients for a whole source tree into a file:
//! ```bash
//! client-from-source src/main/groovy --file-header -o web/src/api/generated.ts
//! ```
//!
//! Use a specific interpreter and enable verbose logging:
//! ```bash
//! client-from-source --groovy /opt/groovy-4/bin/groovy OrderController.groovy -v
//! ```

use anyhow::Result;
use clap::Parser;
use client_from_source::cli;
use log::info;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    info!("Client from Source starting...");

    let args = cli::parse_args_from_parsed(args)?;

    cli::run(args)?;

    info!("Client generation completed successfully");

    Ok(())
}
