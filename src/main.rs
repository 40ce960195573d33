//! spidump - Rebuild SPI flash images from logic analyzer captures
//!
//! Decodes the SPI flash commands in a CSV capture of the chip-select,
//! clock, MOSI and MISO lines, and writes every byte the host read from the
//! chip to its flash offset in a sparse output file.
//!
//! # Architecture
//!
//! All decoding lives in `spidump-core`:
//! - **capture** - CSV rows to bus samples
//! - **decoder** - bus samples to flash command transactions
//! - **image** - read transactions to a sparse flash image
//!
//! This binary only wires those together and reports what it found.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use log::LevelFilter;
use spidump_core::config::Config;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG still overrides the verbosity flags
    env_logger::Builder::new()
        .filter_level(log_filter(cli.verbose))
        .parse_default_env()
        .init();

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::from_toml_file(path)?;
            log::info!("Loaded config from {:?}", path);
            config
        }
        None => Config::default(),
    };
    if cli.count_dummy_cycles {
        config.decoder.count_dummy_cycles = true;
    }

    let options = commands::dump::DumpOptions {
        quiet: cli.quiet,
        progress: !cli.no_progress,
    };

    if let Err(e) = commands::dump::run_dump(&cli.input, &cli.output, &config, &options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Log level for the number of `-v` flags
fn log_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
