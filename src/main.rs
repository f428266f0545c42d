//! splasher - a bit-banged GPIO SPI flash programmer
//!
//! Reads, writes and erases 25-series SPI NOR flash chips through plain
//! GPIO lines, with no SPI controller required. The protocol engine lives
//! in `splasher-core`; this binary wires it to a pin backend (`gpio` for
//! real hardware, `sim` for the chip simulator) and a clap CLI.

mod cli;
mod commands;
mod fileio;
mod programmers;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let default_filter = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let result = match &cli.command {
        Commands::Identify { target } => commands::identify::run(target),
        Commands::Read {
            target,
            output,
            bytes,
            offset,
        } => commands::read::run(target, output, *bytes, *offset),
        Commands::Write {
            target,
            input,
            bytes,
            offset,
        } => commands::write::run(target, input, *bytes, *offset),
        Commands::Erase {
            target,
            bytes,
            offset,
            block_size,
        } => commands::erase::run(target, *bytes, *offset, *block_size),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
