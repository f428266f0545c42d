//! CLI argument parsing

use clap::{Args, Parser, Subcommand, ValueEnum};
use splasher_core::device::{ProtocolFamily, TransportKind};
use splasher_core::protocol::s25::EraseUnit;
use std::path::PathBuf;

/// Parse a byte count: decimal or 0x-prefixed hex, with an optional K or M
/// binary suffix.
pub fn parse_byte_count(s: &str) -> Result<u32, String> {
    let (digits, multiplier) = match s.strip_suffix(['k', 'K']) {
        Some(rest) => (rest, 1024u32),
        None => match s.strip_suffix(['m', 'M']) {
            Some(rest) => (rest, 1024 * 1024),
            None => (s, 1),
        },
    };
    let value = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex value: {}", e))
    } else {
        digits
            .parse::<u32>()
            .map_err(|e| format!("invalid number: {}", e))
    }?;
    value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("byte count overflows: {}", s))
}

/// Parse a clock rate in kHz; "max" selects unconstrained speed.
pub fn parse_speed(s: &str) -> Result<u32, String> {
    if s.eq_ignore_ascii_case("max") {
        return Ok(0);
    }
    let khz: u32 = s.parse().map_err(|e| format!("invalid speed: {}", e))?;
    if khz == 0 || khz > 1000 {
        return Err(format!("speed must be 1-1000 kHz or 'max', got {}", khz));
    }
    Ok(khz)
}

#[derive(Parser)]
#[command(name = "splasher")]
#[command(author, version, about = "Bit-banged GPIO SPI flash programmer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Chip interface selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterfaceArg {
    /// Single-line SPI, 25-series chips
    Spi,
    /// Dual-line SPI, 25-series chips (not implemented yet)
    Dual,
    /// Quad-line SPI, 25-series chips (not implemented yet)
    Quad,
    /// Two-wire interface, 24-series chips (not implemented yet)
    TwoWire,
}

impl InterfaceArg {
    pub fn pairing(self) -> (TransportKind, ProtocolFamily) {
        match self {
            Self::Spi => (TransportKind::Spi, ProtocolFamily::Series25),
            Self::Dual => (TransportKind::DualSpi, ProtocolFamily::Series25),
            Self::Quad => (TransportKind::QuadSpi, ProtocolFamily::Series25),
            Self::TwoWire => (TransportKind::TwoWire, ProtocolFamily::Series24),
        }
    }
}

/// Erase granularity selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BlockSizeArg {
    #[value(name = "4k")]
    Sector4K,
    #[value(name = "32k")]
    Block32K,
    #[value(name = "64k")]
    Block64K,
}

impl BlockSizeArg {
    pub fn unit(self) -> EraseUnit {
        match self {
            Self::Sector4K => EraseUnit::Sector4K,
            Self::Block32K => EraseUnit::Block32K,
            Self::Block64K => EraseUnit::Block64K,
        }
    }
}

/// Target options shared across commands
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Programmer to use: gpio:dev=/dev/gpiochipN,sck=N,... or sim
    #[arg(short, long, default_value = "gpio:gpiochip=0")]
    pub programmer: String,

    /// SPI clock in kHz (1-1000), or "max" for unconstrained speed
    #[arg(short, long, value_parser = parse_speed, default_value = "100")]
    pub speed: u32,

    /// Chip interface
    #[arg(long, value_enum, default_value = "spi")]
    pub interface: InterfaceArg,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read the chip's JEDEC identity
    Identify {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Read flash contents to a file
    Read {
        #[command(flatten)]
        target: TargetArgs,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Number of bytes to read (K/M suffixes accepted)
        #[arg(short = 'n', long, value_parser = parse_byte_count)]
        bytes: u32,

        /// Byte address to start from
        #[arg(long, value_parser = parse_byte_count, default_value = "0")]
        offset: u32,
    },

    /// Write a file to flash (target range must be erased first)
    Write {
        #[command(flatten)]
        target: TargetArgs,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        /// Number of bytes to write (defaults to the file size)
        #[arg(short = 'n', long, value_parser = parse_byte_count)]
        bytes: Option<u32>,

        /// Byte address to start at
        #[arg(long, value_parser = parse_byte_count, default_value = "0")]
        offset: u32,
    },

    /// Erase flash, by range or the whole chip
    Erase {
        #[command(flatten)]
        target: TargetArgs,

        /// Number of bytes to erase, rounded outward to whole blocks;
        /// omit to erase the entire chip
        #[arg(short = 'n', long, value_parser = parse_byte_count)]
        bytes: Option<u32>,

        /// Byte address the range starts at
        #[arg(long, value_parser = parse_byte_count, default_value = "0")]
        offset: u32,

        /// Erase block granularity
        #[arg(long, value_enum, default_value = "4k")]
        block_size: BlockSizeArg,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_counts_accept_suffixes() {
        assert_eq!(parse_byte_count("300"), Ok(300));
        assert_eq!(parse_byte_count("4K"), Ok(4096));
        assert_eq!(parse_byte_count("16M"), Ok(16 * 1024 * 1024));
        assert_eq!(parse_byte_count("0x1000"), Ok(4096));
        assert_eq!(parse_byte_count("0x10k"), Ok(16 * 1024));
        assert!(parse_byte_count("5000M").is_err());
        assert!(parse_byte_count("bogus").is_err());
    }

    #[test]
    fn speed_accepts_max_and_bounds() {
        assert_eq!(parse_speed("max"), Ok(0));
        assert_eq!(parse_speed("MAX"), Ok(0));
        assert_eq!(parse_speed("500"), Ok(500));
        assert!(parse_speed("0").is_err());
        assert!(parse_speed("1001").is_err());
    }

    #[test]
    fn cli_parses_a_read_invocation() {
        let cli = Cli::try_parse_from([
            "splasher", "read", "-p", "sim", "-s", "max", "-o", "dump.bin", "-n", "64K",
        ])
        .unwrap();
        match cli.command {
            Commands::Read {
                target,
                output,
                bytes,
                offset,
            } => {
                assert_eq!(target.programmer, "sim");
                assert_eq!(target.speed, 0);
                assert_eq!(target.interface, InterfaceArg::Spi);
                assert_eq!(output, PathBuf::from("dump.bin"));
                assert_eq!(bytes, 64 * 1024);
                assert_eq!(offset, 0);
            }
            _ => panic!("wrong subcommand"),
        }
    }
}
