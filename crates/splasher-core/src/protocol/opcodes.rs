//! 25-series opcode bytes
//!
//! The subset every JEDEC-compatible SPI NOR chip answers; vendor extensions
//! have no place here.

/// Write Enable
pub const WREN: u8 = 0x06;

/// Read Status Register 1
pub const RDSR: u8 = 0x05;

/// Read JEDEC ID (manufacturer, memory type, capacity)
pub const RDID: u8 = 0x9F;

/// Read data, 3-byte address, no dummy cycles
pub const READ: u8 = 0x03;

/// Page Program, 256-byte page
pub const PP: u8 = 0x02;

/// Sector Erase, 4 KiB
pub const SE_20: u8 = 0x20;

/// Block Erase, 32 KiB
pub const BE_52: u8 = 0x52;

/// Block Erase, 64 KiB
pub const BE_D8: u8 = 0xD8;

/// Chip Erase
pub const CE_C7: u8 = 0xC7;

/// Status register 1: write-in-progress bit
pub const SR1_WIP: u8 = 0x01;
