//! Device descriptor and target limits
//!
//! A [`Device`] is a plain value object describing one logical flash target.
//! It is built by the caller, validated and read by the session layer, and
//! mutated only when an identify operation fills in the cached identity. The
//! engine never retains it beyond a single call.

use crate::error::{Error, Result};
use std::fmt;

/// Upper bound on any single transfer or erase range (256 MiB).
///
/// Addresses on the wire are 24-bit big-endian regardless of this ceiling.
pub const MAX_TRANSFER_BYTES: u32 = 256 * 1024 * 1024;

/// Highest clock rate the timing controller accepts, in KHz.
pub const MAX_CLOCK_KHZ: u32 = 1000;

/// Transport variants selectable at runtime.
///
/// Only the primary single-data-line SPI transport performs real transfers
/// today; the others conform to the capability contract and report failure,
/// so interface selection stays uniform and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Single data line per direction (MOSI/MISO)
    Spi,
    /// Two bidirectional data lines, 25-series command set
    DualSpi,
    /// Four bidirectional data lines, 25-series command set
    QuadSpi,
    /// Two-wire addressed interface (24-series chips)
    TwoWire,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi => write!(f, "SPI"),
            Self::DualSpi => write!(f, "dual SPI"),
            Self::QuadSpi => write!(f, "quad SPI"),
            Self::TwoWire => write!(f, "two-wire"),
        }
    }
}

/// Flash command families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolFamily {
    /// 25-series: SPI-style opcodes with 3-byte addresses
    Series25,
    /// 24-series: two-wire addressed commands
    Series24,
}

impl fmt::Display for ProtocolFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Series25 => write!(f, "25-series"),
            Self::Series24 => write!(f, "24-series"),
        }
    }
}

/// The three raw bytes returned by the JEDEC identify command.
///
/// No semantic decoding happens here; an all-zero or all-0xFF answer is
/// surfaced as-is and validity is the caller's judgement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChipId {
    pub manufacturer: u8,
    pub memory_type: u8,
    pub capacity: u8,
}

/// Describes one logical flash target.
#[derive(Debug, Clone)]
pub struct Device {
    pub transport: TransportKind,
    pub family: ProtocolFamily,
    /// Requested clock in KHz; 0 means unconstrained (host-limited) speed.
    pub clock_khz: u32,
    /// Total bytes to transfer for a read/write/erase-range operation.
    pub byte_count: u32,
    /// Byte address where the operation begins.
    pub start_offset: u32,
    /// Cached identity, filled lazily by identify and never auto-invalidated.
    pub identity: Option<ChipId>,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            transport: TransportKind::Spi,
            family: ProtocolFamily::Series25,
            clock_khz: 100,
            byte_count: 0,
            start_offset: 0,
            identity: None,
        }
    }
}

impl Device {
    /// Whether the transport kind can drive the selected command family.
    ///
    /// Two-wire pairs only with the 24-series; the SPI-like kinds pair only
    /// with the 25-series (they share its opcode set and differ only in bit
    /// transfer width).
    pub fn pairing_supported(&self) -> bool {
        matches!(
            (self.transport, self.family),
            (
                TransportKind::Spi | TransportKind::DualSpi | TransportKind::QuadSpi,
                ProtocolFamily::Series25
            ) | (TransportKind::TwoWire, ProtocolFamily::Series24)
        )
    }

    /// Checks everything that must hold before any pin is touched.
    pub fn validate(&self) -> Result<()> {
        if !self.pairing_supported() {
            return Err(Error::UnsupportedPairing {
                kind: self.transport,
                family: self.family,
            });
        }
        if self.clock_khz > MAX_CLOCK_KHZ {
            return Err(Error::ClockOutOfRange(self.clock_khz));
        }
        if self.byte_count > MAX_TRANSFER_BYTES {
            return Err(Error::TransferTooLarge(self.byte_count));
        }
        match self.start_offset.checked_add(self.byte_count) {
            Some(end) if end <= MAX_TRANSFER_BYTES => Ok(()),
            _ => Err(Error::RangeOverflow {
                offset: self.start_offset,
                count: self.byte_count,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_device_is_valid() {
        assert!(Device::default().validate().is_ok());
    }

    #[test]
    fn two_wire_rejects_series25() {
        let dev = Device {
            transport: TransportKind::TwoWire,
            family: ProtocolFamily::Series25,
            ..Device::default()
        };
        assert!(matches!(
            dev.validate(),
            Err(Error::UnsupportedPairing { .. })
        ));
    }

    #[test]
    fn spi_rejects_series24() {
        let dev = Device {
            family: ProtocolFamily::Series24,
            ..Device::default()
        };
        assert!(!dev.pairing_supported());
    }

    #[test]
    fn two_wire_pairs_with_series24() {
        let dev = Device {
            transport: TransportKind::TwoWire,
            family: ProtocolFamily::Series24,
            ..Device::default()
        };
        assert!(dev.validate().is_ok());
    }

    #[test]
    fn byte_count_ceiling_enforced() {
        let dev = Device {
            byte_count: MAX_TRANSFER_BYTES + 1,
            ..Device::default()
        };
        assert!(matches!(dev.validate(), Err(Error::TransferTooLarge(_))));
    }

    #[test]
    fn range_must_not_wrap() {
        let dev = Device {
            start_offset: MAX_TRANSFER_BYTES - 4,
            byte_count: 8,
            ..Device::default()
        };
        assert!(matches!(dev.validate(), Err(Error::RangeOverflow { .. })));

        let edge = Device {
            start_offset: MAX_TRANSFER_BYTES - 8,
            byte_count: 8,
            ..Device::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn out_of_range_clock_rejected() {
        let dev = Device {
            clock_khz: 1001,
            ..Device::default()
        };
        assert!(matches!(dev.validate(), Err(Error::ClockOutOfRange(1001))));
    }
}
