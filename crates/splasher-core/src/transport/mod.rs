//! Transport variants and the capability contract they share

mod spi;
mod stub;

pub use spi::SoftSpi;
pub use stub::{DualSpi, QuadSpi, TwoWire};

use crate::device::ChipId;
use crate::error::Result;

/// The minimal contract every transport variant satisfies.
///
/// The flash command layer is written once against this trait; variants
/// differing only in line count (dual/quad) or wire discipline (two-wire)
/// supply their own byte-level clocking and reuse the shared sequencing.
/// Exactly one transaction may be open at a time per transport instance;
/// the command layer pairs every start with an end and never nests them.
pub trait FlashTransport {
    /// Assert chip-select and give the chip a stable select edge before any
    /// clocking.
    fn start_transaction(&mut self);

    /// Deassert chip-select once the chip has latched its last bit.
    fn end_transaction(&mut self);

    /// Clock one byte out, most-significant bit first.
    fn write_byte(&mut self, byte: u8);

    /// Clock one byte in, most-significant bit first.
    fn read_byte(&mut self) -> u8;

    /// Run the identify sequence and return the three raw identity bytes.
    ///
    /// Variants that cannot transfer yet report failure here instead of
    /// being omitted from selection.
    fn read_identity(&mut self) -> Result<ChipId>;

    /// Drive the write-protect line; `true` means protected.
    ///
    /// Default no-op for variants without a write-protect line.
    fn set_write_protect(&mut self, _protect: bool) {}
}
