//! Pin facility contract consumed by the bit-level transports
//!
//! Backends (Linux GPIO character device, simulator) implement
//! [`PinFacility`]; the transport layer treats the operations as infallible
//! and expects backends to log and swallow hardware faults rather than
//! propagate them mid-transfer.

/// Logical line number within a pin facility.
pub type PinId = u32;

/// Direction of a digital line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

/// The five logical signals of the primary SPI transport.
///
/// Defaults follow the documented header pinout of the original tool
/// (BCM numbering on a Raspberry Pi); any assignment can be supplied at
/// construction instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinAssignment {
    /// Serial clock (output)
    pub sck: PinId,
    /// Data out, master to chip (output)
    pub mosi: PinId,
    /// Data in, chip to master (input)
    pub miso: PinId,
    /// Chip select, active low (output)
    pub cs: PinId,
    /// Write protect, active high (output)
    pub wp: PinId,
}

impl Default for PinAssignment {
    fn default() -> Self {
        Self {
            sck: 2,
            miso: 3,
            mosi: 4,
            cs: 27,
            wp: 22,
        }
    }
}

/// Digital pin access plus the busy-delay primitive.
///
/// The delay has microsecond resolution with a practical minimum of one
/// microsecond; the transport never asks for a zero-length delay.
pub trait PinFacility {
    fn set_direction(&mut self, pin: PinId, direction: Direction);
    fn write(&mut self, pin: PinId, high: bool);
    fn read(&mut self, pin: PinId) -> bool;
    /// Blocking busy-delay on the calling thread.
    fn delay_us(&mut self, us: u32);
}

impl<P: PinFacility + ?Sized> PinFacility for &mut P {
    fn set_direction(&mut self, pin: PinId, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn write(&mut self, pin: PinId, high: bool) {
        (**self).write(pin, high)
    }

    fn read(&mut self, pin: PinId) -> bool {
        (**self).read(pin)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}

impl<P: PinFacility + ?Sized> PinFacility for Box<P> {
    fn set_direction(&mut self, pin: PinId, direction: Direction) {
        (**self).set_direction(pin, direction)
    }

    fn write(&mut self, pin: PinId, high: bool) {
        (**self).write(pin, high)
    }

    fn read(&mut self, pin: PinId) -> bool {
        (**self).read(pin)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
