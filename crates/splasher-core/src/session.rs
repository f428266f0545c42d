//! Session layer: validated device operations over borrowed pins
//!
//! Each public function here is one user-visible operation. They all follow
//! the same shape: validate the descriptor, select a transport for it, run
//! the command sequence, and hand the pins back when the borrow ends.
//! Operations that move data refuse to build a transport at all unless the
//! primary SPI kind is selected, so unsupported configurations never touch
//! a pin.

use log::{info, warn};

use crate::device::{ChipId, Device, TransportKind};
use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource, Progress};
use crate::pins::{PinAssignment, PinFacility};
use crate::protocol::s25::{self, EraseUnit};
use crate::timing::TimingProfile;
use crate::transport::{DualSpi, FlashTransport, QuadSpi, SoftSpi, TwoWire};

/// Build the transport the descriptor names, borrowing the pins for its
/// lifetime. Selection is exhaustive over [`TransportKind`]: kinds without
/// transfer support get a placeholder that fails on use.
pub fn select_transport<'p, P: PinFacility>(
    device: &Device,
    pins: &'p mut P,
    map: PinAssignment,
) -> Result<Box<dyn FlashTransport + 'p>> {
    let timing = TimingProfile::from_khz(device.clock_khz)?;
    Ok(match device.transport {
        TransportKind::Spi => Box::new(SoftSpi::new(pins, map, timing)),
        TransportKind::DualSpi => Box::new(DualSpi),
        TransportKind::QuadSpi => Box::new(QuadSpi),
        TransportKind::TwoWire => Box::new(TwoWire),
    })
}

fn require_primary_spi(device: &Device) -> Result<()> {
    match device.transport {
        TransportKind::Spi => Ok(()),
        other => Err(Error::TransportNotImplemented(other)),
    }
}

/// Prepare a transport for reading: fetch and cache the identity so later
/// output can name the chip. An identify failure is logged, not fatal;
/// reads work on chips with broken ID logic too.
fn init_read(device: &mut Device, transport: &mut dyn FlashTransport) {
    match transport.read_identity() {
        Ok(id) => {
            info!(
                "chip identity {:02x} {:02x} {:02x}",
                id.manufacturer, id.memory_type, id.capacity
            );
            device.identity = Some(id);
        }
        Err(err) => {
            warn!("identify failed, continuing without identity: {err}");
            device.identity = None;
        }
    }
}

/// Prepare a transport for modification: identity first, then release the
/// hardware write-protect line.
fn init_write(device: &mut Device, transport: &mut dyn FlashTransport) {
    init_read(device, transport);
    transport.set_write_protect(false);
}

/// Read the chip identity and cache it on the descriptor.
///
/// Unlike the data-moving operations this one runs on every transport kind,
/// so selecting an unimplemented kind reports that fact instead of a
/// validation error.
pub fn identify<P: PinFacility>(
    device: &mut Device,
    pins: &mut P,
    map: PinAssignment,
) -> Result<ChipId> {
    device.validate()?;
    let mut transport = select_transport(device, pins, map)?;
    let id = transport.read_identity()?;
    device.identity = Some(id);
    Ok(id)
}

/// Read `device.byte_count` bytes from `device.start_offset` into `sink`.
/// Returns the byte count on success.
pub fn dump<P, S>(
    device: &mut Device,
    pins: &mut P,
    map: PinAssignment,
    sink: &mut S,
    progress: &mut dyn Progress,
) -> Result<u32>
where
    P: PinFacility,
    S: ByteSink + ?Sized,
{
    device.validate()?;
    require_primary_spi(device)?;
    let mut transport = select_transport(device, pins, map)?;
    init_read(device, transport.as_mut());
    s25::read_sequential(
        transport.as_mut(),
        device.start_offset,
        device.byte_count,
        sink,
        progress,
    )?;
    Ok(device.byte_count)
}

/// Program up to `device.byte_count` bytes from `source` starting at
/// `device.start_offset`. Returns the number of bytes actually programmed.
///
/// The target range is assumed erased; programming only clears bits.
pub fn flash_from_source<P, S>(
    device: &mut Device,
    pins: &mut P,
    map: PinAssignment,
    source: &mut S,
    progress: &mut dyn Progress,
) -> Result<u32>
where
    P: PinFacility,
    S: ByteSource + ?Sized,
{
    device.validate()?;
    require_primary_spi(device)?;
    let mut transport = select_transport(device, pins, map)?;
    init_write(device, transport.as_mut());
    let written = s25::program_pages(
        transport.as_mut(),
        device.start_offset,
        device.byte_count,
        source,
        progress,
    )?;
    if written < device.byte_count {
        warn!(
            "source exhausted after {written} of {} bytes",
            device.byte_count
        );
    }
    transport.set_write_protect(true);
    Ok(written)
}

/// Erase `device.byte_count` bytes starting at `device.start_offset`,
/// rounded outward to `unit` boundaries. A zero byte count erases the whole
/// chip. Returns the number of units erased (zero for a chip erase).
pub fn erase<P: PinFacility>(
    device: &mut Device,
    pins: &mut P,
    map: PinAssignment,
    unit: EraseUnit,
) -> Result<u32> {
    device.validate()?;
    require_primary_spi(device)?;
    let mut transport = select_transport(device, pins, map)?;
    init_write(device, transport.as_mut());
    let units = if device.byte_count == 0 {
        s25::erase_chip(transport.as_mut());
        0
    } else {
        s25::erase_range(
            transport.as_mut(),
            device.start_offset,
            device.byte_count,
            unit,
        )?
    };
    transport.set_write_protect(true);
    Ok(units)
}
