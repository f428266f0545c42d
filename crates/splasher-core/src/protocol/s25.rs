//! 25-series command sequencing
//!
//! Every operation here is written against [`FlashTransport`] and issues the
//! JEDEC-common subset only. Addresses go on the wire as three big-endian
//! bytes; program data is chunked at the 256-byte page so a page program
//! never wraps inside the chip.

use log::debug;

use crate::device::ChipId;
use crate::error::{Error, Result};
use crate::io::{ByteSink, ByteSource, Progress};
use crate::protocol::opcodes;
use crate::transport::FlashTransport;

/// Program page size shared by the whole 25-series.
pub const PAGE_SIZE: u32 = 256;

/// How often sequential reads report progress, in bytes.
const PROGRESS_GRANULARITY: u32 = 1024;

/// Status polls allowed for a page program before giving up.
pub const PROGRAM_POLL_LIMIT: u32 = 100_000;

/// Status polls allowed for a unit erase before giving up. Erases take
/// orders of magnitude longer than programs.
pub const ERASE_POLL_LIMIT: u32 = 10_000_000;

/// Erase granularities of the 25-series, each with its own opcode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EraseUnit {
    /// 4 KiB sector
    #[default]
    Sector4K,
    /// 32 KiB block
    Block32K,
    /// 64 KiB block
    Block64K,
}

impl EraseUnit {
    pub fn size(self) -> u32 {
        match self {
            Self::Sector4K => 4 * 1024,
            Self::Block32K => 32 * 1024,
            Self::Block64K => 64 * 1024,
        }
    }

    fn opcode(self) -> u8 {
        match self {
            Self::Sector4K => opcodes::SE_20,
            Self::Block32K => opcodes::BE_52,
            Self::Block64K => opcodes::BE_D8,
        }
    }
}

/// Clock a 24-bit address out, most significant byte first.
fn write_addr<T: FlashTransport + ?Sized>(transport: &mut T, addr: u32) {
    transport.write_byte((addr >> 16) as u8);
    transport.write_byte((addr >> 8) as u8);
    transport.write_byte(addr as u8);
}

/// Issue the JEDEC identify command and return the three raw bytes.
pub fn read_jedec_id<T: FlashTransport + ?Sized>(transport: &mut T) -> ChipId {
    transport.start_transaction();
    transport.write_byte(opcodes::RDID);
    let id = ChipId {
        manufacturer: transport.read_byte(),
        memory_type: transport.read_byte(),
        capacity: transport.read_byte(),
    };
    transport.end_transaction();
    id
}

/// Read status register 1.
pub fn read_status<T: FlashTransport + ?Sized>(transport: &mut T) -> u8 {
    transport.start_transaction();
    transport.write_byte(opcodes::RDSR);
    let status = transport.read_byte();
    transport.end_transaction();
    status
}

/// Set the chip's write-enable latch. Must precede every program and erase;
/// the chip clears it again when the operation completes.
pub fn write_enable<T: FlashTransport + ?Sized>(transport: &mut T) {
    transport.start_transaction();
    transport.write_byte(opcodes::WREN);
    transport.end_transaction();
}

/// Poll the write-in-progress bit until it clears, up to `poll_limit`
/// status reads. A chip that never settles yields [`Error::BusyTimeout`]
/// instead of hanging the host.
pub fn wait_ready<T: FlashTransport + ?Sized>(transport: &mut T, poll_limit: u32) -> Result<()> {
    for _ in 0..poll_limit {
        if read_status(transport) & opcodes::SR1_WIP == 0 {
            return Ok(());
        }
    }
    Err(Error::BusyTimeout)
}

/// Stream `count` bytes starting at `addr` into `sink` over one sequential
/// read transaction.
///
/// A sink failure deasserts chip-select before the error propagates, so the
/// bus is left idle either way. `count == 0` issues no transaction at all.
pub fn read_sequential<T, S>(
    transport: &mut T,
    addr: u32,
    count: u32,
    sink: &mut S,
    progress: &mut dyn Progress,
) -> Result<()>
where
    T: FlashTransport + ?Sized,
    S: ByteSink + ?Sized,
{
    if count == 0 {
        return Ok(());
    }
    debug!("sequential read of {count} bytes from {addr:#08x}");
    transport.start_transaction();
    transport.write_byte(opcodes::READ);
    write_addr(transport, addr);
    for done in 1..=count {
        let byte = transport.read_byte();
        if let Err(err) = sink.push(byte) {
            transport.end_transaction();
            return Err(err.into());
        }
        if done % PROGRESS_GRANULARITY == 0 {
            progress.transferred(done);
        }
    }
    transport.end_transaction();
    if count % PROGRESS_GRANULARITY != 0 {
        progress.transferred(count);
    }
    Ok(())
}

/// Program up to `count` bytes from `source` starting at `addr`, one page
/// at a time. Returns the number of bytes actually programmed, which is
/// smaller than `count` when the source runs dry first.
pub fn program_pages<T, S>(
    transport: &mut T,
    addr: u32,
    count: u32,
    source: &mut S,
    progress: &mut dyn Progress,
) -> Result<u32>
where
    T: FlashTransport + ?Sized,
    S: ByteSource + ?Sized,
{
    debug!("programming up to {count} bytes at {addr:#08x}");
    let mut addr = addr;
    let mut written = 0u32;
    while written < count {
        let chunk = (count - written).min(PAGE_SIZE);
        let mut sent = 0u32;
        let mut exhausted = false;
        write_enable(transport);
        transport.start_transaction();
        transport.write_byte(opcodes::PP);
        write_addr(transport, addr);
        for _ in 0..chunk {
            match source.pull() {
                Ok(Some(byte)) => {
                    transport.write_byte(byte);
                    sent += 1;
                }
                Ok(None) => {
                    exhausted = true;
                    break;
                }
                Err(err) => {
                    transport.end_transaction();
                    return Err(err.into());
                }
            }
        }
        transport.end_transaction();
        if sent > 0 {
            wait_ready(transport, PROGRAM_POLL_LIMIT)?;
        }
        addr += sent;
        written += sent;
        progress.transferred(written);
        if exhausted {
            break;
        }
    }
    Ok(written)
}

/// Erase the whole chip. The operation takes tens of seconds on large
/// parts and the chip ignores all commands except status reads meanwhile,
/// so completion is not polled here.
pub fn erase_chip<T: FlashTransport + ?Sized>(transport: &mut T) {
    debug!("chip erase");
    write_enable(transport);
    transport.start_transaction();
    transport.write_byte(opcodes::CE_C7);
    transport.end_transaction();
}

/// Erase every `unit`-sized region overlapping `[offset, offset + count)`.
///
/// The range is rounded outward to unit boundaries, so bytes adjacent to
/// the requested range but inside a shared unit are erased too. Each unit
/// gets its own write-enable and is polled to completion before the next.
/// Returns the number of units erased. `count` must be nonzero; callers
/// route zero to [`erase_chip`].
pub fn erase_range<T: FlashTransport + ?Sized>(
    transport: &mut T,
    offset: u32,
    count: u32,
    unit: EraseUnit,
) -> Result<u32> {
    let size = unit.size();
    let end = offset + count;
    let mut addr = offset - offset % size;
    debug!(
        "erasing {:?} units from {addr:#08x} to cover {offset:#08x}+{count}",
        unit
    );
    let mut units = 0u32;
    while addr < end {
        write_enable(transport);
        transport.start_transaction();
        transport.write_byte(unit.opcode());
        write_addr(transport, addr);
        transport.end_transaction();
        wait_ready(transport, ERASE_POLL_LIMIT)?;
        addr += size;
        units += 1;
    }
    Ok(units)
}
