//! Error types for splasher-core

use crate::device::{ProtocolFamily, TransportKind};
use thiserror::Error;

/// Core error type
///
/// Configuration errors are reported before any pin is touched; the engine
/// never retries or recovers speculatively, so every variant maps to exactly
/// one point of detection.
#[derive(Debug, Error)]
pub enum Error {
    /// Requested clock rate is above the supported maximum
    #[error("clock rate {0} KHz is out of range (1-1000 KHz, or 0 for unconstrained)")]
    ClockOutOfRange(u32),

    /// Transport kind and protocol family cannot be combined
    #[error("{kind} transport cannot drive the {family} command family")]
    UnsupportedPairing {
        kind: TransportKind,
        family: ProtocolFamily,
    },

    /// Byte count exceeds the addressable ceiling
    #[error("transfer of {0} bytes exceeds the 256 MiB ceiling")]
    TransferTooLarge(u32),

    /// Offset plus byte count runs past the addressable ceiling
    #[error("range 0x{offset:06X}+{count} runs past the addressable ceiling")]
    RangeOverflow { offset: u32, count: u32 },

    /// Transport variant conforms to the contract but cannot transfer yet
    #[error("{0} transport is not implemented yet")]
    TransportNotImplemented(TransportKind),

    /// The write-in-progress bit never cleared within the poll budget
    #[error("timed out waiting for the write-in-progress bit to clear")]
    BusyTimeout,

    /// A byte collaborator (sink or source) failed
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias using the core error type
pub type Result<T> = std::result::Result<T, Error>;
