//! splasher-core - protocol engine for bit-banged serial flash access
//!
//! This crate turns raw GPIO-like pins into a 25-series SPI NOR flash
//! programmer. It contains no hardware access of its own; everything physical
//! happens behind the [`pins::PinFacility`] contract, which a backend crate
//! (or a simulator) provides.
//!
//! # Architecture
//!
//! - [`timing`] - maps a requested clock rate onto the delay quanta the
//!   transport sleeps between line transitions
//! - [`transport`] - chip-select framing and MSB-first byte clocking over one
//!   data line per direction, behind the [`transport::FlashTransport`]
//!   capability trait every variant (including the dual/quad/two-wire stubs)
//!   satisfies
//! - [`protocol`] - the JEDEC command sequences: identify, sequential read,
//!   write-enable + page program, sector/block/chip erase, status polling
//! - [`session`] - device validation and operation orchestration; the only
//!   entry points a frontend needs
//!
//! Execution is single-threaded, synchronous and blocking throughout: the
//! physical line state must be deterministic relative to the induced delays,
//! so there is nothing to overlap with.

pub mod device;
pub mod error;
pub mod io;
pub mod pins;
pub mod protocol;
pub mod session;
pub mod timing;
pub mod transport;

pub use device::{ChipId, Device, ProtocolFamily, TransportKind};
pub use error::{Error, Result};
