//! Placeholder transports for the not-yet-wired interface kinds
//!
//! These keep interface selection exhaustive: every [`TransportKind`] maps
//! to a transport value, and the unimplemented ones fail at the first
//! operation that would need real wires rather than at selection time.

use crate::device::{ChipId, TransportKind};
use crate::error::{Error, Result};
use crate::transport::FlashTransport;

macro_rules! stub_transport {
    ($name:ident, $kind:expr, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Default)]
        pub struct $name;

        impl FlashTransport for $name {
            fn start_transaction(&mut self) {}

            fn end_transaction(&mut self) {}

            fn write_byte(&mut self, _byte: u8) {}

            fn read_byte(&mut self) -> u8 {
                0
            }

            fn read_identity(&mut self) -> Result<ChipId> {
                Err(Error::TransportNotImplemented($kind))
            }
        }
    };
}

stub_transport!(
    DualSpi,
    TransportKind::DualSpi,
    "Dual-line SPI placeholder; no transfer support yet."
);
stub_transport!(
    QuadSpi,
    TransportKind::QuadSpi,
    "Quad-line SPI placeholder; no transfer support yet."
);
stub_transport!(
    TwoWire,
    TransportKind::TwoWire,
    "Two-wire (24-series) placeholder; no transfer support yet."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stubs_fail_identity_with_their_own_kind() {
        assert!(matches!(
            DualSpi.read_identity(),
            Err(Error::TransportNotImplemented(TransportKind::DualSpi))
        ));
        assert!(matches!(
            QuadSpi.read_identity(),
            Err(Error::TransportNotImplemented(TransportKind::QuadSpi))
        ));
        assert!(matches!(
            TwoWire.read_identity(),
            Err(Error::TransportNotImplemented(TransportKind::TwoWire))
        ));
    }
}
