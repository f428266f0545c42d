//! One-byte-at-a-time collaborators at the engine boundary
//!
//! The command layer streams bytes as they come off the wire and pulls bytes
//! as it clocks them out. Collaborators may buffer in bulk internally (the
//! CLI backs these with buffered file I/O) but present a single-byte
//! contract here.

use std::io;

/// Accepts bytes produced by a sequential read.
pub trait ByteSink {
    fn push(&mut self, byte: u8) -> io::Result<()>;
}

/// Yields bytes consumed by a page-program loop.
///
/// `Ok(None)` means the source is exhausted; the command layer treats that
/// as a normal early termination, not an error.
pub trait ByteSource {
    fn pull(&mut self) -> io::Result<Option<u8>>;
}

/// Observer for transfer progress.
pub trait Progress {
    /// Called with the running total of bytes moved so far.
    fn transferred(&mut self, bytes: u32);
}

/// A no-op progress reporter
pub struct NoProgress;

impl Progress for NoProgress {
    fn transferred(&mut self, _bytes: u32) {}
}

impl ByteSink for Vec<u8> {
    fn push(&mut self, byte: u8) -> io::Result<()> {
        Vec::push(self, byte);
        Ok(())
    }
}

impl ByteSource for std::collections::VecDeque<u8> {
    fn pull(&mut self) -> io::Result<Option<u8>> {
        Ok(self.pop_front())
    }
}
