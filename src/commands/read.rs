//! Read command implementation

use std::path::Path;

use crate::cli::TargetArgs;
use crate::fileio::FileSink;
use crate::programmers;
use splasher_core::session;

/// Run the read command
pub fn run(
    target: &TargetArgs,
    output: &Path,
    bytes: u32,
    offset: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut device = super::target_device(target, bytes, offset);
    let (mut pins, map) = programmers::open_programmer(&target.programmer)?;

    let mut sink = FileSink::create(output)?;
    let mut progress = super::BarProgress::new(bytes)?;

    let read = session::dump(&mut device, &mut pins, map, &mut sink, &mut progress)?;
    sink.finish()?;
    progress.finish("Read complete");

    println!("Wrote {} bytes to {:?}", read, output);
    Ok(())
}
