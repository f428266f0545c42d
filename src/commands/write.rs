//! Write command implementation

use std::path::Path;

use crate::cli::TargetArgs;
use crate::fileio::FileSource;
use crate::programmers;
use splasher_core::session;

/// Run the write command
pub fn run(
    target: &TargetArgs,
    input: &Path,
    bytes: Option<u32>,
    offset: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut source = FileSource::open(input)?;
    let bytes = match bytes {
        Some(n) => n,
        None => u32::try_from(source.len())
            .map_err(|_| format!("{:?} is too large to address", input))?,
    };

    let mut device = super::target_device(target, bytes, offset);
    let (mut pins, map) = programmers::open_programmer(&target.programmer)?;

    let mut progress = super::BarProgress::new(bytes)?;
    let written =
        session::flash_from_source(&mut device, &mut pins, map, &mut source, &mut progress)?;
    progress.finish("Write complete");

    println!("Programmed {} bytes from {:?}", written, input);
    Ok(())
}
