//! Erase command implementation

use crate::cli::{BlockSizeArg, TargetArgs};
use crate::programmers;
use splasher_core::session;

/// Run the erase command
pub fn run(
    target: &TargetArgs,
    bytes: Option<u32>,
    offset: u32,
    block_size: BlockSizeArg,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut device = super::target_device(target, bytes.unwrap_or(0), offset);
    let (mut pins, map) = programmers::open_programmer(&target.programmer)?;

    let unit = block_size.unit();
    let units = session::erase(&mut device, &mut pins, map, unit)?;

    if bytes.is_none() {
        println!("Chip erase issued (completion is not polled; allow time before other operations)");
    } else {
        println!("Erased {} block(s) of {} bytes", units, unit.size());
    }
    Ok(())
}
