//! Identify command implementation

use crate::cli::TargetArgs;
use crate::programmers;
use splasher_core::session;

/// Run the identify command
pub fn run(target: &TargetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut device = super::target_device(target, 0, 0);
    let (mut pins, map) = programmers::open_programmer(&target.programmer)?;

    let id = session::identify(&mut device, &mut pins, map)?;

    println!(
        "JEDEC ID: {:02X} {:02X} {:02X}",
        id.manufacturer, id.memory_type, id.capacity
    );
    // The capacity byte encodes a power-of-two size on most chips.
    if (0x10..=0x1C).contains(&id.capacity) {
        let bytes = 1u64 << id.capacity;
        println!("Capacity: {} bytes ({} MiB)", bytes, bytes / (1024 * 1024));
    }
    if id.manufacturer == 0x00 || id.manufacturer == 0xFF {
        log::warn!("identity looks like a floating bus, check the wiring");
    }

    Ok(())
}
