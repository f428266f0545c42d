//! Command implementations

pub mod erase;
pub mod identify;
pub mod read;
pub mod write;

use indicatif::{ProgressBar, ProgressStyle};
use splasher_core::device::Device;
use splasher_core::io::Progress;

use crate::cli::TargetArgs;

/// Build the device descriptor a command operates on.
pub fn target_device(target: &TargetArgs, byte_count: u32, start_offset: u32) -> Device {
    let (transport, family) = target.interface.pairing();
    Device {
        transport,
        family,
        clock_khz: target.speed,
        byte_count,
        start_offset,
        identity: None,
    }
}

/// Terminal progress bar fed by the engine's byte counter.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(total: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(total as u64);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})")?
                .progress_chars("#>-"),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self, message: &'static str) {
        self.bar.finish_with_message(message);
    }
}

impl Progress for BarProgress {
    fn transferred(&mut self, bytes: u32) {
        self.bar.set_position(bytes as u64);
    }
}
