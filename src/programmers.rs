//! Programmer selection and option parsing
//!
//! A programmer spec is `name:key=value,key=value`. Two backends exist:
//! `gpio` for real hardware via the Linux GPIO character device, and `sim`
//! for the in-memory chip simulator.

use splasher_core::pins::{PinAssignment, PinFacility};
use splasher_sim::SimFlash;

/// Default simulated chip size (16 MiB).
const SIM_SIZE: usize = 16 * 1024 * 1024;

/// Open the backend named by `spec`, yielding the pins and the signal
/// assignment to drive them with.
pub fn open_programmer(
    spec: &str,
) -> Result<(Box<dyn PinFacility>, PinAssignment), Box<dyn std::error::Error>> {
    let (name, rest) = match spec.split_once(':') {
        Some((name, rest)) => (name, rest),
        None => (spec, ""),
    };

    let options: Vec<(&str, &str)> = rest
        .split(',')
        .filter(|part| !part.is_empty())
        .map(|part| part.split_once('=').unwrap_or((part, "")))
        .collect();

    match name {
        "gpio" => {
            let (pins, map) = splasher_linux_gpio::open_pins(&options)?;
            Ok((Box::new(pins), map))
        }
        "sim" => {
            if !options.is_empty() {
                log::warn!("sim programmer takes no options, ignoring {rest}");
            }
            let sim = SimFlash::new(SIM_SIZE);
            let map = PinAssignment::default();
            Ok((Box::new(sim), map))
        }
        other => Err(format!("unknown programmer '{}' (available: gpio, sim)", other).into()),
    }
}
