//! splasher-linux-gpio - Linux GPIO character device backend
//!
//! Implements the [`splasher_core::pins::PinFacility`] contract over
//! gpiocdev, so any header pins on a single GPIO chip can serve as the
//! programming port. Delays use a plain thread sleep; at the clock rates
//! the bit-banged transport supports the scheduler jitter is well inside
//! the chips' tolerances.
//!
//! # Options
//!
//! Programmer options are `key=value` pairs:
//!
//! - `dev=/dev/gpiochipN` - chip device path (or `gpiochip=N`)
//! - `sck=N`, `mosi=N`, `miso=N`, `cs=N`, `wp=N` - line offsets; each
//!   defaults to the traditional Raspberry Pi header assignment

mod error;
mod pins;

pub use error::{LinuxGpioError, Result};
pub use pins::CdevPins;

use splasher_core::pins::PinAssignment;

fn parse_line(key: &str, value: &str) -> Result<u32> {
    value
        .parse()
        .map_err(|_| LinuxGpioError::InvalidParameter(format!("{key}={value}")))
}

/// Parse programmer options into a chip device path and a pin assignment.
pub fn parse_options(options: &[(&str, &str)]) -> Result<(String, PinAssignment)> {
    let mut device = String::new();
    let mut gpiochip: Option<u32> = None;
    let mut map = PinAssignment::default();

    for (key, value) in options {
        match *key {
            "dev" => device = value.to_string(),
            "gpiochip" => gpiochip = Some(parse_line(key, value)?),
            "sck" => map.sck = parse_line(key, value)?,
            "mosi" => map.mosi = parse_line(key, value)?,
            "miso" => map.miso = parse_line(key, value)?,
            "cs" => map.cs = parse_line(key, value)?,
            "wp" => map.wp = parse_line(key, value)?,
            _ => {
                log::warn!("linux_gpio: unknown option {key}={value}");
            }
        }
    }

    match (device.is_empty(), gpiochip) {
        (true, Some(n)) => device = format!("/dev/gpiochip{n}"),
        (true, None) => return Err(LinuxGpioError::NoDevice),
        (false, Some(_)) => {
            return Err(LinuxGpioError::InvalidParameter(
                "only one of 'dev' and 'gpiochip' may be given".into(),
            ))
        }
        (false, None) => {}
    }

    Ok((device, map))
}

/// Open the pins named by the given options.
pub fn open_pins(options: &[(&str, &str)]) -> Result<(CdevPins, PinAssignment)> {
    let (device, map) = parse_options(options)?;
    let lines = [map.sck, map.mosi, map.miso, map.cs, map.wp];
    let pins = CdevPins::open(&device, &lines)?;
    Ok((pins, map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gpiochip_number_expands_to_device_path() {
        let (device, map) = parse_options(&[("gpiochip", "0")]).unwrap();
        assert_eq!(device, "/dev/gpiochip0");
        assert_eq!(map, PinAssignment::default());
    }

    #[test]
    fn explicit_lines_override_defaults() {
        let (device, map) =
            parse_options(&[("dev", "/dev/gpiochip1"), ("sck", "11"), ("cs", "8")]).unwrap();
        assert_eq!(device, "/dev/gpiochip1");
        assert_eq!(map.sck, 11);
        assert_eq!(map.cs, 8);
        assert_eq!(map.mosi, PinAssignment::default().mosi);
    }

    #[test]
    fn device_is_required() {
        assert!(matches!(
            parse_options(&[("sck", "11")]),
            Err(LinuxGpioError::NoDevice)
        ));
    }

    #[test]
    fn dev_and_gpiochip_are_exclusive() {
        assert!(matches!(
            parse_options(&[("dev", "/dev/gpiochip0"), ("gpiochip", "1")]),
            Err(LinuxGpioError::InvalidParameter(_))
        ));
    }

    #[test]
    fn garbage_line_number_is_rejected() {
        assert!(matches!(
            parse_options(&[("gpiochip", "0"), ("sck", "eleven")]),
            Err(LinuxGpioError::InvalidParameter(_))
        ));
    }
}
