//! Pin facility over the Linux GPIO character device (gpiocdev)

use std::collections::HashMap;

use gpiocdev::line::Value;
use gpiocdev::request::{Config, Request};

use splasher_core::pins::{Direction, PinFacility, PinId};

use crate::error::{LinuxGpioError, Result};

/// GPIO lines requested from one character device chip.
///
/// All lines are requested up front as inputs and reconfigured per line as
/// the transport assigns directions. Faults after the initial request are
/// logged and swallowed; there is no mid-transfer recovery worth attempting
/// on a flipped line.
pub struct CdevPins {
    request: Request,
    /// Last value driven on each output line, replayed on reconfigure so a
    /// direction change never glitches the level.
    driven: HashMap<PinId, Value>,
}

impl CdevPins {
    /// Request the given lines from `device` (e.g. "/dev/gpiochip0"), all
    /// as inputs.
    pub fn open(device: &str, lines: &[PinId]) -> Result<Self> {
        if device.is_empty() {
            return Err(LinuxGpioError::NoDevice);
        }

        log::debug!("linux_gpio: opening {device} lines {lines:?}");

        let mut config = Config::default();
        for &line in lines {
            config.with_line(line).as_input();
        }
        let request = Request::from_config(config)
            .on_chip(device)
            .with_consumer("splasher")
            .request()
            .map_err(LinuxGpioError::LineRequestFailed)?;

        log::info!("linux_gpio: opened {device} with {} lines", lines.len());

        Ok(Self {
            request,
            driven: HashMap::new(),
        })
    }
}

impl PinFacility for CdevPins {
    fn set_direction(&mut self, pin: PinId, direction: Direction) {
        let mut config = Config::default();
        match direction {
            Direction::Input => {
                config.with_line(pin).as_input();
            }
            Direction::Output => {
                let level = self.driven.get(&pin).copied().unwrap_or(Value::Inactive);
                config.with_line(pin).as_output(level);
            }
        }
        if let Err(e) = self.request.reconfigure(&config) {
            log::error!("failed to reconfigure line {pin}: {e}");
        }
    }

    fn write(&mut self, pin: PinId, high: bool) {
        let value = if high { Value::Active } else { Value::Inactive };
        self.driven.insert(pin, value);
        if let Err(e) = self.request.set_value(pin, value) {
            log::error!("failed to set line {pin}: {e}");
        }
    }

    fn read(&mut self, pin: PinId) -> bool {
        match self.request.value(pin) {
            Ok(value) => value == Value::Active,
            Err(e) => {
                log::error!("failed to read line {pin}: {e}");
                false
            }
        }
    }

    fn delay_us(&mut self, us: u32) {
        if us > 0 {
            std::thread::sleep(std::time::Duration::from_micros(us as u64));
        }
    }
}
