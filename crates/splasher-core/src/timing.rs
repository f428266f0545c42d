//! Timing controller: requested clock rate to physical delay quanta

use crate::device::MAX_CLOCK_KHZ;
use crate::error::{Error, Result};

/// Delay quanta, in microseconds, consumed by the bit-level transport.
///
/// An immutable value: a transport is constructed with its profile, and
/// changing the rate means deriving a new profile. Zero means "no explicit
/// delay" - the transport skips the sleep entirely and runs at host-limited
/// speed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingProfile {
    /// Settle time after driving or sampling the data line, before the clock
    /// rises.
    pub bit_setup_us: u32,
    /// Time the clock spends in each half of its period.
    pub half_period_us: u32,
    /// Gap after each byte and around chip-select edges.
    pub inter_byte_us: u32,
}

impl TimingProfile {
    /// Fastest profile: every delay skipped.
    pub const UNCONSTRAINED: Self = Self {
        bit_setup_us: 0,
        half_period_us: 0,
        inter_byte_us: 0,
    };

    /// Derive the profile for a requested clock rate.
    ///
    /// `khz == 0` selects [`Self::UNCONSTRAINED`]. Rates above
    /// [`MAX_CLOCK_KHZ`] are a configuration error, never silently clamped.
    /// The delay primitive bottoms out at one microsecond, so the half
    /// period floors there; all three quanta currently share the same value.
    pub fn from_khz(khz: u32) -> Result<Self> {
        if khz == 0 {
            return Ok(Self::UNCONSTRAINED);
        }
        if khz > MAX_CLOCK_KHZ {
            return Err(Error::ClockOutOfRange(khz));
        }
        let half_us = (500 / khz).max(1);
        Ok(Self {
            bit_setup_us: half_us,
            half_period_us: half_us,
            inter_byte_us: half_us,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_period_law() {
        for khz in 1..=1000 {
            let profile = TimingProfile::from_khz(khz).unwrap();
            assert_eq!(profile.half_period_us, (500 / khz).max(1), "khz={khz}");
            assert_eq!(profile.bit_setup_us, profile.half_period_us);
            assert_eq!(profile.inter_byte_us, profile.half_period_us);
        }
    }

    #[test]
    fn lower_rate_never_means_shorter_delay() {
        let mut prev = u32::MAX;
        for khz in 1..=1000 {
            let profile = TimingProfile::from_khz(khz).unwrap();
            assert!(profile.half_period_us <= prev, "khz={khz}");
            prev = profile.half_period_us;
        }
    }

    #[test]
    fn zero_selects_unconstrained() {
        assert_eq!(
            TimingProfile::from_khz(0).unwrap(),
            TimingProfile::UNCONSTRAINED
        );
    }

    #[test]
    fn over_limit_is_an_error_not_a_clamp() {
        assert!(matches!(
            TimingProfile::from_khz(1001),
            Err(Error::ClockOutOfRange(1001))
        ));
    }
}
