//! Conversion of peak ADC codes into sensor current
//!
//! The TA12-200 transformer steps the measured current down by [`TRANSFORMATION_RATIO`] across
//! a [`SAMPLING_RESISTANCE_OHMS`] burden resistor, so the current through the cable is
//! `V_adc * TRANSFORMATION_RATIO / SAMPLING_RESISTANCE_OHMS`.
use core::fmt;

use crate::sampler::PeakCode;

/// Microamps per amp
pub const MICROAMP: u64 = 1_000_000;
/// Divisor for 12-bit codes
pub const FULL_SCALE_CODE: u64 = 4096;
/// ADC reference voltage of 3.3 V, in millivolts
pub const SUPPLY_MILLIVOLTS: u64 = 3300;
/// Turns ratio of the current transformer
pub const TRANSFORMATION_RATIO: u64 = 2000;
/// Burden resistor on the sensor board
pub const SAMPLING_RESISTANCE_OHMS: u64 = 800;
/// 1000 * sqrt(2), relating the peak of a sine wave to its RMS value
pub const MAXIMUM_AC_VALUE_1000: u64 = 1414;

/// A current in microamps. Never negative.
#[derive(Default, Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Microamps(pub u32);

impl Microamps {
    /// Current value in microamps
    pub fn get(&self) -> u32 {
        self.0
    }

    /// Round half-up to the nearest 100 uA. The result counts tenths of a milliamp.
    ///
    /// Ex. 149 uA -> 1, 150 uA -> 2
    pub fn round_to_100ua(&self) -> u32 {
        self.0.saturating_add(50) / 100
    }
}

impl fmt::Display for Microamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} uA", self.0)
    }
}

/// Instantaneous peak current for a peak code.
///
/// Integer arithmetic in the order
/// `code * (MICROAMP / FULL_SCALE_CODE) * V * TRANSFORMATION_RATIO / SAMPLING_RESISTANCE_OHMS`.
/// The first division truncates to 244 uA per code.
pub fn to_current(peak: PeakCode) -> Microamps {
    let microamps = u64::from(peak.code()) * (MICROAMP / FULL_SCALE_CODE) * SUPPLY_MILLIVOLTS
        * TRANSFORMATION_RATIO
        / (SAMPLING_RESISTANCE_OHMS * 1000);
    Microamps(saturate(microamps))
}

/// Effective (RMS) current for a peak current, assuming a sinusoidal waveform
pub fn to_effective(current: Microamps) -> Microamps {
    Microamps(saturate(u64::from(current.0) * 1000 / MAXIMUM_AC_VALUE_1000))
}

/// Currents past `u32::MAX` uA cannot come from a 12-bit code
fn saturate(microamps: u64) -> u32 {
    u32::try_from(microamps).unwrap_or(u32::MAX)
}
