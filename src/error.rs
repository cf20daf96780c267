//! Failure taxonomy for the measurement program
use core::fmt;

/// A burst could not be converted. Non-fatal: the burst is dropped from the current window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConversionError {
    /// The ADC reported an error for a conversion
    Adc,
    /// Samples were pushed into the ADC FIFO faster than they were read
    Overrun,
    /// The ADC FIFO was read while empty
    Underrun,
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::Adc => f.write_str("ADC conversion failed"),
            ConversionError::Overrun => f.write_str("ADC FIFO overrun"),
            ConversionError::Underrun => f.write_str("ADC FIFO underrun"),
        }
    }
}

/// Board bring-up failed. Fatal: no measurement cycle is run.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// Peripherals were already taken
    PeripheralsTaken,
    /// Crystal oscillator or PLLs failed to start
    Clocks,
    /// Sensor pin cannot be used as an ADC input
    AdcPin,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::PeripheralsTaken => f.write_str("peripherals have already been taken"),
            InitError::Clocks => f.write_str("unable to initialize clocks and PLLs"),
            InitError::AdcPin => f.write_str("sensor pin is not a valid ADC input"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_readable_messages() {
        assert_eq!(ConversionError::Overrun.to_string(), "ADC FIFO overrun");
        assert_eq!(InitError::Clocks.to_string(), "unable to initialize clocks and PLLs");
    }
}
