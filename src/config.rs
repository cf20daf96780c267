//! Compile-time configuration for the measurement loop
//!
//! The sensor is a Grove electricity sensor (TA12-200 current transformer) read on GPIO26 /
//! ADC channel 0 of a Raspberry Pi Pico.

/// External high-speed crystal on the pico board is 12Mhz
pub const XOSC_FREQ_HZ: u32 = 12_000_000;
/// ADC clock after [`init_clocks_and_plls`](https://docs.rs/rp2040-hal/latest/rp2040_hal/clocks/fn.init_clocks_and_plls.html),
/// sourced from the USB PLL
pub const ADC_CLOCK_HZ: u32 = 48_000_000;

/// Number of reports printed before the program finishes
pub const NUM_REPORTS: u32 = 10;
/// Time between reports. The whole interval is spent sampling.
pub const REPORT_INTERVAL_MS: u32 = 2_000;
/// Number of samples requested from the ADC driver per burst
pub const SAMPLES_PER_BURST: usize = 16;
/// Free-running sample rate used by [`FifoBurst`](crate::driver::FifoBurst)
pub const FIFO_SAMPLE_RATE_HZ: u32 = 4_000;
/// Bursts timed at startup to size the window for
/// [`OneShotBurst`](crate::driver::OneShotBurst)
pub const CALIBRATION_BURSTS: u32 = 32;
/// Reports are shown in milliamps with one decimal place
pub const FRACTIONAL_DIGITS: u8 = 1;

/// Integral part of the ADC clock divider for a free-running `sample_rate_hz`.
///
/// The RP2040 ADC takes one sample every `1 + int` ADC clock cycles. Ex. 48 MHz at 4 ksamples/s
/// -> sample every 12000 clk cycles -> divider of 11999.
pub const fn fifo_clock_divider(sample_rate_hz: u32) -> u16 {
    let cycles = ADC_CLOCK_HZ / sample_rate_hz;
    if cycles == 0 {
        0
    } else if cycles - 1 > u16::MAX as u32 {
        u16::MAX
    } else {
        (cycles - 1) as u16
    }
}

/// Number of bursts making up one measurement window.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WindowPlan {
    /// Bursts requested per window, never zero
    bursts: u32,
}

impl WindowPlan {
    /// Plan for a driver sampling at a known, fixed rate.
    ///
    /// Ex. a 2 s interval at 4 ksamples/s with 16 samples per burst -> 500 bursts.
    pub const fn from_sample_rate(
        interval_ms: u32,
        sample_rate_hz: u32,
        samples_per_burst: usize,
    ) -> Self {
        let samples = interval_ms as u64 * sample_rate_hz as u64 / 1000;
        Self::clamped(samples / samples_per_burst as u64)
    }

    /// Plan from the measured duration of `timed_bursts` consecutive bursts.
    ///
    /// Used when the driver has no fixed rate and each burst takes as long as the conversions
    /// do.
    pub fn from_burst_timing(interval_ms: u32, elapsed_us: u64, timed_bursts: u32) -> Self {
        let interval_us = u64::from(interval_ms) * 1000;
        let timed_bursts = u64::from(timed_bursts.max(1));
        let per_burst_us = (elapsed_us / timed_bursts).max(1);
        Self::clamped(interval_us / per_burst_us)
    }

    /// Plan for an exact number of bursts (minimum 1)
    pub const fn with_bursts(bursts: u32) -> Self {
        Self::clamped(bursts as u64)
    }

    /// Bursts requested per window
    pub const fn bursts(&self) -> u32 {
        self.bursts
    }

    /// Saturate into `1..=u32::MAX`
    const fn clamped(bursts: u64) -> Self {
        let bursts = if bursts == 0 {
            1
        } else if bursts > u32::MAX as u64 {
            u32::MAX
        } else {
            bursts as u32
        };
        Self { bursts }
    }
}

/// Window used with [`FifoBurst`](crate::driver::FifoBurst)
pub const FIFO_WINDOW: WindowPlan =
    WindowPlan::from_sample_rate(REPORT_INTERVAL_MS, FIFO_SAMPLE_RATE_HZ, SAMPLES_PER_BURST);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_window_spans_report_interval() {
        assert_eq!(FIFO_WINDOW.bursts(), 500);
        assert_eq!(
            FIFO_WINDOW.bursts() as usize * SAMPLES_PER_BURST,
            (REPORT_INTERVAL_MS * FIFO_SAMPLE_RATE_HZ / 1000) as usize
        );
    }

    #[test]
    fn clock_divider_matches_sample_rate() {
        assert_eq!(fifo_clock_divider(4_000), 11_999);
        assert_eq!(fifo_clock_divider(500_000), 95);
        // Too slow for the 16-bit divider
        assert_eq!(fifo_clock_divider(1), u16::MAX);
    }

    #[test]
    fn timed_plan_divides_interval_by_burst_duration() {
        // 32 bursts took 6.4 ms -> 200 us per burst -> 10000 bursts in 2 s
        assert_eq!(WindowPlan::from_burst_timing(2_000, 6_400, 32).bursts(), 10_000);
    }

    #[test]
    fn plans_never_request_zero_bursts() {
        assert_eq!(WindowPlan::from_sample_rate(1, 1, SAMPLES_PER_BURST).bursts(), 1);
        assert_eq!(WindowPlan::from_burst_timing(1, 5_000_000, 1).bursts(), 1);
        assert_eq!(WindowPlan::with_bursts(0).bursts(), 1);
        // Zero elapsed time and zero timed bursts are both tolerated
        assert_eq!(WindowPlan::from_burst_timing(2, 0, 0).bursts(), 2_000);
    }
}
