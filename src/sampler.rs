// SPDX-License-Identifier: Apache-2.0

//! Peak detection across a window of ADC bursts
use core::fmt;

#[cfg(feature = "defmt")]
use defmt::warn;
#[cfg(all(feature = "defmt", feature = "trace_bursts"))]
use defmt::trace;

use crate::{config::{WindowPlan, SAMPLES_PER_BURST}, error::ConversionError};

/// Raw 12-bit ADC code, 0-4095
pub type RawSample = u16;

/// Capability to convert one burst of samples from the sensor channel.
///
/// The channel is bound when the driver is constructed; see [`crate::driver`] for the
/// RP2040 variants.
pub trait BurstDriver {
    /// Called once before the first burst of every window
    fn begin_window(&mut self) {}

    /// Fill every slot of `samples` with consecutive conversions.
    ///
    /// On error the contents of `samples` are unspecified and will be discarded.
    fn convert_burst(&mut self, samples: &mut [RawSample]) -> Result<(), ConversionError>;
}

impl<T: BurstDriver + ?Sized> BurstDriver for &mut T {
    fn begin_window(&mut self) {
        (**self).begin_window()
    }

    fn convert_burst(&mut self, samples: &mut [RawSample]) -> Result<(), ConversionError> {
        (**self).convert_burst(samples)
    }
}

/// Maximum code observed within a window.
///
/// Starts unset, below any valid [`RawSample`]. A window in which every burst failed stays
/// unset and is treated as a zero peak by [`PeakCode::code`].
#[derive(Default, Debug, Ord, PartialOrd, Eq, PartialEq, Copy, Clone)]
pub struct PeakCode(Option<RawSample>);

impl PeakCode {
    /// No samples observed yet
    pub const UNSET: Self = Self(None);

    /// Peak of exactly one known code
    pub const fn new(code: RawSample) -> Self {
        Self(Some(code))
    }

    /// Raise the peak to `sample` if it is higher
    pub fn observe(&mut self, sample: RawSample) {
        self.0 = Some(match self.0 {
            Some(peak) => peak.max(sample),
            None => sample,
        });
    }

    /// Observed peak, if any sample was recorded
    pub fn get(&self) -> Option<RawSample> {
        self.0
    }

    /// Observed peak, or 0 if the window produced no samples
    pub fn code(&self) -> RawSample {
        self.0.unwrap_or(0)
    }

    /// True if no sample was recorded
    pub fn is_unset(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Display for PeakCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PeakCode {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{=u16}", self.code())
    }
}

/// Requests bursts from a [`BurstDriver`] and tracks their running maximum.
///
/// Owns the burst buffer, which is reused for every burst of every window.
pub struct Sampler<D, const N: usize = SAMPLES_PER_BURST> {
    /// Source of bursts
    driver: D,
    /// Burst buffer handed to the driver
    samples: [RawSample; N],
    /// Bursts dropped during the most recent window
    last_window_failures: u32,
}

impl<D: BurstDriver, const N: usize> Sampler<D, N> {
    /// Create a sampler around `driver`
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            samples: [0; N],
            last_window_failures: 0,
        }
    }

    /// Run one window of `plan.bursts()` bursts and return the highest code seen.
    ///
    /// A failed burst is logged and skipped without retry; the window continues with the remaining
    /// bursts.
    pub fn measure_peak(&mut self, plan: WindowPlan) -> PeakCode {
        let mut peak = PeakCode::UNSET;
        self.last_window_failures = 0;
        self.driver.begin_window();

        for _burst in 0..plan.bursts() {
            if let Err(_err) = self.driver.convert_burst(&mut self.samples) {
                self.last_window_failures += 1;
                #[cfg(feature = "defmt")]
                warn!(
                    "Burst {=u32}/{=u32} dropped: {}",
                    _burst + 1,
                    plan.bursts(),
                    _err
                );
                continue;
            }

            if let Some(&burst_max) = self.samples.iter().max() {
                peak.observe(burst_max);
                #[cfg(all(feature = "defmt", feature = "trace_bursts"))]
                trace!("Burst {=u32} max {=u16}", _burst + 1, burst_max);
            }
        }

        #[cfg(feature = "defmt")]
        if peak.is_unset() {
            warn!("No samples recorded in window, reporting a zero peak");
        }
        peak
    }

    /// Number of bursts dropped during the most recent [`Sampler::measure_peak`]
    pub fn last_window_failures(&self) -> u32 {
        self.last_window_failures
    }

    /// Access the wrapped driver
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Release the wrapped driver
    pub fn free(self) -> D {
        self.driver
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Replays a fixed sequence of bursts. Once exhausted every burst fails.
    pub(crate) struct ScriptedDriver {
        pub bursts: VecDeque<Result<Vec<RawSample>, ConversionError>>,
        pub windows_started: u32,
    }

    impl ScriptedDriver {
        pub fn new(bursts: Vec<Result<Vec<RawSample>, ConversionError>>) -> Self {
            Self {
                bursts: bursts.into(),
                windows_started: 0,
            }
        }
    }

    impl BurstDriver for ScriptedDriver {
        fn begin_window(&mut self) {
            self.windows_started += 1;
        }

        fn convert_burst(&mut self, samples: &mut [RawSample]) -> Result<(), ConversionError> {
            let burst = self.bursts.pop_front().unwrap_or(Err(ConversionError::Adc))?;
            for (slot, value) in samples.iter_mut().zip(burst.iter().cycle()) {
                *slot = *value;
            }
            Ok(())
        }
    }

    fn burst(values: &[RawSample]) -> Result<Vec<RawSample>, ConversionError> {
        Ok(values.to_vec())
    }

    #[test]
    fn peak_is_maximum_of_all_bursts() {
        let driver = ScriptedDriver::new(vec![
            burst(&[10, 20, 30, 40]),
            burst(&[4000, 0, 12, 7]),
            burst(&[1, 2, 3, 4]),
        ]);
        let mut sampler: Sampler<_, 4> = Sampler::new(driver);

        let peak = sampler.measure_peak(WindowPlan::with_bursts(3));
        assert_eq!(peak.get(), Some(4000));
        assert_eq!(sampler.last_window_failures(), 0);
    }

    #[test]
    fn peak_ignores_burst_order() {
        let bursts = [[5, 900, 3], [2048, 1, 1], [77, 78, 79]];
        let orders = [[0, 1, 2], [2, 1, 0], [1, 2, 0], [2, 0, 1]];

        for order in orders {
            let script = order.iter().map(|&i| burst(&bursts[i])).collect();
            let mut sampler: Sampler<_, 3> = Sampler::new(ScriptedDriver::new(script));
            assert_eq!(sampler.measure_peak(WindowPlan::with_bursts(3)).code(), 2048);
        }
    }

    #[test]
    fn failed_burst_contributes_nothing() {
        let driver = ScriptedDriver::new(vec![
            burst(&[100, 200]),
            Err(ConversionError::Overrun),
            burst(&[150, 50]),
        ]);
        let mut sampler: Sampler<_, 2> = Sampler::new(driver);

        assert_eq!(sampler.measure_peak(WindowPlan::with_bursts(3)).code(), 200);
        assert_eq!(sampler.last_window_failures(), 1);
    }

    #[test]
    fn window_of_failures_is_unset_zero_peak() {
        let mut sampler: Sampler<_> = Sampler::new(ScriptedDriver::new(Vec::new()));

        let peak = sampler.measure_peak(WindowPlan::with_bursts(5));
        assert!(peak.is_unset());
        assert_eq!(peak.code(), 0);
        assert_eq!(sampler.last_window_failures(), 5);
    }

    #[test]
    fn accumulator_resets_every_window() {
        let driver = ScriptedDriver::new(vec![
            burst(&[3000]),
            burst(&[10]),
            burst(&[12]),
            burst(&[11]),
        ]);
        let mut sampler: Sampler<_, 1> = Sampler::new(driver);

        assert_eq!(sampler.measure_peak(WindowPlan::with_bursts(1)).code(), 3000);
        assert_eq!(sampler.measure_peak(WindowPlan::with_bursts(3)).code(), 12);
        assert_eq!(sampler.driver_mut().windows_started, 2);
    }

    #[test]
    fn zero_code_is_a_recorded_peak() {
        let mut sampler: Sampler<_, 2> = Sampler::new(ScriptedDriver::new(vec![burst(&[0, 0])]));

        let peak = sampler.measure_peak(WindowPlan::with_bursts(1));
        assert_eq!(peak, PeakCode::new(0));
        assert!(!peak.is_unset());
    }
}
