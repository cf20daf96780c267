//! Measurement cycles and the report line emitted for each
use core::fmt;

#[cfg(feature = "defmt")]
use defmt::debug;

use crate::{
    config::{WindowPlan, FRACTIONAL_DIGITS},
    converter::{to_current, to_effective, Microamps},
    formatter::{format_fixed_decimal, DecimalString},
    sampler::{BurstDriver, PeakCode, Sampler},
};

/// One measurement cycle, ready to print:
///
/// > "3/10: SensorMax= 2048, I max = 4122.6 mA, I eff = 2915.6 mA"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// 1-based index of this cycle
    pub cycle: u32,
    /// Total cycles in the run
    pub total: u32,
    /// Peak code observed in the window
    pub peak: PeakCode,
    /// Peak current
    pub max_current: Microamps,
    /// RMS current estimate
    pub effective_current: Microamps,
    /// `max_current` in milliamps
    pub max_current_ma: DecimalString,
    /// `effective_current` in milliamps
    pub effective_current_ma: DecimalString,
}

impl Report {
    /// Convert and format a window's `peak`
    pub fn new(cycle: u32, total: u32, peak: PeakCode) -> Self {
        let max_current = to_current(peak);
        let effective_current = to_effective(max_current);
        Self {
            cycle,
            total,
            peak,
            max_current,
            effective_current,
            max_current_ma: format_fixed_decimal(max_current.round_to_100ua(), FRACTIONAL_DIGITS),
            effective_current_ma: format_fixed_decimal(
                effective_current.round_to_100ua(),
                FRACTIONAL_DIGITS,
            ),
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}: SensorMax= {}, I max = {} mA, I eff = {} mA",
            self.cycle, self.total, self.peak, self.max_current_ma, self.effective_current_ma
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Report {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "{=u32}/{=u32}: SensorMax= {}, I max = {} mA, I eff = {} mA",
            self.cycle,
            self.total,
            self.peak,
            self.max_current_ma,
            self.effective_current_ma
        )
    }
}

/// Destination for report lines
pub trait ReportSink {
    /// Emit one report. Called once per cycle.
    fn emit(&mut self, report: &Report);
}

impl<F: FnMut(&Report)> ReportSink for F {
    fn emit(&mut self, report: &Report) {
        self(report)
    }
}

/// Run `cycles` measurement windows, emitting a [`Report`] after each
pub fn run_cycles<D, S, const N: usize>(
    sampler: &mut Sampler<D, N>,
    plan: WindowPlan,
    cycles: u32,
    sink: &mut S,
) where
    D: BurstDriver,
    S: ReportSink,
{
    #[cfg(feature = "defmt")]
    debug!("Running {=u32} cycles of {=u32} bursts", cycles, plan.bursts());

    for cycle in 1..=cycles {
        let peak = sampler.measure_peak(plan);
        sink.emit(&Report::new(cycle, cycles, peak));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::ConversionError, sampler::tests::ScriptedDriver};

    fn collect(
        sampler: &mut Sampler<ScriptedDriver, 4>,
        plan: WindowPlan,
        cycles: u32,
    ) -> Vec<Report> {
        let mut reports = Vec::new();
        run_cycles(sampler, plan, cycles, &mut |report: &Report| reports.push(report.clone()));
        reports
    }

    #[test]
    fn mid_scale_window_golden_line() {
        let driver = ScriptedDriver::new(vec![
            Ok(vec![100, 1500, 2048, 900]),
            Ok(vec![2000, 2047, 12, 0]),
        ]);
        let mut sampler = Sampler::new(driver);

        let reports = collect(&mut sampler, WindowPlan::with_bursts(2), 1);
        assert_eq!(reports.len(), 1);
        let report = &reports[0];
        assert_eq!(report.peak.code(), 2048);
        assert_eq!(report.max_current, Microamps(4_122_624));
        assert_eq!(report.effective_current, Microamps(2_915_575));
        assert_eq!(report.max_current_ma, "4122.6");
        assert_eq!(report.effective_current_ma, "2915.6");
        assert_eq!(
            report.to_string(),
            "1/1: SensorMax= 2048, I max = 4122.6 mA, I eff = 2915.6 mA"
        );
    }

    #[test]
    fn failed_window_reports_zero() {
        let driver = ScriptedDriver::new(vec![Err(ConversionError::Overrun); 3]);
        let mut sampler = Sampler::new(driver);

        let reports = collect(&mut sampler, WindowPlan::with_bursts(3), 1);
        assert!(reports[0].peak.is_unset());
        assert_eq!(
            reports[0].to_string(),
            "1/1: SensorMax= 0, I max = 0.0 mA, I eff = 0.0 mA"
        );
    }

    #[test]
    fn runs_every_cycle_in_order() {
        let bursts = (0..10u16).map(|i| Ok(vec![i * 400; 4])).collect();
        let mut sampler = Sampler::new(ScriptedDriver::new(bursts));

        let reports = collect(&mut sampler, WindowPlan::with_bursts(1), 10);
        let cycles: Vec<u32> = reports.iter().map(|r| r.cycle).collect();
        assert_eq!(cycles, (1..=10).collect::<Vec<_>>());
        assert!(reports.iter().all(|r| r.total == 10));
        assert_eq!(reports[9].peak.code(), 3600);
        assert_eq!(reports[9].max_current_ma, "7246.8");
    }

    #[test]
    fn full_scale_line() {
        let report = Report::new(10, 10, PeakCode::new(4095));
        let line: String = report.to_string();
        assert_eq!(line, "10/10: SensorMax= 4095, I max = 8243.2 mA, I eff = 5829.7 mA");
    }
}
