//! Prints the peak and effective current seen by a Grove electricity sensor on GPIO26, every
//! 2 seconds for 10 reports.
#![no_std]
#![no_main]
#![doc(html_playground_url = "https://play.rust-lang.org/")]
#![warn(missing_docs)]

use defmt::{debug, error, info};
#[allow(unused_imports)]
use defmt_rtt as _;
#[allow(unused_imports)]
use panic_probe as _;
use grove_current_monitor::{
    config::{NUM_REPORTS, XOSC_FREQ_HZ},
    error::InitError,
    report::{run_cycles, Report},
    sampler::Sampler,
};
use rp2040_hal::{
    adc::AdcPin,
    clocks::init_clocks_and_plls,
    entry,
    gpio::{bank0::Gpio26, FunctionSioInput, Pin, Pins, PullNone},
    pac, Adc, Clock, Sio, Watchdog,
};

#[cfg(not(any(feature = "fifo_driver", feature = "oneshot_driver")))]
compile_error!("Please select one ADC driver feature: `fifo_driver` or `oneshot_driver`");

/// Second-stage bootloader, from [rp2040-boot2](https://docs.rs/rp2040-boot2)
#[link_section = ".boot2"]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_W25Q080;

/// Sensor input, ADC channel 0
type SensorPin = AdcPin<Pin<Gpio26, FunctionSioInput, PullNone>>;

/// Peripherals used after initialization
struct Board {
    /// ADC in one-shot mode
    adc: Adc,
    /// Grove connector A0
    sensor: SensorPin,
    /// Times calibration bursts
    #[cfg(feature = "oneshot_driver")]
    timer: rp2040_hal::Timer,
}

/// Main operation loop
#[entry]
fn main() -> ! {
    info!("Starting: Electricity sensor");

    match init() {
        Ok(board) => {
            info!("Init done");
            measure(board);
            info!("Finished: Electricity sensor");
        }
        Err(err) => error!("Init error: {}", err),
    }

    loop {
        cortex_m::asm::wfi();
    }
}

/// Bring up clocks, the ADC and the sensor pin
fn init() -> Result<Board, InitError> {
    let mut pac = pac::Peripherals::take().ok_or(InitError::PeripheralsTaken)?;
    let mut watchdog = Watchdog::new(pac.WATCHDOG);
    let sio = Sio::new(pac.SIO);

    let clocks = init_clocks_and_plls(
        XOSC_FREQ_HZ,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    )
    .map_err(|_| InitError::Clocks)?;
    debug!(
        "System clock at {=u32} Hz, ADC clock at {=u32} Hz",
        clocks.system_clock.freq().to_Hz(),
        clocks.adc_clock.freq().to_Hz()
    );

    let pins = Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );
    let adc = Adc::new(pac.ADC, &mut pac.RESETS);
    let sensor = AdcPin::new(pins.gpio26.into_floating_input()).map_err(|_| InitError::AdcPin)?;

    Ok(Board {
        adc,
        sensor,
        #[cfg(feature = "oneshot_driver")]
        timer: rp2040_hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks),
    })
}

/// Free-running capture at a fixed rate, so the window size is known ahead of time
#[cfg(feature = "fifo_driver")]
fn measure(mut board: Board) {
    use grove_current_monitor::{
        config::{fifo_clock_divider, FIFO_SAMPLE_RATE_HZ, FIFO_WINDOW},
        driver::FifoBurst,
    };

    let fifo = board
        .adc
        .build_fifo()
        .clock_divider(fifo_clock_divider(FIFO_SAMPLE_RATE_HZ), 0)
        .set_channel(&mut board.sensor)
        .start();
    let mut sampler: Sampler<_> = Sampler::new(FifoBurst::new(fifo));

    debug!("Window plan: {}", FIFO_WINDOW);
    run_cycles(&mut sampler, FIFO_WINDOW, NUM_REPORTS, &mut |report: &Report| {
        info!("{}", report)
    });
    let _adc = sampler.free().stop();
}

/// One-shot conversions, with the window sized from a timed set of calibration bursts
#[cfg(feature = "oneshot_driver")]
fn measure(board: Board) {
    use grove_current_monitor::{
        config::{WindowPlan, CALIBRATION_BURSTS, REPORT_INTERVAL_MS},
        driver::OneShotBurst,
    };

    let Board { adc, sensor, timer } = board;
    let mut sampler: Sampler<_> = Sampler::new(OneShotBurst::<Adc, _, _>::new(adc, sensor));

    let start = timer.get_counter().ticks();
    sampler.measure_peak(WindowPlan::with_bursts(CALIBRATION_BURSTS));
    let elapsed_us = timer.get_counter().ticks() - start;
    let plan = WindowPlan::from_burst_timing(REPORT_INTERVAL_MS, elapsed_us, CALIBRATION_BURSTS);

    debug!(
        "{=u32} calibration bursts took {=u64} us. Window plan: {}",
        CALIBRATION_BURSTS,
        elapsed_us,
        plan
    );
    run_cycles(&mut sampler, plan, NUM_REPORTS, &mut |report: &Report| {
        info!("{}", report)
    });
}
