//! [`BurstDriver`] implementations for the RP2040 ADC
//!
//! - [`OneShotBurst`] issues one blocking conversion per sample through the `embedded-hal` 0.2
//!   [`OneShot`] trait. Burst duration depends on conversion time, so the window is sized by
//!   timing a few bursts at startup ([`WindowPlan::from_burst_timing`](crate::config::WindowPlan::from_burst_timing)).
//! - [`FifoBurst`] reads from the ADC FIFO in free-running mode at a fixed sample rate
//!   ([`FIFO_WINDOW`](crate::config::FIFO_WINDOW)). Requires the `rp2040` feature.
use core::marker::PhantomData;

use embedded_hal_0_2::adc::{Channel, OneShot};

use crate::{error::ConversionError, sampler::{BurstDriver, RawSample}};

/// Fills bursts with back-to-back single conversions on one channel
pub struct OneShotBurst<ADC, A, PIN> {
    /// ADC performing the conversions
    adc: A,
    /// Sensor channel
    pin: PIN,
    /// Peripheral `A` converts for
    _adc: PhantomData<ADC>,
}

impl<ADC, A, PIN> OneShotBurst<ADC, A, PIN>
where
    A: OneShot<ADC, u16, PIN>,
    PIN: Channel<ADC>,
{
    /// Bind `adc` to the sensor channel `pin`
    pub fn new(adc: A, pin: PIN) -> Self {
        Self {
            adc,
            pin,
            _adc: PhantomData,
        }
    }

    /// Release the ADC and pin
    pub fn free(self) -> (A, PIN) {
        (self.adc, self.pin)
    }
}

impl<ADC, A, PIN> BurstDriver for OneShotBurst<ADC, A, PIN>
where
    A: OneShot<ADC, u16, PIN>,
    PIN: Channel<ADC>,
{
    fn convert_burst(&mut self, samples: &mut [RawSample]) -> Result<(), ConversionError> {
        for slot in samples.iter_mut() {
            *slot = nb::block!(self.adc.read(&mut self.pin)).map_err(|_| ConversionError::Adc)?;
        }
        Ok(())
    }
}

#[cfg(feature = "rp2040")]
pub use self::fifo::FifoBurst;

#[cfg(feature = "rp2040")]
mod fifo {
    use rp2040_hal::adc::{Adc, AdcFifo};

    use crate::{error::ConversionError, sampler::{BurstDriver, RawSample}};

    /// Reads bursts from the ADC FIFO while it runs in free-running mode.
    ///
    /// The FIFO is only 4 samples deep, so a burst fails with [`ConversionError::Overrun`] if
    /// samples were dropped while it was being read.
    pub struct FifoBurst<'a> {
        /// Started FIFO for the sensor channel
        fifo: AdcFifo<'a, u16>,
    }

    impl<'a> FifoBurst<'a> {
        /// Wrap a started FIFO. Configure the channel and sample rate with
        /// [`Adc::build_fifo`] before calling.
        pub fn new(fifo: AdcFifo<'a, u16>) -> Self {
            Self { fifo }
        }

        /// Stop free-running mode and return the ADC
        pub fn stop(self) -> &'a mut Adc {
            self.fifo.stop()
        }
    }

    impl BurstDriver for FifoBurst<'_> {
        fn begin_window(&mut self) {
            // Samples queued while the previous report was printed belong to no window
            while self.fifo.len() > 0 {
                let _ = self.fifo.read();
            }
            let _ = self.fifo.is_over();
            let _ = self.fifo.is_under();
        }

        fn convert_burst(&mut self, samples: &mut [RawSample]) -> Result<(), ConversionError> {
            for slot in samples.iter_mut() {
                while self.fifo.len() == 0 {}
                *slot = self.fifo.read();
            }

            if self.fifo.is_over() {
                Err(ConversionError::Overrun)
            } else if self.fifo.is_under() {
                Err(ConversionError::Underrun)
            } else {
                Ok(())
            }
        }
    }
}
