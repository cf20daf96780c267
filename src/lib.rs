//! This [RP2040](https://docs.rs/rp2040-hal) project measures AC current with a
//! [Grove electricity sensor](http://www.seeedstudio.com/wiki/Grove_-_Electricity_Sensor)
//! (TA12-200 current transformer) connected to GPIO26. Every 2 seconds the peak ADC code is
//! converted to the peak and effective current and printed in milliamps, ten times in total.
//!
//! ## Crate features
//!
//! - `rp2040`: The firmware stack (rp2040-hal, defmt over RTT, panic-probe). Required by the
//!   binary crate. Without it the library builds for the host, which is how it is tested.
//! - `defmt`: Library logs for dropped bursts and empty windows. Implied by `rp2040`.
//! - `fifo_driver`: Samples with the ADC FIFO in free-running mode at 4 ksamples/s. See
//!   [`driver::FifoBurst`]. Enabled by default.
//! - `oneshot_driver`: Samples with blocking one-shot conversions, and sizes the window by timing
//!   bursts at startup. See [`driver::OneShotBurst`].
//! - `trace_bursts`: Logs the maximum of every burst. Very noisy!
//!
//! <div class="warning">Features <code>fifo_driver</code> and <code>oneshot_driver</code> are
//! mutually exclusive.</div>
//!
//! ## Pipeline
//!
//! ```
//! use grove_current_monitor::{
//!     config::WindowPlan,
//!     report::{run_cycles, Report},
//!     sampler::{BurstDriver, RawSample, Sampler},
//!     error::ConversionError,
//! };
//!
//! /// Sensor stuck at mid-scale
//! struct MidScale;
//!
//! impl BurstDriver for MidScale {
//!     fn convert_burst(&mut self, samples: &mut [RawSample]) -> Result<(), ConversionError> {
//!         samples.fill(2048);
//!         Ok(())
//!     }
//! }
//!
//! let mut sampler: Sampler<_> = Sampler::new(MidScale);
//! let mut last_line = None;
//! run_cycles(&mut sampler, WindowPlan::with_bursts(4), 2, &mut |report: &Report| {
//!     last_line = Some(report.to_string());
//! });
//! assert_eq!(
//!     last_line.as_deref(),
//!     Some("2/2: SensorMax= 2048, I max = 4122.6 mA, I eff = 2915.6 mA")
//! );
//! ```

// Copyright 2024 Cameron Rodriguez
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg), feature(doc_auto_cfg), feature(doc_cfg_hide))]

pub mod config;
pub mod converter;
pub mod driver;
pub mod error;
pub mod formatter;
pub mod report;
pub mod sampler;

#[cfg(all(feature = "fifo_driver", feature = "oneshot_driver"))]
compile_error!("Features `fifo_driver` and `oneshot_driver` cannot be enabled at the same time in crate grove_current_monitor");
