//! Interactive calibration procedure.
//!
//! The calibrator records everything needed for a [`DeviceCalibration`]
//! in four phases, all driven through a [`CalibrationUi`] so the text
//! layer stays outside the core:
//!
//! 1. **Centered window** — the stick rests while both channels are
//!    averaged over a fixed window; the means become the centers.
//! 2. **Sweep** — the user moves the stick edge to edge for a fixed
//!    duration while running min/max are tracked per physical channel.
//! 3. **Orientation probes** — the user holds the stick fully forward,
//!    then fully right. During each isolated probe the channel with the
//!    larger deviation from its center is assigned to that semantic
//!    axis; the sign of the deviation decides the inversion flag. A
//!    near-tie is downgraded to a warning and the default orientation
//!    (no swap) is kept, never treated as fatal.
//! 4. **Validation** — each axis must show the minimum separation
//!    between center and both extremes. A rejected range re-prompts the
//!    whole procedure, bounded by `max_attempts`.
//!
//! Persistence is deliberately not part of the procedure; the caller
//! decides where the result goes and sees any write failure directly.
//!
//! Precondition: calibration runs to completion before normal reads
//! start. It is not re-entrant concurrently with reads.

use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use crate::hal::{AnalogChannel, DigitalInput};
use crate::sampler::Sampler;

use super::{Axis, AxisCalibration, CalibrationError, DeviceCalibration, ADC_MAX};

/// Text/confirmation layer for the interactive procedure. The shipped
/// binary implements this over stdin/stdout.
pub trait CalibrationUi {
    /// Shows an instruction that needs no acknowledgement.
    fn instruct(&mut self, text: &str);
    /// Shows an instruction and blocks until the user confirms.
    fn confirm(&mut self, text: &str);
}

/// Calibrator settings
#[derive(Clone, Debug)]
pub struct CalibratorSettings {
    /// Samples in the centered window.
    pub center_samples: u32,
    /// Pause between consecutive samples in every phase.
    pub sample_interval_ms: u64,
    /// How long the sweep phase keeps tracking extrema.
    pub sweep_duration_ms: u64,
    /// Samples averaged per orientation probe.
    pub probe_samples: u32,
    /// Probe deviations closer than this (percent of full scale) count
    /// as ambiguous.
    pub tie_tolerance_percent: f32,
    /// Full-procedure attempts before giving up on a bad range.
    pub max_attempts: u32,
}

impl Default for CalibratorSettings {
    fn default() -> Self {
        Self {
            center_samples: 50,
            sample_interval_ms: 20,
            sweep_duration_ms: 4_000,
            probe_samples: 10,
            tie_tolerance_percent: 5.0,
            max_attempts: 3,
        }
    }
}

/// Running min/max per physical channel during the sweep.
#[derive(Debug, Clone, Copy)]
struct SweepExtents {
    min1: u16,
    max1: u16,
    min2: u16,
    max2: u16,
}

/// Outcome of the two orientation probes.
#[derive(Debug, Clone, Copy)]
struct Orientation {
    swapped: bool,
    invert_x: bool,
    invert_y: bool,
}

/// Drives the interactive procedure over a borrowed [`Sampler`].
pub struct Calibrator<'a, X, Y, B> {
    sampler: &'a mut Sampler<X, Y, B>,
    settings: CalibratorSettings,
}

impl<'a, X: AnalogChannel, Y: AnalogChannel, B: DigitalInput> Calibrator<'a, X, Y, B> {
    pub fn new(sampler: &'a mut Sampler<X, Y, B>, settings: Option<CalibratorSettings>) -> Self {
        let settings = settings.unwrap_or_default();
        info!("Creating calibrator with settings: {:?}", settings);
        Self { sampler, settings }
    }

    /// Runs the full procedure, re-prompting on recoverable range
    /// errors up to the configured attempt limit.
    pub async fn run(&mut self, ui: &mut dyn CalibrationUi) -> Result<DeviceCalibration, CalibrationError> {
        info!("Starting joystick calibration");
        let mut attempt = 1;
        loop {
            match self.run_once(ui).await {
                Ok(calibration) => {
                    info!("Calibration complete: {:?}", calibration);
                    return Ok(calibration);
                }
                Err(CalibrationError::Range {
                    axis,
                    min,
                    center,
                    max,
                    ..
                }) if attempt < self.settings.max_attempts => {
                    warn!(
                        "Attempt {} rejected: axis {:?} range too small (min={}, center={}, max={})",
                        attempt, axis, min, center, max
                    );
                    ui.instruct(
                        "The recorded range was too small. Make sure the stick rests \
                         centered and reaches every edge during the sweep.",
                    );
                    attempt += 1;
                }
                Err(CalibrationError::Range { axis, .. }) => {
                    warn!(
                        "Giving up after {} attempts, axis {:?} never produced a usable range",
                        attempt, axis
                    );
                    return Err(CalibrationError::Aborted(attempt));
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn run_once(
        &mut self,
        ui: &mut dyn CalibrationUi,
    ) -> Result<DeviceCalibration, CalibrationError> {
        ui.confirm("Leave the stick centered and untouched, then press ENTER.");
        let (center1, center2) = self.collect_center().await?;
        debug!("Center readings: channel1={}, channel2={}", center1, center2);

        ui.confirm(
            "Now move the stick in slow full circles, edge to edge, until told to stop. \
             Press ENTER to start.",
        );
        let extents = self.collect_sweep().await?;
        ui.instruct("Done sweeping, you can let go.");
        debug!("Sweep extents: {:?}", extents);

        let orientation = self.probe_orientation(ui, center1, center2).await?;
        self.assemble(center1, center2, extents, orientation)
    }

    async fn collect_center(&mut self) -> Result<(u16, u16), CalibrationError> {
        let n = self.settings.center_samples.max(1);
        let mut sum1: u64 = 0;
        let mut sum2: u64 = 0;
        for _ in 0..n {
            let (a, b) = self.sampler.read_pair()?;
            sum1 += a as u64;
            sum2 += b as u64;
            self.pause().await;
        }
        Ok(((sum1 / n as u64) as u16, (sum2 / n as u64) as u16))
    }

    async fn collect_sweep(&mut self) -> Result<SweepExtents, CalibrationError> {
        let deadline = Instant::now() + Duration::from_millis(self.settings.sweep_duration_ms);
        let mut extents = SweepExtents {
            min1: u16::MAX,
            max1: 0,
            min2: u16::MAX,
            max2: 0,
        };
        loop {
            let (a, b) = self.sampler.read_pair()?;
            extents.min1 = extents.min1.min(a);
            extents.max1 = extents.max1.max(a);
            extents.min2 = extents.min2.min(b);
            extents.max2 = extents.max2.max(b);
            if Instant::now() >= deadline {
                return Ok(extents);
            }
            self.pause().await;
        }
    }

    async fn probe_orientation(
        &mut self,
        ui: &mut dyn CalibrationUi,
        center1: u16,
        center2: u16,
    ) -> Result<Orientation, CalibrationError> {
        let tolerance =
            (ADC_MAX as f32 * self.settings.tie_tolerance_percent / 100.0).round() as i32;

        ui.confirm("Push the stick fully FORWARD (away from you), hold it, then press ENTER.");
        let (f1, f2) = self.probe().await?;
        let dev1 = f1 as i32 - center1 as i32;
        let dev2 = f2 as i32 - center2 as i32;
        debug!("Forward probe deviations: channel1={}, channel2={}", dev1, dev2);

        let swapped = if (dev1.abs() - dev2.abs()).abs() <= tolerance {
            warn!(
                "Both channels moved about the same during the forward probe \
                 (channel1={}, channel2={}), assuming no axis swap",
                dev1, dev2
            );
            ui.instruct("Couldn't tell the axes apart, keeping the default orientation.");
            false
        } else {
            dev1.abs() > dev2.abs()
        };
        // Forward must come out as +Y, so a drop below center on the Y
        // channel means that channel is inverted.
        let invert_y = if swapped { dev1 < 0 } else { dev2 < 0 };

        ui.confirm("Now push the stick fully RIGHT, hold it, then press ENTER.");
        let (r1, r2) = self.probe().await?;
        let (x_dev, off_axis_dev) = if swapped {
            (r2 as i32 - center2 as i32, r1 as i32 - center1 as i32)
        } else {
            (r1 as i32 - center1 as i32, r2 as i32 - center2 as i32)
        };
        debug!(
            "Right probe deviations: x-channel={}, y-channel={}",
            x_dev, off_axis_dev
        );
        if x_dev.abs() + tolerance < off_axis_dev.abs() {
            warn!(
                "Right probe deflected the Y channel more than the X channel \
                 ({} vs {}), keeping the forward-probe assignment",
                off_axis_dev, x_dev
            );
        }
        let invert_x = x_dev < 0;

        let orientation = Orientation {
            swapped,
            invert_x,
            invert_y,
        };
        info!("Orientation detected: {:?}", orientation);
        Ok(orientation)
    }

    /// Averaged snapshot of both channels while the user holds a
    /// direction.
    async fn probe(&mut self) -> Result<(u16, u16), CalibrationError> {
        let n = self.settings.probe_samples.max(1);
        let mut sum1: u64 = 0;
        let mut sum2: u64 = 0;
        for _ in 0..n {
            let (a, b) = self.sampler.read_pair()?;
            sum1 += a as u64;
            sum2 += b as u64;
            self.pause().await;
        }
        Ok(((sum1 / n as u64) as u16, (sum2 / n as u64) as u16))
    }

    fn assemble(
        &self,
        center1: u16,
        center2: u16,
        extents: SweepExtents,
        orientation: Orientation,
    ) -> Result<DeviceCalibration, CalibrationError> {
        let (x_stats, y_stats) = if orientation.swapped {
            (
                (center2, extents.min2, extents.max2),
                (center1, extents.min1, extents.max1),
            )
        } else {
            (
                (center1, extents.min1, extents.max1),
                (center2, extents.min2, extents.max2),
            )
        };
        let axis_x = AxisCalibration {
            center: x_stats.0,
            min: x_stats.1,
            max: x_stats.2,
            inverted: orientation.invert_x,
        };
        let axis_y = AxisCalibration {
            center: y_stats.0,
            min: y_stats.1,
            max: y_stats.2,
            inverted: orientation.invert_y,
        };
        axis_x.validate(Axis::X)?;
        axis_y.validate(Axis::Y)?;
        Ok(DeviceCalibration {
            axis_x,
            axis_y,
            swapped: orientation.swapped,
        })
    }

    async fn pause(&self) {
        sleep(Duration::from_millis(self.settings.sample_interval_ms)).await;
    }
}
