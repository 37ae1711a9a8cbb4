//! # Calibration Module
//!
//! ## Why This Module Exists
//! Cheap analog sticks are electrically asymmetric: the resting point is
//! rarely mid-scale, the reachable range differs per axis and per unit,
//! and the physical mounting may rotate or mirror the axes entirely.
//! This module owns the data model that corrects for all of that — a
//! per-axis `{center, min, max, inverted}` record plus a device-level
//! axis-swap flag — and the two operations built on it:
//!
//! - [`calibrator`] produces a [`DeviceCalibration`] from a one-time
//!   interactive procedure (centered window, full-range sweep, two
//!   isolated direction probes for orientation detection).
//! - [`normalize`] applies a stored calibration to each raw sample,
//!   yielding a signed unit-range position with deadzone suppression.
//!
//! ## Invariants
//! A calibration is only accepted when each axis satisfies
//! `min + sep <= center <= max - sep` with `sep` at 5% of full scale
//! ([`MIN_SEPARATION`]). Anything tighter means the user never moved the
//! stick, or the center window caught a deflected stick; both make the
//! scale factors meaningless, so validation rejects them instead of
//! producing a joystick that reports garbage directions.
//!
//! Once accepted, a calibration is immutable except by re-running the
//! calibrator. It is persisted through the `persistence` module and
//! loaded once at joystick construction.

pub mod calibrator;
pub mod normalize;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hal::HardwareError;

/// Full scale of the 16-bit raw range the driver works in.
pub const ADC_MAX: u16 = u16::MAX;

/// Required travel between center and each recorded extreme, 5% of full
/// scale.
pub const MIN_SEPARATION: u16 = (ADC_MAX as u32 * 5 / 100) as u16;

/// Semantic axis, after any swap correction. +Y is forward/up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Calibration errors
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("Hardware error during calibration: {0}")]
    Hardware(#[from] HardwareError),

    #[error(
        "Axis {axis:?} range invalid: min={min}, center={center}, max={max} \
         (need at least {separation} counts of travel on both sides)"
    )]
    Range {
        axis: Axis,
        min: u16,
        center: u16,
        max: u16,
        separation: u16,
    },

    #[error("Calibration aborted after {0} failed attempts")]
    Aborted(u32),
}

/// Offset/scale record for one semantic axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisCalibration {
    /// Raw value at rest.
    pub center: u16,
    /// Smallest raw value seen during the sweep.
    pub min: u16,
    /// Largest raw value seen during the sweep.
    pub max: u16,
    /// Whether the raw value decreases towards the positive semantic
    /// direction.
    pub inverted: bool,
}

impl AxisCalibration {
    /// Checks the `min + sep <= center <= max - sep` invariant.
    pub fn validate(&self, axis: Axis) -> Result<(), CalibrationError> {
        let low = self.min.saturating_add(MIN_SEPARATION);
        let high = self.max.saturating_sub(MIN_SEPARATION);
        if self.center < low || self.center > high {
            return Err(CalibrationError::Range {
                axis,
                min: self.min,
                center: self.center,
                max: self.max,
                separation: MIN_SEPARATION,
            });
        }
        Ok(())
    }
}

/// The complete calibration for one stick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceCalibration {
    pub axis_x: AxisCalibration,
    pub axis_y: AxisCalibration,
    /// Whether the physical channel order must be exchanged before the
    /// per-axis records apply.
    pub swapped: bool,
}

impl DeviceCalibration {
    pub fn validate(&self) -> Result<(), CalibrationError> {
        self.axis_x.validate(Axis::X)?;
        self.axis_y.validate(Axis::Y)
    }

    /// A symmetric full-range mapping with no swap or inversion. Handy
    /// for virtual setups and tests; real hardware should be calibrated.
    pub fn identity() -> Self {
        let axis = AxisCalibration {
            center: ADC_MAX / 2,
            min: 0,
            max: ADC_MAX,
            inverted: false,
        };
        Self {
            axis_x: axis,
            axis_y: axis,
            swapped: false,
        }
    }
}
