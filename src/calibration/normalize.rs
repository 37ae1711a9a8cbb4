//! Raw-to-normalized mapping.
//!
//! Applies a stored [`DeviceCalibration`] to one raw sample: swap first,
//! then per-axis offset/scale around the calibrated center, then
//! inversion, then deadzone suppression. Each axis is handled
//! independently and clamped to [-1, 1].

use crate::sampler::RawSample;

use super::{AxisCalibration, DeviceCalibration};

/// Stick position in signed unit range. Transient, derived per read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedPosition {
    pub x: f32,
    pub y: f32,
}

/// Maps one raw axis value into [-1, 1] around the calibrated center.
/// No deadzone is applied here.
pub fn normalize_axis(raw: u16, cal: &AxisCalibration) -> f32 {
    let offset = raw as f32 - cal.center as f32;
    let v = if raw >= cal.center {
        let span = cal.max.saturating_sub(cal.center) as f32;
        if span == 0.0 {
            0.0
        } else {
            (offset / span).clamp(0.0, 1.0)
        }
    } else {
        let span = cal.center.saturating_sub(cal.min) as f32;
        if span == 0.0 {
            0.0
        } else {
            (offset / span).clamp(-1.0, 0.0)
        }
    };
    if cal.inverted {
        -v
    } else {
        v
    }
}

/// Full pipeline for one sample. `deadzone` is a fraction of full
/// deflection; magnitudes below it snap to exactly zero, applied per
/// axis after inversion.
pub fn normalize(raw: &RawSample, cal: &DeviceCalibration, deadzone: f32) -> NormalizedPosition {
    let (rx, ry) = if cal.swapped {
        (raw.y, raw.x)
    } else {
        (raw.x, raw.y)
    };
    NormalizedPosition {
        x: snap(normalize_axis(rx, &cal.axis_x), deadzone).clamp(-1.0, 1.0),
        y: snap(normalize_axis(ry, &cal.axis_y), deadzone).clamp(-1.0, 1.0),
    }
}

fn snap(v: f32, deadzone: f32) -> f32 {
    if v.abs() < deadzone {
        0.0
    } else {
        v
    }
}
