//! Averaged raw reads of both axes and the button.

use chrono::{DateTime, Local};

use crate::hal::{AnalogChannel, DigitalInput, HardwareError};

/// One raw reading of the whole stick. Produced fresh per read, never
/// retained by the driver.
#[derive(Debug, Clone)]
pub struct RawSample {
    pub x: u16,
    pub y: u16,
    pub button: bool,
    pub timestamp: DateTime<Local>,
}

/// Owns the two analog channels and the button pin.
///
/// Each axis read is the truncated arithmetic mean of `samples`
/// consecutive conversions. There is no smoothing across calls.
pub struct Sampler<X, Y, B> {
    ch_x: X,
    ch_y: Y,
    button: B,
    samples: u32,
}

impl<X: AnalogChannel, Y: AnalogChannel, B: DigitalInput> Sampler<X, Y, B> {
    pub fn new(ch_x: X, ch_y: Y, button: B, samples: u32) -> Self {
        Self {
            ch_x,
            ch_y,
            button,
            samples: samples.max(1),
        }
    }

    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Averaged reads of both analog channels, in channel order.
    pub fn read_pair(&mut self) -> Result<(u16, u16), HardwareError> {
        let x = average(&mut self.ch_x, self.samples)?;
        let y = average(&mut self.ch_y, self.samples)?;
        Ok((x, y))
    }

    /// One full stick reading: both axes plus the button.
    pub fn read(&mut self) -> Result<RawSample, HardwareError> {
        let (x, y) = self.read_pair()?;
        let button = self.button.is_active()?;
        Ok(RawSample {
            x,
            y,
            button,
            timestamp: Local::now(),
        })
    }

    pub fn read_button(&mut self) -> Result<bool, HardwareError> {
        self.button.is_active()
    }

    /// Gives the channels back, for handing them to another owner after
    /// calibration.
    pub fn into_parts(self) -> (X, Y, B) {
        (self.ch_x, self.ch_y, self.button)
    }
}

fn average(channel: &mut impl AnalogChannel, samples: u32) -> Result<u16, HardwareError> {
    let mut sum: u64 = 0;
    for _ in 0..samples {
        sum += channel.read()? as u64;
    }
    Ok((sum / samples as u64) as u16)
}
