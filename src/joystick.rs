//! The event source: polling and suspend-until-event entry points
//! layered over sampler → normalizer → classifier, plus edge-detected
//! button reporting.
//!
//! One `Joystick` owns its two analog channels and the button pin
//! exclusively; constructing a second instance on the same physical
//! pins is out of scope. `wait` is a cooperative task that yields to
//! the scheduler at the poll interval, so dropping the future cancels
//! a pending wait with nothing to clean up.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::{sleep, Instant};
use tracing::{debug, info};

use crate::calibration::normalize::{normalize, NormalizedPosition};
use crate::calibration::DeviceCalibration;
use crate::direction::{classify, Direction};
use crate::hal::{AnalogChannel, DigitalInput, HardwareError};
use crate::sampler::Sampler;

/// Button state derived per read. `changed` marks any edge since the
/// previous read; events are only emitted on the press edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub changed: bool,
}

/// A change in stick direction or a button press edge.
#[derive(Debug, Clone)]
pub struct JoystickEvent {
    pub direction: Direction,
    pub button: ButtonState,
    pub timestamp: DateTime<Local>,
}

/// Joystick settings
#[derive(Clone, Debug)]
pub struct JoystickSettings {
    /// Conversions averaged per axis read.
    pub samples: u32,
    /// Deadzone around center, in percent of full deflection.
    pub deadzone_percent: f32,
    /// Direction activation threshold in percent; `None` couples it to
    /// the deadzone. Overrides below the deadzone are raised to it.
    pub activation_percent: Option<f32>,
    /// Pause between polls in `wait`.
    pub poll_interval_ms: u64,
}

impl Default for JoystickSettings {
    fn default() -> Self {
        Self {
            samples: 3,
            deadzone_percent: 3.0,
            activation_percent: None,
            poll_interval_ms: 10,
        }
    }
}

/// A calibrated two-axis joystick with one button.
pub struct Joystick<X, Y, B> {
    sampler: Sampler<X, Y, B>,
    calibration: DeviceCalibration,
    deadzone: f32,
    activation: f32,
    poll_interval: Duration,
    last_direction: Direction,
    last_button: bool,
}

impl<X: AnalogChannel, Y: AnalogChannel, B: DigitalInput> Joystick<X, Y, B> {
    /// Creates a joystick over its two analog channels and button pin.
    /// The calibration is expected to come from a completed calibration
    /// run (or [`DeviceCalibration::identity`] for virtual setups).
    pub fn new(
        ch_x: X,
        ch_y: Y,
        button: B,
        calibration: DeviceCalibration,
        settings: Option<JoystickSettings>,
    ) -> Self {
        let settings = settings.unwrap_or_default();
        info!("Creating joystick with settings: {:?}", settings);
        let deadzone = settings.deadzone_percent / 100.0;
        let activation = settings
            .activation_percent
            .map(|p| p / 100.0)
            .unwrap_or(deadzone)
            .max(deadzone);
        Self {
            sampler: Sampler::new(ch_x, ch_y, button, settings.samples),
            calibration,
            deadzone,
            activation,
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            last_direction: Direction::Center,
            last_button: false,
        }
    }

    pub fn calibration(&self) -> &DeviceCalibration {
        &self.calibration
    }

    /// Current normalized position, without event gating.
    pub fn position(&mut self) -> Result<NormalizedPosition, HardwareError> {
        let raw = self.sampler.read()?;
        Ok(normalize(&raw, &self.calibration, self.deadzone))
    }

    /// Current direction, without event gating.
    pub fn direction(&mut self) -> Result<Direction, HardwareError> {
        Ok(classify(self.position()?, self.activation))
    }

    /// Instantaneous button state.
    pub fn button(&mut self) -> Result<bool, HardwareError> {
        self.sampler.read_button()
    }

    /// One full sample → normalize → classify pass plus a button read.
    ///
    /// Returns an event only when the direction differs from the
    /// previously reported one or the button saw a press edge; a steady
    /// signal produces `Ok(None)` rather than repeating itself.
    pub fn get(&mut self) -> Result<Option<JoystickEvent>, HardwareError> {
        let raw = self.sampler.read()?;
        let position = normalize(&raw, &self.calibration, self.deadzone);
        let direction = classify(position, self.activation);

        let button_changed = raw.button != self.last_button;
        let press_edge = button_changed && raw.button;
        let direction_changed = direction != self.last_direction;
        self.last_button = raw.button;
        self.last_direction = direction;

        if direction_changed || press_edge {
            let event = JoystickEvent {
                direction,
                button: ButtonState {
                    pressed: raw.button,
                    changed: button_changed,
                },
                timestamp: raw.timestamp,
            };
            debug!("Joystick event: {:?}", event);
            Ok(Some(event))
        } else {
            Ok(None)
        }
    }

    /// Suspends until `get` produces an event, polling at the
    /// configured interval and yielding between polls. With a timeout,
    /// a static input returns `Ok(None)` once the timeout elapses
    /// instead of hanging.
    pub async fn wait(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<Option<JoystickEvent>, HardwareError> {
        let deadline = timeout.map(|t| Instant::now() + t);
        loop {
            if let Some(event) = self.get()? {
                return Ok(Some(event));
            }
            match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        debug!("wait timed out without an event");
                        return Ok(None);
                    }
                    sleep(self.poll_interval.min(deadline - now)).await;
                }
                None => sleep(self.poll_interval).await,
            }
        }
    }

    /// Suspends until the button reads released.
    pub async fn wait_button_release(&mut self) -> Result<(), HardwareError> {
        while self.sampler.read_button()? {
            sleep(self.poll_interval).await;
        }
        Ok(())
    }
}
