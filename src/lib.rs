//! # OpenStick
//!
//! Driver for a two-axis analog joystick with a push button, aimed at
//! embedded Linux boards where the stick hangs off an MCP3008 SPI ADC
//! and the button off a GPIO pin.
//!
//! Data flows sampler → normalizer → classifier → event source:
//! averaged raw conversions are corrected by a stored, interactively
//! produced [`DeviceCalibration`] (per-axis offset/scale plus automatic
//! axis-swap/inversion detection for rotated or mirrored mounts),
//! suppressed inside a percentage deadzone, and classified into nine
//! discrete directions. [`Joystick::get`] polls and reports only
//! changes; [`Joystick::wait`] suspends cooperatively until one occurs.
//!
//! ```no_run
//! use std::sync::{Arc, Mutex};
//! use openstick::hal::{GpioButton, Mcp3008};
//! use openstick::persistence::{CalibrationStore, FileStore};
//! use openstick::Joystick;
//!
//! # async fn run() -> color_eyre::Result<()> {
//! let adc = Arc::new(Mutex::new(Mcp3008::new()?));
//! let ch_x = Mcp3008::channel(&adc, 0)?;
//! let ch_y = Mcp3008::channel(&adc, 1)?;
//! let button = GpioButton::new(17)?;
//!
//! let calibration = FileStore::default_location()?
//!     .load()
//!     .await?
//!     .expect("run the calibrate binary first");
//! let mut joystick = Joystick::new(ch_x, ch_y, button, calibration, None);
//!
//! while let Some(event) = joystick.wait(None).await? {
//!     println!("{:?}", event.direction);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Calibration must complete before normal reads start; it is not
//! re-entrant concurrently with reads.

pub mod calibration;
pub mod direction;
pub mod hal;
pub mod joystick;
pub mod persistence;
pub mod sampler;

pub use calibration::calibrator::{CalibrationUi, Calibrator, CalibratorSettings};
pub use calibration::normalize::{normalize, NormalizedPosition};
pub use calibration::{Axis, AxisCalibration, CalibrationError, DeviceCalibration};
pub use direction::{classify, Direction};
pub use hal::HardwareError;
pub use joystick::{ButtonState, Joystick, JoystickEvent, JoystickSettings};
pub use persistence::{CalibrationStore, FileStore, StoreError};
pub use sampler::{RawSample, Sampler};
