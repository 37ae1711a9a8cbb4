//! # Hardware Boundary
//!
//! Everything the driver needs from the board is behind two small traits:
//! [`AnalogChannel`] for the two stick axes and [`DigitalInput`] for the
//! button. The shipped backends are the MCP3008 SPI ADC and a GPIO pin
//! with internal pull-up ([`mcp3008`], [`gpio`]), plus a scriptable
//! virtual backend ([`virtual_io`]) for tests and off-target development.
//!
//! Reads are synchronous "convert now" operations with no retry logic.
//! A failing channel surfaces a [`HardwareError`] immediately; the core
//! never substitutes a default value for a failed conversion.

pub mod gpio;
pub mod mcp3008;
pub mod virtual_io;

pub use gpio::GpioButton;
pub use mcp3008::{Mcp3008, Mcp3008Channel};
pub use virtual_io::{VirtualButton, VirtualChannel};

use thiserror::Error;

/// Errors from the hardware layer
#[derive(Debug, Error)]
pub enum HardwareError {
    #[error("Failed to initialize hardware: {0}")]
    Init(String),

    #[error("Failed to read analog channel {channel}: {reason}")]
    ChannelRead { channel: u8, reason: String },

    #[error("Failed to read button pin: {0}")]
    ButtonRead(String),

    #[error("Invalid channel id {0}, the MCP3008 has channels 0-7")]
    InvalidChannel(u8),
}

/// One analog input, full scale 0..=65535.
///
/// A call triggers exactly one conversion. Averaging over several
/// conversions is the sampler's job, not the channel's.
pub trait AnalogChannel {
    fn read(&mut self) -> Result<u16, HardwareError>;
}

/// One digital input. `true` means the button is held.
///
/// The polarity correction for an active-low, pulled-up button lives in
/// the backend, so callers never see raw pin levels.
pub trait DigitalInput {
    fn is_active(&mut self) -> Result<bool, HardwareError>;
}
