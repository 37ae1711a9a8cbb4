//! GPIO backend for the stick button.

use rppal::gpio::{Gpio, InputPin};
use tracing::info;

use super::{DigitalInput, HardwareError};

/// An active-low button on a GPIO pin with the internal pull-up enabled.
pub struct GpioButton {
    pin: InputPin,
}

impl GpioButton {
    /// `pin` is the BCM pin number. The button is expected to short the
    /// pin to ground when pressed.
    pub fn new(pin: u8) -> Result<Self, HardwareError> {
        info!("Configuring button on GPIO {} with pull-up", pin);
        let gpio = Gpio::new().map_err(|e| HardwareError::Init(e.to_string()))?;
        let pin = gpio
            .get(pin)
            .map_err(|e| HardwareError::Init(e.to_string()))?
            .into_input_pullup();
        Ok(Self { pin })
    }
}

impl DigitalInput for GpioButton {
    fn is_active(&mut self) -> Result<bool, HardwareError> {
        // Pulled up, so low means pressed.
        Ok(self.pin.is_low())
    }
}
