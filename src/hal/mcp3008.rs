//! MCP3008 backend: both stick axes read through one 10-bit SPI ADC.

use std::sync::{Arc, Mutex};

use rppal::spi::{Bus, Mode, SlaveSelect, Spi};
use tracing::{debug, info};

use super::{AnalogChannel, HardwareError};

/// An MCP3008 ADC on the primary SPI bus.
///
/// The chip is shared between both axis channels, so it lives behind an
/// `Arc<Mutex>` and [`Mcp3008::channel`] hands out per-channel handles.
pub struct Mcp3008 {
    spi: Spi,
}

impl Mcp3008 {
    /// Opens SPI0/CE0 at a clock rate within the MCP3008 spec for 3.3V
    /// operation.
    pub fn new() -> Result<Self, HardwareError> {
        info!("Opening SPI bus for MCP3008");
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, 1_350_000, Mode::Mode0)
            .map_err(|e| HardwareError::Init(e.to_string()))?;
        Ok(Self { spi })
    }

    /// Runs a single conversion on `channel` and scales the 10-bit
    /// result to the 16-bit range the driver works in.
    pub fn read_channel(&mut self, channel: u8) -> Result<u16, HardwareError> {
        if channel > 7 {
            return Err(HardwareError::InvalidChannel(channel));
        }

        // Start bit, single-ended mode, channel select (datasheet 6.1).
        let tx = [0x01, 0x80 | (channel << 4), 0x00];
        let mut rx = [0u8; 3];
        self.spi
            .transfer(&mut rx, &tx)
            .map_err(|e| HardwareError::ChannelRead {
                channel,
                reason: e.to_string(),
            })?;

        let raw = (((rx[1] & 0x03) as u16) << 8) | rx[2] as u16;
        debug!("MCP3008 channel {} raw conversion: {}", channel, raw);
        Ok(raw << 6)
    }

    /// Creates a handle for one channel of a shared ADC.
    pub fn channel(
        adc: &Arc<Mutex<Mcp3008>>,
        channel: u8,
    ) -> Result<Mcp3008Channel, HardwareError> {
        if channel > 7 {
            return Err(HardwareError::InvalidChannel(channel));
        }
        Ok(Mcp3008Channel {
            adc: Arc::clone(adc),
            channel,
        })
    }
}

/// One channel of a shared [`Mcp3008`].
pub struct Mcp3008Channel {
    adc: Arc<Mutex<Mcp3008>>,
    channel: u8,
}

impl AnalogChannel for Mcp3008Channel {
    fn read(&mut self) -> Result<u16, HardwareError> {
        let mut adc = self.adc.lock().map_err(|e| HardwareError::ChannelRead {
            channel: self.channel,
            reason: format!("ADC lock poisoned: {}", e),
        })?;
        adc.read_channel(self.channel)
    }
}
