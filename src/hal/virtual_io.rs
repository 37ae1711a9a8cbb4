//! Scriptable stand-ins for the hardware backends.
//!
//! A [`VirtualChannel`] returns queued values first and then falls back
//! to a steerable level, which is enough to replay calibration sweeps
//! and drive the event source from tests or from a development machine
//! without the board attached. Handles are `Clone` and share state, so
//! a test can keep a handle and steer the channel while the driver owns
//! the other one.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU16, Ordering};
use std::sync::{Arc, Mutex};

use super::{AnalogChannel, DigitalInput, HardwareError};

/// A fake analog channel fed from a script plus a resting level.
#[derive(Clone)]
pub struct VirtualChannel {
    script: Arc<Mutex<VecDeque<u16>>>,
    level: Arc<AtomicU16>,
    failing: Arc<AtomicBool>,
    channel: u8,
}

impl VirtualChannel {
    pub fn new(channel: u8, level: u16) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            level: Arc::new(AtomicU16::new(level)),
            failing: Arc::new(AtomicBool::new(false)),
            channel,
        }
    }

    /// Queues one value to be returned before the resting level.
    pub fn push(&self, value: u16) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(value);
        }
    }

    /// Queues a run of values in order.
    pub fn push_many(&self, values: &[u16]) {
        if let Ok(mut script) = self.script.lock() {
            script.extend(values.iter().copied());
        }
    }

    /// Changes the level returned once the script is exhausted.
    pub fn set_level(&self, value: u16) {
        self.level.store(value, Ordering::Relaxed);
    }

    /// Makes every following read fail, for error-path tests.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::Relaxed);
    }
}

impl AnalogChannel for VirtualChannel {
    fn read(&mut self) -> Result<u16, HardwareError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(HardwareError::ChannelRead {
                channel: self.channel,
                reason: "simulated failure".to_string(),
            });
        }
        let mut script = self.script.lock().map_err(|e| HardwareError::ChannelRead {
            channel: self.channel,
            reason: format!("script lock poisoned: {}", e),
        })?;
        Ok(script
            .pop_front()
            .unwrap_or_else(|| self.level.load(Ordering::Relaxed)))
    }
}

/// A fake button driven the same way as [`VirtualChannel`].
#[derive(Clone)]
pub struct VirtualButton {
    script: Arc<Mutex<VecDeque<bool>>>,
    level: Arc<AtomicBool>,
}

impl VirtualButton {
    pub fn new(pressed: bool) -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            level: Arc::new(AtomicBool::new(pressed)),
        }
    }

    pub fn push(&self, pressed: bool) {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(pressed);
        }
    }

    pub fn set_pressed(&self, pressed: bool) {
        self.level.store(pressed, Ordering::Relaxed);
    }
}

impl DigitalInput for VirtualButton {
    fn is_active(&mut self) -> Result<bool, HardwareError> {
        let mut script = self
            .script
            .lock()
            .map_err(|e| HardwareError::ButtonRead(format!("script lock poisoned: {}", e)))?;
        Ok(script
            .pop_front()
            .unwrap_or_else(|| self.level.load(Ordering::Relaxed)))
    }
}
