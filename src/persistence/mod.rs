//! # Persistence Module
//!
//! ## Why This Module Exists
//! A calibration is produced once through an interactive procedure and
//! must survive a power cycle; redoing the sweep on every boot would
//! make the driver useless in practice. The contract here is exactly
//! that and nothing more: store one [`DeviceCalibration`] as plain
//! numeric fields, give it back later.
//!
//! ## Key Abstractions
//! - [`CalibrationStore`] — the storage contract. The shipped
//!   implementation is a TOML file ([`FileStore`]), but anything that
//!   can hold a handful of integers works (flash record, environment
//!   blob, ...).
//! - A missing record is `Ok(None)` — calibration simply hasn't run
//!   yet. A present-but-unreadable record is an error, surfaced to the
//!   caller of the calibration routine rather than swallowed; loading
//!   also re-validates the range invariant so a hand-edited file cannot
//!   smuggle in an unusable calibration.

pub mod file_store;

pub use file_store::FileStore;

use thiserror::Error;

use crate::calibration::DeviceCalibration;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to read calibration data: {0}")]
    Read(String),

    #[error("Failed to write calibration data: {0}")]
    Write(String),

    #[error("Calibration data is corrupted: {0}")]
    Corrupted(String),

    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// Anything that can keep a [`DeviceCalibration`] across power cycles.
pub trait CalibrationStore {
    /// `Ok(None)` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<DeviceCalibration>, StoreError>;

    async fn save(&self, calibration: &DeviceCalibration) -> Result<(), StoreError>;
}
