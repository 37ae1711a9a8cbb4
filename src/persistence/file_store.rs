//! TOML-backed calibration store.

use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::{debug, info};

use crate::calibration::DeviceCalibration;

use super::{CalibrationStore, StoreError};

/// Stores the calibration as a small TOML document.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `calibration.toml` under the platform configuration directory
    /// (`~/.config/openstick/` on Linux).
    pub fn default_location() -> Result<Self, StoreError> {
        let base = dirs::config_dir().ok_or(StoreError::NoConfigDir)?;
        Ok(Self {
            path: base.join("openstick").join("calibration.toml"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CalibrationStore for FileStore {
    async fn load(&self) -> Result<Option<DeviceCalibration>, StoreError> {
        if !fs::try_exists(&self.path)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?
        {
            debug!("No calibration file at {:?}", self.path);
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| StoreError::Read(e.to_string()))?;
        let calibration: DeviceCalibration =
            toml::from_str(&content).map_err(|e| StoreError::Corrupted(e.to_string()))?;
        calibration
            .validate()
            .map_err(|e| StoreError::Corrupted(e.to_string()))?;
        info!("Loaded calibration from {:?}", self.path);
        Ok(Some(calibration))
    }

    async fn save(&self, calibration: &DeviceCalibration) -> Result<(), StoreError> {
        let content =
            toml::to_string_pretty(calibration).map_err(|e| StoreError::Write(e.to_string()))?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }
        fs::write(&self.path, content)
            .await
            .map_err(|e| StoreError::Write(e.to_string()))?;
        info!("Saved calibration to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{AxisCalibration, DeviceCalibration};
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("openstick-{}-{}", std::process::id(), name))
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let store = FileStore::new(scratch_path("missing/calibration.toml"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let store = FileStore::new(scratch_path("roundtrip/calibration.toml"));
        let calibration = DeviceCalibration {
            axis_x: AxisCalibration {
                center: 31_900,
                min: 1_200,
                max: 64_800,
                inverted: false,
            },
            axis_y: AxisCalibration {
                center: 33_100,
                min: 900,
                max: 65_100,
                inverted: true,
            },
            swapped: true,
        };
        store.save(&calibration).await.unwrap();
        let loaded = store.load().await.unwrap().expect("calibration present");
        assert_eq!(loaded, calibration);
        let _ = tokio::fs::remove_file(store.path()).await;
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error_not_a_panic() {
        let path = scratch_path("corrupt.toml");
        tokio::fs::write(&path, "this is not a calibration").await.unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.load().await, Err(StoreError::Corrupted(_))));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn out_of_range_file_is_rejected_on_load() {
        let path = scratch_path("badrange.toml");
        // syntactically fine, but the center sits on the minimum
        let bad = DeviceCalibration {
            axis_x: AxisCalibration {
                center: 1_000,
                min: 1_000,
                max: 60_000,
                inverted: false,
            },
            axis_y: AxisCalibration {
                center: 32_768,
                min: 0,
                max: 65_535,
                inverted: false,
            },
            swapped: false,
        };
        tokio::fs::write(&path, toml::to_string_pretty(&bad).unwrap())
            .await
            .unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.load().await, Err(StoreError::Corrupted(_))));
        let _ = tokio::fs::remove_file(&path).await;
    }
}
