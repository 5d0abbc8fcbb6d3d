//! Camera and auto exposure settings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RealCameraError, Result};
use crate::exposure::EV_COMPENSATION_RANGE;
use crate::metering::{MeteringMode, MAX_METERING_GRID, MIN_METERING_GRID};

/// Aperture range in f-stops.
pub const APERTURE_RANGE: (f64, f64) = (0.1, 64.0);
/// Shutter speed range in seconds.
pub const SHUTTER_SPEED_RANGE: (f64, f64) = (0.0001, 100.0);

/// Metering mode selector, independent of the grid/circle counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MeteringKind {
    /// Sample the pixel in the center of the window.
    #[serde(rename = "Center Spot")]
    CenterSpot,
    /// Sample rings of pixels, weighting the ones near the center more.
    #[default]
    #[serde(rename = "Center Weighed")]
    CenterWeighed,
    /// Sample a grid of pixels across the whole window.
    #[serde(rename = "Full Window")]
    FullWindow,
}

/// Per-scene camera settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Whether the physical camera controls are active.
    pub enabled: bool,

    /// Lens aperture in f-stops.
    pub aperture: f64,

    /// Sensor exposure time in seconds.
    pub shutter_speed: f64,

    /// Whether viewport auto exposure is running.
    pub enable_ae: bool,

    /// Active metering mode.
    pub ae_mode: MeteringKind,

    /// Target brightness offset in stops.
    pub ev_compensation: f64,

    /// Ring count for center-weighed metering.
    pub center_grid: u32,

    /// Row and column count for full-window metering.
    pub full_grid: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            aperture: 5.6,
            shutter_speed: 0.5,
            enable_ae: false,
            ae_mode: MeteringKind::CenterWeighed,
            ev_compensation: 0.0,
            center_grid: 4,
            full_grid: 7,
        }
    }
}

impl CameraSettings {
    /// The metering mode with its grid or circle count filled in.
    pub fn metering_mode(&self) -> MeteringMode {
        match self.ae_mode {
            MeteringKind::CenterSpot => MeteringMode::CenterSpot,
            MeteringKind::CenterWeighed => MeteringMode::CenterWeighed {
                circles: self.center_grid,
            },
            MeteringKind::FullWindow => MeteringMode::FullWindow {
                grid: self.full_grid,
            },
        }
    }

    /// Checks every field against its allowed range.
    pub fn validate(&self) -> Result<()> {
        check_range("aperture", self.aperture, APERTURE_RANGE)?;
        check_range("shutter_speed", self.shutter_speed, SHUTTER_SPEED_RANGE)?;
        check_range("ev_compensation", self.ev_compensation, EV_COMPENSATION_RANGE)?;
        let grid_range = (f64::from(MIN_METERING_GRID), f64::from(MAX_METERING_GRID));
        check_range("center_grid", f64::from(self.center_grid), grid_range)?;
        check_range("full_grid", f64::from(self.full_grid), grid_range)?;
        Ok(())
    }

    /// Reads settings from a JSON file and validates them.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| RealCameraError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Writes settings to a JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|source| RealCameraError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn check_range(name: &'static str, value: f64, (min, max): (f64, f64)) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(RealCameraError::InvalidSetting {
            name,
            value,
            min,
            max,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = CameraSettings::default();
        assert!(!settings.enabled);
        assert!(!settings.enable_ae);
        assert_eq!(settings.aperture, 5.6);
        assert_eq!(settings.shutter_speed, 0.5);
        assert_eq!(
            settings.metering_mode(),
            MeteringMode::CenterWeighed { circles: 4 }
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_metering_mode_selection() {
        let mut settings = CameraSettings {
            ae_mode: MeteringKind::FullWindow,
            full_grid: 9,
            ..CameraSettings::default()
        };
        assert_eq!(settings.metering_mode(), MeteringMode::FullWindow { grid: 9 });
        settings.ae_mode = MeteringKind::CenterSpot;
        assert_eq!(settings.metering_mode(), MeteringMode::CenterSpot);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let settings = CameraSettings {
            ev_compensation: 3.5,
            ..CameraSettings::default()
        };
        match settings.validate() {
            Err(RealCameraError::InvalidSetting { name, .. }) => {
                assert_eq!(name, "ev_compensation");
            }
            other => panic!("unexpected result: {other:?}"),
        }

        let settings = CameraSettings {
            full_grid: 1,
            ..CameraSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_json_partial_uses_defaults() {
        let settings: CameraSettings =
            serde_json::from_str(r#"{"enable_ae": true, "ae_mode": "Full Window"}"#).unwrap();
        assert!(settings.enable_ae);
        assert_eq!(settings.metering_mode(), MeteringMode::FullWindow { grid: 7 });
        assert_eq!(settings.aperture, 5.6);
    }

    #[test]
    fn test_json_file_round_trip() {
        let path = std::env::temp_dir().join("realcam_settings_test.json");
        let settings = CameraSettings {
            enable_ae: true,
            ev_compensation: -1.5,
            ..CameraSettings::default()
        };
        settings.save_json(&path).unwrap();
        let loaded = CameraSettings::load_json(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }
}
