//! Viewer configuration
//!
//! Every field has a default, so a config file only needs to name what it
//! changes:
//!
//! ```toml
//! [viewport]
//! scale_step = 0.25
//!
//! [camera]
//! default_distance = 800.0
//! ```

use cloudview_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for the 2D image viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Canvas size in pixels
    pub width: u32,
    pub height: u32,
    /// Relative scale change per wheel notch
    pub scale_step: f32,
    /// Zoom range; the image starts at scale 1
    pub min_scale: f32,
    pub max_scale: f32,
    pub background: [u8; 3],
    pub marker_color: [u8; 3],
    pub marker_radius: u32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            scale_step: 0.1,
            min_scale: 0.01,
            max_scale: 32.0,
            background: [100, 100, 100],
            marker_color: [255, 0, 0],
            marker_radius: 3,
        }
    }
}

/// Settings for the 3D orbit camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub default_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Distance change per wheel notch
    pub zoom_step: f32,
    /// Degrees of yaw/pitch per pixel of drag
    pub orbit_sensitivity: f32,
    /// World units of pan per pixel of drag
    pub pan_sensitivity: f32,
    pub fov_y_deg: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            default_distance: 500.0,
            min_distance: 1.0,
            max_distance: 2000.0,
            zoom_step: 20.0,
            orbit_sensitivity: 1.0,
            pan_sensitivity: 1.0,
            fov_y_deg: 45.0,
            near: 1.0,
            far: 5000.0,
        }
    }
}

/// Settings for the 3D viewer window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub background: [u8; 3],
    pub point_color: [u8; 3],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            background: [0, 0, 0],
            point_color: [255, 255, 255],
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewport: ViewportConfig,
    pub camera: OrbitConfig,
    pub window: WindowConfig,
}

impl ViewerConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded viewer config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the controllers cannot keep their invariants with
    pub fn validate(&self) -> Result<()> {
        let v = &self.viewport;
        if v.width == 0 || v.height == 0 {
            return Err(Error::Config("viewport size must be non-zero".to_string()));
        }
        if !(v.scale_step > 0.0 && v.scale_step < 1.0) {
            return Err(Error::Config(format!(
                "viewport.scale_step must be in (0, 1), got {}",
                v.scale_step
            )));
        }
        if !(v.min_scale > 0.0 && v.min_scale <= 1.0 && v.max_scale >= 1.0 && v.max_scale.is_finite()) {
            return Err(Error::Config(format!(
                "viewport scale range [{}, {}] must contain 1 and stay positive",
                v.min_scale, v.max_scale
            )));
        }

        let c = &self.camera;
        if !(c.min_distance > 0.0 && c.min_distance <= c.max_distance) {
            return Err(Error::Config(format!(
                "camera distance range [{}, {}] is invalid",
                c.min_distance, c.max_distance
            )));
        }
        if !(c.near > 0.0 && c.near < c.far) {
            return Err(Error::Config(format!(
                "camera clip planes near={} far={} are invalid",
                c.near, c.far
            )));
        }
        if !(c.fov_y_deg > 0.0 && c.fov_y_deg < 180.0) {
            return Err(Error::Config(format!("camera.fov_y_deg {} out of range", c.fov_y_deg)));
        }

        let w = &self.window;
        if w.width == 0 || w.height == 0 {
            return Err(Error::Config("window size must be non-zero".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_viewer_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.viewport.width, 800);
        assert_eq!(config.viewport.height, 800);
        assert_eq!(config.viewport.scale_step, 0.1);
        assert!(config.viewport.min_scale > 0.0);
        assert!(config.viewport.max_scale >= 1.0);
        assert_eq!(config.camera.zoom_step, 20.0);
        assert_eq!(config.camera.min_distance, 1.0);
        assert_eq!(config.camera.max_distance, 2000.0);
        assert_eq!(config.camera.fov_y_deg, 45.0);
        assert_eq!(config.camera.near, 1.0);
        assert_eq!(config.camera.far, 5000.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            [viewport]
            scale_step = 0.25

            [camera]
            default_distance = 800.0
            "#,
        )
        .unwrap();

        assert_eq!(config.viewport.scale_step, 0.25);
        assert_eq!(config.viewport.width, 800);
        assert_eq!(config.camera.default_distance, 800.0);
        assert_eq!(config.camera.zoom_step, 20.0);
        assert_eq!(config.window, WindowConfig::default());
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ViewerConfig::from_toml_str("[viewport]\nscale_step = 1.5").is_err());
        assert!(ViewerConfig::from_toml_str("[viewport]\nmin_scale = 0.0").is_err());
        assert!(ViewerConfig::from_toml_str("[viewport]\nmax_scale = 0.5").is_err());
        assert!(ViewerConfig::from_toml_str("[viewport]\nmax_scale = inf").is_err());
        assert!(ViewerConfig::from_toml_str("[camera]\nmin_distance = 0.0").is_err());
        assert!(ViewerConfig::from_toml_str("[camera]\nnear = 10.0\nfar = 5.0").is_err());
        assert!(ViewerConfig::from_toml_str("[window]\nwidth = 0").is_err());
        assert!(ViewerConfig::from_toml_str("not toml at all [").is_err());
    }
}
