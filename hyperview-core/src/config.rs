/// Render configuration
///
/// Everything the renderer used to keep as process-wide constants lives
/// here and is handed to the pipeline explicitly. A TOML file may override
/// any subset of the defaults; missing sections and fields keep their defaults.
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GeometryError;
use crate::palette::Palette;
use crate::projection::{Camera, Viewport};
use crate::transform::Transform;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values that parse but cannot be used
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Dimension of the world
    #[serde(default = "default_dimensions")]
    pub dimensions: usize,
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub palette: Palette,
}

fn default_dimensions() -> usize {
    3
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            dimensions: default_dimensions(),
            window: WindowConfig::default(),
            viewport: ViewportConfig::default(),
            camera: CameraConfig::default(),
            palette: Palette::default(),
        }
    }
}

impl RenderConfig {
    /// Load and validate a TOML configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions < 2 {
            return Err(ConfigError::Invalid(format!(
                "dimensions must be at least 2, got {}",
                self.dimensions
            )));
        }
        self.window.tick()?;
        for (name, color) in [("zero", self.palette.zero), ("one", self.palette.one)] {
            if color.iter().any(|c| !(0.0..=1.0).contains(c)) {
                return Err(ConfigError::Invalid(format!(
                    "palette.{} channels must be within [0, 1]",
                    name
                )));
            }
        }
        self.build_camera()
            .map_err(|e| ConfigError::Invalid(format!("camera: {}", e)))?;
        Ok(())
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.dimensions)
    }

    /// Camera at the identity, orbiting as configured
    pub fn build_camera(&self) -> Result<Camera, GeometryError> {
        let [axis1, axis2] = self.camera.orbit_axes;
        Camera::new(self.transform()).with_orbit(
            &self.camera.pivot,
            self.camera.orbit_step,
            (axis1, axis2),
        )
    }

    /// Viewport for a screen of the given size
    ///
    /// Without an explicit offset the origin is placed at the centre of
    /// the screen.
    pub fn build_viewport(&self, width: f64, height: f64) -> Viewport {
        let offset = self
            .viewport
            .offset
            .unwrap_or([width / 2.0, height / 2.0]);
        Viewport::new(self.viewport.scale.to_vec(), offset.to_vec())
    }
}

/// Window and timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Title shown in the status line
    pub caption: String,
    /// Camera updates per second
    pub tick_hz: f64,
}

impl WindowConfig {
    /// Period of one update tick
    pub fn tick(&self) -> Result<Duration, ConfigError> {
        let rate = self.tick_hz;
        if !(rate > 0.0 && rate.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "tick_hz must be positive, got {}",
                rate
            )));
        }
        Duration::try_from_secs_f64(1.0 / rate)
            .map_err(|_| ConfigError::Invalid(format!("tick_hz {} is too small", rate)))
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            caption: "4D".to_string(),
            tick_hz: 60.0,
        }
    }
}

/// Screen mapping for a 2D screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Screen units per unit of perspective-divided coordinate
    pub scale: [f64; 2],
    /// Screen position of the view axis; screen centre when absent
    pub offset: Option<[f64; 2]>,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        // terminal cells are roughly twice as tall as they are wide
        Self {
            scale: [40.0, 20.0],
            offset: None,
        }
    }
}

/// Camera orbit configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Point the camera orbits around
    pub pivot: Vec<f64>,
    /// Orbit angle per tick in radians
    pub orbit_step: f64,
    /// Plane of the orbit
    pub orbit_axes: [usize; 2],
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            pivot: vec![0.5, 0.5, 0.5],
            orbit_step: 0.009,
            orbit_axes: [0, 1],
        }
    }
}
