//! Effect and window configuration.
//!
//! Defaults reproduce the classic effect: a five second lifetime, up to four
//! new triangles per frame, five full turns and an outward drift of two
//! clip-space units. Everything can be overridden from TOML:
//!
//! ```toml
//! [effect]
//! duration = 3.0
//! spawn_rate = 8.0
//!
//! [window]
//! title = "Pinwheel"
//! width = 800
//! height = 800
//! ```

use std::f32::consts::PI;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters shared by every particle of the effect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectConfig {
    /// Lifetime of every particle, in seconds.
    pub duration: f32,
    /// Per-frame spawn count is `floor(spawn_rate * U)`, `U ~ U[0, 1)`.
    pub spawn_rate: f32,
    /// Lower bound of the initial scale.
    pub scale_min: f32,
    /// Upper bound (exclusive) of the initial scale.
    pub scale_max: f32,
    /// Upper bound (exclusive) of the initial rotation, in radians.
    pub max_rotation: f32,
    /// Full turns completed over a lifetime.
    pub turns: f32,
    /// Distance travelled along `direction` by the end of a lifetime.
    pub max_drift: f32,
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            duration: 5.0,
            spawn_rate: 5.0,
            scale_min: 0.03,
            scale_max: 0.08,
            max_rotation: PI,
            turns: 5.0,
            max_drift: 2.0,
        }
    }
}

impl EffectConfig {
    /// Largest number of particles a single frame can spawn.
    pub fn max_spawn_per_frame(&self) -> usize {
        let rate = self.spawn_rate.max(0.0);
        let ceil = rate.ceil();
        if ceil == 0.0 {
            0
        } else {
            ceil as usize - 1
        }
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.duration > 0.0) || !self.duration.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "effect.duration must be a positive number, got {}",
                self.duration
            )));
        }
        if !(self.spawn_rate >= 0.0) || !self.spawn_rate.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "effect.spawn_rate must be non-negative, got {}",
                self.spawn_rate
            )));
        }
        if !(self.scale_min >= 0.0) || self.scale_min > self.scale_max {
            return Err(ConfigError::Invalid(format!(
                "effect.scale_min ({}) must be in [0, scale_max ({})]",
                self.scale_min, self.scale_max
            )));
        }
        Ok(())
    }
}

/// Window and presentation settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// RGBA color the frame is cleared to.
    pub clear_color: [f32; 4],
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Pinwheel".into(),
            width: 1280,
            height: 720,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Complete configuration, as loaded from a TOML file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub effect: EffectConfig,
    pub window: WindowConfig,
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.effect.validate()?;
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        Ok(())
    }
}
