// config.rs - Tunable constants for the star field
//
// Defaults reproduce the loading screen exactly. A partial JSON object
// overrides only the fields it names.

use serde::Deserialize;
use std::path::Path;

use crate::error::ConfigError;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Number of stars, fixed for the lifetime of a field.
    pub star_count: usize,
    /// Lateral sampling half-width, x in [-spread_x, spread_x).
    pub spread_x: f64,
    /// Vertical sampling half-height, y in [-spread_y, spread_y).
    pub spread_y: f64,
    /// Far plane. Also the distance added on wrap.
    pub depth: f64,
    /// Stars at or below this depth wrap.
    pub near: f64,
    /// Depth units travelled per elapsed millisecond.
    pub speed: f64,
    /// Perspective scale `k` in `x / (z * k)`.
    pub focal_scale: f64,
    /// Square side in pixels at brightness 1.
    pub max_size: f64,
    pub color: [u8; 3],
    /// Alpha at brightness 1.
    pub max_alpha: f64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            star_count: 3000,
            spread_x: 800.0,
            spread_y: 450.0,
            depth: 1000.0,
            near: 1.0,
            speed: 0.08,
            focal_scale: 0.001,
            max_size: 2.5,
            color: [150, 180, 255],
            max_alpha: 0.9,
        }
    }
}

impl StarfieldConfig {
    /// Upper bound on `star_count`; the field allocates all of them up front.
    pub const MAX_STARS: usize = 1_000_000;

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config = Self::from_json(&text)?;
        log::debug!("loaded starfield config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &str, v: f64) -> Result<(), ConfigError> {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!("{name} must be positive, got {v}")))
            }
        }

        if self.star_count > Self::MAX_STARS {
            return Err(ConfigError::Invalid(format!(
                "star_count must be at most {}, got {}",
                Self::MAX_STARS,
                self.star_count
            )));
        }
        positive("spread_x", self.spread_x)?;
        positive("spread_y", self.spread_y)?;
        positive("depth", self.depth)?;
        positive("focal_scale", self.focal_scale)?;

        if !(self.near >= 0.0 && self.near < self.depth) {
            return Err(ConfigError::Invalid(format!(
                "near must be in [0, {}), got {}",
                self.depth, self.near
            )));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "speed must be non-negative, got {}",
                self.speed
            )));
        }
        if !(self.max_size.is_finite() && self.max_size >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "max_size must be non-negative, got {}",
                self.max_size
            )));
        }
        if !(0.0..=1.0).contains(&self.max_alpha) {
            return Err(ConfigError::Invalid(format!(
                "max_alpha must be in [0, 1], got {}",
                self.max_alpha
            )));
        }
        Ok(())
    }
}
