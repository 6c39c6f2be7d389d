use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest accepted `ground_width`, in cells.
pub const MAX_GROUND_WIDTH: u32 = 4096;

/// Spawn coordinates must stay within this distance of the origin so every
/// lattice position a ray can reach fits in `i32`.
pub const MAX_SPAWN_COORD: f32 = 1.0e6;

/// Errors from loading or validating a [`PlayerConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("unsupported config extension: {0:?}")]
    UnsupportedFormat(String),
    #[error("invalid config: {field} {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Host-supplied tuning constants for the player and world.
///
/// Distances are in world units (one cell edge = 1.0); speeds and
/// accelerations are per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Horizontal collision radius.
    pub radius: f32,
    /// Vertical extent of the collision band.
    pub height: f32,
    /// Eye height above `position`, used as the targeting ray origin.
    pub eye_offset: f32,
    /// Added to vertical velocity every walking tick. Must be negative.
    pub gravity: f32,
    pub jump_speed: f32,
    pub move_speed: f32,
    pub flight_speed: f32,
    /// Two jump presses closer than this toggle flight.
    pub double_tap_window_ms: u64,
    /// Maximum targeting distance for remove / place.
    pub interaction_range: f32,
    /// Placed cells may not be centred closer than this to the player.
    pub place_clearance: f32,
    /// Edge length of the generated ground plane, in cells.
    pub ground_width: u32,
    pub spawn: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            radius: 0.3,
            height: 1.8,
            eye_offset: 0.0,
            gravity: -0.01,
            jump_speed: 0.2,
            move_speed: 0.1,
            flight_speed: 0.1,
            double_tap_window_ms: 300,
            interaction_range: 6.0,
            place_clearance: 1.5,
            ground_width: 20,
            spawn: Vec3::new(0.0, 2.0, 0.0),
        }
    }
}

impl PlayerConfig {
    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }

    /// Load a config from a `.json`, `.yaml` or `.yml` file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        let config: Self = match ext.as_str() {
            "json" => serde_json::from_str(&text)?,
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            other => return Err(ConfigError::UnsupportedFormat(other.to_string())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the constants the physics relies on.
    ///
    /// The vertical collision band is `(0.1, height - 0.1)`, so `height`
    /// must leave it non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason| Err(ConfigError::Invalid { field, reason });
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return invalid("radius", "must be positive");
        }
        if !(self.height.is_finite() && self.height > 0.2) {
            return invalid("height", "must exceed 0.2");
        }
        if !(self.gravity.is_finite() && self.gravity < 0.0) {
            return invalid("gravity", "must be negative");
        }
        if !(self.jump_speed.is_finite() && self.jump_speed > 0.0) {
            return invalid("jump_speed", "must be positive");
        }
        if !(self.move_speed.is_finite() && self.move_speed >= 0.0) {
            return invalid("move_speed", "must not be negative");
        }
        if !(self.flight_speed.is_finite() && self.flight_speed >= 0.0) {
            return invalid("flight_speed", "must not be negative");
        }
        if !(self.interaction_range.is_finite() && self.interaction_range > 0.0) {
            return invalid("interaction_range", "must be positive");
        }
        if !(self.place_clearance.is_finite() && self.place_clearance >= 0.0) {
            return invalid("place_clearance", "must not be negative");
        }
        if !(1..=MAX_GROUND_WIDTH).contains(&self.ground_width) {
            return invalid("ground_width", "must be between 1 and 4096");
        }
        if !self.spawn.is_finite() || self.spawn.abs().max_element() > MAX_SPAWN_COORD {
            return invalid("spawn", "must be finite and within 1e6 of the origin");
        }
        if !(self.eye_offset.is_finite() && self.eye_offset.abs() <= MAX_SPAWN_COORD) {
            return invalid("eye_offset", "must be finite");
        }
        Ok(())
    }
}
