//! # Scene Configuration
//!
//! Top-level configuration for populating and running a scene: logging,
//! asset paths, asteroid field generation, the robot rig, the skybox and
//! debug toggles. Every section has defaults so a partial file is enough.

use serde::{Deserialize, Serialize};

use super::{Config, ConfigError};
use crate::foundation::math::Vec3;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter passed to the logger when `RUST_LOG` is unset
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Mesh file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Asteroid template meshes; spawned asteroids pick one at random
    pub asteroid_meshes: Vec<String>,
    /// Robot body mesh
    pub robot_body: String,
    /// Robot head mesh
    pub robot_head: String,
    /// Mesh shared by both arms
    pub robot_arm: String,
    /// Mesh shared by both legs
    pub robot_leg: String,
    /// Mesh shared by both eyes
    pub robot_eye: String,
    /// Mesh shared by both antennas
    pub robot_antenna: String,
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asteroid_meshes: vec![
                "resources/models/asteroid_01.obj".to_string(),
                "resources/models/asteroid_02.obj".to_string(),
                "resources/models/asteroid_03.obj".to_string(),
            ],
            robot_body: "resources/models/robot/body.obj".to_string(),
            robot_head: "resources/models/robot/head.obj".to_string(),
            robot_arm: "resources/models/robot/limb.obj".to_string(),
            robot_leg: "resources/models/robot/limb.obj".to_string(),
            robot_eye: "resources/models/robot/eyeball.obj".to_string(),
            robot_antenna: "resources/models/robot/antenna.obj".to_string(),
        }
    }
}

/// Procedural asteroid placement
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsteroidFieldConfig {
    /// Number of asteroids to spawn
    pub count: u32,
    /// RNG seed; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Asteroids spawn inside a cube of this half-size around the origin
    pub spawn_radius: f32,
    /// Smallest uniform scale
    pub min_scale: f32,
    /// Largest uniform scale
    pub max_scale: f32,
    /// Largest speed along each axis, units per second
    pub max_speed: f32,
    /// Largest spin rate, radians per second
    pub max_spin: f32,
}

impl Default for AsteroidFieldConfig {
    fn default() -> Self {
        Self {
            count: 30,
            seed: None,
            spawn_radius: 60.0,
            min_scale: 0.5,
            max_scale: 2.5,
            max_speed: 2.0,
            max_spin: 1.0,
        }
    }
}

/// Robot rig placement and animation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RobotConfig {
    /// Whether the scene contains a robot
    pub enabled: bool,
    /// World position of the robot body
    pub position: [f32; 3],
    /// Peak limb swing in radians
    pub swing_amplitude: f32,
    /// Limb swing angular frequency in radians per second
    pub swing_rate: f32,
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            position: [0.0, 0.0, -10.0],
            swing_amplitude: 0.6,
            swing_rate: 2.0,
        }
    }
}

impl RobotConfig {
    /// Body position as a vector
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position)
    }
}

/// Skybox cube
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyboxConfig {
    /// Whether the scene contains a skybox
    pub enabled: bool,
    /// Uniform scale applied to the unit skybox cube
    pub scale: f32,
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            scale: 500.0,
        }
    }
}

/// Debug toggles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Send bounding box wireframes to the render target each frame
    pub draw_bounds: bool,
    /// Recentre meshes about the midpoint of their extents
    pub recenter_meshes: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            draw_bounds: false,
            recenter_meshes: true,
        }
    }
}

/// # Complete Scene Configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Logging settings
    pub logging: LoggingConfig,
    /// Mesh paths
    pub assets: AssetConfig,
    /// Asteroid field generation
    pub asteroids: AsteroidFieldConfig,
    /// Robot rig
    pub robot: RobotConfig,
    /// Skybox
    pub skybox: SkyboxConfig,
    /// Debug toggles
    pub debug: DebugConfig,
}

impl SceneConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let field = &self.asteroids;
        if field.count > 0 && self.assets.asteroid_meshes.is_empty() {
            return Err(ConfigError::Invalid(
                "asteroids requested but no asteroid meshes configured".to_string(),
            ));
        }
        finite("asteroids.min_scale", field.min_scale)?;
        finite("asteroids.max_scale", field.max_scale)?;
        if !(field.min_scale > 0.0 && field.min_scale <= field.max_scale) {
            return Err(ConfigError::Invalid(format!(
                "asteroid scale range [{}, {}] must be positive and ordered",
                field.min_scale, field.max_scale
            )));
        }
        symmetric_limit("asteroids.spawn_radius", field.spawn_radius)?;
        symmetric_limit("asteroids.max_speed", field.max_speed)?;
        symmetric_limit("asteroids.max_spin", field.max_spin)?;

        for (axis, value) in ["x", "y", "z"].iter().zip(self.robot.position) {
            finite(&format!("robot.position.{axis}"), value)?;
        }
        finite("robot.swing_amplitude", self.robot.swing_amplitude)?;
        finite("robot.swing_rate", self.robot.swing_rate)?;

        finite("skybox.scale", self.skybox.scale)?;
        if self.skybox.enabled && self.skybox.scale <= 0.0 {
            return Err(ConfigError::Invalid("skybox scale must be positive".to_string()));
        }
        Ok(())
    }
}

fn finite(name: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be a finite number, got {value}")))
    }
}

/// A half-width sampled as `-value..=value`; the full width must stay finite
fn symmetric_limit(name: &str, value: f32) -> Result<(), ConfigError> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(ConfigError::Invalid(format!("{name} cannot be negative, got {value}")));
    }
    if !(value * 2.0).is_finite() {
        return Err(ConfigError::Invalid(format!("{name} is too large, got {value}")));
    }
    Ok(())
}

impl Config for SceneConfig {}
