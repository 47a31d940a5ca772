//! Configuration structs with defaults and RON persistence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use orrery_camera::{CameraConfig, FAR_PLANE, NEAR_PLANE};
use orrery_mesh::SphereParams;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name inside the config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Platform config directory for the viewer, e.g. `~/.config/orrery`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("orrery"))
}

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub scene: SceneConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Linear RGB used to clear the frame.
    pub clear_color: [f64; 3],
    /// Build a full mip chain for body textures.
    pub mipmaps: bool,
}

/// What is drawn and how it moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub earth: EarthConfig,
    pub moon: MoonConfig,
    pub skybox: SkyboxConfig,
    /// Where the camera starts and where reset returns it.
    pub camera_start: [f32; 3],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EarthConfig {
    pub sectors: u32,
    pub stacks: u32,
    /// Spin about the world Y axis in radians per second.
    pub spin_rate: f32,
    pub texture: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MoonConfig {
    pub sectors: u32,
    pub stacks: u32,
    /// Uniform scale relative to the Earth.
    pub scale: f32,
    pub orbit_radius: f32,
    /// Orbital angular speed in radians per second.
    pub orbit_rate: f32,
    pub texture: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SkyboxConfig {
    pub enabled: bool,
    pub sectors: u32,
    pub stacks: u32,
    /// Must stay between the near and far clip planes.
    pub radius: f32,
    pub texture: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Keybinding overrides (action name -> key name).
    pub keybindings: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Start in wireframe mode (needs adapter support).
    pub wireframe_mode: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Orrery".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.0, 0.0, 0.0],
            mipmaps: true,
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            earth: EarthConfig::default(),
            moon: MoonConfig::default(),
            skybox: SkyboxConfig::default(),
            camera_start: [0.0, 0.0, 10.0],
        }
    }
}

impl Default for EarthConfig {
    fn default() -> Self {
        Self {
            sectors: SphereParams::EARTH.sectors,
            stacks: SphereParams::EARTH.stacks,
            spin_rate: 0.5,
            texture: PathBuf::from("assets/textures/earth.jpg"),
        }
    }
}

impl Default for MoonConfig {
    fn default() -> Self {
        Self {
            sectors: SphereParams::MOON.sectors,
            stacks: SphereParams::MOON.stacks,
            scale: 0.27,
            orbit_radius: 3.0,
            orbit_rate: 1.0,
            texture: PathBuf::from("assets/textures/moon.jpg"),
        }
    }
}

impl Default for SkyboxConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sectors: SphereParams::SKYBOX.sectors,
            stacks: SphereParams::SKYBOX.stacks,
            radius: 50.0,
            texture: PathBuf::from("assets/textures/stars.jpg"),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            wireframe_mode: false,
            log_level: "info".to_string(),
        }
    }
}

impl EarthConfig {
    pub fn sphere(&self) -> SphereParams {
        SphereParams::new(1.0, self.sectors, self.stacks)
    }
}

impl MoonConfig {
    pub fn sphere(&self) -> SphereParams {
        SphereParams::new(1.0, self.sectors, self.stacks)
    }
}

impl SkyboxConfig {
    pub fn sphere(&self) -> SphereParams {
        SphereParams::new(1.0, self.sectors, self.stacks)
    }
}

// --- Validation ---

impl Config {
    /// Reject settings that would fail later, while building the scene.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::invalid(
                "window",
                format!("size {}x{} is empty", self.window.width, self.window.height),
            ));
        }

        self.camera
            .validate()
            .map_err(|e| ConfigError::invalid("camera", e))?;

        self.scene
            .earth
            .sphere()
            .validate()
            .map_err(|e| ConfigError::invalid("scene.earth", e))?;
        self.scene
            .moon
            .sphere()
            .validate()
            .map_err(|e| ConfigError::invalid("scene.moon", e))?;
        if self.scene.skybox.enabled {
            self.scene
                .skybox
                .sphere()
                .validate()
                .map_err(|e| ConfigError::invalid("scene.skybox", e))?;
            let radius = self.scene.skybox.radius;
            if !(radius > NEAR_PLANE && radius < FAR_PLANE) {
                return Err(ConfigError::invalid(
                    "scene.skybox.radius",
                    format!("{radius} is outside the clip range ({NEAR_PLANE}, {FAR_PLANE})"),
                ));
            }
        }

        let moon = &self.scene.moon;
        for (setting, value) in [
            ("scene.moon.scale", moon.scale),
            ("scene.moon.orbit_radius", moon.orbit_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::invalid(setting, format!("{value} must be positive")));
            }
        }
        for (setting, value) in [
            ("scene.earth.spin_rate", self.scene.earth.spin_rate),
            ("scene.moon.orbit_rate", moon.orbit_rate),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::invalid(setting, format!("{value} is not finite")));
            }
        }
        if self.scene.camera_start.iter().any(|c| !c.is_finite()) {
            return Err(ConfigError::invalid(
                "scene.camera_start",
                "coordinates must be finite",
            ));
        }
        Ok(())
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(4)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-read the file: `Some(new_config)` if it differs from `self`.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if new_config != *self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
