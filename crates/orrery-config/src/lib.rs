//! Viewer configuration persisted as RON, with command-line overrides.
//!
//! Every section is `#[serde(default)]`, so older or partial files keep
//! loading as new settings are added, and unknown fields are ignored.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CONFIG_FILE, Config, DebugConfig, EarthConfig, InputConfig, MoonConfig, RenderConfig,
    SceneConfig, SkyboxConfig, WindowConfig, default_config_dir,
};
pub use error::ConfigError;
