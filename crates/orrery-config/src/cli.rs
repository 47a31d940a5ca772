//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Orrery command-line arguments. Values given here override `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "orrery", about = "Real-time Earth and Moon viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Wait for vertical sync when presenting.
    #[arg(long)]
    pub vsync: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Start with wireframe rendering.
    #[arg(long)]
    pub wireframe: bool,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(vsync) = args.vsync {
            self.window.vsync = vsync;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if args.wireframe {
            self.debug.wireframe_mode = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            vsync: Some(false),
            wireframe: true,
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert!(!config.window.vsync);
        assert!(config.debug.wireframe_mode);
        assert_eq!(config.window.height, 720);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_flags() {
        let args = CliArgs::try_parse_from([
            "orrery",
            "--width",
            "800",
            "--fullscreen",
            "true",
            "--log-level",
            "debug",
            "--wireframe",
        ])
        .unwrap();
        assert_eq!(args.width, Some(800));
        assert_eq!(args.fullscreen, Some(true));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.wireframe);
        assert!(args.config.is_none());
    }
}
