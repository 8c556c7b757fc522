//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Output surface defaults.
    pub output: OutputDefaults,

    /// Layout geometry defaults.
    pub layout: LayoutDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default output-surface parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputDefaults {
    /// Output aspect ratio, width component.
    pub aspect_width: u32,

    /// Output aspect ratio, height component.
    pub aspect_height: u32,

    /// Initial output surface width in pixels (height follows the aspect).
    pub surface_width: u32,

    /// Target composed frame rate for the published stream.
    pub fps: u32,

    /// Host refresh rate driving the render loop.
    pub refresh_hz: u32,

    /// Opaque RGBA background the surface is cleared to each tick.
    pub background_rgba: [u8; 4],
}

/// Default layout geometry fractions (all relative to output width or height).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDefaults {
    /// Overlay width as a fraction of output width in picture-in-picture.
    pub pip_width_frac: f64,

    /// Margin between the overlay and the output edge, as a fraction of
    /// output width.
    pub pip_margin_frac: f64,

    /// Half-gutter between split panes, as a fraction of the split axis.
    pub gutter_frac: f64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "duocast=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output: OutputDefaults::default(),
            layout: LayoutDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OutputDefaults {
    fn default() -> Self {
        Self {
            aspect_width: 16,
            aspect_height: 9,
            surface_width: 1280,
            fps: 30,
            refresh_hz: 60,
            background_rgba: [0, 0, 0, 255],
        }
    }
}

impl Default for LayoutDefaults {
    fn default() -> Self {
        Self {
            pip_width_frac: 0.25,
            pip_margin_frac: 0.02,
            gutter_frac: 0.01,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match serde_json::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse config at {:?}: {}", config_path, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("duocast").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sixteen_nine_at_thirty_fps() {
        let config = AppConfig::default();
        assert_eq!(config.output.aspect_width, 16);
        assert_eq!(config.output.aspect_height, 9);
        assert_eq!(config.output.fps, 30);
        assert_eq!(config.output.background_rgba, [0, 0, 0, 255]);
    }

    #[test]
    fn config_round_trips_through_json() {
        let config = AppConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: AppConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.layout.pip_width_frac, config.layout.pip_width_frac);
        assert_eq!(back.output.surface_width, config.output.surface_width);
    }
}
