// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::*;
use crate::errors::ConfigError;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Harness configuration.
///
/// Every section is optional; a missing file yields the built-in defaults.
///
/// # Example
/// ```yaml
/// logic: ui/app.ui
/// window:
///   width: 1280
///   height: 800
///   title: "Ouroboros"
/// frame_interval_ms: 16
/// log_every: 60
/// script:
///   max_steps: 1000000
/// wasm:
///   fuel:
///     default: 100000000
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Path of the hot-reloaded logic file.
    pub logic: PathBuf,
    pub window: WindowConfig,
    /// Pacing delay between frames; 0 disables pacing.
    pub frame_interval_ms: u64,
    /// Stop after this many frames (headless runs).
    pub max_frames: Option<u64>,
    /// Frames between two summary log lines; 0 disables them.
    pub log_every: u64,
    /// Where the headless engine dumps the latest draw list as JSON.
    pub snapshot: Option<PathBuf>,
    pub script: ScriptConfig,
    pub wasm: WasmConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            logic: PathBuf::from(DEFAULT_LOGIC_PATH),
            window: WindowConfig::default(),
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            max_frames: None,
            log_every: DEFAULT_LOG_EVERY,
            snapshot: None,
            script: ScriptConfig::default(),
            wasm: WasmConfig::default(),
        }
    }
}

impl Config {
    /// Loads the config named by `OUROBOROS_CONFIG`, else `ouroboros.yaml`
    /// if it exists, else the defaults. `OUROBOROS_LOGIC` then overrides the
    /// logic path.
    pub fn discover() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => load_config(PathBuf::from(path))?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => load_config(DEFAULT_CONFIG_FILE)?,
            None => Config::default(),
        };
        if let Some(logic) = std::env::var_os(LOGIC_ENV_VAR) {
            config.logic = PathBuf::from(logic);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.logic.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("logic path must not be empty".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size must be non-zero, got {}x{}",
                self.window.width, self.window.height
            )));
        }
        let fuel = &self.wasm.fuel;
        if fuel.get_minimum() > fuel.get_maximum() {
            return Err(ConfigError::Invalid(format!(
                "wasm fuel minimum {} exceeds maximum {}",
                fuel.get_minimum(),
                fuel.get_maximum()
            )));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Option<Duration> {
        (self.frame_interval_ms > 0).then(|| Duration::from_millis(self.frame_interval_ms))
    }
}

/// Size and title of the engine surface.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WINDOW_WIDTH,
            height: DEFAULT_WINDOW_HEIGHT,
            title: DEFAULT_WINDOW_TITLE.to_string(),
        }
    }
}

/// Limits for the UI script interpreter.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScriptConfig {
    /// Statements and loop iterations allowed per frame.
    pub max_steps: u64,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            max_steps: DEFAULT_SCRIPT_STEPS,
        }
    }
}

/// WASM-specific configuration options.
///
/// # Example
/// ```yaml
/// wasm:
///   fuel:
///     default: 100000000
///     minimum: 1000000
///     maximum: 500000000
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct WasmConfig {
    #[serde(default)]
    pub fuel: FuelConfig,
}

/// Fuel consumption configuration for WASM logic.
///
/// Fuel bounds how many instructions one `render` call may execute, so a
/// looping module traps instead of freezing the frame loop.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct FuelConfig {
    pub default: Option<u64>,
    pub minimum: Option<u64>,
    pub maximum: Option<u64>,
}

impl FuelConfig {
    pub fn get_default(&self) -> u64 {
        self.default.unwrap_or(DEFAULT_FUEL_LEVEL)
    }

    pub fn get_minimum(&self) -> u64 {
        self.minimum.unwrap_or(MIN_FUEL_LEVEL)
    }

    pub fn get_maximum(&self) -> u64 {
        self.maximum.unwrap_or(MAX_FUEL_LEVEL)
    }

    /// Clamps a requested fuel level into `[minimum, maximum]`.
    ///
    /// ```
    /// use the_ouroboros::config::FuelConfig;
    ///
    /// let config = FuelConfig::default();
    /// assert_eq!(config.validate_and_clamp(1_000_000_000), 500_000_000);
    /// ```
    pub fn validate_and_clamp(&self, requested: u64) -> u64 {
        let min = self.get_minimum();
        let max = self.get_maximum();
        if requested < min || requested > max {
            tracing::warn!(requested, min, max, "wasm fuel level out of bounds, clamping");
        }
        requested.clamp(min, max)
    }

    /// The configured default, clamped into bounds.
    pub fn effective(&self) -> u64 {
        self.validate_and_clamp(self.get_default())
    }
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let yaml = r#"
logic: ui/other.ui
window:
  width: 640
  height: 480
  title: Test
frame_interval_ms: 0
max_frames: 10
log_every: 5
snapshot: /tmp/frame.json
script:
  max_steps: 500
wasm:
  fuel:
    default: 200000000
"#;

        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.logic, PathBuf::from("ui/other.ui"));
        assert_eq!(cfg.window.width, 640);
        assert_eq!(cfg.window.title, "Test");
        assert_eq!(cfg.frame_interval(), None);
        assert_eq!(cfg.max_frames, Some(10));
        assert_eq!(cfg.script.max_steps, 500);
        assert_eq!(cfg.wasm.fuel.get_default(), 200_000_000);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.logic, PathBuf::from(DEFAULT_LOGIC_PATH));
        assert_eq!(cfg.frame_interval(), Some(Duration::from_millis(16)));
        assert_eq!(cfg.wasm.fuel.get_default(), 100_000_000);
    }

    #[test]
    fn test_partial_window_keeps_other_defaults() {
        let cfg: Config = serde_yaml::from_str("window:\n  width: 300\n").unwrap();
        assert_eq!(cfg.window.width, 300);
        assert_eq!(cfg.window.height, DEFAULT_WINDOW_HEIGHT);
        assert_eq!(cfg.window.title, DEFAULT_WINDOW_TITLE);
    }

    #[test]
    fn test_validate_rejects_zero_window() {
        let mut cfg = Config::default();
        cfg.window.height = 0;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("window size must be non-zero"));
    }

    #[test]
    fn test_validate_rejects_inverted_fuel_bounds() {
        let mut cfg = Config::default();
        cfg.wasm.fuel.minimum = Some(10);
        cfg.wasm.fuel.maximum = Some(5);
        assert!(matches!(cfg.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_fuel_config_validate_and_clamp() {
        let config = FuelConfig {
            default: Some(100_000_000),
            minimum: Some(10_000_000),
            maximum: Some(200_000_000),
        };

        assert_eq!(config.validate_and_clamp(50_000_000), 50_000_000);
        assert_eq!(config.validate_and_clamp(1_000_000), 10_000_000);
        assert_eq!(config.validate_and_clamp(1_000_000_000), 200_000_000);
        assert_eq!(config.effective(), 100_000_000);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ouroboros.yaml");
        std::fs::write(&path, "logic: ui/counter.wat\nmax_frames: 3\n").unwrap();

        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.logic, PathBuf::from("ui/counter.wat"));
        assert_eq!(cfg.max_frames, Some(3));
    }

    #[test]
    fn test_load_config_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "window: [1, 2").unwrap();

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(matches!(
            load_config(dir.path().join("missing.yaml")),
            Err(ConfigError::Io { .. })
        ));
    }
}
