//! Runtime settings, read from an optional TOML file.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::GameError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "INVADERS_CONFIG";
/// Looked up in the working directory when `CONFIG_ENV` is unset.
pub const DEFAULT_CONFIG_FILE: &str = "invaders.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Frames per second of the update/render loop.
    pub fps: u32,
    /// Logical pixels per terminal column.
    pub cell_width: f32,
    /// Logical pixels per terminal row.
    pub cell_height: f32,
    /// Milliseconds a movement key stays held on terminals without release
    /// events.
    pub hold_window_ms: u64,
    /// Seed for enemy sprite selection; random when absent.
    pub seed: Option<u64>,
    /// Log destination; stderr when absent.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,
            cell_width: 10.0,
            cell_height: 20.0,
            hold_window_ms: 150,
            seed: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, GameError> {
        let config: Config = toml::from_str(text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, GameError> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text, path)
    }

    /// `$INVADERS_CONFIG` if set, else `./invaders.toml` if present, else
    /// defaults.
    pub fn load() -> Result<Self, GameError> {
        if let Some(path) = std::env::var_os(CONFIG_ENV) {
            return Self::from_file(Path::new(&path));
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Self::from_file(local);
        }
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.fps == 0 {
            return Err(GameError::InvalidConfig("fps must be at least 1".into()));
        }
        if !(self.cell_width > 0.0 && self.cell_height > 0.0) {
            return Err(GameError::InvalidConfig(
                "cell_width and cell_height must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.fps
    }

    /// `hold_window_ms` in whole frames at `fps`, rounded up, at least one.
    pub fn hold_window_frames(&self) -> u64 {
        let frames = self
            .hold_window_ms
            .saturating_mul(u64::from(self.fps))
            .saturating_add(999)
            / 1000;
        frames.max(1)
    }
}
