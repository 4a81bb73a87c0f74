use crate::error::Result;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Board shape and asset location, persisted as TOML. Values are validated
/// at `Board`/`Game` construction, not here, so a bad file fails loudly
/// instead of being silently clamped.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub rows: usize,
    pub cols: usize,
    pub num_mines: usize,
    pub assets_dir: PathBuf,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            rows: 9,
            cols: 9,
            num_mines: 10,
            assets_dir: PathBuf::from("assets"),
        }
    }
}

impl GlobalConfig {
    /// Per-user config file location, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("retrosweeper").join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: GlobalConfig = toml::from_str(&raw)?;
        info!("configuration loaded from {}", path.to_string_lossy());
        Ok(config)
    }

    /// Load the per-user config file, falling back to defaults when the
    /// file is absent or unreadable.
    pub fn load_or_default() -> Self {
        let Some(path) = Self::default_path() else {
            warn!("no user configuration directory, using defaults");
            return Self::default();
        };
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                info!("using default configuration ({e})");
                Self::default()
            },
        }
    }

    /// Pixel dimensions of the drawing surface this configuration needs.
    pub fn surface_size(&self) -> (u32, u32) {
        crate::ui::draw::surface_size(self.rows, self.cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_a_beginner_board() {
        let config = GlobalConfig::default();
        assert_eq!((config.rows, config.cols, config.num_mines), (9, 9, 10));
        assert_eq!(config.surface_size(), (9 * 16, 9 * 16 + 48));
    }

    #[test]
    fn toml_round_trip() {
        let config = GlobalConfig {
            rows: 16,
            cols: 30,
            num_mines: 99,
            assets_dir: PathBuf::from("sprites"),
        };
        let raw = toml::to_string(&config).unwrap();
        let back: GlobalConfig = toml::from_str(&raw).unwrap();
        assert_eq!(back.rows, 16);
        assert_eq!(back.cols, 30);
        assert_eq!(back.num_mines, 99);
        assert_eq!(back.assets_dir, PathBuf::from("sprites"));
    }

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let config: GlobalConfig = toml::from_str("rows = 16").unwrap();
        assert_eq!(config.rows, 16);
        assert_eq!(config.cols, 9);
        assert_eq!(config.num_mines, 10);
    }

    #[test]
    fn loading_a_missing_file_fails() {
        assert!(GlobalConfig::load(Path::new("/nonexistent/config.toml")).is_err());
    }
}
