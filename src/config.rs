//! Configuration management for marquee
//!
//! Config is stored at ~/.config/marquee/config.toml. Every field is optional
//! in the file; missing fields take their defaults.
//!
//! Precedence for the catalog and player: CLI flag, then environment
//! (`MARQUEE_CATALOG`, `MARQUEE_PLAYER`), then the config file, then defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::CatalogSource;
use crate::stream::PlayerType;

/// Catalog used when nothing else is configured
pub const DEFAULT_CATALOG: &str = "data/movies.json";

pub const DEFAULT_CARD_WIDTH: u16 = 22;
pub const MIN_CARD_WIDTH: u16 = 12;

const ENV_CATALOG: &str = "MARQUEE_CATALOG";
const ENV_PLAYER: &str = "MARQUEE_PLAYER";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog URL or path
    pub catalog: Option<String>,
    /// External player (mpv, vlc, none)
    pub player: Option<PlayerType>,
    /// Card width in columns
    pub card_width: u16,
    /// Player controls hide after this many ms without activity
    pub controls_timeout_ms: u64,
    /// Arrow-key seek step in the player
    pub seek_step_secs: f64,
    /// Open the hero trailer (muted) once its preview delay has passed
    pub hero_autoplay: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog: None,
            player: None,
            card_width: DEFAULT_CARD_WIDTH,
            controls_timeout_ms: 3000,
            seek_step_secs: 10.0,
            hero_autoplay: false,
        }
    }
}

impl Config {
    /// Get config file path (~/.config/marquee/config.toml)
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("marquee").join("config.toml"))
    }

    /// Load config from file, or return default if not found
    pub fn load() -> Self {
        Self::path().map(|p| Self::load_from(&p)).unwrap_or_default()
    }

    /// Load from an explicit path. Unreadable or invalid files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(text) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::path().ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml = toml::to_string_pretty(self)?;
        std::fs::write(path, toml)?;
        Ok(())
    }

    /// Catalog source with fallback chain:
    /// 1. `--catalog` flag
    /// 2. Environment variable MARQUEE_CATALOG
    /// 3. `catalog` from the config file
    /// 4. [`DEFAULT_CATALOG`]
    pub fn catalog_source(&self, flag: Option<&str>) -> CatalogSource {
        self.catalog_source_with(flag, std::env::var(ENV_CATALOG).ok())
    }

    fn catalog_source_with(&self, flag: Option<&str>, env: Option<String>) -> CatalogSource {
        let chosen = flag
            .map(str::to_owned)
            .or(env.filter(|s| !s.trim().is_empty()))
            .or_else(|| self.catalog.clone())
            .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
        CatalogSource::parse(&chosen)
    }

    /// Player with the same fallback chain as the catalog
    pub fn player_type(&self, flag: Option<PlayerType>) -> PlayerType {
        self.player_type_with(flag, std::env::var(ENV_PLAYER).ok())
    }

    fn player_type_with(&self, flag: Option<PlayerType>, env: Option<String>) -> PlayerType {
        if let Some(player) = flag {
            return player;
        }
        if let Some(name) = env {
            match PlayerType::from_name(&name) {
                Some(player) => return player,
                None => warn!(value = %name, "unknown {}, ignoring", ENV_PLAYER),
            }
        }
        self.player.unwrap_or_default()
    }

    /// Card width, never below [`MIN_CARD_WIDTH`]
    pub fn card_width(&self) -> u16 {
        self.card_width.max(MIN_CARD_WIDTH)
    }

    pub fn controls_timeout(&self) -> Duration {
        Duration::from_millis(self.controls_timeout_ms)
    }

    /// Seek step, falling back to 10s for nonsensical values
    pub fn seek_step(&self) -> f64 {
        if self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0 {
            self.seek_step_secs
        } else {
            10.0
        }
    }
}
