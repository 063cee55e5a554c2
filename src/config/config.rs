use crate::search::RankingMode;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub behavior: BehaviorConfig,
    pub display: DisplayConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Scheme, host and port of the search backend
    pub base_url: String,

    /// Path of the search endpoint
    pub search_path: String,

    /// Path of the ranking-order endpoint
    pub settings_path: String,

    /// Per-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Ranking mode used until changed in the settings panel (0-3)
    pub default_mode: RankingMode,

    /// Read the backend's ranking order when the app starts
    pub load_order_on_startup: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show the correlation percentage next to each result
    pub show_correlation: bool,

    /// Fraction of the list width a title may use before it is cut
    pub title_width_ratio: f64,

    /// How long popup notifications stay on screen
    pub notification_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, overridden by RUST_LOG
    pub level: String,

    /// Also write logs to a file in the data directory
    pub log_to_file: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            search_path: "/search".to_string(),
            settings_path: "/settings".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            default_mode: RankingMode::default(),
            load_order_on_startup: true,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_correlation: true,
            title_width_ratio: 0.9,
            notification_secs: 9,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_to_file: true,
        }
    }
}

impl Config {
    /// Load config from the default location
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            // Create default config if it doesn't exist
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;
        config.display.title_width_ratio = config.display.title_width_ratio.clamp(0.1, 1.0);
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;

        Ok(())
    }

    /// Get the default config file path
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        Ok(config_dir.join("searchvd").join("config.toml"))
    }

    /// Create a default config file with comments
    pub fn create_default_with_comments() -> String {
        r#"# SearchVD Configuration File
# Location: ~/.config/searchvd/config.toml (Linux)
#           ~/Library/Application Support/searchvd/config.toml (macOS)
#           %APPDATA%\searchvd\config.toml (Windows)

[server]
# Where the search backend listens
base_url = "http://127.0.0.1:8000"
search_path = "/search"
settings_path = "/settings"

# Give up on a request after this many seconds
timeout_secs = 30

[behavior]
# Ranking mode: 0 = term-by-document, 1 = term-by-document + IDF,
#               2 = low-rank (SVD),   3 = low-rank (SVD) + IDF
default_mode = 3

# Ask the backend for its ranking order at startup
load_order_on_startup = true

[display]
# Show the correlation percentage next to each result
show_correlation = true

# Titles are cut at this fraction of the list width
title_width_ratio = 0.9

# Seconds a popup notification stays visible
notification_secs = 9

[logging]
# Log filter (RUST_LOG takes precedence), e.g. "debug" or "searchvd=trace"
level = "info"

# Write logs to a timestamped file in the data directory
log_to_file = true
"#
        .to_string()
    }
}
