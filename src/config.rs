use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Status of config file loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLoadStatus {
    /// Config loaded successfully from existing file
    Loaded,
    /// Created default config file (first run)
    Created,
    /// Error occurred during loading, using defaults.
    Error(String),
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Clipboard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    /// How long "已复制" / "复制失败" stays on the copy button.
    pub status_revert_ms: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            status_revert_ms: 800,
        }
    }
}

/// Generation configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Fixed RNG seed. When unset every session draws fresh randomness.
    pub seed: Option<u64>,
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub clipboard: ClipboardConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl Config {
    pub fn copy_status_duration(&self) -> Duration {
        Duration::from_millis(self.clipboard.status_revert_ms)
    }
}

/// Loaded configuration with metadata
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub config_path: PathBuf,
    pub status: ConfigLoadStatus,
}

/// Get the full path to the config file in the platform config directory
pub fn get_config_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "unstuck", "unstuck")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration from file, environment, and defaults.
///
/// An explicit path is read as-is and never created.
pub fn load_config(explicit_path: Option<&Path>) -> LoadedConfig {
    if let Some(path) = explicit_path {
        let (config, status) = load_existing_config(path);
        return LoadedConfig {
            config: apply_env_overrides(config),
            config_path: path.to_path_buf(),
            status,
        };
    }

    let config_path = match get_config_path() {
        Some(path) => path,
        None => {
            warn!("Could not determine config directory, using defaults");
            return LoadedConfig {
                config: apply_env_overrides(Config::default()),
                config_path: PathBuf::from("config.toml"),
                status: ConfigLoadStatus::Error("Could not determine config directory".to_string()),
            };
        }
    };

    debug!("Config path: {:?}", config_path);

    let (config, status) = load_or_create_config(&config_path);

    LoadedConfig {
        config: apply_env_overrides(config),
        config_path,
        status,
    }
}

fn parse_config(contents: &str, config_path: &Path) -> (Config, ConfigLoadStatus) {
    match toml::from_str::<Config>(contents) {
        Ok(config) => {
            info!("Loaded config from {:?}", config_path);
            (config, ConfigLoadStatus::Loaded)
        }
        Err(e) => {
            warn!(
                "Config file malformed at {:?}: {}. Using defaults.",
                config_path, e
            );
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Malformed TOML: {}", e)),
            )
        }
    }
}

fn load_existing_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => parse_config(&contents, config_path),
        Err(e) => {
            warn!(path = ?config_path, error = %e, "config_read_failed");
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Load config from file, or create default if not exists
fn load_or_create_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    match fs::read_to_string(config_path) {
        Ok(contents) => parse_config(&contents, config_path),
        Err(e) if e.kind() == io::ErrorKind::NotFound => create_default_config(config_path),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!(
                "Permission denied reading config at {:?}. Using defaults.",
                config_path
            );
            (
                Config::default(),
                ConfigLoadStatus::Error("Permission denied reading config".to_string()),
            )
        }
        Err(e) => {
            warn!(
                "Error reading config at {:?}: {}. Using defaults.",
                config_path, e
            );
            (
                Config::default(),
                ConfigLoadStatus::Error(format!("Read error: {}", e)),
            )
        }
    }
}

/// Create the default config file
fn create_default_config(config_path: &Path) -> (Config, ConfigLoadStatus) {
    let config = Config::default();

    if let Some(parent) = config_path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!(
            "Could not create config directory {:?}: {}. Continuing without file.",
            parent, e
        );
        return (
            config,
            ConfigLoadStatus::Error(format!("Could not create config directory: {}", e)),
        );
    }

    let toml_content = match toml::to_string_pretty(&config) {
        Ok(s) => s,
        Err(e) => {
            warn!("Could not serialize default config: {}", e);
            return (
                config,
                ConfigLoadStatus::Error(format!("Serialization error: {}", e)),
            );
        }
    };

    match fs::write(config_path, &toml_content) {
        Ok(()) => {
            info!("Created default config at {:?}", config_path);
            (config, ConfigLoadStatus::Created)
        }
        Err(e) => {
            warn!(
                "Could not write default config to {:?}: {}. Continuing without file.",
                config_path, e
            );
            (
                config,
                ConfigLoadStatus::Error(format!("Write error: {}", e)),
            )
        }
    }
}

/// Apply environment variable overrides to config
fn apply_env_overrides(config: Config) -> Config {
    apply_overrides(config, env::var("UNSTUCK_LOG").ok(), env::var("UNSTUCK_SEED").ok())
}

fn apply_overrides(mut config: Config, level: Option<String>, seed: Option<String>) -> Config {
    if let Some(level) = level {
        debug!("Overriding logging.level from UNSTUCK_LOG");
        config.logging.level = level;
    }

    if let Some(seed) = seed {
        match seed.trim().parse::<u64>() {
            Ok(seed) => {
                debug!("Overriding generation.seed from UNSTUCK_SEED");
                config.generation.seed = Some(seed);
            }
            Err(e) => warn!(value = %seed, error = %e, "invalid_seed_override"),
        }
    }

    config
}
