//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory (or
//! an explicit path), then applies `FILM_LISTS_WORK_DIR` and
//! `FILM_LISTS_LOG_LEVEL` env overrides.

use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::store::file::DEFAULT_FILE_NAME;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Where list data is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// JSON file inside `work_dir`.
    File,
    /// Process memory; everything is lost on exit.
    Memory,
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// File name for the `file` backend, relative to `work_dir`.
    pub file_name: String,
}

/// Fully-resolved configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory for persistent data (already expanded, no `~`).
    pub work_dir: PathBuf,
    pub log_level: String,
    pub storage: StorageConfig,
    /// Film catalog JSON, absolute or relative to `work_dir`.
    pub catalog_path: Option<PathBuf>,
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    app: RawApp,
    #[serde(default)]
    storage: RawStorage,
    #[serde(default)]
    catalog: RawCatalog,
}

#[derive(Deserialize)]
struct RawApp {
    #[serde(default = "default_work_dir")]
    work_dir: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

impl Default for RawApp {
    fn default() -> Self {
        Self { work_dir: default_work_dir(), log_level: default_log_level() }
    }
}

#[derive(Deserialize)]
struct RawStorage {
    #[serde(default = "default_backend")]
    backend: StorageBackend,
    #[serde(default = "default_file_name")]
    file_name: String,
}

impl Default for RawStorage {
    fn default() -> Self {
        Self { backend: default_backend(), file_name: default_file_name() }
    }
}

#[derive(Deserialize, Default)]
struct RawCatalog {
    path: Option<String>,
}

fn default_work_dir() -> String { "~/.film-lists".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_backend() -> StorageBackend { StorageBackend::File }
fn default_file_name() -> String { DEFAULT_FILE_NAME.to_string() }

/// Load config from `config_path`, or `config/default.toml`, then apply
/// env-var overrides. Without an explicit path a missing default file falls
/// back to built-in defaults; an explicit path must exist.
pub fn load(config_path: Option<&str>) -> Result<Config, AppError> {
    let work_dir_override = env::var("FILM_LISTS_WORK_DIR").ok();
    let log_level_override = env::var("FILM_LISTS_LOG_LEVEL").ok();

    let path = match config_path {
        Some(p) => Path::new(p),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Path::new(DEFAULT_CONFIG_PATH),
        None => {
            return Ok(resolve(
                RawConfig::default(),
                work_dir_override.as_deref(),
                log_level_override.as_deref(),
            ));
        }
    };
    load_from(path, work_dir_override.as_deref(), log_level_override.as_deref())
}

/// Internal loader. Accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    if parsed.storage.file_name.trim().is_empty() {
        return Err(AppError::Config("storage.file_name must not be empty".into()));
    }

    Ok(resolve(parsed, work_dir_override, log_level_override))
}

fn resolve(
    parsed: RawConfig,
    work_dir_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Config {
    let work_dir = expand_home(work_dir_override.unwrap_or(&parsed.app.work_dir));
    let log_level = log_level_override.unwrap_or(&parsed.app.log_level).to_string();
    let catalog_path = parsed.catalog.path.map(|p| {
        let path = expand_home(&p);
        if path.is_absolute() { path } else { work_dir.join(path) }
    });

    Config {
        work_dir,
        log_level,
        storage: StorageConfig {
            backend: parsed.storage.backend,
            file_name: parsed.storage.file_name,
        },
        catalog_path,
    }
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" { Some("") } else { path.strip_prefix("~/") };
    match (rest, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}
