//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Root directory used for every default path (`~/.modhost`).
pub fn modhost_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".modhost"))
        .unwrap_or_else(|| PathBuf::from(".modhost"))
}

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub modules: ModulesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Filesystem roots shared by the host and its modules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Shared global data root (actions, hooks, module configs).
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Shared global assets root.
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,

    /// Directory holding one installed directory per module.
    #[serde(default = "default_modules_dir")]
    pub modules_dir: PathBuf,

    /// Root of per-tenant data.
    #[serde(default = "default_tenants_dir")]
    pub tenants_dir: PathBuf,

    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            assets_dir: default_assets_dir(),
            modules_dir: default_modules_dir(),
            tenants_dir: default_tenants_dir(),
            log_dir: default_log_dir(),
        }
    }
}

impl PathsConfig {
    /// All paths rooted under a single directory.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            data_dir: root.join("data"),
            assets_dir: root.join("assets"),
            modules_dir: root.join("modules"),
            tenants_dir: root.join("tenants"),
            log_dir: root.join("logs"),
        }
    }

    /// Named paths, for validation and display.
    pub fn entries(&self) -> [(&'static str, &Path); 5] {
        [
            ("paths.data_dir", self.data_dir.as_path()),
            ("paths.assets_dir", self.assets_dir.as_path()),
            ("paths.modules_dir", self.modules_dir.as_path()),
            ("paths.tenants_dir", self.tenants_dir.as_path()),
            ("paths.log_dir", self.log_dir.as_path()),
        ]
    }
}

fn default_data_dir() -> PathBuf {
    modhost_home().join("data")
}

fn default_assets_dir() -> PathBuf {
    modhost_home().join("assets")
}

fn default_modules_dir() -> PathBuf {
    modhost_home().join("modules")
}

fn default_tenants_dir() -> PathBuf {
    modhost_home().join("tenants")
}

fn default_log_dir() -> PathBuf {
    modhost_home().join("logs")
}

/// Module selection and location overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// When non-empty, only these modules are loaded.
    #[serde(default)]
    pub enabled: Vec<String>,

    #[serde(default)]
    pub disabled: Vec<String>,

    /// Installed directory per module, overriding `paths.modules_dir/{name}`.
    #[serde(default)]
    pub locations: HashMap<String, PathBuf>,
}

impl ModulesConfig {
    /// Check whether a module should be loaded. Names compare case-insensitively.
    pub fn is_enabled(&self, name: &str) -> bool {
        let listed = |list: &[String]| list.iter().any(|n| n.eq_ignore_ascii_case(name));
        if listed(&self.disabled) {
            return false;
        }
        self.enabled.is_empty() || listed(&self.enabled)
    }

    /// Location override for a module, looked up case-insensitively.
    pub fn location_of(&self, name: &str) -> Option<&PathBuf> {
        self.locations
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, path)| path)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Also write logs to daily-rotated files under `paths.log_dir`.
    #[serde(default = "default_true")]
    pub file: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
