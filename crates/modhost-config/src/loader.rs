//! Configuration loader.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::schema::Config;

/// Configuration loader with environment variable substitution.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }
        let content = fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from a file, or fall back to defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::NotFound(_)) => Ok(Config::default()),
            other => other,
        }
    }

    /// Load configuration from a string.
    pub fn load_str(content: &str) -> Result<Config, ConfigError> {
        let expanded = Self::expand_env_vars(content)?;
        let mut config: Config = toml::from_str(&expanded)?;
        Self::expand_config_paths(&mut config);
        Ok(config)
    }

    /// Expand environment variables in the format `${VAR}`.
    fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
        let mut result = content.to_string();
        let re = regex::Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let var_value = std::env::var(var_name)
                .map_err(|_| ConfigError::EnvVarNotSet(var_name.to_string()))?;
            result = result.replace(&cap[0], &var_value);
        }

        Ok(result)
    }

    fn expand_config_paths(config: &mut Config) {
        let paths = &mut config.paths;
        for path in [
            &mut paths.data_dir,
            &mut paths.assets_dir,
            &mut paths.modules_dir,
            &mut paths.tenants_dir,
            &mut paths.log_dir,
        ] {
            *path = Self::expand_pathbuf(path);
        }
        for location in config.modules.locations.values_mut() {
            *location = Self::expand_pathbuf(location);
        }
    }

    fn expand_pathbuf(path: &Path) -> PathBuf {
        PathBuf::from(Self::expand_path(&path.to_string_lossy()))
    }

    /// Expand shell-style paths (e.g., `~/.modhost`).
    pub fn expand_path(path: &str) -> String {
        shellexpand::tilde(path).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_empty_config() {
        let config = ConfigLoader::load_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert!(config.modules.enabled.is_empty());
    }

    #[test]
    fn test_load_paths() {
        let content = r#"
            [paths]
            data_dir = "/srv/modhost/data"
            assets_dir = "/srv/modhost/assets"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.paths.data_dir, PathBuf::from("/srv/modhost/data"));
        assert_eq!(config.paths.assets_dir, PathBuf::from("/srv/modhost/assets"));
    }

    #[test]
    fn test_load_modules_section() {
        let content = r#"
            [modules]
            enabled = ["echo", "analytics"]
            disabled = ["broken"]

            [modules.locations]
            echo = "/opt/modules/echo"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert_eq!(config.modules.enabled.len(), 2);
        assert_eq!(config.modules.disabled, vec!["broken".to_string()]);
        assert_eq!(
            config.modules.location_of("echo"),
            Some(&PathBuf::from("/opt/modules/echo"))
        );
    }

    #[test]
    fn test_tilde_paths_are_expanded() {
        let content = r#"
            [paths]
            data_dir = "~/modhost-data"

            [modules.locations]
            echo = "~/echo"
        "#;
        let config = ConfigLoader::load_str(content).unwrap();
        assert!(!config.paths.data_dir.to_string_lossy().starts_with('~'));
        assert!(config.paths.data_dir.ends_with("modhost-data"));
        let echo = config.modules.location_of("echo").unwrap();
        assert!(!echo.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"debug\"").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ConfigLoader::load(Path::new("/nonexistent/path/modhost.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let config = ConfigLoader::load_or_default(Path::new("/nonexistent/modhost.toml")).unwrap();
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_invalid_toml() {
        let result = ConfigLoader::load_str("invalid = [unclosed");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: This test runs in isolation and sets a unique test-only env var
        unsafe {
            std::env::set_var("MODHOST_TEST_CONFIG_VAR", "test_value");
        }
        let content = "value = \"${MODHOST_TEST_CONFIG_VAR}\"";
        let expanded = ConfigLoader::expand_env_vars(content).unwrap();
        assert!(expanded.contains("test_value"));
        unsafe {
            std::env::remove_var("MODHOST_TEST_CONFIG_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_not_set() {
        let content = "value = \"${NONEXISTENT_MODHOST_VAR_12345}\"";
        let result = ConfigLoader::expand_env_vars(content);
        assert!(matches!(result, Err(ConfigError::EnvVarNotSet(_))));
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = ConfigLoader::expand_path("~/test");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("/test"));
    }

    #[test]
    fn test_expand_path_no_tilde() {
        assert_eq!(ConfigLoader::expand_path("/usr/local/bin"), "/usr/local/bin");
    }
}
