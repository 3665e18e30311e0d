//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_paths(config, &mut result);
        Self::validate_modules(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_paths(config: &Config, result: &mut ValidationResult) {
        for (name, path) in config.paths.entries() {
            if path.as_os_str().is_empty() {
                result.add_error(ValidationError::new(name, "Path cannot be empty"));
            }
        }

        let paths = &config.paths;
        if !paths.data_dir.as_os_str().is_empty() && paths.data_dir == paths.tenants_dir {
            result.add_error(ValidationError::new(
                "paths.tenants_dir",
                "tenants_dir must differ from data_dir",
            ));
        }

        if !paths.modules_dir.as_os_str().is_empty() && !paths.modules_dir.exists() {
            result.add_warning(ValidationWarning::new(
                "paths.modules_dir",
                format!("Modules directory does not exist: {:?}", paths.modules_dir),
            ));
        }
    }

    fn validate_modules(config: &Config, result: &mut ValidationResult) {
        // Check for conflicts between enabled and disabled
        for name in &config.modules.enabled {
            if config
                .modules
                .disabled
                .iter()
                .any(|d| d.eq_ignore_ascii_case(name))
            {
                result.add_error(ValidationError::new(
                    "modules",
                    format!("Module '{}' is both enabled and disabled", name),
                ));
            }
        }

        for (name, location) in &config.modules.locations {
            if !location.exists() {
                result.add_warning(ValidationWarning::new(
                    format!("modules.locations.{}", name),
                    format!("Module location does not exist: {:?}", location),
                ));
            }
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let level = config.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, LOG_LEVELS
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
