use super::*;
use crate::schema::PathsConfig;
use std::path::PathBuf;

fn valid_config(root: &std::path::Path) -> Config {
    std::fs::create_dir_all(root.join("modules")).unwrap();
    Config {
        paths: PathsConfig::rooted_at(root),
        ..Default::default()
    }
}

#[test]
fn test_validate_rooted_config() {
    let dir = tempfile::tempdir().unwrap();
    let config = valid_config(dir.path());
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_empty_path() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = valid_config(dir.path());
    config.paths.assets_dir = PathBuf::new();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "paths.assets_dir"));
}

#[test]
fn test_validate_tenants_dir_collision() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = valid_config(dir.path());
    config.paths.tenants_dir = config.paths.data_dir.clone();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.errors.iter().any(|e| e.path == "paths.tenants_dir"));
}

#[test]
fn test_validate_missing_modules_dir_warns() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        paths: PathsConfig::rooted_at(&dir.path().join("nowhere")),
        ..Default::default()
    };

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "paths.modules_dir"));
}

#[test]
fn test_validate_module_conflict() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = valid_config(dir.path());
    config.modules.enabled.push("echo".to_string());
    config.modules.disabled.push("Echo".to_string());

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "modules"));
}

#[test]
fn test_validate_missing_location_warns() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = valid_config(dir.path());
    config
        .modules
        .locations
        .insert("echo".to_string(), dir.path().join("missing-echo"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "modules.locations.echo"));
}

#[test]
fn test_validate_unknown_log_level_warns() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = valid_config(dir.path());
    config.logging.level = "verbose".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "logging.level"));
}

#[test]
fn test_validation_result_default() {
    let result = ValidationResult::default();
    assert!(result.is_valid());
    assert!(result.errors.is_empty());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validation_result_add_warning() {
    let mut result = ValidationResult::default();
    result.add_warning(ValidationWarning::new("test", "warning"));
    assert!(result.is_valid()); // Warnings don't make it invalid
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn test_validation_result_add_error() {
    let mut result = ValidationResult::default();
    result.add_error(ValidationError::new("test", "error"));
    assert!(!result.is_valid());
}
