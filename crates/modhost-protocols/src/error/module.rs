//! Module lifecycle errors.

use thiserror::Error;

use super::validation::ValidationError;
use crate::module::ModulePhase;

/// Misuse of the single-use module loading entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigStateError {
    #[error("Module config reader is not initialized: modules have not been loaded yet")]
    NotInitialized,

    #[error("Modules are already loaded: the config reader can only be initialized once")]
    AlreadyLoaded,
}

#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Module '{module}' failed during {phase}: {message}")]
    Callback {
        module: String,
        phase: ModulePhase,
        message: String,
    },

    #[error("Module not registered: {0}")]
    NotRegistered(String),

    #[error(transparent)]
    ConfigurationState(#[from] ConfigStateError),

    #[error("Cannot resolve install path of module '{module}': {message}")]
    PathResolution { module: String, message: String },

    #[error("Failed to materialize {category} of module '{module}': {source}")]
    Materialization {
        module: String,
        category: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid tenant id: '{0}'")]
    InvalidTenant(String),

    #[error("Skill '{skill}' not found on module '{module}'")]
    SkillNotFound { module: String, skill: String },
}

impl ModuleError {
    /// Build a callback failure for the given module and phase.
    pub fn callback(
        module: impl Into<String>,
        phase: ModulePhase,
        message: impl Into<String>,
    ) -> Self {
        Self::Callback {
            module: module.into(),
            phase,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Violation;

    #[test]
    fn test_not_registered_error() {
        let err = ModuleError::NotRegistered("analytics".to_string());
        let display = err.to_string();
        assert!(display.contains("not registered"));
        assert!(display.contains("analytics"));
    }

    #[test]
    fn test_callback_error() {
        let err = ModuleError::callback("echo", ModulePhase::Ready, "boom");
        let display = err.to_string();
        assert!(display.contains("echo"));
        assert!(display.contains("ready"));
        assert!(display.contains("boom"));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let inner = ValidationError::new("m", vec![Violation::new("/name", "is required")]);
        let err = ModuleError::from(inner);
        assert!(err.to_string().starts_with("Invalid manifest for module 'm'"));
    }

    #[test]
    fn test_config_state_errors_are_distinct() {
        let not_init = ModuleError::from(ConfigStateError::NotInitialized);
        let loaded = ModuleError::from(ConfigStateError::AlreadyLoaded);
        assert!(not_init.to_string().contains("not initialized"));
        assert!(loaded.to_string().contains("already loaded"));
        assert!(matches!(
            not_init,
            ModuleError::ConfigurationState(ConfigStateError::NotInitialized)
        ));
    }

    #[test]
    fn test_materialization_error_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = ModuleError::Materialization {
            module: "echo".to_string(),
            category: "assets".to_string(),
            source: io,
        };
        assert!(err.to_string().contains("assets"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_all_error_variants_display() {
        let errors: Vec<ModuleError> = vec![
            ModuleError::NotRegistered("a".to_string()),
            ModuleError::callback("b", ModulePhase::Start, "c"),
            ModuleError::ConfigurationState(ConfigStateError::AlreadyLoaded),
            ModuleError::PathResolution {
                module: "d".to_string(),
                message: "e".to_string(),
            },
            ModuleError::InvalidTenant("../x".to_string()),
            ModuleError::SkillNotFound {
                module: "h".to_string(),
                skill: "i".to_string(),
            },
        ];

        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
