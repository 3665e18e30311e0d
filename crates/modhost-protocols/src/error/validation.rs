//! Manifest validation errors.

use std::fmt;

use thiserror::Error;

/// A single schema violation found in a module manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON-pointer style location of the offending value (`/name`, `/skills/0/id`).
    pub path: String,
    pub message: String,
}

impl Violation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "/: {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Aggregated validation failure for one module manifest.
///
/// Always carries every violation found, never only the first one.
#[derive(Debug, Clone, Error)]
#[error(
    "Invalid manifest for module '{module}' ({} violation(s)): {}",
    .violations.len(),
    join_violations(.violations)
)]
pub struct ValidationError {
    pub module: String,
    pub violations: Vec<Violation>,
}

impl ValidationError {
    pub fn new(module: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            module: module.into(),
            violations,
        }
    }

    /// Check whether a violation was recorded at the given path.
    pub fn has_violation_at(&self, path: &str) -> bool {
        self.violations.iter().any(|v| v.path == path)
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_violation_display() {
        let v = Violation::new("/name", "is required");
        assert_eq!(v.to_string(), "/name: is required");
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation::new("", "must be an object");
        assert_eq!(v.to_string(), "/: must be an object");
    }

    #[test]
    fn test_validation_error_lists_every_violation() {
        let err = ValidationError::new(
            "broken",
            vec![
                Violation::new("/name", "is required"),
                Violation::new("/onServerStarted", "callback is required"),
            ],
        );
        let display = err.to_string();
        assert!(display.contains("broken"));
        assert!(display.contains("2 violation(s)"));
        assert!(display.contains("/name: is required"));
        assert!(display.contains("/onServerStarted: callback is required"));
    }

    #[test]
    fn test_has_violation_at() {
        let err = ValidationError::new("m", vec![Violation::new("/menuIcon", "bad type")]);
        assert!(err.has_violation_at("/menuIcon"));
        assert!(!err.has_violation_at("/name"));
    }
}
