//! Host lifecycle errors.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("Cannot {action} host from state: {state}")]
    InvalidState { action: &'static str, state: String },

    #[error("Lifecycle hook '{hook}' failed to start: {message}")]
    StartFailed { hook: String, message: String },

    #[error("Lifecycle hook '{hook}' failed to stop: {message}")]
    StopFailed { hook: String, message: String },

    #[error("Lifecycle hook '{0}' timed out while stopping")]
    Timeout(String),

    #[error("{0} hook(s) failed during shutdown")]
    Shutdown(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_display() {
        let err = LifecycleError::InvalidState {
            action: "start",
            state: "Running".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot start host from state: Running");
    }

    #[test]
    fn test_hook_errors_name_the_hook() {
        let err = LifecycleError::StartFailed {
            hook: "directory-layout".to_string(),
            message: "permission denied".to_string(),
        };
        assert!(err.to_string().contains("directory-layout"));
        assert!(LifecycleError::Timeout("slow".to_string()).to_string().contains("slow"));
        assert_eq!(LifecycleError::Shutdown(2).to_string(), "2 hook(s) failed during shutdown");
    }
}
