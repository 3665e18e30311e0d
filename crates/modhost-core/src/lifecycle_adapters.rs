//! Lifecycle hook implementations for host components.

use std::path::PathBuf;

use tracing::debug;

use modhost_protocols::LifecycleError;

use super::{LifecycleHook, priority};
use crate::paths::HostPaths;

/// Creates the shared directory layout before anything else starts.
pub struct DirectoryLayoutHook {
    dirs: Vec<PathBuf>,
}

impl DirectoryLayoutHook {
    pub fn new(paths: &HostPaths) -> Self {
        Self {
            dirs: paths.layout_dirs(),
        }
    }
}

#[async_trait::async_trait]
impl LifecycleHook for DirectoryLayoutHook {
    fn name(&self) -> &str {
        "directory-layout"
    }

    async fn on_start(&self) -> Result<(), LifecycleError> {
        for dir in &self.dirs {
            debug!(dir = %dir.display(), "Creating host directory");
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| LifecycleError::StartFailed {
                    hook: self.name().to_string(),
                    message: format!("{}: {}", dir.display(), e),
                })?;
        }
        Ok(())
    }

    async fn on_stop(&self) -> Result<(), LifecycleError> {
        Ok(())
    }

    fn priority(&self) -> i32 {
        priority::INFRASTRUCTURE
    }
}
