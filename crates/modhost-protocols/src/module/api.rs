//! Capability handle and host collaborator traits.

use std::any::Any;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ModuleError;

/// Module-scoped API surface passed into every lifecycle callback.
#[async_trait]
pub trait ModuleApi: Send + Sync {
    /// Normalized (lower-cased) name of the module this handle belongs to.
    fn module_name(&self) -> &str;

    /// Global configuration of this module.
    async fn global_config(&self) -> Result<serde_json::Value, ModuleError>;

    /// Configuration of this module for one tenant, tenant values over global ones.
    async fn tenant_config(&self, tenant_id: &str) -> Result<serde_json::Value, ModuleError>;

    /// Returns a reference to the handle as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// Shared capability handle.
pub type ApiHandle = Arc<dyn ModuleApi>;

/// Produces capability handles for module names.
///
/// Construction may be asynchronous and may fail; a failure fails the
/// current phase of that module only.
#[async_trait]
pub trait ApiProvider: Send + Sync {
    async fn create_api(&self, module_name: &str) -> Result<ApiHandle, ModuleError>;
}

/// Locates the installed root directory of a module.
#[async_trait]
pub trait PathResolver: Send + Sync {
    async fn resolve_module_root(&self, module_name: &str) -> Result<PathBuf, ModuleError>;
}
