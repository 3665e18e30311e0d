//! Default host collaborators: capability handles and install path resolution.

use std::any::Any;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use modhost_config::Config;
use modhost_protocols::{ApiHandle, ApiProvider, ModuleApi, ModuleError, PathResolver};

use crate::config_reader::{ConfigReaderSlot, ModuleConfigReader};
use crate::paths::validate_tenant_id;

/// Capability handle scoped to one module.
pub struct HostModuleApi {
    module_name: String,
    config: Arc<ModuleConfigReader>,
}

impl HostModuleApi {
    pub fn new(module_name: impl Into<String>, config: Arc<ModuleConfigReader>) -> Self {
        Self {
            module_name: module_name.into().to_lowercase(),
            config,
        }
    }
}

#[async_trait]
impl ModuleApi for HostModuleApi {
    fn module_name(&self) -> &str {
        &self.module_name
    }

    async fn global_config(&self) -> Result<Value, ModuleError> {
        Ok(self.config.global(&self.module_name).await)
    }

    async fn tenant_config(&self, tenant_id: &str) -> Result<Value, ModuleError> {
        validate_tenant_id(tenant_id)?;
        Ok(self.config.for_tenant(&self.module_name, tenant_id).await)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Builds [`HostModuleApi`] handles once the config reader is installed.
pub struct HostApiProvider {
    config_slot: Arc<ConfigReaderSlot>,
}

impl HostApiProvider {
    pub fn new(config_slot: Arc<ConfigReaderSlot>) -> Self {
        Self { config_slot }
    }
}

#[async_trait]
impl ApiProvider for HostApiProvider {
    async fn create_api(&self, module_name: &str) -> Result<ApiHandle, ModuleError> {
        let config = self.config_slot.get()?;
        Ok(Arc::new(HostModuleApi::new(module_name, config)))
    }
}

/// Resolves installed module directories.
///
/// An explicit location wins; otherwise the module lives in
/// `{modules_dir}/{name}`. The directory must exist.
pub struct ModulePathResolver {
    modules_dir: PathBuf,
    locations: HashMap<String, PathBuf>,
}

impl ModulePathResolver {
    pub fn new(modules_dir: impl Into<PathBuf>) -> Self {
        Self {
            modules_dir: modules_dir.into(),
            locations: HashMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut resolver = Self::new(&config.paths.modules_dir);
        for (name, location) in &config.modules.locations {
            resolver = resolver.with_location(name, location.clone());
        }
        resolver
    }

    pub fn with_location(mut self, module: &str, location: impl Into<PathBuf>) -> Self {
        self.locations.insert(module.to_lowercase(), location.into());
        self
    }

    fn candidate(&self, module_name: &str) -> PathBuf {
        let key = module_name.to_lowercase();
        self.locations
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.modules_dir.join(key))
    }
}

#[async_trait]
impl PathResolver for ModulePathResolver {
    async fn resolve_module_root(&self, module_name: &str) -> Result<PathBuf, ModuleError> {
        let path = self.candidate(module_name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(ModuleError::PathResolution {
                module: module_name.to_string(),
                message: format!("{} is not a directory", path.display()),
            }),
            Err(e) => Err(ModuleError::PathResolution {
                module: module_name.to_string(),
                message: format!("{}: {}", path.display(), e),
            }),
        }
    }
}
