//! Host filesystem layout.
//!
//! ```text
//! {data}/actions/{module}/...
//! {data}/hooks/{hookType}/{module}/...
//! {data}/config/{module}.json
//! {assets}/modules/{module}/...
//! {tenants}/{tenant}/modules/{module}/...
//! {tenants}/{tenant}/config/{module}.json
//! ```

use std::path::{Component, Path, PathBuf};

use modhost_config::PathsConfig;
use modhost_protocols::ModuleError;

/// Shared global and per-tenant roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPaths {
    pub global_data_root: PathBuf,
    pub global_assets_root: PathBuf,
    pub tenants_root: PathBuf,
}

impl HostPaths {
    pub fn new(
        global_data_root: impl Into<PathBuf>,
        global_assets_root: impl Into<PathBuf>,
        tenants_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            global_data_root: global_data_root.into(),
            global_assets_root: global_assets_root.into(),
            tenants_root: tenants_root.into(),
        }
    }

    pub fn actions_dir(&self, module: &str) -> PathBuf {
        self.global_data_root.join("actions").join(module)
    }

    /// Root holding one directory per hook type.
    pub fn hooks_root(&self) -> PathBuf {
        self.global_data_root.join("hooks")
    }

    pub fn hooks_dir(&self, hook_type: &str, module: &str) -> PathBuf {
        self.hooks_root().join(hook_type).join(module)
    }

    pub fn assets_dir(&self, module: &str) -> PathBuf {
        self.global_assets_root.join("modules").join(module)
    }

    pub fn tenant_root(&self, tenant_id: &str) -> PathBuf {
        self.tenants_root.join(tenant_id)
    }

    pub fn tenant_module_dir(&self, tenant_id: &str, module: &str) -> PathBuf {
        self.tenant_root(tenant_id).join("modules").join(module)
    }

    pub fn global_config_file(&self, module: &str) -> PathBuf {
        self.global_data_root
            .join("config")
            .join(format!("{module}.json"))
    }

    pub fn tenant_config_file(&self, tenant_id: &str, module: &str) -> PathBuf {
        self.tenant_root(tenant_id)
            .join("config")
            .join(format!("{module}.json"))
    }

    /// Directories the host creates at startup.
    pub fn layout_dirs(&self) -> Vec<PathBuf> {
        vec![
            self.global_data_root.join("actions"),
            self.hooks_root(),
            self.global_data_root.join("config"),
            self.global_assets_root.join("modules"),
            self.tenants_root.clone(),
        ]
    }
}

impl From<&PathsConfig> for HostPaths {
    fn from(config: &PathsConfig) -> Self {
        Self::new(&config.data_dir, &config.assets_dir, &config.tenants_dir)
    }
}

/// Reject tenant ids that would escape the tenants root.
pub fn validate_tenant_id(tenant_id: &str) -> Result<(), ModuleError> {
    let invalid = || ModuleError::InvalidTenant(tenant_id.to_string());

    if tenant_id.trim().is_empty() || tenant_id.contains(['/', '\\']) || tenant_id.contains("..") {
        return Err(invalid());
    }
    match Path::new(tenant_id).components().next() {
        Some(Component::Normal(_)) => Ok(()),
        _ => Err(invalid()),
    }
}
