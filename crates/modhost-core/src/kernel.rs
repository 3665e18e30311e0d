//! Kernel wiring the module host together.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use modhost_config::{Config, ModulesConfig};
use modhost_protocols::{ApiProvider, LifecycleError, ModuleError, ModuleManifest, PathResolver};

use crate::config_reader::{ConfigReaderSlot, ModuleConfigReader};
use crate::context::{HostApiProvider, ModulePathResolver};
use crate::lifecycle::{
    DirectoryLayoutHook, HostState, LifecycleHook, LifecycleManager, ReadinessSignal,
    ShutdownSignal,
};
use crate::loader::{ModuleLoader, TenantReport};
use crate::paths::HostPaths;
use crate::registry::{ModuleRegistry, SkillCatalog};

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

/// The module host kernel.
pub struct Kernel {
    modules: ModulesConfig,
    paths: HostPaths,
    loader: Arc<ModuleLoader>,
    lifecycle: Arc<LifecycleManager>,
}

impl Kernel {
    /// Create a kernel with the default collaborators.
    pub fn from_config(config: &Config) -> Self {
        let config_slot = Arc::new(ConfigReaderSlot::new());
        Self::with_collaborators(
            config,
            Arc::new(ModulePathResolver::from_config(config)),
            Arc::new(HostApiProvider::new(Arc::clone(&config_slot))),
            config_slot,
        )
    }

    /// Create a kernel with custom path resolution and capability handles.
    pub fn with_collaborators(
        config: &Config,
        resolver: Arc<dyn PathResolver>,
        api_provider: Arc<dyn ApiProvider>,
        config_slot: Arc<ConfigReaderSlot>,
    ) -> Self {
        let paths = HostPaths::from(&config.paths);
        let readiness = ReadinessSignal::new();
        let lifecycle = LifecycleManager::with_readiness(SHUTDOWN_TIMEOUT, readiness.clone())
            .with_hook(Arc::new(DirectoryLayoutHook::new(&paths)));
        let loader = ModuleLoader::new(
            paths.clone(),
            resolver,
            api_provider,
            config_slot,
            readiness,
        );

        Self {
            modules: config.modules.clone(),
            paths,
            loader: Arc::new(loader),
            lifecycle: Arc::new(lifecycle),
        }
    }

    pub fn paths(&self) -> &HostPaths {
        &self.paths
    }

    /// Load the enabled modules among `manifests`.
    ///
    /// Returns the names of the modules that started. Their ready phase runs
    /// once the kernel has started.
    pub async fn load_modules(
        &self,
        manifests: Vec<ModuleManifest>,
    ) -> Result<Vec<String>, ModuleError> {
        let (enabled, skipped): (Vec<_>, Vec<_>) = manifests
            .into_iter()
            .partition(|m| self.modules.is_enabled(&m.label()));

        for manifest in &skipped {
            info!(module = %manifest.label(), "Module disabled by configuration");
        }
        self.loader.load_modules(enabled).await
    }

    /// Start the kernel. Fires host readiness once every hook has started.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        self.lifecycle.start().await
    }

    pub async fn stop(&self) -> Result<(), LifecycleError> {
        info!("Stopping kernel...");
        self.lifecycle.stop().await
    }

    pub fn state(&self) -> HostState {
        self.lifecycle.state()
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle.is_running()
    }

    pub fn readiness_signal(&self) -> &ReadinessSignal {
        self.lifecycle.readiness_signal()
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        self.lifecycle.shutdown_signal()
    }

    /// Register a lifecycle hook.
    pub async fn register_lifecycle_hook(&self, hook: Arc<dyn LifecycleHook>) {
        self.lifecycle.register_hook(hook).await;
    }

    pub async fn mount_tenant(&self, tenant_id: &str) -> Result<TenantReport, ModuleError> {
        self.loader.mount_for_tenant(tenant_id).await
    }

    pub async fn unmount_tenant(&self, tenant_id: &str) -> Result<TenantReport, ModuleError> {
        self.loader.unmount_for_tenant(tenant_id).await
    }

    pub fn catalog(&self) -> SkillCatalog {
        self.loader.catalog()
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        self.loader.registry()
    }

    pub fn config_reader(&self) -> Result<Arc<ModuleConfigReader>, ModuleError> {
        self.loader.config_reader()
    }

    #[cfg(test)]
    pub(crate) fn loader(&self) -> &Arc<ModuleLoader> {
        &self.loader
    }
}

#[cfg(test)]
#[path = "kernel_tests.rs"]
mod tests;
