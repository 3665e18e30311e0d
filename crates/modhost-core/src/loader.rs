//! Module loader: drives modules through their activation phases.
//!
//! ```text
//! load_modules ──► validate ─► create api ─► onServerStarted ─► register
//!       │                      (per module, sequential, failures contained)
//!       └─ spawn ──► wait readiness ─► onServerReady ─► actions/hooks/assets
//!
//! mount_for_tenant   ──► tenant content ─► onTenantMount    (every registered module)
//! unmount_for_tenant ──► onTenantUnmount                    (every registered module)
//! ```
//!
//! A module failing a phase never affects its siblings. Only shared
//! infrastructure failures (config reader state, invalid tenant ids) reach
//! the caller.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, info_span, warn};

use modhost_protocols::{
    ApiProvider, ConfigStateError, ModuleError, ModuleManifest, ModulePhase, PathResolver,
};

use crate::config_reader::{ConfigReaderSlot, ModuleConfigReader};
use crate::guard::guarded;
use crate::lifecycle::ReadinessSignal;
use crate::materializer::{MaterializeOutcome, ResourceCategory, ResourceMaterializer};
use crate::paths::{HostPaths, validate_tenant_id};
use crate::registry::{ModuleEntry, ModuleRegistry, SkillCatalog};
use crate::validator::ManifestValidator;

/// Per-module outcome of a tenant mount or unmount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TenantReport {
    pub tenant_id: String,
    pub succeeded: Vec<String>,
    pub failed: Vec<String>,
}

impl TenantReport {
    fn new(tenant_id: &str) -> Self {
        Self {
            tenant_id: tenant_id.to_string(),
            ..Default::default()
        }
    }

    /// True when no module failed.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Orchestrates module activation.
pub struct ModuleLoader {
    paths: HostPaths,
    registry: Arc<ModuleRegistry>,
    materializer: ResourceMaterializer,
    resolver: Arc<dyn PathResolver>,
    api_provider: Arc<dyn ApiProvider>,
    config_slot: Arc<ConfigReaderSlot>,
    readiness: ReadinessSignal,
    ready_task: Mutex<Option<JoinHandle<()>>>,
}

impl ModuleLoader {
    pub fn new(
        paths: HostPaths,
        resolver: Arc<dyn PathResolver>,
        api_provider: Arc<dyn ApiProvider>,
        config_slot: Arc<ConfigReaderSlot>,
        readiness: ReadinessSignal,
    ) -> Self {
        Self {
            materializer: ResourceMaterializer::new(paths.clone(), Arc::clone(&resolver)),
            paths,
            registry: Arc::new(ModuleRegistry::new()),
            resolver,
            api_provider,
            config_slot,
            readiness,
            ready_task: Mutex::new(None),
        }
    }

    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    pub fn catalog(&self) -> SkillCatalog {
        SkillCatalog::new(Arc::clone(&self.registry))
    }

    /// The config reader installed by [`ModuleLoader::load_modules`].
    pub fn config_reader(&self) -> Result<Arc<ModuleConfigReader>, ModuleError> {
        Ok(self.config_slot.get()?)
    }

    /// Load every candidate module.
    ///
    /// Validates and starts the candidates in order and returns the names of
    /// the modules that started. The ready phase runs afterwards in a detached
    /// task once the readiness signal fires. Can only be called once.
    pub async fn load_modules(
        self: &Arc<Self>,
        manifests: Vec<ModuleManifest>,
    ) -> Result<Vec<String>, ModuleError> {
        if self.config_slot.is_initialized() {
            return Err(ConfigStateError::AlreadyLoaded.into());
        }

        let names: Vec<String> = manifests
            .iter()
            .filter_map(|m| m.declared_name())
            .map(str::to_lowercase)
            .collect();
        let reader = ModuleConfigReader::initialize(self.paths.clone(), &names).await;
        self.config_slot.install(reader)?;

        info!(count = manifests.len(), "Loading modules");

        let mut ledger = HashSet::new();
        let mut activated = Vec::new();
        let mut failed = 0usize;
        let mut candidates = Vec::with_capacity(manifests.len());

        for manifest in &manifests {
            let label = manifest.label();

            let span = info_span!("module", name = %label, phase = %ModulePhase::Start);
            match self.start_module(manifest, &label).instrument(span).await {
                Ok(name) => {
                    candidates.push(name.clone());
                    if ledger.insert(name.clone()) {
                        activated.push(name);
                    }
                }
                Err(e) => {
                    failed += 1;
                    candidates.push(label.clone());
                    error!(module = %label, error = %e, "Module excluded: start phase failed");
                }
            }
        }

        info!(
            started = activated.len(),
            failed,
            "Start phase complete"
        );

        let handle = tokio::spawn(Arc::clone(self).run_ready_phase(candidates, ledger));
        *self.ready_task.lock() = Some(handle);

        Ok(activated)
    }

    async fn start_module(
        &self,
        manifest: &ModuleManifest,
        label: &str,
    ) -> Result<String, ModuleError> {
        let normalized = ManifestValidator::validate(manifest, label)?;
        let name = normalized.key();

        let api = self.api_provider.create_api(&name).await?;
        let callback = normalized.on_server_started.clone();
        guarded(&name, ModulePhase::Start, move || callback(api)).await?;

        if self.registry.register(normalized).is_some() {
            warn!(module = %name, "Module registered twice, keeping the last one");
        }
        info!(module = %name, "Module started");
        Ok(name)
    }

    async fn run_ready_phase(self: Arc<Self>, candidates: Vec<String>, ledger: HashSet<String>) {
        if !self.readiness.is_fired() {
            debug!("Waiting for host readiness");
        }
        self.readiness.wait().await;

        let mut visited = HashSet::new();
        for name in candidates {
            if !visited.insert(name.clone()) {
                continue;
            }
            if !ledger.contains(&name) {
                warn!(module = %name, "Skipping ready phase: module did not start");
                continue;
            }
            let span = info_span!("module", name = %name, phase = %ModulePhase::Ready);
            self.ready_module(&name).instrument(span).await;
        }

        info!(modules = ledger.len(), "Ready phase complete");
    }

    async fn ready_module(&self, name: &str) {
        let entry = match self.registry.get(name) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(module = %name, error = %e, "Module disappeared before ready phase");
                return;
            }
        };

        let api = match self.api_provider.create_api(name).await {
            Ok(api) => api,
            Err(e) => {
                warn!(module = %name, error = %e, "Ready phase failed, module stays registered");
                return;
            }
        };

        let callback = entry.manifest().on_server_ready.clone();
        if let Err(e) = guarded(name, ModulePhase::Ready, move || callback(api)).await {
            warn!(module = %name, error = %e, "Ready phase failed, module stays registered");
            return;
        }

        for category in ResourceCategory::GLOBAL {
            match self.materializer.materialize(name, category).await {
                Ok(MaterializeOutcome::Copied { files }) => {
                    debug!(module = %name, %category, files, "Resources materialized");
                }
                Ok(MaterializeOutcome::NoSource) => {
                    debug!(module = %name, %category, "No resources to materialize");
                }
                Err(e) => {
                    warn!(module = %name, %category, error = %e, "Materialization failed");
                }
            }
        }
        info!(module = %name, "Module ready");
    }

    /// Wait for the detached ready phase to finish.
    #[cfg(test)]
    pub(crate) async fn join_ready_phase(&self) {
        let handle = self.ready_task.lock().take();
        if let Some(handle) = handle {
            handle.await.expect("ready phase panicked");
        }
    }

    /// Activate every registered module for one tenant.
    pub async fn mount_for_tenant(&self, tenant_id: &str) -> Result<TenantReport, ModuleError> {
        validate_tenant_id(tenant_id)?;
        let mut report = TenantReport::new(tenant_id);

        for entry in self.registry.entries() {
            let span = info_span!("module", name = %entry.name(), phase = %ModulePhase::Mount);
            match self.mount_module(&entry, tenant_id).instrument(span).await {
                Ok(()) => report.succeeded.push(entry.name().to_string()),
                Err(e) => {
                    warn!(module = %entry.name(), tenant = %tenant_id, error = %e, "Tenant mount failed");
                    report.failed.push(entry.name().to_string());
                }
            }
        }

        info!(
            tenant = %tenant_id,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Tenant mounted"
        );
        Ok(report)
    }

    async fn mount_module(&self, entry: &ModuleEntry, tenant_id: &str) -> Result<(), ModuleError> {
        let name = entry.name();
        let root = self.resolver.resolve_module_root(name).await?;
        let api = self.api_provider.create_api(name).await?;

        self.materializer
            .materialize_tenant(name, tenant_id, &root)
            .await?;

        if let Some(callback) = entry.manifest().on_tenant_mount.clone() {
            let tenant = tenant_id.to_string();
            guarded(name, ModulePhase::Mount, move || callback(api, tenant)).await?;
        }
        Ok(())
    }

    /// Deactivate every registered module for one tenant. Tenant data is kept.
    pub async fn unmount_for_tenant(&self, tenant_id: &str) -> Result<TenantReport, ModuleError> {
        validate_tenant_id(tenant_id)?;
        let mut report = TenantReport::new(tenant_id);

        for entry in self.registry.entries() {
            let span = info_span!("module", name = %entry.name(), phase = %ModulePhase::Unmount);
            match self.unmount_module(&entry, tenant_id).instrument(span).await {
                Ok(()) => report.succeeded.push(entry.name().to_string()),
                Err(e) => {
                    warn!(module = %entry.name(), tenant = %tenant_id, error = %e, "Tenant unmount failed");
                    report.failed.push(entry.name().to_string());
                }
            }
        }

        info!(
            tenant = %tenant_id,
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "Tenant unmounted"
        );
        Ok(report)
    }

    async fn unmount_module(&self, entry: &ModuleEntry, tenant_id: &str) -> Result<(), ModuleError> {
        let name = entry.name();
        self.resolver.resolve_module_root(name).await?;
        let api = self.api_provider.create_api(name).await?;

        if let Some(callback) = entry.manifest().on_tenant_unmount.clone() {
            let tenant = tenant_id.to_string();
            guarded(name, ModulePhase::Unmount, move || callback(api, tenant)).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
