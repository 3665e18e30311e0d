//! Module configuration reader.
//!
//! Each module keeps its global configuration in `{data}/config/{module}.json`;
//! a tenant may override it with `{tenants}/{tenant}/config/{module}.json`.
//! A missing file is an empty object. An unreadable or malformed one is
//! logged and treated as empty too.

use std::path::Path;
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use modhost_protocols::ConfigStateError;

use crate::merge::deep_merge;
use crate::paths::HostPaths;

/// Reader of module configuration files, caching global configs.
pub struct ModuleConfigReader {
    paths: HostPaths,
    globals: DashMap<String, Value>,
}

impl ModuleConfigReader {
    /// Read the global configuration of every named module.
    pub async fn initialize(paths: HostPaths, module_names: &[String]) -> Self {
        let reader = Self {
            paths,
            globals: DashMap::new(),
        };
        for name in module_names {
            let key = name.to_lowercase();
            let config = read_json(&reader.paths.global_config_file(&key)).await;
            reader.globals.insert(key, config);
        }
        debug!(modules = module_names.len(), "Module config reader initialized");
        reader
    }

    /// Global configuration of a module. Modules not seen at initialization
    /// are read on first access.
    pub async fn global(&self, module: &str) -> Value {
        let key = module.to_lowercase();
        if let Some(config) = self.globals.get(&key) {
            return config.clone();
        }
        let config = read_json(&self.paths.global_config_file(&key)).await;
        self.globals.insert(key, config.clone());
        config
    }

    /// Configuration of a module for one tenant: the tenant file merged over
    /// the global configuration. Tenant files are not cached.
    pub async fn for_tenant(&self, module: &str, tenant_id: &str) -> Value {
        let key = module.to_lowercase();
        let global = self.global(&key).await;
        let overrides = read_json(&self.paths.tenant_config_file(tenant_id, &key)).await;
        deep_merge(global, overrides)
    }
}

async fn read_json(path: &Path) -> Value {
    let empty = || Value::Object(Map::new());

    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return empty(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot read module config, using empty config");
            return empty();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(value @ Value::Object(_)) => value,
        Ok(_) => {
            warn!(path = %path.display(), "Module config is not a JSON object, using empty config");
            empty()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Malformed module config, using empty config");
            empty()
        }
    }
}

enum SlotState {
    Uninitialized,
    Initialized(Arc<ModuleConfigReader>),
}

/// Process-wide holder of the module config reader.
///
/// Starts uninitialized and accepts exactly one reader.
pub struct ConfigReaderSlot {
    state: RwLock<SlotState>,
}

impl ConfigReaderSlot {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(SlotState::Uninitialized),
        }
    }

    pub fn get(&self) -> Result<Arc<ModuleConfigReader>, ConfigStateError> {
        match &*self.state.read() {
            SlotState::Initialized(reader) => Ok(Arc::clone(reader)),
            SlotState::Uninitialized => Err(ConfigStateError::NotInitialized),
        }
    }

    pub fn install(
        &self,
        reader: ModuleConfigReader,
    ) -> Result<Arc<ModuleConfigReader>, ConfigStateError> {
        let mut state = self.state.write();
        if let SlotState::Initialized(_) = &*state {
            return Err(ConfigStateError::AlreadyLoaded);
        }
        let reader = Arc::new(reader);
        *state = SlotState::Initialized(Arc::clone(&reader));
        Ok(reader)
    }

    pub fn is_initialized(&self) -> bool {
        matches!(&*self.state.read(), SlotState::Initialized(_))
    }
}

impl Default for ConfigReaderSlot {
    fn default() -> Self {
        Self::new()
    }
}
