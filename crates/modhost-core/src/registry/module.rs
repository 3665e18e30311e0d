//! Module registry.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use modhost_protocols::module::{ModuleDefinition, NormalizedManifest};
use modhost_protocols::{ModuleError, Skill};

/// A registered module.
#[derive(Debug)]
pub struct ModuleEntry {
    name: String,
    manifest: NormalizedManifest,
}

impl ModuleEntry {
    pub fn new(manifest: NormalizedManifest) -> Self {
        Self {
            name: manifest.key(),
            manifest,
        }
    }

    /// Lower-cased registry key.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn manifest(&self) -> &NormalizedManifest {
        &self.manifest
    }

    pub fn definition(&self) -> &ModuleDefinition {
        &self.manifest.definition
    }

    pub fn skills(&self) -> &[Skill] {
        &self.manifest.skills
    }

    pub fn find_skill(&self, skill_id: &str) -> Option<&Skill> {
        self.manifest.skills.iter().find(|s| s.id == skill_id)
    }
}

#[derive(Default)]
struct Inner {
    order: Vec<String>,
    entries: HashMap<String, Arc<ModuleEntry>>,
}

/// Registry of loaded modules, keyed by lower-cased name.
///
/// Iteration follows registration order. Only the loader writes to it; a
/// module is either fully present or absent.
#[derive(Default)]
pub struct ModuleRegistry {
    inner: RwLock<Inner>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. A module with the same name replaces the earlier
    /// entry in place and the replaced entry is returned.
    pub(crate) fn register(&self, manifest: NormalizedManifest) -> Option<Arc<ModuleEntry>> {
        let entry = Arc::new(ModuleEntry::new(manifest));
        let name = entry.name().to_string();

        let mut inner = self.inner.write();
        let previous = inner.entries.insert(name.clone(), entry);
        if previous.is_some() {
            debug!(module = %name, "Replacing previously registered module");
        } else {
            inner.order.push(name);
        }
        previous
    }

    /// Look up a module by name, case-insensitively.
    pub fn get(&self, name: &str) -> Result<Arc<ModuleEntry>, ModuleError> {
        self.inner
            .read()
            .entries
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| ModuleError::NotRegistered(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().entries.contains_key(&name.to_lowercase())
    }

    /// Snapshot of every entry in registration order.
    pub fn entries(&self) -> Vec<Arc<ModuleEntry>> {
        let inner = self.inner.read();
        inner
            .order
            .iter()
            .filter_map(|name| inner.entries.get(name).cloned())
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.inner.read().order.clone()
    }

    /// Normalized definitions of every loaded module, for UI listing.
    pub fn definitions(&self) -> Vec<ModuleDefinition> {
        self.entries()
            .iter()
            .map(|entry| entry.definition().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
