//! Module manifest types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{FlowGenerator, LifecycleCallback, TenantCallback};
use crate::skill::Skill;

/// Icon shown in the host menu when a module does not declare one.
pub const DEFAULT_MENU_ICON: &str = "view_module";

/// Raw module bundle as supplied by the host's discovery mechanism.
///
/// The definition block is untyped JSON and nothing here has been checked;
/// it must go through manifest validation before any callback is invoked.
#[derive(Clone, Default)]
pub struct ModuleManifest {
    /// Declarative definition block (`name`, `fullName`, `plugins`, ...).
    pub definition: serde_json::Value,
    pub on_server_started: Option<LifecycleCallback>,
    pub on_server_ready: Option<LifecycleCallback>,
    pub on_tenant_mount: Option<TenantCallback>,
    pub on_tenant_unmount: Option<TenantCallback>,
    pub skills: Vec<SkillDeclaration>,
}

impl ModuleManifest {
    /// Create a manifest from a definition block, without callbacks.
    pub fn new(definition: serde_json::Value) -> Self {
        Self {
            definition,
            ..Default::default()
        }
    }

    pub fn on_server_started(mut self, callback: LifecycleCallback) -> Self {
        self.on_server_started = Some(callback);
        self
    }

    pub fn on_server_ready(mut self, callback: LifecycleCallback) -> Self {
        self.on_server_ready = Some(callback);
        self
    }

    pub fn on_tenant_mount(mut self, callback: TenantCallback) -> Self {
        self.on_tenant_mount = Some(callback);
        self
    }

    pub fn on_tenant_unmount(mut self, callback: TenantCallback) -> Self {
        self.on_tenant_unmount = Some(callback);
        self
    }

    pub fn with_skill(mut self, skill: SkillDeclaration) -> Self {
        self.skills.push(skill);
        self
    }

    /// The `name` declared in the definition block, if it is a string.
    pub fn declared_name(&self) -> Option<&str> {
        self.definition.get("name").and_then(|v| v.as_str())
    }

    /// Lower-cased module name used for logging and registry keys.
    ///
    /// Falls back to `<unnamed>` when the definition carries no usable name.
    pub fn label(&self) -> String {
        match self.declared_name() {
            Some(name) if !name.trim().is_empty() => name.to_lowercase(),
            _ => "<unnamed>".to_string(),
        }
    }
}

impl fmt::Debug for ModuleManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleManifest")
            .field("definition", &self.definition)
            .field("on_server_started", &self.on_server_started.is_some())
            .field("on_server_ready", &self.on_server_ready.is_some())
            .field("on_tenant_mount", &self.on_tenant_mount.is_some())
            .field("on_tenant_unmount", &self.on_tenant_unmount.is_some())
            .field("skills", &self.skills)
            .finish()
    }
}

/// Skill as declared in a raw manifest.
#[derive(Clone)]
pub struct SkillDeclaration {
    pub id: String,
    pub name: String,
    pub flow_generator: Option<FlowGenerator>,
}

impl SkillDeclaration {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            flow_generator: None,
        }
    }

    pub fn with_flow_generator(mut self, generator: FlowGenerator) -> Self {
        self.flow_generator = Some(generator);
        self
    }
}

impl fmt::Debug for SkillDeclaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkillDeclaration")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("flow_generator", &self.flow_generator.is_some())
            .finish()
    }
}

/// Typed module definition with every default populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDefinition {
    pub name: String,
    pub full_name: String,
    pub plugins: Vec<PluginEntry>,
    pub no_interface: bool,
    pub module_view: ModuleView,
    pub menu_icon: String,
    pub menu_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// Presentation options of the module's main view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleView {
    #[serde(default)]
    pub stretched: bool,
}

/// UI plugin bundle contributed by a module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    pub entry: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// Validated manifest: typed definition, required callbacks present, skills complete.
#[derive(Clone)]
pub struct NormalizedManifest {
    pub definition: ModuleDefinition,
    pub on_server_started: LifecycleCallback,
    pub on_server_ready: LifecycleCallback,
    pub on_tenant_mount: Option<TenantCallback>,
    pub on_tenant_unmount: Option<TenantCallback>,
    pub skills: Vec<Skill>,
}

impl NormalizedManifest {
    /// Registry key of this module.
    pub fn key(&self) -> String {
        self.definition.name.to_lowercase()
    }
}

impl fmt::Debug for NormalizedManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedManifest")
            .field("definition", &self.definition)
            .field("on_tenant_mount", &self.on_tenant_mount.is_some())
            .field("on_tenant_unmount", &self.on_tenant_unmount.is_some())
            .field("skills", &self.skills)
            .finish()
    }
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
