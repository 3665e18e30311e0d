//! Skill catalog: read-only view of the skills exposed by loaded modules.

use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;

use modhost_protocols::{FlowGenerator, ModuleError, ModulePhase, SkillSummary};

use super::ModuleRegistry;
use crate::guard::guarded;

/// Skill lookups over the module registry.
#[derive(Clone)]
pub struct SkillCatalog {
    registry: Arc<ModuleRegistry>,
}

impl SkillCatalog {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self { registry }
    }

    /// Every skill of every loaded module, in registration order.
    pub fn list_skills(&self) -> Vec<SkillSummary> {
        self.registry
            .entries()
            .iter()
            .flat_map(|entry| {
                entry
                    .skills()
                    .iter()
                    .map(move |skill| skill.summary(entry.name()))
            })
            .collect()
    }

    /// Flow generator of a skill, or `None` if the module has no such skill.
    ///
    /// Fails only when the module itself is not registered.
    pub fn resolve_flow_generator(
        &self,
        module: &str,
        skill_id: &str,
    ) -> Result<Option<FlowGenerator>, ModuleError> {
        let entry = self.registry.get(module)?;
        Ok(entry
            .find_skill(skill_id)
            .map(|skill| skill.flow_generator.clone()))
    }

    /// Build the flow of a skill from its input data.
    pub async fn generate_flow(
        &self,
        module: &str,
        skill_id: &str,
        data: Value,
    ) -> Result<Value, ModuleError> {
        let generator = self
            .resolve_flow_generator(module, skill_id)?
            .ok_or_else(|| ModuleError::SkillNotFound {
                module: module.to_string(),
                skill: skill_id.to_string(),
            })?;

        guarded(module, ModulePhase::FlowGeneration, move || {
            generator(data).boxed()
        })
        .await
    }
}
