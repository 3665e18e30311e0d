//! Skill protocol definitions.
//!
//! Skills are named capabilities a module exposes. Each one is backed by a
//! flow generator that stays internal to the host.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::module::FlowGenerator;

/// A validated skill owned by exactly one module.
#[derive(Clone)]
pub struct Skill {
    /// Identifier, unique within the owning module.
    pub id: String,

    /// Human-readable name.
    pub name: String,

    /// Generator invoked to build the skill's flow.
    pub flow_generator: FlowGenerator,
}

impl Skill {
    pub fn new(id: impl Into<String>, name: impl Into<String>, flow_generator: FlowGenerator) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            flow_generator,
        }
    }

    /// External projection of this skill.
    pub fn summary(&self, module_name: impl Into<String>) -> SkillSummary {
        SkillSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            module_name: module_name.into(),
        }
    }
}

impl fmt::Debug for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skill")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Catalog listing entry: the flow generator is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub id: String,
    pub name: String,
    pub module_name: String,
}
