//! Loaded modules and the skills they expose.

mod module;
mod skill;

pub use module::{ModuleEntry, ModuleRegistry};
pub use skill::SkillCatalog;
