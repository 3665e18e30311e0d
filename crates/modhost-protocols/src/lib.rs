//! # modhost Protocols
//!
//! Core protocol definitions for modhost modules.
//! Contains only data types and interface definitions - no implementations.
//!
//! ## Core Types
//!
//! - [`ModuleManifest`] - Raw, unvalidated module bundle (definition + callbacks + skills)
//! - [`NormalizedManifest`] - Validated manifest with defaults applied
//! - [`ModuleApi`] - Capability handle passed into every module callback
//! - [`ApiProvider`] / [`PathResolver`] - Host collaborators consumed by the orchestrator
//! - [`Skill`] - Flow-generating capability declared by a module

pub mod error;
pub mod module;
pub mod skill;

pub use error::{ConfigStateError, LifecycleError, ModuleError, ValidationError, Violation};
pub use module::{
    ApiHandle, ApiProvider, BoxError, CallbackResult, FlowGenerator, LifecycleCallback,
    ModuleApi, ModuleDefinition, ModuleManifest, ModulePhase, ModuleView, NormalizedManifest,
    PathResolver, PluginEntry, SkillDeclaration, TenantCallback, flow_generator,
    lifecycle_callback, tenant_callback,
};
pub use skill::{Skill, SkillSummary};
