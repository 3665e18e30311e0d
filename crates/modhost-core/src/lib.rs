//! # modhost Core
//!
//! Module lifecycle orchestration for the modhost host.
//!
//! ## Components
//!
//! - [`ManifestValidator`] - Validates raw manifests and applies defaults
//! - [`ModuleRegistry`] / [`SkillCatalog`] - Loaded modules and their skills
//! - [`ResourceMaterializer`] - Copies module actions, hooks and assets into shared namespaces
//! - [`ModuleLoader`] - Drives modules through start, ready and per-tenant phases
//! - [`LifecycleManager`] - Host state machine owning the readiness signal
//! - [`Kernel`] - Wires everything together from a [`modhost_config::Config`]
//!
//! ## Activation protocol
//!
//! Loading validates and starts every candidate synchronously, then spawns a
//! detached task that waits for the host readiness signal before running the
//! deferred phase. Per-tenant mount/unmount is driven externally.

pub mod config_reader;
pub mod context;
mod guard;
pub mod kernel;
pub mod lifecycle;
pub mod loader;
pub mod materializer;
pub mod merge;
pub mod paths;
pub mod registry;
pub mod validator;

pub use config_reader::{ConfigReaderSlot, ModuleConfigReader};
pub use context::{HostApiProvider, HostModuleApi, ModulePathResolver};
pub use kernel::Kernel;
pub use lifecycle::{
    DirectoryLayoutHook, HostState, LifecycleHook, LifecycleManager, OnceSignal, ReadinessSignal,
    ShutdownSignal,
};
pub use loader::{ModuleLoader, TenantReport};
pub use materializer::{MaterializeOutcome, ResourceCategory, ResourceMaterializer};
pub use paths::HostPaths;
pub use registry::{ModuleEntry, ModuleRegistry, SkillCatalog};
pub use validator::ManifestValidator;
