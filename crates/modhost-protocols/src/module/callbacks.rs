//! Callback types supplied by modules.
//!
//! Module code is represented as shared async function values. The
//! orchestrator only ever calls them behind a failure boundary, so a callback
//! may return an error or even panic without affecting its siblings.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};

use super::ApiHandle;

/// Error type returned by module-supplied code.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a module-supplied callback.
pub type CallbackResult<T = ()> = Result<T, BoxError>;

/// Host-wide lifecycle callback (`onServerStarted`, `onServerReady`).
pub type LifecycleCallback = Arc<dyn Fn(ApiHandle) -> BoxFuture<'static, CallbackResult> + Send + Sync>;

/// Per-tenant callback (`onTenantMount`, `onTenantUnmount`), called with the tenant id.
pub type TenantCallback =
    Arc<dyn Fn(ApiHandle, String) -> BoxFuture<'static, CallbackResult> + Send + Sync>;

/// Flow generator backing a skill: turns skill input data into a flow document.
pub type FlowGenerator = Arc<
    dyn Fn(serde_json::Value) -> BoxFuture<'static, CallbackResult<serde_json::Value>> + Send + Sync,
>;

/// Wrap an async closure as a [`LifecycleCallback`].
pub fn lifecycle_callback<F, Fut>(f: F) -> LifecycleCallback
where
    F: Fn(ApiHandle) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallbackResult> + Send + 'static,
{
    Arc::new(move |api: ApiHandle| f(api).boxed())
}

/// Wrap an async closure as a [`TenantCallback`].
pub fn tenant_callback<F, Fut>(f: F) -> TenantCallback
where
    F: Fn(ApiHandle, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallbackResult> + Send + 'static,
{
    Arc::new(move |api: ApiHandle, tenant_id: String| f(api, tenant_id).boxed())
}

/// Wrap an async closure as a [`FlowGenerator`].
pub fn flow_generator<F, Fut>(f: F) -> FlowGenerator
where
    F: Fn(serde_json::Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = CallbackResult<serde_json::Value>> + Send + 'static,
{
    Arc::new(move |data: serde_json::Value| f(data).boxed())
}

/// Activation phase a callback belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModulePhase {
    /// Immediate activation, run synchronously during loading.
    Start,
    /// Deferred activation, run once the host signals readiness.
    Ready,
    /// Per-tenant activation.
    Mount,
    /// Per-tenant deactivation.
    Unmount,
    /// Skill flow generation.
    FlowGeneration,
}

impl ModulePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Ready => "ready",
            Self::Mount => "tenant mount",
            Self::Unmount => "tenant unmount",
            Self::FlowGeneration => "flow generation",
        }
    }
}

impl fmt::Display for ModulePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
