//! Host lifecycle management.
//!
//! Provides the host state machine and the one-shot signals modules wait on:
//! - Component startup/shutdown ordering via priority
//! - Rollback of started components when one fails to start
//! - Graceful shutdown with a per-hook timeout
//! - Readiness fired once the host is Running, shutdown fired on stop

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;

use tokio::sync::{RwLock, watch};
use tokio::time::timeout;
use tracing::{error, info, warn};

use modhost_protocols::LifecycleError;

#[path = "lifecycle_adapters.rs"]
mod lifecycle_adapters;
pub use lifecycle_adapters::*;

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;

/// Host state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum HostState {
    /// Initial state, not started.
    Created = 0,
    /// Starting up.
    Starting = 1,
    /// Running and ready.
    Running = 2,
    /// Shutting down.
    ShuttingDown = 3,
    /// Stopped.
    Stopped = 4,
}

impl From<u8> for HostState {
    fn from(v: u8) -> Self {
        match v {
            0 => HostState::Created,
            1 => HostState::Starting,
            2 => HostState::Running,
            3 => HostState::ShuttingDown,
            4 => HostState::Stopped,
            _ => HostState::Created,
        }
    }
}

/// One-shot, process-wide signal.
///
/// Once fired it stays fired: waiting afterwards resolves immediately, so a
/// waiter that subscribes late never misses it.
#[derive(Clone)]
pub struct OnceSignal {
    sender: Arc<watch::Sender<bool>>,
}

impl OnceSignal {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Fire the signal. Firing again has no effect.
    pub fn fire(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_fired(&self) -> bool {
        *self.sender.borrow()
    }

    /// Wait until the signal fires.
    pub async fn wait(&self) {
        let mut receiver = self.sender.subscribe();
        // The sender lives in `self`, so the channel cannot close while waiting.
        let _ = receiver.wait_for(|fired| *fired).await;
    }
}

impl Default for OnceSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Fired when the host finishes starting.
pub type ReadinessSignal = OnceSignal;

/// Fired when the host begins shutting down.
pub type ShutdownSignal = OnceSignal;

/// Lifecycle hook trait for host components.
#[async_trait::async_trait]
pub trait LifecycleHook: Send + Sync {
    /// Name used in logs and errors.
    fn name(&self) -> &str;

    /// Called during startup.
    async fn on_start(&self) -> Result<(), LifecycleError>;

    /// Called during shutdown.
    async fn on_stop(&self) -> Result<(), LifecycleError>;

    /// Priority for startup/shutdown ordering (higher = earlier start, later stop).
    fn priority(&self) -> i32 {
        priority::DEFAULT
    }
}

/// Lifecycle manager for host components.
pub struct LifecycleManager {
    state: AtomicU8,
    hooks: RwLock<Vec<Arc<dyn LifecycleHook>>>,
    readiness: ReadinessSignal,
    shutdown_signal: ShutdownSignal,
    shutdown_timeout: Duration,
}

impl LifecycleManager {
    /// Create a new lifecycle manager.
    pub fn new(shutdown_timeout: Duration) -> Self {
        Self::with_readiness(shutdown_timeout, ReadinessSignal::new())
    }

    /// Create a lifecycle manager that fires an existing readiness signal.
    pub fn with_readiness(shutdown_timeout: Duration, readiness: ReadinessSignal) -> Self {
        Self {
            state: AtomicU8::new(HostState::Created as u8),
            hooks: RwLock::new(Vec::new()),
            readiness,
            shutdown_signal: ShutdownSignal::new(),
            shutdown_timeout,
        }
    }

    /// Get current state.
    pub fn state(&self) -> HostState {
        HostState::from(self.state.load(Ordering::SeqCst))
    }

    /// Add a hook while building the manager.
    pub fn with_hook(mut self, hook: Arc<dyn LifecycleHook>) -> Self {
        let hooks = self.hooks.get_mut();
        hooks.push(hook);
        hooks.sort_by(|a, b| b.priority().cmp(&a.priority()));
        self
    }

    /// Register a lifecycle hook.
    pub async fn register_hook(&self, hook: Arc<dyn LifecycleHook>) {
        let mut hooks = self.hooks.write().await;
        hooks.push(hook);
        // Stable sort keeps registration order within a priority
        hooks.sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    pub fn readiness_signal(&self) -> &ReadinessSignal {
        &self.readiness
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown_signal
    }

    /// Start all components, then fire readiness.
    pub async fn start(&self) -> Result<(), LifecycleError> {
        let current = self.state.load(Ordering::SeqCst);
        if current != HostState::Created as u8 {
            return Err(LifecycleError::InvalidState {
                action: "start",
                state: format!("{:?}", HostState::from(current)),
            });
        }

        self.state.store(HostState::Starting as u8, Ordering::SeqCst);
        info!("Host starting...");

        let hooks = self.hooks.read().await;
        for (i, hook) in hooks.iter().enumerate() {
            if let Err(e) = hook.on_start().await {
                error!(hook = hook.name(), error = %e, "Failed to start lifecycle hook");
                // Rollback started hooks
                for started_hook in hooks.iter().take(i).rev() {
                    let _ = started_hook.on_stop().await;
                }
                self.state.store(HostState::Stopped as u8, Ordering::SeqCst);
                return Err(e);
            }
        }

        self.state.store(HostState::Running as u8, Ordering::SeqCst);
        self.readiness.fire();
        info!("Host started");
        Ok(())
    }

    /// Stop all components in reverse order.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let current = self.state.load(Ordering::SeqCst);
        if current != HostState::Running as u8 {
            return Err(LifecycleError::InvalidState {
                action: "stop",
                state: format!("{:?}", HostState::from(current)),
            });
        }

        self.state
            .store(HostState::ShuttingDown as u8, Ordering::SeqCst);
        info!("Host shutting down...");

        self.shutdown_signal.fire();

        let hooks = self.hooks.read().await;
        let mut errors = Vec::new();

        for hook in hooks.iter().rev() {
            match timeout(self.shutdown_timeout, hook.on_stop()).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    warn!(hook = hook.name(), error = %e, "Hook stop error");
                    errors.push(e);
                }
                Err(_) => {
                    warn!(hook = hook.name(), "Hook stop timeout");
                    errors.push(LifecycleError::Timeout(hook.name().to_string()));
                }
            }
        }

        self.state.store(HostState::Stopped as u8, Ordering::SeqCst);
        info!("Host stopped");

        if errors.is_empty() {
            Ok(())
        } else {
            Err(LifecycleError::Shutdown(errors.len()))
        }
    }

    /// Check if running.
    pub fn is_running(&self) -> bool {
        self.state.load(Ordering::SeqCst) == HostState::Running as u8
    }
}

impl Default for LifecycleManager {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

/// Priority levels for lifecycle components (higher = starts earlier, stops later).
pub mod priority {
    pub const INFRASTRUCTURE: i32 = 1000;
    pub const MODULES: i32 = 400;
    pub const DEFAULT: i32 = 0;
}
