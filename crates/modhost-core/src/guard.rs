//! Failure boundary around module-supplied code.

use std::any::Any;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::future::BoxFuture;

use modhost_protocols::{CallbackResult, ModuleError, ModulePhase};

/// Run one module callback, turning returned errors and panics into
/// [`ModuleError::Callback`].
///
/// `call` builds the future; a panic while building it is caught too.
pub(crate) async fn guarded<T, F>(module: &str, phase: ModulePhase, call: F) -> Result<T, ModuleError>
where
    F: FnOnce() -> BoxFuture<'static, CallbackResult<T>>,
{
    let future = match std::panic::catch_unwind(AssertUnwindSafe(call)) {
        Ok(future) => future,
        Err(payload) => {
            return Err(ModuleError::callback(module, phase, panic_message(payload)));
        }
    };

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ModuleError::callback(module, phase, e.to_string())),
        Err(payload) => Err(ModuleError::callback(module, phase, panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    let detail = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    };
    format!("panicked: {detail}")
}
