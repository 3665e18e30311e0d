//! Error types for the modhost protocol layer.

mod lifecycle;
mod module;
mod validation;

pub use lifecycle::*;
pub use module::*;
pub use validation::*;
