//! Module protocol definitions.
//!
//! A module is a dynamically registered extension unit: a declarative
//! definition block, a set of lifecycle callbacks and a list of skills.

mod api;
mod callbacks;
mod manifest;

pub use api::*;
pub use callbacks::*;
pub use manifest::*;
