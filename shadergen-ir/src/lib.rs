//! Shared definitions for the shadergen workspace.
//!
//! [`source`] is what a front end hands over, [`ir`] is the closed node set
//! the model builder lowers it to and every backend consumes.

pub mod defs;
pub mod ir;
pub mod source;
pub mod types;
pub mod visit;

pub use defs::*;
pub use types::*;
