//! Generates HLSL, GLSL and Metal source from a resolved shader program.
//!
//! A [`ShaderGenerator`] builds one [`ShaderModel`] per entry point set and
//! hands it to every requested backend. Backends are looked up by
//! [`BackendKind`] in a [`BackendRegistry`].

pub mod backend;
mod builder;
mod config;
mod enums;
mod error;
mod generator;
mod logger;
mod model;
mod registry;
mod result;

#[cfg(test)]
mod test_programs;

pub use builder::build_model;
pub use config::*;
pub use enums::*;
pub use error::*;
pub use generator::*;
pub use model::*;
pub use registry::*;
pub use result::{GeneratedShaderSet, GenerationFailure, ShaderGenerationResult};

pub use shadergen_ir as ir;
