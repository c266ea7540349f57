//! Host-side sizes of buffer element types.

use crate::model::StructDefinition;
use shadergen_ir::ShaderType;
use std::collections::HashMap;

/// Tightly packed size in bytes, as a host struct of the same fields would have.
pub(crate) fn host_size(ty: &ShaderType, structs: &HashMap<String, StructDefinition>) -> u32 {
    match ty {
        ShaderType::Void | ShaderType::Resource(_) => 0,
        ShaderType::Scalar(_) => 4,
        ShaderType::Vector(_, size) => 4 * u32::from(*size),
        ShaderType::Matrix4x4 => 64,
        ShaderType::Struct(name) => structs
            .get(name)
            .map(|s| s.fields.iter().map(|f| host_size(&f.ty, structs)).sum())
            .unwrap_or(0),
        ShaderType::Array(element, len) => host_size(element, structs) * len,
    }
}
