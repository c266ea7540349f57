//! Resolved shader types shared by the model and every backend.

use crate::defs::{AccessMode, ResourceKind};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Scalar component kind. `Int`, `UInt` and `Float` are 32 bits wide.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Int,
    UInt,
    Float,
}

impl ScalarKind {
    pub fn is_integer(&self) -> bool {
        matches!(self, ScalarKind::Int | ScalarKind::UInt)
    }
}

impl Display for ScalarKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarKind::Bool => f.write_str("bool"),
            ScalarKind::Int => f.write_str("int"),
            ScalarKind::UInt => f.write_str("uint"),
            ScalarKind::Float => f.write_str("float"),
        }
    }
}

/// A bound resource type.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceType {
    pub kind: ResourceKind,
    /// Element type of uniform and structured buffers.
    pub element: Option<Box<ShaderType>>,
    pub access: AccessMode,
}

impl ResourceType {
    pub fn element(&self) -> Option<&ShaderType> {
        self.element.as_deref()
    }

    pub fn is_writable(&self) -> bool {
        self.kind == ResourceKind::StructuredBuffer && self.access == AccessMode::ReadWrite
    }
}

/// A fully resolved type.
///
/// Matrices are always 4x4 of `float`; no other shape is representable.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderType {
    Void,
    Scalar(ScalarKind),
    /// A vector of 2 to 4 components.
    Vector(ScalarKind, u8),
    Matrix4x4,
    /// Refers to a struct definition by its fully qualified name.
    Struct(String),
    Array(Box<ShaderType>, u32),
    Resource(ResourceType),
}

impl ShaderType {
    pub const FLOAT: ShaderType = ShaderType::Scalar(ScalarKind::Float);
    pub const INT: ShaderType = ShaderType::Scalar(ScalarKind::Int);
    pub const UINT: ShaderType = ShaderType::Scalar(ScalarKind::UInt);
    pub const BOOL: ShaderType = ShaderType::Scalar(ScalarKind::Bool);

    pub fn float4() -> ShaderType {
        ShaderType::Vector(ScalarKind::Float, 4)
    }

    /// The scalar kind of a scalar or vector, `Float` for matrices.
    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self {
            ShaderType::Scalar(kind) | ShaderType::Vector(kind, _) => Some(*kind),
            ShaderType::Matrix4x4 => Some(ScalarKind::Float),
            _ => None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.scalar_kind().map_or(false, |k| k.is_integer())
    }

    pub fn is_float(&self) -> bool {
        self.scalar_kind() == Some(ScalarKind::Float)
    }

    pub fn is_matrix(&self) -> bool {
        matches!(self, ShaderType::Matrix4x4)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, ShaderType::Void)
    }

    /// Scalars and vectors; the only types allowed on a stage interface.
    pub fn is_interface_type(&self) -> bool {
        matches!(self, ShaderType::Scalar(_) | ShaderType::Vector(..))
    }

    pub fn struct_name(&self) -> Option<&str> {
        match self {
            ShaderType::Struct(name) => Some(name),
            _ => None,
        }
    }

    pub fn resource(&self) -> Option<&ResourceType> {
        match self {
            ShaderType::Resource(resource) => Some(resource),
            _ => None,
        }
    }
}

impl Display for ShaderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderType::Void => f.write_str("void"),
            ShaderType::Scalar(kind) => write!(f, "{kind}"),
            ShaderType::Vector(kind, size) => write!(f, "{kind}{size}"),
            ShaderType::Matrix4x4 => f.write_str("float4x4"),
            ShaderType::Struct(name) => f.write_str(name),
            ShaderType::Array(element, len) => write!(f, "{element}[{len}]"),
            ShaderType::Resource(resource) => {
                write!(f, "{}", resource.kind)?;
                if let Some(element) = resource.element() {
                    write!(f, "<{element}>")?;
                }
                if resource.access == AccessMode::ReadWrite {
                    f.write_str(" (read-write)")?;
                }
                Ok(())
            }
        }
    }
}
