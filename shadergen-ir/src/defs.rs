use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A shader pipeline stage.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    Vertex,
    Fragment,
    Compute,
}

impl Stage {
    pub const ALL: [Stage; 3] = [Stage::Vertex, Stage::Fragment, Stage::Compute];
}

impl Display for Stage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
            Stage::Compute => f.write_str("compute"),
        }
    }
}

/// The role a field or parameter plays in stage input/output wiring.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Semantic {
    Position,
    Normal,
    TextureCoordinate,
    Color,
    Tangent,
    /// Clip-space position written by the vertex stage.
    SystemPosition,
    /// Render target output of the fragment stage.
    ColorTarget(u32),
    VertexIndex,
    InstanceIndex,
    DispatchThreadId,
    GroupThreadId,
    GroupId,
}

impl Semantic {
    /// Builtins are supplied by the pipeline and are only valid on entry parameters.
    pub fn is_builtin(&self) -> bool {
        matches!(
            self,
            Semantic::VertexIndex
                | Semantic::InstanceIndex
                | Semantic::DispatchThreadId
                | Semantic::GroupThreadId
                | Semantic::GroupId
        )
    }

    /// The stage a builtin semantic belongs to, if it is a builtin.
    pub fn builtin_stage(&self) -> Option<Stage> {
        match self {
            Semantic::VertexIndex | Semantic::InstanceIndex => Some(Stage::Vertex),
            Semantic::DispatchThreadId | Semantic::GroupThreadId | Semantic::GroupId => {
                Some(Stage::Compute)
            }
            _ => None,
        }
    }
}

impl Display for Semantic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Semantic::Position => f.write_str("position"),
            Semantic::Normal => f.write_str("normal"),
            Semantic::TextureCoordinate => f.write_str("texture coordinate"),
            Semantic::Color => f.write_str("color"),
            Semantic::Tangent => f.write_str("tangent"),
            Semantic::SystemPosition => f.write_str("system position"),
            Semantic::ColorTarget(n) => write!(f, "color target {n}"),
            Semantic::VertexIndex => f.write_str("vertex index"),
            Semantic::InstanceIndex => f.write_str("instance index"),
            Semantic::DispatchThreadId => f.write_str("dispatch thread id"),
            Semantic::GroupThreadId => f.write_str("group thread id"),
            Semantic::GroupId => f.write_str("group id"),
        }
    }
}

/// Parameter passing direction.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamDirection {
    #[default]
    In,
    Out,
    InOut,
}

/// The kind of an externally bound resource.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceKind {
    Texture2D,
    Texture2DArray,
    TextureCube,
    Texture2DMS,
    DepthTexture2D,
    Sampler,
    UniformBuffer,
    StructuredBuffer,
}

impl ResourceKind {
    pub fn is_buffer(&self) -> bool {
        matches!(
            self,
            ResourceKind::UniformBuffer | ResourceKind::StructuredBuffer
        )
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Texture2D => f.write_str("texture2d"),
            ResourceKind::Texture2DArray => f.write_str("texture2d_array"),
            ResourceKind::TextureCube => f.write_str("texture_cube"),
            ResourceKind::Texture2DMS => f.write_str("texture2d_ms"),
            ResourceKind::DepthTexture2D => f.write_str("depth_texture2d"),
            ResourceKind::Sampler => f.write_str("sampler"),
            ResourceKind::UniformBuffer => f.write_str("uniform_buffer"),
            ResourceKind::StructuredBuffer => f.write_str("structured_buffer"),
        }
    }
}

/// Access mode of a resource.
#[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessMode {
    #[default]
    ReadOnly,
    ReadWrite,
}
