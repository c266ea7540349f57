use bitflags::bitflags;
use std::fmt::{Display, Formatter};

/// A target shading language.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum BackendKind {
    Hlsl,
    Glsl330,
    GlslEs300,
    Glsl450,
    Metal,
}

impl BackendKind {
    pub const ALL: [BackendKind; 5] = [
        BackendKind::Hlsl,
        BackendKind::Glsl330,
        BackendKind::GlslEs300,
        BackendKind::Glsl450,
        BackendKind::Metal,
    ];
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Hlsl => f.write_str("HLSL"),
            BackendKind::Glsl330 => f.write_str("GLSL 330"),
            BackendKind::GlslEs300 => f.write_str("GLSL ES 300"),
            BackendKind::Glsl450 => f.write_str("GLSL 450"),
            BackendKind::Metal => f.write_str("Metal"),
        }
    }
}

/// What the generator does when a set or backend fails.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum FailurePolicy {
    /// The first error in request order fails the whole request.
    FailFast,
    /// Every failure is recorded and the remaining work still completes.
    ReportAll,
}

bitflags! {
    /// Fixups applied to the clip-space position written by a vertex stage.
    #[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct ClipSpaceFixup: u32 {
        /// No fixup
        const NONE = 0;
        /// Remap depth from [0, 1] to [-1, 1]: pos.z = pos.z * 2.0 - pos.w
        const DEPTH_REMAP = 1 << 0;
        /// Y-flip is unconditional: pos.y = -pos.y
        const Y_FLIP = 1 << 1;
    }
}

bitflags! {
    /// Features a backend can express.
    #[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct BackendCapabilities: u32 {
        const VERTEX = 1 << 0;
        const FRAGMENT = 1 << 1;
        const COMPUTE = 1 << 2;
        const STRUCTURED_BUFFERS = 1 << 3;
        const MULTISAMPLE_TEXTURES = 1 << 4;
        /// Samplers are bound independently of the textures they sample.
        const SEPARATE_SAMPLERS = 1 << 5;
        /// Set and slot indices appear in the emitted source.
        const EXPLICIT_BINDING_INDICES = 1 << 6;
    }
}

bitflags! {
    /// The stage interface roles a struct plays in a model.
    #[derive(Debug, Default, Copy, Clone, Hash, PartialEq, Eq)]
    pub struct StructRoles: u32 {
        const VERTEX_INPUT = 1 << 0;
        const VERTEX_OUTPUT = 1 << 1;
        const FRAGMENT_INPUT = 1 << 2;
        const FRAGMENT_OUTPUT = 1 << 3;
    }
}

impl StructRoles {
    /// Vertex outputs and fragment inputs, wired between stages.
    pub fn is_varying(&self) -> bool {
        self.intersects(StructRoles::VERTEX_OUTPUT | StructRoles::FRAGMENT_INPUT)
    }
}
