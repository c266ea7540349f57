use crate::backend::glsl::{Glsl330, GlslDialect};
use crate::backend::{CodeWriter, EmitContext, Operand};
use crate::enums::{BackendCapabilities, BackendKind, ClipSpaceFixup};
use crate::model::ResourceBinding;
use shadergen_ir::{ResourceKind, Semantic, Stage};

/// OpenGL ES 3.0, and ES 3.1 for compute stages.
///
/// Multisample textures do not exist and storage buffers are only available
/// to compute stages.
#[derive(Debug, Default, Clone)]
pub struct GlslEs300;

impl GlslDialect for GlslEs300 {
    const KIND: BackendKind = BackendKind::GlslEs300;

    fn capabilities() -> BackendCapabilities {
        BackendCapabilities::VERTEX
            | BackendCapabilities::FRAGMENT
            | BackendCapabilities::COMPUTE
            | BackendCapabilities::STRUCTURED_BUFFERS
    }

    fn default_fixup() -> ClipSpaceFixup {
        ClipSpaceFixup::DEPTH_REMAP
    }

    fn emit_version(w: &mut CodeWriter, ctx: &EmitContext) {
        match ctx.stage {
            Stage::Compute => w.line("#version 310 es"),
            _ => w.line("#version 300 es"),
        }
        w.line("precision highp float;");
        w.line("precision highp int;");
        w.line("precision highp sampler2DArray;");
    }

    fn texture_type(kind: ResourceKind) -> Option<&'static str> {
        match kind {
            ResourceKind::Texture2DMS => None,
            other => Glsl330::texture_type(other),
        }
    }

    fn resource_layout(binding: &ResourceBinding, packing: Option<&str>) -> String {
        Glsl330::resource_layout(binding, packing)
    }

    fn sampler_expression(texture: &Operand, sampler: &Operand) -> String {
        Glsl330::sampler_expression(texture, sampler)
    }

    fn varying_layout(location: usize) -> String {
        Glsl330::varying_layout(location)
    }

    fn vertex_builtin(semantic: Semantic) -> Option<&'static str> {
        Glsl330::vertex_builtin(semantic)
    }

    fn storage_buffers(stage: Stage) -> bool {
        stage == Stage::Compute
    }
}
