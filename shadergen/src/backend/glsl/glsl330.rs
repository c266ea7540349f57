use crate::backend::glsl::GlslDialect;
use crate::backend::{CodeWriter, EmitContext, Operand};
use crate::enums::{BackendCapabilities, BackendKind, ClipSpaceFixup};
use crate::model::ResourceBinding;
use shadergen_ir::{ResourceKind, Semantic, Stage};

/// Desktop OpenGL 3.3 core. Textures and samplers are combined, so sampler
/// resources are dropped and the texture alone is sampled.
#[derive(Debug, Default, Clone)]
pub struct Glsl330;

impl GlslDialect for Glsl330 {
    const KIND: BackendKind = BackendKind::Glsl330;

    fn capabilities() -> BackendCapabilities {
        BackendCapabilities::VERTEX
            | BackendCapabilities::FRAGMENT
            | BackendCapabilities::COMPUTE
            | BackendCapabilities::STRUCTURED_BUFFERS
            | BackendCapabilities::MULTISAMPLE_TEXTURES
    }

    fn default_fixup() -> ClipSpaceFixup {
        ClipSpaceFixup::DEPTH_REMAP
    }

    fn emit_version(w: &mut CodeWriter, ctx: &EmitContext) {
        w.line("#version 330 core");
        if ctx.stage == Stage::Compute {
            w.line("#extension GL_ARB_compute_shader : enable");
            w.line("#extension GL_ARB_shader_storage_buffer_object : enable");
        } else if ctx
            .model
            .resources_for(ctx.stage)
            .any(|r| r.kind() == ResourceKind::StructuredBuffer)
        {
            w.line("#extension GL_ARB_shader_storage_buffer_object : enable");
        }
    }

    fn texture_type(kind: ResourceKind) -> Option<&'static str> {
        match kind {
            ResourceKind::Texture2D | ResourceKind::DepthTexture2D => Some("sampler2D"),
            ResourceKind::Texture2DArray => Some("sampler2DArray"),
            ResourceKind::TextureCube => Some("samplerCube"),
            ResourceKind::Texture2DMS => Some("sampler2DMS"),
            _ => None,
        }
    }

    fn resource_layout(_binding: &ResourceBinding, packing: Option<&str>) -> String {
        packing.map(|p| format!("layout({p}) ")).unwrap_or_default()
    }

    fn sampler_expression(texture: &Operand, _sampler: &Operand) -> String {
        texture.text.clone()
    }

    fn varying_layout(_location: usize) -> String {
        String::new()
    }

    fn vertex_builtin(semantic: Semantic) -> Option<&'static str> {
        match semantic {
            Semantic::VertexIndex => Some("gl_VertexID"),
            Semantic::InstanceIndex => Some("gl_InstanceID"),
            _ => None,
        }
    }
}
