use crate::backend::glsl::GlslDialect;
use crate::backend::{CodeWriter, EmitContext, Operand};
use crate::enums::{BackendCapabilities, BackendKind, ClipSpaceFixup};
use crate::model::ResourceBinding;
use shadergen_ir::{ResourceKind, Semantic};

/// GLSL 4.50 for Vulkan. Textures and samplers are declared separately with
/// explicit set and binding indices and combined where they are sampled.
#[derive(Debug, Default, Clone)]
pub struct Glsl450;

impl GlslDialect for Glsl450 {
    const KIND: BackendKind = BackendKind::Glsl450;

    fn capabilities() -> BackendCapabilities {
        BackendCapabilities::all()
    }

    fn default_fixup() -> ClipSpaceFixup {
        ClipSpaceFixup::Y_FLIP
    }

    fn emit_version(w: &mut CodeWriter, _ctx: &EmitContext) {
        w.line("#version 450");
        w.line("#extension GL_ARB_separate_shader_objects : enable");
        w.line("#extension GL_ARB_shading_language_420pack : enable");
    }

    fn texture_type(kind: ResourceKind) -> Option<&'static str> {
        match kind {
            ResourceKind::Texture2D | ResourceKind::DepthTexture2D => Some("texture2D"),
            ResourceKind::Texture2DArray => Some("texture2DArray"),
            ResourceKind::TextureCube => Some("textureCube"),
            // Only ever fetched, so it is declared pre-combined.
            ResourceKind::Texture2DMS => Some("sampler2DMS"),
            ResourceKind::Sampler => Some("sampler"),
            _ => None,
        }
    }

    fn resource_layout(binding: &ResourceBinding, packing: Option<&str>) -> String {
        match packing {
            Some(packing) => format!("layout(set = {}, binding = {}, {packing}) ", binding.set, binding.slot),
            None => format!("layout(set = {}, binding = {}) ", binding.set, binding.slot),
        }
    }

    fn sampler_expression(texture: &Operand, sampler: &Operand) -> String {
        let combined = match texture.ty.resource().map(|r| r.kind) {
            Some(ResourceKind::Texture2DArray) => "sampler2DArray",
            Some(ResourceKind::TextureCube) => "samplerCube",
            _ => "sampler2D",
        };
        format!("{combined}({}, {})", texture.text, sampler.text)
    }

    fn varying_layout(location: usize) -> String {
        format!("layout(location = {location}) ")
    }

    fn vertex_builtin(semantic: Semantic) -> Option<&'static str> {
        match semantic {
            Semantic::VertexIndex => Some("gl_VertexIndex"),
            Semantic::InstanceIndex => Some("gl_InstanceIndex"),
            _ => None,
        }
    }
}
