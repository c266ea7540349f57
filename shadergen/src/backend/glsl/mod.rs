//! GLSL backends.
//!
//! The three dialects share type spelling, stage wiring and intrinsics. A
//! [`GlslDialect`] supplies the version header, resource layouts and the way
//! textures meet samplers.

mod glsl330;
mod glsl450;
mod glsles300;

pub use glsl330::Glsl330;
pub use glsl450::Glsl450;
pub use glsles300::GlslEs300;

use crate::backend::{
    call, common_intrinsic_name, float_text, mangle, unsupported_intrinsic, CodeWriter, EmitContext,
    LanguageBackend, Operand,
};
use crate::config::BackendConfig;
use crate::enums::{BackendCapabilities, BackendKind, ClipSpaceFixup};
use crate::error::{Result, ShaderGenError};
use crate::model::{ResourceBinding, ShaderFunction, StructDefinition};
use shadergen_ir::ir::Intrinsic;
use shadergen_ir::{AccessMode, ResourceKind, ScalarKind, Semantic, ShaderType, Stage};
use std::fmt::Debug;
use std::marker::PhantomData;

pub type Glsl330Backend = GlslBackend<Glsl330>;
pub type GlslEs300Backend = GlslBackend<GlslEs300>;
pub type Glsl450Backend = GlslBackend<Glsl450>;

const RESERVED: &[&str] = &[
    "active", "asm", "attribute", "bool", "break", "buffer", "bvec2", "bvec3", "bvec4", "case",
    "cast", "centroid", "class", "coherent", "common", "const", "continue", "default", "discard",
    "do", "double", "else", "enum", "extern", "external", "false", "filter", "fixed", "flat",
    "float", "for", "goto", "half", "highp", "if", "in", "inline", "inout", "input", "int",
    "interface", "invariant", "ivec2", "ivec3", "ivec4", "layout", "long", "lowp", "main", "mat2",
    "mat3", "mat4", "mediump", "namespace", "noinline", "noperspective", "out", "output",
    "partition", "patch", "precision", "public", "readonly", "resource", "restrict", "return",
    "sample", "sampler", "sampler2D", "shared", "short", "sizeof", "smooth", "static", "struct",
    "subroutine", "superp", "switch", "template", "texture", "this", "true", "typedef", "uint",
    "uniform", "union", "unsigned", "using", "uvec2", "uvec3", "uvec4", "varying", "vec2", "vec3",
    "vec4", "void", "volatile", "while", "writeonly",
];

/// What distinguishes one GLSL version from another.
pub trait GlslDialect: Debug + Default + Clone + Send + Sync + 'static {
    const KIND: BackendKind;

    fn capabilities() -> BackendCapabilities;

    fn default_fixup() -> ClipSpaceFixup;

    /// `#version` and whatever has to follow it directly.
    fn emit_version(w: &mut CodeWriter, ctx: &EmitContext);

    /// Type of a texture or sampler, `None` when the dialect cannot declare it.
    fn texture_type(kind: ResourceKind) -> Option<&'static str>;

    /// The `layout(...) ` prefix of a resource declaration, possibly empty.
    fn resource_layout(binding: &ResourceBinding, packing: Option<&str>) -> String;

    /// The sampler operand of `texture` and `textureLod`.
    fn sampler_expression(texture: &Operand, sampler: &Operand) -> String;

    /// The `layout(...) ` prefix of a varying, possibly empty.
    fn varying_layout(location: usize) -> String;

    fn vertex_builtin(semantic: Semantic) -> Option<&'static str>;

    /// Whether storage buffers can be declared in `stage`.
    fn storage_buffers(_stage: Stage) -> bool {
        true
    }
}

/// A GLSL backend for the dialect `D`.
#[derive(Debug, Clone)]
pub struct GlslBackend<D: GlslDialect> {
    fixup: ClipSpaceFixup,
    dialect: PhantomData<D>,
}

impl<D: GlslDialect> GlslBackend<D> {
    pub fn new(config: &BackendConfig) -> GlslBackend<D> {
        GlslBackend {
            fixup: config.clip_space_fixup.unwrap_or_else(D::default_fixup),
            dialect: PhantomData,
        }
    }

    pub fn clip_space_fixup(&self) -> ClipSpaceFixup {
        self.fixup
    }

    fn scalar(kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
        }
    }

    fn vector_prefix(kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Bool => "b",
            ScalarKind::Int => "i",
            ScalarKind::UInt => "u",
            ScalarKind::Float => "",
        }
    }

    fn interpolation(ty: &ShaderType) -> &'static str {
        if ty.is_integer() {
            "flat "
        } else {
            ""
        }
    }

    fn interface_struct<'m>(ctx: &EmitContext<'m>, ty: &ShaderType) -> Result<Option<&'m StructDefinition>> {
        match ty.struct_name() {
            Some(name) => ctx
                .model
                .get_struct(name)
                .map(Some)
                .ok_or_else(|| ShaderGenError::construct(ctx.symbol(), format!("unknown struct {name}"))),
            None => Ok(None),
        }
    }

    fn builtin(&self, ctx: &EmitContext, semantic: Semantic) -> Result<&'static str> {
        let builtin = match semantic {
            Semantic::DispatchThreadId => Some("gl_GlobalInvocationID"),
            Semantic::GroupThreadId => Some("gl_LocalInvocationID"),
            Semantic::GroupId => Some("gl_WorkGroupID"),
            other => D::vertex_builtin(other),
        };
        builtin.ok_or_else(|| ShaderGenError::construct(ctx.symbol(), format!("{semantic} has no GLSL builtin")))
    }

    /// Arguments of the entry call inside `main`.
    fn entry_arguments(&self, ctx: &EmitContext, function: &ShaderFunction) -> Result<Vec<String>> {
        function
            .params
            .iter()
            .map(|param| match param.semantic.filter(Semantic::is_builtin) {
                Some(semantic @ (Semantic::VertexIndex | Semantic::InstanceIndex)) => {
                    Ok(format!("uint({})", self.builtin(ctx, semantic)?))
                }
                Some(semantic) => Ok(self.builtin(ctx, semantic)?.to_string()),
                None => Ok("_stage_input".to_string()),
            })
            .collect()
    }

    fn emit_vertex_main(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        let input = match function.input_param() {
            Some(param) => GlslBackend::<D>::interface_struct(ctx, &param.ty)?,
            None => None,
        };
        let output = GlslBackend::<D>::interface_struct(ctx, &function.return_type)?;

        if let Some(input) = input {
            for (location, field) in input.fields.iter().enumerate() {
                let declaration = self.declaration(&field.ty, &self.identifier(&field.name))?;
                w.line(format!("layout(location = {location}) in {declaration};"));
            }
        }
        if let Some(output) = output {
            for (location, field) in output.varyings() {
                w.line(format!(
                    "{}{}out {};",
                    D::varying_layout(location),
                    GlslBackend::<D>::interpolation(&field.ty),
                    self.declaration(&field.ty, &format!("fsin_{location}"))?
                ));
            }
        }
        w.blank();

        w.line("void main()");
        w.open();
        if let Some(input) = input {
            w.line(format!("{} _stage_input;", self.struct_name(&input.name)));
            for field in &input.fields {
                let name = self.identifier(&field.name);
                w.line(format!("_stage_input.{name} = {name};"));
            }
        }
        let entry_call = format!(
            "{}({})",
            self.function_name(ctx, function),
            self.entry_arguments(ctx, function)?.join(", ")
        );
        match output {
            Some(output) => {
                w.line(format!("{} _stage_output = {entry_call};", self.struct_name(&output.name)));
                for field in &output.fields {
                    if field.semantic == Some(Semantic::SystemPosition) {
                        w.line(format!("gl_Position = _stage_output.{};", self.identifier(&field.name)));
                    }
                }
                for (location, field) in output.varyings() {
                    w.line(format!("fsin_{location} = _stage_output.{};", self.identifier(&field.name)));
                }
            }
            None => w.line(format!("gl_Position = {entry_call};")),
        }
        if self.fixup.contains(ClipSpaceFixup::DEPTH_REMAP) {
            w.line("gl_Position.z = gl_Position.z * 2.0 - gl_Position.w;");
        }
        if self.fixup.contains(ClipSpaceFixup::Y_FLIP) {
            w.line("gl_Position.y = -gl_Position.y;");
        }
        w.close();
        Ok(())
    }

    fn emit_fragment_main(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        let input = match function.input_param() {
            Some(param) => GlslBackend::<D>::interface_struct(ctx, &param.ty)?,
            None => None,
        };
        let output = GlslBackend::<D>::interface_struct(ctx, &function.return_type)?;

        if let Some(input) = input {
            for (location, field) in input.varyings() {
                w.line(format!(
                    "{}{}in {};",
                    D::varying_layout(location),
                    GlslBackend::<D>::interpolation(&field.ty),
                    self.declaration(&field.ty, &format!("fsin_{location}"))?
                ));
            }
        }
        match output {
            Some(output) => {
                for field in &output.fields {
                    if let Some(Semantic::ColorTarget(n)) = field.semantic {
                        let declaration = self.declaration(&field.ty, &format!("_outputColor_{n}"))?;
                        w.line(format!("layout(location = {n}) out {declaration};"));
                    }
                }
            }
            None if function.return_type.is_void() => {}
            None => w.line("layout(location = 0) out vec4 _outputColor_0;"),
        }
        w.blank();

        w.line("void main()");
        w.open();
        if let Some(input) = input {
            w.line(format!("{} _stage_input;", self.struct_name(&input.name)));
            let mut location = 0;
            for field in &input.fields {
                let name = self.identifier(&field.name);
                if field.semantic == Some(Semantic::SystemPosition) {
                    w.line(format!("_stage_input.{name} = gl_FragCoord;"));
                } else {
                    w.line(format!("_stage_input.{name} = fsin_{location};"));
                    location += 1;
                }
            }
        }
        let entry_call = format!(
            "{}({})",
            self.function_name(ctx, function),
            self.entry_arguments(ctx, function)?.join(", ")
        );
        match output {
            Some(output) => {
                w.line(format!("{} _stage_output = {entry_call};", self.struct_name(&output.name)));
                for field in &output.fields {
                    if let Some(Semantic::ColorTarget(n)) = field.semantic {
                        w.line(format!("_outputColor_{n} = _stage_output.{};", self.identifier(&field.name)));
                    }
                }
            }
            None if function.return_type.is_void() => w.line(format!("{entry_call};")),
            None => w.line(format!("_outputColor_0 = {entry_call};")),
        }
        w.close();
        Ok(())
    }

    fn emit_compute_main(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        w.line("void main()");
        w.open();
        w.line(format!(
            "{}({});",
            self.function_name(ctx, function),
            self.entry_arguments(ctx, function)?.join(", ")
        ));
        w.close();
        Ok(())
    }

    fn sample(&self, ctx: &EmitContext, intrinsic: Intrinsic, args: &[Operand]) -> Result<String> {
        let (Some(texture), Some(sampler), Some(coordinates)) = (args.first(), args.get(1), args.get(2)) else {
            return Err(unsupported_intrinsic(self, ctx, intrinsic));
        };
        let combined = D::sampler_expression(texture, sampler);
        let sampled = match args.get(3) {
            Some(lod) => format!("textureLod({combined}, {}, {})", coordinates.text, lod.text),
            None => format!("texture({combined}, {})", coordinates.text),
        };
        if texture.ty.resource().map(|r| r.kind) == Some(ResourceKind::DepthTexture2D) {
            Ok(format!("{sampled}.r"))
        } else {
            Ok(sampled)
        }
    }
}

impl<D: GlslDialect> Default for GlslBackend<D> {
    fn default() -> Self {
        GlslBackend::new(&BackendConfig::default())
    }
}

impl<D: GlslDialect> LanguageBackend for GlslBackend<D> {
    fn kind(&self) -> BackendKind {
        D::KIND
    }

    fn capabilities(&self) -> BackendCapabilities {
        D::capabilities()
    }

    fn type_name(&self, ty: &ShaderType) -> Result<String> {
        Ok(match ty {
            ShaderType::Void => "void".to_string(),
            ShaderType::Scalar(kind) => GlslBackend::<D>::scalar(*kind).to_string(),
            ShaderType::Vector(kind, size) => format!("{}vec{size}", GlslBackend::<D>::vector_prefix(*kind)),
            ShaderType::Matrix4x4 => "mat4".to_string(),
            ShaderType::Struct(name) => self.struct_name(name),
            ShaderType::Array(element, len) => format!("{}[{len}]", self.type_name(element)?),
            ShaderType::Resource(resource) if resource.kind.is_buffer() => {
                let element = resource
                    .element()
                    .ok_or_else(|| ShaderGenError::unsupported_type(self.kind(), ty))?;
                self.type_name(element)?
            }
            ShaderType::Resource(resource) => D::texture_type(resource.kind)
                .ok_or_else(|| ShaderGenError::unsupported_type(self.kind(), ty))?
                .to_string(),
        })
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn float_literal(&self, value: f32) -> String {
        float_text(value)
    }

    fn emit_header(&self, w: &mut CodeWriter, ctx: &EmitContext) -> Result<()> {
        D::emit_version(w, ctx);
        if ctx.stage == Stage::Compute {
            if let Some([x, y, z]) = ctx.entry().and_then(|f| f.thread_group_size) {
                w.line(format!("layout(local_size_x = {x}, local_size_y = {y}, local_size_z = {z}) in;"));
            }
        }
        w.blank();
        Ok(())
    }

    fn emit_struct(&self, w: &mut CodeWriter, _ctx: &EmitContext, definition: &StructDefinition) -> Result<()> {
        w.line(format!("struct {}", self.struct_name(&definition.name)));
        w.open();
        for field in &definition.fields {
            w.line(format!("{};", self.declaration(&field.ty, &self.identifier(&field.name))?));
        }
        w.close_with(";");
        w.blank();
        Ok(())
    }

    fn emit_resource(&self, w: &mut CodeWriter, ctx: &EmitContext, binding: &ResourceBinding) -> Result<()> {
        let name = self.identifier(&binding.name);
        match binding.ty.kind {
            ResourceKind::Sampler if !self.capabilities().contains(BackendCapabilities::SEPARATE_SAMPLERS) => {
                return Ok(());
            }
            ResourceKind::UniformBuffer => {
                w.line(format!(
                    "{}uniform {}Buffer",
                    D::resource_layout(binding, Some("std140")),
                    mangle(&binding.name)
                ));
                w.open();
                w.line(format!("{};", self.declaration(&binding.shader_type(), &name)?));
                w.close_with(";");
            }
            ResourceKind::StructuredBuffer => {
                if !D::storage_buffers(ctx.stage) {
                    return Err(ShaderGenError::unsupported_type(self.kind(), &binding.shader_type()));
                }
                let access = match binding.ty.access {
                    AccessMode::ReadOnly => "readonly ",
                    AccessMode::ReadWrite => "",
                };
                w.line(format!(
                    "{}{access}buffer {}Buffer",
                    D::resource_layout(binding, Some("std430")),
                    mangle(&binding.name)
                ));
                w.open();
                w.line(format!("{} {name}[];", self.type_name(&binding.shader_type())?));
                w.close_with(";");
            }
            _ => {
                w.line(format!(
                    "{}uniform {} {name};",
                    D::resource_layout(binding, None),
                    self.type_name(&binding.shader_type())?
                ));
            }
        }
        w.blank();
        Ok(())
    }

    fn emit_entry_wrapper(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        self.emit_function(w, ctx, function)?;
        match ctx.stage {
            Stage::Vertex => self.emit_vertex_main(w, ctx, function),
            Stage::Fragment => self.emit_fragment_main(w, ctx, function),
            Stage::Compute => self.emit_compute_main(w, ctx, function),
        }
    }

    fn translate_intrinsic(&self, ctx: &EmitContext, intrinsic: Intrinsic, args: &[Operand]) -> Result<String> {
        Ok(match intrinsic {
            Intrinsic::Atan2 => call("atan", args),
            Intrinsic::Frac => call("fract", args),
            Intrinsic::Lerp => call("mix", args),
            Intrinsic::Rsqrt => call("inversesqrt", args),
            Intrinsic::Saturate => match args.first() {
                Some(x) => format!("clamp({}, 0.0, 1.0)", x.text),
                None => return Err(unsupported_intrinsic(self, ctx, intrinsic)),
            },
            Intrinsic::Ddx => call("dFdx", args),
            Intrinsic::Ddy => call("dFdy", args),
            Intrinsic::Sample | Intrinsic::SampleLevel => self.sample(ctx, intrinsic, args)?,
            Intrinsic::Load => match args {
                [texture, coordinates, sample] => format!(
                    "texelFetch({}, ivec2({}), int({}))",
                    texture.text, coordinates.text, sample.text
                ),
                _ => return Err(unsupported_intrinsic(self, ctx, intrinsic)),
            },
            Intrinsic::Barrier => "barrier()".to_string(),
            other => match common_intrinsic_name(other) {
                Some(name) => call(name, args),
                None => return Err(unsupported_intrinsic(self, ctx, other)),
            },
        })
    }
}
