use crate::backend::{
    call, common_intrinsic_name, entry_function, parenthesized, unsupported_intrinsic, CodeWriter,
    EmitContext, LanguageBackend, Operand,
};
use crate::enums::{BackendCapabilities, BackendKind, StructRoles};
use crate::error::{Result, ShaderGenError};
use crate::model::{Parameter, ResourceBinding, ShaderFunction, ShaderModel, StructDefinition};
use shadergen_ir::ir::Intrinsic;
use shadergen_ir::{AccessMode, ParamDirection, ResourceKind, ScalarKind, Semantic, ShaderType, Stage};

const RESERVED: &[&str] = &[
    "alignas", "alignof", "and", "asm", "auto", "bool", "break", "case", "catch", "char", "class",
    "const", "constant", "constexpr", "continue", "decltype", "default", "delete", "device", "do",
    "double", "else", "enum", "explicit", "export", "extern", "false", "float", "for", "fragment",
    "friend", "goto", "half", "if", "inline", "int", "kernel", "long", "main", "mutable",
    "namespace", "new", "noexcept", "not", "nullptr", "operator", "or", "private", "protected",
    "public", "register", "return", "sampler", "short", "signed", "sizeof", "static",
    "struct", "switch", "template", "texture", "this", "thread", "threadgroup", "throw", "true",
    "try", "typedef", "typename", "uint", "union", "unsigned", "using", "vertex", "virtual", "void",
    "volatile", "while", "xor",
];

const CONTAINER: &str = "ShaderContainer";

/// Metal Shading Language.
///
/// Resources become members of a `ShaderContainer` struct that also holds
/// every reachable function. The stage function constructs the container
/// from its bound arguments and forwards to the entry point.
#[derive(Debug, Default, Clone)]
pub struct MetalBackend;

#[derive(Copy, Clone, PartialEq, Eq)]
enum ArgumentTable {
    Buffer,
    Texture,
    Sampler,
}

impl MetalBackend {
    pub fn new() -> MetalBackend {
        MetalBackend
    }

    fn scalar(kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
        }
    }

    fn table(binding: &ResourceBinding) -> ArgumentTable {
        match binding.ty.kind {
            ResourceKind::UniformBuffer | ResourceKind::StructuredBuffer => ArgumentTable::Buffer,
            ResourceKind::Sampler => ArgumentTable::Sampler,
            _ => ArgumentTable::Texture,
        }
    }

    /// `[[buffer(n)]]`, `[[texture(n)]]` or `[[sampler(n)]]`, counted per table.
    fn argument_attribute(ctx: &EmitContext, binding: &ResourceBinding) -> String {
        let table = MetalBackend::table(binding);
        let index = ctx
            .model
            .resources_for(ctx.stage)
            .take_while(|r| r.name != binding.name)
            .filter(|r| MetalBackend::table(r) == table)
            .count();
        match table {
            ArgumentTable::Buffer => format!("[[buffer({index})]]"),
            ArgumentTable::Texture => format!("[[texture({index})]]"),
            ArgumentTable::Sampler => format!("[[sampler({index})]]"),
        }
    }

    fn resource_declaration(&self, binding: &ResourceBinding, name: &str) -> Result<String> {
        let ty = self.type_name(&binding.shader_type())?;
        Ok(match (binding.ty.kind, binding.ty.access) {
            (ResourceKind::UniformBuffer, _) => format!("constant {ty}& {name}"),
            (ResourceKind::StructuredBuffer, AccessMode::ReadOnly) => format!("const device {ty}* {name}"),
            (ResourceKind::StructuredBuffer, AccessMode::ReadWrite) => format!("device {ty}* {name}"),
            _ => format!("{ty} {name}"),
        })
    }

    fn builtin_attribute(semantic: Semantic) -> Option<&'static str> {
        match semantic {
            Semantic::VertexIndex => Some("[[vertex_id]]"),
            Semantic::InstanceIndex => Some("[[instance_id]]"),
            Semantic::DispatchThreadId => Some("[[thread_position_in_grid]]"),
            Semantic::GroupThreadId => Some("[[thread_position_in_threadgroup]]"),
            Semantic::GroupId => Some("[[threadgroup_position_in_grid]]"),
            _ => None,
        }
    }

    /// Texture coordinates, with array layers split off into their own argument.
    fn coordinates(texture: &Operand, coordinates: &Operand) -> String {
        match texture.ty.resource().map(|r| r.kind) {
            Some(ResourceKind::Texture2DArray) => {
                let base = parenthesized(&coordinates.text);
                format!("{base}.xy, uint(rint({base}.z))")
            }
            _ => coordinates.text.clone(),
        }
    }
}

impl LanguageBackend for MetalBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Metal
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::VERTEX
            | BackendCapabilities::FRAGMENT
            | BackendCapabilities::COMPUTE
            | BackendCapabilities::STRUCTURED_BUFFERS
            | BackendCapabilities::MULTISAMPLE_TEXTURES
            | BackendCapabilities::SEPARATE_SAMPLERS
            | BackendCapabilities::EXPLICIT_BINDING_INDICES
    }

    fn type_name(&self, ty: &ShaderType) -> Result<String> {
        Ok(match ty {
            ShaderType::Void => "void".to_string(),
            ShaderType::Scalar(kind) => MetalBackend::scalar(*kind).to_string(),
            ShaderType::Vector(kind, size) => format!("{}{size}", MetalBackend::scalar(*kind)),
            ShaderType::Matrix4x4 => "float4x4".to_string(),
            ShaderType::Struct(name) => self.struct_name(name),
            ShaderType::Array(element, len) => format!("array<{}, {len}>", self.type_name(element)?),
            ShaderType::Resource(resource) => match resource.kind {
                ResourceKind::Texture2D => "texture2d<float>".to_string(),
                ResourceKind::Texture2DArray => "texture2d_array<float>".to_string(),
                ResourceKind::TextureCube => "texturecube<float>".to_string(),
                ResourceKind::Texture2DMS => "texture2d_ms<float>".to_string(),
                ResourceKind::DepthTexture2D => "depth2d<float>".to_string(),
                ResourceKind::Sampler => "sampler".to_string(),
                ResourceKind::UniformBuffer | ResourceKind::StructuredBuffer => {
                    let element = resource
                        .element()
                        .ok_or_else(|| ShaderGenError::unsupported_type(self.kind(), ty))?;
                    self.type_name(element)?
                }
            },
        })
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn parameter(&self, param: &Parameter) -> Result<String> {
        let name = self.identifier(&param.name);
        match param.direction {
            ParamDirection::In => self.declaration(&param.ty, &name),
            ParamDirection::Out | ParamDirection::InOut => {
                Ok(format!("thread {}& {name}", self.type_name(&param.ty)?))
            }
        }
    }

    fn emit_header(&self, w: &mut CodeWriter, ctx: &EmitContext) -> Result<()> {
        w.line("#include <metal_stdlib>");
        w.line("using namespace metal;");
        w.blank();
        if let Some(entry) = ctx.entry().filter(|_| ctx.stage == Stage::Compute) {
            if let Some([x, y, z]) = entry.thread_group_size {
                w.line(format!(
                    "constant uint3 {}_ThreadGroupSize = uint3({x}, {y}, {z});",
                    entry.name
                ));
                w.blank();
            }
        }
        Ok(())
    }

    fn emit_struct(&self, w: &mut CodeWriter, ctx: &EmitContext, definition: &StructDefinition) -> Result<()> {
        let roles = ctx.model.struct_roles(&definition.name);
        w.line(format!("struct {}", self.struct_name(&definition.name)));
        w.open();
        for (index, field) in definition.fields.iter().enumerate() {
            let mut line = self.declaration(&field.ty, &self.identifier(&field.name))?;
            if roles.contains(StructRoles::VERTEX_INPUT) {
                line.push_str(&format!(" [[attribute({index})]]"));
            }
            match field.semantic {
                Some(Semantic::SystemPosition) if roles.is_varying() => line.push_str(" [[position]]"),
                Some(Semantic::ColorTarget(n)) if roles.contains(StructRoles::FRAGMENT_OUTPUT) => {
                    line.push_str(&format!(" [[color({n})]]"))
                }
                _ if roles.is_varying() && field.ty.is_integer() => line.push_str(" [[flat]]"),
                _ => {}
            }
            w.line(format!("{line};"));
        }
        w.close_with(";");
        w.blank();
        Ok(())
    }

    /// Declares the resource as a container member.
    fn emit_resource(&self, w: &mut CodeWriter, _ctx: &EmitContext, binding: &ResourceBinding) -> Result<()> {
        w.line(format!("{};", self.resource_declaration(binding, &self.identifier(&binding.name))?));
        Ok(())
    }

    fn emit_entry_wrapper(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        let qualifier = match ctx.stage {
            Stage::Vertex => "vertex",
            Stage::Fragment => "fragment",
            Stage::Compute => "kernel",
        };
        let mut params = Vec::new();
        let mut args = Vec::new();
        for param in &function.params {
            let name = self.identifier(&param.name);
            let attribute = match param.semantic.and_then(MetalBackend::builtin_attribute) {
                Some(attribute) => attribute,
                None => "[[stage_in]]",
            };
            params.push(format!("{} {attribute}", self.declaration(&param.ty, &name)?));
            args.push(name);
        }
        let mut resources = Vec::new();
        for binding in ctx.model.resources_for(ctx.stage) {
            let name = self.identifier(&binding.name);
            params.push(format!(
                "{} {}",
                self.resource_declaration(binding, &name)?,
                MetalBackend::argument_attribute(ctx, binding)
            ));
            resources.push(name);
        }

        let name = self.function_name(ctx, function);
        w.line(format!(
            "{qualifier} {} {name}({})",
            self.type_name(&function.return_type)?,
            params.join(", ")
        ));
        w.open();
        let forward = format!("{CONTAINER}({}).{name}({})", resources.join(", "), args.join(", "));
        if function.return_type.is_void() {
            w.line(format!("{forward};"));
        } else {
            w.line(format!("return {forward};"));
        }
        w.close();
        Ok(())
    }

    fn translate_intrinsic(&self, ctx: &EmitContext, intrinsic: Intrinsic, args: &[Operand]) -> Result<String> {
        Ok(match (intrinsic, args) {
            (Intrinsic::Atan2, _) => call("atan2", args),
            (Intrinsic::Frac, _) => call("fract", args),
            (Intrinsic::Lerp, _) => call("mix", args),
            (Intrinsic::Rsqrt, _) => call("rsqrt", args),
            (Intrinsic::Saturate, _) => call("saturate", args),
            (Intrinsic::Ddx, _) => call("dfdx", args),
            (Intrinsic::Ddy, _) => call("dfdy", args),
            (Intrinsic::Sample, [texture, sampler, coordinates]) => format!(
                "{}.sample({}, {})",
                texture.text,
                sampler.text,
                MetalBackend::coordinates(texture, coordinates)
            ),
            (Intrinsic::SampleLevel, [texture, sampler, coordinates, lod]) => format!(
                "{}.sample({}, {}, level({}))",
                texture.text,
                sampler.text,
                MetalBackend::coordinates(texture, coordinates),
                lod.text
            ),
            (Intrinsic::Load, [texture, coordinates, sample]) => format!(
                "{}.read(uint2({}), uint({}))",
                texture.text, coordinates.text, sample.text
            ),
            (Intrinsic::Barrier, _) => "threadgroup_barrier(mem_flags::mem_threadgroup)".to_string(),
            (other, _) => match common_intrinsic_name(other) {
                Some(name) if !other.is_texture_operation() => call(name, args),
                _ => return Err(unsupported_intrinsic(self, ctx, other)),
            },
        })
    }

    fn generate(&self, model: &ShaderModel, stage: Stage) -> Result<String> {
        let entry = entry_function(model, stage)?;
        let ctx = EmitContext::new(model, stage);
        let mut w = CodeWriter::new();

        self.emit_header(&mut w, &ctx)?;
        for definition in model.structs_for(stage) {
            self.emit_struct(&mut w, &ctx, definition)?;
        }

        w.line(format!("struct {CONTAINER}"));
        w.open();
        let resources: Vec<&ResourceBinding> = model.resources_for(stage).collect();
        for binding in &resources {
            self.emit_resource(&mut w, &ctx, binding)?;
        }
        if !resources.is_empty() {
            let mut params = Vec::with_capacity(resources.len());
            let mut initializers = Vec::with_capacity(resources.len());
            for binding in &resources {
                let name = self.identifier(&binding.name);
                params.push(self.resource_declaration(binding, &format!("{name}_param"))?);
                initializers.push(format!("{name}({name}_param)"));
            }
            w.blank();
            w.line(format!("{CONTAINER}({})", params.join(", ")));
            w.line(format!(": {}", initializers.join(", ")));
            w.line("{}");
        }
        w.blank();
        for function in model.functions_for(stage) {
            self.emit_function(&mut w, &ctx, function)?;
        }
        w.close_with(";");
        w.blank();

        self.emit_entry_wrapper(&mut w, &ctx, entry)?;
        Ok(w.finish())
    }
}
