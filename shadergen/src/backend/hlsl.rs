use crate::backend::{
    call, common_intrinsic_name, is_matrix_product, mangle, unsupported_intrinsic, BodyWriter,
    CodeWriter, EmitContext, LanguageBackend, Operand,
};
use crate::enums::{BackendCapabilities, BackendKind};
use crate::error::{Result, ShaderGenError};
use crate::model::{Parameter, ResourceBinding, ShaderFunction, StructDefinition};
use shadergen_ir::ir::{BinaryOp, Intrinsic};
use shadergen_ir::{AccessMode, ParamDirection, ResourceKind, ScalarKind, Semantic, ShaderType, Stage};
use std::collections::HashMap;

const RESERVED: &[&str] = &[
    "AppendStructuredBuffer", "BlendState", "Buffer", "ByteAddressBuffer", "ConsumeStructuredBuffer",
    "RWBuffer", "RWStructuredBuffer", "RWTexture2D", "SamplerState", "StructuredBuffer", "Texture2D",
    "Texture2DArray", "Texture2DMS", "TextureCube", "asm", "bool", "break", "case", "cbuffer",
    "centroid", "class", "column_major", "compile", "const", "continue", "default", "discard", "do",
    "double", "else", "export", "extern", "false", "float", "for", "groupshared", "half", "if", "in",
    "inline", "inout", "int", "interface", "line", "linear", "matrix", "namespace", "nointerpolation",
    "noperspective", "out", "packoffset", "pass", "point", "precise", "register", "return",
    "row_major", "sample", "sampler", "shared", "snorm", "static", "string", "struct", "switch",
    "tbuffer", "technique", "texture", "true", "typedef", "uint", "uniform", "unorm", "unsigned",
    "vector", "void", "volatile", "while",
];

/// HLSL for Direct3D 11 and later (shader model 5).
#[derive(Debug, Default, Clone)]
pub struct HlslBackend;

impl HlslBackend {
    pub fn new() -> HlslBackend {
        HlslBackend
    }

    fn scalar(kind: ScalarKind) -> &'static str {
        match kind {
            ScalarKind::Bool => "bool",
            ScalarKind::Int => "int",
            ScalarKind::UInt => "uint",
            ScalarKind::Float => "float",
        }
    }

    /// `b`, `t`, `s` or `u`, and the index within that class in model order.
    fn register(ctx: &EmitContext, binding: &ResourceBinding) -> (char, usize) {
        let class = |r: &ResourceBinding| match r.ty.kind {
            ResourceKind::UniformBuffer => 'b',
            ResourceKind::Sampler => 's',
            ResourceKind::StructuredBuffer if r.ty.access == AccessMode::ReadWrite => 'u',
            _ => 't',
        };
        let own = class(binding);
        let index = ctx
            .model
            .resources()
            .iter()
            .take_while(|r| r.name != binding.name)
            .filter(|r| class(r) == own)
            .count();
        (own, index)
    }

    /// Semantics for every field of a stage interface struct, numbered per kind.
    fn field_semantics(definition: &StructDefinition) -> Vec<String> {
        let mut counters: HashMap<&'static str, u32> = HashMap::new();
        definition
            .fields
            .iter()
            .map(|field| {
                let base = match field.semantic {
                    Some(Semantic::SystemPosition) => return "SV_Position".to_string(),
                    Some(Semantic::ColorTarget(n)) => return format!("SV_Target{n}"),
                    Some(Semantic::Position) => "POSITION",
                    Some(Semantic::Normal) => "NORMAL",
                    Some(Semantic::Color) => "COLOR",
                    Some(Semantic::Tangent) => "TANGENT",
                    _ => "TEXCOORD",
                };
                let counter = counters.entry(base).or_insert(0);
                let semantic = format!("{base}{counter}");
                *counter += 1;
                semantic
            })
            .collect()
    }

    fn builtin_semantic(semantic: Semantic) -> Option<&'static str> {
        match semantic {
            Semantic::VertexIndex => Some("SV_VertexID"),
            Semantic::InstanceIndex => Some("SV_InstanceID"),
            Semantic::DispatchThreadId => Some("SV_DispatchThreadID"),
            Semantic::GroupThreadId => Some("SV_GroupThreadID"),
            Semantic::GroupId => Some("SV_GroupID"),
            _ => None,
        }
    }
}

impl LanguageBackend for HlslBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Hlsl
    }

    fn capabilities(&self) -> BackendCapabilities {
        BackendCapabilities::VERTEX
            | BackendCapabilities::FRAGMENT
            | BackendCapabilities::COMPUTE
            | BackendCapabilities::STRUCTURED_BUFFERS
            | BackendCapabilities::MULTISAMPLE_TEXTURES
            | BackendCapabilities::SEPARATE_SAMPLERS
    }

    fn type_name(&self, ty: &ShaderType) -> Result<String> {
        Ok(match ty {
            ShaderType::Void => "void".to_string(),
            ShaderType::Scalar(kind) => HlslBackend::scalar(*kind).to_string(),
            ShaderType::Vector(kind, size) => format!("{}{size}", HlslBackend::scalar(*kind)),
            ShaderType::Matrix4x4 => "float4x4".to_string(),
            ShaderType::Struct(name) => self.struct_name(name),
            ShaderType::Array(element, len) => format!("{}[{len}]", self.type_name(element)?),
            ShaderType::Resource(resource) => match resource.kind {
                ResourceKind::Texture2D => "Texture2D<float4>".to_string(),
                ResourceKind::Texture2DArray => "Texture2DArray<float4>".to_string(),
                ResourceKind::TextureCube => "TextureCube<float4>".to_string(),
                ResourceKind::Texture2DMS => "Texture2DMS<float4>".to_string(),
                ResourceKind::DepthTexture2D => "Texture2D<float>".to_string(),
                ResourceKind::Sampler => "SamplerState".to_string(),
                ResourceKind::UniformBuffer | ResourceKind::StructuredBuffer => {
                    let element = resource
                        .element()
                        .ok_or_else(|| ShaderGenError::unsupported_type(self.kind(), ty))?;
                    let element = self.type_name(element)?;
                    match (resource.kind, resource.access) {
                        (ResourceKind::UniformBuffer, _) => element,
                        (_, AccessMode::ReadOnly) => format!("StructuredBuffer<{element}>"),
                        (_, AccessMode::ReadWrite) => format!("RWStructuredBuffer<{element}>"),
                    }
                }
            },
        })
    }

    fn reserved_words(&self) -> &'static [&'static str] {
        RESERVED
    }

    fn cast(&self, ty: &ShaderType, operand: &str) -> Result<String> {
        Ok(format!("(({})({operand}))", self.type_name(ty)?))
    }

    fn binary(&self, op: BinaryOp, lhs: &Operand, rhs: &Operand) -> String {
        if is_matrix_product(op, lhs, rhs) {
            // Row-major storage with swapped operands matches column-vector math.
            format!("mul({}, {})", rhs.text, lhs.text)
        } else {
            format!("({} {} {})", lhs.text, op.symbol(), rhs.text)
        }
    }

    fn emit_header(&self, w: &mut CodeWriter, _ctx: &EmitContext) -> Result<()> {
        w.line("#pragma pack_matrix(row_major)");
        w.blank();
        Ok(())
    }

    fn emit_struct(&self, w: &mut CodeWriter, ctx: &EmitContext, definition: &StructDefinition) -> Result<()> {
        let is_interface = !ctx.model.struct_roles(&definition.name).is_empty();
        let semantics = HlslBackend::field_semantics(definition);
        w.line(format!("struct {}", self.struct_name(&definition.name)));
        w.open();
        for (field, semantic) in definition.fields.iter().zip(&semantics) {
            let declaration = self.declaration(&field.ty, &self.identifier(&field.name))?;
            if is_interface {
                w.line(format!("{declaration} : {semantic};"));
            } else {
                w.line(format!("{declaration};"));
            }
        }
        w.close_with(";");
        w.blank();
        Ok(())
    }

    fn emit_resource(&self, w: &mut CodeWriter, ctx: &EmitContext, binding: &ResourceBinding) -> Result<()> {
        let (class, index) = HlslBackend::register(ctx, binding);
        let name = self.identifier(&binding.name);
        let ty = self.type_name(&binding.shader_type())?;
        if binding.ty.kind == ResourceKind::UniformBuffer {
            w.line(format!("cbuffer {}Buffer : register({class}{index})", mangle(&binding.name)));
            w.open();
            w.line(format!("{ty} {name};"));
            w.close_with(";");
        } else {
            w.line(format!("{ty} {name} : register({class}{index});"));
        }
        w.blank();
        Ok(())
    }

    fn emit_entry_wrapper(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        if let (Stage::Compute, Some([x, y, z])) = (ctx.stage, function.thread_group_size) {
            w.line(format!("[numthreads({x}, {y}, {z})]"));
        }
        let ctx = ctx.with_function(function);
        let mut signature = self.function_signature(&ctx, function)?;
        if function.return_type == ShaderType::float4() {
            match ctx.stage {
                Stage::Vertex => signature.push_str(" : SV_Position"),
                Stage::Fragment => signature.push_str(" : SV_Target"),
                Stage::Compute => {}
            }
        }
        w.line(signature);
        w.open();
        BodyWriter::new(self, ctx).stmts(w, &function.body)?;
        w.close();
        Ok(())
    }

    fn parameter(&self, param: &Parameter) -> Result<String> {
        let declaration = self.declaration(&param.ty, &self.identifier(&param.name))?;
        let declaration = match param.direction {
            ParamDirection::In => declaration,
            ParamDirection::Out => format!("out {declaration}"),
            ParamDirection::InOut => format!("inout {declaration}"),
        };
        Ok(match param.semantic.and_then(HlslBackend::builtin_semantic) {
            Some(semantic) => format!("{declaration} : {semantic}"),
            None => declaration,
        })
    }

    fn translate_intrinsic(&self, ctx: &EmitContext, intrinsic: Intrinsic, args: &[Operand]) -> Result<String> {
        let arg = |i: usize| -> Result<&str> {
            args.get(i)
                .map(|a| a.text.as_str())
                .ok_or_else(|| unsupported_intrinsic(self, ctx, intrinsic))
        };
        Ok(match intrinsic {
            Intrinsic::Atan2 => call("atan2", args),
            Intrinsic::Frac => call("frac", args),
            Intrinsic::Lerp => call("lerp", args),
            Intrinsic::Rsqrt => call("rsqrt", args),
            Intrinsic::Saturate => call("saturate", args),
            Intrinsic::Ddx => call("ddx", args),
            Intrinsic::Ddy => call("ddy", args),
            Intrinsic::Sample => format!("{}.Sample({}, {})", arg(0)?, arg(1)?, arg(2)?),
            Intrinsic::SampleLevel => {
                format!("{}.SampleLevel({}, {}, {})", arg(0)?, arg(1)?, arg(2)?, arg(3)?)
            }
            Intrinsic::Load => format!("{}.Load(int2({}), {})", arg(0)?, arg(1)?, arg(2)?),
            Intrinsic::Barrier => "GroupMemoryBarrierWithGroupSync()".to_string(),
            other => match common_intrinsic_name(other) {
                Some(name) => call(name, args),
                None => return Err(unsupported_intrinsic(self, ctx, other)),
            },
        })
    }
}
