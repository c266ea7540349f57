//! The backend interface and the five target languages.

mod emit;
mod glsl;
mod hlsl;
mod metal;

pub use emit::{
    call, common_intrinsic_name, float_text, mangle, parenthesized, unsupported_intrinsic,
    BodyWriter, CodeWriter, EmitContext, Operand,
};
pub use glsl::{
    Glsl330, Glsl330Backend, Glsl450, Glsl450Backend, GlslBackend, GlslDialect, GlslEs300,
    GlslEs300Backend,
};
pub use hlsl::HlslBackend;
pub use metal::MetalBackend;

use crate::enums::{BackendCapabilities, BackendKind};
use crate::error::{Result, ShaderGenError};
use crate::model::{Parameter, ResourceBinding, ShaderFunction, ShaderModel, StructDefinition};
use shadergen_ir::ir::{BinaryOp, Intrinsic};
use shadergen_ir::{ParamDirection, ShaderType, Stage};

/// Translates a [`ShaderModel`] into the source of one shading language.
///
/// Backends never mutate the model and are shared across worker threads.
/// Callers only ever look at [`kind`](LanguageBackend::kind) and
/// [`capabilities`](LanguageBackend::capabilities), never at the concrete type.
pub trait LanguageBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    fn capabilities(&self) -> BackendCapabilities;

    /// Spelling of a type, or `UnsupportedType`.
    fn type_name(&self, ty: &ShaderType) -> Result<String>;

    fn reserved_words(&self) -> &'static [&'static str];

    /// Corrects names that collide with the target's reserved words.
    fn identifier(&self, name: &str) -> String {
        if self.reserved_words().contains(&name) {
            format!("{name}_")
        } else {
            name.to_string()
        }
    }

    fn struct_name(&self, qualified_name: &str) -> String {
        self.identifier(&mangle(qualified_name))
    }

    /// The stage entry keeps its short name; helpers are qualified.
    fn function_name(&self, ctx: &EmitContext, function: &ShaderFunction) -> String {
        if ctx.is_entry(function) {
            self.identifier(&function.name)
        } else {
            self.identifier(&mangle(&function.qualified_name))
        }
    }

    fn float_literal(&self, value: f32) -> String {
        format!("{}f", float_text(value))
    }

    /// `T name`, or `T name[N]` for arrays.
    fn declaration(&self, ty: &ShaderType, name: &str) -> Result<String> {
        match ty {
            ShaderType::Array(element, len) => Ok(format!("{} {name}[{len}]", self.type_name(element)?)),
            _ => Ok(format!("{} {name}", self.type_name(ty)?)),
        }
    }

    fn parameter(&self, param: &Parameter) -> Result<String> {
        let declaration = self.declaration(&param.ty, &self.identifier(&param.name))?;
        Ok(match param.direction {
            ParamDirection::In => declaration,
            ParamDirection::Out => format!("out {declaration}"),
            ParamDirection::InOut => format!("inout {declaration}"),
        })
    }

    fn cast(&self, ty: &ShaderType, operand: &str) -> Result<String> {
        Ok(format!("{}({operand})", self.type_name(ty)?))
    }

    fn binary(&self, op: BinaryOp, lhs: &Operand, rhs: &Operand) -> String {
        format!("({} {} {})", lhs.text, op.symbol(), rhs.text)
    }

    fn resource_reference(&self, _ctx: &EmitContext, binding: &ResourceBinding) -> String {
        self.identifier(&binding.name)
    }

    fn emit_header(&self, w: &mut CodeWriter, ctx: &EmitContext) -> Result<()>;

    fn emit_struct(&self, w: &mut CodeWriter, ctx: &EmitContext, definition: &StructDefinition) -> Result<()>;

    fn emit_resource(&self, w: &mut CodeWriter, ctx: &EmitContext, binding: &ResourceBinding) -> Result<()>;

    fn function_signature(&self, ctx: &EmitContext, function: &ShaderFunction) -> Result<String> {
        let params = function
            .params
            .iter()
            .map(|p| self.parameter(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(format!(
            "{} {}({})",
            self.type_name(&function.return_type)?,
            self.function_name(ctx, function),
            params.join(", ")
        ))
    }

    fn emit_function(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()> {
        let ctx = ctx.with_function(function);
        w.line(self.function_signature(&ctx, function)?);
        w.open();
        BodyWriter::new(self, ctx).stmts(w, &function.body)?;
        w.close();
        w.blank();
        Ok(())
    }

    /// Emits the stage entry and whatever glue the target needs around it.
    fn emit_entry_wrapper(&self, w: &mut CodeWriter, ctx: &EmitContext, function: &ShaderFunction) -> Result<()>;

    fn translate_intrinsic(&self, ctx: &EmitContext, intrinsic: Intrinsic, args: &[Operand]) -> Result<String>;

    /// Emits the complete source of one stage.
    fn generate(&self, model: &ShaderModel, stage: Stage) -> Result<String> {
        let entry = entry_function(model, stage)?;
        let ctx = EmitContext::new(model, stage);
        let mut w = CodeWriter::new();

        self.emit_header(&mut w, &ctx)?;
        for definition in model.structs_for(stage) {
            self.emit_struct(&mut w, &ctx, definition)?;
        }
        for binding in model.resources_for(stage) {
            self.emit_resource(&mut w, &ctx, binding)?;
        }
        for function in model.functions_for(stage) {
            if !ctx.is_entry(function) {
                self.emit_function(&mut w, &ctx, function)?;
            }
        }
        self.emit_entry_wrapper(&mut w, &ctx, entry)?;

        Ok(w.finish())
    }
}

pub(crate) fn entry_function(model: &ShaderModel, stage: Stage) -> Result<&ShaderFunction> {
    model
        .entry_function(stage)
        .ok_or_else(|| ShaderGenError::EntryPointNotFound(format!("{stage} entry point")))
}

/// Whether a product has to go through a matrix multiply.
pub(crate) fn is_matrix_product(op: BinaryOp, lhs: &Operand, rhs: &Operand) -> bool {
    op == BinaryOp::Mul
        && (lhs.ty.is_matrix() || rhs.ty.is_matrix())
        && !matches!(lhs.ty, ShaderType::Scalar(_))
        && !matches!(rhs.ty, ShaderType::Scalar(_))
}
