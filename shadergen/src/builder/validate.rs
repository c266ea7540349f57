//! Stage signature rules for entry points.

use crate::error::{Result, ShaderGenError};
use crate::logger::Logger;
use crate::model::{ShaderFunction, StructDefinition};
use shadergen_ir::ir::{ExprKind, Intrinsic};
use shadergen_ir::visit::for_each_expr;
use shadergen_ir::{ParamDirection, ScalarKind, Semantic, ShaderType, Stage};
use std::collections::{HashMap, HashSet};

const MAX_THREAD_GROUP_INVOCATIONS: u64 = 1024;

struct Validator<'a> {
    function: &'a ShaderFunction,
    stage: Stage,
    structs: &'a HashMap<String, StructDefinition>,
}

impl<'a> Validator<'a> {
    fn error(&self, reason: impl Into<String>) -> ShaderGenError {
        ShaderGenError::signature(&self.function.qualified_name, self.stage, reason)
    }

    fn interface_struct(&self, name: &str) -> Result<&'a StructDefinition> {
        let definition = self
            .structs
            .get(name)
            .ok_or_else(|| self.error(format!("unknown struct {name}")))?;
        for field in &definition.fields {
            if !field.ty.is_interface_type() || field.ty.scalar_kind() == Some(ScalarKind::Bool) {
                return Err(self.error(format!(
                    "field {}.{} has type {}, stage interface fields must be numeric scalars or vectors",
                    name, field.name, field.ty
                )));
            }
            if let Some(semantic) = field.semantic.filter(Semantic::is_builtin) {
                return Err(self.error(format!(
                    "field {}.{} uses {semantic}, which is only valid on entry parameters",
                    name, field.name
                )));
            }
        }
        Ok(definition)
    }

    /// Checks parameters and returns the input struct, if any.
    fn params(&self) -> Result<Option<&'a str>> {
        let mut input = None;
        for param in &self.function.params {
            if param.direction != ParamDirection::In {
                return Err(self.error(format!("parameter {} must be an input", param.name)));
            }
            match param.semantic.filter(Semantic::is_builtin) {
                Some(semantic) => {
                    if semantic.builtin_stage() != Some(self.stage) {
                        return Err(self.error(format!(
                            "{semantic} is not available to {} entries",
                            self.stage
                        )));
                    }
                    let expected = match self.stage {
                        Stage::Compute => ShaderType::Vector(ScalarKind::UInt, 3),
                        _ => ShaderType::UINT,
                    };
                    if param.ty != expected {
                        return Err(self.error(format!(
                            "{semantic} parameter {} must be {expected}, found {}",
                            param.name, param.ty
                        )));
                    }
                }
                None => match param.ty.struct_name() {
                    Some(name) if self.stage != Stage::Compute => {
                        if input.is_some() {
                            return Err(self.error("at most one input struct is allowed"));
                        }
                        self.interface_struct(name)?;
                        input = Some(name);
                    }
                    _ => {
                        return Err(self.error(format!(
                            "parameter {} must be {}",
                            param.name,
                            match self.stage {
                                Stage::Vertex => "the input struct or a vertex builtin",
                                Stage::Fragment => "the input struct",
                                Stage::Compute => "a compute builtin",
                            }
                        )))
                    }
                },
            }
        }
        Ok(input)
    }

    fn vertex(&self) -> Result<()> {
        self.params()?;
        match &self.function.return_type {
            ty if *ty == ShaderType::float4() => Ok(()),
            ShaderType::Struct(name) => {
                let output = self.interface_struct(name)?;
                let positions: Vec<_> = output
                    .fields
                    .iter()
                    .filter(|f| f.semantic == Some(Semantic::SystemPosition))
                    .collect();
                match positions.as_slice() {
                    [position] if position.ty == ShaderType::float4() => {}
                    [position] => {
                        return Err(self.error(format!(
                            "system position {}.{} is {}, only float4 positions are supported; \
                             widen it with float4(position, 1.0)",
                            name, position.name, position.ty
                        )))
                    }
                    [] => return Err(self.error(format!("{name} has no system position field"))),
                    _ => return Err(self.error(format!("{name} has more than one system position field"))),
                }
                if let Some(field) = output
                    .fields
                    .iter()
                    .find(|f| matches!(f.semantic, Some(Semantic::ColorTarget(_))))
                {
                    return Err(self.error(format!(
                        "vertex outputs cannot carry color targets, found {}.{}",
                        name, field.name
                    )));
                }
                Ok(())
            }
            other => Err(self.error(format!(
                "vertex entries must return float4 or an output struct, found {other}"
            ))),
        }
    }

    fn fragment(&self) -> Result<()> {
        self.params()?;
        match &self.function.return_type {
            ShaderType::Void => Ok(()),
            ty if *ty == ShaderType::float4() => Ok(()),
            ShaderType::Struct(name) => {
                let output = self.interface_struct(name)?;
                let mut targets = HashSet::new();
                for field in &output.fields {
                    match field.semantic {
                        Some(Semantic::ColorTarget(n)) => {
                            if !targets.insert(n) {
                                return Err(self.error(format!(
                                    "{name} writes color target {n} more than once"
                                )));
                            }
                        }
                        _ => {
                            return Err(self.error(format!(
                                "field {}.{} must carry a color target",
                                name, field.name
                            )))
                        }
                    }
                }
                if targets.is_empty() {
                    return Err(self.error(format!("{name} has no color targets")));
                }
                Ok(())
            }
            other => Err(self.error(format!(
                "fragment entries must return void, float4 or an output struct, found {other}"
            ))),
        }
    }

    fn compute(&self, logger: &mut Logger) -> Result<()> {
        if !self.function.return_type.is_void() {
            return Err(self.error("compute entries must return void"));
        }
        self.params()?;
        let size = self
            .function
            .thread_group_size
            .ok_or_else(|| self.error("compute entries require a thread group size"))?;
        if size.iter().any(|d| *d == 0) {
            return Err(self.error(format!(
                "thread group size ({}, {}, {}) has an empty dimension",
                size[0], size[1], size[2]
            )));
        }
        let invocations: u64 = size.iter().map(|d| u64::from(*d)).product();
        if invocations > MAX_THREAD_GROUP_INVOCATIONS {
            logger.warn(format!(
                "{}: thread group size ({}, {}, {}) has {} invocations, more than most devices allow ({})",
                self.function.qualified_name,
                size[0],
                size[1],
                size[2],
                invocations,
                MAX_THREAD_GROUP_INVOCATIONS
            ));
        }
        Ok(())
    }
}

/// Checks an entry point against the rules of its stage.
pub(crate) fn validate_entry(
    function: &ShaderFunction,
    stage: Stage,
    structs: &HashMap<String, StructDefinition>,
    logger: &mut Logger,
) -> Result<()> {
    let validator = Validator {
        function,
        stage,
        structs,
    };
    match stage {
        Stage::Vertex => validator.vertex(),
        Stage::Fragment => validator.fragment(),
        Stage::Compute => validator.compute(logger),
    }
}

/// Builtin semantics only mean something on entry parameters.
pub(crate) fn validate_helper(function: &ShaderFunction) -> Result<()> {
    match function
        .params
        .iter()
        .find(|p| p.semantic.map_or(false, |s| s.is_builtin()))
    {
        Some(param) => Err(ShaderGenError::construct(
            &function.qualified_name,
            format!(
                "parameter {} cannot use a builtin semantic outside an entry point",
                param.name
            ),
        )),
        None => Ok(()),
    }
}

/// A vertex input struct is fed from vertex buffers and cannot double as a stage output.
pub(crate) fn validate_vertex_input(
    vertex: &ShaderFunction,
    fragment: Option<&ShaderFunction>,
) -> Result<()> {
    let Some(input) = vertex.input_param().and_then(|p| p.ty.struct_name()) else {
        return Ok(());
    };
    let outputs = std::iter::once(&vertex.return_type).chain(fragment.map(|f| &f.return_type));
    for output in outputs {
        if output.struct_name() == Some(input) {
            return Err(ShaderGenError::signature(
                &vertex.qualified_name,
                Stage::Vertex,
                format!("{input} is used both as vertex input and as a stage output"),
            ));
        }
    }
    Ok(())
}

fn interface_struct<'s>(
    ty: &ShaderType,
    structs: &'s HashMap<String, StructDefinition>,
) -> Option<&'s StructDefinition> {
    ty.struct_name().and_then(|name| structs.get(name))
}

/// Fragment inputs must be a leading run of the vertex outputs.
///
/// Every target links varyings positionally, so each fragment input field must
/// sit at the same position as a vertex output with the same semantic and type.
/// Fields without a semantic count as texture coordinates.
pub(crate) fn validate_varyings(
    vertex: &ShaderFunction,
    fragment: &ShaderFunction,
    structs: &HashMap<String, StructDefinition>,
) -> Result<()> {
    let Some(input) = fragment.input_param().and_then(|p| interface_struct(&p.ty, structs)) else {
        return Ok(());
    };
    let output = interface_struct(&vertex.return_type, structs);
    let outputs: Vec<_> = output
        .map(|output| output.varyings().map(|(_, field)| field).collect())
        .unwrap_or_default();
    let slot = |semantic: Option<Semantic>| semantic.unwrap_or(Semantic::TextureCoordinate);

    for (location, field) in input.varyings() {
        let written = outputs.get(location);
        if written.map_or(false, |w| w.ty == field.ty && slot(w.semantic) == slot(field.semantic)) {
            continue;
        }
        let found = match (output, written) {
            (Some(output), Some(w)) => format!("{}.{} ({} {})", output.name, w.name, slot(w.semantic), w.ty),
            _ => "nothing".to_string(),
        };
        return Err(ShaderGenError::signature(
            &fragment.qualified_name,
            Stage::Fragment,
            format!(
                "input {}.{} ({} {}) is varying {location}, but the vertex stage writes {found} there",
                input.name,
                field.name,
                slot(field.semantic),
                field.ty
            ),
        ));
    }
    Ok(())
}

/// Derivatives need fragment quads and barriers need thread groups.
pub(crate) fn validate_stage_intrinsics(function: &ShaderFunction, stage: Stage) -> Result<()> {
    let mut misplaced = None;
    for_each_expr(&function.body, &mut |expr| {
        if let ExprKind::Intrinsic { intrinsic, .. } = &expr.kind {
            let allowed = if intrinsic.is_derivative() {
                stage == Stage::Fragment
            } else if *intrinsic == Intrinsic::Barrier {
                stage == Stage::Compute
            } else {
                true
            };
            if !allowed && misplaced.is_none() {
                misplaced = Some(*intrinsic);
            }
        }
    });
    match misplaced {
        Some(intrinsic) => Err(ShaderGenError::construct(
            &function.qualified_name,
            format!("{intrinsic} is not available in {stage} stages"),
        )),
        None => Ok(()),
    }
}
