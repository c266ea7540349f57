//! Lowering of front-end declarations into the closed IR.

use crate::error::{Result, ShaderGenError};
use crate::model::{Field, Parameter, ShaderFunction, StructDefinition};
use indexmap::IndexSet;
use shadergen_ir::ir::{
    AssignOp, BinaryOp, Expr, ExprKind, Intrinsic, Literal, Stmt, SwitchCase,
};
use shadergen_ir::source::{
    Callee, FunctionDecl, ResolvedProgram, ResourceDecl, SourceExpr, SourceExprKind, SourceStmt,
    StructDecl, TypeRef,
};
use shadergen_ir::{ParamDirection, ResourceKind, ResourceType, ScalarKind, ShaderType};

pub(crate) fn lower_type(program: &ResolvedProgram, symbol: &str, ty: &TypeRef) -> Result<ShaderType> {
    match ty {
        TypeRef::Void => Ok(ShaderType::Void),
        TypeRef::Scalar(kind) => Ok(ShaderType::Scalar(*kind)),
        TypeRef::Vector(kind, size) => {
            if !(2..=4).contains(size) {
                return Err(ShaderGenError::construct(
                    symbol,
                    format!("vectors must have 2 to 4 components, found {size}"),
                ));
            }
            Ok(ShaderType::Vector(*kind, *size))
        }
        TypeRef::Matrix { rows: 4, columns: 4 } => Ok(ShaderType::Matrix4x4),
        TypeRef::Matrix { rows, columns } => Err(ShaderGenError::construct(
            symbol,
            format!("only 4x4 matrices are supported, found {rows}x{columns}"),
        )),
        TypeRef::Named(name) => {
            if program.struct_decl(name).is_none() {
                return Err(ShaderGenError::construct(
                    symbol,
                    format!("unknown struct type {name}"),
                ));
            }
            Ok(ShaderType::Struct(name.clone()))
        }
        TypeRef::Array(element, len) => {
            let element = lower_type(program, symbol, element)?;
            if element.is_void() || matches!(element, ShaderType::Array(..)) {
                return Err(ShaderGenError::construct(
                    symbol,
                    format!("arrays of {element} are not supported"),
                ));
            }
            if *len == 0 {
                return Err(ShaderGenError::construct(symbol, "arrays must not be empty"));
            }
            Ok(ShaderType::Array(Box::new(element), *len))
        }
        TypeRef::Host(name) => Err(ShaderGenError::construct(
            symbol,
            format!("host type {name} has no shader equivalent"),
        )),
    }
}

/// A type usable as a field, local or parameter.
fn lower_value_type(program: &ResolvedProgram, symbol: &str, ty: &TypeRef) -> Result<ShaderType> {
    let lowered = lower_type(program, symbol, ty)?;
    if lowered.is_void() {
        return Err(ShaderGenError::construct(symbol, "values cannot have type void"));
    }
    Ok(lowered)
}

pub(crate) fn lower_struct(program: &ResolvedProgram, decl: &StructDecl) -> Result<StructDefinition> {
    let mut fields = Vec::with_capacity(decl.fields.len());
    for field in &decl.fields {
        if fields.iter().any(|f: &Field| f.name == field.name) {
            return Err(ShaderGenError::construct(
                &decl.name,
                format!("duplicate field {}", field.name),
            ));
        }
        let ty = lower_value_type(program, &decl.name, &field.ty)?;
        if ty.struct_name() == Some(decl.name.as_str()) {
            return Err(ShaderGenError::construct(&decl.name, "struct contains itself"));
        }
        fields.push(Field {
            name: field.name.clone(),
            ty,
            semantic: field.semantic,
        });
    }
    Ok(StructDefinition {
        name: decl.name.clone(),
        fields,
    })
}

pub(crate) fn lower_resource(program: &ResolvedProgram, decl: &ResourceDecl) -> Result<ResourceType> {
    let element = if decl.kind.is_buffer() {
        let element = decl.element.as_ref().ok_or_else(|| {
            ShaderGenError::construct(&decl.name, format!("{} requires an element type", decl.kind))
        })?;
        Some(Box::new(lower_value_type(program, &decl.name, element)?))
    } else {
        None
    };
    if decl.access == shadergen_ir::AccessMode::ReadWrite && decl.kind != ResourceKind::StructuredBuffer {
        return Err(ShaderGenError::construct(
            &decl.name,
            format!("{} cannot be read-write", decl.kind),
        ));
    }
    Ok(ResourceType {
        kind: decl.kind,
        element,
        access: decl.access,
    })
}

/// Lowers a function, returning it with the qualified names of its callees.
pub(crate) fn lower_function(
    program: &ResolvedProgram,
    decl: &FunctionDecl,
) -> Result<(ShaderFunction, IndexSet<String>)> {
    let symbol = decl.name.as_str();
    let mut params = Vec::with_capacity(decl.params.len());
    for param in &decl.params {
        let ty = lower_value_type(program, symbol, &param.ty)?;
        if matches!(ty, ShaderType::Array(..)) {
            return Err(ShaderGenError::construct(
                symbol,
                format!("parameter {} cannot be an array", param.name),
            ));
        }
        params.push(Parameter {
            name: param.name.clone(),
            ty,
            direction: param.direction,
            semantic: param.semantic,
        });
    }

    let return_type = lower_type(program, symbol, &decl.return_type)?;
    if matches!(return_type, ShaderType::Array(..)) {
        return Err(ShaderGenError::construct(symbol, "functions cannot return arrays"));
    }

    let mut lowerer = Lowerer {
        program,
        symbol,
        return_type: return_type.clone(),
        calls: IndexSet::new(),
    };
    let body = lowerer.block(&decl.body)?;

    let function = ShaderFunction {
        name: decl.short_name().to_string(),
        qualified_name: decl.name.clone(),
        stage: decl.metadata.stage,
        params,
        return_type,
        body,
        thread_group_size: decl.metadata.thread_group_size,
    };
    Ok((function, lowerer.calls))
}

struct Lowerer<'a> {
    program: &'a ResolvedProgram,
    symbol: &'a str,
    return_type: ShaderType,
    calls: IndexSet<String>,
}

impl<'a> Lowerer<'a> {
    fn error(&self, reason: impl Into<String>) -> ShaderGenError {
        ShaderGenError::construct(self.symbol, reason)
    }

    fn ty(&self, ty: &TypeRef) -> Result<ShaderType> {
        lower_type(self.program, self.symbol, ty)
    }

    fn expr_type(&self, expr: &SourceExpr) -> Result<ShaderType> {
        match &expr.ty {
            Some(ty) => self.ty(ty),
            None => Err(self.error("expression has no resolved type")),
        }
    }

    fn block(&mut self, body: &[SourceStmt]) -> Result<Vec<Stmt>> {
        body.iter().map(|stmt| self.stmt(stmt)).collect()
    }

    fn stmt(&mut self, stmt: &SourceStmt) -> Result<Stmt> {
        match stmt {
            SourceStmt::Declare { name, ty, init } => {
                let ty = lower_value_type(self.program, self.symbol, ty)?;
                let init = match init {
                    Some(init) => {
                        let init = self.expr(init)?;
                        self.expect_type(&init, &ty, "initializer")?;
                        Some(init)
                    }
                    None => None,
                };
                Ok(Stmt::Declare {
                    name: name.clone(),
                    ty,
                    init,
                })
            }
            SourceStmt::Assign { target, op, value } => self.assign(target, *op, value),
            SourceStmt::Expr(expr) => Ok(Stmt::Expr(self.expr(expr)?)),
            SourceStmt::If {
                condition,
                then,
                otherwise,
            } => Ok(Stmt::If {
                condition: self.condition(condition)?,
                then: self.block(then)?,
                otherwise: otherwise.as_deref().map(|o| self.block(o)).transpose()?,
            }),
            SourceStmt::For {
                init,
                condition,
                step,
                body,
            } => {
                let init = self.block(init)?;
                if init
                    .iter()
                    .any(|s| !matches!(s, Stmt::Declare { .. } | Stmt::Assign { .. } | Stmt::Expr(_)))
                {
                    return Err(self.error("for initializers must be declarations or expressions"));
                }
                let condition = condition.as_ref().map(|c| self.condition(c)).transpose()?;
                let step = self.block(step)?;
                if step
                    .iter()
                    .any(|s| !matches!(s, Stmt::Assign { .. } | Stmt::Expr(_)))
                {
                    return Err(self.error("for increments must be expressions"));
                }
                Ok(Stmt::For {
                    init,
                    condition,
                    step,
                    body: self.block(body)?,
                })
            }
            SourceStmt::While { condition, body } => Ok(Stmt::While {
                condition: self.condition(condition)?,
                body: self.block(body)?,
            }),
            SourceStmt::DoWhile { body, condition } => Ok(Stmt::DoWhile {
                body: self.block(body)?,
                condition: self.condition(condition)?,
            }),
            SourceStmt::Switch {
                selector,
                cases,
                default,
            } => {
                let selector = self.expr(selector)?;
                if !matches!(selector.ty, ShaderType::Scalar(ScalarKind::Int | ScalarKind::UInt)) {
                    return Err(self.error(format!(
                        "switch selector must be an integer scalar, found {}",
                        selector.ty
                    )));
                }
                let mut lowered = Vec::with_capacity(cases.len());
                for case in cases {
                    let mut labels = Vec::with_capacity(case.labels.len());
                    for label in &case.labels {
                        match self.expr(label)?.kind {
                            ExprKind::Literal(literal @ (Literal::Int(_) | Literal::UInt(_))) => {
                                labels.push(literal)
                            }
                            _ => return Err(self.error("switch labels must be integer constants")),
                        }
                    }
                    lowered.push(SwitchCase {
                        labels,
                        body: self.block(&case.body)?,
                    });
                }
                Ok(Stmt::Switch {
                    selector,
                    cases: lowered,
                    default: default.as_deref().map(|d| self.block(d)).transpose()?,
                })
            }
            SourceStmt::Return(value) => {
                let value = value.as_ref().map(|v| self.expr(v)).transpose()?;
                match &value {
                    None if !self.return_type.is_void() => {
                        Err(self.error(format!("missing return value of type {}", self.return_type)))
                    }
                    Some(value) => {
                        let expected = self.return_type.clone();
                        self.expect_type(value, &expected, "return value")?;
                        Ok(Stmt::Return(Some(value.clone())))
                    }
                    None => Ok(Stmt::Return(None)),
                }
            }
            SourceStmt::Break => Ok(Stmt::Break),
            SourceStmt::Continue => Ok(Stmt::Continue),
            SourceStmt::Block(body) => Ok(Stmt::Block(self.block(body)?)),
            SourceStmt::Host(what) => Err(self.error(format!("{what} is not supported in shader code"))),
        }
    }

    fn assign(&mut self, target: &SourceExpr, op: AssignOp, value: &SourceExpr) -> Result<Stmt> {
        let target = self.expr(target)?;
        self.check_writable(&target)?;
        let value = self.expr(value)?;

        if op == AssignOp::Rem && !(target.ty.is_integer() && value.ty.is_integer()) {
            return Err(self.error(format!(
                "`%=` requires integer operands, found {} and {}",
                target.ty, value.ty
            )));
        }
        if op == AssignOp::Mul && (target.ty.is_matrix() || value.ty.is_matrix()) {
            let product = Expr::new(
                ExprKind::Binary {
                    op: BinaryOp::Mul,
                    lhs: Box::new(target.clone()),
                    rhs: Box::new(value),
                },
                target.ty.clone(),
            );
            return Ok(Stmt::Assign {
                target,
                op: AssignOp::Assign,
                value: product,
            });
        }
        if op == AssignOp::Assign {
            self.expect_type(&value, &target.ty, "assigned value")?;
        }
        Ok(Stmt::Assign { target, op, value })
    }

    fn condition(&mut self, condition: &SourceExpr) -> Result<Expr> {
        let condition = self.expr(condition)?;
        if condition.ty != ShaderType::BOOL {
            return Err(self.error(format!("conditions must be bool, found {}", condition.ty)));
        }
        Ok(condition)
    }

    fn expect_type(&self, expr: &Expr, expected: &ShaderType, what: &str) -> Result<()> {
        if &expr.ty != expected {
            return Err(self.error(format!("{what} has type {}, expected {expected}", expr.ty)));
        }
        Ok(())
    }

    fn check_writable(&self, target: &Expr) -> Result<()> {
        match &target.kind {
            ExprKind::Local(_) => Ok(()),
            ExprKind::Field { base, .. } => self.check_writable(base),
            ExprKind::Swizzle { base, components } => {
                let mut seen = [false; 4];
                for c in components {
                    let c = usize::from(*c);
                    if seen[c] {
                        return Err(self.error("swizzles with repeated components cannot be assigned"));
                    }
                    seen[c] = true;
                }
                self.check_writable(base)
            }
            ExprKind::Index { base, .. } => match &base.ty {
                ShaderType::Resource(resource) if resource.is_writable() => Ok(()),
                ShaderType::Resource(_) => Err(self.error(format!(
                    "{} is read-only",
                    resource_name(base).unwrap_or("resource")
                ))),
                _ => self.check_writable(base),
            },
            ExprKind::Resource(name) => Err(self.error(format!("{name} is read-only"))),
            _ => Err(self.error("expression is not assignable")),
        }
    }

    /// Lowers an expression in value position, where resources must not appear.
    fn expr(&mut self, expr: &SourceExpr) -> Result<Expr> {
        let lowered = self.operand(expr)?;
        if let ShaderType::Resource(resource) = &lowered.ty {
            return Err(self.error(format!(
                "{} {} can only be {}",
                resource.kind,
                resource_name(&lowered).unwrap_or("resource"),
                if resource.kind == ResourceKind::StructuredBuffer {
                    "indexed"
                } else {
                    "passed to texture intrinsics"
                }
            )));
        }
        Ok(lowered)
    }

    /// Lowers an expression that may evaluate to a resource.
    fn operand(&mut self, expr: &SourceExpr) -> Result<Expr> {
        match &expr.kind {
            SourceExprKind::Literal(literal) => self.literal(*literal),
            SourceExprKind::Local(name) => Ok(Expr::new(ExprKind::Local(name.clone()), self.expr_type(expr)?)),
            SourceExprKind::Resource(name) => {
                let decl = self
                    .program
                    .resource(name)
                    .ok_or_else(|| self.error(format!("unknown resource {name}")))?;
                let resource = lower_resource(self.program, decl)?;
                let ty = match (resource.kind, resource.element()) {
                    (ResourceKind::UniformBuffer, Some(element)) => element.clone(),
                    _ => ShaderType::Resource(resource),
                };
                Ok(Expr::new(ExprKind::Resource(name.clone()), ty))
            }
            SourceExprKind::Member { base, member } => self.member(base, member),
            SourceExprKind::Index { base, index } => {
                let base = self.operand(base)?;
                let index = self.expr(index)?;
                if !matches!(index.ty, ShaderType::Scalar(ScalarKind::Int | ScalarKind::UInt)) {
                    return Err(self.error(format!("indices must be integer scalars, found {}", index.ty)));
                }
                let ty = match &base.ty {
                    ShaderType::Array(element, _) => element.as_ref().clone(),
                    ShaderType::Vector(kind, _) => ShaderType::Scalar(*kind),
                    ShaderType::Matrix4x4 => ShaderType::float4(),
                    ShaderType::Resource(resource) if resource.kind == ResourceKind::StructuredBuffer => {
                        resource
                            .element()
                            .cloned()
                            .ok_or_else(|| self.error("structured buffer has no element type"))?
                    }
                    other => return Err(self.error(format!("values of type {other} cannot be indexed"))),
                };
                Ok(Expr::new(
                    ExprKind::Index {
                        base: Box::new(base),
                        index: Box::new(index),
                    },
                    ty,
                ))
            }
            SourceExprKind::Unary { op, operand } => {
                let operand = self.expr(operand)?;
                if op.is_mutating() {
                    self.check_writable(&operand)?;
                }
                let ty = self.expr_type(expr)?;
                Ok(Expr::new(
                    ExprKind::Unary {
                        op: *op,
                        operand: Box::new(operand),
                    },
                    ty,
                ))
            }
            SourceExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.expr(lhs)?;
                let rhs = self.expr(rhs)?;
                if *op == BinaryOp::Rem && !(lhs.ty.is_integer() && rhs.ty.is_integer()) {
                    return Err(self.error(format!(
                        "`%` requires integer operands, found {} and {}",
                        lhs.ty, rhs.ty
                    )));
                }
                let ty = self.expr_type(expr)?;
                Ok(Expr::new(
                    ExprKind::Binary {
                        op: *op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    },
                    ty,
                ))
            }
            SourceExprKind::Conditional {
                condition,
                then,
                otherwise,
            } => {
                let condition = self.condition(condition)?;
                let then = self.expr(then)?;
                let otherwise = self.expr(otherwise)?;
                let ty = self.expr_type(expr)?;
                Ok(Expr::new(
                    ExprKind::Conditional {
                        condition: Box::new(condition),
                        then: Box::new(then),
                        otherwise: Box::new(otherwise),
                    },
                    ty,
                ))
            }
            SourceExprKind::Call {
                callee: Callee::Function(name),
                args,
            } => self.call(expr, name, args),
            SourceExprKind::Call {
                callee: Callee::Intrinsic(name),
                args,
            } => self.intrinsic(expr, name, args),
            SourceExprKind::Construct(args) => {
                let ty = self.expr_type(expr)?;
                let args = args.iter().map(|a| self.expr(a)).collect::<Result<Vec<_>>>()?;
                self.check_construct(&ty, &args)?;
                Ok(Expr::new(ExprKind::Construct(args), ty))
            }
            SourceExprKind::Cast(operand) => {
                let ty = self.expr_type(expr)?;
                let operand = self.expr(operand)?;
                let compatible = match (&ty, &operand.ty) {
                    (ShaderType::Scalar(_), ShaderType::Scalar(_)) => true,
                    (ShaderType::Vector(_, a), ShaderType::Vector(_, b)) => a == b,
                    _ => false,
                };
                if !compatible {
                    return Err(self.error(format!("cannot convert {} to {ty}", operand.ty)));
                }
                Ok(Expr::new(ExprKind::Cast(Box::new(operand)), ty))
            }
            SourceExprKind::EnumValue { value, .. } => {
                Ok(Expr::new(ExprKind::Literal(Literal::Int(*value)), ShaderType::INT))
            }
            SourceExprKind::Host(what) => Err(self.error(format!("{what} is not supported in shader code"))),
        }
    }

    fn literal(&self, literal: Literal) -> Result<Expr> {
        let ty = match literal {
            Literal::Bool(_) => ShaderType::BOOL,
            Literal::Int(_) => ShaderType::INT,
            Literal::UInt(_) => ShaderType::UINT,
            Literal::Float(value) => {
                if !value.is_finite() {
                    return Err(self.error(format!("float literal {value} is not finite")));
                }
                ShaderType::FLOAT
            }
        };
        Ok(Expr::new(ExprKind::Literal(literal), ty))
    }

    fn member(&mut self, base: &SourceExpr, member: &str) -> Result<Expr> {
        let base = self.expr(base)?;
        match &base.ty {
            ShaderType::Struct(name) => {
                let decl = self
                    .program
                    .struct_decl(name)
                    .ok_or_else(|| self.error(format!("unknown struct type {name}")))?;
                let field = decl
                    .fields
                    .iter()
                    .find(|f| f.name == member)
                    .ok_or_else(|| self.error(format!("{name} has no field {member}")))?;
                let ty = lower_value_type(self.program, self.symbol, &field.ty)?;
                Ok(Expr::new(
                    ExprKind::Field {
                        base: Box::new(base),
                        field: member.to_string(),
                    },
                    ty,
                ))
            }
            ShaderType::Vector(kind, size) => {
                let kind = *kind;
                let components = parse_swizzle(member, *size)
                    .ok_or_else(|| self.error(format!("invalid swizzle .{member} on {}", base.ty)))?;
                let ty = match components.len() {
                    1 => ShaderType::Scalar(kind),
                    n => ShaderType::Vector(kind, n as u8),
                };
                Ok(Expr::new(
                    ExprKind::Swizzle {
                        base: Box::new(base),
                        components,
                    },
                    ty,
                ))
            }
            ShaderType::Matrix4x4 => {
                let (row, column) = parse_matrix_member(member)
                    .ok_or_else(|| self.error(format!("invalid matrix member {member}")))?;
                let int = |v: u8| Expr::new(ExprKind::Literal(Literal::Int(i32::from(v))), ShaderType::INT);
                let row = Expr::new(
                    ExprKind::Index {
                        base: Box::new(base),
                        index: Box::new(int(row)),
                    },
                    ShaderType::float4(),
                );
                Ok(Expr::new(
                    ExprKind::Index {
                        base: Box::new(row),
                        index: Box::new(int(column)),
                    },
                    ShaderType::FLOAT,
                ))
            }
            other => Err(self.error(format!("values of type {other} have no member {member}"))),
        }
    }

    fn call(&mut self, expr: &SourceExpr, name: &str, args: &[SourceExpr]) -> Result<Expr> {
        let callee = self
            .program
            .function(name)
            .ok_or_else(|| self.error(format!("unknown function {name}")))?;
        if callee.params.len() != args.len() {
            return Err(self.error(format!(
                "{name} takes {} arguments, {} given",
                callee.params.len(),
                args.len()
            )));
        }
        let mut lowered = Vec::with_capacity(args.len());
        for (index, (param, arg)) in callee.params.iter().zip(args).enumerate() {
            let arg = match self.operand(arg) {
                Ok(arg) if matches!(arg.ty, ShaderType::Resource(_)) => {
                    return Err(self.error(format!("resources cannot be passed to {name}")))
                }
                other => other?,
            };
            let expected = self.ty(&param.ty)?;
            if arg.ty != expected {
                return Err(self.error(format!(
                    "argument {} ({}) of {name} has type {}, expected {expected}",
                    index + 1,
                    param.name,
                    arg.ty
                )));
            }
            if param.direction != ParamDirection::In {
                self.check_writable(&arg)?;
            }
            lowered.push(arg);
        }
        self.calls.insert(name.to_string());
        Ok(Expr::new(
            ExprKind::Call {
                function: name.to_string(),
                args: lowered,
            },
            self.expr_type(expr)?,
        ))
    }

    fn intrinsic(&mut self, expr: &SourceExpr, name: &str, args: &[SourceExpr]) -> Result<Expr> {
        let intrinsic: Intrinsic = name.parse().map_err(|_| ShaderGenError::UnsupportedIntrinsic {
            backend: None,
            name: name.to_string(),
            function: self.symbol.to_string(),
        })?;
        if args.len() != intrinsic.arity() {
            return Err(self.error(format!(
                "{intrinsic} takes {} arguments, {} given",
                intrinsic.arity(),
                args.len()
            )));
        }
        let args = args.iter().map(|a| self.operand(a)).collect::<Result<Vec<_>>>()?;
        self.check_intrinsic_args(intrinsic, &args)?;
        let ty = if intrinsic == Intrinsic::Barrier {
            ShaderType::Void
        } else {
            self.expr_type(expr)?
        };
        Ok(Expr::new(ExprKind::Intrinsic { intrinsic, args }, ty))
    }

    fn check_intrinsic_args(&self, intrinsic: Intrinsic, args: &[Expr]) -> Result<()> {
        let kind_of = |e: &Expr| e.ty.resource().map(|r| r.kind);
        match intrinsic {
            Intrinsic::Sample | Intrinsic::SampleLevel => {
                let texture = kind_of(&args[0]);
                let coordinates = match texture {
                    Some(ResourceKind::Texture2D | ResourceKind::DepthTexture2D) => 2,
                    Some(ResourceKind::Texture2DArray | ResourceKind::TextureCube) => 3,
                    _ => return Err(self.error(format!("{intrinsic} requires a sampleable texture"))),
                };
                if kind_of(&args[1]) != Some(ResourceKind::Sampler) {
                    return Err(self.error(format!("{intrinsic} requires a sampler")));
                }
                if args[2].ty != ShaderType::Vector(ScalarKind::Float, coordinates) {
                    return Err(self.error(format!(
                        "{intrinsic} coordinates must be float{coordinates}, found {}",
                        args[2].ty
                    )));
                }
                if intrinsic == Intrinsic::SampleLevel && args[3].ty != ShaderType::FLOAT {
                    return Err(self.error("SampleLevel level of detail must be float"));
                }
                Ok(())
            }
            Intrinsic::Load => {
                if kind_of(&args[0]) != Some(ResourceKind::Texture2DMS) {
                    return Err(self.error("Load requires a multisample texture"));
                }
                if !matches!(args[1].ty, ShaderType::Vector(ScalarKind::Int | ScalarKind::UInt, 2)) {
                    return Err(self.error(format!("Load coordinates must be integer pairs, found {}", args[1].ty)));
                }
                if !matches!(args[2].ty, ShaderType::Scalar(ScalarKind::Int | ScalarKind::UInt)) {
                    return Err(self.error("Load sample index must be an integer"));
                }
                Ok(())
            }
            _ => match args.iter().find(|a| a.ty.resource().is_some()) {
                Some(arg) => Err(self.error(format!(
                    "{intrinsic} cannot take {} as an argument",
                    resource_name(arg).unwrap_or("a resource")
                ))),
                None => Ok(()),
            },
        }
    }

    fn check_construct(&self, ty: &ShaderType, args: &[Expr]) -> Result<()> {
        let components = |e: &Expr| match &e.ty {
            ShaderType::Scalar(_) => Some(1u32),
            ShaderType::Vector(_, n) => Some(u32::from(*n)),
            _ => None,
        };
        let expected = match ty {
            ShaderType::Vector(_, n) => u32::from(*n),
            ShaderType::Matrix4x4 => 16,
            other => return Err(self.error(format!("values of type {other} cannot be constructed"))),
        };
        let mut total = 0;
        for arg in args {
            total += components(arg)
                .ok_or_else(|| self.error(format!("{} cannot be a component of {ty}", arg.ty)))?;
        }
        let splat = args.len() == 1 && total == 1 && !ty.is_matrix();
        if total != expected && !splat {
            return Err(self.error(format!("{ty} needs {expected} components, {total} given")));
        }
        Ok(())
    }
}

fn resource_name(expr: &Expr) -> Option<&str> {
    match &expr.kind {
        ExprKind::Resource(name) => Some(name),
        _ => None,
    }
}

/// `xyzw` or `rgba` in any case, one set per swizzle.
fn parse_swizzle(member: &str, size: u8) -> Option<Vec<u8>> {
    const SETS: [&str; 2] = ["xyzw", "rgba"];
    let lower = member.to_ascii_lowercase();
    if lower.is_empty() || lower.len() > 4 {
        return None;
    }
    SETS.iter().find_map(|set| {
        lower
            .chars()
            .map(|c| set.find(c).map(|i| i as u8).filter(|i| *i < size))
            .collect::<Option<Vec<u8>>>()
    })
}

/// `M11`..`M44` to zero-based `(row, column)`.
fn parse_matrix_member(member: &str) -> Option<(u8, u8)> {
    let bytes = member.as_bytes();
    if bytes.len() != 3 || bytes[0] != b'M' {
        return None;
    }
    let digit = |b: u8| match b {
        b'1'..=b'4' => Some(b - b'1'),
        _ => None,
    };
    Some((digit(bytes[1])?, digit(bytes[2])?))
}
