//! Emission helpers shared by every backend.

use crate::backend::LanguageBackend;
use crate::error::{Result, ShaderGenError};
use crate::model::{ShaderFunction, ShaderModel};
use shadergen_ir::ir::{swizzle_text, Expr, ExprKind, Intrinsic, Literal, Stmt};
use shadergen_ir::{ShaderType, Stage};

const INDENT: &str = "    ";

/// Indentation-aware line writer.
#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    indent: usize,
}

impl CodeWriter {
    pub fn new() -> CodeWriter {
        CodeWriter::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.indent {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        self.out.push('\n');
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Writes `{` and indents.
    pub fn open(&mut self) {
        self.line("{");
        self.indent();
    }

    /// Dedents and writes `}`.
    pub fn close(&mut self) {
        self.close_with("");
    }

    pub fn close_with(&mut self, suffix: &str) {
        self.dedent();
        self.line(format!("}}{suffix}"));
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// What is being emitted: the model, the stage, and the function whose body
/// is being written, if any.
#[derive(Debug, Copy, Clone)]
pub struct EmitContext<'a> {
    pub model: &'a ShaderModel,
    pub stage: Stage,
    pub function: Option<&'a ShaderFunction>,
}

impl<'a> EmitContext<'a> {
    pub fn new(model: &'a ShaderModel, stage: Stage) -> EmitContext<'a> {
        EmitContext {
            model,
            stage,
            function: None,
        }
    }

    pub fn with_function(self, function: &'a ShaderFunction) -> EmitContext<'a> {
        EmitContext {
            function: Some(function),
            ..self
        }
    }

    /// The name errors are reported against.
    pub fn symbol(&self) -> &'a str {
        match self.function {
            Some(function) => &function.qualified_name,
            None => self.model.entry_points.get(self.stage).unwrap_or_default(),
        }
    }

    pub fn entry(&self) -> Option<&'a ShaderFunction> {
        self.model.entry_function(self.stage)
    }

    pub fn is_entry(&self, function: &ShaderFunction) -> bool {
        self.model.entry_points.get(self.stage) == Some(function.qualified_name.as_str())
    }
}

/// An already emitted argument or operand, with its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    pub text: String,
    pub ty: ShaderType,
}

/// Replaces namespace separators so a qualified name is a valid identifier.
pub fn mangle(qualified_name: &str) -> String {
    qualified_name.replace('.', "_")
}

/// Shortest text that reads back as the same `f32`, always with a decimal
/// point or an exponent.
pub fn float_text(value: f32) -> String {
    let text = format!("{value:?}");
    if text.contains(['.', 'e', 'E']) {
        text
    } else {
        format!("{text}.0")
    }
}

/// Wraps `text` in parentheses unless it already is wrapped as a whole.
pub fn parenthesized(text: &str) -> String {
    let bytes = text.as_bytes();
    if bytes.first() == Some(&b'(') && bytes.last() == Some(&b')') {
        let mut depth = 0usize;
        let mut closes_early = false;
        for (i, b) in bytes.iter().enumerate() {
            match b {
                b'(' => depth += 1,
                b')' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 && i + 1 != bytes.len() {
                        closes_early = true;
                        break;
                    }
                }
                _ => {}
            }
        }
        if !closes_early {
            return text.to_string();
        }
    }
    format!("({text})")
}

pub fn call(name: &str, args: &[Operand]) -> String {
    let args: Vec<&str> = args.iter().map(|a| a.text.as_str()).collect();
    format!("{name}({})", args.join(", "))
}

/// Builtins spelled the same way in HLSL, GLSL and Metal.
pub fn common_intrinsic_name(intrinsic: Intrinsic) -> Option<&'static str> {
    Some(match intrinsic {
        Intrinsic::Abs => "abs",
        Intrinsic::Acos => "acos",
        Intrinsic::Asin => "asin",
        Intrinsic::Atan => "atan",
        Intrinsic::Ceiling => "ceil",
        Intrinsic::Clamp => "clamp",
        Intrinsic::Cos => "cos",
        Intrinsic::Cosh => "cosh",
        Intrinsic::Exp => "exp",
        Intrinsic::Exp2 => "exp2",
        Intrinsic::Floor => "floor",
        Intrinsic::Log => "log",
        Intrinsic::Log2 => "log2",
        Intrinsic::Max => "max",
        Intrinsic::Min => "min",
        Intrinsic::Pow => "pow",
        Intrinsic::Round => "round",
        Intrinsic::Sign => "sign",
        Intrinsic::Sin => "sin",
        Intrinsic::Sinh => "sinh",
        Intrinsic::SmoothStep => "smoothstep",
        Intrinsic::Sqrt => "sqrt",
        Intrinsic::Step => "step",
        Intrinsic::Tan => "tan",
        Intrinsic::Tanh => "tanh",
        Intrinsic::Truncate => "trunc",
        Intrinsic::Dot => "dot",
        Intrinsic::Cross => "cross",
        Intrinsic::Distance => "distance",
        Intrinsic::Length => "length",
        Intrinsic::Normalize => "normalize",
        Intrinsic::Reflect => "reflect",
        Intrinsic::Transpose => "transpose",
        Intrinsic::Fwidth => "fwidth",
        _ => return None,
    })
}

pub fn unsupported_intrinsic<B: LanguageBackend + ?Sized>(
    backend: &B,
    ctx: &EmitContext,
    intrinsic: Intrinsic,
) -> ShaderGenError {
    ShaderGenError::UnsupportedIntrinsic {
        backend: Some(backend.kind()),
        name: intrinsic.name().to_string(),
        function: ctx.symbol().to_string(),
    }
}

/// Writes IR statements and expressions through a backend's hooks.
///
/// Every unary, binary and conditional expression is parenthesized, so the
/// evaluation order never depends on the target's precedence rules.
pub struct BodyWriter<'a, B: LanguageBackend + ?Sized> {
    backend: &'a B,
    ctx: EmitContext<'a>,
}

impl<'a, B: LanguageBackend + ?Sized> BodyWriter<'a, B> {
    pub fn new(backend: &'a B, ctx: EmitContext<'a>) -> BodyWriter<'a, B> {
        BodyWriter { backend, ctx }
    }

    pub fn expr(&self, expr: &Expr) -> Result<String> {
        let backend = self.backend;
        Ok(match &expr.kind {
            ExprKind::Literal(literal) => self.literal(literal),
            ExprKind::Local(name) => backend.identifier(name),
            ExprKind::Resource(name) => {
                let binding = self.ctx.model.get_resource(name).ok_or_else(|| {
                    ShaderGenError::construct(self.ctx.symbol(), format!("unknown resource {name}"))
                })?;
                backend.resource_reference(&self.ctx, binding)
            }
            ExprKind::Field { base, field } => {
                format!("{}.{}", self.expr(base)?, backend.identifier(field))
            }
            ExprKind::Swizzle { base, components } => {
                format!("{}.{}", self.expr(base)?, swizzle_text(components))
            }
            ExprKind::Index { base, index } => {
                format!("{}[{}]", self.expr(base)?, self.expr(index)?)
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.expr(operand)?;
                if op.is_postfix() {
                    format!("({operand}{})", op.symbol())
                } else {
                    format!("({}{operand})", op.symbol())
                }
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.operand(lhs)?;
                let rhs = self.operand(rhs)?;
                backend.binary(*op, &lhs, &rhs)
            }
            ExprKind::Conditional {
                condition,
                then,
                otherwise,
            } => format!(
                "({} ? {} : {})",
                self.expr(condition)?,
                self.expr(then)?,
                self.expr(otherwise)?
            ),
            ExprKind::Call { function, args } => {
                let callee = self.ctx.model.get_function(function).ok_or_else(|| {
                    ShaderGenError::construct(self.ctx.symbol(), format!("unknown function {function}"))
                })?;
                let args = self.operands(args)?;
                call(&backend.function_name(&self.ctx, callee), &args)
            }
            ExprKind::Intrinsic { intrinsic, args } => {
                let args = self.operands(args)?;
                backend.translate_intrinsic(&self.ctx, *intrinsic, &args)?
            }
            ExprKind::Construct(args) => {
                let args = self.operands(args)?;
                call(&backend.type_name(&expr.ty)?, &args)
            }
            ExprKind::Cast(operand) => backend.cast(&expr.ty, &self.expr(operand)?)?,
        })
    }

    fn operand(&self, expr: &Expr) -> Result<Operand> {
        Ok(Operand {
            text: self.expr(expr)?,
            ty: expr.ty.clone(),
        })
    }

    fn operands(&self, exprs: &[Expr]) -> Result<Vec<Operand>> {
        exprs.iter().map(|e| self.operand(e)).collect()
    }

    fn literal(&self, literal: &Literal) -> String {
        match literal {
            Literal::Bool(value) => value.to_string(),
            Literal::Int(value) => value.to_string(),
            Literal::UInt(value) => format!("{value}u"),
            Literal::Float(value) => self.backend.float_literal(*value),
        }
    }

    /// A declaration, assignment or expression without the trailing `;`.
    fn simple(&self, stmt: &Stmt) -> Result<String> {
        match stmt {
            Stmt::Declare { name, ty, init } => {
                let declaration = self.backend.declaration(ty, &self.backend.identifier(name))?;
                Ok(match init {
                    Some(init) => format!("{declaration} = {}", self.expr(init)?),
                    None => declaration,
                })
            }
            Stmt::Assign { target, op, value } => Ok(format!(
                "{} {} {}",
                self.expr(target)?,
                op.symbol(),
                self.expr(value)?
            )),
            Stmt::Expr(expr) => self.expr(expr),
            _ => Err(ShaderGenError::construct(
                self.ctx.symbol(),
                "only declarations and expressions can appear in a for header",
            )),
        }
    }

    pub fn stmts(&self, w: &mut CodeWriter, body: &[Stmt]) -> Result<()> {
        for stmt in body {
            self.stmt(w, stmt)?;
        }
        Ok(())
    }

    fn block(&self, w: &mut CodeWriter, body: &[Stmt]) -> Result<()> {
        w.open();
        self.stmts(w, body)?;
        w.close();
        Ok(())
    }

    pub fn stmt(&self, w: &mut CodeWriter, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Declare { .. } | Stmt::Assign { .. } | Stmt::Expr(_) => {
                w.line(format!("{};", self.simple(stmt)?))
            }
            Stmt::If {
                condition,
                then,
                otherwise,
            } => {
                w.line(format!("if {}", parenthesized(&self.expr(condition)?)));
                self.block(w, then)?;
                if let Some(otherwise) = otherwise {
                    w.line("else");
                    self.block(w, otherwise)?;
                }
            }
            Stmt::For {
                init,
                condition,
                step,
                body,
            } => {
                let condition = match condition {
                    Some(condition) => self.expr(condition)?,
                    None => String::new(),
                };
                let step = step
                    .iter()
                    .map(|s| self.simple(s))
                    .collect::<Result<Vec<_>>>()?
                    .join(", ");
                if init.len() > 1 {
                    // A for header holds a single initializer.
                    w.open();
                    self.stmts(w, init)?;
                    w.line(format!("for (; {condition}; {step})"));
                    self.block(w, body)?;
                    w.close();
                } else {
                    let init = match init.first() {
                        Some(init) => self.simple(init)?,
                        None => String::new(),
                    };
                    w.line(format!("for ({init}; {condition}; {step})"));
                    self.block(w, body)?;
                }
            }
            Stmt::While { condition, body } => {
                w.line(format!("while {}", parenthesized(&self.expr(condition)?)));
                self.block(w, body)?;
            }
            Stmt::DoWhile { body, condition } => {
                w.line("do");
                w.open();
                self.stmts(w, body)?;
                w.close_with(&format!(" while {};", parenthesized(&self.expr(condition)?)));
            }
            Stmt::Switch {
                selector,
                cases,
                default,
            } => {
                w.line(format!("switch {}", parenthesized(&self.expr(selector)?)));
                w.open();
                for case in cases {
                    for label in &case.labels {
                        w.line(format!("case {}:", self.literal(label)));
                    }
                    self.block(w, &case.body)?;
                }
                if let Some(default) = default {
                    w.line("default:");
                    self.block(w, default)?;
                }
                w.close();
            }
            Stmt::Return(Some(value)) => w.line(format!("return {};", self.expr(value)?)),
            Stmt::Return(None) => w.line("return;"),
            Stmt::Break => w.line("break;"),
            Stmt::Continue => w.line("continue;"),
            Stmt::Block(body) => self.block(w, body)?,
        }
        Ok(())
    }
}
