//! The resolved program handed over by a front end.
//!
//! Unlike [`crate::ir`], these nodes are open: a front end can describe host
//! constructs that have no shader equivalent (`SourceExprKind::Host`,
//! `SourceStmt::Host`, `TypeRef::Host`) and leave an expression untyped. The
//! model builder rejects those with a precise error instead of the front end
//! having to know what each backend supports.

use crate::defs::{AccessMode, ParamDirection, ResourceKind, Semantic, Stage};
use crate::ir::{AssignOp, BinaryOp, Literal, UnaryOp};
use crate::types::ScalarKind;
use serde::{Deserialize, Serialize};

/// A type as resolved by the front end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    Void,
    Scalar(ScalarKind),
    Vector(ScalarKind, u8),
    Matrix { rows: u8, columns: u8 },
    /// A struct by fully qualified name.
    Named(String),
    Array(Box<TypeRef>, u32),
    /// A host type with no shader counterpart, e.g. `double` or `string`.
    Host(String),
}

impl TypeRef {
    pub fn float() -> TypeRef {
        TypeRef::Scalar(ScalarKind::Float)
    }

    pub fn int() -> TypeRef {
        TypeRef::Scalar(ScalarKind::Int)
    }

    pub fn uint() -> TypeRef {
        TypeRef::Scalar(ScalarKind::UInt)
    }

    pub fn bool() -> TypeRef {
        TypeRef::Scalar(ScalarKind::Bool)
    }

    pub fn float2() -> TypeRef {
        TypeRef::Vector(ScalarKind::Float, 2)
    }

    pub fn float3() -> TypeRef {
        TypeRef::Vector(ScalarKind::Float, 3)
    }

    pub fn float4() -> TypeRef {
        TypeRef::Vector(ScalarKind::Float, 4)
    }

    pub fn uint3() -> TypeRef {
        TypeRef::Vector(ScalarKind::UInt, 3)
    }

    pub fn matrix4x4() -> TypeRef {
        TypeRef::Matrix {
            rows: 4,
            columns: 4,
        }
    }

    pub fn named(name: impl Into<String>) -> TypeRef {
        TypeRef::Named(name.into())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub semantic: Option<Semantic>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> FieldDecl {
        FieldDecl {
            name: name.into(),
            ty,
            semantic: None,
        }
    }

    pub fn with_semantic(mut self, semantic: Semantic) -> FieldDecl {
        self.semantic = Some(semantic);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<FieldDecl>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceDecl {
    pub name: String,
    pub kind: ResourceKind,
    /// Element type of uniform and structured buffers.
    #[serde(default)]
    pub element: Option<TypeRef>,
    #[serde(default)]
    pub access: AccessMode,
    #[serde(default)]
    pub set: Option<u32>,
    #[serde(default)]
    pub slot: Option<u32>,
}

impl ResourceDecl {
    pub fn new(name: impl Into<String>, kind: ResourceKind) -> ResourceDecl {
        ResourceDecl {
            name: name.into(),
            kind,
            element: None,
            access: AccessMode::ReadOnly,
            set: None,
            slot: None,
        }
    }

    pub fn uniform(name: impl Into<String>, element: TypeRef) -> ResourceDecl {
        ResourceDecl {
            element: Some(element),
            ..ResourceDecl::new(name, ResourceKind::UniformBuffer)
        }
    }

    pub fn structured(name: impl Into<String>, element: TypeRef, access: AccessMode) -> ResourceDecl {
        ResourceDecl {
            element: Some(element),
            access,
            ..ResourceDecl::new(name, ResourceKind::StructuredBuffer)
        }
    }

    pub fn at(mut self, set: u32, slot: u32) -> ResourceDecl {
        self.set = Some(set);
        self.slot = Some(slot);
        self
    }

    pub fn in_set(mut self, set: u32) -> ResourceDecl {
        self.set = Some(set);
        self
    }
}

/// Declarative metadata a front end attaches to each function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionMetadata {
    /// The stage this function is an entry point for, `None` for helpers.
    #[serde(default)]
    pub stage: Option<Stage>,
    /// Thread-group dimensions of a compute entry point.
    #[serde(default)]
    pub thread_group_size: Option<[u32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamDecl {
    pub name: String,
    pub ty: TypeRef,
    #[serde(default)]
    pub direction: ParamDirection,
    #[serde(default)]
    pub semantic: Option<Semantic>,
}

impl ParamDecl {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> ParamDecl {
        ParamDecl {
            name: name.into(),
            ty,
            direction: ParamDirection::In,
            semantic: None,
        }
    }

    pub fn with_direction(mut self, direction: ParamDirection) -> ParamDecl {
        self.direction = direction;
        self
    }

    pub fn with_semantic(mut self, semantic: Semantic) -> ParamDecl {
        self.semantic = Some(semantic);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDecl {
    /// Fully qualified name, e.g. `TestShaders.Basic.VS`.
    pub name: String,
    #[serde(default)]
    pub metadata: FunctionMetadata,
    pub params: Vec<ParamDecl>,
    pub return_type: TypeRef,
    pub body: Vec<SourceStmt>,
}

impl FunctionDecl {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> FunctionDecl {
        FunctionDecl {
            name: name.into(),
            metadata: FunctionMetadata::default(),
            params: Vec::new(),
            return_type,
            body: Vec::new(),
        }
    }

    pub fn stage(mut self, stage: Stage) -> FunctionDecl {
        self.metadata.stage = Some(stage);
        self
    }

    pub fn thread_group_size(mut self, x: u32, y: u32, z: u32) -> FunctionDecl {
        self.metadata.thread_group_size = Some([x, y, z]);
        self
    }

    pub fn param(mut self, param: ParamDecl) -> FunctionDecl {
        self.params.push(param);
        self
    }

    pub fn body(mut self, body: Vec<SourceStmt>) -> FunctionDecl {
        self.body = body;
        self
    }

    /// The unqualified name.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// A vertex/fragment pair the program declares as belonging together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderSetDecl {
    pub name: String,
    #[serde(default)]
    pub vertex: Option<String>,
    #[serde(default)]
    pub fragment: Option<String>,
}

/// Everything the front end resolved for one program.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedProgram {
    #[serde(default)]
    pub structs: Vec<StructDecl>,
    #[serde(default)]
    pub resources: Vec<ResourceDecl>,
    #[serde(default)]
    pub functions: Vec<FunctionDecl>,
    #[serde(default)]
    pub shader_sets: Vec<ShaderSetDecl>,
}

impl ResolvedProgram {
    pub fn function(&self, name: &str) -> Option<&FunctionDecl> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn struct_decl(&self, name: &str) -> Option<&StructDecl> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn resource(&self, name: &str) -> Option<&ResourceDecl> {
        self.resources.iter().find(|r| r.name == name)
    }

    /// Functions carrying the given stage marker, in declaration order.
    pub fn entry_points(&self, stage: Stage) -> impl Iterator<Item = &FunctionDecl> {
        self.functions
            .iter()
            .filter(move |f| f.metadata.stage == Some(stage))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Callee {
    /// A user function by fully qualified name.
    Function(String),
    /// A cross-backend builtin by name, e.g. `Clamp` or `Sample`.
    Intrinsic(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceExpr {
    pub kind: SourceExprKind,
    /// Resolved type; `None` when the front end could not resolve it.
    #[serde(default)]
    pub ty: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceExprKind {
    Literal(Literal),
    /// A local variable or parameter.
    Local(String),
    /// A declared resource.
    Resource(String),
    /// Struct field, vector component/swizzle or matrix element (`M11`..`M44`).
    Member {
        base: Box<SourceExpr>,
        member: String,
    },
    Index {
        base: Box<SourceExpr>,
        index: Box<SourceExpr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<SourceExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<SourceExpr>,
        rhs: Box<SourceExpr>,
    },
    Conditional {
        condition: Box<SourceExpr>,
        then: Box<SourceExpr>,
        otherwise: Box<SourceExpr>,
    },
    Call {
        callee: Callee,
        args: Vec<SourceExpr>,
    },
    /// Construct a value of the expression type from components.
    Construct(Vec<SourceExpr>),
    /// Convert the operand to the expression type.
    Cast(Box<SourceExpr>),
    /// A member of a host enum, lowered to its underlying integer.
    EnumValue {
        enum_name: String,
        member: String,
        value: i32,
    },
    /// A host-only construct, e.g. a lambda, `new` or `await`.
    Host(String),
}

impl SourceExpr {
    pub fn new(kind: SourceExprKind, ty: TypeRef) -> SourceExpr {
        SourceExpr { kind, ty: Some(ty) }
    }

    pub fn untyped(kind: SourceExprKind) -> SourceExpr {
        SourceExpr { kind, ty: None }
    }

    pub fn float(value: f32) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Literal(Literal::Float(value)), TypeRef::float())
    }

    pub fn int(value: i32) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Literal(Literal::Int(value)), TypeRef::int())
    }

    pub fn uint(value: u32) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Literal(Literal::UInt(value)), TypeRef::uint())
    }

    pub fn bool(value: bool) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Literal(Literal::Bool(value)), TypeRef::bool())
    }

    pub fn local(name: impl Into<String>, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Local(name.into()), ty)
    }

    /// Resource references take their type from the resource declaration.
    pub fn resource(name: impl Into<String>) -> SourceExpr {
        SourceExpr::untyped(SourceExprKind::Resource(name.into()))
    }

    pub fn member(self, member: impl Into<String>, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Member {
                base: Box::new(self),
                member: member.into(),
            },
            ty,
        )
    }

    pub fn index(self, index: SourceExpr, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Index {
                base: Box::new(self),
                index: Box::new(index),
            },
            ty,
        )
    }

    pub fn unary(op: UnaryOp, operand: SourceExpr, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
        )
    }

    pub fn binary(op: BinaryOp, lhs: SourceExpr, rhs: SourceExpr, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
        )
    }

    pub fn conditional(
        condition: SourceExpr,
        then: SourceExpr,
        otherwise: SourceExpr,
        ty: TypeRef,
    ) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Conditional {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            },
            ty,
        )
    }

    pub fn call(function: impl Into<String>, args: Vec<SourceExpr>, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Call {
                callee: Callee::Function(function.into()),
                args,
            },
            ty,
        )
    }

    pub fn intrinsic(name: impl Into<String>, args: Vec<SourceExpr>, ty: TypeRef) -> SourceExpr {
        SourceExpr::new(
            SourceExprKind::Call {
                callee: Callee::Intrinsic(name.into()),
                args,
            },
            ty,
        )
    }

    pub fn construct(ty: TypeRef, args: Vec<SourceExpr>) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Construct(args), ty)
    }

    pub fn cast(ty: TypeRef, operand: SourceExpr) -> SourceExpr {
        SourceExpr::new(SourceExprKind::Cast(Box::new(operand)), ty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSwitchCase {
    pub labels: Vec<SourceExpr>,
    pub body: Vec<SourceStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceStmt {
    Declare {
        name: String,
        ty: TypeRef,
        init: Option<SourceExpr>,
    },
    Assign {
        target: SourceExpr,
        op: AssignOp,
        value: SourceExpr,
    },
    Expr(SourceExpr),
    If {
        condition: SourceExpr,
        then: Vec<SourceStmt>,
        otherwise: Option<Vec<SourceStmt>>,
    },
    For {
        init: Vec<SourceStmt>,
        condition: Option<SourceExpr>,
        step: Vec<SourceStmt>,
        body: Vec<SourceStmt>,
    },
    While {
        condition: SourceExpr,
        body: Vec<SourceStmt>,
    },
    DoWhile {
        body: Vec<SourceStmt>,
        condition: SourceExpr,
    },
    Switch {
        selector: SourceExpr,
        cases: Vec<SourceSwitchCase>,
        default: Option<Vec<SourceStmt>>,
    },
    Return(Option<SourceExpr>),
    Break,
    Continue,
    Block(Vec<SourceStmt>),
    /// A host-only statement, e.g. `foreach`, `goto` or `throw`.
    Host(String),
}

impl SourceStmt {
    pub fn declare(name: impl Into<String>, ty: TypeRef, init: SourceExpr) -> SourceStmt {
        SourceStmt::Declare {
            name: name.into(),
            ty,
            init: Some(init),
        }
    }

    pub fn assign(target: SourceExpr, value: SourceExpr) -> SourceStmt {
        SourceStmt::Assign {
            target,
            op: AssignOp::Assign,
            value,
        }
    }

    pub fn compound(target: SourceExpr, op: AssignOp, value: SourceExpr) -> SourceStmt {
        SourceStmt::Assign { target, op, value }
    }

    pub fn ret(value: SourceExpr) -> SourceStmt {
        SourceStmt::Return(Some(value))
    }
}
