//! The closed statement and expression node set consumed by backends.
//!
//! Every [`Expr`] carries its resolved [`ShaderType`]; nothing in this module
//! can represent an unresolved or host-only construct.

use crate::types::ShaderType;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int(i32),
    UInt(u32),
    Float(f32),
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Negate,
    Not,
    BitNot,
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "!",
            UnaryOp::BitNot => "~",
            UnaryOp::PreIncrement | UnaryOp::PostIncrement => "++",
            UnaryOp::PreDecrement | UnaryOp::PostDecrement => "--",
        }
    }

    pub fn is_postfix(&self) -> bool {
        matches!(self, UnaryOp::PostIncrement | UnaryOp::PostDecrement)
    }

    /// Increments and decrements write their operand.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            UnaryOp::PreIncrement
                | UnaryOp::PreDecrement
                | UnaryOp::PostIncrement
                | UnaryOp::PostDecrement
        )
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    LogicalAnd,
    LogicalOr,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
        }
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl AssignOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
            AssignOp::BitAnd => "&=",
            AssignOp::BitOr => "|=",
            AssignOp::BitXor => "^=",
            AssignOp::Shl => "<<=",
            AssignOp::Shr => ">>=",
        }
    }

    /// The binary operator a compound assignment applies.
    pub fn binary(&self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
            AssignOp::BitAnd => Some(BinaryOp::BitAnd),
            AssignOp::BitOr => Some(BinaryOp::BitOr),
            AssignOp::BitXor => Some(BinaryOp::BitXor),
            AssignOp::Shl => Some(BinaryOp::Shl),
            AssignOp::Shr => Some(BinaryOp::Shr),
        }
    }
}

/// The closed set of cross-backend builtin functions.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intrinsic {
    Abs,
    Acos,
    Asin,
    Atan,
    Atan2,
    Ceiling,
    Clamp,
    Cos,
    Cosh,
    Exp,
    Exp2,
    Floor,
    Frac,
    Lerp,
    Log,
    Log2,
    Max,
    Min,
    Pow,
    Round,
    Rsqrt,
    Saturate,
    Sign,
    Sin,
    Sinh,
    SmoothStep,
    Sqrt,
    Step,
    Tan,
    Tanh,
    Truncate,
    Dot,
    Cross,
    Distance,
    Length,
    Normalize,
    Reflect,
    Transpose,
    Ddx,
    Ddy,
    Fwidth,
    /// `Sample(texture, sampler, coordinates)`
    Sample,
    /// `SampleLevel(texture, sampler, coordinates, lod)`
    SampleLevel,
    /// `Load(multisample texture, coordinates, sample index)`
    Load,
    /// Workgroup memory and execution barrier.
    Barrier,
}

impl Intrinsic {
    pub const ALL: [Intrinsic; 45] = [
        Intrinsic::Abs,
        Intrinsic::Acos,
        Intrinsic::Asin,
        Intrinsic::Atan,
        Intrinsic::Atan2,
        Intrinsic::Ceiling,
        Intrinsic::Clamp,
        Intrinsic::Cos,
        Intrinsic::Cosh,
        Intrinsic::Exp,
        Intrinsic::Exp2,
        Intrinsic::Floor,
        Intrinsic::Frac,
        Intrinsic::Lerp,
        Intrinsic::Log,
        Intrinsic::Log2,
        Intrinsic::Max,
        Intrinsic::Min,
        Intrinsic::Pow,
        Intrinsic::Round,
        Intrinsic::Rsqrt,
        Intrinsic::Saturate,
        Intrinsic::Sign,
        Intrinsic::Sin,
        Intrinsic::Sinh,
        Intrinsic::SmoothStep,
        Intrinsic::Sqrt,
        Intrinsic::Step,
        Intrinsic::Tan,
        Intrinsic::Tanh,
        Intrinsic::Truncate,
        Intrinsic::Dot,
        Intrinsic::Cross,
        Intrinsic::Distance,
        Intrinsic::Length,
        Intrinsic::Normalize,
        Intrinsic::Reflect,
        Intrinsic::Transpose,
        Intrinsic::Ddx,
        Intrinsic::Ddy,
        Intrinsic::Fwidth,
        Intrinsic::Sample,
        Intrinsic::SampleLevel,
        Intrinsic::Load,
        Intrinsic::Barrier,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Intrinsic::Abs => "Abs",
            Intrinsic::Acos => "Acos",
            Intrinsic::Asin => "Asin",
            Intrinsic::Atan => "Atan",
            Intrinsic::Atan2 => "Atan2",
            Intrinsic::Ceiling => "Ceiling",
            Intrinsic::Clamp => "Clamp",
            Intrinsic::Cos => "Cos",
            Intrinsic::Cosh => "Cosh",
            Intrinsic::Exp => "Exp",
            Intrinsic::Exp2 => "Exp2",
            Intrinsic::Floor => "Floor",
            Intrinsic::Frac => "Frac",
            Intrinsic::Lerp => "Lerp",
            Intrinsic::Log => "Log",
            Intrinsic::Log2 => "Log2",
            Intrinsic::Max => "Max",
            Intrinsic::Min => "Min",
            Intrinsic::Pow => "Pow",
            Intrinsic::Round => "Round",
            Intrinsic::Rsqrt => "Rsqrt",
            Intrinsic::Saturate => "Saturate",
            Intrinsic::Sign => "Sign",
            Intrinsic::Sin => "Sin",
            Intrinsic::Sinh => "Sinh",
            Intrinsic::SmoothStep => "SmoothStep",
            Intrinsic::Sqrt => "Sqrt",
            Intrinsic::Step => "Step",
            Intrinsic::Tan => "Tan",
            Intrinsic::Tanh => "Tanh",
            Intrinsic::Truncate => "Truncate",
            Intrinsic::Dot => "Dot",
            Intrinsic::Cross => "Cross",
            Intrinsic::Distance => "Distance",
            Intrinsic::Length => "Length",
            Intrinsic::Normalize => "Normalize",
            Intrinsic::Reflect => "Reflect",
            Intrinsic::Transpose => "Transpose",
            Intrinsic::Ddx => "Ddx",
            Intrinsic::Ddy => "Ddy",
            Intrinsic::Fwidth => "Fwidth",
            Intrinsic::Sample => "Sample",
            Intrinsic::SampleLevel => "SampleLevel",
            Intrinsic::Load => "Load",
            Intrinsic::Barrier => "Barrier",
        }
    }

    /// Number of arguments the intrinsic takes.
    pub fn arity(&self) -> usize {
        match self {
            Intrinsic::Barrier => 0,
            Intrinsic::Atan2
            | Intrinsic::Max
            | Intrinsic::Min
            | Intrinsic::Pow
            | Intrinsic::Step
            | Intrinsic::Dot
            | Intrinsic::Cross
            | Intrinsic::Distance
            | Intrinsic::Reflect => 2,
            Intrinsic::Clamp
            | Intrinsic::Lerp
            | Intrinsic::SmoothStep
            | Intrinsic::Sample
            | Intrinsic::Load => 3,
            Intrinsic::SampleLevel => 4,
            _ => 1,
        }
    }

    pub fn is_texture_operation(&self) -> bool {
        matches!(
            self,
            Intrinsic::Sample | Intrinsic::SampleLevel | Intrinsic::Load
        )
    }

    pub fn is_derivative(&self) -> bool {
        matches!(self, Intrinsic::Ddx | Intrinsic::Ddy | Intrinsic::Fwidth)
    }
}

impl Display for Intrinsic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Intrinsic {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Intrinsic::ALL
            .iter()
            .copied()
            .find(|intrinsic| intrinsic.name() == s)
            .ok_or(())
    }
}

/// A typed expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: ShaderType,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: ShaderType) -> Expr {
        Expr { kind, ty }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprKind {
    Literal(Literal),
    /// A local variable or parameter.
    Local(String),
    /// A global resource binding.
    Resource(String),
    Field {
        base: Box<Expr>,
        field: String,
    },
    /// Component indices in `0..4`, e.g. `[0, 1]` for `.xy`.
    Swizzle {
        base: Box<Expr>,
        components: Vec<u8>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        condition: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// A call to a user function by its fully qualified name.
    Call {
        function: String,
        args: Vec<Expr>,
    },
    Intrinsic {
        intrinsic: Intrinsic,
        args: Vec<Expr>,
    },
    /// Construct a vector or matrix of the expression type.
    Construct(Vec<Expr>),
    /// Convert the operand to the expression type.
    Cast(Box<Expr>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchCase {
    pub labels: Vec<Literal>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Declare {
        name: String,
        ty: ShaderType,
        init: Option<Expr>,
    },
    Assign {
        target: Expr,
        op: AssignOp,
        value: Expr,
    },
    Expr(Expr),
    If {
        condition: Expr,
        then: Vec<Stmt>,
        otherwise: Option<Vec<Stmt>>,
    },
    For {
        init: Vec<Stmt>,
        condition: Option<Expr>,
        step: Vec<Stmt>,
        body: Vec<Stmt>,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
    },
    DoWhile {
        body: Vec<Stmt>,
        condition: Expr,
    },
    Switch {
        selector: Expr,
        cases: Vec<SwitchCase>,
        default: Option<Vec<Stmt>>,
    },
    Return(Option<Expr>),
    Break,
    Continue,
    Block(Vec<Stmt>),
}

/// Component letters used to spell a swizzle.
pub fn swizzle_text(components: &[u8]) -> String {
    components
        .iter()
        .map(|c| match c {
            0 => 'x',
            1 => 'y',
            2 => 'z',
            _ => 'w',
        })
        .collect()
}
