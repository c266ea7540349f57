use crate::enums::BackendKind;
use shadergen_ir::{ShaderType, Stage};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
/// Error type for shadergen.
pub enum ShaderGenError {
    /// The requested entry point does not exist in the program.
    #[error("Entry point {0} was not found.")]
    EntryPointNotFound(String),
    /// The function exists but is not marked as an entry point for the requested stage.
    #[error("Function {name} is not a {expected} entry point.")]
    NotAnEntryPoint { name: String, expected: Stage },
    /// An entry point's parameters or return type do not fit its stage.
    #[error("Invalid {stage} signature for {function}: {reason}.")]
    InvalidStageSignature {
        function: String,
        stage: Stage,
        reason: String,
    },
    /// Two resources claim the same set and slot.
    #[error("Resources {first} and {second} are both bound to set {set}, slot {slot}.")]
    DuplicateBinding {
        first: String,
        second: String,
        set: u32,
        slot: u32,
    },
    /// A construct in the named function has no shader equivalent.
    #[error("Unsupported construct in {symbol}: {reason}.")]
    UnsupportedConstruct { symbol: String, reason: String },
    /// The backend cannot represent the type.
    #[error("{backend} does not support type {ty}.")]
    UnsupportedType { backend: BackendKind, ty: ShaderType },
    /// The intrinsic is unknown, or the backend cannot translate it.
    #[error("Unsupported intrinsic {name} in {function}{}.", .backend.map(|b| format!(" for {b}")).unwrap_or_default())]
    UnsupportedIntrinsic {
        backend: Option<BackendKind>,
        name: String,
        function: String,
    },
}

/// The tag of a [`ShaderGenError`].
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq)]
pub enum ErrorKind {
    EntryPointNotFound,
    NotAnEntryPoint,
    InvalidStageSignature,
    DuplicateBinding,
    UnsupportedConstruct,
    UnsupportedType,
    UnsupportedIntrinsic,
}

impl ShaderGenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ShaderGenError::EntryPointNotFound(_) => ErrorKind::EntryPointNotFound,
            ShaderGenError::NotAnEntryPoint { .. } => ErrorKind::NotAnEntryPoint,
            ShaderGenError::InvalidStageSignature { .. } => ErrorKind::InvalidStageSignature,
            ShaderGenError::DuplicateBinding { .. } => ErrorKind::DuplicateBinding,
            ShaderGenError::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
            ShaderGenError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            ShaderGenError::UnsupportedIntrinsic { .. } => ErrorKind::UnsupportedIntrinsic,
        }
    }

    pub(crate) fn construct(symbol: impl Into<String>, reason: impl Into<String>) -> ShaderGenError {
        ShaderGenError::UnsupportedConstruct {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn signature(
        function: impl Into<String>,
        stage: Stage,
        reason: impl Into<String>,
    ) -> ShaderGenError {
        ShaderGenError::InvalidStageSignature {
            function: function.into(),
            stage,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported_type(backend: BackendKind, ty: &ShaderType) -> ShaderGenError {
        ShaderGenError::UnsupportedType {
            backend,
            ty: ty.clone(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ShaderGenError>;
