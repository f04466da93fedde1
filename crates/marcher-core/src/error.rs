use crate::types::key::TypeKey;

/// Error codes prefixed by layer: T = type registry, V = values/conversion, C = calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Type registry
    T001, // unknown type name
    T002, // duplicate type registration
    T003, // type key collision
    T004, // construct on unregistered key
    T005, // malformed schema

    // Values
    V001, // type mismatch
    V002, // unsupported conversion
    V003, // unknown field

    // Calls
    C001, // unknown builtin
    C002, // duplicate builtin
    C003, // wrong argument count
    C004, // argument index out of range
    C005, // malformed signature
    C006, // invalid argument value
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::T001 => "T001",
            Self::T002 => "T002",
            Self::T003 => "T003",
            Self::T004 => "T004",
            Self::T005 => "T005",
            Self::V001 => "V001",
            Self::V002 => "V002",
            Self::V003 => "V003",
            Self::C001 => "C001",
            Self::C002 => "C002",
            Self::C003 => "C003",
            Self::C004 => "C004",
            Self::C005 => "C005",
            Self::C006 => "C006",
        }
    }
}

/// Fatal errors mean the call cannot proceed with the arguments it was given:
/// retrying with the same frame will fail the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Recoverable,
}

// ─── RuntimeError ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuntimeError {
    #[error("unknown type `{0}`")]
    UnknownType(String),

    #[error("type `{0}` is already registered")]
    DuplicateType(String),

    #[error("type `{name}` collides with `{existing}` on key {key}")]
    KeyCollision { name: String, existing: String, key: TypeKey },

    #[error("cannot construct unregistered type {0}")]
    Construction(TypeKey),

    #[error("malformed schema `{source_text}`: {message}")]
    Schema { source_text: String, message: String },

    #[error("expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("cannot convert `{from}` to `{to}`")]
    UnsupportedConversion { from: String, to: String },

    #[error("type `{ty}` has no field `{field}`")]
    UnknownField { ty: String, field: String },

    #[error("unknown builtin `{0}`")]
    UnknownBuiltin(String),

    #[error("builtin `{0}` is already registered")]
    DuplicateBuiltin(String),

    #[error("`{name}` expects {expected} argument(s), got {got}")]
    Arity { name: String, expected: usize, got: usize },

    #[error("argument {index} out of range for an argument list of size {size}")]
    ArgumentIndex { index: usize, size: usize },

    #[error("malformed signature `{source_text}`: {message}")]
    Signature { source_text: String, message: String },

    #[error("`{name}`: {message}")]
    InvalidArgument { name: String, message: String },
}

impl RuntimeError {
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self::TypeMismatch { expected: expected.into(), got: got.into() }
    }

    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument { name: name.into(), message: message.into() }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownType(_)              => ErrorCode::T001,
            Self::DuplicateType(_)            => ErrorCode::T002,
            Self::KeyCollision { .. }         => ErrorCode::T003,
            Self::Construction(_)             => ErrorCode::T004,
            Self::Schema { .. }               => ErrorCode::T005,
            Self::TypeMismatch { .. }         => ErrorCode::V001,
            Self::UnsupportedConversion { .. } => ErrorCode::V002,
            Self::UnknownField { .. }         => ErrorCode::V003,
            Self::UnknownBuiltin(_)           => ErrorCode::C001,
            Self::DuplicateBuiltin(_)         => ErrorCode::C002,
            Self::Arity { .. }                => ErrorCode::C003,
            Self::ArgumentIndex { .. }        => ErrorCode::C004,
            Self::Signature { .. }            => ErrorCode::C005,
            Self::InvalidArgument { .. }      => ErrorCode::C006,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::UnknownBuiltin(_) | Self::InvalidArgument { .. } => Severity::Recoverable,
            _ => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool { self.severity() == Severity::Fatal }
}

pub type Result<T, E = RuntimeError> = std::result::Result<T, E>;
