//! Expression evaluation errors.

use thiserror::Error;

/// Stage of evaluation an [`ExprError`] comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Lex,
    Parse,
    Eval,
}

/// Why an expression could not be evaluated.
///
/// Token positions are indices into the token sequence; `NoMatch` reports a
/// byte offset into the source text instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("no match at position {position}: {rest:?}")]
    NoMatch { position: usize, rest: String },

    #[error("expression has more than {limit} tokens")]
    TooManyTokens { limit: usize },

    #[error("unbalanced parentheses in tokens {start}..={end}")]
    UnbalancedParens { start: usize, end: usize },

    #[error("no main operator in tokens {start}..={end}")]
    NoMainOperator { start: usize, end: usize },

    #[error("missing operand at token {at}")]
    EmptyRange { at: usize },

    #[error("unary operator at token {index} follows its left operand")]
    MisplacedUnary { index: usize },

    #[error("token {index} is not a value")]
    NotAValue { index: usize },

    #[error("unknown register {0:?}")]
    UnknownRegister(String),

    #[error("division by zero")]
    DivideByZero,

    #[error("cannot read memory at 0x{addr:08x}")]
    BadAddress { addr: u32 },

    #[error("literal {0:?} does not fit in 32 bits")]
    InvalidLiteral(String),
}

impl ExprError {
    pub fn class(&self) -> ErrorClass {
        match self {
            ExprError::NoMatch { .. } | ExprError::TooManyTokens { .. } => ErrorClass::Lex,
            ExprError::UnbalancedParens { .. }
            | ExprError::NoMainOperator { .. }
            | ExprError::EmptyRange { .. }
            | ExprError::MisplacedUnary { .. } => ErrorClass::Parse,
            ExprError::NotAValue { .. }
            | ExprError::UnknownRegister(_)
            | ExprError::DivideByZero
            | ExprError::BadAddress { .. }
            | ExprError::InvalidLiteral(_) => ErrorClass::Eval,
        }
    }
}
