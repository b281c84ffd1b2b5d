//! Error types for tally-core

use thiserror::Error;

/// Result type alias using [`NumberError`]
pub type NumberResult<T> = std::result::Result<T, NumberError>;

/// Errors raised by the numeric primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// Division or remainder with a zero divisor
    #[error("Divide by zero")]
    DivideByZero,

    /// Text that is not a decimal literal
    #[error("Invalid number literal: '{0}'")]
    InvalidLiteral(String),

    /// Argument outside the domain of a function
    #[error("Domain error: {0}")]
    Domain(String),

    /// Result or intermediate value too large to represent
    #[error("Overflow: {0}")]
    Overflow(String),
}

impl NumberError {
    /// Create a new domain error with a message
    pub fn domain<S: Into<String>>(msg: S) -> Self {
        NumberError::Domain(msg.into())
    }

    /// Create a new overflow error with a message
    pub fn overflow<S: Into<String>>(msg: S) -> Self {
        NumberError::Overflow(msg.into())
    }
}
