//! Formula error types

use tally_core::NumberError;
use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while editing, converting or evaluating
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Malformed expression: bad brackets, missing operands, stray characters
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// `/` or `%` with a zero right operand
    #[error("Divide by zero")]
    DivideByZero,

    /// Lookup or definition of a name the formula does not track
    #[error("Variable '{0}' was not found in the formula")]
    UnknownVariable(String),

    /// Text edit outside `[0, len]` or with an inverted range
    #[error("Range {start}..{end} out of bounds for length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },

    /// Numeric primitive failure (invalid domain, overflow)
    #[error("Numeric error: {0}")]
    NumericDomain(String),
}

impl FormulaError {
    /// Create a new syntax error with a message
    pub fn syntax<S: Into<String>>(msg: S) -> Self {
        FormulaError::Syntax(msg.into())
    }
}

impl From<NumberError> for FormulaError {
    fn from(err: NumberError) -> Self {
        match err {
            NumberError::DivideByZero => FormulaError::DivideByZero,
            NumberError::InvalidLiteral(literal) => {
                FormulaError::Syntax(format!("malformed number '{literal}'"))
            }
            other => FormulaError::NumericDomain(other.to_string()),
        }
    }
}
