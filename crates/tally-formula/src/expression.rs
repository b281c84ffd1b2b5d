//! Concrete expressions

use crate::error::FormulaResult;
use crate::evaluator::{evaluate_postfix, EvaluationOptions};
use crate::postfix::to_postfix;
use crate::text::TextEditable;
use crate::token::Token;
use std::fmt;
use tally_core::BigDecimal;

/// Editable arithmetic expression text
///
/// Unlike [`Formula`](crate::Formula) an expression does no variable tracking;
/// any name left in the text is read as a function name when evaluated.
///
/// # Example
/// ```rust
/// use tally_formula::{BigDecimal, Expression, TextEditable};
///
/// let mut expr = Expression::from("2(3+4)");
/// assert_eq!(expr.evaluate().unwrap(), BigDecimal::from(14));
///
/// expr.push_str("!").unwrap();
/// assert!(expr.evaluate().is_ok());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Expression {
    text: String,
}

impl Expression {
    /// Create an empty expression
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Convert the text to postfix form
    pub fn to_postfix(&self) -> FormulaResult<Vec<Token>> {
        to_postfix(&self.text)
    }

    /// Evaluate with default options
    pub fn evaluate(&self) -> FormulaResult<BigDecimal> {
        self.evaluate_with(&EvaluationOptions::default())
    }

    pub fn evaluate_with(&self, options: &EvaluationOptions) -> FormulaResult<BigDecimal> {
        evaluate_postfix(&self.to_postfix()?, options)
    }
}

impl TextEditable for Expression {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn modify<F>(&mut self, edit: F) -> FormulaResult<()>
    where
        F: FnOnce(&mut String) -> FormulaResult<()>,
    {
        let mut draft = self.text.clone();
        edit(&mut draft)?;
        self.text = draft;
        Ok(())
    }
}

impl From<&str> for Expression {
    fn from(text: &str) -> Self {
        Self {
            text: text.to_string(),
        }
    }
}

impl From<String> for Expression {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormulaError;

    #[test]
    fn test_edit_then_evaluate() {
        let mut expr = Expression::new();
        assert!(matches!(expr.evaluate(), Err(FormulaError::Syntax(_))));

        expr.push_str("3e2").unwrap();
        assert_eq!(expr.evaluate().unwrap(), BigDecimal::from(300));

        expr.insert(0, '-').unwrap();
        assert_eq!(expr.evaluate().unwrap(), BigDecimal::from(-300));
    }

    #[test]
    fn test_unsubstituted_name_is_a_syntax_error() {
        let expr = Expression::from("2*x");
        assert!(matches!(expr.evaluate(), Err(FormulaError::Syntax(_))));
    }

    #[test]
    fn test_display() {
        let expr = Expression::from("1 + 2");
        assert_eq!(expr.to_string(), "1 + 2");
        assert_eq!(expr.as_str(), "1 + 2");
    }
}
