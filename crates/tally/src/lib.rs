//! # tally
//!
//! Editable arithmetic expressions and variable formulas evaluated on
//! fixed-precision decimals.
//!
//! ## Features
//!
//! - Infix expressions with `+ - * / % ^`, scientific `e`, postfix `!`,
//!   unary minus and implicit multiplication (`2(3+4)`)
//! - `sqrt abs sin cos tan arcsin arccos arctan` in radians or degrees
//! - 34 significant digits with half-up rounding
//! - Formulas with live variable tracking: bindings survive edits for as long
//!   as their variable stays in the text
//! - Plain, scientific and engineering output formatting
//!
//! ## Example
//!
//! ```rust
//! use tally::prelude::*;
//!
//! let mut expr = Expression::from("2*3");
//! expr.push_str("+4").unwrap();
//! assert_eq!(expr.evaluate().unwrap(), BigDecimal::from(10));
//!
//! let formula = Formula::from("(a+b)/2");
//! formula.define_variable("a", 3).unwrap();
//! formula.define_variable("b", 4).unwrap();
//! let mean = formula.evaluate().unwrap();
//! assert_eq!(tally::format_number(&mean, Notation::Plain, None), "3.5");
//! ```

pub mod prelude;

// Re-export the number engine
pub use tally_core::{
    format_number, is_fractional, number, parse_decimal, round_to_place, special, AngleUnit,
    BigDecimal, Notation, NumberError, NumberResult, PRECISION,
};

// Re-export the expression engine
pub use tally_formula::{
    evaluate, evaluate_postfix, evaluate_with, is_variable, postfix_string, to_postfix,
    EvaluationOptions, Expression, Formula, FormulaError, FormulaResult, FormulaState, Function,
    Operator, TextEditable, Token,
};
