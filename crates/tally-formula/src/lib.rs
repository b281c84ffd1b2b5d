//! # tally-formula
//!
//! Expression parser and evaluator for tally.
//!
//! This crate provides:
//! - Infix to postfix conversion (text → [`Token`] queue)
//! - Postfix evaluation on fixed-precision decimals (queue → value)
//! - [`Expression`]: editable concrete expression text
//! - [`Formula`]: editable template text with live variable tracking and substitution
//!
//! ## Example
//!
//! ```rust
//! use tally_formula::{evaluate, BigDecimal, Formula};
//!
//! assert_eq!(evaluate("2(3+4)").unwrap(), BigDecimal::from(14));
//!
//! let formula = Formula::from("Rate * Hours");
//! formula.define_variable("Rate", "12.5").unwrap()
//!     .define_variable("Hours", 8).unwrap();
//! assert_eq!(formula.expression().to_string(), "12.5 * 8");
//! assert_eq!(formula.evaluate().unwrap(), BigDecimal::from(100));
//! ```

pub mod error;
pub mod evaluator;
pub mod expression;
pub mod formula;
pub mod postfix;
pub mod text;
pub mod token;
pub mod variables;

pub use error::{FormulaError, FormulaResult};
pub use evaluator::{evaluate, evaluate_postfix, evaluate_with, EvaluationOptions};
pub use expression::Expression;
pub use formula::{Formula, FormulaState};
pub use postfix::to_postfix;
pub use text::TextEditable;
pub use token::{postfix_string, Function, Operator, Token};
pub use variables::{is_variable, retokenize_variables, substitute, Bindings};

pub use tally_core::{AngleUnit, BigDecimal};
