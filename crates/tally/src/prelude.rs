//! Prelude module - common imports for tally users
//!
//! ```rust
//! use tally::prelude::*;
//! ```

pub use crate::{
    // Configuration
    AngleUnit,
    BigDecimal,
    EvaluationOptions,
    // Main types
    Expression,
    Formula,
    // Error types
    FormulaError,
    FormulaResult,
    Notation,
    NumberError,
    // Editing
    TextEditable,
};
