//! # tally-core
//!
//! Number engine for tally.
//!
//! This crate provides:
//! - Fixed-precision decimal arithmetic (34 significant digits, half-up rounding)
//! - Factorial and the continuous gamma extension
//! - Angle units for the trigonometric primitives
//! - Plain, scientific and engineering notation formatting
//!
//! ## Example
//!
//! ```rust
//! use tally_core::{number, parse_decimal};
//!
//! let a = parse_decimal("1.5").unwrap();
//! let b = parse_decimal("2").unwrap();
//! assert_eq!(number::mul(&a, &b), parse_decimal("3").unwrap());
//! ```

pub mod angle;
pub mod error;
pub mod format;
pub mod number;
pub mod special;

pub use angle::AngleUnit;
pub use bigdecimal::BigDecimal;
pub use error::{NumberError, NumberResult};
pub use format::{format_number, is_fractional, round_to_place, Notation};
pub use number::{parse_decimal, PRECISION};
