//! Fixed-precision decimal primitives
//!
//! Every primitive rounds its result to [`PRECISION`] significant digits with
//! half-up rounding. Exact operators (`add`, `sub`, `mul`, `div`, `rem`, `sqrt`,
//! `abs`) work on the decimal values directly; `pow` and the trigonometric
//! functions go through `f64` and convert the result back.

use crate::angle::AngleUnit;
use crate::error::{NumberError, NumberResult};
use bigdecimal::{BigDecimal, FromPrimitive, RoundingMode, Signed, ToPrimitive, Zero};
use std::str::FromStr;

/// Significant decimal digits kept by every primitive
pub const PRECISION: u64 = 34;

/// Largest scale difference `rem` aligns before giving up
const MAX_SCALE_GAP: u64 = 10_000;

/// Beyond this decimal exponent a value cannot round-trip through `f64`
const F64_MAGNITUDE: i64 = 400;

/// Parse a decimal literal such as `42`, `3.14`, `.5` or `-7.`
pub fn parse_decimal(text: &str) -> NumberResult<BigDecimal> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let points = unsigned.chars().filter(|&c| c == '.').count();
    let digits = unsigned.chars().filter(char::is_ascii_digit).count();

    if digits == 0 || points > 1 || digits + points != unsigned.len() {
        return Err(NumberError::InvalidLiteral(text.to_string()));
    }

    let mut literal = String::with_capacity(text.len() + 2);
    if unsigned.len() != text.len() {
        literal.push('-');
    }
    if unsigned.starts_with('.') {
        literal.push('0');
    }
    literal.push_str(unsigned);
    if unsigned.ends_with('.') {
        literal.push('0');
    }

    BigDecimal::from_str(&literal).map_err(|_| NumberError::InvalidLiteral(text.to_string()))
}

/// Round `value` to [`PRECISION`] significant digits
pub fn round_to_precision(value: BigDecimal) -> BigDecimal {
    round_significant(value, PRECISION)
}

/// Round `value` to `digits` significant digits, half-up
pub fn round_significant(value: BigDecimal, digits: u64) -> BigDecimal {
    let current = value.digits();
    if current <= digits {
        return value;
    }
    let (_, scale) = value.as_bigint_and_exponent();
    let dropped = (current - digits) as i64;
    value.with_scale_round(scale - dropped, RoundingMode::HalfUp)
}

/// Convert an `f64` result back into a fixed-precision decimal
pub fn from_f64(value: f64, what: &str) -> NumberResult<BigDecimal> {
    if !value.is_finite() {
        return Err(NumberError::domain(format!("{what} is not a finite number")));
    }
    BigDecimal::from_f64(value)
        .map(round_to_precision)
        .ok_or_else(|| NumberError::domain(format!("{what} is not representable")))
}

/// Decimal exponent of the leading digit (`0` for `1.5`, `-3` for `0.002`)
///
/// `None` for zero. Computed from the digits and scale alone, so it stays cheap
/// for values such as `1e300000000`.
pub fn magnitude(value: &BigDecimal) -> Option<i64> {
    if value.is_zero() {
        return None;
    }
    let (_, scale) = value.as_bigint_and_exponent();
    Some((value.digits() as i64 - 1).saturating_sub(scale))
}

/// Convert a decimal into an `f64` for the floating-point primitives
pub fn to_f64(value: &BigDecimal) -> NumberResult<f64> {
    match magnitude(value) {
        Some(m) if m > F64_MAGNITUDE => {
            return Err(NumberError::overflow(format!("a number near 1e{m} does not fit a double")));
        }
        Some(m) if m < -F64_MAGNITUDE => return Ok(0.0),
        _ => {}
    }
    value
        .to_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| NumberError::overflow(format!("{value} does not fit a double")))
}

/// Which operand of a sum wins outright, if their leading digits are too far
/// apart for the smaller one to reach the rounding digit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dominant {
    Left,
    Right,
}

fn dominant(a: &BigDecimal, b: &BigDecimal) -> Option<Dominant> {
    let gap = PRECISION as i64 + 2;
    match (magnitude(a), magnitude(b)) {
        (_, None) => Some(Dominant::Left),
        (None, _) => Some(Dominant::Right),
        (Some(ma), Some(mb)) if ma.saturating_sub(mb) > gap => Some(Dominant::Left),
        (Some(ma), Some(mb)) if mb.saturating_sub(ma) > gap => Some(Dominant::Right),
        _ => None,
    }
}

pub fn add(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    match dominant(a, b) {
        Some(Dominant::Left) => round_to_precision(a.clone()),
        Some(Dominant::Right) => round_to_precision(b.clone()),
        None => round_to_precision(a + b),
    }
}

pub fn sub(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    match dominant(a, b) {
        Some(Dominant::Left) => round_to_precision(a.clone()),
        Some(Dominant::Right) => round_to_precision(-b),
        None => round_to_precision(a - b),
    }
}

pub fn mul(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    round_to_precision(a * b)
}

pub fn div(a: &BigDecimal, b: &BigDecimal) -> NumberResult<BigDecimal> {
    if b.is_zero() {
        return Err(NumberError::DivideByZero);
    }
    Ok(round_to_precision(a / b))
}

/// Remainder of truncating division; the sign follows the dividend
pub fn rem(a: &BigDecimal, b: &BigDecimal) -> NumberResult<BigDecimal> {
    if b.is_zero() {
        return Err(NumberError::DivideByZero);
    }
    match (magnitude(a), magnitude(b)) {
        (None, _) => return Ok(BigDecimal::zero()),
        (Some(ma), Some(mb)) if ma < mb => return Ok(round_to_precision(a.clone())),
        _ => {}
    }
    let (_, scale_a) = a.as_bigint_and_exponent();
    let (_, scale_b) = b.as_bigint_and_exponent();
    if scale_a.abs_diff(scale_b) > MAX_SCALE_GAP {
        return Err(NumberError::overflow("remainder operands are too far apart"));
    }
    Ok(round_to_precision(a % b))
}

/// `a` raised to `b`, computed in double precision
pub fn pow(a: &BigDecimal, b: &BigDecimal) -> NumberResult<BigDecimal> {
    let result = to_f64(a)?.powf(to_f64(b)?);
    from_f64(result, &format!("{a}^{b}"))
}

pub fn sqrt(a: &BigDecimal) -> NumberResult<BigDecimal> {
    if a.is_negative() {
        return Err(NumberError::domain(format!("square root of negative number {a}")));
    }
    a.sqrt()
        .map(round_to_precision)
        .ok_or_else(|| NumberError::domain(format!("square root of {a}")))
}

pub fn abs(a: &BigDecimal) -> BigDecimal {
    round_to_precision(a.abs())
}

pub fn neg(a: &BigDecimal) -> BigDecimal {
    -a
}

/// `value × 10^exponent`, with `exponent` truncated toward zero
pub fn scale_by_power_of_ten(value: &BigDecimal, exponent: &BigDecimal) -> NumberResult<BigDecimal> {
    let too_large = || NumberError::overflow("exponent is too large");
    let shift = match magnitude(exponent) {
        None => 0,
        Some(m) if m < 0 => 0,
        Some(m) if m > 18 => return Err(too_large()),
        Some(_) => exponent.with_scale(0).to_i64().ok_or_else(too_large)?,
    };
    if value.is_zero() {
        return Ok(BigDecimal::zero());
    }
    let (digits, scale) = value.as_bigint_and_exponent();
    let scale = scale.checked_sub(shift).ok_or_else(too_large)?;
    Ok(round_to_precision(BigDecimal::new(digits, scale)))
}

pub fn sin(a: &BigDecimal, unit: AngleUnit) -> NumberResult<BigDecimal> {
    from_f64(unit.to_radians(to_f64(a)?).sin(), "sin")
}

pub fn cos(a: &BigDecimal, unit: AngleUnit) -> NumberResult<BigDecimal> {
    from_f64(unit.to_radians(to_f64(a)?).cos(), "cos")
}

pub fn tan(a: &BigDecimal, unit: AngleUnit) -> NumberResult<BigDecimal> {
    from_f64(unit.to_radians(to_f64(a)?).tan(), "tan")
}

pub fn asin(a: &BigDecimal, unit: AngleUnit) -> NumberResult<BigDecimal> {
    let x = to_f64(a)?;
    if !(-1.0..=1.0).contains(&x) {
        return Err(NumberError::domain(format!("arcsin of {a} is undefined")));
    }
    from_f64(unit.from_radians(x.asin()), "arcsin")
}

pub fn acos(a: &BigDecimal, unit: AngleUnit) -> NumberResult<BigDecimal> {
    let x = to_f64(a)?;
    if !(-1.0..=1.0).contains(&x) {
        return Err(NumberError::domain(format!("arccos of {a} is undefined")));
    }
    from_f64(unit.from_radians(x.acos()), "arccos")
}

pub fn atan(a: &BigDecimal, unit: AngleUnit) -> NumberResult<BigDecimal> {
    from_f64(unit.from_radians(to_f64(a)?.atan()), "arctan")
}
