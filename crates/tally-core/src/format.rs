//! Number formatting
//!
//! Renders decimals in plain, scientific or engineering notation without
//! relying on `BigDecimal`'s own `Display`, which switches to exponent form
//! on its own terms.

use crate::number::magnitude;
use bigdecimal::{BigDecimal, RoundingMode, Signed, Zero};
use std::fmt;
use std::str::FromStr;

/// Fractional digits kept when no explicit precision is requested
const DEFAULT_FRACTION_DIGITS: i64 = 16;

/// Output notation for a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Notation {
    /// `1234.5`
    #[default]
    Plain,
    /// `1.2345e3`
    Scientific,
    /// `1.2345e3`, with exponents that are multiples of three
    Engineering,
}

impl FromStr for Notation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Notation::Plain),
            "scientific" | "sci" => Ok(Notation::Scientific),
            "engineering" | "eng" => Ok(Notation::Engineering),
            other => Err(format!("unknown notation '{other}'")),
        }
    }
}

impl fmt::Display for Notation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Notation::Plain => "plain",
            Notation::Scientific => "scientific",
            Notation::Engineering => "engineering",
        };
        f.write_str(name)
    }
}

/// Round `value` half-up at the `10^-place_offset` place
///
/// Positive offsets round to decimal places, negative offsets to whole places
/// (`-2` rounds to the nearest hundred).
pub fn round_to_place(value: &BigDecimal, place_offset: i64) -> BigDecimal {
    let (_, scale) = value.as_bigint_and_exponent();
    if scale <= place_offset {
        return value.clone();
    }
    // below half a unit of the place, everything rounds away
    if matches!(magnitude(value), Some(m) if m < place_offset.saturating_neg().saturating_sub(1)) {
        return BigDecimal::zero();
    }
    value.with_scale_round(place_offset, RoundingMode::HalfUp)
}

/// Whether `value` has a non-zero fractional part
pub fn is_fractional(value: &BigDecimal) -> bool {
    let (_, scale) = value.as_bigint_and_exponent();
    if scale <= 0 || value.is_zero() {
        return false;
    }
    let (_, scale) = value.normalized().as_bigint_and_exponent();
    scale > 0
}

/// Render `value` in the given notation
///
/// With `precision`, the (mantissa's) fraction is rounded half-up and padded to
/// exactly that many digits. Without it, up to 16 fractional digits are kept and
/// trailing zeros are dropped.
pub fn format_number(value: &BigDecimal, notation: Notation, precision: Option<u32>) -> String {
    match notation {
        Notation::Plain => plain(&round_fraction(value, precision)),
        Notation::Scientific => exponent_form(value, 1, precision),
        Notation::Engineering => exponent_form(value, 3, precision),
    }
}

fn round_fraction(value: &BigDecimal, precision: Option<u32>) -> BigDecimal {
    match precision {
        Some(digits) => {
            let digits = i64::from(digits);
            round_to_place(value, digits).with_scale(digits)
        }
        None => {
            let rounded = round_to_place(value, DEFAULT_FRACTION_DIGITS);
            if rounded.is_zero() {
                BigDecimal::zero()
            } else {
                rounded.normalized()
            }
        }
    }
}

fn exponent_form(value: &BigDecimal, step: i64, precision: Option<u32>) -> String {
    if value.is_zero() {
        return format!("{}e0", plain(&round_fraction(value, precision)));
    }

    let (digits, scale) = value.as_bigint_and_exponent();
    let magnitude = value.digits() as i64 - 1 - scale;
    let mut exponent = magnitude.div_euclid(step) * step;
    let mut mantissa = round_fraction(&BigDecimal::new(digits.clone(), scale + exponent), precision);

    // rounding can carry the mantissa past its range (9.99 -> 10.0)
    let limit = BigDecimal::from(10i64.pow(step as u32));
    if mantissa.abs() >= limit {
        exponent += step;
        mantissa = round_fraction(&BigDecimal::new(digits, scale + exponent), precision);
    }

    format!("{}e{}", plain(&mantissa), exponent)
}

/// Positional rendering that never uses an exponent
fn plain(value: &BigDecimal) -> String {
    let (digits, scale) = value.as_bigint_and_exponent();
    let sign = if digits.is_negative() { "-" } else { "" };
    let mut text = digits.magnitude().to_string();

    if scale <= 0 {
        if text != "0" {
            text.push_str(&"0".repeat((-scale) as usize));
        }
        return format!("{sign}{text}");
    }

    let scale = scale as usize;
    if text.len() <= scale {
        text.insert_str(0, &"0".repeat(scale + 1 - text.len()));
    }
    let point = text.len() - scale;
    format!("{sign}{}.{}", &text[..point], &text[point..])
}
