//! Factorial and the gamma function

use crate::error::{NumberError, NumberResult};
use crate::format::is_fractional;
use crate::number::{from_f64, magnitude, round_to_precision, to_f64};
use bigdecimal::num_bigint::BigInt;
use bigdecimal::{BigDecimal, One, Signed, ToPrimitive};
use std::f64::consts::PI;

/// Largest integer accepted by [`factorial`]
pub const MAX_FACTORIAL: u64 = 20_000;

const LANCZOS_G: f64 = 7.0;
const LANCZOS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// `n!` as an exact integer
pub fn factorial(n: u64) -> NumberResult<BigInt> {
    if n > MAX_FACTORIAL {
        return Err(NumberError::overflow(format!(
            "{n}! exceeds the largest supported factorial ({MAX_FACTORIAL}!)"
        )));
    }
    let mut product = BigInt::one();
    for k in 2..=n {
        product *= k;
    }
    Ok(product)
}

/// Γ(x) via the Lanczos approximation, with reflection below one half
pub fn gamma(x: f64) -> NumberResult<f64> {
    if x <= 0.0 && x.fract() == 0.0 {
        return Err(NumberError::domain(format!("gamma is undefined at {x}")));
    }
    if x < 0.5 {
        return Ok(PI / ((PI * x).sin() * gamma(1.0 - x)?));
    }

    let x = x - 1.0;
    let t = x + LANCZOS_G + 0.5;
    let series = LANCZOS
        .iter()
        .enumerate()
        .skip(1)
        .fold(LANCZOS[0], |acc, (i, c)| acc + c / (x + i as f64));

    Ok((2.0 * PI).sqrt() * t.powf(x + 0.5) * (-t).exp() * series)
}

/// `value!`: the exact factorial for integers, Γ(value + 1) otherwise
pub fn factorial_of(value: &BigDecimal) -> NumberResult<BigDecimal> {
    if is_fractional(value) {
        let x = to_f64(value)?;
        return from_f64(gamma(x + 1.0)?, &format!("{value}!"));
    }
    if value.is_negative() {
        return Err(NumberError::domain(format!("factorial of negative integer {value}")));
    }
    if matches!(magnitude(value), Some(m) if m > 18) {
        return Err(NumberError::overflow(format!(
            "factorial exceeds the largest supported factorial ({MAX_FACTORIAL}!)"
        )));
    }
    let n = value
        .with_scale(0)
        .to_u64()
        .ok_or_else(|| NumberError::overflow(format!("{value}! is too large")))?;
    Ok(round_to_precision(BigDecimal::from(factorial(n)?)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::number::parse_decimal;

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0).unwrap(), BigInt::from(1));
        assert_eq!(factorial(1).unwrap(), BigInt::from(1));
        assert_eq!(factorial(5).unwrap(), BigInt::from(120));
        assert_eq!(factorial(20).unwrap(), BigInt::from(2_432_902_008_176_640_000u64));
        assert!(matches!(factorial(MAX_FACTORIAL + 1), Err(NumberError::Overflow(_))));
    }

    #[test]
    fn test_gamma_matches_factorial() {
        for n in 1..10u32 {
            let expected: f64 = (1..n).map(f64::from).product();
            let actual = gamma(f64::from(n)).unwrap();
            assert!((actual - expected).abs() / expected < 1e-12, "gamma({n})");
        }
    }

    #[test]
    fn test_gamma_half_integers() {
        assert!((gamma(0.5).unwrap() - PI.sqrt()).abs() < 1e-12);
        assert!((gamma(3.5).unwrap() - 3.323_350_970_447_842_6).abs() < 1e-12);
        assert!((gamma(-0.5).unwrap() + 2.0 * PI.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_gamma_poles() {
        assert!(gamma(0.0).is_err());
        assert!(gamma(-3.0).is_err());
    }

    #[test]
    fn test_factorial_of_decimal() {
        let five = parse_decimal("5").unwrap();
        assert_eq!(factorial_of(&five).unwrap(), BigDecimal::from(120));

        let integral = parse_decimal("4.000").unwrap();
        assert_eq!(factorial_of(&integral).unwrap(), BigDecimal::from(24));

        let fractional = parse_decimal("2.5").unwrap();
        let value = factorial_of(&fractional).unwrap().to_f64().unwrap();
        assert!((value - 3.323_350_970_447_842_6).abs() < 1e-12);

        let negative = parse_decimal("-3").unwrap();
        assert!(matches!(factorial_of(&negative), Err(NumberError::Domain(_))));
    }

    #[test]
    fn test_factorial_of_extreme_exponents() {
        let huge = BigDecimal::new(1.into(), -300_000_000);
        assert!(matches!(factorial_of(&huge), Err(NumberError::Overflow(_))));

        let tiny = BigDecimal::new(1.into(), 300_000_000);
        assert_eq!(factorial_of(&tiny).unwrap(), BigDecimal::from(1));
    }
}
