//! Tests for expression conversion and evaluation through the public API

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use tally::prelude::*;
use tally::{evaluate, evaluate_with, parse_decimal, postfix_string, to_postfix};

fn eval(text: &str) -> BigDecimal {
    evaluate(text).unwrap()
}

fn dec(text: &str) -> BigDecimal {
    parse_decimal(text).unwrap()
}

/// Operator precedence and associativity
#[test]
fn test_precedence_and_associativity() {
    assert_eq!(eval("2^3^2"), dec("512"));
    assert_eq!(eval("2-3-4"), dec("-5"));
    assert_eq!(eval("2*3+4"), dec("10"));
    assert_eq!(eval("(1+2)"), dec("3"));

    assert_eq!(postfix_string(&to_postfix("2*3+4").unwrap()), "2 3 * 4 +");
    assert_eq!(postfix_string(&to_postfix("(1+2)").unwrap()), "1 2 +");
}

/// An incoming operator pops at most one stacked operator, so a lower-group
/// operator buried under a higher one is applied last
#[test]
fn test_single_pop_leaves_buried_operator() {
    assert_eq!(postfix_string(&to_postfix("1-2*3+4").unwrap()), "1 2 3 * 4 + -");
    assert_eq!(eval("1-2*3+4"), dec("-9"));
    assert_eq!(eval("(1-2*3)+4"), dec("-1"));
}

/// Exponents far beyond the working precision stay cheap to combine
#[test]
fn test_extreme_exponents_finish_quickly() {
    let started = std::time::Instant::now();

    let sum = eval("1e300000000+1");
    assert_eq!(sum.digits(), 1);
    assert_eq!(sum.as_bigint_and_exponent().1, -300_000_000);

    let difference = eval("1-1e300000000");
    assert_eq!(difference.as_bigint_and_exponent().1, -300_000_000);

    assert_eq!(eval("1e-300000000+2"), dec("2"));
    assert_eq!(eval("7%1e300000000"), dec("7"));
    assert!(matches!(evaluate("1e300000000%7"), Err(FormulaError::NumericDomain(_))));
    assert!(matches!(evaluate("(1e300000000)!"), Err(FormulaError::NumericDomain(_))));
    assert!(!tally::is_fractional(&sum));

    assert!(started.elapsed() < std::time::Duration::from_secs(5));
}

/// Implicit multiplication before an opening bracket
#[test]
fn test_implicit_multiplication() {
    assert_eq!(eval("2(3+4)"), dec("14"));
    assert_eq!(eval("2*(3+4)"), dec("14"));
}

/// Unary minus binds looser than `^`
#[test]
fn test_unary_minus() {
    assert_eq!(eval("-3^2"), dec("-9"));
    assert_eq!(eval("3-(-4)"), dec("7"));
}

#[test]
fn test_scientific_notation_and_factorial() {
    assert_eq!(eval("3e2"), dec("300"));
    assert_eq!(eval("5!"), dec("120"));

    let gamma = tally::number::to_f64(&eval("2.5!")).unwrap();
    assert!((gamma - 3.323_350_970_447_842_6).abs() < 1e-12);
}

#[test]
fn test_divide_by_zero() {
    assert_eq!(evaluate("5/0"), Err(FormulaError::DivideByZero));
    assert_eq!(evaluate("5%0"), Err(FormulaError::DivideByZero));
}

/// Decimal arithmetic keeps 34 significant digits
#[test]
fn test_fixed_precision() {
    assert_eq!(eval("0.1+0.2"), dec("0.3"));
    assert_eq!(eval("2/3"), dec("0.6666666666666666666666666666666667"));
    assert_eq!(eval("1/3*3"), dec("0.9999999999999999999999999999999999"));
}

#[test]
fn test_degrees() {
    let degrees = EvaluationOptions::degrees();
    let value = evaluate_with("tan(45)", &degrees).unwrap();
    assert!((tally::number::to_f64(&value).unwrap() - 1.0).abs() < 1e-12);

    let value = evaluate_with("arcsin(1)", &degrees).unwrap();
    assert!((tally::number::to_f64(&value).unwrap() - 90.0).abs() < 1e-9);
}

#[test]
fn test_formatting_results() {
    let value = eval("1500*1");
    assert_eq!(tally::format_number(&value, Notation::Scientific, None), "1.5e3");
    assert_eq!(tally::format_number(&value, Notation::Engineering, None), "1.5e3");
    assert_eq!(tally::format_number(&eval("10/4"), Notation::Plain, Some(3)), "2.500");
    assert!(tally::is_fractional(&eval("10/4")));
    assert!(!tally::is_fractional(&eval("10/5")));
}

#[test]
fn test_errors_are_syntax() {
    for text in ["", "1+", "(1+2", "1+2)", "2x", "1..2", "foo(1)"] {
        assert!(
            matches!(evaluate(text), Err(FormulaError::Syntax(_))),
            "{text:?} should be a syntax error"
        );
    }
}

fn arithmetic() -> impl Strategy<Value = String> {
    let leaf = (0u32..1000).prop_map(|n| n.to_string());
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (
                inner.clone(),
                prop::sample::select(vec!['+', '-', '*', '/', '%']),
                inner.clone()
            )
                .prop_map(|(left, op, right)| format!("{left}{op}{right}")),
            inner.clone().prop_map(|e| format!("({e})")),
            inner.clone().prop_map(|e| format!("-({e})")),
            (1u32..10, inner).prop_map(|(n, e)| format!("{n}({e})")),
        ]
    })
}

proptest! {
    /// Whatever the converter accepts reduces to exactly one value
    #[test]
    fn prop_well_formed_expressions_reduce_to_one_value(text in arithmetic()) {
        match evaluate(&text) {
            Ok(_) | Err(FormulaError::DivideByZero) => {}
            Err(other) => prop_assert!(false, "{text:?} failed with {other}"),
        }
    }
}
