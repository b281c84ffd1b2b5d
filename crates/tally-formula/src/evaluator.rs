//! Postfix evaluator
//!
//! Runs a postfix queue on an operand stack of fixed-precision decimals.

use crate::error::{FormulaError, FormulaResult};
use crate::postfix::to_postfix;
use crate::token::{Function, Operator, Token};
use tally_core::number::{self, parse_decimal};
use tally_core::special::factorial_of;
use tally_core::{AngleUnit, BigDecimal};
use tracing::{debug, trace};

/// Options for expression evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvaluationOptions {
    /// Unit for trigonometric inputs and inverse-trigonometric results (default: radians)
    pub angle_unit: AngleUnit,
}

impl EvaluationOptions {
    /// Options with trigonometry in degrees
    pub fn degrees() -> Self {
        Self {
            angle_unit: AngleUnit::Degrees,
        }
    }
}

/// Evaluate expression text with default options
///
/// # Example
/// ```rust
/// use tally_formula::{evaluate, BigDecimal, FormulaError};
///
/// assert_eq!(evaluate("2-3-4").unwrap(), BigDecimal::from(-5));
/// assert_eq!(evaluate("5/0"), Err(FormulaError::DivideByZero));
/// ```
pub fn evaluate(text: &str) -> FormulaResult<BigDecimal> {
    evaluate_with(text, &EvaluationOptions::default())
}

/// Evaluate expression text
pub fn evaluate_with(text: &str, options: &EvaluationOptions) -> FormulaResult<BigDecimal> {
    let postfix = to_postfix(text)?;
    let value = evaluate_postfix(&postfix, options)?;
    debug!(expression = text, result = %value, "evaluated expression");
    Ok(value)
}

/// Evaluate a postfix queue
///
/// The queue must reduce to exactly one value; anything else is a syntax error.
pub fn evaluate_postfix(tokens: &[Token], options: &EvaluationOptions) -> FormulaResult<BigDecimal> {
    let mut stack: Vec<BigDecimal> = Vec::with_capacity(tokens.len());
    let mut queue = tokens.iter().peekable();

    while let Some(token) = queue.next() {
        trace!(token = %token, depth = stack.len(), "postfix step");

        match token {
            Token::Number(literal) => {
                let mut value = parse_decimal(literal)?;
                if queue
                    .next_if(|next| matches!(next, Token::Operator(Operator::Negate)))
                    .is_some()
                {
                    value = number::neg(&value);
                }
                stack.push(value);
            }
            Token::Operator(Operator::Negate) => {
                let top = stack
                    .last_mut()
                    .ok_or_else(|| FormulaError::syntax("unary minus without an operand"))?;
                *top = number::neg(top);
            }
            Token::Operator(op) => {
                let (first, second) = match (stack.pop(), stack.pop()) {
                    (Some(second), Some(first)) => (first, second),
                    _ => {
                        return Err(FormulaError::syntax(format!(
                            "operator '{}' needs two operands",
                            op.symbol()
                        )))
                    }
                };
                stack.push(apply_operator(*op, &first, &second)?);
            }
            Token::Function(function) => {
                let operand = stack.pop().ok_or_else(|| {
                    FormulaError::syntax(format!("function '{}' needs an operand", function.name()))
                })?;
                stack.push(apply_function(*function, &operand, options)?);
            }
        }
    }

    match (stack.pop(), stack.is_empty()) {
        (Some(value), true) => Ok(value),
        (None, _) => Err(FormulaError::syntax("expression has no value")),
        (Some(_), false) => Err(FormulaError::syntax(format!(
            "expression leaves {} values",
            stack.len() + 1
        ))),
    }
}

fn apply_operator(op: Operator, first: &BigDecimal, second: &BigDecimal) -> FormulaResult<BigDecimal> {
    let value = match op {
        Operator::Exponent => number::scale_by_power_of_ten(first, second)?,
        Operator::Power => number::pow(first, second)?,
        Operator::Multiply => number::mul(first, second),
        Operator::Divide => number::div(first, second)?,
        Operator::Remainder => number::rem(first, second)?,
        Operator::Add => number::add(first, second),
        Operator::Subtract => number::sub(first, second),
        Operator::OpenParen => return Err(FormulaError::syntax("unmatched opening bracket")),
        Operator::Negate => return Err(FormulaError::syntax("unary minus used as binary operator")),
    };
    Ok(value)
}

fn apply_function(
    function: Function,
    operand: &BigDecimal,
    options: &EvaluationOptions,
) -> FormulaResult<BigDecimal> {
    let unit = options.angle_unit;
    let value = match function {
        Function::Sqrt => number::sqrt(operand)?,
        Function::Abs => number::abs(operand),
        Function::Sin => number::sin(operand, unit)?,
        Function::Cos => number::cos(operand, unit)?,
        Function::Tan => number::tan(operand, unit)?,
        Function::Arcsin => number::asin(operand, unit)?,
        Function::Arccos => number::acos(operand, unit)?,
        Function::Arctan => number::atan(operand, unit)?,
        Function::Factorial => factorial_of(operand)?,
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tally_core::number::to_f64;

    fn eval(text: &str) -> BigDecimal {
        evaluate(text).unwrap()
    }

    fn dec(text: &str) -> BigDecimal {
        parse_decimal(text).unwrap()
    }

    fn approx(text: &str, options: &EvaluationOptions) -> f64 {
        to_f64(&evaluate_with(text, options).unwrap()).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(eval("1+2*3"), dec("7"));
        assert_eq!(eval("(1+2)*3"), dec("9"));
        assert_eq!(eval("2*3+4"), dec("10"));
        assert_eq!(eval("1-2*3+4"), dec("-9"));
        assert_eq!(eval("7%3"), dec("1"));
        assert_eq!(eval("0.1+0.2"), dec("0.3"));
        assert_eq!(eval("1/3"), dec("0.3333333333333333333333333333333333"));
    }

    #[test]
    fn test_associativity() {
        assert_eq!(eval("2^3^2"), dec("512"));
        assert_eq!(eval("2-3-4"), dec("-5"));
        assert_eq!(eval("100/10/5"), dec("2"));
    }

    #[test]
    fn test_parenthesized_group() {
        assert_eq!(eval("(1+2)"), dec("3"));
        assert_eq!(eval("((2))"), dec("2"));
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(eval("2(3+4)"), dec("14"));
        assert_eq!(eval("2(3+4)"), eval("2*(3+4)"));
        assert_eq!(eval("(1+1)(2+2)"), dec("8"));
    }

    #[test]
    fn test_unary_minus() {
        assert_eq!(eval("-3^2"), dec("-9"));
        assert_eq!(eval("3-(-4)"), dec("7"));
        assert_eq!(eval("-3"), dec("-3"));
        assert_eq!(eval("--3"), dec("3"));
        assert_eq!(eval("-(2+3)"), dec("-5"));
        assert_eq!(eval("2*-3"), dec("-6"));
        assert_eq!(eval("2^-3"), dec("0.125"));
        assert_eq!(eval("-2+3"), dec("1"));
    }

    #[test]
    fn test_scientific_notation() {
        assert_eq!(eval("3e2"), dec("300"));
        assert_eq!(eval("1.5e-3"), dec("0.0015"));
        assert_eq!(eval("2*3e2"), dec("600"));
    }

    #[test]
    fn test_factorial() {
        assert_eq!(eval("5!"), dec("120"));
        assert_eq!(eval("0!"), dec("1"));
        assert_eq!(eval("(2+1)!"), dec("6"));
        assert_eq!(eval("-3!"), dec("-6"));

        let continuous = approx("2.5!", &EvaluationOptions::default());
        assert!((continuous - 3.323_350_970_447_842_6).abs() < 1e-12);
    }

    #[test]
    fn test_functions() {
        assert_eq!(eval("sqrt(16)"), dec("4"));
        assert_eq!(eval("abs(-2.5)"), dec("2.5"));
        assert_eq!(eval("sqrt(4)+1"), dec("3"));
        assert_eq!(eval("sin(0)"), dec("0"));
        assert_eq!(eval("cos(0)"), dec("1"));
    }

    #[test]
    fn test_angle_units() {
        let degrees = EvaluationOptions::degrees();
        assert!((approx("sin(30)", &degrees) - 0.5).abs() < 1e-12);
        assert!((approx("arccos(0)", &degrees) - 90.0).abs() < 1e-9);
        assert!((approx("arctan(1)", &EvaluationOptions::default()) - 0.785_398_163_397_448_3).abs() < 1e-12);
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(evaluate("5/0"), Err(FormulaError::DivideByZero));
        assert_eq!(evaluate("5%0"), Err(FormulaError::DivideByZero));
        assert_eq!(evaluate("1/(2-2)"), Err(FormulaError::DivideByZero));
    }

    #[test]
    fn test_numeric_domain() {
        assert!(matches!(evaluate("sqrt(-1)"), Err(FormulaError::NumericDomain(_))));
        assert!(matches!(evaluate("arcsin(2)"), Err(FormulaError::NumericDomain(_))));
        assert!(matches!(evaluate("(-3)!"), Err(FormulaError::NumericDomain(_))));
    }

    #[test]
    fn test_syntax_errors() {
        for text in ["", "1+", "*2", "1.2.3", "(1)2", "e", "()", "sqrt"] {
            assert!(
                matches!(evaluate(text), Err(FormulaError::Syntax(_))),
                "{text:?} should be a syntax error"
            );
        }
    }

    #[test]
    fn test_postfix_from_tokens() {
        let tokens = vec![
            Token::number("4"),
            Token::number("6"),
            Operator::Negate.into(),
            Operator::Add.into(),
            Operator::Negate.into(),
        ];
        let value = evaluate_postfix(&tokens, &EvaluationOptions::default()).unwrap();
        assert_eq!(value, dec("2"));

        let dangling = vec![Token::Operator(Operator::Negate)];
        assert!(matches!(
            evaluate_postfix(&dangling, &EvaluationOptions::default()),
            Err(FormulaError::Syntax(_))
        ));
    }
}
