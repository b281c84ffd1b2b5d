//! Infix to postfix conversion
//!
//! A single-pass shunting-yard converter with a few extensions:
//!
//! - `e` outside a function name is the scientific-notation operator (`3e2`);
//!   once a name has started it is just another letter
//! - `-` where an operand is expected becomes the unary marker `#`
//! - `(` right after a complete operand implies a multiplication (`2(3+4)`)
//! - `!` is a postfix function and goes straight to the output

use crate::error::{FormulaError, FormulaResult};
use crate::token::{postfix_string, Function, Operator, Token};
use tracing::debug;

/// Convert infix expression text into a postfix token queue
///
/// Whitespace is ignored everywhere, so `1 2` reads as `12`.
///
/// # Example
/// ```rust
/// use tally_formula::{postfix_string, to_postfix};
///
/// let postfix = to_postfix("2^3^2").unwrap();
/// assert_eq!(postfix_string(&postfix), "2 3 2 ^ ^");
///
/// let postfix = to_postfix("-3^2").unwrap();
/// assert_eq!(postfix_string(&postfix), "3 2 ^ #");
/// ```
pub fn to_postfix(text: &str) -> FormulaResult<Vec<Token>> {
    let chars: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.is_empty() {
        return Err(FormulaError::syntax("empty expression"));
    }

    let output = PostfixConverter::new(chars).convert()?;
    debug!(expression = text, postfix = %postfix_string(&output), "converted to postfix");
    Ok(output)
}

/// Entry on the working stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Operator(Operator),
    Function(Function),
}

impl Pending {
    fn into_token(self) -> Token {
        match self {
            Pending::Operator(op) => Token::Operator(op),
            Pending::Function(function) => Token::Function(function),
        }
    }
}

struct PostfixConverter {
    chars: Vec<char>,
    stack: Vec<Pending>,
    output: Vec<Token>,
    function_start: Option<usize>,
    number_start: Option<usize>,
    /// True at the start, after `(`, after a function name and after any operator
    expect_operand: bool,
}

impl PostfixConverter {
    fn new(chars: Vec<char>) -> Self {
        Self {
            chars,
            stack: Vec::new(),
            output: Vec::new(),
            function_start: None,
            number_start: None,
            expect_operand: true,
        }
    }

    fn convert(mut self) -> FormulaResult<Vec<Token>> {
        // one extra step past the end closes any pending name or number
        for index in 0..=self.chars.len() {
            let c = self.chars.get(index).copied();

            let in_name = c.map_or(false, |c| {
                c.is_ascii_alphabetic() && (c != 'e' || self.function_start.is_some())
            });
            let in_number = c.map_or(false, |c| c.is_ascii_digit() || c == '.');

            if !in_name {
                self.end_function(index)?;
            }
            if !in_number {
                self.end_number(index)?;
            }

            let Some(c) = c else { break };
            if in_name {
                self.function_start.get_or_insert(index);
                continue;
            }
            if in_number {
                self.number_start.get_or_insert(index);
                continue;
            }

            match c {
                '!' => {
                    self.output.push(Token::Function(Function::Factorial));
                    self.expect_operand = false;
                }
                ')' => self.close_paren()?,
                _ => {
                    let op = Operator::from_char(c).ok_or_else(|| {
                        FormulaError::syntax(format!("unexpected character '{c}' at {index}"))
                    })?;
                    self.operator(op);
                }
            }
        }

        self.flush()
    }

    fn end_function(&mut self, index: usize) -> FormulaResult<()> {
        let Some(start) = self.function_start.take() else {
            return Ok(());
        };
        let name: String = self.chars[start..index].iter().collect();
        let function = Function::from_name(&name)
            .ok_or_else(|| FormulaError::syntax(format!("unknown function '{name}'")))?;
        self.stack.push(Pending::Function(function));
        self.expect_operand = true;
        Ok(())
    }

    fn end_number(&mut self, index: usize) -> FormulaResult<()> {
        let Some(start) = self.number_start.take() else {
            return Ok(());
        };
        let literal: String = self.chars[start..index].iter().collect();
        if !literal.chars().any(|c| c.is_ascii_digit()) {
            return Err(FormulaError::syntax(format!(
                "decimal point without digits at {start}"
            )));
        }
        self.output.push(Token::Number(literal));
        self.expect_operand = false;
        Ok(())
    }

    fn operator(&mut self, op: Operator) {
        match op {
            Operator::Subtract if self.expect_operand => {
                // prefix marker: nothing to its left to pop, operand still expected
                self.stack.push(Pending::Operator(Operator::Negate));
            }
            Operator::OpenParen => {
                if !self.expect_operand {
                    self.stack_operator(Operator::Multiply);
                }
                self.stack.push(Pending::Operator(Operator::OpenParen));
                self.expect_operand = true;
            }
            _ => {
                self.stack_operator(op);
                self.expect_operand = true;
            }
        }
    }

    /// Stack `op`, first popping at most one operator it may not sit on
    ///
    /// Stacked functions bind tighter than any operator; all of them on top of
    /// the stack go to the output before the comparison.
    fn stack_operator(&mut self, op: Operator) {
        while let Some(&Pending::Function(function)) = self.stack.last() {
            self.output.push(Token::Function(function));
            self.stack.pop();
        }
        if let Some(&Pending::Operator(top)) = self.stack.last() {
            if !top.admits(op) {
                self.output.push(Token::Operator(top));
                self.stack.pop();
            }
        }
        self.stack.push(Pending::Operator(op));
    }

    fn close_paren(&mut self) -> FormulaResult<()> {
        loop {
            match self.stack.pop() {
                Some(Pending::Operator(Operator::OpenParen)) => break,
                Some(pending) => self.output.push(pending.into_token()),
                None => return Err(FormulaError::syntax("unmatched closing bracket")),
            }
        }
        self.expect_operand = false;
        Ok(())
    }

    fn flush(mut self) -> FormulaResult<Vec<Token>> {
        while let Some(pending) = self.stack.pop() {
            if pending == Pending::Operator(Operator::OpenParen) {
                return Err(FormulaError::syntax("unmatched opening bracket"));
            }
            self.output.push(pending.into_token());
        }
        Ok(self.output)
    }
}
