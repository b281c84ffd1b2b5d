//! Postfix token types

use std::fmt;

/// Operators, in precedence order: `( e ^ * / % + # -`
///
/// The order doubles as the tie-break rank inside the stacking rule, and every
/// three consecutive operators form one precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    /// `(`, only ever lives on the working stack
    OpenParen,
    /// `e`, scientific notation: `3e2` is 3 × 10²
    Exponent,
    /// `^`
    Power,
    /// `*`
    Multiply,
    /// `/`
    Divide,
    /// `%`
    Remainder,
    /// `+`
    Add,
    /// `#`, the internal unary minus marker
    Negate,
    /// `-`
    Subtract,
}

impl Operator {
    /// Parse an operator as it appears in user input (`#` never does)
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '(' => Operator::OpenParen,
            'e' => Operator::Exponent,
            '^' => Operator::Power,
            '*' => Operator::Multiply,
            '/' => Operator::Divide,
            '%' => Operator::Remainder,
            '+' => Operator::Add,
            '-' => Operator::Subtract,
            _ => return None,
        })
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::OpenParen => '(',
            Operator::Exponent => 'e',
            Operator::Power => '^',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Remainder => '%',
            Operator::Add => '+',
            Operator::Negate => '#',
            Operator::Subtract => '-',
        }
    }

    /// Precedence group: 1 binds tightest, 3 loosest
    pub fn group(self) -> u8 {
        (self as u8) / 3 + 1
    }

    /// Only the tightest group (`(`, `e`, `^`) chains to the right
    pub fn is_right_associative(self) -> bool {
        self.group() == 1
    }

    /// Whether `incoming` may be stacked on top of `self` without popping it first
    pub fn admits(self, incoming: Operator) -> bool {
        if self == Operator::OpenParen {
            return true;
        }
        if self.group() == incoming.group() {
            return self.is_right_associative();
        }
        self.group() > incoming.group()
    }
}

/// Functions applied to a single operand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sqrt,
    Abs,
    Sin,
    Cos,
    Tan,
    Arcsin,
    Arccos,
    Arctan,
    /// `!`, written after its operand
    Factorial,
}

impl Function {
    pub const ALL: [Function; 9] = [
        Function::Sqrt,
        Function::Abs,
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Arcsin,
        Function::Arccos,
        Function::Arctan,
        Function::Factorial,
    ];

    /// Look up a function by the name used in expressions
    pub fn from_name(name: &str) -> Option<Self> {
        Function::ALL.into_iter().find(|f| f.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::Sqrt => "sqrt",
            Function::Abs => "abs",
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Arcsin => "arcsin",
            Function::Arccos => "arccos",
            Function::Arctan => "arctan",
            Function::Factorial => "!",
        }
    }
}

/// One element of a postfix queue
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    /// Number literal, kept as written
    Number(String),
    Operator(Operator),
    Function(Function),
}

impl Token {
    pub fn number<S: Into<String>>(literal: S) -> Self {
        Token::Number(literal.into())
    }
}

impl From<Operator> for Token {
    fn from(op: Operator) -> Self {
        Token::Operator(op)
    }
}

impl From<Function> for Token {
    fn from(function: Function) -> Self {
        Token::Function(function)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(literal) => f.write_str(literal),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Function(function) => f.write_str(function.name()),
        }
    }
}

/// Render a postfix queue with single spaces between tokens
pub fn postfix_string(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(Token::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
