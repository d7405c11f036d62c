use std::fmt;

use crate::registry::OperandRegistry;

/// Binary operators and parentheses of the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,        // +
    Sub,        // -
    Mul,        // *
    Div,        // /
    Mod,        // %
    Pow,        // ^
    LeftParen,  // (
    RightParen, // )
}

/// How operators of equal precedence group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    /// Fully associative (addition, subtraction); grouped left on ties
    Any,
    Left,
    Right,
    /// Parentheses
    NotApplicable,
}

impl Operator {
    /// Binding strength; greater binds tighter. Parentheses have none.
    pub fn precedence(self) -> Option<u8> {
        match self {
            Operator::Add | Operator::Sub => Some(1),
            Operator::Mul | Operator::Div | Operator::Mod => Some(2),
            Operator::Pow => Some(3),
            Operator::LeftParen | Operator::RightParen => None,
        }
    }

    pub fn associativity(self) -> Associativity {
        match self {
            Operator::Add | Operator::Sub => Associativity::Any,
            Operator::Mul | Operator::Div | Operator::Mod => Associativity::Left,
            Operator::Pow => Associativity::Right,
            Operator::LeftParen | Operator::RightParen => Associativity::NotApplicable,
        }
    }

    pub fn is_paren(self) -> bool {
        matches!(self, Operator::LeftParen | Operator::RightParen)
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Sub => '-',
            Operator::Mul => '*',
            Operator::Div => '/',
            Operator::Mod => '%',
            Operator::Pow => '^',
            Operator::LeftParen => '(',
            Operator::RightParen => ')',
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A program token, used for both the infix and the postfix form of a query
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Token {
    /// Index into the query's operand registry
    Operand(usize),
    /// Numeric literal written in the query
    Constant(f64),
    Operator(Operator),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Operand(idx) => write!(f, "#{}", idx),
            Token::Constant(n) => write!(f, "{}", crate::value::format_number(*n)),
            Token::Operator(op) => write!(f, "{}", op),
        }
    }
}

/// A query string compiled into an operand set and a postfix program.
///
/// The program never contains parentheses and every `Operand` index is valid
/// for `operands`.
#[derive(Debug, Clone)]
pub struct CompiledQuery {
    pub source: String,
    pub operands: OperandRegistry,
    pub program: Vec<Token>,
}

impl CompiledQuery {
    /// Space-separated rendering of the postfix program
    pub fn postfix_string(&self) -> String {
        join_tokens(&self.program)
    }
}

pub(crate) fn join_tokens(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
