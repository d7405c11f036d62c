//! Parser module for iniq queries.
//!
//! Validates a query in a single left-to-right pass over its lexemes,
//! registers every operand reference, inserts implicit multiplications and
//! hands the infix token sequence to the shunting-yard converter.

mod postfix;
#[cfg(test)]
mod tests;

pub use postfix::to_postfix;

use crate::ast::{join_tokens, CompiledQuery, Operator, Token};
use crate::error::{IniqError, IniqResult};
use crate::lexer::{column_of, Lexeme, LexemeKind, Lexer};
use crate::registry::OperandRegistry;

/// Class of a lexeme as far as adjacency rules are concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Begin,
    Operand,
    Constant,
    Operator,
    LeftParen,
    RightParen,
    End,
}

impl Class {
    fn of(kind: &LexemeKind<'_>) -> Self {
        match kind {
            LexemeKind::Operand { .. } => Class::Operand,
            LexemeKind::Number(_) => Class::Constant,
            LexemeKind::Operator(Operator::LeftParen) => Class::LeftParen,
            LexemeKind::Operator(Operator::RightParen) => Class::RightParen,
            LexemeKind::Operator(_) => Class::Operator,
            LexemeKind::Eof => Class::End,
        }
    }
}

/// What sits between two adjacent lexemes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Junction {
    Plain,
    ImplicitMultiply,
}

/// Check a pair of adjacent lexeme classes.
fn junction(prev: Class, cur: Class) -> Result<Junction, &'static str> {
    use Class::*;

    match (prev, cur) {
        (Operand | Constant, LeftParen) => Ok(Junction::ImplicitMultiply),
        (Constant, Operand) => Ok(Junction::ImplicitMultiply),
        (RightParen, Operand | Constant | LeftParen) => Ok(Junction::ImplicitMultiply),

        (Begin, End) => Err("empty query"),
        (Begin, Operator) => Err("missing operand before operator"),
        (Operand, Operand) => Err("missing operator between two operands"),
        (Operand, Constant) => Err("missing operator between operand and number"),
        (Constant, Constant) => Err("missing operator between two numbers"),
        (Operator, Operator) => Err("missing operand between two operators"),
        (Operator, RightParen) => Err("missing operand before closing parenthesis"),
        (Operator, End) => Err("missing operand after operator"),
        (LeftParen, Operator) => Err("missing operand before operator"),
        (LeftParen, RightParen) => Err("missing expression inside parentheses"),

        _ => Ok(Junction::Plain),
    }
}

/// Parser for iniq queries
pub struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Lexeme<'a>>,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Create a new parser from an input string
    pub fn new(input: &'a str) -> IniqResult<Self> {
        let mut lexer = Lexer::new(input);
        let tokens = lexer.tokenize()?;

        Ok(Self {
            input,
            tokens,
            position: 0,
        })
    }

    /// Get the current lexeme
    fn current_token(&self) -> Option<&Lexeme<'a>> {
        self.tokens.get(self.position)
    }

    /// Advance to the next lexeme
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn error_at(&self, offset: usize, message: impl Into<String>) -> IniqError {
        IniqError::syntax(column_of(self.input, offset), message)
    }

    /// Validate the query and produce its infix token sequence together with
    /// a fresh registry of the operands it references.
    pub fn parse_infix(&mut self) -> IniqResult<(Vec<Token>, OperandRegistry)> {
        let mut registry = OperandRegistry::new();
        let mut infix = Vec::new();
        let mut open_parens: Vec<usize> = Vec::new();
        let mut prev = Class::Begin;

        while let Some(lexeme) = self.current_token().copied() {
            let class = Class::of(&lexeme.kind);

            if class == Class::RightParen && open_parens.pop().is_none() {
                return Err(self.error_at(lexeme.start, "unbalanced parentheses"));
            }

            match junction(prev, class) {
                Ok(Junction::ImplicitMultiply) => infix.push(Token::Operator(Operator::Mul)),
                Ok(Junction::Plain) => {}
                Err(message) => return Err(self.error_at(lexeme.start, message)),
            }

            match lexeme.kind {
                LexemeKind::Operand { namespace, name } => {
                    infix.push(Token::Operand(registry.add(namespace, name)));
                }
                LexemeKind::Number(n) => infix.push(Token::Constant(n)),
                LexemeKind::Operator(op) => {
                    if op == Operator::LeftParen {
                        open_parens.push(lexeme.start);
                    }
                    infix.push(Token::Operator(op));
                }
                LexemeKind::Eof => {
                    if let Some(&open) = open_parens.last() {
                        return Err(self.error_at(open, "unbalanced parentheses"));
                    }
                    break;
                }
            }

            prev = class;
            self.advance();
        }

        Ok((infix, registry))
    }

    /// Parse the complete query into its compiled form
    pub fn parse(&mut self) -> IniqResult<CompiledQuery> {
        let (infix, operands) = self.parse_infix()?;
        let program = to_postfix(&infix);

        tracing::debug!(
            query = self.input,
            infix = %join_tokens(&infix),
            postfix = %join_tokens(&program),
            operands = operands.len(),
            "compiled query"
        );

        Ok(CompiledQuery {
            source: self.input.to_string(),
            operands,
            program,
        })
    }
}

/// Parse a query string
pub fn parse(input: &str) -> IniqResult<CompiledQuery> {
    let mut parser = Parser::new(input)?;
    parser.parse()
}
