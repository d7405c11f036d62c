//! Lexer for query strings.
//!
//! Splits a query into operand references, numeric constants and operator
//! symbols. Operand names are borrowed from the input; nothing is copied
//! until the parser registers them.

use crate::ast::Operator;
use crate::error::{IniqError, IniqResult};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LexemeKind<'a> {
    /// `{namespace.name}` or `{name}`; the namespace is `""` when omitted
    Operand { namespace: &'a str, name: &'a str },
    Number(f64),
    Operator(Operator),
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lexeme<'a> {
    pub kind: LexemeKind<'a>,
    /// Byte offset of the first character
    pub start: usize,
}

pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn current_byte(&self) -> Option<u8> {
        self.input.as_bytes().get(self.position).copied()
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.position += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// 1-based character column of a byte offset
    pub fn column(&self, offset: usize) -> usize {
        column_of(self.input, offset)
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> IniqError {
        IniqError::syntax(self.column(offset), message)
    }

    fn read_number(&mut self) -> IniqResult<LexemeKind<'a>> {
        let start = self.position;
        let mut has_dot = false;

        while let Some(b) = self.current_byte() {
            if b.is_ascii_digit() {
                self.position += 1;
            } else if b == b'.' && !has_dot {
                has_dot = true;
                self.position += 1;
            } else {
                break;
            }
        }

        let text = &self.input[start..self.position];
        if text.ends_with('.') {
            return Err(self.error(start, format!("malformed number '{}'", text)));
        }

        text.parse::<f64>()
            .map(LexemeKind::Number)
            .map_err(|_| self.error(start, format!("malformed number '{}'", text)))
    }

    fn read_operand(&mut self) -> IniqResult<LexemeKind<'a>> {
        let open = self.position;
        self.position += 1; // skip '{'
        let start = self.position;
        let mut period: Option<usize> = None;

        loop {
            match self.current_byte() {
                Some(b'}') => break,
                Some(b'.') => {
                    if period.is_some() {
                        return Err(self.error(
                            self.position,
                            "more than one period in operand name",
                        ));
                    }
                    period = Some(self.position);
                    self.position += 1;
                }
                Some(b) if is_name_char(b) => self.position += 1,
                Some(_) => {
                    let ch = self.current_char().unwrap_or('?');
                    return Err(self.error(
                        self.position,
                        format!("illegal character '{}' in operand name", ch),
                    ));
                }
                None => {
                    return Err(self.error(open, "unterminated operand, expected '}'"));
                }
            }
        }

        let end = self.position;
        self.position += 1; // skip '}'

        match period {
            None if start == end => Err(self.error(open, "empty operand name")),
            None => Ok(LexemeKind::Operand {
                namespace: "",
                name: &self.input[start..end],
            }),
            Some(dot) if dot == start => {
                Err(self.error(open, "blank section part in operand name"))
            }
            Some(dot) if dot + 1 == end => {
                Err(self.error(open, "blank key part in operand name"))
            }
            Some(dot) => Ok(LexemeKind::Operand {
                namespace: &self.input[start..dot],
                name: &self.input[dot + 1..end],
            }),
        }
    }

    fn next_lexeme(&mut self) -> IniqResult<Lexeme<'a>> {
        self.skip_whitespace();
        let start = self.position;

        let kind = match self.current_char() {
            None => LexemeKind::Eof,
            Some('{') => self.read_operand()?,
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.read_number()?,
            Some(ch) => {
                let op = match ch {
                    '+' => Operator::Add,
                    '-' => Operator::Sub,
                    '*' => Operator::Mul,
                    '/' => Operator::Div,
                    '%' => Operator::Mod,
                    '^' => Operator::Pow,
                    '(' => Operator::LeftParen,
                    ')' => Operator::RightParen,
                    _ => {
                        return Err(
                            self.error(start, format!("illegal character '{}' in query", ch))
                        );
                    }
                };
                self.advance();
                LexemeKind::Operator(op)
            }
        };

        Ok(Lexeme { kind, start })
    }

    /// Tokenize the whole input. The last lexeme is always `Eof`.
    pub fn tokenize(&mut self) -> IniqResult<Vec<Lexeme<'a>>> {
        let mut lexemes = Vec::new();

        loop {
            let lexeme = self.next_lexeme()?;
            let done = lexeme.kind == LexemeKind::Eof;
            lexemes.push(lexeme);
            if done {
                break;
            }
        }

        Ok(lexemes)
    }
}

pub(crate) fn column_of(input: &str, offset: usize) -> usize {
    let offset = offset.min(input.len());
    input[..offset].chars().count() + 1
}
