//! Infix to postfix conversion (shunting-yard).

use crate::ast::{Associativity, Operator, Token};

/// Whether `top`, sitting on the operator stack, must be emitted before
/// `current` is pushed.
fn pops_before(top: Operator, current: Operator) -> bool {
    match (top.precedence(), current.precedence()) {
        (Some(top_prec), Some(cur_prec)) => {
            top_prec > cur_prec
                || (top_prec == cur_prec && current.associativity() != Associativity::Right)
        }
        _ => false,
    }
}

/// Reorder a syntax-checked infix sequence into postfix order.
///
/// Parentheses are consumed; the output contains only operands, constants
/// and binary operators.
pub fn to_postfix(infix: &[Token]) -> Vec<Token> {
    let mut output = Vec::with_capacity(infix.len());
    let mut ops: Vec<Operator> = Vec::new();

    for token in infix {
        match *token {
            Token::Operand(_) | Token::Constant(_) => output.push(*token),
            Token::Operator(Operator::LeftParen) => ops.push(Operator::LeftParen),
            Token::Operator(Operator::RightParen) => {
                while let Some(top) = ops.pop() {
                    if top == Operator::LeftParen {
                        break;
                    }
                    output.push(Token::Operator(top));
                }
            }
            Token::Operator(op) => {
                while let Some(&top) = ops.last() {
                    if top == Operator::LeftParen || !pops_before(top, op) {
                        break;
                    }
                    ops.pop();
                    output.push(Token::Operator(top));
                }
                ops.push(op);
            }
        }
    }

    while let Some(op) = ops.pop() {
        if !op.is_paren() {
            output.push(Token::Operator(op));
        }
    }

    output
}
