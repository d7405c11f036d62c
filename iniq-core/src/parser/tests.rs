//! Unit tests for the query parser.

use super::*;
use crate::registry::OperandRef;

fn postfix(query: &str) -> String {
    parse(query).unwrap().postfix_string()
}

fn syntax_error(query: &str) -> (usize, String) {
    match parse(query) {
        Err(IniqError::Syntax { column, message }) => (column, message),
        other => panic!("expected syntax error for {:?}, got {:?}", query, other),
    }
}

#[test]
fn test_parse_single_operand() {
    let query = parse("{sec.key}").unwrap();
    assert_eq!(query.operands.len(), 1);
    assert_eq!(query.operands.get(0), Some(&OperandRef::new("sec", "key")));
    assert_eq!(query.program, vec![Token::Operand(0)]);
    assert_eq!(query.source, "{sec.key}");
}

#[test]
fn test_parse_global_operand() {
    let query = parse("{key}").unwrap();
    assert_eq!(query.operands.get(0), Some(&OperandRef::new("", "key")));
}

#[test]
fn test_operand_dedup() {
    let query = parse("{x}+{x}*{x}").unwrap();
    assert_eq!(query.operands.len(), 1);
    assert_eq!(
        query
            .program
            .iter()
            .filter(|t| **t == Token::Operand(0))
            .count(),
        3
    );
    assert_eq!(query.postfix_string(), "#0 #0 #0 * +");
}

#[test]
fn test_operand_indices_follow_first_occurrence() {
    let query = parse("{b} + {a} * {b} - {sec.a}").unwrap();
    let names: Vec<String> = query.operands.iter().map(|o| o.to_string()).collect();
    assert_eq!(names, vec!["b", "a", "sec.a"]);
    assert_eq!(query.postfix_string(), "#0 #1 #0 * + #2 -");
}

#[test]
fn test_precedence() {
    assert_eq!(postfix("{a}+{b}*{c}"), "#0 #1 #2 * +");
    assert_eq!(postfix("{a}*{b}+{c}"), "#0 #1 * #2 +");
    assert_eq!(postfix("{a}-{b}+{c}"), "#0 #1 - #2 +");
    assert_eq!(postfix("{a}%{b}^{c}"), "#0 #1 #2 ^ %");
    assert_eq!(postfix("{a}^{b}^{c}"), "#0 #1 #2 ^ ^");
}

#[test]
fn test_parentheses() {
    assert_eq!(postfix("({a}+{b})*{c}"), "#0 #1 + #2 *");
    assert_eq!(postfix("{a}*(({b}))"), "#0 #1 *");
    assert_eq!(postfix("({a}^{b})^{c}"), "#0 #1 ^ #2 ^");
}

#[test]
fn test_whitespace_is_ignored() {
    assert_eq!(postfix("  {a}\t+ (\n{b} )  "), postfix("{a}+({b})"));
}

#[test]
fn test_constants() {
    let query = parse("{price} * 1.5 + .25").unwrap();
    assert_eq!(query.operands.len(), 1);
    assert_eq!(
        query.program,
        vec![
            Token::Operand(0),
            Token::Constant(1.5),
            Token::Operator(Operator::Mul),
            Token::Constant(0.25),
            Token::Operator(Operator::Add),
        ]
    );
}

#[test]
fn test_implicit_multiplication_matches_explicit() {
    let implicit = parse("2{a}(3)").unwrap();
    let explicit = parse("2*{a}*(3)").unwrap();
    assert_eq!(implicit.program, explicit.program);
    assert_eq!(implicit.operands.len(), explicit.operands.len());
    assert_eq!(implicit.postfix_string(), "2 #0 * 3 *");
}

#[test]
fn test_implicit_multiplication_around_parentheses() {
    assert_eq!(postfix("{a}({b})"), "#0 #1 *");
    assert_eq!(postfix("({a}){b}"), "#0 #1 *");
    assert_eq!(postfix("({a})({b})"), "#0 #1 *");
    assert_eq!(postfix("({a})2"), "#0 2 *");
    assert_eq!(postfix("{a} ({b} + {c})"), "#0 #1 #2 + *");
}

#[test]
fn test_implicit_multiplication_binds_like_explicit() {
    assert_eq!(postfix("{a}+{b}({c})"), postfix("{a}+{b}*({c})"));
    assert_eq!(postfix("({a})({b})^{c}"), postfix("({a})*({b})^{c}"));
}

#[test]
fn test_infix_contains_implicit_operator() {
    let mut parser = Parser::new("{a}({b})").unwrap();
    let (infix, registry) = parser.parse_infix().unwrap();
    assert_eq!(registry.len(), 2);
    assert_eq!(
        infix,
        vec![
            Token::Operand(0),
            Token::Operator(Operator::Mul),
            Token::Operator(Operator::LeftParen),
            Token::Operand(1),
            Token::Operator(Operator::RightParen),
        ]
    );
}

#[test]
fn test_program_length_invariant() {
    let query = parse("({a} + 2) * {b} ^ {a} - 4 / {c}").unwrap();
    let operands = query
        .program
        .iter()
        .filter(|t| !matches!(t, Token::Operator(_)))
        .count();
    let operators = query.program.len() - operands;
    assert_eq!(operands, 6);
    assert_eq!(operators, 5);
    assert!(query
        .program
        .iter()
        .all(|t| !matches!(t, Token::Operator(op) if op.is_paren())));
}

// ============================================================================
// Syntax errors
// ============================================================================

#[test]
fn test_error_unbalanced_open() {
    let (column, message) = syntax_error("({a}+1");
    assert_eq!(message, "unbalanced parentheses");
    assert_eq!(column, 1);
}

#[test]
fn test_error_unbalanced_close() {
    let (column, message) = syntax_error("{a}+1)");
    assert_eq!(message, "unbalanced parentheses");
    assert_eq!(column, 6);
}

#[test]
fn test_error_adjacent_operands() {
    let (column, message) = syntax_error("{a}{b}");
    assert_eq!(message, "missing operator between two operands");
    assert_eq!(column, 4);

    let (_, message) = syntax_error("{a} {b}");
    assert_eq!(message, "missing operator between two operands");
}

#[test]
fn test_error_adjacent_numbers() {
    assert_eq!(syntax_error("1 2").1, "missing operator between two numbers");
    assert_eq!(
        syntax_error("{a} 2").1,
        "missing operator between operand and number"
    );
}

#[test]
fn test_error_adjacent_operators() {
    assert_eq!(
        syntax_error("{a}+*{b}").1,
        "missing operand between two operators"
    );
    assert_eq!(
        syntax_error("{a}--{b}").1,
        "missing operand between two operators"
    );
}

#[test]
fn test_error_operator_placement() {
    assert_eq!(syntax_error("+{a}").1, "missing operand before operator");
    assert_eq!(syntax_error("-1").1, "missing operand before operator");
    assert_eq!(syntax_error("{a}+").1, "missing operand after operator");
    assert_eq!(syntax_error("({a}+)").1, "missing operand before closing parenthesis");
    assert_eq!(syntax_error("(*{a})").1, "missing operand before operator");
}

#[test]
fn test_error_empty_parentheses() {
    assert_eq!(
        syntax_error("{a}()").1,
        "missing expression inside parentheses"
    );
}

#[test]
fn test_error_empty_query() {
    assert_eq!(syntax_error("").1, "empty query");
    assert_eq!(syntax_error("   ").1, "empty query");
}

#[test]
fn test_error_from_lexer() {
    assert!(syntax_error("{a.b.c}").1.contains("more than one period"));
    assert!(syntax_error("{a} # {b}").1.contains("illegal character '#'"));
}

#[test]
fn test_error_reports_position() {
    let err = parse("{a} + {b} {c}").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error at column 11: missing operator between two operands"
    );
}
