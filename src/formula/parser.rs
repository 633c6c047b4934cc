//! Pratt parser for formula expressions
//!
//! Binary operators are driven by a single precedence table; unary operators
//! and parenthesised groups are handled in the prefix position. Anything not
//! covered by the grammar is rejected here, before evaluation.

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::eval::Value;
use super::token::{tokenize, Spanned, Token};
use crate::error::FormulaError;

/// Deepest nesting of groups and unary operators accepted
pub const MAX_DEPTH: usize = 64;

/// Most values and operators a formula may contain. Operator chains build
/// trees as tall as they are long, so this also bounds evaluation depth.
pub const MAX_NODES: usize = 256;

/// Operator precedence levels (higher = tighter binding)
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Or = 1,
    And = 2,
    Equality = 3,
    Comparison = 4,
    Additive = 5,
    Multiplicative = 6,
    Unary = 7,
}

impl Precedence {
    /// Next higher level, used for the right operand of left-associative
    /// operators
    const fn next_level(self) -> Self {
        match self {
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Additive,
            Precedence::Additive => Precedence::Multiplicative,
            Precedence::Multiplicative | Precedence::Unary => Precedence::Unary,
        }
    }
}

fn binary_operator(token: &Token) -> Option<(BinaryOp, Precedence)> {
    let entry = match token {
        Token::Plus => (BinaryOp::Add, Precedence::Additive),
        Token::Minus => (BinaryOp::Sub, Precedence::Additive),
        Token::Star => (BinaryOp::Mul, Precedence::Multiplicative),
        Token::Slash => (BinaryOp::Div, Precedence::Multiplicative),
        Token::Percent => (BinaryOp::Rem, Precedence::Multiplicative),
        Token::EqEq => (BinaryOp::Eq, Precedence::Equality),
        Token::NotEq => (BinaryOp::NotEq, Precedence::Equality),
        Token::Lt => (BinaryOp::Lt, Precedence::Comparison),
        Token::Le => (BinaryOp::Le, Precedence::Comparison),
        Token::Gt => (BinaryOp::Gt, Precedence::Comparison),
        Token::Ge => (BinaryOp::Ge, Precedence::Comparison),
        Token::AndAnd => (BinaryOp::And, Precedence::And),
        Token::OrOr => (BinaryOp::Or, Precedence::Or),
        _ => return None,
    };
    Some(entry)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
    nodes: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Spanned> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn enter(&mut self) -> Result<(), FormulaError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(FormulaError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Count one more node of the tree being built
    fn grow(&mut self) -> Result<(), FormulaError> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(FormulaError::TooLong { limit: MAX_NODES });
        }
        Ok(())
    }

    fn parse_expression(&mut self, min_precedence: Precedence) -> Result<Expr, FormulaError> {
        self.enter()?;
        let mut left = self.parse_prefix()?;

        while let Some(spanned) = self.peek() {
            let (op, precedence) = match binary_operator(&spanned.token) {
                Some((op, prec)) if prec >= min_precedence => (op, prec),
                _ => break,
            };
            self.advance();
            self.grow()?;
            let right = self.parse_expression(precedence.next_level())?;
            left = Expr::binary(op, left, right);
        }

        self.leave();
        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expr, FormulaError> {
        let op = match self.peek().map(|s| &s.token) {
            Some(Token::Minus) => UnaryOp::Neg,
            Some(Token::Plus) => UnaryOp::Plus,
            Some(Token::Bang) => UnaryOp::Not,
            _ => return self.parse_primary(),
        };
        self.advance();
        self.grow()?;
        self.enter()?;
        let operand = self.parse_prefix()?;
        self.leave();
        Ok(Expr::unary(op, operand))
    }

    fn parse_primary(&mut self) -> Result<Expr, FormulaError> {
        let Some(Spanned { token, position }) = self.advance() else {
            return Err(FormulaError::UnexpectedEnd {
                expected: "a value",
            });
        };
        self.grow()?;

        match token {
            Token::Number(n) => Ok(Expr::Literal(Value::Number(n))),
            Token::Str(s) => Ok(Expr::Literal(Value::Text(s))),
            Token::Bool(b) => Ok(Expr::Literal(Value::Bool(b))),
            Token::Reference(name) => Ok(Expr::Reference(name)),
            Token::LParen => {
                let inner = self.parse_expression(Precedence::Or)?;
                match self.advance() {
                    Some(Spanned {
                        token: Token::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(FormulaError::UnexpectedToken {
                        found: other.token.to_string(),
                        expected: "')'",
                        position: other.position,
                    }),
                    None => Err(FormulaError::UnexpectedEnd { expected: "')'" }),
                }
            }
            other => Err(FormulaError::UnexpectedToken {
                found: other.to_string(),
                expected: "a value",
                position,
            }),
        }
    }
}

/// Parse `source` into an expression tree
pub fn parse(source: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        nodes: 0,
    };

    let expr = parser.parse_expression(Precedence::Or)?;

    if let Some(trailing) = parser.peek() {
        return Err(FormulaError::UnexpectedToken {
            found: trailing.token.to_string(),
            expected: "an operator or the end of the formula",
            position: trailing.position,
        });
    }

    Ok(expr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn num(n: f64) -> Expr {
        Expr::Literal(Value::Number(n))
    }

    fn var(name: &str) -> Expr {
        Expr::Reference(name.to_string())
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(Precedence::Unary > Precedence::Multiplicative);
        assert!(Precedence::Additive > Precedence::Comparison);
        assert!(Precedence::And > Precedence::Or);
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        assert_eq!(
            parse("1 + 2 * 3").unwrap(),
            Expr::binary(
                BinaryOp::Add,
                num(1.0),
                Expr::binary(BinaryOp::Mul, num(2.0), num(3.0))
            )
        );
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse("10 - 4 - 3").unwrap(),
            Expr::binary(
                BinaryOp::Sub,
                Expr::binary(BinaryOp::Sub, num(10.0), num(4.0)),
                num(3.0)
            )
        );
    }

    #[test]
    fn test_groups_and_unary() {
        assert_eq!(
            parse("-(${a} + 1)").unwrap(),
            Expr::unary(
                UnaryOp::Neg,
                Expr::binary(BinaryOp::Add, var("a"), num(1.0))
            )
        );
    }

    #[test]
    fn test_logical_and_comparison() {
        assert_eq!(
            parse("a > 1 && b <= 2 || !c").unwrap(),
            Expr::binary(
                BinaryOp::Or,
                Expr::binary(
                    BinaryOp::And,
                    Expr::binary(BinaryOp::Gt, var("a"), num(1.0)),
                    Expr::binary(BinaryOp::Le, var("b"), num(2.0)),
                ),
                Expr::unary(UnaryOp::Not, var("c")),
            )
        );
    }

    #[test]
    fn test_references_are_collected_in_order() {
        let expr = parse("${a} * (${b} + ${a})").unwrap();
        assert_eq!(expr.references(), vec!["a", "b", "a"]);
    }

    #[test]
    fn test_trailing_operator_is_rejected() {
        assert_eq!(
            parse("${A}+"),
            Err(FormulaError::UnexpectedEnd {
                expected: "a value"
            })
        );
    }

    #[test]
    fn test_trailing_tokens_are_rejected() {
        assert!(matches!(
            parse("1 2"),
            Err(FormulaError::UnexpectedToken { position: 2, .. })
        ));
    }

    #[test]
    fn test_calls_are_not_part_of_the_grammar() {
        assert!(parse("alert(1)").is_err());
        assert!(parse("Math.max(a, b)").is_err());
    }

    #[test]
    fn test_unclosed_group() {
        assert_eq!(
            parse("(1 + 2"),
            Err(FormulaError::UnexpectedEnd { expected: "')'" })
        );
    }

    #[test]
    fn test_empty_formula() {
        assert!(matches!(parse("   "), Err(FormulaError::UnexpectedEnd { .. })));
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(parse(&deep), Err(FormulaError::TooDeep { limit: MAX_DEPTH }));
        let negations = format!("{}1", "-".repeat(MAX_DEPTH * 2));
        assert_eq!(
            parse(&negations),
            Err(FormulaError::TooDeep { limit: MAX_DEPTH })
        );
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let chain = vec!["${A}"; 10_000].join(" + ");
        assert_eq!(parse(&chain), Err(FormulaError::TooLong { limit: MAX_NODES }));
    }

    #[test]
    fn test_chain_within_node_limit() {
        // 100 values and 99 operators
        let chain = vec!["1"; 100].join(" + ");
        assert_eq!(parse(&chain).unwrap().references().len(), 0);
    }
}
