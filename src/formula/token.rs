//! Tokenizer for formula expressions

use crate::error::FormulaError;
use std::fmt;

/// A lexical token of the formula language
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Str(String),
    Bool(bool),
    /// Field reference, either `${id}` or a bare identifier
    Reference(String),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    LParen,
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {n}"),
            Token::Str(s) => write!(f, "string '{s}'"),
            Token::Bool(b) => write!(f, "'{b}'"),
            Token::Reference(name) => write!(f, "reference '{name}'"),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::Percent => f.write_str("'%'"),
            Token::Bang => f.write_str("'!'"),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::Lt => f.write_str("'<'"),
            Token::Le => f.write_str("'<='"),
            Token::Gt => f.write_str("'>'"),
            Token::Ge => f.write_str("'>='"),
            Token::AndAnd => f.write_str("'&&'"),
            Token::OrOr => f.write_str("'||'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
        }
    }
}

/// Token with its character offset in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub position: usize,
}

/// Split `source` into tokens
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, FormulaError> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let start = pos;

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let token = match c {
            '$' if chars.get(pos + 1) == Some(&'{') => {
                let close = chars[pos + 2..]
                    .iter()
                    .position(|&ch| ch == '}')
                    .ok_or(FormulaError::Unterminated {
                        what: "reference",
                        position: start,
                    })?;
                let name: String = chars[pos + 2..pos + 2 + close].iter().collect();
                pos += close + 3;
                Token::Reference(name.trim().to_string())
            }
            c if c.is_ascii_digit() || (c == '.' && next_is_digit(&chars, pos)) => {
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                let literal: String = chars[start..pos].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| FormulaError::InvalidNumber { literal })?;
                Token::Number(value)
            }
            c if is_ident_start(c) => {
                while pos < chars.len() && is_ident_continue(chars[pos]) {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                match word.as_str() {
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    _ => Token::Reference(word),
                }
            }
            '"' | '\'' => {
                let (text, next) = read_string(&chars, pos)?;
                pos = next;
                Token::Str(text)
            }
            _ => {
                let (token, width) = read_operator(&chars, pos)?;
                pos += width;
                token
            }
        };

        tokens.push(Spanned {
            token,
            position: start,
        });
    }

    Ok(tokens)
}

fn next_is_digit(chars: &[char], pos: usize) -> bool {
    chars.get(pos + 1).is_some_and(|c| c.is_ascii_digit())
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Read a quoted string starting at `start`; returns the text and the
/// position after the closing quote
fn read_string(chars: &[char], start: usize) -> Result<(String, usize), FormulaError> {
    let quote = chars[start];
    let mut text = String::new();
    let mut pos = start + 1;

    while pos < chars.len() {
        match chars[pos] {
            '\\' => {
                let escaped = chars.get(pos + 1).ok_or(FormulaError::Unterminated {
                    what: "string",
                    position: start,
                })?;
                text.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    other => *other,
                });
                pos += 2;
            }
            c if c == quote => return Ok((text, pos + 1)),
            c => {
                text.push(c);
                pos += 1;
            }
        }
    }

    Err(FormulaError::Unterminated {
        what: "string",
        position: start,
    })
}

fn read_operator(chars: &[char], pos: usize) -> Result<(Token, usize), FormulaError> {
    let c = chars[pos];
    let next = chars.get(pos + 1).copied();
    let third = chars.get(pos + 2).copied();

    let op = match (c, next) {
        ('=', Some('=')) if third == Some('=') => (Token::EqEq, 3),
        ('=', Some('=')) => (Token::EqEq, 2),
        ('!', Some('=')) if third == Some('=') => (Token::NotEq, 3),
        ('!', Some('=')) => (Token::NotEq, 2),
        ('<', Some('=')) => (Token::Le, 2),
        ('>', Some('=')) => (Token::Ge, 2),
        ('&', Some('&')) => (Token::AndAnd, 2),
        ('|', Some('|')) => (Token::OrOr, 2),
        ('!', _) => (Token::Bang, 1),
        ('<', _) => (Token::Lt, 1),
        ('>', _) => (Token::Gt, 1),
        ('+', _) => (Token::Plus, 1),
        ('-', _) => (Token::Minus, 1),
        ('*', _) => (Token::Star, 1),
        ('/', _) => (Token::Slash, 1),
        ('%', _) => (Token::Percent, 1),
        ('(', _) => (Token::LParen, 1),
        (')', _) => (Token::RParen, 1),
        _ => return Err(FormulaError::UnexpectedChar { ch: c, position: pos }),
    };
    Ok(op)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_template_references() {
        assert_eq!(
            kinds("${a}+${field-1 }"),
            vec![
                Token::Reference("a".into()),
                Token::Plus,
                Token::Reference("field-1".into()),
            ]
        );
    }

    #[test]
    fn test_bare_identifiers_and_booleans() {
        assert_eq!(
            kinds("price * qty || false"),
            vec![
                Token::Reference("price".into()),
                Token::Star,
                Token::Reference("qty".into()),
                Token::OrOr,
                Token::Bool(false),
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("3.5 .25 10"), vec![
            Token::Number(3.5),
            Token::Number(0.25),
            Token::Number(10.0),
        ]);
        assert_eq!(
            tokenize("1.2.3"),
            Err(FormulaError::InvalidNumber {
                literal: "1.2.3".into()
            })
        );
    }

    #[test]
    fn test_strings_with_escapes() {
        assert_eq!(
            kinds(r#"'it\'s' "two""#),
            vec![Token::Str("it's".into()), Token::Str("two".into())]
        );
    }

    #[test]
    fn test_comparison_operators() {
        assert_eq!(
            kinds("== === != !== <= >= < > !"),
            vec![
                Token::EqEq,
                Token::EqEq,
                Token::NotEq,
                Token::NotEq,
                Token::Le,
                Token::Ge,
                Token::Lt,
                Token::Gt,
                Token::Bang,
            ]
        );
    }

    #[test]
    fn test_rejects_unknown_characters() {
        assert_eq!(
            tokenize("a = 1"),
            Err(FormulaError::UnexpectedChar { ch: '=', position: 2 })
        );
        assert!(matches!(
            tokenize("a; b"),
            Err(FormulaError::UnexpectedChar { ch: ';', .. })
        ));
    }

    #[test]
    fn test_unterminated_input() {
        assert!(matches!(
            tokenize("${a"),
            Err(FormulaError::Unterminated { what: "reference", .. })
        ));
        assert!(matches!(
            tokenize("'abc"),
            Err(FormulaError::Unterminated { what: "string", .. })
        ));
    }
}
