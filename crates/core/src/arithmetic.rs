//! Arithmetic over resolved token values.
//!
//! A token value such as `{spacing.base} * 2` becomes `8 * 2` after
//! reference substitution and is evaluated here. The grammar is limited to
//! decimal literals (optionally with one CSS unit), `+ - * /`, unary minus
//! and parentheses:
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := factor (('*' | '/') factor)*
//! factor := '-' factor | '(' expr ')' | NUMBER UNIT?
//! ```
//!
//! Values are exact decimals. The result is rounded to four places with
//! banker's rounding and printed without trailing zeros.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Decimal places kept in an evaluated result.
pub const RESULT_SCALE: u32 = 4;

/// Deepest run of nested parentheses and unary minus accepted.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ArithmeticError {
    pub message: String,
}

impl ArithmeticError {
    fn new(message: impl Into<String>) -> Self {
        ArithmeticError {
            message: message.into(),
        }
    }
}

/// True when `text` contains an operator that triggers evaluation.
/// A bare `-` does not: negative numbers and hyphenated words are common
/// in plain values.
pub fn needs_evaluation(text: &str) -> bool {
    text.contains(['+', '*', '/'])
}

/// Evaluate `text` and format the result.
pub fn evaluate(text: &str) -> Result<String, ArithmeticError> {
    let tokens = lex(text)?;
    let mut parser = ExprParser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_expr()?;
    if parser.peek() != &Token::Eof {
        return Err(ArithmeticError::new(format!(
            "unexpected {} at offset {}",
            parser.peek(),
            parser.offset()
        )));
    }
    Ok(value.format())
}

// ── Lexer ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Decimal, Option<String>),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Number(n, Some(unit)) => write!(f, "'{}{}'", n, unit),
            Token::Number(n, None) => write!(f, "'{}'", n),
            Token::Plus => f.write_str("'+'"),
            Token::Minus => f.write_str("'-'"),
            Token::Star => f.write_str("'*'"),
            Token::Slash => f.write_str("'/'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::Eof => f.write_str("end of expression"),
        }
    }
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn lex(src: &str) -> Result<Vec<Spanned>, ArithmeticError> {
    let chars: Vec<char> = src.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0usize;

    while pos < chars.len() {
        let c = chars[pos];

        if c.is_whitespace() {
            pos += 1;
            continue;
        }

        let offset = pos;
        let simple = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = simple {
            tokens.push(Spanned { token, offset });
            pos += 1;
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                pos += 1;
            }
            let literal: String = chars[start..pos].iter().collect();
            let value = Decimal::from_str(&literal).map_err(|_| {
                ArithmeticError::new(format!("invalid number '{}' at offset {}", literal, start))
            })?;

            let unit_start = pos;
            if pos + 1 < chars.len()
                && matches!(chars[pos], 'e' | 'E')
                && (chars[pos + 1].is_ascii_digit() || matches!(chars[pos + 1], '+' | '-'))
            {
                return Err(ArithmeticError::new(format!(
                    "exponent notation is not supported at offset {}",
                    pos
                )));
            }
            while pos < chars.len() && (chars[pos].is_ascii_alphabetic() || chars[pos] == '%') {
                pos += 1;
            }
            let unit = if pos > unit_start {
                Some(chars[unit_start..pos].iter().collect::<String>())
            } else {
                None
            };

            tokens.push(Spanned {
                token: Token::Number(value, unit),
                offset,
            });
            continue;
        }

        return Err(ArithmeticError::new(format!(
            "unexpected character '{}' at offset {}",
            c, offset
        )));
    }

    tokens.push(Spanned {
        token: Token::Eof,
        offset: chars.len(),
    });
    Ok(tokens)
}

// ── Parser / evaluator ──────────────────────────────────────────────

/// A number with an optional unit. Units are carried, never converted.
#[derive(Debug, Clone, PartialEq)]
struct Quantity {
    value: Decimal,
    unit: Option<String>,
}

impl Quantity {
    fn format(&self) -> String {
        let rounded = self
            .value
            .round_dp_with_strategy(RESULT_SCALE, RoundingStrategy::MidpointNearestEven)
            .normalize();
        let rounded = if rounded.is_zero() {
            Decimal::ZERO
        } else {
            rounded
        };
        match &self.unit {
            Some(unit) => format!("{}{}", rounded, unit),
            None => rounded.to_string(),
        }
    }
}

fn merge_units(
    left: Option<String>,
    right: Option<String>,
) -> Result<Option<String>, ArithmeticError> {
    match (left, right) {
        (Some(l), Some(r)) if l != r => Err(ArithmeticError::new(format!(
            "mixed units '{}' and '{}'",
            l, r
        ))),
        (Some(l), _) => Ok(Some(l)),
        (None, r) => Ok(r),
    }
}

struct ExprParser {
    tokens: Vec<Spanned>,
    pos: usize,
    depth: usize,
}

impl ExprParser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].token
    }

    fn offset(&self) -> usize {
        self.tokens[self.pos.min(self.tokens.len() - 1)].offset
    }

    fn advance(&mut self) -> Token {
        let t = self.tokens[self.pos.min(self.tokens.len() - 1)].token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        t
    }

    fn err(&self, msg: &str) -> ArithmeticError {
        ArithmeticError::new(format!(
            "{}, got {} at offset {}",
            msg,
            self.peek(),
            self.offset()
        ))
    }

    fn parse_expr(&mut self) -> Result<Quantity, ArithmeticError> {
        let mut left = self.parse_term()?;
        loop {
            let op = self.peek().clone();
            if op != Token::Plus && op != Token::Minus {
                return Ok(left);
            }
            self.advance();
            let right = self.parse_term()?;
            let unit = merge_units(left.unit, right.unit)?;
            let value = if op == Token::Plus {
                left.value.checked_add(right.value)
            } else {
                left.value.checked_sub(right.value)
            }
            .ok_or_else(|| ArithmeticError::new("arithmetic overflow"))?;
            left = Quantity { value, unit };
        }
    }

    fn parse_term(&mut self) -> Result<Quantity, ArithmeticError> {
        let mut left = self.parse_factor()?;
        loop {
            let op = self.peek().clone();
            if op != Token::Star && op != Token::Slash {
                return Ok(left);
            }
            self.advance();
            let right = self.parse_factor()?;
            let unit = merge_units(left.unit, right.unit)?;
            let value = if op == Token::Star {
                left.value.checked_mul(right.value)
            } else {
                if right.value.is_zero() {
                    return Err(ArithmeticError::new("division by zero"));
                }
                left.value.checked_div(right.value)
            }
            .ok_or_else(|| ArithmeticError::new("arithmetic overflow"))?;
            left = Quantity { value, unit };
        }
    }

    fn parse_factor(&mut self) -> Result<Quantity, ArithmeticError> {
        if self.depth >= MAX_NESTING {
            return Err(ArithmeticError::new(format!(
                "expression nests deeper than {} levels",
                MAX_NESTING
            )));
        }
        self.depth += 1;
        let factor = self.parse_factor_inner();
        self.depth -= 1;
        factor
    }

    fn parse_factor_inner(&mut self) -> Result<Quantity, ArithmeticError> {
        match self.peek().clone() {
            Token::Minus => {
                self.advance();
                let inner = self.parse_factor()?;
                Ok(Quantity {
                    value: -inner.value,
                    unit: inner.unit,
                })
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr()?;
                if self.peek() != &Token::RParen {
                    return Err(self.err("expected ')'"));
                }
                self.advance();
                Ok(inner)
            }
            Token::Number(value, unit) => {
                self.advance();
                Ok(Quantity { value, unit })
            }
            _ => Err(self.err("expected a number")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(s: &str) -> String {
        evaluate(s).unwrap_or_else(|e| panic!("'{}' failed: {}", s, e))
    }

    #[test]
    fn multiplication_of_integers() {
        assert_eq!(eval("8*2"), "16");
        assert_eq!(eval("8 * 2"), "16");
    }

    #[test]
    fn precedence_and_associativity() {
        assert_eq!(eval("2+3*4"), "14");
        assert_eq!(eval("(2+3)*4"), "20");
        assert_eq!(eval("20/2/5"), "2");
        assert_eq!(eval("10-2-3"), "5");
        assert_eq!(eval("1+-2"), "-1");
        assert_eq!(eval("-(4/2)"), "-2");
    }

    #[test]
    fn results_are_rounded_to_four_places() {
        assert_eq!(eval("10/3"), "3.3333");
        assert_eq!(eval("1.5*1.5"), "2.25");
        assert_eq!(eval("16*1.25"), "20");
        assert_eq!(eval("2/3"), "0.6667");
        assert_eq!(eval("0*-1"), "0");
    }

    #[test]
    fn units_are_carried_through() {
        assert_eq!(eval("8px*2"), "16px");
        assert_eq!(eval("1rem + 0.5rem"), "1.5rem");
        assert_eq!(eval("50% / 2"), "25%");
    }

    #[test]
    fn mixed_units_fail() {
        let e = evaluate("1rem + 2px").unwrap_err();
        assert!(e.message.contains("mixed units"), "{}", e);
    }

    #[test]
    fn malformed_expressions_fail() {
        assert!(evaluate("8*").is_err());
        assert!(evaluate("*8").is_err());
        assert!(evaluate("(1+2").is_err());
        assert!(evaluate("1+2)").is_err());
        assert!(evaluate("1..2*3").is_err());
        assert!(evaluate("alert(1)+1").is_err());
        assert!(evaluate("Roboto/Arial").is_err());
        assert!(evaluate("").is_err());
    }

    #[test]
    fn division_by_zero_fails() {
        let e = evaluate("4/0").unwrap_err();
        assert_eq!(e.message, "division by zero");
    }

    #[test]
    fn deep_nesting_fails_cleanly() {
        let parens = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let e = evaluate(&parens).unwrap_err();
        assert!(e.message.contains("nests deeper"), "{}", e);

        let minus = format!("{}1*2", "-".repeat(10_000));
        assert!(evaluate(&minus).is_err());

        let ok = format!("{}1{}*2", "(".repeat(100), ")".repeat(100));
        assert_eq!(eval(&ok), "2");
    }

    #[test]
    fn exponent_notation_is_rejected() {
        let e = evaluate("1e+21").unwrap_err();
        assert!(e.message.contains("exponent"), "{}", e);
        assert!(evaluate("2e3*2").is_err());
        assert_eq!(eval("2em*2"), "4em");
    }

    #[test]
    fn only_plus_star_slash_trigger_evaluation() {
        assert!(needs_evaluation("8*2"));
        assert!(needs_evaluation("a/b"));
        assert!(needs_evaluation("1+1"));
        assert!(!needs_evaluation("-2"));
        assert!(!needs_evaluation("sans-serif"));
    }
}
