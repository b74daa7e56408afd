//! Query parser (component C7): text → normalized DNF expression tree
//! (spec §4.7).
//!
//! ```text
//! query    := expr
//! expr     := term ( ('|' | '&' | ' ') term )*
//! term     := '!' term | atom
//! atom     := word | phrase | '(' expr ')'
//! phrase   := '"' word (ws word)* '"'
//! word     := [A-Za-z0-9*]+
//! ```
//! Precedence, high to low: grouping, `!`, `&`, `|`. Adjacent words
//! separated by whitespace are implicit `&`.

use crate::error::{Error, MResult};
use crate::expression::Expression;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Phrase(Vec<String>),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

/// Parses `query` into a DNF-normalized expression tree (spec §4.7 step
/// 5). A blank or syntactically invalid query returns [`Error::InvalidQuery`];
/// the public `retrieve` boundary maps that to an empty result set rather
/// than surfacing a parse error to the evaluator.
pub fn parse(query: &str) -> MResult<Expression> {
    let tokens = lex(query);
    if tokens.is_empty() {
        return Err(Error::InvalidQuery("blank query".to_string()));
    }

    let mut parser = Parser { tokens: &tokens, pos: 0 };
    let expr = parser.parse_expr()?;
    if parser.pos != parser.tokens.len() {
        return Err(Error::InvalidQuery(format!("trailing input at token {}", parser.pos)));
    }
    Ok(expr.to_dnf())
}

/// Strips disallowed characters (spec §4.7 step 1), then lexes into binary
/// operators, `!`, parens, quoted phrases, and bare words, collapsing
/// whitespace between words into an implicit `&` and folding runs of
/// identical adjacent binary operators into one (spec §4.7 steps 2–3).
fn lex(query: &str) -> Vec<Token> {
    let cleaned: String = query
        .chars()
        .filter(|c| {
            c.is_ascii_alphanumeric()
                || c.is_whitespace()
                || matches!(c, '"' | '\'' | '&' | '|' | '!' | '(' | ')' | '*')
        })
        .collect();

    let mut tokens = Vec::new();
    let mut chars = cleaned.chars().peekable();
    let mut last_was_value_like = false;

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            if last_was_value_like {
                if let Some(&next) = chars.peek() {
                    if next != '&' && next != '|' && next != ')' {
                        tokens.push(Token::And);
                        last_was_value_like = false;
                    }
                }
            }
            continue;
        }

        match c {
            '"' => {
                chars.next();
                let mut words = Vec::new();
                let mut current = String::new();
                for c in chars.by_ref() {
                    if c == '"' {
                        break;
                    }
                    if c.is_whitespace() {
                        if !current.is_empty() {
                            words.push(std::mem::take(&mut current));
                        }
                    } else {
                        current.push(c);
                    }
                }
                if !current.is_empty() {
                    words.push(current);
                }
                tokens.push(Token::Phrase(words));
                last_was_value_like = true;
            }
            '&' => {
                chars.next();
                if tokens.last() != Some(&Token::And) {
                    tokens.push(Token::And);
                }
                last_was_value_like = false;
            }
            '|' => {
                chars.next();
                if tokens.last() != Some(&Token::Or) {
                    tokens.push(Token::Or);
                }
                last_was_value_like = false;
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
                last_was_value_like = false;
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
                last_was_value_like = false;
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
                last_was_value_like = true;
            }
            '\'' => {
                chars.next();
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '*' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                if !word.is_empty() {
                    tokens.push(Token::Word(word));
                    last_was_value_like = true;
                }
            }
        }
    }

    // An `&`/`|` with nothing before or after it is a leftover artifact of
    // stripping; drop a run from either end.
    while matches!(tokens.first(), Some(Token::And) | Some(Token::Or)) {
        tokens.remove(0);
    }
    while matches!(tokens.last(), Some(Token::And) | Some(Token::Or)) {
        tokens.pop();
    }
    tokens
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<&Token> {
        let t = self.tokens.get(self.pos);
        self.pos += 1;
        t
    }

    // expr := term (('|' | '&') term)*, left-associative, '&' binds tighter.
    fn parse_expr(&mut self) -> MResult<Expression> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> MResult<Expression> {
        let mut left = self.parse_and()?;
        while matches!(self.peek(), Some(Token::Or)) {
            self.advance();
            let right = self.parse_and()?;
            left = Expression::or(left, right);
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> MResult<Expression> {
        let mut left = self.parse_not()?;
        while matches!(self.peek(), Some(Token::And)) {
            self.advance();
            let right = self.parse_not()?;
            left = Expression::and(left, right);
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> MResult<Expression> {
        if matches!(self.peek(), Some(Token::Not)) {
            self.advance();
            let child = self.parse_not()?;
            return Ok(Expression::negate(child));
        }
        self.parse_atom()
    }

    fn parse_atom(&mut self) -> MResult<Expression> {
        match self.advance() {
            Some(Token::Word(w)) => Ok(Expression::value(w.clone())),
            Some(Token::Phrase(words)) => Ok(Expression::phrase(words.clone())),
            Some(Token::LParen) => {
                let inner = self.parse_expr()?;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(Error::InvalidQuery("unbalanced parentheses".to_string())),
                }
            }
            other => Err(Error::InvalidQuery(format!("unexpected token: {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::{BinaryOp, UnaryOp};

    #[test]
    fn blank_query_is_invalid() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn simple_and_between_words() {
        let e = parse("space jam").unwrap();
        assert_eq!(e.to_query_string(), "space&jam");
    }

    #[test]
    fn phrase_is_preserved() {
        let e = parse("\"Space Jam\"").unwrap();
        assert_eq!(e.to_query_string(), "\"Space Jam\"");
    }

    #[test]
    fn not_binds_tighter_than_and() {
        let e = parse("space & !jam").unwrap();
        assert_eq!(e.to_query_string(), "space&!jam");
    }

    #[test]
    fn collapses_runs_of_identical_operators() {
        // spec §8 scenario 7: a&b|c||d&&&&f| -> (a∧b) ∨ c ∨ (d∧f)
        let e = parse("a&b|c||d&&&&f|").unwrap();
        match e {
            Expression::Binary { op: BinaryOp::Or, .. } => {}
            other => panic!("expected an OR at the root, got {other:?}"),
        }
        assert_eq!(e.to_query_string(), "a&b|c|d&f");
    }

    #[test]
    fn grouping_and_negation_produce_expected_dnf() {
        // spec §8 scenario 8: ((a|b)|!d)&!c -> (a∧¬c) ∨ (b∧¬c) ∨ (¬c∧¬d)
        let e = parse("((a|b)|!d)&!c").unwrap();
        assert!(matches!(e, Expression::Binary { op: BinaryOp::Or, .. }));
        let s = e.to_query_string();
        assert!(s.contains("a&!c"));
        assert!(s.contains("b&!c"));
        assert!(s.contains("!d&!c"));
    }

    #[test]
    fn wildcard_characters_survive_stripping() {
        let e = parse("sp*ce").unwrap();
        assert_eq!(e.to_query_string(), "sp*ce");
    }

    #[test]
    fn parse_result_is_always_dnf() {
        let e = parse("!(a&b)").unwrap();
        match e {
            Expression::Binary { op: BinaryOp::Or, left, right } => {
                assert!(matches!(*left, Expression::Unary { op: UnaryOp::Not, .. }));
                assert!(matches!(*right, Expression::Unary { op: UnaryOp::Not, .. }));
            }
            other => panic!("expected OR at root, got {other:?}"),
        }
    }
}
