//! Boolean query expression tree (component C6): typed AND/OR/NOT over
//! value and phrase leaves, with DNF normalization (spec §4.6).

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Identity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
}

/// An immutable boolean query expression. Transformations such as
/// [`Expression::to_dnf`] always return a new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Value(String),
    /// A sequence of words with the maximum allowed gap between each
    /// consecutive pair (`gaps.len() == words.len() - 1`).
    Phrase { words: Vec<String>, gaps: Vec<usize> },
    Unary { op: UnaryOp, child: Box<Expression> },
    Binary { op: BinaryOp, left: Box<Expression>, right: Box<Expression> },
}

impl Expression {
    pub fn value(word: impl Into<String>) -> Expression {
        Expression::Value(word.into())
    }

    /// A phrase with a uniform maximum gap of 1 (adjacent words) between
    /// every consecutive pair, the common case for `"quoted phrases"`.
    pub fn phrase(words: Vec<String>) -> Expression {
        let gaps = vec![1; words.len().saturating_sub(1)];
        Expression::Phrase { words, gaps }
    }

    pub fn phrase_with_gaps(words: Vec<String>, gaps: Vec<usize>) -> Expression {
        Expression::Phrase { words, gaps }
    }

    /// Negates `e`, collapsing `NOT NOT e ≡ e` (spec §4.6) instead of
    /// nesting a second unary node.
    pub fn negate(e: Expression) -> Expression {
        match e {
            Expression::Unary { op: UnaryOp::Not, child } => *child,
            other => Expression::Unary { op: UnaryOp::Not, child: Box::new(other) },
        }
    }

    pub fn and(left: Expression, right: Expression) -> Expression {
        Expression::Binary { op: BinaryOp::And, left: Box::new(left), right: Box::new(right) }
    }

    pub fn or(left: Expression, right: Expression) -> Expression {
        Expression::Binary { op: BinaryOp::Or, left: Box::new(left), right: Box::new(right) }
    }

    /// Rewrites `self` into disjunctive normal form: NOT pushed down to
    /// leaves, then AND distributed over OR (spec §4.6). Mandatory before
    /// evaluation, since AND-first evaluation is what keeps intermediate
    /// result sizes small.
    pub fn to_dnf(&self) -> Expression {
        distribute(&push_negations(self))
    }

    /// Canonical string form, used for logging and round-tripping
    /// (spec §4.6, §8 round-trip property). Parentheses are emitted only
    /// where precedence (grouping > `!` > `&` > `|`) requires them.
    pub fn to_query_string(&self) -> String {
        match self {
            Expression::Value(v) => v.clone(),
            Expression::Phrase { words, .. } => format!("\"{}\"", words.join(" ")),
            Expression::Unary { op: UnaryOp::Not, child } => {
                format!("!{}", child_string(child, precedence(self)))
            }
            Expression::Unary { op: UnaryOp::Identity, child } => child.to_query_string(),
            Expression::Binary { op: BinaryOp::And, left, right } => {
                format!(
                    "{}&{}",
                    child_string(left, precedence(self)),
                    child_string(right, precedence(self)),
                )
            }
            Expression::Binary { op: BinaryOp::Or, left, right } => {
                format!(
                    "{}|{}",
                    child_string(left, precedence(self)),
                    child_string(right, precedence(self)),
                )
            }
        }
    }
}

fn precedence(e: &Expression) -> u8 {
    match e {
        Expression::Value(_) | Expression::Phrase { .. } => 3,
        Expression::Unary { op: UnaryOp::Not, .. } => 2,
        Expression::Unary { op: UnaryOp::Identity, child } => precedence(child),
        Expression::Binary { op: BinaryOp::And, .. } => 1,
        Expression::Binary { op: BinaryOp::Or, .. } => 0,
    }
}

/// Renders `e` as an operand that must bind at least as tightly as
/// `required`, parenthesizing it if it does not.
fn child_string(e: &Expression, required: u8) -> String {
    if precedence(e) < required {
        format!("({})", e.to_query_string())
    } else {
        e.to_query_string()
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_query_string())
    }
}

/// Pushes every `NOT` down to a leaf using De Morgan's laws, collapsing
/// double negation along the way.
fn push_negations(e: &Expression) -> Expression {
    match e {
        Expression::Value(_) | Expression::Phrase { .. } => e.clone(),
        Expression::Unary { op: UnaryOp::Identity, child } => push_negations(child),
        Expression::Unary { op: UnaryOp::Not, child } => push_negated(child),
        Expression::Binary { op, left, right } => Expression::Binary {
            op: *op,
            left: Box::new(push_negations(left)),
            right: Box::new(push_negations(right)),
        },
    }
}

/// `push_negations`, but with an implicit NOT already applied to `e`.
fn push_negated(e: &Expression) -> Expression {
    match e {
        Expression::Value(_) | Expression::Phrase { .. } => {
            Expression::Unary { op: UnaryOp::Not, child: Box::new(e.clone()) }
        }
        Expression::Unary { op: UnaryOp::Identity, child } => push_negated(child),
        Expression::Unary { op: UnaryOp::Not, child } => push_negations(child),
        Expression::Binary { op: BinaryOp::And, left, right } => Expression::Binary {
            op: BinaryOp::Or,
            left: Box::new(push_negated(left)),
            right: Box::new(push_negated(right)),
        },
        Expression::Binary { op: BinaryOp::Or, left, right } => Expression::Binary {
            op: BinaryOp::And,
            left: Box::new(push_negated(left)),
            right: Box::new(push_negated(right)),
        },
    }
}

/// Distributes AND over OR, the second half of DNF normalization.
fn distribute(e: &Expression) -> Expression {
    match e {
        Expression::Value(_) | Expression::Phrase { .. } => e.clone(),
        Expression::Unary { op, child } => {
            Expression::Unary { op: *op, child: Box::new(distribute(child)) }
        }
        Expression::Binary { op: BinaryOp::Or, left, right } => {
            Expression::or(distribute(left), distribute(right))
        }
        Expression::Binary { op: BinaryOp::And, left, right } => {
            distribute_and(&distribute(left), &distribute(right))
        }
    }
}

fn distribute_and(left: &Expression, right: &Expression) -> Expression {
    match (left, right) {
        (Expression::Binary { op: BinaryOp::Or, left: ll, right: lr }, _) => Expression::or(
            distribute_and(ll, right),
            distribute_and(lr, right),
        ),
        (_, Expression::Binary { op: BinaryOp::Or, left: rl, right: rr }) => Expression::or(
            distribute_and(left, rl),
            distribute_and(left, rr),
        ),
        _ => Expression::and(left.clone(), right.clone()),
    }
}
