//! Literal-or-regex string matchers.
//!
//! A raw expression is either compared for equality, or, when it carries the
//! `rx:` marker, compiled once into a [`Regex`] and matched without implicit
//! anchoring.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

use super::error::ExclusionError;

/// Prefix turning an expression into a regular expression.
pub const REGEX_MARKER: &str = "rx:";

#[derive(Debug, Clone)]
pub enum Expression {
    Literal(String),
    Pattern(Regex),
}

impl Expression {
    /// Parse a raw expression, compiling it if it carries the regex marker.
    pub fn parse(raw: &str) -> Result<Self, ExclusionError> {
        match raw.strip_prefix(REGEX_MARKER) {
            Some(pattern) => {
                if pattern.is_empty() {
                    return Err(ExclusionError::EmptyPattern {
                        marker: REGEX_MARKER,
                    });
                }
                Regex::new(pattern)
                    .map(Expression::Pattern)
                    .map_err(|source| ExclusionError::InvalidPattern {
                        pattern: pattern.to_string(),
                        source,
                    })
            }
            None => Ok(Expression::Literal(raw.to_string())),
        }
    }

    pub fn is_match(&self, value: &str) -> bool {
        match self {
            Expression::Literal(lit) => lit == value,
            Expression::Pattern(rx) => rx.is_match(value),
        }
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, Expression::Pattern(_))
    }

    /// The expression as written in configuration, marker included.
    pub fn raw(&self) -> String {
        match self {
            Expression::Literal(lit) => lit.clone(),
            Expression::Pattern(rx) => format!("{REGEX_MARKER}{}", rx.as_str()),
        }
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expression::Literal(a), Expression::Literal(b)) => a == b,
            (Expression::Pattern(a), Expression::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw())
    }
}

impl Serialize for Expression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw())
    }
}

/// An OR-group of expressions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Expressions(Vec<Expression>);

impl Expressions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every raw expression, failing on the first invalid pattern.
    pub fn parse<I, S>(raw: I) -> Result<Self, ExclusionError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        raw.into_iter()
            .map(|s| Expression::parse(s.as_ref()))
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn push(&mut self, expression: Expression) {
        self.0.push(expression);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expression> {
        self.0.iter()
    }

    /// True if any expression matches. An empty group never matches.
    pub fn matches(&self, value: &str) -> bool {
        self.0.iter().any(|e| e.is_match(value))
    }

    /// True if any value is matched by any expression.
    pub fn matches_any<'a>(&self, values: impl IntoIterator<Item = &'a str>) -> bool {
        values.into_iter().any(|v| self.matches(v))
    }
}

impl FromIterator<Expression> for Expressions {
    fn from_iter<T: IntoIterator<Item = Expression>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
