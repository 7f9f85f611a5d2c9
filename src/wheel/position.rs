//! Cardinal position strings: `"<gate>|<gate>"` or `"<gate>"`
//!
//! Parsing is purely syntactic. Whether the gates are adjacent, or even in the
//! sequence, is left to the adjacency check.

use std::fmt;
use std::str::FromStr;

use nom::bytes::complete::take_till;
use nom::character::complete::{char, digit1};
use nom::combinator::all_consuming;
use nom::multi::separated_list1;
use nom::{IResult, Parser};
use serde::{Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::core::types::Gate;
use crate::wheel::sequence::value_kind;

/// Where a cardinal sits on the wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionSpec {
    /// On the zero-width boundary between two adjacent gates, `before` then `after`
    /// in increasing-index order
    Straddled { before: Gate, after: Gate },
    /// At the midpoint of a gate (between lines 3 and 4)
    Centered { gate: Gate },
}

impl PositionSpec {
    pub fn straddled(before: Gate, after: Gate) -> Self {
        PositionSpec::Straddled { before, after }
    }

    pub fn centered(gate: Gate) -> Self {
        PositionSpec::Centered { gate }
    }

    pub fn parse(input: &str) -> Result<Self, PositionParseError> {
        let fail = |rule| PositionParseError {
            input: input.to_string(),
            rule,
        };

        if input.is_empty() {
            return Err(fail(PositionRule::Empty));
        }

        let tokens = split_tokens(input)
            .map(|(_, tokens)| tokens)
            .map_err(|_| fail(PositionRule::Empty))?;

        match tokens.as_slice() {
            [gate] => Ok(PositionSpec::Centered {
                gate: gate_token(gate, 0).map_err(fail)?,
            }),
            [before, after] => Ok(PositionSpec::Straddled {
                before: gate_token(before, 0).map_err(fail)?,
                after: gate_token(after, 1).map_err(fail)?,
            }),
            more => Err(fail(PositionRule::TooManyTokens { count: more.len() })),
        }
    }

    /// Parse a position taken straight from a configuration document
    pub fn from_value(value: &Value) -> Result<Self, PositionParseError> {
        match value {
            Value::String(input) => PositionSpec::parse(input),
            other => Err(PositionParseError {
                input: other.to_string(),
                rule: PositionRule::NotAString {
                    found: value_kind(other),
                },
            }),
        }
    }

    /// Gates mentioned by this spec, in written order
    pub fn gates(&self) -> Vec<Gate> {
        match *self {
            PositionSpec::Straddled { before, after } => vec![before, after],
            PositionSpec::Centered { gate } => vec![gate],
        }
    }
}

/// Split on `|`, keeping empty tokens so `"|5"` and `"5|"` are reported precisely
fn split_tokens(input: &str) -> IResult<&str, Vec<&str>> {
    all_consuming(separated_list1(char('|'), take_till(|c: char| c == '|'))).parse(input)
}

fn gate_token(token: &str, index: usize) -> Result<Gate, PositionRule> {
    if token.is_empty() {
        return Err(PositionRule::EmptyToken { index });
    }

    let digits: IResult<&str, &str> = all_consuming(digit1).parse(token);
    if digits.is_err() {
        return Err(PositionRule::NotANumber {
            token: token.to_string(),
        });
    }

    token
        .parse::<u32>()
        .ok()
        .and_then(Gate::new)
        .ok_or_else(|| PositionRule::GateOutOfRange {
            token: token.to_string(),
        })
}

impl FromStr for PositionSpec {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PositionSpec::parse(s)
    }
}

/// Canonical string form, which parses back to an equal spec
impl fmt::Display for PositionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSpec::Straddled { before, after } => write!(f, "{}|{}", before, after),
            PositionSpec::Centered { gate } => write!(f, "{}", gate),
        }
    }
}

impl Serialize for PositionSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Grammar rule a position string broke
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionRule {
    NotAString { found: &'static str },
    Empty,
    TooManyTokens { count: usize },
    EmptyToken { index: usize },
    NotANumber { token: String },
    GateOutOfRange { token: String },
}

impl fmt::Display for PositionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionRule::NotAString { found } => {
                write!(f, "expected a position string such as \"11|10\", found {}", found)
            }
            PositionRule::Empty => write!(f, "position is empty"),
            PositionRule::TooManyTokens { count } => write!(
                f,
                "found {} '|'-separated tokens, expected one gate or two gates",
                count
            ),
            PositionRule::EmptyToken { index } => {
                write!(f, "token {} is empty, expected a gate number", index + 1)
            }
            PositionRule::NotANumber { token } => {
                write!(f, "token {:?} is not a decimal gate number", token)
            }
            PositionRule::GateOutOfRange { token } => {
                write!(f, "gate {} is outside 1..=64", token)
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot parse position {input:?}: {rule}")]
pub struct PositionParseError {
    pub input: String,
    pub rule: PositionRule,
}
