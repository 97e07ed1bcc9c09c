// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

use super::signals::SignalTable;
use super::tokenizer::{tokenize, Operator};
use crate::errors::ConditionError;

/// A parsed condition expression, ready to evaluate once per event.
///
/// Parsing happens once, when the chain is assembled, so syntax errors surface
/// at configuration time rather than on the first event.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    source: String,
    terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq)]
struct Term {
    operator: Operator,
    negated: bool,
    operand: Operand,
}

#[derive(Debug, Clone, PartialEq)]
enum Operand {
    Signal(String),
    Group(Vec<Term>),
}

impl Condition {
    pub fn parse(source: &str) -> Result<Self, ConditionError> {
        Ok(Self {
            source: source.trim().to_string(),
            terms: compile(source)?,
        })
    }

    /// The expression text as registered
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Evaluate against the signals published so far in this event.
    ///
    /// Every operand is evaluated (no short-circuit), so a reference to an
    /// unpublished signal is reported even when the result would not depend on it.
    pub fn evaluate(&self, signals: &SignalTable) -> Result<bool, ConditionError> {
        fold(&self.terms, signals, &self.source)
    }

    /// All signal names referenced anywhere in the expression
    pub fn signal_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_names(&self.terms, &mut names);
        names
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn compile(expression: &str) -> Result<Vec<Term>, ConditionError> {
    tokenize(expression)?
        .into_iter()
        .map(|token| {
            let operand = if token.grouped {
                Operand::Group(compile(&token.value)?)
            } else {
                Operand::Signal(token.value)
            };
            Ok(Term {
                operator: token.operator,
                negated: token.negated,
                operand,
            })
        })
        .collect()
}

// Left fold: each term combines with everything to its left using its own
// operator. `&&` and `||` have equal precedence.
fn fold(terms: &[Term], signals: &SignalTable, source: &str) -> Result<bool, ConditionError> {
    let mut result = true;

    for (index, term) in terms.iter().enumerate() {
        let value = match &term.operand {
            Operand::Signal(name) => {
                signals
                    .get(name)
                    .ok_or_else(|| ConditionError::UnknownSignal {
                        signal: name.clone(),
                        expression: source.to_string(),
                    })?
            }
            Operand::Group(inner) => fold(inner, signals, source)?,
        } ^ term.negated;

        if index == 0 {
            result = value;
        } else {
            match term.operator {
                Operator::And => result &= value,
                Operator::Or => result |= value,
            }
        }
    }

    Ok(result)
}

fn collect_names<'a>(terms: &'a [Term], names: &mut Vec<&'a str>) {
    for term in terms {
        match &term.operand {
            Operand::Signal(name) => names.push(name),
            Operand::Group(inner) => collect_names(inner, names),
        }
    }
}
