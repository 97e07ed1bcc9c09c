// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Single-pass tokenizer for condition expressions.
//!
//! The scan tracks parenthesis depth. Everything inside a top-level pair of
//! parentheses becomes one grouped token whose value is the inner text, to be
//! tokenized again by the caller. Outside parentheses, runs of non-operator
//! characters form a signal name, `!` negates the next operand, and `&&`/`||`
//! end the current token and tag the next one with that operator.

use crate::errors::ConditionError;

/// Binary operator joining a token to the result accumulated so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

/// One operand of a condition at a single nesting level.
///
/// The operator of the first token in a list is never used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub operator: Operator,
    pub negated: bool,
    /// A signal name, or the inner text of a parenthesised group
    pub value: String,
    pub grouped: bool,
}

/// Split one nesting level of `expression` into tokens.
pub fn tokenize(expression: &str) -> Result<Vec<Token>, ConditionError> {
    let mut tokens = Vec::new();
    let mut builder = TokenBuilder::new(Operator::And);
    let mut depth = 0usize;
    let mut group_start = 0usize;
    let mut chars = expression.char_indices();

    while let Some((offset, c)) = chars.next() {
        if depth > 0 {
            match c {
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        builder.group = Some(expression[group_start..offset].to_string());
                    }
                }
                _ => {}
            }
            continue;
        }

        match c {
            '(' => {
                if builder.has_operand() {
                    return Err(syntax(expression, offset, "'(' cannot follow an operand"));
                }
                depth = 1;
                group_start = offset + 1;
            }
            ')' => return Err(syntax(expression, offset, "unbalanced ')'")),
            '!' => {
                if builder.has_operand() {
                    return Err(syntax(expression, offset, "'!' must precede an operand"));
                }
                builder.negated = !builder.negated;
            }
            '&' | '|' => {
                match chars.next() {
                    Some((_, next)) if next == c => {}
                    _ => {
                        return Err(syntax(
                            expression,
                            offset,
                            format!("expected '{}{}'", c, c),
                        ))
                    }
                }
                let operator = if c == '&' { Operator::And } else { Operator::Or };
                let finished = std::mem::replace(&mut builder, TokenBuilder::new(operator));
                tokens.push(finished.finish(expression, offset)?);
            }
            c if c.is_whitespace() => {
                if !builder.name.is_empty() {
                    builder.name_closed = true;
                }
            }
            _ => {
                if builder.group.is_some() || builder.name_closed {
                    return Err(syntax(
                        expression,
                        offset,
                        "expected '&&' or '||' between operands",
                    ));
                }
                builder.name.push(c);
            }
        }
    }

    if depth > 0 {
        return Err(syntax(expression, expression.len(), "unclosed '('"));
    }

    tokens.push(builder.finish(expression, expression.len())?);
    Ok(tokens)
}

struct TokenBuilder {
    operator: Operator,
    negated: bool,
    name: String,
    name_closed: bool,
    group: Option<String>,
}

impl TokenBuilder {
    fn new(operator: Operator) -> Self {
        Self {
            operator,
            negated: false,
            name: String::new(),
            name_closed: false,
            group: None,
        }
    }

    fn has_operand(&self) -> bool {
        !self.name.is_empty() || self.group.is_some()
    }

    fn finish(self, expression: &str, offset: usize) -> Result<Token, ConditionError> {
        match self.group {
            Some(inner) => {
                let inner = inner.trim();
                if inner.is_empty() {
                    return Err(syntax(expression, offset, "empty parentheses"));
                }
                Ok(Token {
                    operator: self.operator,
                    negated: self.negated,
                    value: inner.to_string(),
                    grouped: true,
                })
            }
            None if self.name.is_empty() => Err(syntax(expression, offset, "missing operand")),
            None => Ok(Token {
                operator: self.operator,
                negated: self.negated,
                value: self.name,
                grouped: false,
            }),
        }
    }
}

fn syntax(expression: &str, offset: usize, reason: impl Into<String>) -> ConditionError {
    ConditionError::Syntax {
        expression: expression.to_string(),
        offset,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(operator: Operator, negated: bool, value: &str, grouped: bool) -> Token {
        Token {
            operator,
            negated,
            value: value.to_string(),
            grouped,
        }
    }

    #[test]
    fn test_tokenize_table_driven() {
        struct TestCase {
            name: &'static str,
            expression: &'static str,
            expected: Vec<Token>,
        }

        let test_cases = vec![
            TestCase {
                name: "single signal",
                expression: "Foo",
                expected: vec![token(Operator::And, false, "Foo", false)],
            },
            TestCase {
                name: "negated signal with surrounding whitespace",
                expression: "  !Foo ",
                expected: vec![token(Operator::And, true, "Foo", false)],
            },
            TestCase {
                name: "and with negation",
                expression: "Foo && !Bar",
                expected: vec![
                    token(Operator::And, false, "Foo", false),
                    token(Operator::And, true, "Bar", false),
                ],
            },
            TestCase {
                name: "group followed by and",
                expression: "(A || B) && C",
                expected: vec![
                    token(Operator::And, false, "A || B", true),
                    token(Operator::And, false, "C", false),
                ],
            },
            TestCase {
                name: "nested group kept verbatim",
                expression: "!(A && (B || C))||D",
                expected: vec![
                    token(Operator::And, true, "A && (B || C)", true),
                    token(Operator::Or, false, "D", false),
                ],
            },
            TestCase {
                name: "scoped signal names",
                expression: "Selector.passed || Selector.vetoed",
                expected: vec![
                    token(Operator::And, false, "Selector.passed", false),
                    token(Operator::Or, false, "Selector.vetoed", false),
                ],
            },
        ];

        for test_case in test_cases {
            let tokens = tokenize(test_case.expression).unwrap();
            assert_eq!(
                tokens, test_case.expected,
                "Test case '{}' produced unexpected tokens",
                test_case.name
            );
        }
    }

    #[test]
    fn test_tokenize_rejects_malformed_expressions() {
        let malformed = vec![
            ("", "missing operand"),
            ("A &&", "missing operand"),
            ("&& A", "missing operand"),
            ("A & B", "expected '&&'"),
            ("A | B", "expected '||'"),
            ("(A && B", "unclosed '('"),
            ("A && B)", "unbalanced ')'"),
            ("A B", "between operands"),
            ("()", "empty parentheses"),
            ("A!", "must precede an operand"),
            ("A (B)", "cannot follow an operand"),
            ("(A) B", "between operands"),
        ];

        for (expression, expected_reason) in malformed {
            match tokenize(expression) {
                Err(ConditionError::Syntax { reason, .. }) => assert!(
                    reason.contains(expected_reason),
                    "'{}': expected reason containing '{}', got '{}'",
                    expression,
                    expected_reason,
                    reason
                ),
                other => panic!("'{}': expected syntax error, got {:?}", expression, other),
            }
        }
    }

    #[test]
    fn test_double_negation_cancels() {
        let tokens = tokenize("!!A").unwrap();
        assert_eq!(tokens, vec![token(Operator::And, false, "A", false)]);
    }
}
