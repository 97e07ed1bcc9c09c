// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Boolean condition expressions that gate chain members per event.
//!
//! Every chain member carries a condition such as `"Selector && !Vetoed"` or
//! `"(A || B) && C"`. Before a member runs, its condition is evaluated against
//! the [`SignalTable`], a per-event map of booleans that earlier processors
//! publish while they run.
//!
//! # Language
//!
//! * Signal names: any run of characters other than whitespace, `(`, `)`, `!`, `&`, `|`
//! * `!` negates the operand that follows it and binds tightest
//! * `&&` and `||` combine operands
//! * Parentheses group a sub-expression
//!
//! Mixed `&&`/`||` at one nesting level fold strictly left to right:
//! `A || B && C` means `(A || B) && C`. Use parentheses to express anything else.
//!
//! # Example
//!
//! ```rust
//! use the_chainwood::conditions::ConditionEngine;
//!
//! let mut engine = ConditionEngine::new();
//! engine.add_condition("Writer", "Selector && !Selector.vetoed").unwrap();
//!
//! engine.set_value("Selector", true);
//! engine.set_value("Selector.vetoed", false);
//! assert!(engine.condition_is_true("Writer").unwrap());
//!
//! // Conditions that were never registered let everything through.
//! assert!(engine.condition_is_true("Unconditional").unwrap());
//! ```

mod engine;
mod expression;
mod signals;
mod tokenizer;

pub use engine::ConditionEngine;
pub use expression::Condition;
pub use signals::SignalTable;
pub use tokenizer::{tokenize, Operator, Token};
