// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use super::expression::Condition;
use super::signals::SignalTable;
use crate::errors::ConditionError;
use crate::observability::messages::conditions::ConditionRegistered;
use crate::observability::messages::StructuredLog;

/// Named conditions plus the signal table of the event in flight.
///
/// The named conditions are fixed when the chain is assembled; the signal
/// table is cleared before every event and filled by processors as they run.
#[derive(Debug, Clone, Default)]
pub struct ConditionEngine {
    conditions: HashMap<String, Condition>,
    signals: SignalTable,
}

impl ConditionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `expression` and store it under `name`, replacing any earlier one.
    pub fn add_condition(&mut self, name: &str, expression: &str) -> Result<(), ConditionError> {
        let condition = Condition::parse(expression)?;
        ConditionRegistered {
            name,
            expression: condition.source(),
        }
        .log();
        self.conditions.insert(name.to_string(), condition);
        Ok(())
    }

    pub fn condition(&self, name: &str) -> Option<&Condition> {
        self.conditions.get(name)
    }

    /// Evaluate the condition registered under `name` against the current signals.
    ///
    /// Names that were never registered evaluate to `true`. A registered
    /// condition that references an unpublished signal is an error.
    pub fn condition_is_true(&self, name: &str) -> Result<bool, ConditionError> {
        self.condition_is_true_with(name, &self.signals)
    }

    /// Same as [`condition_is_true`](Self::condition_is_true), against a
    /// caller-owned signal table.
    pub fn condition_is_true_with(
        &self,
        name: &str,
        signals: &SignalTable,
    ) -> Result<bool, ConditionError> {
        match self.conditions.get(name) {
            Some(condition) => condition.evaluate(signals),
            None => Ok(true),
        }
    }

    pub fn set_value(&mut self, key: impl Into<String>, value: bool) {
        self.signals.set(key, value);
    }

    /// Start a new event: only the literal signals remain
    pub fn clear(&mut self) {
        self.signals.reset();
    }

    pub fn signals(&self) -> &SignalTable {
        &self.signals
    }

    pub fn signals_mut(&mut self) -> &mut SignalTable {
        &mut self.signals
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_condition_defaults_to_true() {
        let engine = ConditionEngine::new();
        assert_eq!(engine.condition_is_true("Nope"), Ok(true));
    }

    #[test]
    fn test_registered_condition_with_unpublished_signal_fails() {
        let mut engine = ConditionEngine::new();
        engine.add_condition("Writer", "Selector").unwrap();

        let result = engine.condition_is_true("Writer");
        assert!(matches!(
            result,
            Err(ConditionError::UnknownSignal { ref signal, .. }) if signal == "Selector"
        ));
    }

    #[test]
    fn test_clear_forgets_published_signals() {
        let mut engine = ConditionEngine::new();
        engine.add_condition("Writer", "Selector").unwrap();

        engine.set_value("Selector", true);
        assert_eq!(engine.condition_is_true("Writer"), Ok(true));

        engine.clear();
        assert!(engine.condition_is_true("Writer").is_err());
        assert_eq!(engine.signals(), &SignalTable::new());
    }

    #[test]
    fn test_add_condition_rejects_bad_syntax_and_keeps_registry() {
        let mut engine = ConditionEngine::new();
        engine.add_condition("Writer", "A").unwrap();

        assert!(engine.add_condition("Writer", "A &").is_err());
        assert_eq!(engine.condition("Writer").unwrap().source(), "A");
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_evaluation_against_external_table() {
        let mut engine = ConditionEngine::new();
        engine.add_condition("Writer", "Gate").unwrap();

        let mut private = SignalTable::new();
        private.set("Gate", false);

        assert_eq!(engine.condition_is_true_with("Writer", &private), Ok(false));
        assert!(engine.condition_is_true("Writer").is_err());
    }
}
