// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde_json::Value;

use crate::config::Parameters;
use crate::model::{Event, RunHeader};
use crate::traits::{
    EventContext, EventModifier, HookResult, InitContext, Processor, StepOutcome,
};

/// Event modifier that writes a fixed value into a named collection and
/// stamps run headers with its own name.
pub struct EventTagger {
    name: String,
    collection: Option<String>,
    value: Value,
}

impl EventTagger {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            collection: None,
            value: Value::String("tagged".to_string()),
        }
    }

    fn collection(&self) -> &str {
        self.collection.as_deref().unwrap_or(&self.name)
    }
}

impl Default for EventTagger {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for EventTagger {
    fn type_name(&self) -> &'static str {
        "EventTagger"
    }

    fn description(&self) -> &str {
        "Adds a tag collection to every event it modifies"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        self.collection = parameters.get_str("collection")?.map(str::to_string);
        if let Some(value) = parameters.get("value") {
            self.value = serde_json::to_value(value)?;
        }
        Ok(())
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> anyhow::Result<()> {
        self.name = ctx.name().to_string();
        Ok(())
    }

    /// Publishes whether the tag is present on the event.
    fn process_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> HookResult {
        ctx.set_return_value(event.collection(self.collection()).is_some());
        Ok(StepOutcome::Continue)
    }

    fn as_event_modifier(&mut self) -> Option<&mut dyn EventModifier> {
        Some(self)
    }
}

impl EventModifier for EventTagger {
    fn modify_run_header(&mut self, header: &mut RunHeader) -> anyhow::Result<()> {
        header
            .parameters
            .insert("tagged_by".to_string(), self.name.clone());
        Ok(())
    }

    fn modify_event(&mut self, event: &mut Event, _ctx: &mut EventContext<'_>) -> HookResult {
        event.set_collection(self.collection().to_string(), self.value.clone());
        Ok(StepOutcome::Continue)
    }
}
