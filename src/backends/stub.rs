// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use anyhow::bail;
use parking_lot::Mutex;

use crate::backends::local::LocalPluginFactory;
use crate::config::Parameters;
use crate::model::{Event, RunHeader};
use crate::plugins::{PluginRegistrar, PluginRegistry};
use crate::traits::{EventContext, EventModifier, HookResult, InitContext, Processor, StepOutcome};

/// Shared, ordered record of hook calls, e.g. `"process:A"`.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, entry: String) {
        self.0.lock().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().iter().filter(|e| *e == entry).count()
    }

    pub fn clear(&self) {
        self.0.lock().clear();
    }
}

/// A processor that records every hook call and can be told, through its
/// parameters, to publish signals, skip, stop, rewind or fail.
///
/// Parameters:
/// * `publish` (bool) - value published under the processor's name
/// * `publish_on_event` - only publish on this event number
/// * `skip_on_event`, `skip_reason` - return `SkipEvent` on that event
/// * `control_on_event`, `control` (`stop`|`rewind`), `control_reason`
/// * `fail_in` - hook name that returns an error
/// * `seeds` (bool) - register for seeds and record the seed of every event
pub struct RecordingProcessor {
    label: &'static str,
    name: String,
    log: CallLog,
    modifier: bool,
    publish: Option<bool>,
    publish_on_event: Option<u64>,
    skip_on_event: Option<u64>,
    skip_reason: String,
    control_on_event: Option<u64>,
    control: String,
    control_reason: String,
    fail_in: Option<String>,
    seeds: bool,
}

impl RecordingProcessor {
    pub fn new(log: CallLog) -> Self {
        Self::labelled("", log)
    }

    pub fn labelled(label: &'static str, log: CallLog) -> Self {
        Self {
            label,
            name: String::new(),
            log,
            modifier: false,
            publish: None,
            publish_on_event: None,
            skip_on_event: None,
            skip_reason: "skipped".to_string(),
            control_on_event: None,
            control: "stop".to_string(),
            control_reason: String::new(),
            fail_in: None,
            seeds: false,
        }
    }

    pub fn as_modifier(mut self) -> Self {
        self.modifier = true;
        self
    }

    fn enter(&self, hook: &str) -> anyhow::Result<()> {
        self.log.record(format!("{}:{}", hook, self.name));
        if self.fail_in.as_deref() == Some(hook) {
            bail!("{} failed on purpose", hook);
        }
        Ok(())
    }

    fn react(&self, event: &Event, ctx: &mut EventContext<'_>) -> HookResult {
        let number = u64::from(event.event_number);

        if let Some(value) = self.publish {
            if self.publish_on_event.map_or(true, |only| only == number) {
                ctx.set_return_value(value);
            }
        }
        if self.skip_on_event == Some(number) {
            return Ok(StepOutcome::skip(self.skip_reason.clone()));
        }
        if self.control_on_event == Some(number) {
            return Ok(match self.control.as_str() {
                "rewind" => StepOutcome::rewind(self.control_reason.clone()),
                _ => StepOutcome::stop(self.control_reason.clone()),
            });
        }
        Ok(StepOutcome::Continue)
    }
}

impl Processor for RecordingProcessor {
    fn type_name(&self) -> &'static str {
        if self.modifier {
            "RecordingModifier"
        } else {
            "Recorder"
        }
    }

    fn description(&self) -> &str {
        self.label
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        self.publish = parameters.get_bool("publish")?;
        self.publish_on_event = parameters.get_u64("publish_on_event")?;
        self.skip_on_event = parameters.get_u64("skip_on_event")?;
        if let Some(reason) = parameters.get_str("skip_reason")? {
            self.skip_reason = reason.to_string();
        }
        self.control_on_event = parameters.get_u64("control_on_event")?;
        if let Some(control) = parameters.get_str("control")? {
            self.control = control.to_string();
        }
        if let Some(reason) = parameters.get_str("control_reason")? {
            self.control_reason = reason.to_string();
        }
        self.fail_in = parameters.get_str("fail_in")?.map(str::to_string);
        self.seeds = parameters.get_bool("seeds")?.unwrap_or(false);
        Ok(())
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> anyhow::Result<()> {
        self.name = ctx.name().to_string();
        self.enter("init")?;
        if self.seeds {
            ctx.register_for_seeds()?;
        }
        Ok(())
    }

    fn process_run_header(&mut self, _header: &RunHeader) -> anyhow::Result<()> {
        self.enter("run_header")
    }

    fn process_event(&mut self, event: &Event, ctx: &mut EventContext<'_>) -> HookResult {
        self.enter("process")?;
        if self.seeds {
            self.log
                .record(format!("seed:{}:{}", self.name, ctx.seed()?));
        }
        self.react(event, ctx)
    }

    fn check(&mut self, _event: &Event, _ctx: &mut EventContext<'_>) -> HookResult {
        self.enter("check")?;
        Ok(StepOutcome::Continue)
    }

    fn end(&mut self) -> anyhow::Result<()> {
        self.enter("end")
    }

    fn as_event_modifier(&mut self) -> Option<&mut dyn EventModifier> {
        if self.modifier {
            Some(self)
        } else {
            None
        }
    }
}

impl EventModifier for RecordingProcessor {
    fn modify_run_header(&mut self, header: &mut RunHeader) -> anyhow::Result<()> {
        self.enter("modify_run_header")?;
        header
            .parameters
            .insert("modified_by".to_string(), self.name.clone());
        Ok(())
    }

    fn modify_event(&mut self, event: &mut Event, ctx: &mut EventContext<'_>) -> HookResult {
        self.enter("modify")?;
        event.set_collection(self.name.clone(), serde_json::json!(event.event_number));
        self.react(event, ctx)
    }
}

/// Registry with the built-in plugins plus `Recorder` and
/// `RecordingModifier`, both writing to `log`.
pub fn recording_registry(log: &CallLog) -> PluginRegistry {
    let registry = PluginRegistry::default();
    LocalPluginFactory::install(&registry).unwrap();

    let mut registrar = PluginRegistrar::new();
    let plain_log = log.clone();
    registrar.register_processor("Recorder", move || {
        Box::new(RecordingProcessor::new(plain_log.clone()))
    });
    let modifier_log = log.clone();
    registrar.register_processor("RecordingModifier", move || {
        Box::new(RecordingProcessor::new(modifier_log.clone()).as_modifier())
    });
    registry.install(registrar, false).unwrap();
    registry
}
