// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashSet;
use std::time::Instant;

use crate::conditions::{Condition, ConditionEngine, SignalTable};
use crate::config::consts::DEFAULT_RANDOM_SEED;
use crate::config::{GlobalConfig, ProcessorConfig};
use crate::engine::chain::{ChainMember, ProcessorChain};
use crate::engine::statistics::{RunReport, RunStatistics};
use crate::engine::whiteboard::{EventKey, Whiteboard};
use crate::errors::SchedulerError;
use crate::model::{Event, RunHeader};
use crate::observability::messages::scheduler::{
    EventSkipped, EventStarted, JobControlRequested, ProcessorEndFailed, ProcessorInitialized,
    RunHeaderProcessed, SchedulerEnded, SchedulerInitialized,
};
use crate::observability::messages::StructuredLog;
use crate::plugins::{Plugin, PluginRegistry};
use crate::seeds::{SeedDistributor, SeedLookup};
use crate::traits::{EventContext, GeometryProvider, InitContext, Processor, StepOutcome};

/// Lifecycle of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Unconfigured,
    Initialized,
    Running,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerOptions {
    pub random_seed: u32,
    /// `modify_event` runs the process phase itself, on the modified event
    pub allow_event_modification: bool,
    pub suppress_check: bool,
}

impl Default for SchedulerOptions {
    fn default() -> Self {
        Self {
            random_seed: DEFAULT_RANDOM_SEED,
            allow_event_modification: false,
            suppress_check: false,
        }
    }
}

impl From<&GlobalConfig> for SchedulerOptions {
    fn from(global: &GlobalConfig) -> Self {
        Self {
            random_seed: global.random_seed,
            allow_event_modification: global.allow_event_modification,
            suppress_check: global.suppress_check,
        }
    }
}

/// Drives the processor chain.
///
/// For every event the scheduler clears the signal table, refreshes the
/// seeds, runs the modify phase over the event modifiers and then the process
/// phase over the whole chain. Each member only runs when its condition holds
/// against the signals published earlier in the same event.
///
/// `SkipEvent` is absorbed here: it is tallied by reason and ends the chain
/// walk for the current event. `StopProcessing` and `RewindJob` are returned
/// to the caller, which owns the input.
pub struct Scheduler {
    options: SchedulerOptions,
    state: SchedulerState,
    chain: ProcessorChain,
    conditions: ConditionEngine,
    seeds: SeedDistributor,
    statistics: RunStatistics,
}

impl Scheduler {
    pub fn new(options: SchedulerOptions) -> Self {
        Self {
            options,
            state: SchedulerState::Unconfigured,
            chain: ProcessorChain::new(),
            conditions: ConditionEngine::new(),
            seeds: SeedDistributor::new(options.random_seed),
            statistics: RunStatistics::new(),
        }
    }

    pub fn options(&self) -> &SchedulerOptions {
        &self.options
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn chain(&self) -> &ProcessorChain {
        &self.chain
    }

    /// Direct chain access for editing. Members added here take part in the
    /// event loop but have not been through `init`.
    pub fn chain_mut(&mut self) -> &mut ProcessorChain {
        &mut self.chain
    }

    pub fn conditions(&self) -> &ConditionEngine {
        &self.conditions
    }

    pub fn seeds(&self) -> &SeedDistributor {
        &self.seeds
    }

    pub fn statistics(&self) -> &RunStatistics {
        &self.statistics
    }

    /// Build the chain from `processors` and initialize every member in order.
    ///
    /// Names are checked for emptiness and uniqueness before anything is
    /// created. Every type is resolved, configured and its condition parsed
    /// before the first `init` hook runs. When an `init` hook fails, members
    /// already initialized are ended in reverse order and the scheduler is
    /// left empty so `init` can be retried. Inactive entries are ignored.
    pub fn init(
        &mut self,
        registry: &PluginRegistry,
        processors: &[ProcessorConfig],
        geometry: Option<&dyn GeometryProvider>,
    ) -> Result<(), SchedulerError> {
        self.expect_state("init", &[SchedulerState::Unconfigured])?;

        let active: Vec<&ProcessorConfig> = processors.iter().filter(|p| p.active).collect();
        if active.is_empty() {
            return Err(SchedulerError::EmptyChain);
        }
        let mut names = HashSet::new();
        for processor in &active {
            if !names.insert(processor.name.as_str()) {
                return Err(SchedulerError::DuplicateProcessor(processor.name.clone()));
            }
        }

        let mut prepared = Vec::with_capacity(active.len());
        for config in active {
            prepared.push((config, Self::prepare_processor(registry, config)?));
        }

        for (config, processor) in prepared {
            if let Err(error) = self.add_processor(config, processor, geometry) {
                self.unwind();
                return Err(error);
            }
        }

        SchedulerInitialized {
            processor_count: self.chain.len(),
            modifier_count: self.chain.modifier_names().len(),
        }
        .log();
        self.state = SchedulerState::Initialized;
        Ok(())
    }

    fn prepare_processor(
        registry: &PluginRegistry,
        config: &ProcessorConfig,
    ) -> Result<Plugin<Box<dyn Processor>>, SchedulerError> {
        let name = config.name.as_str();
        Condition::parse(config.condition_or_default()).map_err(|source| {
            SchedulerError::InvalidCondition {
                processor: name.to_string(),
                source,
            }
        })?;

        let mut processor = registry.create_processor(&config.type_name).ok_or_else(|| {
            SchedulerError::UnknownProcessorType {
                processor: name.to_string(),
                type_name: config.type_name.clone(),
            }
        })?;
        processor
            .configure(&config.parameters)
            .map_err(|e| SchedulerError::hook(name, "configure", e))?;
        Ok(processor)
    }

    fn add_processor(
        &mut self,
        config: &ProcessorConfig,
        mut processor: Plugin<Box<dyn Processor>>,
        geometry: Option<&dyn GeometryProvider>,
    ) -> Result<(), SchedulerError> {
        let name = config.name.as_str();
        let expression = config.condition_or_default();

        let mut ctx = InitContext::new(name, &mut self.seeds, geometry);
        processor
            .init(&mut ctx)
            .map_err(|e| SchedulerError::hook(name, "init", e))?;

        // Once initialized the member must be reachable by `unwind`.
        self.chain.push(ChainMember::new(name, processor))?;
        self.conditions.add_condition(name, expression)?;
        self.statistics.register(name);

        ProcessorInitialized {
            name,
            type_name: &config.type_name,
            condition: expression,
        }
        .log();
        Ok(())
    }

    /// End the members initialized so far, newest first, and drop every
    /// trace of them.
    fn unwind(&mut self) {
        for member in self.chain.iter_mut().rev() {
            let name = member.name().to_string();
            if let Err(e) = member.processor_mut().end() {
                let error = SchedulerError::hook(&name, "end", e);
                ProcessorEndFailed {
                    processor: &name,
                    error: &error,
                }
                .log();
            }
        }
        self.chain = ProcessorChain::new();
        self.conditions = ConditionEngine::new();
        self.statistics = RunStatistics::new();
        self.seeds = SeedDistributor::new(self.options.random_seed);
    }

    /// Hand the run header to every member, in chain order, unconditionally.
    pub fn process_run_header(&mut self, header: &RunHeader) -> Result<(), SchedulerError> {
        self.begin_running("process_run_header")?;
        for member in self.chain.iter_mut() {
            let name = member.name().to_string();
            member
                .processor_mut()
                .process_run_header(header)
                .map_err(|e| SchedulerError::hook(&name, "process_run_header", e))?;
        }
        RunHeaderProcessed {
            run_number: header.run_number,
            detector_name: &header.detector_name,
        }
        .log();
        Ok(())
    }

    /// Let every event modifier rewrite the run header, in chain order.
    pub fn modify_run_header(&mut self, header: &mut RunHeader) -> Result<(), SchedulerError> {
        self.begin_running("modify_run_header")?;
        for member in self.chain.iter_mut().filter(|m| m.is_modifier()) {
            let name = member.name().to_string();
            if let Some(modifier) = member.processor_mut().as_event_modifier() {
                modifier
                    .modify_run_header(header)
                    .map_err(|e| SchedulerError::hook(&name, "modify_run_header", e))?;
            }
        }
        Ok(())
    }

    /// Modify phase for one event.
    ///
    /// With event modification allowed the process phase follows inside this
    /// call, on the modified event and with the modifiers' signals still
    /// visible. Otherwise the caller runs [`process_event`](Self::process_event)
    /// when the outcome is `Continue`.
    pub fn modify_event(&mut self, event: &mut Event) -> Result<StepOutcome, SchedulerError> {
        self.begin_running("modify_event")?;
        self.begin_event(event);

        let suppress_check = self.options.suppress_check;
        let outcome = self.with_live_signals(|scheduler, signals| {
            scheduler.walk_modifiers(event, signals)
        })?;
        if !outcome.is_continue() || !self.options.allow_event_modification {
            return Ok(outcome);
        }

        self.seeds.refresh(event.run_number, event.event_number);
        let event: &Event = event;
        self.with_live_signals(|scheduler, signals| {
            let Scheduler {
                chain,
                conditions,
                seeds,
                statistics,
                ..
            } = scheduler;
            walk_chain(
                chain,
                conditions,
                signals,
                &*seeds,
                statistics,
                suppress_check,
                event,
            )
        })
    }

    /// Process phase for one event.
    pub fn process_event(&mut self, event: &Event) -> Result<StepOutcome, SchedulerError> {
        self.begin_running("process_event")?;
        self.begin_event(event);

        let suppress_check = self.options.suppress_check;
        self.with_live_signals(|scheduler, signals| {
            let Scheduler {
                chain,
                conditions,
                seeds,
                statistics,
                ..
            } = scheduler;
            walk_chain(
                chain,
                conditions,
                signals,
                &*seeds,
                statistics,
                suppress_check,
                event,
            )
        })
    }

    /// Process phase for one event using a private whiteboard slot instead of
    /// the shared signal table and live seeds.
    pub fn process_event_on(
        &mut self,
        whiteboard: &Whiteboard,
        event: &Event,
    ) -> Result<StepOutcome, SchedulerError> {
        self.begin_running("process_event")?;
        self.seeds.close();

        let slot = whiteboard.open(self.seeds.snapshot(event.run_number, event.event_number))?;
        let result = {
            let mut signals = slot.signals();
            walk_chain(
                &mut self.chain,
                &self.conditions,
                &mut signals,
                slot.seeds(),
                &mut self.statistics,
                self.options.suppress_check,
                event,
            )
        };
        whiteboard.close(EventKey::from(event));
        result
    }

    /// Call `end` on every member in reverse chain order and report.
    ///
    /// Every member is ended even if an earlier one fails; the first failure
    /// is returned.
    pub fn end(&mut self) -> Result<RunReport, SchedulerError> {
        self.expect_state(
            "end",
            &[SchedulerState::Initialized, SchedulerState::Running],
        )?;

        let mut first_error = None;
        for member in self.chain.iter_mut().rev() {
            let name = member.name().to_string();
            if let Err(e) = member.processor_mut().end() {
                let error = SchedulerError::hook(&name, "end", e);
                ProcessorEndFailed {
                    processor: &name,
                    error: &error,
                }
                .log();
                first_error.get_or_insert(error);
            }
        }
        self.state = SchedulerState::Ended;

        let report = self.statistics.report();
        SchedulerEnded {
            processor_count: self.chain.len(),
            skipped_events: report.total_skipped,
            total_time: report.total_elapsed,
        }
        .log();

        match first_error {
            Some(error) => Err(error),
            None => Ok(report),
        }
    }

    fn begin_event(&mut self, event: &Event) {
        EventStarted {
            run: event.run_number,
            event: event.event_number,
        }
        .log();
        self.conditions.clear();
        self.seeds.refresh(event.run_number, event.event_number);
    }

    fn begin_running(&mut self, operation: &'static str) -> Result<(), SchedulerError> {
        self.expect_state(
            operation,
            &[SchedulerState::Initialized, SchedulerState::Running],
        )?;
        self.state = SchedulerState::Running;
        Ok(())
    }

    fn expect_state(
        &self,
        operation: &'static str,
        allowed: &[SchedulerState],
    ) -> Result<(), SchedulerError> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SchedulerError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    /// Run `f` with the condition engine's signal table moved out, so the
    /// chain can be walked while the named conditions are read.
    fn with_live_signals<R>(&mut self, f: impl FnOnce(&mut Self, &mut SignalTable) -> R) -> R {
        let mut signals = std::mem::take(self.conditions.signals_mut());
        let result = f(self, &mut signals);
        *self.conditions.signals_mut() = signals;
        result
    }

    fn walk_modifiers(
        &mut self,
        event: &mut Event,
        signals: &mut SignalTable,
    ) -> Result<StepOutcome, SchedulerError> {
        let (run, number) = (event.run_number, event.event_number);

        for member in self.chain.iter_mut().filter(|m| m.is_modifier()) {
            let name = member.name().to_string();
            if !self.conditions.condition_is_true_with(&name, signals)? {
                continue;
            }

            let started = Instant::now();
            let result = match member.processor_mut().as_event_modifier() {
                Some(modifier) => {
                    let mut ctx = EventContext::new(&name, signals, &self.seeds);
                    modifier.modify_event(event, &mut ctx)
                }
                None => Ok(StepOutcome::Continue),
            };
            self.statistics.record(&name, started.elapsed(), false);

            let outcome = result.map_err(|e| SchedulerError::hook(&name, "modify_event", e))?;
            if !outcome.is_continue() {
                return Ok(settle(&mut self.statistics, &name, outcome, run, number));
            }
        }
        Ok(StepOutcome::Continue)
    }
}

/// Process phase over the whole chain.
fn walk_chain(
    chain: &mut ProcessorChain,
    conditions: &ConditionEngine,
    signals: &mut SignalTable,
    seeds: &dyn SeedLookup,
    statistics: &mut RunStatistics,
    suppress_check: bool,
    event: &Event,
) -> Result<StepOutcome, SchedulerError> {
    for member in chain.iter_mut() {
        let name = member.name().to_string();
        if !conditions.condition_is_true_with(&name, signals)? {
            continue;
        }

        let started = Instant::now();
        let result = {
            let mut ctx = EventContext::new(&name, signals, seeds);
            let processor = member.processor_mut();
            match processor.process_event(event, &mut ctx) {
                Ok(StepOutcome::Continue) if !suppress_check => processor
                    .check(event, &mut ctx)
                    .map_err(|e| SchedulerError::hook(&name, "check", e)),
                Ok(outcome) => Ok(outcome),
                Err(e) => Err(SchedulerError::hook(&name, "process_event", e)),
            }
        };
        statistics.record(&name, started.elapsed(), true);

        let outcome = result?;
        if !outcome.is_continue() {
            return Ok(settle(
                statistics,
                &name,
                outcome,
                event.run_number,
                event.event_number,
            ));
        }
    }
    Ok(StepOutcome::Continue)
}

/// Tally and log a non-`Continue` outcome.
fn settle(
    statistics: &mut RunStatistics,
    processor: &str,
    outcome: StepOutcome,
    run: u32,
    event: u32,
) -> StepOutcome {
    match &outcome {
        StepOutcome::SkipEvent(reason) => {
            statistics.record_skip(reason);
            EventSkipped {
                processor,
                reason,
                run,
                event,
            }
            .log();
        }
        StepOutcome::StopProcessing(reason) => JobControlRequested {
            processor,
            request: "stop",
            reason,
        }
        .log(),
        StepOutcome::RewindJob(reason) => JobControlRequested {
            processor,
            request: "rewind",
            reason,
        }
        .log(),
        StepOutcome::Continue => {}
    }
    outcome
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("chain", &self.chain.names())
            .finish()
    }
}
