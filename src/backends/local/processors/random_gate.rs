// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::ensure;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Parameters;
use crate::model::Event;
use crate::traits::{EventContext, HookResult, InitContext, Processor, StepOutcome};

/// Publishes a reproducible pseudo-random decision for every event.
///
/// The processor's own signal is `true` with probability `probability`;
/// `<name>.vetoed` carries the opposite value. The decision is drawn from
/// the processor's per-event seed, so reruns give the same answers.
pub struct RandomGate {
    probability: f64,
}

impl RandomGate {
    pub fn new() -> Self {
        Self { probability: 0.5 }
    }
}

impl Default for RandomGate {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor for RandomGate {
    fn type_name(&self) -> &'static str {
        "RandomGate"
    }

    fn description(&self) -> &str {
        "Publishes a seeded random pass/veto signal"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        if let Some(probability) = parameters.get_f64("probability")? {
            ensure!(
                (0.0..=1.0).contains(&probability),
                "probability must be within [0, 1], got {}",
                probability
            );
            self.probability = probability;
        }
        Ok(())
    }

    fn init(&mut self, ctx: &mut InitContext<'_>) -> anyhow::Result<()> {
        ctx.register_for_seeds()?;
        Ok(())
    }

    fn process_event(&mut self, _event: &Event, ctx: &mut EventContext<'_>) -> HookResult {
        let mut rng = ChaCha8Rng::seed_from_u64(u64::from(ctx.seed()?));
        let pass = rng.gen_bool(self.probability);
        ctx.set_return_value(pass);
        ctx.set_named_return_value("vetoed", !pass);
        Ok(StepOutcome::Continue)
    }
}
