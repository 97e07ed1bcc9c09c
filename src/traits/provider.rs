// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::Parameters;
use crate::model::Record;

/// Detector description shared read-only with every processor.
pub trait GeometryProvider: Send + Sync {
    fn type_name(&self) -> &'static str;

    fn configure(&mut self, _parameters: &Parameters) -> anyhow::Result<()> {
        Ok(())
    }

    fn init(&mut self) -> anyhow::Result<()> {
        Ok(())
    }

    fn detector_name(&self) -> &str;

    /// A named numeric constant of the detector, if defined.
    fn constant(&self, name: &str) -> Option<f64>;
}

/// Input of a job: run headers followed by their events.
pub trait DataSource: Send {
    fn type_name(&self) -> &'static str;

    fn configure(&mut self, _parameters: &Parameters) -> anyhow::Result<()> {
        Ok(())
    }

    /// The next record, or `None` at the end of input.
    fn next_record(&mut self) -> anyhow::Result<Option<Record>>;

    /// Restart from the first record.
    fn rewind(&mut self) -> anyhow::Result<()>;
}
