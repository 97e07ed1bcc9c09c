// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::BTreeMap;

use crate::config::Parameters;
use crate::traits::GeometryProvider;

/// Geometry with no detector elements; every numeric parameter other than
/// `detector_name` becomes a named constant.
pub struct EmptyGeometry {
    detector_name: String,
    constants: BTreeMap<String, f64>,
}

impl EmptyGeometry {
    pub fn new() -> Self {
        Self {
            detector_name: "empty".to_string(),
            constants: BTreeMap::new(),
        }
    }
}

impl Default for EmptyGeometry {
    fn default() -> Self {
        Self::new()
    }
}

impl GeometryProvider for EmptyGeometry {
    fn type_name(&self) -> &'static str {
        "EmptyGeometry"
    }

    fn configure(&mut self, parameters: &Parameters) -> anyhow::Result<()> {
        if let Some(name) = parameters.get_str("detector_name")? {
            self.detector_name = name.to_string();
        }
        for key in parameters.keys().filter(|key| *key != "detector_name") {
            if let Some(value) = parameters.get_f64(key)? {
                self.constants.insert(key.to_string(), value);
            }
        }
        Ok(())
    }

    fn detector_name(&self) -> &str {
        &self.detector_name
    }

    fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }
}
