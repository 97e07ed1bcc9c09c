// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::Arc;

use super::kind::{PluginFactory, PluginHandle, PluginKind};
use crate::traits::{DataSource, GeometryProvider, Processor};

pub(crate) struct Registration {
    pub kind: PluginKind,
    pub name: String,
    pub factory: PluginFactory,
}

/// Collects the factories a module (or the built-in set) provides.
///
/// The registrar only gathers registrations; the registry decides what to do
/// with duplicates when the registrar is installed.
#[derive(Default)]
pub struct PluginRegistrar {
    registrations: Vec<Registration>,
}

impl PluginRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, kind: PluginKind, name: &str, factory: PluginFactory) {
        self.registrations.push(Registration {
            kind,
            name: name.to_string(),
            factory,
        });
    }

    pub fn register_processor<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn Processor> + Send + Sync + 'static,
    {
        self.register(
            PluginKind::Processor,
            name,
            Arc::new(move || PluginHandle::Processor(factory())),
        );
    }

    pub fn register_geometry<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn GeometryProvider> + Send + Sync + 'static,
    {
        self.register(
            PluginKind::Geometry,
            name,
            Arc::new(move || PluginHandle::Geometry(factory())),
        );
    }

    pub fn register_data_source<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn DataSource> + Send + Sync + 'static,
    {
        self.register(
            PluginKind::DataSource,
            name,
            Arc::new(move || PluginHandle::DataSource(factory())),
        );
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// (kind, name) of every registration, in registration order
    pub fn names(&self) -> Vec<(PluginKind, &str)> {
        self.registrations
            .iter()
            .map(|r| (r.kind, r.name.as_str()))
            .collect()
    }

    pub(crate) fn into_registrations(self) -> Vec<Registration> {
        self.registrations
    }
}
