// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use super::library::NativeLibrary;
use crate::traits::{DataSource, GeometryProvider, Processor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluginKind {
    Processor,
    Geometry,
    DataSource,
}

impl PluginKind {
    pub const ALL: [PluginKind; 3] = [
        PluginKind::Processor,
        PluginKind::Geometry,
        PluginKind::DataSource,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PluginKind::Processor => "processor",
            PluginKind::Geometry => "geometry",
            PluginKind::DataSource => "data source",
        }
    }
}

impl fmt::Display for PluginKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-erased product of a plugin factory.
pub enum PluginHandle {
    Processor(Box<dyn Processor>),
    Geometry(Box<dyn GeometryProvider>),
    DataSource(Box<dyn DataSource>),
}

impl PluginHandle {
    pub fn kind(&self) -> PluginKind {
        match self {
            PluginHandle::Processor(_) => PluginKind::Processor,
            PluginHandle::Geometry(_) => PluginKind::Geometry,
            PluginHandle::DataSource(_) => PluginKind::DataSource,
        }
    }
}

/// Zero-argument constructor stored in the registry.
pub type PluginFactory = Arc<dyn Fn() -> PluginHandle + Send + Sync>;

/// A plugin instance together with the module its code lives in.
///
/// Dereferences to the instance. The instance is dropped before the module
/// reference is released.
pub struct Plugin<T> {
    inner: T,
    origin: Option<Arc<NativeLibrary>>,
}

impl<T> Plugin<T> {
    /// Wrap an instance whose code is linked into the host.
    pub fn builtin(inner: T) -> Self {
        Self {
            inner,
            origin: None,
        }
    }

    pub(crate) fn with_origin(inner: T, origin: Option<Arc<NativeLibrary>>) -> Self {
        Self { inner, origin }
    }

    /// Basename of the module that provided this plugin, if any.
    pub fn origin(&self) -> Option<&str> {
        self.origin.as_deref().map(NativeLibrary::basename)
    }

    pub(crate) fn into_parts(self) -> (T, Option<Arc<NativeLibrary>>) {
        (self.inner, self.origin)
    }
}

impl<T> Deref for Plugin<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T> DerefMut for Plugin<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}
