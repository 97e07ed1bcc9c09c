// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::env::VarError;
use std::fmt::Write as _;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use super::kind::{Plugin, PluginFactory, PluginHandle, PluginKind};
use super::library::{LibraryRetention, NativeLibrary};
use super::registrar::PluginRegistrar;
use crate::config::consts::LIBRARY_PATH_DELIMITER;
use crate::errors::PluginError;
use crate::observability::messages::plugin::{
    DuplicatePluginIgnored, LibraryLoadFailed, LibraryLoaded, PluginNotFound, PluginRegistered,
};
use crate::observability::messages::StructuredLog;
use crate::traits::{DataSource, GeometryProvider, Processor};

const BUILTIN_ORIGIN: &str = "builtin";

#[derive(Clone)]
struct RegistryEntry {
    factory: PluginFactory,
    origin: Option<Arc<NativeLibrary>>,
}

/// Maps (kind, name) to plugin factories and owns the native modules they
/// came from.
///
/// Lookups take a read lock and clone the factory out, so `create` may be
/// called from several threads while factories run outside the lock.
pub struct PluginRegistry {
    entries: RwLock<HashMap<(PluginKind, String), RegistryEntry>>,
    libraries: Mutex<Vec<Arc<NativeLibrary>>>,
    retention: LibraryRetention,
}

impl PluginRegistry {
    pub fn new(retention: LibraryRetention) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            libraries: Mutex::new(Vec::new()),
            retention,
        }
    }

    pub fn retention(&self) -> LibraryRetention {
        self.retention
    }

    /// Store `factory` under (kind, name).
    ///
    /// With `ignore_duplicate` an existing entry wins and the call succeeds;
    /// without it the call fails and the registry is unchanged.
    pub fn register(
        &self,
        kind: PluginKind,
        name: &str,
        factory: PluginFactory,
        ignore_duplicate: bool,
    ) -> Result<(), PluginError> {
        self.insert(
            kind,
            name,
            RegistryEntry {
                factory,
                origin: None,
            },
            ignore_duplicate,
        )
    }

    /// Register everything collected by `registrar`, stopping at the first
    /// rejected duplicate.
    pub fn install(
        &self,
        registrar: PluginRegistrar,
        ignore_duplicate: bool,
    ) -> Result<usize, PluginError> {
        self.install_from(registrar, None, ignore_duplicate)
    }

    fn install_from(
        &self,
        registrar: PluginRegistrar,
        origin: Option<&Arc<NativeLibrary>>,
        ignore_duplicate: bool,
    ) -> Result<usize, PluginError> {
        let mut count = 0;
        for registration in registrar.into_registrations() {
            self.insert(
                registration.kind,
                &registration.name,
                RegistryEntry {
                    factory: registration.factory,
                    origin: origin.cloned(),
                },
                ignore_duplicate,
            )?;
            count += 1;
        }
        Ok(count)
    }

    fn insert(
        &self,
        kind: PluginKind,
        name: &str,
        entry: RegistryEntry,
        ignore_duplicate: bool,
    ) -> Result<(), PluginError> {
        let mut entries = self.entries.write();
        let key = (kind, name.to_string());

        if entries.contains_key(&key) {
            if ignore_duplicate {
                DuplicatePluginIgnored {
                    kind: kind.as_str(),
                    name,
                }
                .log();
                return Ok(());
            }
            return Err(PluginError::DuplicatePlugin {
                kind,
                name: name.to_string(),
            });
        }

        PluginRegistered {
            kind: kind.as_str(),
            name,
            origin: entry
                .origin
                .as_deref()
                .map(NativeLibrary::basename)
                .unwrap_or(BUILTIN_ORIGIN),
        }
        .log();
        entries.insert(key, entry);
        Ok(())
    }

    /// Load every module listed in the environment variable `env_var`.
    ///
    /// An unset or empty variable loads nothing; a value that is not valid
    /// UTF-8 is an error. Returns the number of modules loaded.
    pub fn load_libraries(&self, env_var: &str) -> Result<usize, PluginError> {
        match std::env::var(env_var) {
            Ok(list) => self.load_library_list(&list),
            Err(VarError::NotPresent) => Ok(0),
            Err(VarError::NotUnicode(_)) => {
                Err(PluginError::InvalidLibraryList(env_var.to_string()))
            }
        }
    }

    /// Load a `:`-separated list of module paths, in order.
    ///
    /// The first failure aborts the rest of the list; modules loaded before
    /// it stay resident.
    pub fn load_library_list(&self, list: &str) -> Result<usize, PluginError> {
        let mut loaded = 0;
        for path in list
            .split(LIBRARY_PATH_DELIMITER)
            .map(str::trim)
            .filter(|path| !path.is_empty())
        {
            self.load_library(path)?;
            loaded += 1;
        }
        Ok(loaded)
    }

    /// Load one module and register its plugins (first registration wins).
    ///
    /// Returns the number of plugins the module registered.
    pub fn load_library(&self, path: &str) -> Result<usize, PluginError> {
        self.try_load_library(path).map_err(|error| {
            LibraryLoadFailed {
                path,
                error: &error,
            }
            .log();
            error
        })
    }

    fn try_load_library(&self, path: &str) -> Result<usize, PluginError> {
        let basename = NativeLibrary::basename_of(path)?;
        let mut libraries = self.libraries.lock();

        if libraries.iter().any(|library| library.basename() == basename) {
            return Err(PluginError::DuplicateLibrary {
                basename,
                path: path.to_string(),
            });
        }

        let library = Arc::new(NativeLibrary::open(path, self.retention)?);
        let mut registrar = PluginRegistrar::new();
        let plugin_count = library.register_into(&mut registrar)?.unwrap_or(0);
        self.install_from(registrar, Some(&library), true)?;

        LibraryLoaded {
            path,
            basename: library.basename(),
            plugin_count,
        }
        .log();
        libraries.push(library);
        Ok(plugin_count)
    }

    /// Run the factory registered under (kind, name).
    ///
    /// A missing entry is logged and yields `None`.
    pub fn create(&self, kind: PluginKind, name: &str) -> Option<Plugin<PluginHandle>> {
        let entry = self.entries.read().get(&(kind, name.to_string())).cloned();

        match entry {
            Some(entry) => {
                let handle = (entry.factory)();
                Some(Plugin::with_origin(handle, entry.origin))
            }
            None => {
                PluginNotFound {
                    kind: kind.as_str(),
                    name,
                }
                .log();
                None
            }
        }
    }

    pub fn create_processor(&self, name: &str) -> Option<Plugin<Box<dyn Processor>>> {
        let (handle, origin) = self.create(PluginKind::Processor, name)?.into_parts();
        match handle {
            PluginHandle::Processor(processor) => Some(Plugin::with_origin(processor, origin)),
            other => mismatched(PluginKind::Processor, name, other),
        }
    }

    pub fn create_geometry(&self, name: &str) -> Option<Plugin<Box<dyn GeometryProvider>>> {
        let (handle, origin) = self.create(PluginKind::Geometry, name)?.into_parts();
        match handle {
            PluginHandle::Geometry(geometry) => Some(Plugin::with_origin(geometry, origin)),
            other => mismatched(PluginKind::Geometry, name, other),
        }
    }

    pub fn create_data_source(&self, name: &str) -> Option<Plugin<Box<dyn DataSource>>> {
        let (handle, origin) = self.create(PluginKind::DataSource, name)?.into_parts();
        match handle {
            PluginHandle::DataSource(source) => Some(Plugin::with_origin(source, origin)),
            other => mismatched(PluginKind::DataSource, name, other),
        }
    }

    /// Sorted names registered for `kind`
    pub fn plugin_names(&self, kind: PluginKind) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .keys()
            .filter(|(k, _)| *k == kind)
            .map(|(_, name)| name.clone())
            .collect();
        names.sort();
        names
    }

    pub fn is_registered(&self, kind: PluginKind, name: &str) -> bool {
        self.entries.read().contains_key(&(kind, name.to_string()))
    }

    /// Basenames of the resident modules, in load order
    pub fn loaded_libraries(&self) -> Vec<String> {
        self.libraries
            .lock()
            .iter()
            .map(|library| library.basename().to_string())
            .collect()
    }

    /// Human-readable listing of every registered plugin and loaded module.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        {
            let entries = self.entries.read();
            for kind in PluginKind::ALL {
                let mut names: Vec<(&String, &RegistryEntry)> = entries
                    .iter()
                    .filter(|((k, _), _)| *k == kind)
                    .map(|((_, name), entry)| (name, entry))
                    .collect();
                names.sort_by(|a, b| a.0.cmp(b.0));

                let _ = writeln!(out, "{} plugins ({}):", kind, names.len());
                for (name, entry) in names {
                    let origin = entry
                        .origin
                        .as_deref()
                        .map(NativeLibrary::basename)
                        .unwrap_or(BUILTIN_ORIGIN);
                    let _ = writeln!(out, "  {:<24} [{}]", name, origin);
                }
            }
        }

        let libraries = self.libraries.lock();
        let _ = writeln!(out, "loaded libraries ({}):", libraries.len());
        for library in libraries.iter() {
            let _ = writeln!(
                out,
                "  {:<24} {}",
                library.basename(),
                library.path().display()
            );
        }
        out
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new(LibraryRetention::default())
    }
}

fn mismatched<T>(expected: PluginKind, name: &str, handle: PluginHandle) -> Option<T> {
    tracing::error!(
        expected = expected.as_str(),
        found = handle.kind().as_str(),
        name,
        "Factory for {} plugin '{}' produced a {} plugin",
        expected,
        name,
        handle.kind()
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::stub::{CallLog, RecordingProcessor};

    fn recording_factory(log: &CallLog, label: &'static str) -> PluginFactory {
        let log = log.clone();
        Arc::new(move || {
            PluginHandle::Processor(Box::new(RecordingProcessor::labelled(label, log.clone())))
        })
    }

    #[test]
    fn test_duplicate_registration_keep_first_or_reject() {
        let log = CallLog::default();
        let registry = PluginRegistry::default();

        registry
            .register(PluginKind::Processor, "Digi", recording_factory(&log, "first"), false)
            .unwrap();

        let ignored = registry.register(
            PluginKind::Processor,
            "Digi",
            recording_factory(&log, "second"),
            true,
        );
        assert!(ignored.is_ok());

        let rejected = registry.register(
            PluginKind::Processor,
            "Digi",
            recording_factory(&log, "third"),
            false,
        );
        assert!(matches!(
            rejected,
            Err(PluginError::DuplicatePlugin { kind: PluginKind::Processor, ref name }) if name == "Digi"
        ));

        let processor = registry.create_processor("Digi").unwrap();
        assert_eq!(processor.description(), "first");
    }

    #[test]
    fn test_same_name_different_kind_is_not_a_duplicate() {
        let log = CallLog::default();
        let registry = PluginRegistry::default();

        registry
            .register(PluginKind::Processor, "Shared", recording_factory(&log, "p"), false)
            .unwrap();
        registry
            .register(PluginKind::Geometry, "Shared", recording_factory(&log, "g"), false)
            .unwrap();

        assert!(registry.is_registered(PluginKind::Processor, "Shared"));
        assert!(registry.is_registered(PluginKind::Geometry, "Shared"));
        assert!(!registry.is_registered(PluginKind::DataSource, "Shared"));
    }

    #[test]
    fn test_create_unknown_returns_none() {
        let registry = PluginRegistry::default();
        assert!(registry.create(PluginKind::Processor, "Ghost").is_none());
        assert!(registry.create_processor("Ghost").is_none());
    }

    #[test]
    fn test_create_with_mismatched_kind_returns_none() {
        let log = CallLog::default();
        let registry = PluginRegistry::default();
        registry
            .register(PluginKind::Geometry, "Liar", recording_factory(&log, "x"), false)
            .unwrap();

        assert!(registry.create(PluginKind::Geometry, "Liar").is_some());
        assert!(registry.create_geometry("Liar").is_none());
    }

    #[test]
    fn test_every_create_builds_a_fresh_instance() {
        let log = CallLog::default();
        let registry = PluginRegistry::default();
        let mut registrar = PluginRegistrar::new();
        let factory_log = log.clone();
        registrar.register_processor("Recorder", move || {
            Box::new(RecordingProcessor::new(factory_log.clone()))
        });
        assert_eq!(registry.install(registrar, false).unwrap(), 1);

        let first = registry.create_processor("Recorder").unwrap();
        let second = registry.create_processor("Recorder").unwrap();
        assert!(first.origin().is_none());
        assert_eq!(first.type_name(), second.type_name());
    }

    #[test]
    fn test_install_rejects_duplicates_when_asked() {
        let registry = PluginRegistry::default();
        let log = CallLog::default();

        let mut registrar = PluginRegistrar::new();
        registrar.register(PluginKind::Processor, "A", recording_factory(&log, "a"));
        registrar.register(PluginKind::Processor, "A", recording_factory(&log, "a2"));

        assert!(registry.install(registrar, false).is_err());
        assert_eq!(registry.plugin_names(PluginKind::Processor), vec!["A"]);
    }

    #[test]
    fn test_plugin_names_and_dump() {
        let log = CallLog::default();
        let registry = PluginRegistry::default();
        for name in ["Zeta", "Alpha", "Mid"] {
            registry
                .register(PluginKind::Processor, name, recording_factory(&log, "x"), false)
                .unwrap();
        }

        assert_eq!(
            registry.plugin_names(PluginKind::Processor),
            vec!["Alpha", "Mid", "Zeta"]
        );
        assert!(registry.plugin_names(PluginKind::DataSource).is_empty());

        let dump = registry.dump();
        assert!(dump.contains("processor plugins (3):"));
        assert!(dump.contains("Alpha"));
        assert!(dump.contains("[builtin]"));
        assert!(dump.contains("loaded libraries (0):"));
    }

    #[test]
    fn test_unset_env_var_loads_nothing() {
        let registry = PluginRegistry::default();
        let loaded = registry
            .load_libraries("CHAINWOOD_TEST_UNSET_LIBRARY_VARIABLE")
            .unwrap();
        assert_eq!(loaded, 0);
        assert!(registry.loaded_libraries().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_library_list_is_an_error() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let var = "CHAINWOOD_TEST_NON_UTF8_LIBRARY_VARIABLE";
        std::env::set_var(var, OsStr::from_bytes(b"/opt/plugins/lib\xffdigi.so"));
        let registry = PluginRegistry::default();

        let result = registry.load_libraries(var);
        std::env::remove_var(var);

        assert!(matches!(result, Err(PluginError::InvalidLibraryList(name)) if name == var));
        assert!(registry.loaded_libraries().is_empty());
    }

    #[test]
    fn test_blank_entries_in_library_list_are_skipped() {
        let registry = PluginRegistry::default();
        assert_eq!(registry.load_library_list(" : :").unwrap(), 0);
    }

    #[test]
    fn test_missing_library_fails_load() {
        let registry = PluginRegistry::default();
        let result = registry.load_library_list("/nonexistent/dir/libnothing.so");
        assert!(matches!(result, Err(PluginError::LoadFailed { .. })));
        assert!(registry.loaded_libraries().is_empty());
    }

    #[cfg(target_os = "linux")]
    mod native {
        use super::*;

        // libm is present on every glibc system and exports no plugins.
        const SYSTEM_LIBRARY: &str = "libm.so.6";

        #[test]
        fn test_module_without_entry_point_loads_but_registers_nothing() {
            let registry = PluginRegistry::default();
            assert_eq!(registry.load_library(SYSTEM_LIBRARY).unwrap(), 0);
            assert_eq!(registry.loaded_libraries(), vec![SYSTEM_LIBRARY]);
        }

        #[test]
        fn test_duplicate_basename_fails_before_second_load() {
            let registry = PluginRegistry::default();
            let list = format!("{}:/does/not/exist/{}", SYSTEM_LIBRARY, SYSTEM_LIBRARY);

            let result = registry.load_library_list(&list);

            assert!(matches!(
                result,
                Err(PluginError::DuplicateLibrary { ref basename, .. }) if basename == SYSTEM_LIBRARY
            ));
            assert_eq!(registry.loaded_libraries(), vec![SYSTEM_LIBRARY]);
        }

        #[test]
        fn test_failure_keeps_earlier_loads_from_the_batch() {
            let registry = PluginRegistry::new(LibraryRetention::Leak);
            let list = format!("{}:/nonexistent/libnothing.so", SYSTEM_LIBRARY);

            assert!(registry.load_library_list(&list).is_err());
            assert_eq!(registry.loaded_libraries(), vec![SYSTEM_LIBRARY]);
        }

        #[test]
        fn test_load_libraries_reads_environment_variable() {
            let variable = "CHAINWOOD_TEST_REGISTRY_LIBRARIES";
            std::env::set_var(variable, SYSTEM_LIBRARY);

            let registry = PluginRegistry::default();
            let loaded = registry.load_libraries(variable).unwrap();

            std::env::remove_var(variable);
            assert_eq!(loaded, 1);
        }
    }
}
