// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::backends::local::register_builtin_plugins;
use crate::config::Config;
use crate::engine::{JobRunner, RunnerOptions, Scheduler, SchedulerOptions};
use crate::errors::SchedulerError;
use crate::plugins::{LibraryRetention, PluginKind, PluginRegistry};

/// Job runtime builder - assembles the plugin registry and the job runner from
/// a steering document.
///
/// Building happens in two steps because the registry must outlive every
/// plugin instance created from it: native modules stay mapped for as long
/// as the registry (or a plugin created from one of them) is alive.
///
/// # Examples
///
/// ```
/// use the_chainwood::config::{Config, RuntimeBuilder};
///
/// let cfg = Config::from_yaml_str(r#"
/// data_source: { type: CountingSource, parameters: { events: 4 } }
/// processors:
///   - name: monitor
///     type: StatusMonitor
/// "#).unwrap();
///
/// let registry = RuntimeBuilder::build_registry(&cfg).unwrap();
/// let mut runner = RuntimeBuilder::build_runner(&registry, &cfg).unwrap();
/// let summary = runner.run().unwrap();
/// assert_eq!(summary.events_processed, 4);
/// ```
pub struct RuntimeBuilder;

impl RuntimeBuilder {
    /// Registry with the built-in plugins, then the modules listed in
    /// `global.libraries`, then the modules named in `global.library_env_var`.
    pub fn build_registry(cfg: &Config) -> Result<PluginRegistry, SchedulerError> {
        let retention = if cfg.global.retain_libraries {
            LibraryRetention::Leak
        } else {
            LibraryRetention::Unload
        };
        let registry = PluginRegistry::new(retention);

        register_builtin_plugins(&registry)?;
        for library in &cfg.global.libraries {
            registry.load_library(library)?;
        }
        registry.load_libraries(&cfg.global.library_env_var)?;
        Ok(registry)
    }

    /// Create and initialize the geometry, the data source and the processor
    /// chain described by `cfg`.
    ///
    /// The geometry is configured and initialized before any processor, so
    /// processors can read it from their `init`.
    pub fn build_runner(
        registry: &PluginRegistry,
        cfg: &Config,
    ) -> Result<JobRunner, SchedulerError> {
        let geometry = match &cfg.geometry {
            Some(geometry_cfg) => {
                let mut geometry = registry
                    .create_geometry(&geometry_cfg.type_name)
                    .ok_or_else(|| SchedulerError::UnknownPlugin {
                        kind: PluginKind::Geometry,
                        name: geometry_cfg.type_name.clone(),
                    })?;
                geometry
                    .configure(&geometry_cfg.parameters)
                    .map_err(|e| SchedulerError::hook(&geometry_cfg.type_name, "configure", e))?;
                geometry
                    .init()
                    .map_err(|e| SchedulerError::hook(&geometry_cfg.type_name, "init", e))?;
                Some(geometry)
            }
            None => None,
        };

        let source_cfg = cfg
            .data_source
            .as_ref()
            .ok_or(SchedulerError::MissingDataSource)?;
        let mut source = registry
            .create_data_source(&source_cfg.type_name)
            .ok_or_else(|| SchedulerError::UnknownPlugin {
                kind: PluginKind::DataSource,
                name: source_cfg.type_name.clone(),
            })?;
        source
            .configure(&source_cfg.parameters)
            .map_err(|e| SchedulerError::hook(&source_cfg.type_name, "configure", e))?;

        let mut scheduler = Scheduler::new(SchedulerOptions::from(&cfg.global));
        scheduler.init(
            registry,
            &cfg.processors,
            geometry.as_ref().map(|geometry| &***geometry),
        )?;

        Ok(JobRunner::new(
            scheduler,
            source,
            geometry,
            RunnerOptions::from(&cfg.global),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PluginConfig, ProcessorConfig};

    fn minimal() -> Config {
        Config {
            data_source: Some(PluginConfig::new("CountingSource")),
            processors: vec![ProcessorConfig::new("monitor", "StatusMonitor")],
            ..Config::default()
        }
    }

    #[test]
    fn test_registry_has_builtins_and_retention() {
        let mut cfg = minimal();
        cfg.global.library_env_var = "CHAINWOOD_TEST_UNSET_VARIABLE".to_string();

        let registry = RuntimeBuilder::build_registry(&cfg).unwrap();
        assert_eq!(registry.retention(), LibraryRetention::Unload);
        assert!(registry.is_registered(PluginKind::Processor, "StatusMonitor"));
        assert!(registry.loaded_libraries().is_empty());

        cfg.global.retain_libraries = true;
        let registry = RuntimeBuilder::build_registry(&cfg).unwrap();
        assert_eq!(registry.retention(), LibraryRetention::Leak);
    }

    #[test]
    fn test_missing_library_fails_the_build() {
        let mut cfg = minimal();
        cfg.global.libraries = vec!["/does/not/exist/libnothing.so".to_string()];

        let result = RuntimeBuilder::build_registry(&cfg);
        assert!(matches!(result, Err(SchedulerError::Plugin(_))));
    }

    #[test]
    fn test_build_runner_errors() {
        let registry = PluginRegistry::default();
        register_builtin_plugins(&registry).unwrap();

        struct TestCase {
            name: &'static str,
            cfg: Config,
            check: fn(&SchedulerError) -> bool,
        }

        let test_cases = vec![
            TestCase {
                name: "no data source",
                cfg: Config {
                    data_source: None,
                    ..minimal()
                },
                check: |e| matches!(e, SchedulerError::MissingDataSource),
            },
            TestCase {
                name: "unknown data source",
                cfg: Config {
                    data_source: Some(PluginConfig::new("Tape")),
                    ..minimal()
                },
                check: |e| {
                    matches!(e, SchedulerError::UnknownPlugin { kind: PluginKind::DataSource, name } if name == "Tape")
                },
            },
            TestCase {
                name: "unknown geometry",
                cfg: Config {
                    geometry: Some(PluginConfig::new("Gdml")),
                    ..minimal()
                },
                check: |e| {
                    matches!(e, SchedulerError::UnknownPlugin { kind: PluginKind::Geometry, name } if name == "Gdml")
                },
            },
            TestCase {
                name: "unknown processor type",
                cfg: Config {
                    processors: vec![ProcessorConfig::new("x", "Nope")],
                    ..minimal()
                },
                check: |e| matches!(e, SchedulerError::UnknownProcessorType { .. }),
            },
            TestCase {
                name: "bad processor parameter",
                cfg: Config {
                    processors: vec![ProcessorConfig::new("stop", "RunStopper")],
                    ..minimal()
                },
                check: |e| {
                    matches!(e, SchedulerError::ProcessorFailed { hook: "configure", .. })
                },
            },
        ];

        for test_case in test_cases {
            match RuntimeBuilder::build_runner(&registry, &test_case.cfg) {
                Ok(_) => panic!("{}: expected an error", test_case.name),
                Err(error) => assert!((test_case.check)(&error), "{}: {}", test_case.name, error),
            }
        }
    }

    #[test]
    fn test_geometry_is_available_to_the_runner() {
        let registry = PluginRegistry::default();
        register_builtin_plugins(&registry).unwrap();
        let cfg = Config {
            geometry: Some(PluginConfig::new("EmptyGeometry").with_parameters(
                serde_yaml::from_str("detector_name: toy\nbfield: 4.0").unwrap(),
            )),
            ..minimal()
        };

        let runner = RuntimeBuilder::build_runner(&registry, &cfg).unwrap();
        let geometry = runner.geometry().unwrap();
        assert_eq!(geometry.detector_name(), "toy");
        assert_eq!(geometry.constant("bfield"), Some(4.0));
    }
}
