use crate::errors::PluginError;
use crate::plugins::{PluginKind, PluginRegistrar, PluginRegistry};

use super::geometry::EmptyGeometry;
use super::processors::*;
use super::sources::CountingSource;

/// Registers the in-process plugins that ship with the crate.
pub struct LocalPluginFactory;

impl LocalPluginFactory {
    /// A registrar holding every built-in plugin.
    ///
    /// - "StatusMonitor" -> StatusMonitor
    /// - "RandomGate" -> RandomGate
    /// - "EventSkipper" -> EventSkipper
    /// - "RunStopper" -> RunStopper
    /// - "EventTagger" -> EventTagger (event modifier)
    /// - "EmptyGeometry" -> EmptyGeometry
    /// - "CountingSource" -> CountingSource
    pub fn registrar() -> PluginRegistrar {
        let mut registrar = PluginRegistrar::new();

        registrar.register_processor("StatusMonitor", || Box::new(StatusMonitor::new()));
        registrar.register_processor("RandomGate", || Box::new(RandomGate::new()));
        registrar.register_processor("EventSkipper", || Box::new(EventSkipper::new()));
        registrar.register_processor("RunStopper", || Box::new(RunStopper::new()));
        registrar.register_processor("EventTagger", || Box::new(EventTagger::new()));

        registrar.register_geometry("EmptyGeometry", || Box::new(EmptyGeometry::new()));

        registrar.register_data_source("CountingSource", || Box::new(CountingSource::new()));

        registrar
    }

    /// Install the built-ins into `registry`; a name that is already taken
    /// is an error.
    pub fn install(registry: &PluginRegistry) -> Result<usize, PluginError> {
        registry.install(Self::registrar(), false)
    }

    /// List all built-in (kind, name) pairs
    pub fn list_available_implementations() -> Vec<(PluginKind, &'static str)> {
        vec![
            (PluginKind::Processor, "StatusMonitor"),
            (PluginKind::Processor, "RandomGate"),
            (PluginKind::Processor, "EventSkipper"),
            (PluginKind::Processor, "RunStopper"),
            (PluginKind::Processor, "EventTagger"),
            (PluginKind::Geometry, "EmptyGeometry"),
            (PluginKind::DataSource, "CountingSource"),
        ]
    }

    /// Check if a built-in is available
    pub fn is_implementation_available(kind: PluginKind, name: &str) -> bool {
        Self::list_available_implementations()
            .iter()
            .any(|(k, n)| *k == kind && *n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registrar_matches_listing() {
        let registrar = LocalPluginFactory::registrar();
        let names = registrar.names();
        assert_eq!(names, LocalPluginFactory::list_available_implementations());
    }

    #[test]
    fn test_install_creates_every_builtin() {
        let registry = PluginRegistry::default();
        let installed = LocalPluginFactory::install(&registry).unwrap();
        assert_eq!(installed, 7);

        let test_cases = vec![
            ("StatusMonitor", "StatusMonitor"),
            ("RandomGate", "RandomGate"),
            ("EventSkipper", "EventSkipper"),
            ("RunStopper", "RunStopper"),
            ("EventTagger", "EventTagger"),
        ];
        for (name, type_name) in test_cases {
            let processor = registry.create_processor(name).unwrap();
            assert_eq!(processor.type_name(), type_name);
            assert!(processor.origin().is_none());
        }

        let geometry = registry.create_geometry("EmptyGeometry").unwrap();
        assert_eq!(geometry.detector_name(), "empty");
        assert!(registry.create_data_source("CountingSource").is_some());
    }

    #[test]
    fn test_second_install_is_rejected() {
        let registry = PluginRegistry::default();
        LocalPluginFactory::install(&registry).unwrap();
        assert!(matches!(
            LocalPluginFactory::install(&registry),
            Err(PluginError::DuplicatePlugin { .. })
        ));
    }

    #[test]
    fn test_is_implementation_available() {
        assert!(LocalPluginFactory::is_implementation_available(
            PluginKind::Processor,
            "RandomGate"
        ));
        assert!(!LocalPluginFactory::is_implementation_available(
            PluginKind::Geometry,
            "RandomGate"
        ));
        assert!(!LocalPluginFactory::is_implementation_available(
            PluginKind::Processor,
            "nonexistent"
        ));
    }
}
