#[cfg(test)]
mod integration_tests {
    use crate::config::{load_and_validate_config, load_config, RuntimeBuilder};

    fn prepare(path: &str) -> crate::config::Config {
        let mut config = load_and_validate_config(path).unwrap();
        // keep the environment of the test process out of the registry
        config.global.library_env_var = "CHAINWOOD_TEST_NO_LIBRARIES".to_string();
        config
    }

    /// Test that the demo steering file loads with every section
    #[test]
    fn test_counting_demo_yaml_loading() {
        let config = load_and_validate_config("configs/counting-demo.yaml").unwrap();

        assert_eq!(config.global.random_seed, 1_234_567_890);
        assert_eq!(config.geometry.as_ref().unwrap().type_name, "EmptyGeometry");
        assert_eq!(config.data_source.as_ref().unwrap().type_name, "CountingSource");
        assert_eq!(config.processors.len(), 3);
        assert_eq!(config.processors[0].name, "monitor");
        assert_eq!(config.processors[2].condition_or_default(), "gate && !gate.vetoed");
    }

    /// YAML and TOML renditions describe the same chain
    #[test]
    fn test_yaml_and_toml_agree() {
        let yaml = load_config("configs/counting-demo.yaml").unwrap();
        let toml = load_config("configs/counting-demo.toml").unwrap();

        assert_eq!(yaml.global, toml.global);
        let events = |c: &crate::config::Config| {
            let source = c.data_source.as_ref().unwrap();
            (source.type_name.clone(), source.parameters.get_u64("events").unwrap())
        };
        assert_eq!(events(&yaml), events(&toml));
        let names = |c: &crate::config::Config| {
            c.processors
                .iter()
                .map(|p| (p.name.clone(), p.type_name.clone(), p.condition_or_default().to_string()))
                .collect::<Vec<_>>()
        };
        assert_eq!(names(&yaml), names(&toml));
    }

    /// Test running the demo job end to end
    #[test]
    fn test_run_counting_demo() {
        let config = prepare("configs/counting-demo.yaml");
        let registry = RuntimeBuilder::build_registry(&config).unwrap();
        let mut runner = RuntimeBuilder::build_runner(&registry, &config).unwrap();

        let summary = runner.run().unwrap();

        assert_eq!(summary.run_headers, 1);
        assert_eq!(summary.events_processed, 10);
        assert_eq!(summary.stop_reason, None);
        assert_eq!(summary.report.processors.len(), 3);
        assert_eq!(runner.geometry().unwrap().detector_name(), "toy_detector");
    }

    /// The demo is reproducible: same seed, same selection
    #[test]
    fn test_counting_demo_is_reproducible() {
        let selected_events = || {
            let config = prepare("configs/counting-demo.yaml");
            let registry = RuntimeBuilder::build_registry(&config).unwrap();
            let mut runner = RuntimeBuilder::build_runner(&registry, &config).unwrap();
            let summary = runner.run().unwrap();
            summary
                .report
                .processors
                .iter()
                .find(|p| p.name == "selected")
                .map(|p| p.events)
                .unwrap()
        };

        let first = selected_events();
        assert!(first <= 10);
        assert_eq!(first, selected_events());
    }

    /// Test skip counts and an early stop from the steering file
    #[test]
    fn test_run_skip_and_stop() {
        let config = prepare("configs/skip-and-stop.yaml");
        let registry = RuntimeBuilder::build_registry(&config).unwrap();
        let mut runner = RuntimeBuilder::build_runner(&registry, &config).unwrap();

        assert_eq!(runner.scheduler().chain().names(), vec!["skipper", "stopper"]);
        let summary = runner.run().unwrap();

        // events 0 and 1 are skipped by the runner; 3, 5 and 8 by the chain
        assert_eq!(summary.report.total_skipped, 3);
        assert_eq!(
            summary.report.skipped,
            vec![("noisy readout".to_string(), 3)]
        );
        assert_eq!(summary.stop_reason.as_deref(), Some("processed 12 events"));
        assert_eq!(summary.events_processed, 15);
    }

    /// Test event modification with the process phase inside the modify phase
    #[test]
    fn test_run_event_modification() {
        let config = prepare("configs/event-modification.yaml");
        assert!(config.global.allow_event_modification);
        let registry = RuntimeBuilder::build_registry(&config).unwrap();
        let mut runner = RuntimeBuilder::build_runner(&registry, &config).unwrap();

        assert_eq!(runner.scheduler().chain().modifier_names(), vec!["tagger"]);
        let summary = runner.run().unwrap();

        let tagged = summary
            .report
            .processors
            .iter()
            .find(|p| p.name == "tagged")
            .unwrap();
        assert_eq!(tagged.events, 6);
    }
}
