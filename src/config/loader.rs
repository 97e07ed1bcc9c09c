// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::{
    DEFAULT_CONDITION, DEFAULT_LIBRARY_ENV_VAR, DEFAULT_MAX_REWINDS, DEFAULT_RANDOM_SEED,
};
use crate::config::Parameters;
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A complete steering document.
///
/// # Fields
/// * `global` - job-wide settings (seed, plugin modules, event limits)
/// * `geometry` - optional detector description plugin
/// * `data_source` - plugin producing run headers and events
/// * `processors` - the chain, in execution order
///
/// # Example
/// ```yaml
/// global:
///   random_seed: 42
///   max_events: 100
/// data_source:
///   type: CountingSource
///   parameters: { events: 10 }
/// processors:
///   - name: monitor
///     type: StatusMonitor
///     parameters: { how_often: 5 }
///   - name: writer
///     type: StatusMonitor
///     condition: "gate && !gate.vetoed"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub geometry: Option<PluginConfig>,
    #[serde(default)]
    pub data_source: Option<PluginConfig>,
    #[serde(default)]
    pub processors: Vec<ProcessorConfig>,
}

impl Config {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Processors taking part in the job, in chain order
    pub fn active_processors(&self) -> impl Iterator<Item = &ProcessorConfig> {
        self.processors.iter().filter(|p| p.active)
    }
}

/// Job-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalConfig {
    pub random_seed: u32,
    /// Run the process phase from inside the modify phase
    pub allow_event_modification: bool,
    pub suppress_check: bool,
    /// Environment variable with additional plugin modules
    pub library_env_var: String,
    /// Plugin modules loaded before the ones named in the environment
    pub libraries: Vec<String>,
    /// Keep plugin modules mapped at shutdown
    pub retain_libraries: bool,
    pub skip_events: u64,
    /// 0 means no limit
    pub max_events: u64,
    pub max_rewinds: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            random_seed: DEFAULT_RANDOM_SEED,
            allow_event_modification: false,
            suppress_check: false,
            library_env_var: DEFAULT_LIBRARY_ENV_VAR.to_string(),
            libraries: Vec::new(),
            retain_libraries: false,
            skip_events: 0,
            max_events: 0,
            max_rewinds: DEFAULT_MAX_REWINDS,
        }
    }
}

/// A geometry provider or data source selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl PluginConfig {
    pub fn new(type_name: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            parameters: Parameters::new(),
        }
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// One chain member.
///
/// `name` identifies the member (and its signals and seed); `type` selects
/// the registered plugin. A missing `type` is reported by validation rather
/// than by the parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    pub name: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ProcessorConfig {
    pub fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_name: type_name.to_string(),
            condition: None,
            parameters: Parameters::new(),
            active: true,
        }
    }

    pub fn with_condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    pub fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// The declared condition, or the always-true default
    pub fn condition_or_default(&self) -> &str {
        self.condition.as_deref().unwrap_or(DEFAULT_CONDITION)
    }
}

/// Load a steering file; the format follows the extension (`.yaml`,
/// `.yml` or `.toml`).
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "yaml" | "yml" => Config::from_yaml_str(&fs::read_to_string(path)?),
        "toml" => Config::from_toml_str(&fs::read_to_string(path)?),
        _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load a steering file and validate it, reporting every problem at once.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_config(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn parse_basic_config() {
        let yaml = r#"
global:
  random_seed: 7
  max_events: 20
processors:
  - name: monitor
    type: StatusMonitor
    parameters:
      how_often: 5
  - name: writer
    type: StatusMonitor
    condition: "monitor && !gate"
    active: false
"#;

        let cfg = Config::from_yaml_str(yaml).unwrap();
        assert_eq!(cfg.global.random_seed, 7);
        assert_eq!(cfg.global.max_events, 20);
        assert_eq!(cfg.global.library_env_var, DEFAULT_LIBRARY_ENV_VAR);
        assert_eq!(cfg.global.max_rewinds, DEFAULT_MAX_REWINDS);
        assert_eq!(cfg.processors.len(), 2);
        assert_eq!(cfg.processors[0].condition_or_default(), "true");
        assert_eq!(cfg.processors[0].parameters.get_u64("how_often").unwrap(), Some(5));
        assert_eq!(cfg.processors[1].condition_or_default(), "monitor && !gate");
        assert_eq!(cfg.active_processors().count(), 1);
        assert!(cfg.geometry.is_none());
    }

    #[test]
    fn test_missing_type_parses_as_empty() {
        let cfg = Config::from_yaml_str("processors:\n  - name: lonely\n").unwrap();
        assert_eq!(cfg.processors[0].type_name, "");
    }

    #[test]
    fn test_load_by_extension() {
        let yaml = "processors:\n  - name: a\n    type: StatusMonitor\n";
        let toml = "[[processors]]\nname = \"a\"\ntype = \"StatusMonitor\"\n";

        let test_cases = vec![(".yaml", yaml), (".yml", yaml), (".toml", toml)];
        for (suffix, content) in test_cases {
            let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
            file.write_all(content.as_bytes()).unwrap();

            let cfg = load_config(file.path())
                .unwrap_or_else(|e| panic!("loading {} failed: {}", suffix, e));
            assert_eq!(cfg.processors[0].type_name, "StatusMonitor", "{}", suffix);
        }
    }

    #[test]
    fn test_unsupported_extension() {
        let file = Builder::new().suffix(".xml").tempfile().unwrap();
        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_and_validate_reports_all_problems() {
        let yaml = r#"
processors:
  - name: a
    type: StatusMonitor
  - name: a
    type: StatusMonitor
  - name: b
    condition: "x &"
"#;
        let mut file = Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(yaml.as_bytes()).unwrap();

        let error = load_and_validate_config(file.path()).unwrap_err();
        match error {
            ConfigError::Invalid(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {}", other),
        }
    }
}
