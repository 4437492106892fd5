//! YAML configuration file support for listmatch.
//!
//! Every section is optional; a missing section or key falls back to the
//! built-in default, so an empty document with only `version` is valid.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "cameras"
//!
//! normalize:
//!   stop_words: [gmbh, inc, ltd, uk, corporation, international, llc, co, plc]
//!
//! matcher:
//!   manufacturer_weight: 0.25
//!   model_weight: 0.55
//!   family_weight: 0.20
//!   acceptance_threshold: 0.695
//!   progress_interval: 50
//!
//! output:
//!   path: "results.json"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use canonical::NormalizeConfig;
use matcher::MatchConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading YAML configuration files
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ListmatchConfig {
    /// Configuration format version
    #[serde(default = "default_config_version")]
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub matcher: MatchConfig,

    #[serde(default)]
    pub output: OutputYamlConfig,
}

impl ListmatchConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: ListmatchConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.normalize
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("normalize: {err}")))?;
        self.matcher
            .validate()
            .map_err(|err| ConfigLoadError::Validation(format!("matcher: {err}")))?;
        self.output.validate()?;

        Ok(())
    }
}

impl Default for ListmatchConfig {
    fn default() -> Self {
        Self {
            version: default_config_version(),
            name: None,
            normalize: NormalizeConfig::default(),
            matcher: MatchConfig::default(),
            output: OutputYamlConfig::default(),
        }
    }
}

/// Where results go when the command line does not say.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputYamlConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl OutputYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigLoadError::Validation(
                "output.path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OutputYamlConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

fn default_config_version() -> String {
    "1.0".to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from("results.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "cameras"
matcher:
  model_weight: 0.6
  acceptance_threshold: 0.7
"#;

        let config = ListmatchConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.name.as_deref(), Some("cameras"));
        assert_eq!(config.matcher.model_weight, 0.6);
        assert_eq!(config.matcher.acceptance_threshold, 0.7);
        assert_eq!(config.matcher.manufacturer_weight, 0.25);
        assert_eq!(config.normalize, NormalizeConfig::default());
        assert_eq!(config.output.path, PathBuf::from("results.json"));
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
output:
  path: "/tmp/out.txt"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = ListmatchConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output.path, PathBuf::from("/tmp/out.txt"));
    }

    #[test]
    fn test_missing_version_defaults() {
        let config = ListmatchConfig::from_yaml("name: bare\n").unwrap();
        assert_eq!(config.version, "1.0");
    }

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            ListmatchConfig::default().output.path,
            PathBuf::from("results.json")
        );
        let config = ListmatchConfig::from_yaml("output: {}\n").unwrap();
        assert_eq!(config.output.path, PathBuf::from("results.json"));
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = ListmatchConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        let result = ListmatchConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(
            result,
            Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"
        ));
    }

    #[test]
    fn test_stop_word_validation() {
        let yaml = r#"
version: "1.0"
normalize:
  stop_words: ["GmbH"]
"#;

        let err = ListmatchConfig::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Validation(_)));
        assert!(err.to_string().contains("normalize"));
    }

    #[test]
    fn test_matcher_validation() {
        let yaml = r#"
version: "1.0"
matcher:
  manufacturer_weight: 0.0
"#;

        let err = ListmatchConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("manufacturer_weight"));
    }

    #[test]
    fn test_bad_yaml() {
        let result = ListmatchConfig::from_yaml("matcher: [unclosed");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = ListmatchConfig::from_file(dir.path().join("nope.yaml"));
        assert!(matches!(result, Err(ConfigLoadError::FileRead(_))));
    }

    #[test]
    fn test_full_yaml_roundtrip() {
        let config = ListmatchConfig {
            name: Some("roundtrip".into()),
            ..ListmatchConfig::default()
        };
        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = ListmatchConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
