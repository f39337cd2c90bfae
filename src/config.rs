//! YAML Configuration File Support for sqlfp
//!
//! Loads parser and canonicalization settings from a single YAML file.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # sqlfp configuration
//! version: "1.0"
//! name: "analytics"
//!
//! parser:
//!   dialect: "postgresql"
//!   max_nesting_depth: 128
//!
//! canonical:
//!   version: 1
//!   strip_comments: true
//!   digest: "md5"
//! ```

use std::fs;
use std::path::Path;

use canonical::{CanonicalizeConfig, DigestAlgorithm};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tree::{ParserConfig, SqlDialect};

use crate::FingerprintConfig;

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

/// Top-level YAML configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SqlfpConfig {
    /// Configuration format version
    pub version: String,

    /// Optional configuration name/description
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub parser: ParserYamlConfig,

    #[serde(default)]
    pub canonical: CanonicalYamlConfig,
}

impl SqlfpConfig {
    /// Load a YAML configuration file from the given path
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: SqlfpConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.parser.validate()?;
        self.canonical.validate()?;

        Ok(())
    }

    /// Convert into the runtime configuration used by
    /// [`QueryFingerprinter`](crate::QueryFingerprinter).
    pub fn to_fingerprint_config(&self) -> Result<FingerprintConfig, ConfigLoadError> {
        Ok(FingerprintConfig {
            parser: self.parser.to_parser_config()?,
            canonical: self.canonical.to_canonical_config()?,
        })
    }
}

impl Default for SqlfpConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            parser: ParserYamlConfig::default(),
            canonical: CanonicalYamlConfig::default(),
        }
    }
}

/// Parser YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParserYamlConfig {
    #[serde(default = "default_dialect")]
    pub dialect: String,

    #[serde(default = "default_max_nesting_depth")]
    pub max_nesting_depth: usize,
}

impl ParserYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_parser_config().map(|_| ())
    }

    fn to_parser_config(&self) -> Result<ParserConfig, ConfigLoadError> {
        let dialect = SqlDialect::from_name(&self.dialect).ok_or_else(|| {
            ConfigLoadError::Validation(format!("parser.dialect '{}' is not supported", self.dialect))
        })?;
        if self.max_nesting_depth == 0 {
            return Err(ConfigLoadError::Validation(
                "parser.max_nesting_depth must be >= 1".to_string(),
            ));
        }
        Ok(ParserConfig {
            dialect,
            max_nesting_depth: self.max_nesting_depth,
        })
    }
}

impl Default for ParserYamlConfig {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            max_nesting_depth: default_max_nesting_depth(),
        }
    }
}

/// Canonicalization stage YAML configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub strip_comments: bool,

    #[serde(default = "default_digest")]
    pub digest: String,
}

impl CanonicalYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        self.to_canonical_config().map(|_| ())
    }

    fn to_canonical_config(&self) -> Result<CanonicalizeConfig, ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "canonical.version must be >= 1".to_string(),
            ));
        }
        let digest = DigestAlgorithm::from_name(&self.digest).ok_or_else(|| {
            ConfigLoadError::Validation(format!("canonical.digest '{}' is not supported", self.digest))
        })?;
        Ok(CanonicalizeConfig {
            version: self.version,
            strip_comments: self.strip_comments,
            digest,
        })
    }
}

impl Default for CanonicalYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            strip_comments: true,
            digest: default_digest(),
        }
    }
}

fn default_version() -> u32 {
    1
}
fn default_dialect() -> String {
    "generic".to_string()
}
fn default_max_nesting_depth() -> usize {
    ParserConfig::default().max_nesting_depth
}
fn default_digest() -> String {
    DigestAlgorithm::default().as_str().to_string()
}
fn true_value() -> bool {
    true
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
name: "test config"
parser:
  dialect: "mysql"
canonical:
  version: 2
  digest: "md5"
"#;

        let config = SqlfpConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));

        let runtime = config.to_fingerprint_config().unwrap();
        assert_eq!(runtime.parser.dialect, SqlDialect::MySql);
        assert_eq!(runtime.parser.max_nesting_depth, 128);
        assert_eq!(runtime.canonical.version, 2);
        assert_eq!(runtime.canonical.digest, DigestAlgorithm::Md5);
        assert!(runtime.canonical.strip_comments);
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1.0"
canonical:
  strip_comments: false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = SqlfpConfig::from_file(temp_file.path()).unwrap();
        assert!(!config.canonical.strip_comments);
    }

    #[test]
    fn test_default_config_matches_runtime_defaults() {
        let config = SqlfpConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert_eq!(
            config.to_fingerprint_config().unwrap(),
            FingerprintConfig::default()
        );
    }

    #[test]
    fn test_unsupported_version() {
        let result = SqlfpConfig::from_yaml("version: \"2.0\"\n");
        assert!(matches!(result, Err(ConfigLoadError::UnsupportedVersion(v)) if v == "2.0"));
    }

    #[test]
    fn test_canonical_validation() {
        let yaml = r#"
version: "1.0"
canonical:
  version: 0
"#;
        let result = SqlfpConfig::from_yaml(yaml);
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("canonical.version must be >= 1"));

        let yaml = r#"
version: "1.0"
canonical:
  digest: "crc32"
"#;
        let result = SqlfpConfig::from_yaml(yaml);
        assert!(result.unwrap_err().to_string().contains("digest"));
    }

    #[test]
    fn test_parser_validation() {
        let yaml = r#"
version: "1.0"
parser:
  dialect: "oracle"
"#;
        let result = SqlfpConfig::from_yaml(yaml);
        assert!(result.unwrap_err().to_string().contains("dialect"));

        let yaml = r#"
version: "1.0"
parser:
  max_nesting_depth: 0
"#;
        let result = SqlfpConfig::from_yaml(yaml);
        assert!(matches!(result, Err(ConfigLoadError::Validation(_))));
    }

    #[test]
    fn test_malformed_yaml() {
        let result = SqlfpConfig::from_yaml("version: [unterminated");
        assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
    }
}
