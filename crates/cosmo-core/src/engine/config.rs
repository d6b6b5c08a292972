use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Parameter whose lines are written verbatim as the COSMOtherm input deck.
pub const INPUT_DECK_PARAMETER: &str = "cosmotherm.inp";
/// Executable invoked when the configuration does not name one.
pub const DEFAULT_BINARY: &str = "cosmotherm";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

fn default_binary() -> String {
    DEFAULT_BINARY.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Shell command run before the tool, e.g. `module load COSMOtherm/20.0.0`.
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default = "default_binary")]
    pub binary: String,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            prefix: None,
            binary: default_binary(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArgumentsConfig {
    /// Bare command-line flags passed to the tool before the input deck.
    #[serde(default)]
    pub flags: Vec<String>,
    /// Named parameters, each a list of lines.
    #[serde(default)]
    pub parameters: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StepConfig {
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub arguments: ArgumentsConfig,
}

impl StepConfig {
    /// Loads a step configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Returns the input deck lines.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingParameter`] if no deck was configured.
    pub fn input_deck(&self) -> Result<&[String], ConfigError> {
        self.arguments
            .parameters
            .get(INPUT_DECK_PARAMETER)
            .map(Vec::as_slice)
            .ok_or(ConfigError::MissingParameter(
                "arguments.parameters.\"cosmotherm.inp\"",
            ))
    }

    /// The prefix command, with blank prefixes treated as absent.
    pub fn prefix(&self) -> Option<&str> {
        self.execution
            .prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}

#[derive(Default)]
pub struct StepConfigBuilder {
    prefix: Option<String>,
    binary: Option<String>,
    flags: Vec<String>,
    parameters: BTreeMap<String, Vec<String>>,
}

impl StepConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prefix(mut self, prefix: &str) -> Self {
        self.prefix = Some(prefix.to_string());
        self
    }
    pub fn binary(mut self, binary: &str) -> Self {
        self.binary = Some(binary.to_string());
        self
    }
    pub fn flag(mut self, flag: &str) -> Self {
        self.flags.push(flag.to_string());
        self
    }
    pub fn parameter(mut self, name: &str, lines: Vec<String>) -> Self {
        self.parameters.insert(name.to_string(), lines);
        self
    }
    pub fn input_deck(self, lines: Vec<String>) -> Self {
        self.parameter(INPUT_DECK_PARAMETER, lines)
    }

    pub fn build(self) -> StepConfig {
        StepConfig {
            execution: ExecutionConfig {
                prefix: self.prefix,
                binary: self.binary.unwrap_or_else(default_binary),
            },
            arguments: ArgumentsConfig {
                flags: self.flags,
                parameters: self.parameters,
            },
        }
    }
}
