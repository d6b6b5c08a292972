use crate::cli::RunArgs;
use crate::error::{CliError, Result};
use cosmoprop::engine::config::{StepConfig, StepConfigBuilder};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialExecutionConfig {
    prefix: Option<String>,
    binary: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialArgumentsConfig {
    #[serde(default)]
    flags: Vec<String>,
    #[serde(default)]
    parameters: BTreeMap<String, Vec<String>>,
    #[serde(rename = "input-deck-file")]
    input_deck_file: Option<String>,
}

/// The step configuration as written in a TOML file, before CLI overrides.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialStepConfig {
    execution: Option<PartialExecutionConfig>,
    arguments: Option<PartialArgumentsConfig>,
}

impl PartialStepConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Applies CLI overrides and produces the final step configuration.
    ///
    /// Relative `input-deck-file` paths are resolved against `base_dir`, the
    /// directory of the configuration file. An input deck is required from one
    /// of `--input-deck`, `input-deck-file` or `parameters."cosmotherm.inp"`, in
    /// that order of precedence.
    pub fn merge_with_cli(self, args: &RunArgs, base_dir: &Path) -> Result<StepConfig> {
        let execution = self.execution.unwrap_or_default();
        let arguments = self.arguments.unwrap_or_default();

        let mut builder = StepConfigBuilder::new();
        if let Some(prefix) = args.prefix.as_ref().or(execution.prefix.as_ref()) {
            builder = builder.prefix(prefix);
        }
        if let Some(binary) = args.binary.as_ref().or(execution.binary.as_ref()) {
            builder = builder.binary(binary);
        }
        for flag in &arguments.flags {
            builder = builder.flag(flag);
        }
        for (name, lines) in arguments.parameters {
            builder = builder.parameter(&name, lines);
        }

        let deck_file = args
            .input_deck
            .clone()
            .or_else(|| arguments.input_deck_file.map(|p| base_dir.join(p)));
        if let Some(path) = deck_file {
            debug!("Reading input deck from {:?}", path);
            let lines = std::fs::read_to_string(&path)?
                .lines()
                .map(str::to_string)
                .collect();
            builder = builder.input_deck(lines);
        }

        let config = builder.build();
        config
            .input_deck()
            .map_err(|e| CliError::Config(format!("{e}. Provide it in the config file or with --input-deck.")))?;
        Ok(config)
    }
}
