use crate::source::DataFormat;
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Analysis configuration.
///
/// Loaded from an optional TOML file in the data directory and validated
/// before use. See [`Config::from_file`] for loading.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Where the inflammation data comes from.
    pub source: SourceConfig,
    /// Where the results are written.
    pub output: OutputConfig,
}

#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    /// Format of the `inflammation*` data files.
    pub format: DataFormat,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// File name of the cross-dataset analysis results.
    pub results_file: String,
    /// File name of the per-dataset daily statistics.
    pub stats_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_file: "results.json".to_string(),
            stats_file: "stats.json".to_string(),
        }
    }
}

impl Config {
    /// Load a [`Config`] from a TOML file.
    ///
    /// Missing sections and keys take their default values.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, deserialized,
    /// or if the configuration values are invalid.
    pub fn from_file<P: AsRef<Path>>(file: P) -> Result<Self> {
        let file = file.as_ref();
        let contents =
            fs::read_to_string(file).with_context(|| format!("failed to read {file:?}"))?;

        Self::from_toml(&contents)
    }

    /// Load the config file of a data directory, if there is one.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let file = dir.as_ref().join("config.toml");
        if !file.is_file() {
            log::info!("no {file:?}, using the default config");
            return Ok(Self::default());
        }
        Self::from_file(&file).with_context(|| format!("failed to load {file:?}"))
    }

    fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("failed to deserialize config")?;

        config.validate().context("failed to validate config")?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        check_file_name(&self.output.results_file).context("invalid results file")?;
        check_file_name(&self.output.stats_file).context("invalid stats file")?;

        if self.output.results_file == self.output.stats_file {
            bail!("results and stats must be written to different files");
        }

        Ok(())
    }
}

fn check_file_name(name: &str) -> Result<()> {
    let path = Path::new(name);
    if name.is_empty() || path.file_name().and_then(|n| n.to_str()) != Some(name) {
        bail!("{name:?} must be a plain file name");
    }
    if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
        bail!("{name:?} must have the json extension");
    }
    // Must not be picked up again as input data.
    if name.starts_with("inflammation") {
        bail!("{name:?} must not start with \"inflammation\"");
    }
    Ok(())
}
