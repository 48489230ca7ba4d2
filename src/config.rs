use crate::lister::DEFAULT_KEYWORDS;
use crate::report::OutputFormat;
use anyhow::Result;
use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration loaded from CLI, optionally merged with a TOML file
///
/// Every option has a default, so running without arguments lists decoders and
/// encoders from the live registry as plain text.
///
/// Example configuration file content
/// # Output: "text" or "json"
/// format = "json"
///
/// # Class substrings selecting a feature (case-insensitive)
/// keywords = ["decoder", "encoder", "parser"]
///
/// # Read a captured registry instead of the live one
/// snapshot = "registry.json"
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(version, about, long_about = None)]
#[serde(default)]
pub struct Config {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Class substring selecting a feature, repeatable
    #[arg(short, long = "keyword", default_values = DEFAULT_KEYWORDS)]
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,

    /// Read a JSON registry snapshot instead of the live registry
    #[arg(short, long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<PathBuf>,

    /// Save the inspected registry as a JSON snapshot
    #[arg(long)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub save_snapshot: Option<PathBuf>,

    /// Configuration file path; options given on the command line take precedence
    #[arg(short, long)]
    #[serde(skip)]
    pub config: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            keywords: default_keywords(),
            snapshot: None,
            save_snapshot: None,
            config: None,
        }
    }
}

impl Config {
    /// Load configuration from CLI args, optionally merging with a config file
    pub fn load() -> Result<Self> {
        let matches = Config::command().get_matches();
        let config = Self::from_matches(&matches)?;

        config.validate()?;
        Ok(config)
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let mut config = Config::from_arg_matches(matches)?;

        if let Some(config_path) = &config.config {
            let file_config = Self::from_file(Path::new(config_path))?;
            let explicit = CliExplicit::from_matches(matches);
            config = config.merge_with_file(file_config, explicit);
        }

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Merge with file config, CLI args take precedence
    fn merge_with_file(mut self, file_config: Config, explicit: CliExplicit) -> Self {
        // Values the CLI only filled from defaults yield to the file
        if !explicit.format {
            self.format = file_config.format;
        }
        if !explicit.keywords {
            self.keywords = file_config.keywords;
        }

        // For Option fields, CLI takes precedence if Some
        if self.snapshot.is_none() {
            self.snapshot = file_config.snapshot;
        }
        if self.save_snapshot.is_none() {
            self.save_snapshot = file_config.save_snapshot;
        }

        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.keywords.is_empty() {
            return Err(anyhow::anyhow!("At least one class keyword is required"));
        }
        if self.keywords.iter().any(|keyword| keyword.trim().is_empty()) {
            return Err(anyhow::anyhow!("Class keywords cannot be empty"));
        }

        if let (Some(snapshot), Some(save_snapshot)) = (&self.snapshot, &self.save_snapshot) {
            if snapshot == save_snapshot {
                return Err(anyhow::anyhow!(
                    "Snapshot input and output are the same file: {}",
                    snapshot.display()
                ));
            }
        }

        Ok(())
    }
}

/// Options whose value was typed on the command line rather than defaulted.
#[derive(Debug, Clone, Copy, Default)]
struct CliExplicit {
    format: bool,
    keywords: bool,
}

impl CliExplicit {
    fn from_matches(matches: &ArgMatches) -> Self {
        let on_cli = |id: &str| matches.value_source(id) == Some(ValueSource::CommandLine);
        Self {
            format: on_cli("format"),
            keywords: on_cli("keywords"),
        }
    }
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.iter().map(|keyword| keyword.to_string()).collect()
}
