//! Configuration file loading for patchform.
//!
//! Discovers and loads `patchform.toml` from the working directory.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use patchform_core::EngineSettings;
use patchform_core::adapters::DocumentFormat;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "patchform.toml";

/// Top-level configuration from patchform.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PatchformConfig {
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

/// `[engine]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Cache lifetime reported in responses.
    pub ttl_seconds: Option<u64>,

    /// Context key the environment travels under.
    pub environment_key: Option<String>,

    /// Copy observed names onto rendered resources.
    pub preserve_identity: Option<bool>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

/// Encoding of the rendered response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
}

impl From<OutputFormat> for DocumentFormat {
    fn from(f: OutputFormat) -> Self {
        match f {
            OutputFormat::Json => DocumentFormat::Json,
            OutputFormat::Yaml => DocumentFormat::Yaml,
        }
    }
}

/// Discover the patchform.toml config file in `dir`.
pub fn discover_config(dir: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a patchform.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<PatchformConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

/// Parse a config file from a string.
pub fn parse_config(contents: &str) -> anyhow::Result<PatchformConfig> {
    let config: PatchformConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from `dir`, or return default if not found.
pub fn load_or_default(dir: &Utf8Path) -> anyhow::Result<PatchformConfig> {
    match discover_config(dir) {
        Some(path) => load_config(&path),
        None => Ok(PatchformConfig::default()),
    }
}

/// Render flags that can override the config file.
#[derive(Debug, Clone, Default)]
pub struct RenderOverrides<'a> {
    pub ttl_seconds: Option<u64>,
    pub environment_key: Option<String>,
    pub no_preserve_identity: bool,
    pub format: Option<OutputFormat>,
    pub out: Option<&'a Utf8Path>,
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub settings: EngineSettings,
    pub format: DocumentFormat,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: PatchformConfig,
}

impl ConfigMerger {
    pub fn new(config: PatchformConfig) -> Self {
        Self { config }
    }

    /// Merge with render command arguments.
    ///
    /// The output format comes from the flag, then the config file, then the
    /// extension of `--out`, then JSON.
    pub fn merge_render_args(self, cli: RenderOverrides<'_>) -> MergedConfig {
        let defaults = EngineSettings::default();
        let engine = self.config.engine;

        let preserve_identity = if cli.no_preserve_identity {
            false
        } else {
            engine.preserve_identity.unwrap_or(defaults.preserve_identity)
        };

        let settings = EngineSettings {
            ttl_seconds: cli
                .ttl_seconds
                .or(engine.ttl_seconds)
                .unwrap_or(defaults.ttl_seconds),
            environment_key: cli
                .environment_key
                .or(engine.environment_key)
                .unwrap_or(defaults.environment_key),
            preserve_identity,
        };

        let format = cli
            .format
            .or(self.config.output.format)
            .map(DocumentFormat::from)
            .or_else(|| cli.out.map(DocumentFormat::from_path))
            .unwrap_or_default();

        MergedConfig { settings, format }
    }
}
