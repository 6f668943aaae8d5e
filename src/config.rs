//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/pruefer/pruefer.toml`
//! 3. Local config: `<dir>/.pruefer.toml` (working directory or `-C <dir>`)
//! 4. Environment variables: `PRUEFER_*` prefix
//!
//! Command line flags override all of these.

use std::fmt;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::DecoderKind;

/// How a decoded tree is printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Edge set: `{(1, 2), (2, 3)}`
    #[default]
    Edges,
    /// Rooted tree drawing
    Tree,
    /// One `u v` edge per line
    Plain,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Edges => "edges",
            OutputFormat::Tree => "tree",
            OutputFormat::Plain => "plain",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s.trim(), true)
    }
}

/// Unified configuration for pruefer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Decoding algorithm (default: degree-counting)
    pub algorithm: DecoderKind,
    /// Root vertex for the tree drawing (default: 1)
    pub root: usize,
    /// Output format (default: edges)
    pub format: OutputFormat,
    /// Cross-check every decode against the other algorithm
    pub verify: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            algorithm: DecoderKind::default(),
            root: 1,
            format: OutputFormat::default(),
            verify: false,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub algorithm: Option<DecoderKind>,
    pub root: Option<usize>,
    pub format: Option<OutputFormat>,
    pub verify: Option<bool>,
}

/// Get the XDG config directory for pruefer.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pruefer").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("pruefer.toml"))
}

/// Where settings come from, besides the local directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSources {
    /// Global config file, if any
    pub global: Option<PathBuf>,
    /// Read `PRUEFER_*` environment variables
    pub env: bool,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self::system()
    }
}

impl ConfigSources {
    /// XDG global config and the process environment.
    pub fn system() -> Self {
        Self {
            global: global_config_path(),
            env: true,
        }
    }

    /// Defaults and local config only.
    pub fn isolated() -> Self {
        Self {
            global: None,
            env: false,
        }
    }

    pub fn with_global(mut self, path: impl Into<PathBuf>) -> Self {
        self.global = Some(path.into());
        self
    }
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".pruefer.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> ApplicationResult<RawSettings> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            algorithm: overlay.algorithm.unwrap_or(self.algorithm),
            root: overlay.root.unwrap_or(self.root),
            format: overlay.format.unwrap_or(self.format),
            verify: overlay.verify.unwrap_or(self.verify),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.pruefer.toml`
    pub fn load(local_dir: Option<&Path>) -> ApplicationResult<Self> {
        Self::load_from(&ConfigSources::system(), local_dir)
    }

    /// Load settings with layered precedence from explicit sources.
    pub fn load_from(sources: &ConfigSources, local_dir: Option<&Path>) -> ApplicationResult<Self> {
        let mut current = Self::default();

        if let Some(global_path) = &sources.global {
            if global_path.exists() {
                debug!("load: global config {}", global_path.display());
                current = current.merge_with(&load_raw_settings(global_path)?);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                debug!("load: local config {}", local_path.display());
                current = current.merge_with(&load_raw_settings(&local_path)?);
            }
        }

        if sources.env {
            current =
                current.apply_env(Environment::with_prefix("PRUEFER").prefix_separator("_"))?;
        }
        current.validate()?;
        Ok(current)
    }

    /// Load settings from a single file on top of defaults, ignoring env vars.
    pub fn load_file(path: &Path) -> ApplicationResult<Self> {
        let settings = Self::default().merge_with(&load_raw_settings(path)?);
        settings.validate()?;
        Ok(settings)
    }

    /// Apply `PRUEFER_*` variables as explicit overrides.
    fn apply_env(mut self, environment: Environment) -> ApplicationResult<Self> {
        let config = Config::builder()
            .add_source(environment)
            .build()
            .map_err(config_err)?;

        if let Some(val) = lookup(&config, "algorithm")? {
            self.algorithm = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("PRUEFER_ALGORITHM: {e}"),
            })?;
        }
        if let Some(val) = lookup(&config, "root")? {
            self.root = val.trim().parse().map_err(|_| ApplicationError::Config {
                message: format!("PRUEFER_ROOT: '{val}' is not a vertex label"),
            })?;
        }
        if let Some(val) = lookup(&config, "format")? {
            self.format = val.parse().map_err(|e| ApplicationError::Config {
                message: format!("PRUEFER_FORMAT: {e}"),
            })?;
        }
        if let Some(val) = lookup(&config, "verify")? {
            self.verify = parse_bool(&val).ok_or_else(|| ApplicationError::Config {
                message: format!("PRUEFER_VERIFY: '{val}' is not a boolean"),
            })?;
        }

        Ok(self)
    }

    fn validate(&self) -> ApplicationResult<()> {
        if self.root == 0 {
            return Err(ApplicationError::Config {
                message: "root must be a vertex label (>= 1)".to_string(),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> ApplicationResult<String> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# pruefer configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/pruefer/pruefer.toml
#   Local:  ./.pruefer.toml (or the directory given with -C)
#   Env:    PRUEFER_* environment variables
#
# Command line flags override everything above.

# Decoding algorithm: "degree-counting" or "exclusion-set"
# algorithm = "degree-counting"

# Root vertex used when drawing the tree
# root = 1

# Output format: "edges", "tree" or "plain"
# format = "edges"

# Cross-check every decode against the other algorithm
# verify = false
"#
        .to_string()
    }
}

fn lookup(config: &Config, key: &str) -> ApplicationResult<Option<String>> {
    match config.get_string(key) {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix("PRUEFER")
            .prefix_separator("_")
            .source(Some(source))
    }

    #[test]
    fn given_no_overlay_when_merging_then_keeps_defaults() {
        let merged = Settings::default().merge_with(&RawSettings::default());
        assert_eq!(merged, Settings::default());
    }

    #[test]
    fn given_partial_overlay_when_merging_then_overlay_wins() {
        let overlay = RawSettings {
            algorithm: Some(DecoderKind::ExclusionSet),
            verify: Some(true),
            ..Default::default()
        };
        let merged = Settings::default().merge_with(&overlay);
        assert_eq!(merged.algorithm, DecoderKind::ExclusionSet);
        assert!(merged.verify);
        assert_eq!(merged.root, 1);
        assert_eq!(merged.format, OutputFormat::Edges);
    }

    #[test]
    fn given_env_vars_when_applying_then_overrides() {
        let settings = Settings::default()
            .apply_env(env(&[
                ("PRUEFER_ALGORITHM", "exclusion-set"),
                ("PRUEFER_ROOT", "3"),
                ("PRUEFER_FORMAT", "tree"),
                ("PRUEFER_VERIFY", "yes"),
            ]))
            .unwrap();
        assert_eq!(settings.algorithm, DecoderKind::ExclusionSet);
        assert_eq!(settings.root, 3);
        assert_eq!(settings.format, OutputFormat::Tree);
        assert!(settings.verify);
    }

    #[test]
    fn given_bad_env_var_when_applying_then_config_error() {
        let result = Settings::default().apply_env(env(&[("PRUEFER_ALGORITHM", "random")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));

        let result = Settings::default().apply_env(env(&[("PRUEFER_VERIFY", "maybe")]));
        assert!(matches!(result, Err(ApplicationError::Config { .. })));
    }

    #[test]
    fn given_zero_root_when_validating_then_fails() {
        let settings = Settings {
            root: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn given_template_when_parsing_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.algorithm.is_none());
    }

    #[test]
    fn given_settings_when_serializing_then_round_trips() {
        let settings = Settings {
            algorithm: DecoderKind::ExclusionSet,
            root: 2,
            format: OutputFormat::Plain,
            verify: true,
        };
        let text = settings.to_toml().unwrap();
        assert!(text.contains("algorithm = \"exclusion-set\""));
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}
