//! Configuration types for eir.
//!
//! [`Config::load`] reads `~/.config/eir/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist, then applies `EIR_*`
//! environment overrides (`EIR_SEARCH__THRESHOLD=0.25`).
//! [`Config::defaults`] returns the same defaults without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[search]
threshold         = 0.3
min_match_chars   = 2
max_pattern_chars = 32
max_query_chars   = 256
max_field_chars   = 4096

[search.weights]
name         = 0.5
common_name  = 0.3
provider_ref = 0.2
provider     = 0.1
machine      = 0.1

[catalog]
source      = "file"
path        = "data/spare_parts_data.json"
url         = "http://127.0.0.1:3000/api/parts"
watch       = true
debounce_ms = 500

[server]
bind = "127.0.0.1:8080"
"#;

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/eir/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// `[search]` section of `config.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchConfig {
    /// Highest accepted `errors / query_len` for a fuzzy match.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    #[serde(default = "default_min_match_chars")]
    pub min_match_chars: usize,
    #[serde(default = "default_max_pattern_chars")]
    pub max_pattern_chars: usize,
    /// Query text beyond this many characters is ignored.
    #[serde(default = "default_max_query_chars")]
    pub max_query_chars: usize,
    /// Field text beyond this many characters is not searched.
    #[serde(default = "default_max_field_chars")]
    pub max_field_chars: usize,
    #[serde(default)]
    pub weights: FieldWeights,
}

fn default_threshold() -> f64 { 0.3 }
fn default_min_match_chars() -> usize { 2 }
fn default_max_pattern_chars() -> usize { 32 }
fn default_max_query_chars() -> usize { 256 }
fn default_max_field_chars() -> usize { 4096 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            min_match_chars: default_min_match_chars(),
            max_pattern_chars: default_max_pattern_chars(),
            max_query_chars: default_max_query_chars(),
            max_field_chars: default_max_field_chars(),
            weights: FieldWeights::default(),
        }
    }
}

/// `[search.weights]`: relative weight of each searched field.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FieldWeights {
    #[serde(default = "default_name_weight")]
    pub name: f64,
    #[serde(default = "default_common_name_weight")]
    pub common_name: f64,
    #[serde(default = "default_provider_ref_weight")]
    pub provider_ref: f64,
    #[serde(default = "default_provider_weight")]
    pub provider: f64,
    #[serde(default = "default_machine_weight")]
    pub machine: f64,
}

fn default_name_weight() -> f64 { 0.5 }
fn default_common_name_weight() -> f64 { 0.3 }
fn default_provider_ref_weight() -> f64 { 0.2 }
fn default_provider_weight() -> f64 { 0.1 }
fn default_machine_weight() -> f64 { 0.1 }

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: default_name_weight(),
            common_name: default_common_name_weight(),
            provider_ref: default_provider_ref_weight(),
            provider: default_provider_weight(),
            machine: default_machine_weight(),
        }
    }
}

/// Where the raw catalog comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    File,
    Http,
    Stdin,
}

impl std::str::FromStr for SourceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(SourceKind::File),
            "http" => Ok(SourceKind::Http),
            "stdin" => Ok(SourceKind::Stdin),
            other => Err(format!("unknown catalog source {other:?}")),
        }
    }
}

/// `[catalog]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_source")]
    pub source: SourceKind,
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    #[serde(default = "default_catalog_url")]
    pub url: String,
    /// Rebuild the index when the catalog file changes (`serve` only).
    #[serde(default = "default_watch")]
    pub watch: bool,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

fn default_source() -> SourceKind { SourceKind::File }
fn default_catalog_path() -> PathBuf { PathBuf::from("data/spare_parts_data.json") }
fn default_catalog_url() -> String { "http://127.0.0.1:3000/api/parts".to_string() }
fn default_watch() -> bool { true }
fn default_debounce_ms() -> u64 { 500 }

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            path: default_catalog_path(),
            url: default_catalog_url(),
            watch: default_watch(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// `[server]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String { "127.0.0.1:8080".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load from `~/.config/eir/config.toml`, layered on top of the built-in
    /// defaults. Creates the file with defaults if it does not exist.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(None)
    }

    /// Like [`Config::load`], with `extra` layered above the user config file.
    pub fn load_from(extra: Option<&Path>) -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .add_source(config::File::from(path.as_path()).required(false));
        if let Some(extra) = extra {
            builder = builder.add_source(config::File::from(extra).required(true));
        }

        let cfg: Self = builder
            .add_source(
                config::Environment::with_prefix("EIR")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }

    /// Reject values the search layer cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        let search = &self.search;
        anyhow::ensure!(
            (0.0..=1.0).contains(&search.threshold),
            "search.threshold must be within 0.0..=1.0, got {}",
            search.threshold
        );
        anyhow::ensure!(search.min_match_chars >= 1, "search.min_match_chars must be at least 1");
        anyhow::ensure!(
            search.max_pattern_chars >= 1,
            "search.max_pattern_chars must be at least 1"
        );
        anyhow::ensure!(search.max_query_chars >= 1, "search.max_query_chars must be at least 1");
        anyhow::ensure!(search.max_field_chars >= 1, "search.max_field_chars must be at least 1");
        let w = search.weights;
        anyhow::ensure!(
            [w.name, w.common_name, w.provider_ref, w.provider, w.machine]
                .iter()
                .all(|weight| *weight > 0.0),
            "search.weights must all be positive"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("eir")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert_eq!(cfg.search.threshold, 0.3);
        assert_eq!(cfg.search.min_match_chars, 2);
        assert_eq!(cfg.search.max_query_chars, 256);
        assert_eq!(cfg.search.weights.name, 0.5);
        assert_eq!(cfg.search.weights.machine, 0.1);
        assert_eq!(cfg.catalog.source, SourceKind::File);
        assert_eq!(cfg.server.bind, "127.0.0.1:8080");
        cfg.validate().unwrap();
    }

    #[test]
    fn embedded_defaults_match_struct_defaults() {
        assert_eq!(Config::defaults().search, SearchConfig::default());
    }

    #[test]
    fn validate_rejects_out_of_range_threshold() {
        let mut cfg = Config::defaults();
        cfg.search.threshold = 1.5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_query_cap() {
        let mut cfg = Config::defaults();
        cfg.search.max_query_chars = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn source_kind_parses() {
        assert_eq!("HTTP".parse::<SourceKind>(), Ok(SourceKind::Http));
        assert!("ftp".parse::<SourceKind>().is_err());
    }
}
