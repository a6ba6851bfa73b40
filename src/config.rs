//! Generator configuration
//!
//! Resolved in three layers: `samplegen.toml` (or an explicit `--config` path),
//! then `SAMPLEGEN_*` environment variables, then command-line flags.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "samplegen.toml";
pub const ENV_BINARY: &str = "SAMPLEGEN_BINARY";
pub const ENV_SAMPLES_DIR: &str = "SAMPLEGEN_SAMPLES_DIR";

/// Configuration for a generation run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Scaffolding CLI to drive
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Directory the sample project is generated under
    #[serde(default = "default_samples_dir")]
    pub samples_dir: PathBuf,
    /// Go toolchain used for `mod tidy`
    #[serde(default = "default_go")]
    pub go: String,
    /// Make used for `fmt`
    #[serde(default = "default_make")]
    pub make: String,
    /// Extra `KEY=VALUE` pairs exported to every command
    #[serde(default = "default_env")]
    pub env: Vec<String>,
    #[serde(default)]
    pub sample: SampleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleSection {
    /// Directory name of the sample under `samples_dir`
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_domain")]
    pub domain: String,
    #[serde(default = "default_group")]
    pub group: String,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Go module path passed to `init --repo`
    #[serde(default = "default_repo")]
    pub repo: String,
    /// Operand image for the deploy-image plugin
    #[serde(default = "default_image")]
    pub image: String,
}

fn default_binary() -> PathBuf {
    PathBuf::from("operator-sdk")
}
fn default_samples_dir() -> PathBuf {
    PathBuf::from("testdata/go/v3")
}
fn default_go() -> String {
    "go".to_string()
}
fn default_make() -> String {
    "make".to_string()
}
fn default_env() -> Vec<String> {
    vec!["GO111MODULE=on".to_string()]
}
fn default_name() -> String {
    "memcached-operator".to_string()
}
fn default_domain() -> String {
    "example.com".to_string()
}
fn default_group() -> String {
    "cache".to_string()
}
fn default_version() -> String {
    "v1alpha1".to_string()
}
fn default_kind() -> String {
    "Memcached".to_string()
}
fn default_repo() -> String {
    "github.com/example/memcached-operator".to_string()
}
fn default_image() -> String {
    "memcached:1.4.36-alpine".to_string()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            samples_dir: default_samples_dir(),
            go: default_go(),
            make: default_make(),
            env: default_env(),
            sample: SampleSection::default(),
        }
    }
}

impl Default for SampleSection {
    fn default() -> Self {
        Self {
            name: default_name(),
            domain: default_domain(),
            group: default_group(),
            version: default_version(),
            kind: default_kind(),
            repo: default_repo(),
            image: default_image(),
        }
    }
}

impl GeneratorConfig {
    /// Load from an explicit path, or `./samplegen.toml` if present, or defaults.
    /// Environment overrides are applied on top.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => {
                let local = Path::new(CONFIG_FILE);
                if local.exists() {
                    Self::from_file(local)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }

    /// Apply `SAMPLEGEN_*` overrides using the given lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(binary) = lookup(ENV_BINARY).filter(|v| !v.is_empty()) {
            self.binary = PathBuf::from(binary);
        }
        if let Some(dir) = lookup(ENV_SAMPLES_DIR).filter(|v| !v.is_empty()) {
            self.samples_dir = PathBuf::from(dir);
        }
    }

    /// Directory the sample is generated into
    pub fn sample_dir(&self) -> PathBuf {
        self.samples_dir.join(&self.sample.name)
    }

    /// Split `env` entries into key/value pairs
    pub fn env_pairs(&self) -> Result<Vec<(String, String)>> {
        self.env
            .iter()
            .map(|entry| match entry.split_once('=') {
                Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
                _ => anyhow::bail!("Invalid env entry '{}', expected KEY=VALUE", entry),
            })
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        let s = &self.sample;
        for (field, value) in [
            ("name", &s.name),
            ("domain", &s.domain),
            ("group", &s.group),
            ("version", &s.version),
            ("kind", &s.kind),
            ("repo", &s.repo),
        ] {
            if value.trim().is_empty() {
                anyhow::bail!("sample.{} must not be empty", field);
            }
        }
        self.env_pairs()?;
        Ok(())
    }
}
