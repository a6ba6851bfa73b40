use anyhow::{Context, Result};
use samplegen::config::GeneratorConfig;
use samplegen::preflight;
use samplegen::sample::memcached::{self, ProjectLayout};
use std::path::{Path, PathBuf};

pub struct GenerateOptions<'a> {
    pub config: Option<&'a Path>,
    pub binary: Option<PathBuf>,
    pub samples_dir: Option<PathBuf>,
    pub layout: Option<ProjectLayout>,
    pub skip_preflight: bool,
}

pub fn execute(options: GenerateOptions<'_>) -> Result<()> {
    let mut config = GeneratorConfig::load(options.config).context("loading configuration")?;

    // Flags win over file and environment
    if let Some(binary) = options.binary {
        config.binary = binary;
    }
    if let Some(dir) = options.samples_dir {
        config.samples_dir = dir;
    }

    if options.skip_preflight {
        tracing::warn!("skipping preflight checks");
    } else {
        preflight::check_tools(&config).ensure_ready()?;
    }

    memcached::generate_sample(&config, options.layout)
}
