//! Preflight checks - ensure the external tools a generation run shells out to exist.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::GeneratorConfig;

#[derive(Debug, Clone, Serialize)]
pub struct ToolStatus {
    /// Role of the tool in the run ("scaffolding", "go", "make")
    pub role: &'static str,
    /// Name or path as configured
    pub requested: String,
    /// Resolved location, if found
    pub path: Option<PathBuf>,
}

impl ToolStatus {
    pub fn available(&self) -> bool {
        self.path.is_some()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreflightReport {
    pub tools: Vec<ToolStatus>,
}

impl PreflightReport {
    pub fn missing(&self) -> Vec<&ToolStatus> {
        self.tools.iter().filter(|t| !t.available()).collect()
    }

    pub fn is_ready(&self) -> bool {
        self.missing().is_empty()
    }

    /// Fail with one message naming every missing tool
    pub fn ensure_ready(&self) -> anyhow::Result<()> {
        let missing = self.missing();
        if missing.is_empty() {
            return Ok(());
        }
        let names: Vec<String> = missing
            .iter()
            .map(|t| format!("{} ({})", t.requested, t.role))
            .collect();
        anyhow::bail!("Required tools not found: {}", names.join(", "))
    }
}

/// Resolve the scaffolding binary, go and make
pub fn check_tools(config: &GeneratorConfig) -> PreflightReport {
    let tools = vec![
        resolve("scaffolding", &config.binary.to_string_lossy()),
        resolve("go", &config.go),
        resolve("make", &config.make),
    ];
    PreflightReport { tools }
}

fn resolve(role: &'static str, requested: &str) -> ToolStatus {
    // Paths are checked directly, bare names go through PATH
    let path = if Path::new(requested).components().count() > 1 {
        let candidate = PathBuf::from(requested);
        candidate.is_file().then_some(candidate)
    } else {
        which::which(requested).ok()
    };
    tracing::debug!(role, requested, found = path.is_some(), "preflight");
    ToolStatus {
        role,
        requested: requested.to_string(),
        path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_tools_listed() {
        let mut config = GeneratorConfig::default();
        config.binary = PathBuf::from("/nonexistent/operator-sdk");
        config.go = "definitely-not-a-real-go-binary".to_string();

        let report = check_tools(&config);
        let missing: Vec<_> = report.missing().iter().map(|t| t.role).collect();
        assert!(missing.contains(&"scaffolding"));
        assert!(missing.contains(&"go"));

        let err = report.ensure_ready().unwrap_err().to_string();
        assert!(err.contains("/nonexistent/operator-sdk (scaffolding)"));
    }

    #[test]
    fn test_explicit_path_found() {
        let tmp = TempDir::new().unwrap();
        let bin = tmp.path().join("operator-sdk");
        std::fs::write(&bin, "").unwrap();

        let status = resolve("scaffolding", &bin.to_string_lossy());
        assert!(status.available());
        assert_eq!(status.path.as_deref(), Some(bin.as_path()));
    }
}
