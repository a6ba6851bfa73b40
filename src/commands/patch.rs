use anyhow::{Context, Result};
use colored::Colorize;
use samplegen::patch::{self, PatchMode};
use std::fs;
use std::path::{Path, PathBuf};

pub fn uncomment(file: &Path, marker: Option<String>, marker_file: Option<PathBuf>, prefix: &str) -> Result<()> {
    let marker = read_marker(marker, marker_file)?;
    execute(file, &marker, &PatchMode::uncomment(prefix))
}

pub fn insert(
    file: &Path,
    marker: Option<String>,
    marker_file: Option<PathBuf>,
    payload: Option<String>,
    payload_file: Option<PathBuf>,
) -> Result<()> {
    let marker = read_marker(marker, marker_file)?;
    let payload = read_payload(payload, payload_file)?;
    execute(file, &marker, &PatchMode::insert_after(payload))
}

pub fn replace(
    file: &Path,
    marker: Option<String>,
    marker_file: Option<PathBuf>,
    payload: Option<String>,
    payload_file: Option<PathBuf>,
) -> Result<()> {
    let marker = read_marker(marker, marker_file)?;
    let payload = read_payload(payload, payload_file)?;
    execute(file, &marker, &PatchMode::replace(payload))
}

fn execute(file: &Path, marker: &str, mode: &PatchMode) -> Result<()> {
    patch::patch_file(file, marker, mode)
        .with_context(|| format!("{} patch failed", mode.name()))?;
    println!("{} {} {}", "✓".green(), mode.name(), file.display());
    Ok(())
}

/// Marker files usually end with a newline the marker itself does not carry
fn read_marker(literal: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (literal, file) {
        (Some(marker), _) => Ok(marker),
        (None, Some(path)) => {
            let content = read(&path)?;
            Ok(content
                .strip_suffix('\n')
                .map(str::to_string)
                .unwrap_or(content))
        }
        (None, None) => anyhow::bail!("A marker is required (--marker or --marker-file)"),
    }
}

fn read_payload(literal: Option<String>, file: Option<PathBuf>) -> Result<String> {
    match (literal, file) {
        (Some(payload), _) => Ok(payload),
        (None, Some(path)) => read(&path),
        (None, None) => anyhow::bail!("A payload is required (--payload or --payload-file)"),
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_marker_file_trailing_newline_trimmed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("marker.txt");
        fs::write(&path, "#- ../webhook\n").unwrap();
        assert_eq!(read_marker(None, Some(path)).unwrap(), "#- ../webhook");
    }

    #[test]
    fn test_payload_file_kept_verbatim() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("payload.txt");
        fs::write(&path, "\n\"errors\"\n").unwrap();
        assert_eq!(read_payload(None, Some(path)).unwrap(), "\n\"errors\"\n");
    }

    #[test]
    fn test_literal_wins() {
        assert_eq!(read_marker(Some("x".to_string()), None).unwrap(), "x");
        assert!(read_payload(None, None).is_err());
    }
}
