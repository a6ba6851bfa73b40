//! Patch module - marker-based text patching of generated files
//!
//! A patch locates an exact literal snippet (the marker) in a file and either
//! uncomments it line by line, inserts a payload right after it, or replaces it.
//! Markers are matched verbatim, whitespace and line breaks included; this is
//! a substring operation, not a YAML or Go aware edit.
//!
//! When the marker is missing the operation fails and the file is left as it was.
//!
//! # Example
//!
//! ```no_run
//! use samplegen::patch;
//! use std::path::Path;
//!
//! let kustomization = Path::new("config/default/kustomization.yaml");
//! patch::uncomment_code(kustomization, "#- ../webhook", "#")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod internal;

use std::path::{Path, PathBuf};

use thiserror::Error;

/// What to do with the marker once it is found
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchMode {
    /// Strip `prefix` from every line of the first occurrence of the marker
    Uncomment { prefix: String },
    /// Insert `payload` immediately after the first occurrence of the marker
    InsertAfter { payload: String },
    /// Replace every occurrence of the marker with `payload`
    Replace { payload: String },
}

impl PatchMode {
    pub fn uncomment(prefix: impl Into<String>) -> Self {
        Self::Uncomment {
            prefix: prefix.into(),
        }
    }

    pub fn insert_after(payload: impl Into<String>) -> Self {
        Self::InsertAfter {
            payload: payload.into(),
        }
    }

    pub fn replace(payload: impl Into<String>) -> Self {
        Self::Replace {
            payload: payload.into(),
        }
    }

    /// Short name used in log lines
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uncomment { .. } => "uncomment",
            Self::InsertAfter { .. } => "insert",
            Self::Replace { .. } => "replace",
        }
    }
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("unable to find marker `{}`", preview(.marker))]
    MarkerNotFound { marker: String },

    #[error("unable to find marker `{}` in {}", preview(.marker), .path.display())]
    MarkerNotInFile { path: PathBuf, marker: String },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PatchError {
    /// True when the failure is a missing marker rather than an I/O problem
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::MarkerNotFound { .. } | Self::MarkerNotInFile { .. }
        )
    }
}

/// First line of a marker, enough to identify it in an error message
fn preview(marker: &str) -> String {
    let mut lines = marker.lines();
    let first = lines.next().unwrap_or_default();
    if lines.next().is_some() {
        format!("{first} ...")
    } else {
        first.to_string()
    }
}

/// Apply `mode` at `marker` to `content` and return the new content
pub fn apply(content: &str, marker: &str, mode: &PatchMode) -> Result<String, PatchError> {
    internal::apply(content, marker, mode)
}

/// Patch a file in place
///
/// The file is rewritten only when the marker was found.
pub fn patch_file(path: &Path, marker: &str, mode: &PatchMode) -> Result<(), PatchError> {
    internal::patch_file(path, marker, mode)
}

/// Uncomment the marked block by stripping `prefix` from each of its lines
pub fn uncomment_code(path: &Path, marker: &str, prefix: &str) -> Result<(), PatchError> {
    patch_file(path, marker, &PatchMode::uncomment(prefix))
}

/// Insert `payload` right after the first occurrence of `marker`
pub fn insert_code(path: &Path, marker: &str, payload: &str) -> Result<(), PatchError> {
    patch_file(path, marker, &PatchMode::insert_after(payload))
}

/// Replace every occurrence of `old` with `new`
pub fn replace_in_file(path: &Path, old: &str, new: &str) -> Result<(), PatchError> {
    patch_file(path, old, &PatchMode::replace(new))
}
