//! Internal implementation for patch module

use std::fs;
use std::path::Path;

use super::{PatchError, PatchMode};

pub(super) fn apply(content: &str, marker: &str, mode: &PatchMode) -> Result<String, PatchError> {
    if marker.is_empty() {
        return Err(not_found(marker));
    }

    match mode {
        PatchMode::Uncomment { prefix } => {
            let start = content.find(marker).ok_or_else(|| not_found(marker))?;
            let uncommented = marker
                .split('\n')
                .map(|line| line.strip_prefix(prefix.as_str()).unwrap_or(line))
                .collect::<Vec<_>>()
                .join("\n");
            Ok(splice(content, start, marker.len(), &uncommented))
        }
        PatchMode::InsertAfter { payload } => {
            let start = content.find(marker).ok_or_else(|| not_found(marker))?;
            let at = start + marker.len();
            Ok(splice(content, at, 0, payload))
        }
        PatchMode::Replace { payload } => {
            if !content.contains(marker) {
                return Err(not_found(marker));
            }
            Ok(content.replace(marker, payload))
        }
    }
}

pub(super) fn patch_file(path: &Path, marker: &str, mode: &PatchMode) -> Result<(), PatchError> {
    let content = fs::read_to_string(path).map_err(|source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let patched = apply(&content, marker, mode).map_err(|e| match e {
        PatchError::MarkerNotFound { marker } => PatchError::MarkerNotInFile {
            path: path.to_path_buf(),
            marker,
        },
        other => other,
    })?;

    fs::write(path, patched).map_err(|source| PatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(file = %path.display(), mode = mode.name(), "patched");
    Ok(())
}

/// Replace `len` bytes at `at` with `insert`
fn splice(content: &str, at: usize, len: usize, insert: &str) -> String {
    let mut out = String::with_capacity(content.len() + insert.len());
    out.push_str(&content[..at]);
    out.push_str(insert);
    out.push_str(&content[at + len..]);
    out
}

fn not_found(marker: &str) -> PatchError {
    PatchError::MarkerNotFound {
        marker: marker.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KUSTOMIZATION: &str = "bases:\n- ../crd\n#- ../webhook\n#- ../certmanager\n";

    #[test]
    fn test_uncomment_single_line() {
        let out = apply(KUSTOMIZATION, "#- ../webhook", &PatchMode::uncomment("#")).unwrap();
        assert_eq!(out, "bases:\n- ../crd\n- ../webhook\n#- ../certmanager\n");
    }

    #[test]
    fn test_uncomment_block_strips_only_one_prefix_per_line() {
        let content = "a: 1\n#vars:\n#- name: X # keep this\n#  objref:\nb: 2\n";
        let marker = "#vars:\n#- name: X # keep this\n#  objref:";
        let out = apply(content, marker, &PatchMode::uncomment("#")).unwrap();
        assert_eq!(out, "a: 1\nvars:\n- name: X # keep this\n  objref:\nb: 2\n");
    }

    #[test]
    fn test_uncomment_leaves_unprefixed_lines() {
        let content = "#one\ntwo\n#three\n";
        let out = apply(content, "#one\ntwo\n#three", &PatchMode::uncomment("#")).unwrap();
        assert_eq!(out, "one\ntwo\nthree\n");
    }

    #[test]
    fn test_uncomment_first_occurrence_only() {
        let content = "#x\n#x\n";
        let out = apply(content, "#x", &PatchMode::uncomment("#")).unwrap();
        assert_eq!(out, "x\n#x\n");
    }

    #[test]
    fn test_insert_after_marker() {
        let content = "package v1\n\nimport (\n\t\"fmt\"\n)\n";
        let out = apply(content, "import (", &PatchMode::insert_after("\n\t\"errors\"")).unwrap();
        assert_eq!(out, "package v1\n\nimport (\n\t\"errors\"\n\t\"fmt\"\n)\n");
    }

    #[test]
    fn test_insert_after_first_occurrence_only() {
        let out = apply("ab ab", "ab", &PatchMode::insert_after("!")).unwrap();
        assert_eq!(out, "ab! ab");
    }

    #[test]
    fn test_insert_at_end_of_content() {
        let out = apply("tail", "tail", &PatchMode::insert_after("\nmore")).unwrap();
        assert_eq!(out, "tail\nmore");
    }

    #[test]
    fn test_replace_every_occurrence() {
        let out = apply("x TODO y TODO", "TODO", &PatchMode::replace("done")).unwrap();
        assert_eq!(out, "x done y done");
    }

    #[test]
    fn test_replace_keeps_surrounding_content() {
        let content = "func f() {\n\t// TODO(user): fill in\n}\n";
        let out = apply(content, "// TODO(user): fill in", &PatchMode::replace("return")).unwrap();
        assert_eq!(out, "func f() {\n\treturn\n}\n");
    }

    #[test]
    fn test_missing_marker_fails_for_every_mode() {
        for mode in [
            PatchMode::uncomment("#"),
            PatchMode::insert_after("x"),
            PatchMode::replace("x"),
        ] {
            let err = apply(KUSTOMIZATION, "#- ../prometheus", &mode).unwrap_err();
            assert!(err.is_not_found(), "{} should report a missing marker", mode.name());
        }
    }

    #[test]
    fn test_empty_marker_rejected() {
        let err = apply("anything", "", &PatchMode::insert_after("x")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_whitespace_must_match_exactly() {
        let err = apply("#  objref:", "# objref:", &PatchMode::uncomment("#")).unwrap_err();
        assert!(err.is_not_found());
    }
}
