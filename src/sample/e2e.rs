//! End-to-end test scaffolding written into the generated sample.

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use super::{SampleContext, TemplateVars};
use crate::config::SampleSection;

const SUITE_TEMPLATE: &str = include_str!("../../resources/templates/e2e/e2e_suite_test.go.tmpl");
const E2E_TEMPLATE: &str = include_str!("../../resources/templates/e2e/e2e_test.go.tmpl");
const UTILS_TEMPLATE: &str = include_str!("../../resources/templates/e2e/utils.go.tmpl");

/// Write `test/e2e` and `test/utils` into the sample, overwriting existing files.
/// Returns the written paths.
pub fn implement_e2e_tests(ctx: &SampleContext, sample: &SampleSection) -> Result<Vec<PathBuf>> {
    tracing::info!("implementing e2e tests");

    let vars = TemplateVars::for_gvk(&ctx.gvk)
        .with("Repo", sample.repo.as_str())
        .with("Image", sample.image.as_str())
        .with("Name", sample.name.as_str());

    let test_dir = ctx.dir.join("test");
    let files = [
        (test_dir.join("e2e").join("e2e_suite_test.go"), SUITE_TEMPLATE),
        (test_dir.join("e2e").join("e2e_test.go"), E2E_TEMPLATE),
        (test_dir.join("utils").join("utils.go"), UTILS_TEMPLATE),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (path, template) in files {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&path, vars.render(template))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(file = %path.display(), "wrote e2e test file");
        written.push(path);
    }
    Ok(written)
}
