//! Memcached sample with webhooks
//!
//! Scaffolds a Memcached operator with the deploy-image plugin, adds a
//! defaulting webhook, turns it into a validating one too, and enables the
//! webhook and cert-manager sections of the kustomize config.
//!
//! Every step is fatal: the first failure aborts the run with the step's context.

pub mod fragments;

use anyhow::{Context, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::context::{Gvk, SampleContext};
use super::{e2e, TemplateVars};
use crate::config::{GeneratorConfig, SampleSection};
use crate::patch;

/// Plugin layout the project is initialized with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectLayout {
    GoV3,
    GoV4Alpha,
}

impl ProjectLayout {
    /// `GoV4Alpha` when the sample directory or its parent ends in `v4-alpha`
    pub fn detect(dir: &Path) -> Self {
        let is_v4 = |p: Option<&Path>| {
            p.and_then(Path::file_name)
                .map(|name| name.to_string_lossy().ends_with("v4-alpha"))
                .unwrap_or(false)
        };
        if is_v4(Some(dir)) || is_v4(dir.parent()) {
            Self::GoV4Alpha
        } else {
            Self::GoV3
        }
    }

    pub fn plugin(self) -> &'static str {
        match self {
            Self::GoV3 => "go/v3",
            Self::GoV4Alpha => "go/v4-alpha",
        }
    }

    /// Index of the manager container in the scaffolded Deployment
    fn manager_container_index(self) -> usize {
        match self {
            // go/v3 puts kube-rbac-proxy first
            Self::GoV3 => 1,
            Self::GoV4Alpha => 0,
        }
    }
}

/// Memcached with webhooks sample
pub struct Memcached {
    ctx: SampleContext,
    layout: ProjectLayout,
    sample: SampleSection,
}

/// Generate the sample described by `config`
///
/// `layout` forces the plugin layout; `None` detects it from the sample path.
pub fn generate_sample(config: &GeneratorConfig, layout: Option<ProjectLayout>) -> Result<()> {
    tracing::info!("starting to generate Go memcached sample with webhooks");
    let ctx = SampleContext::from_config(config)
        .context("generating Go memcached with webhooks context")?;
    let layout = layout.unwrap_or_else(|| ProjectLayout::detect(&ctx.dir));

    let mut memcached = Memcached::new(ctx, layout, config.sample.clone());
    memcached.prepare()?;
    memcached.run()
}

impl Memcached {
    pub fn new(ctx: SampleContext, layout: ProjectLayout, sample: SampleSection) -> Self {
        Self {
            ctx,
            layout,
            sample,
        }
    }

    pub fn context(&self) -> &SampleContext {
        &self.ctx
    }

    /// Recreate the sample directory and set the domain and GVK
    pub fn prepare(&mut self) -> Result<()> {
        tracing::info!("destroying directory for Memcached with Webhooks Go samples");
        self.ctx.destroy()?;

        tracing::info!("creating directory");
        self.ctx.prepare().context("creating directory for Go Sample")?;

        tracing::info!("setting domain and GVK");
        self.ctx.gvk = Gvk {
            domain: self.sample.domain.clone(),
            group: self.sample.group.clone(),
            version: self.sample.version.clone(),
            kind: self.sample.kind.clone(),
        };
        Ok(())
    }

    /// Run every generation step in order
    pub fn run(&self) -> Result<()> {
        let gvk = &self.ctx.gvk;

        tracing::info!("creating the {} project", self.layout.plugin());
        self.ctx
            .init(&[
                "--plugins",
                self.layout.plugin(),
                "--project-version",
                "3",
                "--repo",
                self.sample.repo.as_str(),
                "--domain",
                gvk.domain.as_str(),
            ])
            .context("creating the project")?;

        self.ctx
            .create_api(&[
                "--group",
                gvk.group.as_str(),
                "--version",
                gvk.version.as_str(),
                "--kind",
                gvk.kind.as_str(),
                "--plugins",
                "deploy-image/v1-alpha",
                "--image",
                self.sample.image.as_str(),
                "--make=false",
                "--manifests=false",
            ])
            .context("scaffolding apis")?;

        self.ctx
            .uncomment_restrictive_pod_standards()
            .context("enabling restrictive pod standards")?;

        tracing::info!("scaffolding webhook");
        self.ctx
            .create_webhook(&[
                "--group",
                gvk.group.as_str(),
                "--version",
                gvk.version.as_str(),
                "--kind",
                gvk.kind.as_str(),
                "--defaulting",
            ])
            .context("scaffolding webhook")?;

        self.implement_webhooks()?;
        self.uncomment_default_kustomization()?;
        self.uncomment_manifests_kustomization()?;

        e2e::implement_e2e_tests(&self.ctx, &self.sample).context("implementing e2e tests")?;

        self.ctx.go_mod_tidy().context("running go mod tidy")?;
        self.ctx.make("fmt").context("formatting project")?;

        // Clean up built binaries, if any
        remove_dir_if_present(&self.ctx.dir.join("bin")).context("cleaning up")?;

        tracing::info!("sample generated at {}", self.ctx.dir.display());
        Ok(())
    }

    /// Add validation methods, the defaulting body and their imports to the webhook source
    pub fn implement_webhooks(&self) -> Result<()> {
        tracing::info!("implementing webhooks");
        let webhook = self.ctx.webhook_source_path();
        let vars = TemplateVars::for_gvk(&self.ctx.gvk);

        patch::insert_code(
            &webhook,
            fragments::DEFAULTING_TODO_END,
            &vars.render(fragments::VALIDATION_WEBHOOK),
        )
        .context("replacing webhook validate implementation")?;

        patch::replace_in_file(&webhook, fragments::DEFAULTING_TODO, fragments::DEFAULTING_BODY)
            .context("replacing webhook default implementation")?;

        patch::insert_code(&webhook, fragments::IMPORT_MARKER, fragments::WEBHOOK_IMPORTS)
            .context("adding imports")?;
        Ok(())
    }

    /// Enable webhook, cert-manager and prometheus in `config/default/kustomization.yaml`
    pub fn uncomment_default_kustomization(&self) -> Result<()> {
        let kustomization = self.ctx.dir.join("config").join("default").join("kustomization.yaml");
        tracing::info!("uncommenting config/default/kustomization.yaml to enable webhooks and ca injection");

        for (marker, what) in fragments::DEFAULT_KUSTOMIZATION_ENTRIES {
            patch::uncomment_code(&kustomization, marker, "#")
                .with_context(|| format!("uncomment {what}"))?;
        }

        let certificate_block = match self.layout {
            ProjectLayout::GoV3 => fragments::CERTIFICATE_VARS_V3,
            ProjectLayout::GoV4Alpha => fragments::CERTIFICATE_REPLACEMENTS_V4,
        };
        patch::uncomment_code(&kustomization, certificate_block, "#")
            .context("uncommented certificate CR")?;
        Ok(())
    }

    /// Enable the OLM cert volume removal patch in `config/manifests/kustomization.yaml`
    pub fn uncomment_manifests_kustomization(&self) -> Result<()> {
        let kustomization = self.ctx.dir.join("config").join("manifests").join("kustomization.yaml");
        tracing::info!("uncommenting config/manifests/kustomization.yaml to enable webhooks in OLM");

        let block = fragments::manifests_volume_patch(self.layout.manager_container_index());
        patch::uncomment_code(&kustomization, &block, "#")
            .context("uncommented webhook volume removal patch")?;
        Ok(())
    }
}

fn remove_dir_if_present(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("Failed to remove {}", dir.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WEBHOOK_SCAFFOLD: &str = "package v1alpha1

import (
\tctrl \"sigs.k8s.io/controller-runtime\"
\tlogf \"sigs.k8s.io/controller-runtime/pkg/log\"
\t\"sigs.k8s.io/controller-runtime/pkg/webhook\"
)

// log is for logging in this package.
var memcachedlog = logf.Log.WithName(\"memcached-resource\")

var _ webhook.Defaulter = &Memcached{}

// Default implements webhook.Defaulter so a webhook will be registered for the type
func (r *Memcached) Default() {
\tmemcachedlog.Info(\"default\", \"name\", r.Name)

\t// TODO(user): fill in your defaulting logic.
}
";

    fn sample_in(tmp: &TempDir, layout: ProjectLayout) -> Memcached {
        let ctx = SampleContext::new("operator-sdk", tmp.path().join("memcached-operator"), vec![]).unwrap();
        let mut sample = Memcached::new(ctx, layout, SampleSection::default());
        sample.prepare().unwrap();
        sample
    }

    #[test]
    fn test_layout_detection() {
        assert_eq!(
            ProjectLayout::detect(Path::new("/testdata/go/v3/memcached-operator")),
            ProjectLayout::GoV3
        );
        assert_eq!(
            ProjectLayout::detect(Path::new("/testdata/go/v4-alpha/memcached-operator")),
            ProjectLayout::GoV4Alpha
        );
        assert_eq!(
            ProjectLayout::detect(Path::new("/testdata/memcached-v4-alpha")),
            ProjectLayout::GoV4Alpha
        );
        assert_eq!(ProjectLayout::GoV4Alpha.plugin(), "go/v4-alpha");
    }

    #[test]
    fn test_prepare_sets_gvk_and_recreates_dir() {
        let tmp = TempDir::new().unwrap();
        let sample = sample_in(&tmp, ProjectLayout::GoV3);
        fs::write(sample.context().dir.join("stale"), "x").unwrap();

        let mut again = Memcached::new(sample.ctx.clone(), ProjectLayout::GoV3, SampleSection::default());
        again.prepare().unwrap();
        assert!(!again.context().dir.join("stale").exists());
        assert_eq!(again.context().gvk.kind, "Memcached");
        assert_eq!(again.context().gvk.domain, "example.com");
    }

    #[test]
    fn test_implement_webhooks() {
        let tmp = TempDir::new().unwrap();
        let sample = sample_in(&tmp, ProjectLayout::GoV3);
        let webhook = sample.context().webhook_source_path();
        fs::create_dir_all(webhook.parent().unwrap()).unwrap();
        fs::write(&webhook, WEBHOOK_SCAFFOLD).unwrap();

        sample.implement_webhooks().unwrap();
        let out = fs::read_to_string(&webhook).unwrap();

        assert!(out.starts_with("package v1alpha1\n\nimport (\"errors\"\n\n\"k8s.io/apimachinery/pkg/runtime\"\n\tctrl"));
        assert!(out.contains("\tif r.Spec.Size == 0 {\n\t\tr.Spec.Size = 3\n\t}\n}\n"));
        assert!(!out.contains("fill in your defaulting logic"));
        assert!(out.contains("path=/validate-cache-example-com-v1alpha1-memcached,"));
        assert!(out.contains("name=vmemcached.kb.io"));
        assert!(out.contains("func (r *Memcached) ValidateUpdate(old runtime.Object) error {"));
        assert_eq!(out.matches("func validateOdd").count(), 1);

        // Validation methods follow Default()
        let default_at = out.find("func (r *Memcached) Default()").unwrap();
        let validate_at = out.find("var _ webhook.Validator").unwrap();
        assert!(validate_at > default_at);
    }

    #[test]
    fn test_implement_webhooks_missing_marker_aborts() {
        let tmp = TempDir::new().unwrap();
        let sample = sample_in(&tmp, ProjectLayout::GoV3);
        let webhook = sample.context().webhook_source_path();
        fs::create_dir_all(webhook.parent().unwrap()).unwrap();
        fs::write(&webhook, "package v1alpha1\n").unwrap();

        let err = sample.implement_webhooks().unwrap_err();
        assert!(format!("{err:#}").contains("replacing webhook validate implementation"));
        assert_eq!(fs::read_to_string(&webhook).unwrap(), "package v1alpha1\n");
    }

    #[test]
    fn test_manifests_kustomization_uses_layout_index() {
        let tmp = TempDir::new().unwrap();
        let sample = sample_in(&tmp, ProjectLayout::GoV4Alpha);
        let dir = sample.context().dir.join("config").join("manifests");
        fs::create_dir_all(&dir).unwrap();
        let kustomization = dir.join("kustomization.yaml");
        fs::write(
            &kustomization,
            format!("resources:\n- ../default\n\n{}\n", fragments::manifests_volume_patch(0)),
        )
        .unwrap();

        sample.uncomment_manifests_kustomization().unwrap();
        let out = fs::read_to_string(&kustomization).unwrap();
        assert!(out.contains("\npatchesJson6902:\n- target:\n"));
        assert!(out.contains("      path: /spec/template/spec/containers/0/volumeMounts/0\n"));
        assert!(out.contains("    # Remove the \"cert\" volume"));
    }

    #[test]
    fn test_manifests_kustomization_wrong_layout_fails() {
        let tmp = TempDir::new().unwrap();
        let sample = sample_in(&tmp, ProjectLayout::GoV3);
        let dir = sample.context().dir.join("config").join("manifests");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("kustomization.yaml"), fragments::manifests_volume_patch(0)).unwrap();

        assert!(sample.uncomment_manifests_kustomization().is_err());
    }
}
