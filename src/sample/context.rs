//! Sample context: where a sample lives and how to drive the scaffolding CLI for it.

use anyhow::{Context, Result};
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::config::GeneratorConfig;
use crate::patch;

/// Group/version/kind of the API the sample scaffolds, plus its domain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Gvk {
    pub domain: String,
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl Gvk {
    /// Fully qualified API group, e.g. `cache.example.com`
    pub fn api_group(&self) -> String {
        format!("{}.{}", self.group, self.domain)
    }

    /// Plural resource name, e.g. `memcacheds`, `policies`
    pub fn resource(&self) -> String {
        pluralize(&self.kind.to_lowercase())
    }
}

/// Irregular plurals the scaffolding CLI's inflector knows about
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("child", "children"),
    ("index", "indices"),
    ("matrix", "matrices"),
    ("person", "people"),
    ("vertex", "vertices"),
];

/// English plural of a lowercase kind, following the common inflection rules
/// kubebuilder applies when naming CRD resources
pub fn pluralize(word: &str) -> String {
    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(single, _)| *single == word) {
        return plural.to_string();
    }
    if word.ends_with("ies") || word.ends_with("ses") || word.ends_with("xes") {
        return word.to_string();
    }

    if let Some(stem) = word.strip_suffix('y') {
        if !stem.is_empty() && !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if ["s", "x", "z", "ch", "sh"].iter().any(|suffix| word.ends_with(suffix)) {
        return format!("{word}es");
    }
    format!("{word}s")
}

const POD_STANDARDS_TODO: &str = r#"# TODO(user): For common cases that do not require escalating privileges
        # it is recommended to ensure that all your Pods/Containers are restrictive.
        # More info: https://kubernetes.io/docs/concepts/security/pod-security-standards/#restricted
        # Please uncomment the following code if your project does NOT have to work on old Kubernetes
        # versions < 1.19 or on vendors versions which do NOT support this field by default (i.e. Openshift < 4.11 ).
        # seccompProfile:
        #   type: RuntimeDefault"#;

const POD_STANDARDS_ENABLED: &str = "seccompProfile:\n          type: RuntimeDefault";

#[derive(Debug, Clone)]
pub struct SampleContext {
    /// Scaffolding CLI
    pub binary: PathBuf,
    /// Absolute path of the sample project
    pub dir: PathBuf,
    /// Exported to every command on top of the inherited environment
    pub env: Vec<(String, String)>,
    pub go: String,
    pub make: String,
    pub gvk: Gvk,
}

impl SampleContext {
    /// Create a context for `dir`; relative paths are resolved against the current directory
    pub fn new(binary: impl AsRef<Path>, dir: impl AsRef<Path>, env: Vec<(String, String)>) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;
        let binary = binary.as_ref();
        // Bare names stay bare so PATH lookup still applies once cwd moves to the sample
        let binary = if binary.is_relative() && binary.components().count() > 1 {
            cwd.join(binary)
        } else {
            binary.to_path_buf()
        };
        let dir = dir.as_ref();
        let dir = if dir.is_relative() { cwd.join(dir) } else { dir.to_path_buf() };

        Ok(Self {
            binary,
            dir,
            env,
            go: "go".to_string(),
            make: "make".to_string(),
            gvk: Gvk::default(),
        })
    }

    /// Build a context from a generator config
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        config.validate()?;
        let mut ctx = Self::new(&config.binary, config.sample_dir(), config.env_pairs()?)?;
        ctx.go = config.go.clone();
        ctx.make = config.make.clone();
        Ok(ctx)
    }

    /// Remove the sample directory; a missing directory is not an error
    pub fn destroy(&self) -> Result<()> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", self.dir.display())),
        }
    }

    /// Create the sample directory
    pub fn prepare(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))
    }

    /// Run a command to completion and return its combined output
    ///
    /// Runs in the sample directory unless the command already has a working directory.
    /// A non-zero exit is an error carrying the output.
    pub fn run(&self, cmd: &mut Command) -> Result<String> {
        if cmd.get_current_dir().is_none() {
            cmd.current_dir(&self.dir);
        }
        cmd.envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let line = command_line(cmd);
        tracing::info!("running: {}", line);

        let output = cmd
            .output()
            .with_context(|| format!("Failed to start {line}"))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            anyhow::bail!("{} failed ({}): {}", line, output.status, combined.trim());
        }

        tracing::debug!(output = %combined.trim_end(), "command finished");
        Ok(combined)
    }

    /// `<binary> init <args>`
    pub fn init(&self, args: &[&str]) -> Result<String> {
        self.run(self.scaffold(["init"]).args(args))
    }

    /// `<binary> create api <args>`
    pub fn create_api(&self, args: &[&str]) -> Result<String> {
        self.run(self.scaffold(["create", "api"]).args(args))
    }

    /// `<binary> create webhook <args>`
    pub fn create_webhook(&self, args: &[&str]) -> Result<String> {
        self.run(self.scaffold(["create", "webhook"]).args(args))
    }

    /// `<make> <target>` in the sample directory
    pub fn make(&self, target: &str) -> Result<String> {
        self.run(Command::new(&self.make).arg(target))
    }

    /// `<go> mod tidy` in the sample directory
    pub fn go_mod_tidy(&self) -> Result<String> {
        self.run(Command::new(&self.go).args(["mod", "tidy"]))
    }

    /// Enable the restricted `seccompProfile` in `config/manager/manager.yaml`
    ///
    /// Older scaffolds do not carry the commented block, so a missing file or
    /// block is logged and skipped. Returns whether the block was enabled.
    pub fn uncomment_restrictive_pod_standards(&self) -> Result<bool> {
        let manager = self.dir.join("config").join("manager").join("manager.yaml");
        if !manager.exists() {
            tracing::warn!("{} not found, leaving pod security settings as scaffolded", manager.display());
            return Ok(false);
        }

        match patch::replace_in_file(&manager, POD_STANDARDS_TODO, POD_STANDARDS_ENABLED) {
            Ok(()) => Ok(true),
            Err(e) if e.is_not_found() => {
                tracing::warn!("no restrictive pod standards block in {}", manager.display());
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// `api/<version>/<kind>_webhook.go`
    pub fn webhook_source_path(&self) -> PathBuf {
        self.dir
            .join("api")
            .join(&self.gvk.version)
            .join(format!("{}_webhook.go", self.gvk.kind.to_lowercase()))
    }

    fn scaffold<const N: usize>(&self, subcommand: [&str; N]) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.args(subcommand);
        cmd
    }
}

fn command_line(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(OsStr::to_string_lossy)
        .collect::<Vec<_>>()
        .join(" ")
}
