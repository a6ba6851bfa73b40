use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use samplegen::observability::{self, LogSettings};
use samplegen::sample::memcached::ProjectLayout;

mod commands;

#[derive(Parser)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Generate operator samples from scaffolding output", long_about = None)]
struct Cli {
    /// Config file (defaults to ./samplegen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the Memcached with webhooks sample
    Generate {
        /// Scaffolding CLI binary
        #[arg(long)]
        binary: Option<PathBuf>,

        /// Directory the sample is generated under
        #[arg(long)]
        samples_dir: Option<PathBuf>,

        /// Plugin layout to initialize the project with
        #[arg(long, value_enum, default_value_t = LayoutArg::Auto)]
        layout: LayoutArg,

        /// Skip checking that the external tools exist
        #[arg(long)]
        skip_preflight: bool,
    },

    /// Apply a single marker-based patch to a file
    Patch {
        #[command(subcommand)]
        command: PatchCommands,
    },

    /// Check that the tools a generation run needs are installed
    Doctor {
        /// Output results as JSON
        #[arg(short, long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PatchCommands {
    /// Strip a comment prefix from every line of the marked block
    Uncomment {
        #[command(flatten)]
        target: PatchTarget,

        /// Comment prefix to strip
        #[arg(long, default_value = "#")]
        prefix: String,
    },

    /// Insert a payload right after the marker
    Insert {
        #[command(flatten)]
        target: PatchTarget,

        #[command(flatten)]
        payload: PayloadArgs,
    },

    /// Replace every occurrence of the marker
    Replace {
        #[command(flatten)]
        target: PatchTarget,

        #[command(flatten)]
        payload: PayloadArgs,
    },
}

#[derive(Args)]
struct PatchTarget {
    /// File to patch in place
    #[arg(long)]
    file: PathBuf,

    /// Literal marker text
    #[arg(long, conflicts_with = "marker_file", required_unless_present = "marker_file")]
    marker: Option<String>,

    /// Read the marker from a file (exact contents, trailing newline trimmed)
    #[arg(long)]
    marker_file: Option<PathBuf>,
}

#[derive(Args)]
struct PayloadArgs {
    /// Literal payload text
    #[arg(long, conflicts_with = "payload_file", required_unless_present = "payload_file")]
    payload: Option<String>,

    /// Read the payload from a file
    #[arg(long)]
    payload_file: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    Auto,
    GoV3,
    GoV4Alpha,
}

impl LayoutArg {
    fn resolve(self) -> Option<ProjectLayout> {
        match self {
            LayoutArg::Auto => None,
            LayoutArg::GoV3 => Some(ProjectLayout::GoV3),
            LayoutArg::GoV4Alpha => Some(ProjectLayout::GoV4Alpha),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    observability::init_tracing(&LogSettings::from_env(cli.verbose));

    if let Err(e) = run(cli) {
        tracing::error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Generate {
            binary,
            samples_dir,
            layout,
            skip_preflight,
        } => {
            commands::generate::execute(commands::generate::GenerateOptions {
                config,
                binary,
                samples_dir,
                layout: layout.resolve(),
                skip_preflight,
            })?;
        }
        Commands::Patch { command } => match command {
            PatchCommands::Uncomment { target, prefix } => {
                commands::patch::uncomment(&target.file, target.marker, target.marker_file, &prefix)?;
            }
            PatchCommands::Insert { target, payload } => {
                commands::patch::insert(
                    &target.file,
                    target.marker,
                    target.marker_file,
                    payload.payload,
                    payload.payload_file,
                )?;
            }
            PatchCommands::Replace { target, payload } => {
                commands::patch::replace(
                    &target.file,
                    target.marker,
                    target.marker_file,
                    payload.payload,
                    payload.payload_file,
                )?;
            }
        },
        Commands::Doctor { json } => {
            let ready = commands::doctor::execute(config, json)?;
            if !ready {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
