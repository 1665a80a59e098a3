//! Main CLI application structure

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::{deps, features_cmd, suggest};
use crate::storage::{self, Config, Project};

#[derive(Parser)]
#[command(name = "sprig")]
#[command(author, version, about = "Suggests git branch structure from a project's feature manifest")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config's default_format)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a sprig project
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// List and validate the feature manifest
    Features {
        /// Manifest file (defaults to .sprig/features.json, then features.*)
        #[arg(long, short)]
        manifest: Option<PathBuf>,
    },

    /// Show the dependency edges between features
    Deps {
        /// Manifest file (defaults to .sprig/features.json, then features.*)
        #[arg(long, short)]
        manifest: Option<PathBuf>,
    },

    /// Suggest a branch plan for the manifest's features
    Suggest {
        /// Manifest file (defaults to .sprig/features.json, then features.*)
        #[arg(long, short)]
        manifest: Option<PathBuf>,

        /// Branching strategy (trunk, gitflow, feature-branch)
        #[arg(long, short)]
        strategy: Option<String>,

        /// Base branch to cut root features from
        #[arg(long, short)]
        base: Option<String>,

        /// Branch naming template ({feature} and {name} placeholders)
        #[arg(long)]
        naming: Option<String>,

        /// Write a markdown workflow document to this file
        #[arg(long, short)]
        out: Option<PathBuf>,
    },
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load()?;
    let format = cli.format.unwrap_or(match config.global.default_format {
        storage::OutputFormat::Text => OutputFormat::Text,
        storage::OutputFormat::Json => OutputFormat::Json,
    });
    let output = Output::new(format, cli.verbose);

    output.verbose("sprig starting");
    if let Some(root) = &config.project_root {
        output.verbose(&format!("Using project at: {}", root.display()));
    }

    match cli.command {
        Commands::Init { path } => {
            output.verbose_ctx("init", &format!("Initializing project at: {}", path));
            let project = Project::init(&path)?;
            output.success(&format!(
                "Initialized sprig project at {}",
                project.root().display()
            ));
        }

        Commands::Features { manifest } => {
            features_cmd::run(&output, &config, manifest.as_deref())?
        }

        Commands::Deps { manifest } => deps::run(&output, &config, manifest.as_deref())?,

        Commands::Suggest {
            manifest,
            strategy,
            base,
            naming,
            out,
        } => suggest::run(
            &output,
            &config,
            manifest.as_deref(),
            strategy.as_deref(),
            base.as_deref(),
            naming.as_deref(),
            out.as_deref(),
        )?,
    }

    Ok(())
}
