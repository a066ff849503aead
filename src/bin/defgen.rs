//! Definition Compiler CLI
//!
//! Compiles definition files into PHP classes and inspects what they declare.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use php_defgen::{compile, CompileOptions, DefgenConfig, Loader};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "defgen")]
#[command(about = "Compile PHP definition files into immutable data classes")]
struct Cli {
    /// Configuration file (defaults to defgen.toml lookup)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate classes from a definition file or directory
    Compile {
        /// Definition file or directory
        from: PathBuf,
        /// Output directory
        #[arg(short, long)]
        to: PathBuf,
        /// Delete the output directory first
        #[arg(long)]
        clear: bool,
        /// Prefix prepended to every generated namespace
        #[arg(short, long)]
        namespace_prefix: Option<String>,
        /// Declare properties without `readonly`
        #[arg(long)]
        mutable: bool,
    },

    /// Print the definitions found under a path as JSON
    Inspect {
        /// Definition file or directory
        path: PathBuf,
    },

    /// Show or create configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as TOML (default)
        #[arg(long, conflicts_with = "json")]
        toml: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "defgen.toml")]
        output: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = DefgenConfig::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    match cli.command {
        Commands::Compile {
            from,
            to,
            clear,
            namespace_prefix,
            mutable,
        } => {
            let mut options = CompileOptions::from_config(&from, &to, &config);
            if clear {
                options = options.with_clear(true);
            }
            if let Some(prefix) = namespace_prefix {
                options = options.with_namespace_prefix(prefix);
            }
            if mutable {
                options = options.with_readonly(false);
            }

            let report = compile(&options)
                .with_context(|| format!("failed to compile {}", from.display()))?;

            println!(
                "✅ Compiled {} definitions into {} files under {}",
                report.definitions,
                report.files.len(),
                to.display()
            );
            for file in &report.files {
                println!("  {}", file.display());
            }
        }

        Commands::Inspect { path } => {
            let definitions = Loader::new(&config.input.suffix)
                .load(&path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            println!("{}", serde_json::to_string_pretty(&definitions)?);
        }

        Commands::Config { action } => match action {
            ConfigAction::Show { json, .. } => {
                if json {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                } else {
                    println!("{}", toml::to_string_pretty(&config)?);
                }
            }
            ConfigAction::Init { output } => {
                if std::path::Path::new(&output).exists() {
                    anyhow::bail!("{} already exists", output);
                }
                DefgenConfig::default()
                    .save(&output)
                    .with_context(|| format!("failed to write {}", output))?;
                println!("✅ Wrote default configuration to {}", output);
            }
        },
    }

    Ok(())
}
