//! artifact-io CLI - inspect pipeline configs and artifacts

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use serde_json::Value;

use artifact_io::{logging, util, ArtifactError, ConfigBox, FixSuggestion};

#[derive(Parser)]
#[command(name = "artifact-io")]
#[command(about = "Inspect ML pipeline configs and artifacts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a YAML config and print it as JSON
    Config {
        /// Path to the YAML file
        file: PathBuf,

        /// Print only this dotted key (e.g. model.params.alpha)
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Load a JSON document and print it
    Json {
        /// Path to the JSON file
        file: PathBuf,

        /// Print only this dotted key
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Create directories (and missing parents)
    Mkdirs {
        /// Directories to create
        #[arg(required = true)]
        dirs: Vec<PathBuf>,

        /// Do not log each created directory
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the size of a file or directory in KB
    Size {
        /// File or directory
        path: PathBuf,
    },
}

fn main() {
    logging::init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Config { file, key } => {
            util::read_config(&file).and_then(|cfg| print_document(&cfg, key.as_deref()))
        }
        Commands::Json { file, key } => {
            util::read_json(&file).and_then(|cfg| print_document(&cfg, key.as_deref()))
        }
        Commands::Mkdirs { dirs, quiet } => util::ensure_directories(&dirs, !quiet),
        Commands::Size { path } => util::file_size(&path).map(|size| println!("{size}")),
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }
}

fn print_document(cfg: &ConfigBox, key: Option<&str>) -> Result<(), ArtifactError> {
    let value = match key {
        Some(key) => cfg.attr(key)?.clone(),
        None => Value::from(cfg.clone()),
    };

    match value {
        Value::String(s) => println!("{s}"),
        other => println!("{}", serde_json::to_string_pretty(&other)?),
    }
    Ok(())
}

fn report(e: &ArtifactError) {
    eprintln!("{} {}", "Error:".red().bold(), e);
    if let Some(suggestion) = e.fix_suggestion() {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
}
