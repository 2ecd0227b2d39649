#![forbid(unsafe_code)]
//! wikiout Command Line Interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use wikiout::commands::{
    execute_check, execute_eval, execute_transform, CheckOptions, EvalOptions,
    TransformCommandOptions,
};
use wikiout::Config;

#[derive(Parser)]
#[command(name = "wikiout")]
#[command(about = "Post-cache wiki output pipeline and form condition evaluator")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = ".wikiout.config.json")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Transform cached parser output into served HTML
    Transform {
        /// Document JSON files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Transform options JSON file
        #[arg(long)]
        options: Option<PathBuf>,

        /// Write results into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show a unified diff of raw vs transformed text
        #[arg(long)]
        diff: bool,

        /// Output full documents as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate field conditions of a form against submitted values
    Eval {
        /// Form descriptor (JSON or YAML)
        form: PathBuf,

        /// Submitted values JSON file
        #[arg(long)]
        values: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate the conditions of a form descriptor
    Check {
        /// Form descriptor (JSON or YAML)
        form: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("wikiout=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Load config
    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        Config::default()
    };

    match cli.command {
        Commands::Transform { inputs, options, output, diff, json } => {
            let options = TransformCommandOptions {
                inputs,
                options,
                output,
                diff,
                json,
            };
            execute_transform(options, &config)?;
        }

        Commands::Eval { form, values, json } => {
            let options = EvalOptions { form, values, json };
            execute_eval(options)?;
        }

        Commands::Check { form } => {
            let options = CheckOptions {
                form,
                verbose: cli.verbose,
            };
            execute_check(options)?;
        }
    }

    Ok(())
}
