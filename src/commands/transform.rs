//! @acp:module "Transform Command"
//! @acp:summary "Run the output pipeline over rendered documents on disk"
//! @acp:domain cli
//! @acp:layer handler
//!
//! Implements `wikiout transform`. Inputs are RenderedDocument JSON files;
//! directories are walked for `*.json`. Documents are transformed in
//! parallel, each call with its own document.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use similar::TextDiff;
use walkdir::WalkDir;

use crate::config::Config;
use crate::output::{OutputTransformer, RenderedDocument, TransformOptions};

/// Options for the transform command
#[derive(Debug, Clone, Default)]
pub struct TransformCommandOptions {
    /// Document files or directories
    pub inputs: Vec<PathBuf>,
    /// JSON file with transform options
    pub options: Option<PathBuf>,
    /// Directory for `<stem>.html` output (stdout if None)
    pub output: Option<PathBuf>,
    /// Show a unified diff from raw to transformed text
    pub diff: bool,
    /// Print transformed documents as JSON
    pub json: bool,
}

/// Execute the transform command
pub fn execute_transform(options: TransformCommandOptions, config: &Config) -> Result<()> {
    let files = collect_inputs(&options.inputs)?;
    if files.is_empty() {
        eprintln!("{} No document files found", style("✗").red());
        std::process::exit(1);
    }

    let transform_options = match &options.options {
        Some(path) => TransformOptions::load(path)
            .with_context(|| format!("Failed to load transform options from {:?}", path))?,
        None => TransformOptions::default(),
    };

    let transformer = OutputTransformer::from_config(config)
        .context("Failed to set up output transformer")?;

    let progress = if files.len() > 1 {
        let bar = ProgressBar::new(files.len() as u64);
        bar.set_style(ProgressStyle::default_bar());
        bar
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<(PathBuf, RenderedDocument)> = files
        .par_iter()
        .map(|path| -> Result<(PathBuf, RenderedDocument)> {
            let mut doc = load_document(path)?;
            if doc.wrapper_class.is_empty() {
                doc.wrapper_class = config.wrapper_class.clone();
            }
            let doc = transformer.transform(doc, transform_options.clone());
            progress.inc(1);
            Ok((path.clone(), doc))
        })
        .collect::<Result<_>>()?;
    progress.finish_and_clear();

    if let Some(dir) = &options.output {
        std::fs::create_dir_all(dir)?;
    }

    for (path, doc) in &results {
        if options.diff {
            print_diff(path, doc);
        }

        match &options.output {
            Some(dir) => {
                let target = output_path(dir, path, options.json);
                let content = if options.json {
                    serde_json::to_string_pretty(doc)?
                } else {
                    doc.text().to_string()
                };
                std::fs::write(&target, content)?;
                println!("{} {}", style("✓").green(), target.display());
            }
            None if options.diff => {}
            None if options.json => println!("{}", serde_json::to_string_pretty(doc)?),
            None => println!("{}", doc.text()),
        }
    }

    Ok(())
}

fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .map(|e| e.into_path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .collect();
            found.sort();
            files.extend(found);
        } else if input.exists() {
            files.push(input.clone());
        } else {
            anyhow::bail!("Input not found: {}", input.display());
        }
    }
    Ok(files)
}

fn load_document(path: &Path) -> Result<RenderedDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read document {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse document {:?}", path))
}

fn output_path(dir: &Path, input: &Path, json: bool) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "document".to_string());
    let extension = if json { "out.json" } else { "html" };
    dir.join(format!("{}.{}", stem, extension))
}

fn print_diff(path: &Path, doc: &RenderedDocument) {
    let name = path.display().to_string();
    let diff = TextDiff::from_lines(doc.raw_text.as_str(), doc.text());
    println!(
        "{}",
        diff.unified_diff()
            .context_radius(3)
            .header(&format!("{} (raw)", name), &format!("{} (transformed)", name))
    );
}
