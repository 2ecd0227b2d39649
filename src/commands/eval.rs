//! @acp:module "Eval Command"
//! @acp:summary "Resolve hidden/disabled state of form fields for submitted values"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::form::{FieldValues, Form};

/// Options for the eval command
#[derive(Debug, Clone)]
pub struct EvalOptions {
    /// Form descriptor (JSON or YAML)
    pub form: PathBuf,
    /// JSON object of submitted values
    pub values: Option<PathBuf>,
    /// Output as JSON
    pub json: bool,
}

/// Execute the eval command
pub fn execute_eval(options: EvalOptions) -> Result<()> {
    let form = Form::load(&options.form)
        .with_context(|| format!("Failed to load form {:?}", options.form))?;

    let submitted = match &options.values {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read values from {:?}", path))?;
            FieldValues::from_json(&serde_json::from_str(&content)?)?
        }
        None => FieldValues::new(),
    };

    if submitted.is_empty() {
        tracing::debug!("No submitted values, using field defaults");
    } else {
        tracing::debug!("Evaluating {} submitted values", submitted.len());
    }

    let values = form.field_values(&submitted);
    let states = form.states(&values);

    if options.json {
        println!("{}", serde_json::to_string_pretty(&states)?);
        return Ok(());
    }

    for state in &states {
        let marker = if state.hidden {
            style("hidden").yellow()
        } else if state.disabled {
            style("disabled").red()
        } else {
            style("visible").green()
        };
        println!(
            "  {:<24} {:<8} {}",
            state.name,
            marker,
            style(format!("\"{}\"", values.text(&state.name))).dim()
        );
    }

    Ok(())
}
