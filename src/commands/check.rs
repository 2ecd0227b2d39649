//! @acp:module "Check Command"
//! @acp:summary "Validate every condition in a form descriptor"
//! @acp:domain cli
//! @acp:layer handler

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use crate::form::{Form, FormDescriptor};

/// Options for the check command
#[derive(Debug, Clone)]
pub struct CheckOptions {
    /// Form descriptor (JSON or YAML)
    pub form: PathBuf,
    /// Print the normalized client-side conditions
    pub verbose: bool,
}

/// Execute the check command
pub fn execute_check(options: CheckOptions) -> Result<()> {
    let descriptor = FormDescriptor::load(&options.form)
        .with_context(|| format!("Failed to load form descriptor {:?}", options.form))?;

    let form = match Form::from_descriptor(&descriptor) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("{} {}", style("✗").red(), e);
            std::process::exit(1);
        }
    };

    let conditions = form
        .fields()
        .iter()
        .map(|f| f.hide_if.iter().count() + f.disable_if.iter().count())
        .sum::<usize>();

    println!(
        "{} {} is valid ({} fields, {} conditions)",
        style("✓").green(),
        options.form.display(),
        form.fields().len(),
        conditions
    );

    if options.verbose {
        for field in form.fields() {
            if let Some(c) = &field.hide_if {
                println!("  {} hide-if    {}", style(&field.name).cyan(), c.to_client_json());
            }
            if let Some(c) = &field.disable_if {
                println!("  {} disable-if {}", style(&field.name).cyan(), c.to_client_json());
            }
        }
    }

    Ok(())
}
