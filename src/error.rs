//! @acp:module "Errors"
//! @acp:summary "Crate-level error type for file loading and template setup"
//! @acp:domain core
//! @acp:layer model

use thiserror::Error;

use crate::form::ValidationError;

/// Errors surfaced at the library's loading boundary.
///
/// The transform pipeline itself never fails; these cover reading
/// documents, configs and form descriptors, and building collaborators.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Template error: {0}")]
    Template(#[from] Box<handlebars::TemplateError>),

    #[error("Invalid form condition: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

impl From<handlebars::TemplateError> for Error {
    fn from(err: handlebars::TemplateError) -> Self {
        Error::Template(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
