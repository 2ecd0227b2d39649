#![forbid(unsafe_code)]

//! @acp:module "wikiout Library"
//! @acp:summary "Post-cache wiki HTML pipeline and form field condition evaluator"
//! @acp:domain core
//! @acp:layer api
//! @acp:stability stable
//!
//! # wikiout
//!
//! Two independent engines for serving wiki pages:
//!
//! - **Output pipeline**: turns cached parser output into the HTML served to
//!   readers (edit links, table of contents, style deduplication, ...)
//! - **Form conditions**: validates and evaluates `hide-if` / `disable-if`
//!   trees for dynamic form fields
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use wikiout::{Condition, FieldValues};
//!
//! let condition = Condition::parse(&json!(["NOT", ["===", "mode", "basic"]]))?;
//! let mut values = FieldValues::new();
//! values.insert("mode", "advanced");
//! assert!(condition.evaluate(&values));
//! # Ok::<(), wikiout::ValidationError>(())
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod form;
pub mod output;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use form::{
    Condition, FieldState, FieldValue, FieldValues, Form, FormDescriptor, FormField,
    ValidationError,
};
pub use output::{
    OutputTransformer, PostCacheHook, RenderedDocument, SectionMetadata, SkinContext,
    StructuredLogger, TransformOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
