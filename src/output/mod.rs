//! @acp:module "Output"
//! @acp:summary "Post-cache transformation of rendered wiki pages"
//! @acp:domain output
//! @acp:layer feature
//!
//! # Output pipeline
//!
//! The parser caches a [`RenderedDocument`] whose text still carries
//! placeholders: section edit links, the TOC marker, deduplicatable
//! inline styles and slot headers. [`OutputTransformer::transform`]
//! resolves them per request according to [`TransformOptions`].
//!
//! ## Usage
//!
//! ```rust
//! use wikiout::{Config, OutputTransformer, RenderedDocument, TransformOptions};
//!
//! let transformer = OutputTransformer::from_config(&Config::default())?;
//! let doc = RenderedDocument::new("<p>Hello</p>").with_wrapper_class("mw-parser-output");
//! let out = transformer.transform(doc, TransformOptions::default());
//! assert_eq!(out.text(), r#"<div class="mw-parser-output"><p>Hello</p></div>"#);
//! # Ok::<(), wikiout::Error>(())
//! ```

pub mod collaborators;
pub mod editlink;
pub mod links;
pub mod markers;
pub mod tidy;
pub mod title;
pub mod toc;
pub mod transform;
pub mod types;

pub use collaborators::{
    EditLinkRenderer, LinkExpander, NoopHook, PostCacheHook, StructuredLogger, Tidy,
    TitleResolver, TocRenderer, TracingLogger,
};
pub use editlink::TemplateEditLinkRenderer;
pub use links::ServerLinkExpander;
pub use markers::TOC_PLACEHOLDER;
pub use tidy::{armor_french_spaces, TextNodeTidy};
pub use title::{Title, TitleParser};
pub use toc::DefaultTocRenderer;
pub use transform::{OutputTransformer, BAD_EDIT_SECTION_TAG};
pub use types::{RenderedDocument, SectionMetadata, SkinContext, TransformOptions};
