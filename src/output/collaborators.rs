//! @acp:module "Output Collaborators"
//! @acp:summary "Seams through which the transformer reaches skins, tidy and logging"
//! @acp:domain output
//! @acp:layer interface
//!
//! Every external dependency of the pipeline is a trait object injected into
//! [`OutputTransformer`](super::OutputTransformer). The defaults in this
//! crate are good enough for standalone rendering; embedders swap in their
//! own.

use super::title::Title;
use super::types::{RenderedDocument, SectionMetadata, TransformOptions};

/// Extension point run once per transform, after debug info is appended
pub trait PostCacheHook: Send + Sync {
    /// Return the (possibly rewritten) text. Options changes are seen by
    /// every later stage.
    fn rewrite(&self, doc: &RenderedDocument, text: String, options: &mut TransformOptions)
        -> String;
}

impl<F> PostCacheHook for F
where
    F: Fn(&RenderedDocument, String, &mut TransformOptions) -> String + Send + Sync,
{
    fn rewrite(
        &self,
        doc: &RenderedDocument,
        text: String,
        options: &mut TransformOptions,
    ) -> String {
        self(doc, text, options)
    }
}

/// Hook that leaves the text alone
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl PostCacheHook for NoopHook {
    fn rewrite(&self, _: &RenderedDocument, text: String, _: &mut TransformOptions) -> String {
        text
    }
}

/// Turns the decoded `page` attribute of an edit placeholder into a title
pub trait TitleResolver: Send + Sync {
    fn resolve(&self, text: &str) -> Option<Title>;
}

/// Renders the edit link that replaces a section edit placeholder
pub trait EditLinkRenderer: Send + Sync {
    fn render(&self, title: &Title, section: &str, heading: &str, lang: &str) -> String;
}

/// Renders the table of contents for a document's sections
pub trait TocRenderer: Send + Sync {
    fn render(&self, sections: &[SectionMetadata], lang: &str) -> String;
}

/// Normalizes an HTML fragment, applying `post_filter` to its text
pub trait Tidy: Send + Sync {
    fn tidy(&self, html: &str, post_filter: &dyn Fn(&str) -> String) -> String;
}

/// Rewrites relative link targets to absolute URLs
pub trait LinkExpander: Send + Sync {
    fn expand(&self, html: &str) -> String;
}

/// Structured error sink for recoverable content problems
pub trait StructuredLogger: Send + Sync {
    fn error(&self, message: &str, context: &[(&str, String)]);
}

/// Logger that forwards to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl StructuredLogger for TracingLogger {
    fn error(&self, message: &str, context: &[(&str, String)]) {
        tracing::error!(context = ?context, "{}", message);
    }
}
