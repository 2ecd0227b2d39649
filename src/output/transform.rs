//! @acp:module "Output Transformer"
//! @acp:summary "Ordered post-cache rewrites turning raw parser output into served HTML"
//! @acp:domain output
//! @acp:layer service
//!
//! Stages run in a fixed order over one text buffer:
//!
//! 1. body extraction
//! 2. redirect header
//! 3. debug report
//! 4. post-cache hook
//! 5. wrapper div
//! 6. section edit links
//! 7. table of contents
//! 8. inline style deduplication
//! 9. absolute URLs
//! 10. slot headers
//!
//! Later stages rely on the normalizations of earlier ones. None of them can
//! fail: a placeholder that cannot be rendered is logged and dropped.

use std::collections::HashSet;

use regex::Captures;

use super::collaborators::{
    EditLinkRenderer, LinkExpander, NoopHook, PostCacheHook, StructuredLogger, Tidy,
    TitleResolver, TocRenderer, TracingLogger,
};
use super::editlink::TemplateEditLinkRenderer;
use super::links::ServerLinkExpander;
use super::markers::{
    decode_char_references, decode_special_chars, encode_component, escape_html, find_attribute,
    BODY_CLOSE_PATTERN, BODY_OPEN_PATTERN, DEDUPLICATE_ATTRIBUTE, EDIT_SECTION_PATTERN,
    SLOT_HEADER_PATTERN, STYLE_BLOCK_PATTERN, TOC_PLACEHOLDER,
};
use super::tidy::{armor_french_spaces, TextNodeTidy};
use super::title::TitleParser;
use super::toc::DefaultTocRenderer;
use super::types::{RenderedDocument, TransformOptions};
use crate::config::Config;

/// Tag attached to edit-placeholder diagnostics so they can be grepped
pub const BAD_EDIT_SECTION_TAG: &str = "bad-editsection-title";

/// The post-cache output pipeline.
///
/// Holds only immutable collaborators; all per-call state lives inside
/// [`transform`](Self::transform), so one instance can serve many threads.
pub struct OutputTransformer {
    hook: Box<dyn PostCacheHook>,
    titles: Box<dyn TitleResolver>,
    edit_links: Box<dyn EditLinkRenderer>,
    toc: Box<dyn TocRenderer>,
    tidy: Box<dyn Tidy>,
    links: Box<dyn LinkExpander>,
    logger: Box<dyn StructuredLogger>,
    default_language: String,
}

impl OutputTransformer {
    /// Build a transformer with the default collaborators for a site
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        Ok(Self {
            hook: Box::new(NoopHook),
            titles: Box::new(TitleParser::new(config.namespaces.clone())),
            edit_links: Box::new(TemplateEditLinkRenderer::new(config)?),
            toc: Box::new(DefaultTocRenderer::new(config.messages.toc_title.clone())),
            tidy: Box::new(TextNodeTidy),
            links: Box::new(ServerLinkExpander::new(config.server.clone())),
            logger: Box::new(TracingLogger),
            default_language: config.default_language.clone(),
        })
    }

    pub fn with_hook(mut self, hook: impl PostCacheHook + 'static) -> Self {
        self.hook = Box::new(hook);
        self
    }

    pub fn with_title_resolver(mut self, titles: impl TitleResolver + 'static) -> Self {
        self.titles = Box::new(titles);
        self
    }

    pub fn with_edit_link_renderer(mut self, renderer: impl EditLinkRenderer + 'static) -> Self {
        self.edit_links = Box::new(renderer);
        self
    }

    pub fn with_toc_renderer(mut self, renderer: impl TocRenderer + 'static) -> Self {
        self.toc = Box::new(renderer);
        self
    }

    pub fn with_tidy(mut self, tidy: impl Tidy + 'static) -> Self {
        self.tidy = Box::new(tidy);
        self
    }

    pub fn with_link_expander(mut self, links: impl LinkExpander + 'static) -> Self {
        self.links = Box::new(links);
        self
    }

    pub fn with_logger(mut self, logger: impl StructuredLogger + 'static) -> Self {
        self.logger = Box::new(logger);
        self
    }

    /// Run every enabled stage over the document's raw text and store the
    /// result as its final text
    pub fn transform(
        &self,
        mut doc: RenderedDocument,
        mut options: TransformOptions,
    ) -> RenderedDocument {
        let mut text = doc.raw_text.clone();

        if options.body_content_only && doc.full_document {
            text = extract_body(&text);
        }

        if let Some(header) = &doc.redirect_header {
            text.insert_str(0, header);
        }

        if options.include_debug_info {
            if let Some(report) = &doc.debug_report {
                text.push_str(&debug_comment(report));
            }
        }

        text = self.hook.rewrite(&doc, text, &mut options);

        let wrapper_class = options
            .wrapper_div_class
            .as_deref()
            .unwrap_or(&doc.wrapper_class);
        if !wrapper_class.is_empty() && !options.unwrap {
            text = format!(
                r#"<div class="{}">{}</div>"#,
                escape_html(wrapper_class),
                text
            );
        }

        text = if options.enable_section_edit_links {
            self.add_edit_links(&doc, &text, self.language(&options))
        } else {
            EDIT_SECTION_PATTERN.replace_all(&text, "").into_owned()
        };

        text = self.place_toc(&doc, text, &options);

        if options.deduplicate_styles {
            text = deduplicate_styles(&text);
        }

        if options.absolute_urls && !text.is_empty() {
            text = self.links.expand(&text);
        }

        text = hydrate_slot_headers(&text);

        doc.text = Some(text);
        doc
    }

    /// Explicit user language, then the skin's, then the site default
    fn language<'a>(&'a self, options: &'a TransformOptions) -> &'a str {
        options
            .user_lang
            .as_deref()
            .or_else(|| options.skin.as_ref().and_then(|s| s.language.as_deref()))
            .unwrap_or(&self.default_language)
    }

    fn add_edit_links(&self, doc: &RenderedDocument, text: &str, lang: &str) -> String {
        EDIT_SECTION_PATTERN
            .replace_all(text, |caps: &Captures| {
                let raw_title = &caps[1];
                let section = decode_special_chars(&caps[2]);
                let heading = decode_char_references(&caps[3]);

                match self.titles.resolve(&decode_special_chars(raw_title)) {
                    Some(title) => self.edit_links.render(&title, &section, &heading, lang),
                    None => {
                        self.logger.error(
                            "Bad parser output text",
                            &[
                                ("text-piece", caps[0].to_string()),
                                ("title-text", raw_title.to_string()),
                                ("doc-title", doc.title.clone()),
                                ("tag", BAD_EDIT_SECTION_TAG.to_string()),
                            ],
                        );
                        String::new()
                    }
                }
            })
            .into_owned()
    }

    fn place_toc(
        &self,
        doc: &RenderedDocument,
        text: String,
        options: &TransformOptions,
    ) -> String {
        if !options.allow_toc {
            return text.replace(TOC_PLACEHOLDER, "");
        }
        if !options.inject_toc || !text.contains(TOC_PLACEHOLDER) {
            return text;
        }
        if doc.sections.is_empty() {
            return text.replace(TOC_PLACEHOLDER, "");
        }

        let lang = self.language(options);
        tracing::debug!("Injecting TOC with {} sections ({})", doc.sections.len(), lang);
        let toc = self.toc.render(&doc.sections, lang);
        let toc = self.tidy.tidy(&toc, &armor_french_spaces);
        text.replace(TOC_PLACEHOLDER, &toc)
    }
}

impl std::fmt::Debug for OutputTransformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputTransformer")
            .field("default_language", &self.default_language)
            .finish_non_exhaustive()
    }
}

/// Strip everything outside `<body>…</body>`. Missing markers leave that
/// side of the text as is.
pub fn extract_body(text: &str) -> String {
    let start = BODY_OPEN_PATTERN.find(text).map(|m| m.end()).unwrap_or(0);
    let body = &text[start..];
    let end = BODY_CLOSE_PATTERN
        .find_iter(body)
        .last()
        .map(|m| m.start())
        .unwrap_or(body.len());
    body[..end].to_string()
}

/// The debug report as an HTML comment that cannot terminate early
fn debug_comment(report: &str) -> String {
    format!("\n<!-- \n{}\n-->\n", report.replace("-->", "--&gt;"))
}

/// Keep the first `<style>` block for each dedup key and replace the rest
/// with a link placeholder. Blocks without a key are untouched.
pub fn deduplicate_styles(text: &str) -> String {
    let mut seen: HashSet<String> = HashSet::new();
    STYLE_BLOCK_PATTERN
        .replace_all(text, |caps: &Captures| {
            let key = match find_attribute(&caps[1], DEDUPLICATE_ATTRIBUTE) {
                Some(key) if !key.is_empty() => key,
                _ => return caps[0].to_string(),
            };
            if seen.insert(key.clone()) {
                caps[0].to_string()
            } else {
                format!(
                    r#"<link rel="mw-deduplicated-inline-style" href="mw-data:{}"/>"#,
                    encode_component(&key)
                )
            }
        })
        .into_owned()
}

/// Replace slot header placeholders with their role name
pub fn hydrate_slot_headers(text: &str) -> String {
    SLOT_HEADER_PATTERN
        .replace_all(text, |caps: &Captures| decode_special_chars(&caps[1]))
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_body() {
        let html = "<html><head><title>x</title></head><body class=\"b\">\n<p>Hi</p>\n</body>\n</html>\n";
        assert_eq!(extract_body(html), "\n<p>Hi</p>\n");
    }

    #[test]
    fn test_extract_body_without_tags_is_noop() {
        assert_eq!(extract_body("<p>plain</p>"), "<p>plain</p>");
    }

    #[test]
    fn test_extract_body_uses_last_close() {
        let html = "<body>a</body>b</body>c";
        assert_eq!(extract_body(html), "a</body>b");
    }

    #[test]
    fn test_debug_comment_is_closed_once() {
        let comment = debug_comment("Limit --> exceeded");
        assert_eq!(comment.matches("-->").count(), 1);
        assert!(comment.contains("Limit --&gt; exceeded"));
    }

    #[test]
    fn test_deduplicate_styles_keys_independent() {
        let html = concat!(
            r#"<style data-mw-deduplicate="a">.a{}</style>"#,
            r#"<style data-mw-deduplicate="b">.b{}</style>"#,
            r#"<style media="all" data-mw-deduplicate='a'>.a{}</style>"#,
            r#"<style>.plain{}</style>"#,
        );
        assert_eq!(
            deduplicate_styles(html),
            concat!(
                r#"<style data-mw-deduplicate="a">.a{}</style>"#,
                r#"<style data-mw-deduplicate="b">.b{}</style>"#,
                r#"<link rel="mw-deduplicated-inline-style" href="mw-data:a"/>"#,
                r#"<style>.plain{}</style>"#,
            )
        );
    }

    #[test]
    fn test_hydrate_slot_headers() {
        assert_eq!(
            hydrate_slot_headers("<h1><mw:slotheader>extra&amp;more</mw:slotheader></h1>"),
            "<h1>extra&more</h1>"
        );
    }
}
