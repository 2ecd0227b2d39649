//! Output pipeline integration tests
//!
//! Exercises `OutputTransformer::transform` end to end with the default
//! collaborators and with recording stand-ins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use wikiout::output::{
    EditLinkRenderer, StructuredLogger, Title, BAD_EDIT_SECTION_TAG, TOC_PLACEHOLDER,
};
use wikiout::{
    Config, OutputTransformer, RenderedDocument, SectionMetadata, SkinContext, TransformOptions,
};

/// Logger that keeps every error it receives
#[derive(Clone, Default)]
struct RecordingLogger {
    entries: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl StructuredLogger for RecordingLogger {
    fn error(&self, message: &str, context: &[(&str, String)]) {
        let context = context
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect();
        self.entries
            .lock()
            .unwrap()
            .push((message.to_string(), context));
    }
}

/// Edit link renderer that only shows which language it was given
struct LangEcho;

impl EditLinkRenderer for LangEcho {
    fn render(&self, title: &Title, section: &str, _heading: &str, lang: &str) -> String {
        format!("[{}#{}@{}]", title, section, lang)
    }
}

fn transformer() -> OutputTransformer {
    OutputTransformer::from_config(&Config::default()).unwrap()
}

fn plain_options() -> TransformOptions {
    TransformOptions {
        enable_section_edit_links: false,
        deduplicate_styles: false,
        ..Default::default()
    }
}

fn sections() -> Vec<SectionMetadata> {
    vec![
        SectionMetadata {
            toc_level: 1,
            level: "2".to_string(),
            line: "History".to_string(),
            number: "1".to_string(),
            index: "1".to_string(),
            anchor: "History".to_string(),
            ..Default::default()
        },
        SectionMetadata {
            toc_level: 2,
            level: "3".to_string(),
            line: "Early years".to_string(),
            number: "1.1".to_string(),
            index: "2".to_string(),
            anchor: "Early_years".to_string(),
            ..Default::default()
        },
    ]
}

// =============================================================================
// Whole pipeline
// =============================================================================

mod pipeline_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_second_pass_is_noop() {
        let transformer = transformer();
        let raw = concat!(
            "<h2>History</h2>",
            r#"<style data-mw-deduplicate="k">.k{}</style>"#,
            "<p>Some text</p>",
        );
        let first = transformer.transform(RenderedDocument::new(raw), plain_options());
        let second = transformer.transform(
            RenderedDocument::new(first.text()),
            plain_options(),
        );
        assert_eq!(second.text(), first.text());
    }

    #[test]
    fn test_raw_text_is_preserved() {
        let doc = RenderedDocument::new("<p>x</p>").with_wrapper_class("mw-parser-output");
        let out = transformer().transform(doc, TransformOptions::default());
        assert!(out.is_transformed());
        assert_eq!(out.raw_text, "<p>x</p>");
        assert_eq!(out.text(), r#"<div class="mw-parser-output"><p>x</p></div>"#);
    }

    #[test]
    fn test_unwrap_and_wrapper_override() {
        let doc = RenderedDocument::new("<p>x</p>").with_wrapper_class("mw-parser-output");

        let unwrapped = transformer().transform(
            doc.clone(),
            TransformOptions {
                unwrap: true,
                ..Default::default()
            },
        );
        assert_eq!(unwrapped.text(), "<p>x</p>");

        let overridden = transformer().transform(
            doc.clone(),
            TransformOptions {
                wrapper_div_class: Some("custom \"x\"".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(
            overridden.text(),
            r#"<div class="custom &quot;x&quot;"><p>x</p></div>"#
        );

        let disabled = transformer().transform(
            doc,
            TransformOptions {
                wrapper_div_class: Some(String::new()),
                ..Default::default()
            },
        );
        assert_eq!(disabled.text(), "<p>x</p>");
    }

    #[test]
    fn test_body_extraction_noop_without_body() {
        let doc = RenderedDocument {
            raw_text: "<p>fragment</p>".to_string(),
            full_document: true,
            ..Default::default()
        };
        let out = transformer().transform(doc, TransformOptions::default());
        assert_eq!(out.text(), "<p>fragment</p>");
    }

    #[test]
    fn test_body_extraction_on_full_document() {
        let doc = RenderedDocument {
            raw_text: "<html><head></head><body><p>inner</p></body></html>".to_string(),
            full_document: true,
            ..Default::default()
        };
        let out = transformer().transform(doc.clone(), TransformOptions::default());
        assert_eq!(out.text(), "<p>inner</p>");

        let kept = transformer().transform(
            doc,
            TransformOptions {
                body_content_only: false,
                ..Default::default()
            },
        );
        assert!(kept.text().starts_with("<html>"));
    }

    #[test]
    fn test_redirect_header_and_debug_info() {
        let doc = RenderedDocument {
            raw_text: "<p>body</p>".to_string(),
            redirect_header: Some("<div class=\"redirectMsg\">Redirect</div>".to_string()),
            debug_report: Some("NewPP limit report".to_string()),
            ..Default::default()
        };

        let out = transformer().transform(doc.clone(), TransformOptions::default());
        assert_eq!(out.text(), "<div class=\"redirectMsg\">Redirect</div><p>body</p>");

        let debug = transformer().transform(
            doc,
            TransformOptions {
                include_debug_info: true,
                ..Default::default()
            },
        );
        assert!(debug
            .text()
            .ends_with("<p>body</p>\n<!-- \nNewPP limit report\n-->\n"));
    }

    #[test]
    fn test_slot_headers_hydrated() {
        let doc = RenderedDocument::new("<h1><mw:slotheader>main</mw:slotheader></h1>");
        let out = transformer().transform(doc, TransformOptions::default());
        assert_eq!(out.text(), "<h1>main</h1>");
    }
}

// =============================================================================
// Post-cache hook
// =============================================================================

mod hook_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_hook_called_once_with_options() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let transformer = transformer().with_hook(
            move |_doc: &RenderedDocument,
                  text: String,
                  options: &mut TransformOptions|
                  -> String {
                counter.fetch_add(1, Ordering::SeqCst);
                options.unwrap = true;
                format!("{}<p>hooked</p>", text)
            },
        );

        let doc = RenderedDocument::new("<p>x</p>").with_wrapper_class("mw-parser-output");
        let out = transformer.transform(doc, TransformOptions::default());

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(out.text(), "<p>x</p><p>hooked</p>");
    }

    #[test]
    fn test_hook_sees_debug_info() {
        let transformer = transformer().with_hook(
            |_doc: &RenderedDocument, text: String, _options: &mut TransformOptions| -> String {
                assert!(text.contains("<!-- \nreport\n-->"));
                text
            },
        );
        let doc = RenderedDocument {
            raw_text: "<p>x</p>".to_string(),
            debug_report: Some("report".to_string()),
            ..Default::default()
        };
        transformer.transform(
            doc,
            TransformOptions {
                include_debug_info: true,
                ..Default::default()
            },
        );
    }
}

// =============================================================================
// Section edit links
// =============================================================================

mod edit_link_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_edit_link_rendered() {
        let raw = r#"<h2>A<mw:editsection page="Main Page" section="1">A</mw:editsection></h2>"#;
        let out = transformer().transform(RenderedDocument::new(raw), TransformOptions::default());
        assert_eq!(
            out.text(),
            concat!(
                r#"<h2>A<span class="mw-editsection"><span class="mw-editsection-bracket">[</span>"#,
                r#"<a href="/w/index.php?title=Main_Page&amp;action=edit&amp;section=1" "#,
                r#"title="Edit section: A">edit</a>"#,
                r#"<span class="mw-editsection-bracket">]</span></span></h2>"#,
            )
        );
    }

    #[test]
    fn test_edit_links_disabled_removes_placeholders() {
        let raw = r#"<h2>A<mw:editsection page="Main Page" section="1">A</mw:editsection></h2>"#;
        let out = transformer().transform(RenderedDocument::new(raw), plain_options());
        assert_eq!(out.text(), "<h2>A</h2>");
    }

    #[test]
    fn test_bad_title_logs_once_and_is_dropped() {
        let logger = RecordingLogger::default();
        let transformer = transformer().with_logger(logger.clone());

        let raw = concat!(
            "<p>before</p>",
            r#"<mw:editsection page="Foo[bar]" section="3">Heading</mw:editsection>"#,
            "<p>after</p>",
        );
        let doc = RenderedDocument::new(raw).with_title("Some Page");
        let out = transformer.transform(doc, TransformOptions::default());

        assert_eq!(out.text(), "<p>before</p><p>after</p>");

        let entries = logger.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        let (message, context) = &entries[0];
        assert_eq!(message, "Bad parser output text");
        let get = |key: &str| {
            context
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("title-text"), Some("Foo[bar]"));
        assert_eq!(get("doc-title"), Some("Some Page"));
        assert_eq!(get("tag"), Some(BAD_EDIT_SECTION_TAG));
        assert!(get("text-piece").is_some_and(|t| t.starts_with("<mw:editsection")));
    }

    #[test]
    fn test_language_priority() {
        let transformer = transformer().with_edit_link_renderer(LangEcho);
        let raw = r#"<mw:editsection page="Foo" section="1">Foo</mw:editsection>"#;
        let skin = SkinContext {
            name: "vector".to_string(),
            language: Some("fr".to_string()),
        };

        let default =
            transformer.transform(RenderedDocument::new(raw), TransformOptions::default());
        assert_eq!(default.text(), "[Foo#1@en]");

        let from_skin = transformer.transform(
            RenderedDocument::new(raw),
            TransformOptions {
                skin: Some(skin.clone()),
                ..Default::default()
            },
        );
        assert_eq!(from_skin.text(), "[Foo#1@fr]");

        let explicit = transformer.transform(
            RenderedDocument::new(raw),
            TransformOptions {
                skin: Some(skin),
                user_lang: Some("de".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(explicit.text(), "[Foo#1@de]");
    }
}

// =============================================================================
// Table of contents
// =============================================================================

mod toc_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn doc() -> RenderedDocument {
        RenderedDocument::new(format!("{}<h2>History</h2>", TOC_PLACEHOLDER))
            .with_sections(sections())
    }

    #[test]
    fn test_toc_injected() {
        let out = transformer().transform(doc(), TransformOptions::default());
        let text = out.text();
        assert!(!text.contains(TOC_PLACEHOLDER));
        assert!(text.starts_with(r#"<div id="toc" class="toc""#));
        assert!(text.contains(r##"<li class="toclevel-1 tocsection-1"><a href="#History">"##));
        assert!(text.contains(r##"<li class="toclevel-2 tocsection-2"><a href="#Early_years">"##));
        assert!(text.ends_with("<h2>History</h2>"));
    }

    #[test]
    fn test_toc_suppressed_regardless_of_inject() {
        for inject_toc in [true, false] {
            let out = transformer().transform(
                doc(),
                TransformOptions {
                    allow_toc: false,
                    inject_toc,
                    ..Default::default()
                },
            );
            assert_eq!(out.text(), "<h2>History</h2>");
        }
    }

    #[test]
    fn test_toc_marker_removed_without_sections() {
        let doc = RenderedDocument::new(format!("a{}b", TOC_PLACEHOLDER));
        let out = transformer().transform(doc, TransformOptions::default());
        assert_eq!(out.text(), "ab");
    }

    #[test]
    fn test_toc_marker_kept_without_inject() {
        let out = transformer().transform(
            doc(),
            TransformOptions {
                inject_toc: false,
                ..Default::default()
            },
        );
        assert_eq!(out.text(), format!("{}<h2>History</h2>", TOC_PLACEHOLDER));
    }

    #[test]
    fn test_toc_french_spacing() {
        let doc = RenderedDocument::new(TOC_PLACEHOLDER).with_sections(vec![SectionMetadata {
            toc_level: 1,
            line: "Pourquoi ?".to_string(),
            number: "1".to_string(),
            index: "1".to_string(),
            anchor: "Pourquoi".to_string(),
            ..Default::default()
        }]);
        let out = transformer().transform(
            doc,
            TransformOptions {
                user_lang: Some("fr".to_string()),
                ..Default::default()
            },
        );
        assert!(out.text().contains(r#"<span class="toctext">Pourquoi&#160;?</span>"#));
        assert!(out.text().contains(r#"lang="fr" dir="ltr""#));
    }
}

// =============================================================================
// Style deduplication and absolute URLs
// =============================================================================

mod rewrite_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_three_duplicates_and_distinct_key() {
        let block = r#"<style data-mw-deduplicate="k">.k{color:red}</style>"#;
        let other = r#"<style data-mw-deduplicate="other">.o{}</style>"#;
        let raw = format!("{}<p>1</p>{}<p>2</p>{}{}", block, block, block, other);

        let out = transformer().transform(RenderedDocument::new(raw), TransformOptions::default());
        let text = out.text();
        let link = r#"<link rel="mw-deduplicated-inline-style" href="mw-data:k"/>"#;

        assert_eq!(text.matches(block).count(), 1);
        assert_eq!(text.matches(link).count(), 2);
        assert!(text.contains(other));
        assert!(text.starts_with(block));
    }

    #[test]
    fn test_dedup_key_percent_encoded() {
        let block = r#"<style data-mw-deduplicate="TemplateStyles:r1 2">.x{}</style>"#;
        let raw = format!("{}{}", block, block);
        let out = transformer().transform(RenderedDocument::new(raw), TransformOptions::default());
        assert!(out
            .text()
            .ends_with(r#"href="mw-data:TemplateStyles%3Ar1%202"/>"#));
    }

    #[test]
    fn test_dedup_state_is_per_call() {
        let transformer = transformer();
        let block = r#"<style data-mw-deduplicate="k">.k{}</style>"#;
        for _ in 0..2 {
            let out =
                transformer.transform(RenderedDocument::new(block), TransformOptions::default());
            assert_eq!(out.text(), block);
        }
    }

    #[test]
    fn test_absolute_urls() {
        let config = Config {
            server: "https://wiki.example.org".to_string(),
            ..Default::default()
        };
        let transformer = OutputTransformer::from_config(&config).unwrap();
        let raw = r#"<a href="/wiki/Foo">Foo</a> <a href="//cdn.example.org/x">x</a>"#;

        let out = transformer.transform(
            RenderedDocument::new(raw),
            TransformOptions {
                absolute_urls: true,
                ..Default::default()
            },
        );
        assert_eq!(
            out.text(),
            r#"<a href="https://wiki.example.org/wiki/Foo">Foo</a> <a href="//cdn.example.org/x">x</a>"#
        );

        let relative =
            transformer.transform(RenderedDocument::new(raw), TransformOptions::default());
        assert_eq!(relative.text(), raw);
    }
}
