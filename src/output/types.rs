//! @acp:module "Output Types"
//! @acp:summary "Rendered document, section metadata and transform options"
//! @acp:domain output
//! @acp:layer types

use serde::{Deserialize, Serialize};

/// One table-of-contents entry, as recorded by the parser for each heading
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionMetadata {
    /// Nesting depth within the TOC (1 = top level)
    pub toc_level: u32,

    /// Heading level as written (`"2"` for `<h2>`)
    #[serde(default)]
    pub level: String,

    /// Heading HTML shown in the TOC
    pub line: String,

    /// Dotted TOC number, e.g. `1.2`
    #[serde(default)]
    pub number: String,

    /// Section index; `T-n` for sections transcluded from another page
    #[serde(default)]
    pub index: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_offset: Option<usize>,

    pub anchor: String,

    /// Anchor to link to when it differs from `anchor`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_anchor: Option<String>,
}

/// Parser output awaiting post-cache transformation.
///
/// `raw_text` is what the parser produced and what the cache stores;
/// `text` is filled in by the transformer and, once set, is the
/// authoritative output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedDocument {
    /// Page title, used for diagnostics only
    #[serde(default)]
    pub title: String,

    pub raw_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_header: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_report: Option<String>,

    /// Class for the wrapper div; empty means no wrapper by default
    #[serde(default)]
    pub wrapper_class: String,

    #[serde(default)]
    pub sections: Vec<SectionMetadata>,

    /// The raw text is a whole `<html>` document rather than a body fragment
    #[serde(default)]
    pub full_document: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RenderedDocument {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_wrapper_class(mut self, class: impl Into<String>) -> Self {
        self.wrapper_class = class.into();
        self
    }

    pub fn with_sections(mut self, sections: Vec<SectionMetadata>) -> Self {
        self.sections = sections;
        self
    }

    /// Final output if transformed, otherwise the raw text
    pub fn text(&self) -> &str {
        self.text.as_deref().unwrap_or(&self.raw_text)
    }

    pub fn is_transformed(&self) -> bool {
        self.text.is_some()
    }
}

/// Skin handed in by the caller, if any
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkinContext {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Per-call options for [`OutputTransformer::transform`].
///
/// Unknown keys are ignored and missing keys take their defaults.
///
/// [`OutputTransformer::transform`]: super::OutputTransformer::transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    #[serde(rename = "allowTOC")]
    pub allow_toc: bool,

    #[serde(rename = "injectTOC")]
    pub inject_toc: bool,

    #[serde(rename = "enableSectionEditLinks")]
    pub enable_section_edit_links: bool,

    #[serde(rename = "userLang")]
    pub user_lang: Option<String>,

    pub skin: Option<SkinContext>,

    pub unwrap: bool,

    /// Overrides the document's wrapper class; `Some("")` disables wrapping
    #[serde(rename = "wrapperDivClass")]
    pub wrapper_div_class: Option<String>,

    #[serde(rename = "deduplicateStyles")]
    pub deduplicate_styles: bool,

    #[serde(rename = "absoluteURLs")]
    pub absolute_urls: bool,

    #[serde(rename = "includeDebugInfo")]
    pub include_debug_info: bool,

    #[serde(rename = "bodyContentOnly")]
    pub body_content_only: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            allow_toc: true,
            inject_toc: true,
            enable_section_edit_links: true,
            user_lang: None,
            skin: None,
            unwrap: false,
            wrapper_div_class: None,
            deduplicate_styles: true,
            absolute_urls: false,
            include_debug_info: false,
            body_content_only: true,
        }
    }
}

impl TransformOptions {
    /// Load options from a JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
