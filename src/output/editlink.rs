//! @acp:module "Edit Link Renderer"
//! @acp:summary "Handlebars-rendered section edit links"
//! @acp:domain output
//! @acp:layer output

use handlebars::Handlebars;
use serde_json::json;

use super::collaborators::EditLinkRenderer;
use super::markers::{encode_component, encode_title, escape_html, strip_tags};
use super::title::Title;
use crate::config::Config;

const LINK_TEMPLATE: &str = "edit-link";
const TOOLTIP_TEMPLATE: &str = "edit-tooltip";

/// Default [`EditLinkRenderer`].
///
/// The link template sees `url`, `label`, `tooltip`, `title`, `section`
/// and `lang`; values are HTML-escaped unless the template uses `{{{ }}}`.
pub struct TemplateEditLinkRenderer {
    links: Handlebars<'static>,
    messages: Handlebars<'static>,
    index_url: String,
    label: String,
}

impl TemplateEditLinkRenderer {
    pub fn new(config: &Config) -> crate::Result<Self> {
        let mut links = Handlebars::new();
        links.register_escape_fn(escape_html);
        links.register_template_string(LINK_TEMPLATE, &config.edit_link_template)?;

        // Message text is inserted into the link template, which escapes it
        let mut messages = Handlebars::new();
        messages.register_escape_fn(handlebars::no_escape);
        messages
            .register_template_string(TOOLTIP_TEMPLATE, &config.messages.edit_section_tooltip)?;

        Ok(Self {
            links,
            messages,
            index_url: config.index_url(),
            label: config.messages.edit_section.clone(),
        })
    }

    fn edit_url(&self, title: &Title, section: &str) -> String {
        format!(
            "{}?title={}&action=edit&section={}",
            self.index_url,
            encode_title(&title.db_key()),
            encode_component(section)
        )
    }
}

impl EditLinkRenderer for TemplateEditLinkRenderer {
    fn render(&self, title: &Title, section: &str, heading: &str, lang: &str) -> String {
        let heading_text = strip_tags(heading);
        let tooltip = self
            .messages
            .render(TOOLTIP_TEMPLATE, &json!({ "heading": heading_text.trim() }))
            .unwrap_or_else(|e| {
                tracing::warn!("Failed to render edit tooltip: {}", e);
                heading_text.trim().to_string()
            });

        let data = json!({
            "url": self.edit_url(title, section),
            "label": self.label,
            "tooltip": tooltip,
            "title": title.prefixed_text(),
            "section": section,
            "lang": lang,
        });

        self.links.render(LINK_TEMPLATE, &data).unwrap_or_else(|e| {
            tracing::warn!("Failed to render edit link for {}: {}", title, e);
            String::new()
        })
    }
}

impl std::fmt::Debug for TemplateEditLinkRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateEditLinkRenderer")
            .field("index_url", &self.index_url)
            .field("label", &self.label)
            .finish()
    }
}
