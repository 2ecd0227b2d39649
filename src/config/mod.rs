//! @acp:module "Configuration"
//! @acp:summary "Site configuration loading and defaults"
//! @acp:domain cli
//! @acp:layer config

use serde::{Deserialize, Serialize};

fn default_script_path() -> String {
    "/w".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_wrapper_class() -> String {
    "mw-parser-output".to_string()
}

fn default_namespaces() -> Vec<String> {
    [
        "Talk",
        "User",
        "User talk",
        "Project",
        "File",
        "Template",
        "Help",
        "Category",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Built-in Handlebars template for section edit links
pub const DEFAULT_EDIT_LINK_TEMPLATE: &str = concat!(
    r#"<span class="mw-editsection"><span class="mw-editsection-bracket">[</span>"#,
    r#"<a href="{{url}}" title="{{tooltip}}">{{label}}</a>"#,
    r#"<span class="mw-editsection-bracket">]</span></span>"#,
);

fn default_edit_link_template() -> String {
    DEFAULT_EDIT_LINK_TEMPLATE.to_string()
}

/// @acp:summary "Main site configuration structure"
/// @acp:lock normal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Server prefix for absolute URLs (e.g. `https://wiki.example.org`)
    #[serde(default)]
    pub server: String,

    /// Path to index.php and friends
    #[serde(default = "default_script_path")]
    pub script_path: String,

    /// Language used when neither the request nor the skin names one
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Wrapper class for documents that don't carry their own
    #[serde(default = "default_wrapper_class")]
    pub wrapper_class: String,

    /// Namespace prefixes recognised by the title parser
    #[serde(default = "default_namespaces")]
    pub namespaces: Vec<String>,

    /// Interface messages used by the default renderers
    #[serde(default)]
    pub messages: MessagesConfig,

    /// Handlebars template for edit-section links
    #[serde(default = "default_edit_link_template")]
    pub edit_link_template: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: String::new(),
            script_path: default_script_path(),
            default_language: default_language(),
            wrapper_class: default_wrapper_class(),
            namespaces: default_namespaces(),
            messages: MessagesConfig::default(),
            edit_link_template: default_edit_link_template(),
        }
    }
}

impl Config {
    /// @acp:summary "Load config from .wikiout.config.json file"
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// @acp:summary "Save config to a file"
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Base URL for index.php
    pub fn index_url(&self) -> String {
        format!("{}/index.php", self.script_path.trim_end_matches('/'))
    }
}

fn default_edit_section() -> String {
    "edit".to_string()
}

fn default_edit_section_tooltip() -> String {
    "Edit section: {{heading}}".to_string()
}

fn default_toc_title() -> String {
    "Contents".to_string()
}

/// @acp:summary "Interface message strings"
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesConfig {
    /// Edit link label
    #[serde(default = "default_edit_section")]
    pub edit_section: String,

    /// Edit link tooltip; `{{heading}}` is the plain-text heading
    #[serde(default = "default_edit_section_tooltip")]
    pub edit_section_tooltip: String,

    /// Heading of the table of contents
    #[serde(default = "default_toc_title")]
    pub toc_title: String,
}

impl Default for MessagesConfig {
    fn default() -> Self {
        Self {
            edit_section: default_edit_section(),
            edit_section_tooltip: default_edit_section_tooltip(),
            toc_title: default_toc_title(),
        }
    }
}
