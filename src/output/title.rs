//! @acp:module "Page Titles"
//! @acp:summary "Title normalization and validation for edit-link targets"
//! @acp:domain output
//! @acp:layer logic

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use super::collaborators::TitleResolver;

/// Maximum length of a title's text in bytes
pub const MAX_TITLE_LENGTH: usize = 255;

static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s_]+").unwrap());

static PERCENT_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%[0-9A-Fa-f]{2}").unwrap());

const ILLEGAL_CHARS: &[char] = &['#', '<', '>', '[', ']', '|', '{', '}'];

/// A resolved page title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    namespace: Option<String>,
    text: String,
}

impl Title {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Page name without the namespace
    pub fn text(&self) -> &str {
        &self.text
    }

    /// `Namespace:Text`, with spaces
    pub fn prefixed_text(&self) -> String {
        match &self.namespace {
            Some(ns) => format!("{}:{}", ns, self.text),
            None => self.text.clone(),
        }
    }

    /// Prefixed text with underscores, as used in URLs
    pub fn db_key(&self) -> String {
        self.prefixed_text().replace(' ', "_")
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefixed_text())
    }
}

/// Default [`TitleResolver`]: normalizes whitespace, splits known
/// namespace prefixes and rejects anything that cannot name a page
#[derive(Debug, Clone, Default)]
pub struct TitleParser {
    namespaces: Vec<String>,
}

impl TitleParser {
    pub fn new(namespaces: Vec<String>) -> Self {
        Self { namespaces }
    }

    pub fn parse(&self, input: &str) -> Option<Title> {
        let normalized = WHITESPACE_RUN.replace_all(input, " ");
        let mut rest = normalized.trim();

        // A leading colon forces the main namespace
        if let Some(stripped) = rest.strip_prefix(':') {
            rest = stripped.trim_start();
        }

        if rest.is_empty()
            || rest.contains(ILLEGAL_CHARS)
            || rest.chars().any(char::is_control)
            || PERCENT_ESCAPE.is_match(rest)
        {
            return None;
        }

        let (namespace, text) = match rest.split_once(':') {
            Some((prefix, tail)) => match self.canonical_namespace(prefix.trim()) {
                Some(ns) => (Some(ns), tail.trim()),
                None => (None, rest),
            },
            None => (None, rest),
        };

        if text.is_empty() || text.len() > MAX_TITLE_LENGTH || is_relative_path(text) {
            return None;
        }

        Some(Title {
            namespace,
            text: uppercase_first(text),
        })
    }

    fn canonical_namespace(&self, prefix: &str) -> Option<String> {
        self.namespaces
            .iter()
            .find(|ns| ns.eq_ignore_ascii_case(prefix))
            .cloned()
    }
}

impl TitleResolver for TitleParser {
    fn resolve(&self, text: &str) -> Option<Title> {
        self.parse(text)
    }
}

fn is_relative_path(text: &str) -> bool {
    text == "."
        || text == ".."
        || text.starts_with("./")
        || text.starts_with("../")
        || text.contains("/./")
        || text.contains("/../")
        || text.ends_with("/.")
        || text.ends_with("/..")
}

fn uppercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
