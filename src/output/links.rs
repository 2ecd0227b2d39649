//! @acp:module "Link Expander"
//! @acp:summary "Rewrite local link targets to absolute URLs"
//! @acp:domain output
//! @acp:layer utility

use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::collaborators::LinkExpander;

static ANCHOR_TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a\b[^>]*>").unwrap());

/// Groups: 1=`href=` prefix, 2=double-quoted value, 3=single-quoted value
static HREF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\shref\s*=\s*)(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

/// Default [`LinkExpander`]: prefixes server-relative `<a href>` targets
/// (`/wiki/Foo`, but not `//host/path`) with the configured server
#[derive(Debug, Clone)]
pub struct ServerLinkExpander {
    server: String,
}

impl ServerLinkExpander {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into().trim_end_matches('/').to_string(),
        }
    }

    fn expand_href(&self, href: &str) -> Option<String> {
        if href.starts_with('/') && !href.starts_with("//") {
            Some(format!("{}{}", self.server, href))
        } else {
            None
        }
    }
}

impl LinkExpander for ServerLinkExpander {
    fn expand(&self, html: &str) -> String {
        if self.server.is_empty() {
            return html.to_string();
        }
        ANCHOR_TAG_PATTERN
            .replace_all(html, |tag: &Captures| {
                HREF_PATTERN
                    .replace(&tag[0], |attr: &Captures| {
                        let (quote, value) = match attr.get(2) {
                            Some(v) => ('"', v.as_str()),
                            None => ('\'', attr.get(3).map(|m| m.as_str()).unwrap_or("")),
                        };
                        match self.expand_href(value) {
                            Some(url) => format!("{}{}{}{}", &attr[1], quote, url, quote),
                            None => attr[0].to_string(),
                        }
                    })
                    .into_owned()
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expands_local_links_only() {
        let expander = ServerLinkExpander::new("https://wiki.example/");
        let html = concat!(
            r#"<a href="/wiki/Foo">Foo</a> "#,
            r#"<a class='x' href='/w/index.php?title=Bar&amp;action=edit'>Bar</a> "#,
            r#"<a href="//cdn.example/x">cdn</a> "#,
            r#"<a href="https://other.example/">o</a> "#,
            r#"<img src="/img.png">"#,
        );
        let expanded = expander.expand(html);
        assert!(expanded.contains(r#"<a href="https://wiki.example/wiki/Foo">"#));
        assert!(expanded.contains(
            r#"<a class='x' href='https://wiki.example/w/index.php?title=Bar&amp;action=edit'>"#
        ));
        assert!(expanded.contains(r#"<a href="//cdn.example/x">"#));
        assert!(expanded.contains(r#"<a href="https://other.example/">"#));
        assert!(expanded.contains(r#"<img src="/img.png">"#));
    }

    #[test]
    fn test_empty_server_is_noop() {
        let html = r#"<a href="/wiki/Foo">Foo</a>"#;
        assert_eq!(ServerLinkExpander::new("").expand(html), html);
    }
}
