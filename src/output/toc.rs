//! @acp:module "TOC Renderer"
//! @acp:summary "Nested table-of-contents markup from section metadata"
//! @acp:domain output
//! @acp:layer output

use super::collaborators::TocRenderer;
use super::markers::escape_html;
use super::types::SectionMetadata;

const RTL_LANGUAGES: &[&str] = &[
    "ar", "arc", "arz", "ckb", "dv", "fa", "he", "khw", "ks", "mzn", "ps", "sd", "ug", "ur", "yi",
];

/// Text direction for a language code
pub fn direction(lang: &str) -> &'static str {
    let base = lang.split('-').next().unwrap_or(lang);
    if RTL_LANGUAGES.contains(&base) {
        "rtl"
    } else {
        "ltr"
    }
}

/// Default [`TocRenderer`]
#[derive(Debug, Clone)]
pub struct DefaultTocRenderer {
    title: String,
}

impl DefaultTocRenderer {
    /// `title` is the already-localized TOC heading
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl TocRenderer for DefaultTocRenderer {
    fn render(&self, sections: &[SectionMetadata], lang: &str) -> String {
        let list = render_list(sections);
        format!(
            concat!(
                r#"<div id="toc" class="toc" role="navigation" aria-labelledby="mw-toc-heading">"#,
                r#"<input type="checkbox" role="button" id="toctogglecheckbox" class="toctogglecheckbox" style="display:none" />"#,
                r#"<div class="toctitle" lang="{lang}" dir="{dir}"><h2 id="mw-toc-heading">{title}</h2>"#,
                r#"<span class="toctogglespan"><label class="toctogglelabel" for="toctogglecheckbox"></label></span></div>"#,
                "{list}</div>\n"
            ),
            lang = escape_html(lang),
            dir = direction(lang),
            title = escape_html(&self.title),
            list = list,
        )
    }
}

/// Build the nested `<ul>` structure. Each deeper `tocLevel` opens one list
/// inside the previous item; shallower levels close back out.
fn render_list(sections: &[SectionMetadata]) -> String {
    let mut out = String::new();
    let mut open_levels: Vec<u32> = Vec::new();

    for section in sections {
        let level = section.toc_level.max(1);
        match open_levels.last() {
            Some(&current) if level <= current => {
                out.push_str("</li>\n");
                while open_levels.len() > 1 && open_levels.last().is_some_and(|&l| level < l) {
                    out.push_str("</ul>\n</li>\n");
                    open_levels.pop();
                }
            }
            _ => {
                out.push_str("\n<ul>\n");
                open_levels.push(level);
            }
        }
        out.push_str(&render_line(section, level));
    }

    if !open_levels.is_empty() {
        out.push_str("</li>\n");
        for _ in 1..open_levels.len() {
            out.push_str("</ul>\n</li>\n");
        }
        out.push_str("</ul>\n");
    }
    out
}

fn render_line(section: &SectionMetadata, level: u32) -> String {
    let anchor = section.link_anchor.as_deref().unwrap_or(&section.anchor);
    let mut classes = format!("toclevel-{}", level);
    if !section.index.is_empty() {
        classes.push_str(" tocsection-");
        classes.push_str(&escape_html(&section.index));
    }
    format!(
        r##"<li class="{}"><a href="#{}"><span class="tocnumber">{}</span> <span class="toctext">{}</span></a>"##,
        classes,
        escape_html(anchor),
        escape_html(&section.number),
        section.line,
    )
}
