//! @acp:module "Output Markers"
//! @acp:summary "Placeholder syntax, markup patterns and entity helpers"
//! @acp:domain output
//! @acp:layer utility
//!
//! The raw parser output is a trusted markup subset. These patterns only
//! need to recognise what the parser itself emits, not arbitrary HTML.

use std::sync::LazyLock;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::{Captures, Regex};

/// Marker replaced by the table of contents
pub const TOC_PLACEHOLDER: &str = "<mw:tocplace></mw:tocplace>";

/// Attribute carrying the dedup key on inline `<style>` blocks
pub const DEDUPLICATE_ATTRIBUTE: &str = "data-mw-deduplicate";

/// Section edit placeholder.
/// Groups: 1=page title, 2=section index, 3=heading HTML
pub static EDIT_SECTION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<mw:editsection page="(.*?)" section="(.*?)">(.*?)</mw:editsection>"#)
        .unwrap()
});

/// Inline style block. Group 1 = the opening tag's attribute text
pub static STYLE_BLOCK_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style\b([^>]*)>.*?</style\s*>").unwrap());

/// A single attribute. Groups: 1=name, 2/3/4=double-quoted, single-quoted or bare value
pub static ATTRIBUTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .unwrap()
});

/// Slot header placeholder. Group 1 = escaped role name
pub static SLOT_HEADER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<mw:slotheader>(.*?)</mw:slotheader>").unwrap());

/// Everything up to and including the first `<body>` tag
pub static BODY_OPEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^.*?<body\b[^>]*>").unwrap());

/// Closing body tag; the last match marks the end of the content
pub static BODY_CLOSE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</body\s*>").unwrap());

/// Any tag, for splitting markup into tags and text
pub static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static SPECIAL_CHAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&(amp|lt|gt|quot|#0*39);").unwrap());

static CHAR_REFERENCE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(?:([A-Za-z][A-Za-z0-9]*)|#([0-9]+)|#[xX]([0-9A-Fa-f]+));").unwrap()
});

/// RFC 3986 unreserved characters stay literal
const COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Titles additionally keep `:` and `/` readable in URLs
const TITLE_ENCODE_SET: &AsciiSet = &COMPONENT_ENCODE_SET.remove(b':').remove(b'/');

/// Percent-encode a URL component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT_ENCODE_SET).to_string()
}

/// Percent-encode a title db key for use in a URL
pub fn encode_title(s: &str) -> String {
    utf8_percent_encode(s, TITLE_ENCODE_SET).to_string()
}

/// Escape text for use in HTML content or a quoted attribute
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Undo [`escape_html`]: only the five special characters are decoded,
/// in a single pass so `&amp;lt;` becomes `&lt;`
pub fn decode_special_chars(s: &str) -> String {
    SPECIAL_CHAR_PATTERN
        .replace_all(s, |caps: &Captures| match &caps[1] {
            "amp" => "&",
            "lt" => "<",
            "gt" => ">",
            "quot" => "\"",
            _ => "'",
        })
        .into_owned()
}

/// Decode named and numeric character references.
///
/// Unknown names are left as written; invalid code points become U+FFFD.
pub fn decode_char_references(s: &str) -> String {
    CHAR_REFERENCE_PATTERN
        .replace_all(s, |caps: &Captures| {
            if let Some(name) = caps.get(1) {
                return named_entity(name.as_str())
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| caps[0].to_string());
            }
            let code = match (caps.get(2), caps.get(3)) {
                (Some(dec), _) => dec.as_str().parse::<u32>().ok(),
                (_, Some(hex)) => u32::from_str_radix(hex.as_str(), 16).ok(),
                _ => None,
            };
            code.filter(|&c| is_valid_code_point(c))
                .and_then(char::from_u32)
                .unwrap_or('\u{FFFD}')
                .to_string()
        })
        .into_owned()
}

fn is_valid_code_point(c: u32) -> bool {
    matches!(c, 0x09 | 0x0a | 0x0d | 0x20..=0xd7ff | 0xe000..=0xfffd | 0x10000..=0x10ffff)
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        "shy" => '\u{ad}',
        "copy" => '©',
        "reg" => '®',
        "deg" => '°',
        "middot" => '·',
        "laquo" => '«',
        "raquo" => '»',
        "lsaquo" => '‹',
        "rsaquo" => '›',
        "ndash" => '–',
        "mdash" => '—',
        "lsquo" => '‘',
        "rsquo" => '’',
        "ldquo" => '“',
        "rdquo" => '”',
        "hellip" => '…',
        "times" => '×',
        "minus" => '−',
        "euro" => '€',
        "thinsp" => '\u{2009}',
        "zwj" => '\u{200d}',
        "zwnj" => '\u{200c}',
        "lrm" => '\u{200e}',
        "rlm" => '\u{200f}',
        _ => return None,
    })
}

/// Remove all tags, keeping text content
pub fn strip_tags(s: &str) -> String {
    TAG_PATTERN.replace_all(s, "").into_owned()
}

/// Find an attribute's value in the attribute text of an opening tag.
/// Attribute names match case-insensitively; the value is entity-decoded.
pub fn find_attribute(attributes: &str, name: &str) -> Option<String> {
    ATTRIBUTE_PATTERN.captures_iter(attributes).find_map(|caps| {
        if !caps[1].eq_ignore_ascii_case(name) {
            return None;
        }
        let raw = caps
            .get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
            .unwrap_or("");
        Some(decode_char_references(raw))
    })
}
