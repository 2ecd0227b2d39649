//! @acp:module "Tidy"
//! @acp:summary "Text-node normalizer and French spacing post-filter"
//! @acp:domain output
//! @acp:layer utility

use super::collaborators::Tidy;
use super::markers::TAG_PATTERN;

/// Non-breaking space as emitted into markup
pub const ARMORED_SPACE: &str = "&#160;";

/// Default [`Tidy`]: leaves tags untouched and runs the post-filter over
/// each run of text between them
#[derive(Debug, Clone, Copy, Default)]
pub struct TextNodeTidy;

impl Tidy for TextNodeTidy {
    fn tidy(&self, html: &str, post_filter: &dyn Fn(&str) -> String) -> String {
        let mut out = String::with_capacity(html.len());
        let mut last = 0;
        for tag in TAG_PATTERN.find_iter(html) {
            if tag.start() > last {
                out.push_str(&post_filter(&html[last..tag.start()]));
            }
            out.push_str(tag.as_str());
            last = tag.end();
        }
        if last < html.len() {
            out.push_str(&post_filter(&html[last..]));
        }
        out
    }
}

/// Replace spaces that French typography keeps attached to punctuation:
/// before `? : ; ! % » ›` (unless a word character follows the mark) and
/// after `« ‹`.
pub fn armor_french_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c != ' ' {
            out.push(c);
            continue;
        }
        let before_mark = matches!(
            chars.get(i + 1).copied(),
            Some('?' | ':' | ';' | '!' | '%' | '»' | '›')
        ) && !chars.get(i + 2).is_some_and(|&n| is_word_char(n));
        let after_mark = i > 0 && matches!(chars[i - 1], '«' | '‹');
        if before_mark || after_mark {
            out.push_str(ARMORED_SPACE);
        } else {
            out.push(c);
        }
    }
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
