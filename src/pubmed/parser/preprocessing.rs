//! Text cleaning for fields extracted from PubMed XML

use std::borrow::Cow;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

/// Strip inline HTML-like formatting tags (`<i>`, `<sup>`, `<sub>`, `<b>`, ...)
///
/// Markup inside real XML elements is already removed by the element tree; this
/// catches the escaped variant (`&lt;i&gt;`) that some records carry, which only
/// turns into tags after entity decoding.
pub(crate) fn strip_inline_html_tags(text: &str) -> Cow<'_, str> {
    static INLINE_TAG_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = INLINE_TAG_REGEX.get_or_init(|| {
        Regex::new(r"</?(?:i|b|u|sup|sub|em|strong|italic|bold|sc)(?:\s[^>]*)?>")
            .expect("Failed to compile inline tag regex")
    });

    let cleaned = re.replace_all(text, "");
    if let Cow::Owned(_) = cleaned {
        debug!(
            "Stripped inline HTML tags: {} bytes -> {} bytes",
            text.len(),
            cleaned.len()
        );
    }
    cleaned
}

/// Decode the five predefined XML entities and numeric character references
///
/// Unknown named entities are left as they are. Decoding happens in a single pass,
/// so `&amp;lt;` becomes `&lt;`, not `<`.
pub(crate) fn decode_entities(text: &str) -> Cow<'_, str> {
    static ENTITY_REGEX: OnceLock<Regex> = OnceLock::new();
    let re = ENTITY_REGEX.get_or_init(|| {
        Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|lt|gt|amp|quot|apos);")
            .expect("Failed to compile entity regex")
    });

    re.replace_all(text, |caps: &Captures| {
        let entity = &caps[1];
        let decoded = match entity {
            "lt" => Some('<'),
            "gt" => Some('>'),
            "amp" => Some('&'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => {
                let code = match entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
                    Some(hex) => u32::from_str_radix(hex, 16).ok(),
                    None => entity[1..].parse::<u32>().ok(),
                };
                code.and_then(char::from_u32)
            }
        };

        match decoded {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    })
}

/// Collapse runs of whitespace into single spaces and trim
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean text taken from an XML element: inline tags removed, whitespace normalized
pub(crate) fn clean_text(text: &str) -> String {
    normalize_whitespace(&strip_inline_html_tags(text))
}
