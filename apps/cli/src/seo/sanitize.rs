//! Plain-text extraction from rendered post HTML.

use regex::Regex;

/// Character budget for content samples embedded in generation prompts.
const SAMPLE_BUDGET: usize = 1500;

fn tag_pattern() -> Regex {
    Regex::new(r"<[^>]+>").expect("tag pattern is valid")
}

/// Strips markup tags only, leaving entities encoded.
pub fn strip_tags(html: &str) -> String {
    tag_pattern().replace_all(html, "").into_owned()
}

/// Strips markup tags and decodes HTML entities.
pub fn plain_text(html: &str) -> String {
    html_escape::decode_html_entities(&strip_tags(html)).into_owned()
}

/// Plain text truncated to the prompt sample budget, respecting char
/// boundaries.
pub fn content_sample(html: &str) -> String {
    plain_text(html).chars().take(SAMPLE_BUDGET).collect()
}
