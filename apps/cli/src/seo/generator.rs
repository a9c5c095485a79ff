//! Generation operations — description and keyword synthesis, plus the two
//! minimal-edit insertions.
//!
//! Every operation here is defensive: a backend failure degrades to "no
//! change" for the post being processed, never to a run abort. Where the
//! backend is asked to honor an instruction (include the keyword), the
//! result is verified and discarded if the instruction was ignored.

use regex::Regex;
use tracing::warn;

use crate::llm_client::TextGenerator;
use crate::seo::prompts::{
    DESCRIPTION_PROMPT_TEMPLATE, KEYWORD_PLACEHOLDER, KEYWORD_PROMPT_TEMPLATE,
    PARAGRAPH_PROMPT_TEMPLATE, TITLE_PROMPT_TEMPLATE,
};
use crate::seo::sanitize::{content_sample, strip_tags};

/// Hard ceiling for meta descriptions, per search-snippet convention.
const MAX_DESCRIPTION_LEN: usize = 160;

fn first_paragraph_pattern() -> Regex {
    Regex::new(r"(?s)<p>(.*?)</p>").expect("paragraph pattern is valid")
}

/// Synthesizes a meta description from the post body, working the keyword in
/// when one is known. Results longer than 160 chars are cut to 157 and
/// suffixed with `...` so the returned value is exactly 160.
/// Returns `None` on backend failure.
pub async fn synthesize_description(
    llm: &dyn TextGenerator,
    content: &str,
    keyword: Option<&str>,
) -> Option<String> {
    let prompt = DESCRIPTION_PROMPT_TEMPLATE
        .replace("{content_sample}", &content_sample(content))
        .replace("{keyword}", keyword.unwrap_or(KEYWORD_PLACEHOLDER));

    match llm.generate(&prompt).await {
        Ok(description) => Some(clamp_description(description)),
        Err(e) => {
            warn!("Error generating meta description: {e}");
            None
        }
    }
}

fn clamp_description(description: String) -> String {
    if description.chars().count() <= MAX_DESCRIPTION_LEN {
        return description;
    }
    let mut clamped: String = description
        .chars()
        .take(MAX_DESCRIPTION_LEN - 3)
        .collect();
    clamped.push_str("...");
    clamped
}

/// Synthesizes a 2-3 word focus keyword from title and body. A leading
/// `label:` prefix in the reply is stripped. Returns `None` on failure.
pub async fn synthesize_keyword(
    llm: &dyn TextGenerator,
    content: &str,
    title: &str,
) -> Option<String> {
    let prompt = KEYWORD_PROMPT_TEMPLATE
        .replace("{title}", title)
        .replace("{content_sample}", &content_sample(content));

    match llm.generate(&prompt).await {
        Ok(keyword) => Some(strip_label_prefix(&keyword)),
        Err(e) => {
            warn!("Error generating keyword: {e}");
            None
        }
    }
}

fn strip_label_prefix(keyword: &str) -> String {
    match keyword.split_once(':') {
        Some((_, rest)) => rest.trim().to_string(),
        None => keyword.to_string(),
    }
}

/// Asks for a minimally-edited title containing the keyword. Skips the
/// backend entirely when the keyword is already present. If the reply does
/// not actually contain the keyword, the edit is discarded. Never fails:
/// the worst case is the original title, unchanged.
pub async fn insert_keyword_in_title(
    llm: &dyn TextGenerator,
    title: &str,
    keyword: &str,
) -> String {
    if title.to_lowercase().contains(&keyword.to_lowercase()) {
        return title.to_string();
    }

    let prompt = TITLE_PROMPT_TEMPLATE
        .replace("{keyword}", keyword)
        .replace("{title}", title);

    match llm.generate(&prompt).await {
        Ok(new_title) => {
            if new_title.to_lowercase().contains(&keyword.to_lowercase()) {
                new_title
            } else {
                title.to_string()
            }
        }
        Err(e) => {
            warn!("Error updating title: {e}");
            title.to_string()
        }
    }
}

/// Rewrites the first `<p>…</p>` block to work the keyword in. Content with
/// no paragraph, or whose first paragraph already carries the keyword, is
/// returned unchanged. The rewritten text replaces the original inner
/// paragraph markup via literal substring substitution.
pub async fn insert_keyword_in_first_paragraph(
    llm: &dyn TextGenerator,
    content: &str,
    keyword: &str,
) -> String {
    let first_para = match first_paragraph_pattern()
        .captures(content)
        .and_then(|c| c.get(1))
    {
        Some(m) => m.as_str(),
        None => return content.to_string(),
    };

    let first_para_clean = strip_tags(first_para);
    if first_para_clean
        .to_lowercase()
        .contains(&keyword.to_lowercase())
    {
        return content.to_string();
    }

    let prompt = PARAGRAPH_PROMPT_TEMPLATE
        .replace("{keyword}", keyword)
        .replace("{paragraph}", &first_para_clean);

    match llm.generate(&prompt).await {
        Ok(new_para) => content.replacen(first_para, &new_para, 1),
        Err(e) => {
            warn!("Error updating first paragraph: {e}");
            content.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    use crate::llm_client::{LlmError, TextGenerator};

    /// Scripted backend: pops canned replies in order; an empty script
    /// simulates a dead backend.
    struct StubGenerator {
        replies: Mutex<Vec<String>>,
        calls: Mutex<u32>,
    }

    impl StubGenerator {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: Mutex::new(replies.iter().rev().map(|s| s.to_string()).collect()),
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self::new(&[])
        }

        fn call_count(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl TextGenerator for StubGenerator {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            *self.calls.lock().unwrap() += 1;
            self.replies
                .lock()
                .unwrap()
                .pop()
                .ok_or(LlmError::EmptyContent)
        }
    }

    #[tokio::test]
    async fn test_description_within_limit_is_untouched() {
        let stub = StubGenerator::new(&["Explore the world of vintage cameras."]);
        let result = synthesize_description(&stub, "<p>camera content</p>", None).await;
        assert_eq!(
            result.as_deref(),
            Some("Explore the world of vintage cameras.")
        );
    }

    #[tokio::test]
    async fn test_description_over_limit_is_clamped_to_160_with_ellipsis() {
        let long = "x".repeat(300);
        let stub = StubGenerator::new(&[&long]);
        let result = synthesize_description(&stub, "<p>content</p>", Some("widgets"))
            .await
            .unwrap();
        assert_eq!(result.chars().count(), 160);
        assert!(result.ends_with("..."));
    }

    #[tokio::test]
    async fn test_description_backend_failure_yields_none() {
        let stub = StubGenerator::failing();
        assert!(synthesize_description(&stub, "<p>content</p>", None)
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_keyword_label_prefix_is_stripped() {
        let stub = StubGenerator::new(&["Keyword: vintage cameras"]);
        let result = synthesize_keyword(&stub, "<p>content</p>", "Title").await;
        assert_eq!(result.as_deref(), Some("vintage cameras"));
    }

    #[tokio::test]
    async fn test_keyword_without_prefix_passes_through() {
        let stub = StubGenerator::new(&["vintage cameras"]);
        let result = synthesize_keyword(&stub, "<p>content</p>", "Title").await;
        assert_eq!(result.as_deref(), Some("vintage cameras"));
    }

    #[tokio::test]
    async fn test_title_insertion_accepts_verified_edit() {
        let stub = StubGenerator::new(&["My Great Widgets Post"]);
        let result = insert_keyword_in_title(&stub, "My Great Post", "widgets").await;
        assert_eq!(result, "My Great Widgets Post");
    }

    #[tokio::test]
    async fn test_title_insertion_discards_unverified_edit() {
        let stub = StubGenerator::new(&["Something Entirely Different"]);
        let result = insert_keyword_in_title(&stub, "My Great Post", "widgets").await;
        assert_eq!(result, "My Great Post");
    }

    #[tokio::test]
    async fn test_title_insertion_skips_backend_when_keyword_present() {
        let stub = StubGenerator::failing();
        let result = insert_keyword_in_title(&stub, "All About Widgets", "widgets").await;
        assert_eq!(result, "All About Widgets");
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_title_insertion_survives_backend_failure() {
        let stub = StubGenerator::failing();
        let result = insert_keyword_in_title(&stub, "My Great Post", "widgets").await;
        assert_eq!(result, "My Great Post");
    }

    #[tokio::test]
    async fn test_paragraph_insertion_no_paragraph_returns_input_verbatim() {
        let stub = StubGenerator::failing();
        let content = "<div>no paragraphs here</div>";
        let result = insert_keyword_in_first_paragraph(&stub, content, "widgets").await;
        assert_eq!(result, content);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_paragraph_insertion_skips_when_keyword_present() {
        let stub = StubGenerator::failing();
        let content = "<p>All about Widgets today.</p><p>More.</p>";
        let result = insert_keyword_in_first_paragraph(&stub, content, "widgets").await;
        assert_eq!(result, content);
        assert_eq!(stub.call_count(), 0);
    }

    #[tokio::test]
    async fn test_paragraph_insertion_replaces_only_first_block() {
        let stub = StubGenerator::new(&["Fresh text about widgets."]);
        let content = "<p>Old intro.</p><p>Second paragraph.</p>";
        let result = insert_keyword_in_first_paragraph(&stub, content, "widgets").await;
        assert_eq!(
            result,
            "<p>Fresh text about widgets.</p><p>Second paragraph.</p>"
        );
    }

    #[tokio::test]
    async fn test_paragraph_insertion_survives_backend_failure() {
        let stub = StubGenerator::failing();
        let content = "<p>Old intro.</p>";
        let result = insert_keyword_in_first_paragraph(&stub, content, "widgets").await;
        assert_eq!(result, content);
    }

    #[test]
    fn test_clamp_description_exact_limit_is_kept() {
        let exact = "y".repeat(160);
        assert_eq!(clamp_description(exact.clone()), exact);
    }

    #[test]
    fn test_strip_label_prefix_only_splits_once() {
        assert_eq!(strip_label_prefix("Keyword: a: b"), "a: b");
        assert_eq!(strip_label_prefix("plain"), "plain");
    }
}
