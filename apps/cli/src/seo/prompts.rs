// All generation prompt templates for the SEO module.
// Placeholders ({content_sample}, {keyword}, {title}, {paragraph}) are
// filled by the builder functions in `generator.rs` before sending.

/// Meta-description synthesis. Replace `{content_sample}` and `{keyword}`
/// (the keyword slot receives either the known keyword or an instruction to
/// pick one).
pub const DESCRIPTION_PROMPT_TEMPLATE: &str = r#"Write a compelling meta description for a WordPress blog post.

Content snippet: "{content_sample}"

Requirements:
- Maximum length: 160 characters
- Include this keyword if provided: "{keyword}"
- Focus on enticing readers to click
- Be concise and informative
- Use active voice
- If no keyword is provided, include a relevant 2-3 word keyword phrase
- Output ONLY the meta description text, nothing else

If no keyword was provided, first identify a relevant 2-3 word keyword from the content, then include it naturally."#;

/// Slotted into the description prompt's keyword position when none is known.
pub const KEYWORD_PLACEHOLDER: &str = "[generate appropriate keyword]";

/// Focus-keyword synthesis. Replace `{title}` and `{content_sample}`.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Analyze this WordPress blog post and identify the most relevant 2-3 word SEO keyword phrase that:
1. Accurately represents the main topic
2. Has search value
3. Is naturally usable in titles and descriptions

Title: "{title}"
Content snippet: "{content_sample}"

Output ONLY the keyword phrase, nothing else."#;

/// Minimal-edit title insertion. Replace `{keyword}` and `{title}`.
pub const TITLE_PROMPT_TEMPLATE: &str = r#"I need to include the keyword "{keyword}" in this title while maintaining readability:
"{title}"

Rules:
- Make minimal changes to the original title
- Keep the title natural and readable
- If the keyword can't be naturally included, do not change the title
- Output ONLY the updated title, nothing else"#;

/// Minimal-edit paragraph insertion. Replace `{keyword}` and `{paragraph}`.
/// The reply must be plain text — it is substituted back into the HTML body.
pub const PARAGRAPH_PROMPT_TEMPLATE: &str = r#"I need to include the keyword "{keyword}" in this paragraph while maintaining readability:
"{paragraph}"

Rules:
- Make minimal changes to the original paragraph
- Keep the text natural and readable
- Output ONLY the updated paragraph, nothing else
- Do not add any HTML tags"#;
