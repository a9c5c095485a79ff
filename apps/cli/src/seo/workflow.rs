//! Per-post decision workflow and the sequential run driver.
//!
//! Flow per post: read Yoast description → read Rank Math bag → synthesize
//! and persist a keyword if missing → synthesize a description if missing or
//! keyword-less → minimal-edit title and first paragraph → one combined
//! update → report entry.
//!
//! One pass per post, terminal. A failure at any step degrades to leaving
//! that field unchanged; no failure aborts the run.

use std::time::Duration;

use tracing::info;

use crate::llm_client::TextGenerator;
use crate::report::{ReportEntry, RunReport};
use crate::seo::generator::{
    insert_keyword_in_first_paragraph, insert_keyword_in_title, synthesize_description,
    synthesize_keyword,
};
use crate::wordpress::models::{MetaUpdate, Post, PostUpdate};
use crate::wordpress::ContentApi;

/// Delay after each post, to stay clear of the content API's rate limits.
const PACING_DELAY: Duration = Duration::from_millis(500);

/// Presence check deciding whether an existing description must be
/// regenerated around the keyword. Only the description side is lower-cased,
/// so a keyword carrying upper-case letters never matches. Kept behind one
/// name so the comparison is easy to revisit.
fn keyword_missing_from_description(keyword: &str, description: &str) -> bool {
    !description.to_lowercase().contains(keyword)
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Runs one optimization pass over a single post.
pub async fn process_post(
    cms: &dyn ContentApi,
    llm: &dyn TextGenerator,
    post: &Post,
    report: &mut RunReport,
) {
    let post_id = post.id;
    let title = &post.title.rendered;
    let content = &post.content.rendered;

    let mut entry = ReportEntry {
        post_id,
        post_slug: post.slug.clone(),
        original_title: title.clone(),
        updated_title: None,
        meta_description_added: false,
        keyword_added: false,
    };

    // Yoast (read-only) wins for description presence; Rank Math is only
    // consulted when Yoast has nothing.
    let mut existing_description: Option<String> = post
        .yoast_head_json
        .as_ref()
        .and_then(|y| y.description.clone())
        .filter(|d| !d.is_empty());

    let rank_math_data = cms.get_rank_math_data(post_id).await;

    let mut keyword: Option<String> = None;
    if let Some(data) = &rank_math_data {
        if existing_description.is_none() {
            existing_description = data.description.clone().filter(|d| !d.is_empty());
        }
        keyword = data.focus_keyword.clone().filter(|k| !k.is_empty());
    }
    // A freshly generated keyword only counts as existing once persisted.
    let mut keyword_exists = keyword.is_some();

    if !keyword_exists {
        report.log(post_id, "No keyword found, generating one...");
        if let Some(generated) = synthesize_keyword(llm, content, title).await {
            report.log(post_id, format!("Generated keyword: {generated}"));

            if cms.update_rank_math_keyword(post_id, &generated).await {
                report.log(post_id, "Updated Rank Math keyword");
                entry.keyword_added = true;
                keyword_exists = true;
            } else {
                report.log(post_id, "Failed to update Rank Math keyword");
            }
            // Even unpersisted, the keyword still steers description
            // synthesis below.
            keyword = Some(generated);
        }
    }

    let mut generated_description: Option<String> = None;

    match &existing_description {
        None => {
            report.log(post_id, "No meta description found, generating one...");
            generated_description = synthesize_description(llm, content, keyword.as_deref()).await;
            if let Some(desc) = &generated_description {
                report.log(post_id, format!("Generated meta description: {desc}"));
                entry.meta_description_added = true;
            }
        }
        Some(description) if keyword_exists => {
            if let Some(kw) = keyword.as_deref() {
                if keyword_missing_from_description(kw, description) {
                    report.log(
                        post_id,
                        format!(
                            "Meta description exists but doesn't include keyword '{kw}', regenerating..."
                        ),
                    );
                    generated_description =
                        synthesize_description(llm, content, keyword.as_deref()).await;
                    if let Some(desc) = &generated_description {
                        report.log(post_id, format!("Updated meta description: {desc}"));
                        entry.meta_description_added = true;
                    }
                }
            }
        }
        Some(_) => {}
    }

    if keyword_exists {
        if let Some(kw) = keyword.as_deref() {
            if !contains_ignore_case(title, kw) {
                let new_title = insert_keyword_in_title(llm, title, kw).await;
                if new_title != *title {
                    report.log(post_id, format!("Updated title: {new_title}"));
                    entry.updated_title = Some(new_title);
                }
            }
        }
    }

    let mut update = PostUpdate {
        title: entry.updated_title.clone(),
        ..Default::default()
    };

    if keyword_exists {
        if let Some(kw) = keyword.as_deref() {
            if !contains_ignore_case(content, kw) {
                let new_content = insert_keyword_in_first_paragraph(llm, content, kw).await;
                if new_content != *content {
                    report.log(post_id, "Updated first paragraph to include keyword");
                    update.content = Some(new_content);
                }
            }
        }
    }

    if let Some(desc) = &generated_description {
        // Merge into the bag read earlier; the bag also re-carries the
        // keyword so this later meta write cannot clobber the one persisted
        // above (WordPress replaces the whole meta value).
        let mut bag = rank_math_data.unwrap_or_default();
        if bag.focus_keyword.is_none() && keyword_exists {
            bag.focus_keyword = keyword.clone();
        }
        bag.description = Some(desc.clone());

        match bag.to_meta_string() {
            Ok(encoded) => {
                update.meta = Some(MetaUpdate {
                    rank_math_data: encoded,
                });
            }
            Err(e) => {
                report.log(post_id, format!("Error encoding metadata update: {e}"));
            }
        }
    }

    if !update.is_empty() {
        match cms.update_post(post_id, &update).await {
            Ok(()) => report.log(post_id, "Successfully updated post"),
            Err(e) => report.log(post_id, format!("Failed to update post: {e}")),
        }
    }

    report.record(entry);
}

/// Fetches every published post and processes them one at a time, pacing
/// between posts. Blocks until the whole listing has been worked through.
pub async fn run(cms: &dyn ContentApi, llm: &dyn TextGenerator, report: &mut RunReport) {
    let posts = cms.fetch_all_published().await;
    let total = posts.len();
    info!("Retrieved {total} published posts");

    for (i, post) in posts.iter().enumerate() {
        info!("Processing post {}/{} (ID: {})", i + 1, total, post.id);
        process_post(cms, llm, post, report).await;
        tokio::time::sleep(PACING_DELAY).await;
    }
}
