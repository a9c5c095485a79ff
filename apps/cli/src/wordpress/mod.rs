//! WordPress REST client — listing, edit-context reads, and partial updates.
//!
//! All requests authenticate with an Application Password over basic auth.
//! Read paths degrade to "no data" on failure; only `update_post` surfaces a
//! typed error, because the workflow needs to log the exact failure.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;

use models::{MetaUpdate, Post, PostUpdate, RankMathData};

/// Page size for the published-posts listing. A batch shorter than this
/// marks the final page.
const PER_PAGE: usize = 100;

const META_KEY: &str = "rank_math_data";

#[derive(Debug, Error)]
pub enum WpError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The CMS operations the workflow depends on. `WpClient` is the production
/// implementor; tests script this seam instead of a live site.
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// Every published post, possibly truncated by a mid-listing failure.
    async fn fetch_all_published(&self) -> Vec<Post>;

    /// The Rank Math bag for a post, or `None` on any read/parse failure.
    async fn get_rank_math_data(&self, post_id: u64) -> Option<RankMathData>;

    /// Submits a partial update (any of title / content / meta) in a single
    /// request. Not atomic: on failure it is unknown which fields landed, so
    /// the caller logs and moves on rather than reconciling.
    async fn update_post(&self, post_id: u64, update: &PostUpdate) -> Result<(), WpError>;

    /// Writes the focus keyword into the Rank Math bag, preserving whatever
    /// else the bag already holds. Returns whether the write succeeded.
    async fn update_rank_math_keyword(&self, post_id: u64, keyword: &str) -> bool {
        let mut data = self.get_rank_math_data(post_id).await.unwrap_or_default();
        data.focus_keyword = Some(keyword.to_string());

        let encoded = match data.to_meta_string() {
            Ok(s) => s,
            Err(e) => {
                warn!("Error encoding Rank Math data for post {post_id}: {e}");
                return false;
            }
        };

        let update = PostUpdate {
            meta: Some(MetaUpdate {
                rank_math_data: encoded,
            }),
            ..Default::default()
        };

        match self.update_post(post_id, &update).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Error updating Rank Math keyword for post {post_id}: {e}");
                false
            }
        }
    }
}

/// Client for one WordPress site, rooted at `<base_url>/wp-json/wp/v2`.
#[derive(Clone)]
pub struct WpClient {
    client: Client,
    api_url: String,
    username: String,
    app_password: String,
}

impl WpClient {
    pub fn new(base_url: &str, username: String, app_password: String) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(60))
                .build()
                .expect("Failed to build HTTP client"),
            api_url: format!("{base}/wp-json/wp/v2"),
            username,
            app_password,
        }
    }
}

#[async_trait]
impl ContentApi for WpClient {
    /// Pages through the listing endpoint until a partial or empty page.
    ///
    /// A non-success response ends pagination early and returns whatever was
    /// already collected — a truncated listing is preferred over a dead run.
    /// No retries.
    async fn fetch_all_published(&self) -> Vec<Post> {
        let mut posts = Vec::new();
        let mut page: u32 = 1;

        loop {
            let response = self
                .client
                .get(format!("{}/posts", self.api_url))
                .query(&[
                    ("status", "publish"),
                    ("per_page", &PER_PAGE.to_string()),
                    ("page", &page.to_string()),
                ])
                .basic_auth(&self.username, Some(&self.app_password))
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    warn!("Error fetching posts page {page}: {e}");
                    break;
                }
            };

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                warn!("Error fetching posts: {status} - {body}");
                break;
            }

            let batch: Vec<Post> = match response.json().await {
                Ok(b) => b,
                Err(e) => {
                    warn!("Error decoding posts page {page}: {e}");
                    break;
                }
            };

            if batch.is_empty() {
                break;
            }

            let batch_len = batch.len();
            posts.extend(batch);
            page += 1;

            if batch_len < PER_PAGE {
                break;
            }
        }

        posts
    }

    /// Reads the Rank Math bag via an edit-context fetch (the bag is not
    /// visible in the public view context).
    async fn get_rank_math_data(&self, post_id: u64) -> Option<RankMathData> {
        let response = self
            .client
            .get(format!("{}/posts/{post_id}", self.api_url))
            .query(&[("context", "edit")])
            .basic_auth(&self.username, Some(&self.app_password))
            .send()
            .await;

        let response = match response {
            Ok(r) => r,
            Err(e) => {
                debug!("Error fetching Rank Math data for post {post_id}: {e}");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(
                "Edit-context read for post {post_id} returned {}",
                response.status()
            );
            return None;
        }

        let post_data: Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                debug!("Error decoding edit-context post {post_id}: {e}");
                return None;
            }
        };

        post_data
            .get("meta")
            .and_then(|meta| meta.get(META_KEY))
            .and_then(RankMathData::from_meta_value)
    }

    async fn update_post(&self, post_id: u64, update: &PostUpdate) -> Result<(), WpError> {
        let response = self
            .client
            .post(format!("{}/posts/{post_id}", self.api_url))
            .basic_auth(&self.username, Some(&self.app_password))
            .json(update)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WpError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
