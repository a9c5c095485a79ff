//! Wire types for the WordPress REST API (`/wp-json/wp/v2`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A published post as returned by the posts listing endpoint.
///
/// `yoast_head_json` (schema exposed by the Yoast plugin) is read-only and
/// only carries the rendered description. The Rank Math bag lives in `meta`
/// and is only visible in `context=edit` reads.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: u64,
    pub slug: String,
    pub title: Rendered,
    pub content: Rendered,
    #[serde(default)]
    pub yoast_head_json: Option<YoastHead>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Rendered {
    pub rendered: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YoastHead {
    #[serde(default)]
    pub description: Option<String>,
}

/// The Rank Math SEO bag stored under `meta.rank_math_data`.
///
/// WordPress transmits it either as a JSON object or as a JSON-encoded
/// string depending on how the meta field was registered; both shapes decode
/// to this struct. Unknown fields are preserved so a keyword write never
/// drops keys other tooling put there.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RankMathData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focus_keyword: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

impl RankMathData {
    /// Decodes the raw meta value, accepting both the string-encoded and the
    /// plain-object transmission shapes. Returns `None` on any parse failure.
    pub fn from_meta_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(encoded) => serde_json::from_str(encoded).ok(),
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }

    /// Re-encodes the bag as the JSON string form expected by the meta
    /// update endpoint.
    pub fn to_meta_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// One best-effort partial update. Absent fields are omitted from the
/// request body; a request with all fields absent must not be sent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetaUpdate {
    pub rank_math_data: String,
}

impl PostUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.meta.is_none()
    }
}
