use serde::Deserialize;

/// Wire types for the platform's v1.1-style JSON API.

/// The authenticated account, from `verify_credentials`.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: u64,
    pub handle: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    pub id: u64,
    pub handle: String,
}

/// A single post as delivered by the timeline and search endpoints.
/// `in_reply_to_id` absent (null) means a top-level post.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    pub id: u64,
    pub user: Author,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub in_reply_to_id: Option<u64>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Post {
    pub fn is_reply(&self) -> bool {
        self.in_reply_to_id.is_some()
    }
}

/// Search endpoint envelope: results come wrapped in a `statuses` array.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub statuses: Vec<Post>,
}
