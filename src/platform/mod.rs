pub mod rest;
pub mod types;

use anyhow::Result;
use async_trait::async_trait;
use types::{Account, Post};

/// An authenticated client for the microblogging platform.
///
/// Timeline and search results are delivered newest-first, exactly as the
/// platform returns them; callers reverse when they need chronological order.
#[async_trait]
pub trait PlatformClient: Send + Sync {
    /// Identity of the authenticated account.
    async fn verify_credentials(&self) -> Result<Account>;

    /// Posts on `handle`'s timeline with id greater than `since_id`.
    async fn user_timeline(&self, handle: &str, since_id: u64) -> Result<Vec<Post>>;

    /// Platform-wide search, filtered to posts newer than `since_id` in the
    /// given language.
    async fn search(&self, query: &str, since_id: u64, lang: &str) -> Result<Vec<Post>>;

    async fn repost(&self, post_id: u64) -> Result<()>;

    async fn like(&self, post_id: u64) -> Result<()>;
}
