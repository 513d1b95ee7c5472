use super::keywords::KeywordSet;
use crate::clock::Clock;
use crate::config::DelaysConfig;
use crate::platform::types::Post;
use crate::platform::PlatformClient;
use crate::registry;
use crate::watermark::WatermarkStore;
use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Where a pass draws its candidate posts from.
pub enum PostSource {
    /// One timeline fetch per handle in the registry document, which is
    /// re-read from disk at the start of every pass.
    Timelines { registry: PathBuf },
    /// One platform-wide search with a static query.
    Search { query: String, lang: String },
}

/// Courtesy delays applied inside a pass.
pub struct DelaySchedule {
    /// Before each repost+like.
    pub pre_engage: Duration,
    /// After each non-skipped item (search pass only; zero elsewhere).
    pub post_item: Duration,
    /// After finishing each handle's timeline (zero for the search pass).
    pub post_batch: Duration,
}

/// One fetch-filter-engage pass over a single source. The three configured
/// passes are instances of this type; their behavioral differences are
/// explicit switches rather than separate code paths.
pub struct EngagementPass {
    pub name: &'static str,
    source: PostSource,
    /// Skip the post whose id equals the loaded watermark exactly. Only the
    /// instructor pass carries this boundary exclusion; the club pass does
    /// not, and that asymmetry is preserved as specified behavior.
    exclude_watermark_id: bool,
    /// Skip results authored by the bot's own account (search pass).
    exclude_self: bool,
    /// Engage only on keyword match. The search pass leaves filtering to the
    /// query string and engages every non-skipped result.
    keyword_filtered: bool,
    delays: DelaySchedule,
}

/// What a pass did, with the collected ids as an explicit return value
/// rather than shared state.
#[derive(Debug, Default)]
pub struct PassOutcome {
    /// Ids of every non-skipped post, engaged or not.
    pub collected: Vec<u64>,
    pub engaged: usize,
    pub failed: usize,
}

impl PassOutcome {
    pub fn high_water(&self) -> Option<u64> {
        self.collected.iter().copied().max()
    }
}

impl EngagementPass {
    pub fn instructor_timelines(registry: PathBuf, delays: &DelaysConfig) -> Self {
        Self {
            name: "instructor-timelines",
            source: PostSource::Timelines { registry },
            exclude_watermark_id: true,
            exclude_self: false,
            keyword_filtered: true,
            delays: DelaySchedule {
                pre_engage: Duration::from_secs(delays.pre_engage_timeline_s),
                post_item: Duration::ZERO,
                post_batch: Duration::from_secs(delays.post_handle_instructor_s),
            },
        }
    }

    pub fn club_timelines(registry: PathBuf, delays: &DelaysConfig) -> Self {
        Self {
            name: "club-timelines",
            source: PostSource::Timelines { registry },
            exclude_watermark_id: false,
            exclude_self: false,
            keyword_filtered: true,
            delays: DelaySchedule {
                pre_engage: Duration::from_secs(delays.pre_engage_timeline_s),
                post_item: Duration::ZERO,
                post_batch: Duration::from_secs(delays.post_handle_club_s),
            },
        }
    }

    pub fn keyword_search(query: String, lang: String, delays: &DelaysConfig) -> Self {
        Self {
            name: "keyword-search",
            source: PostSource::Search { query, lang },
            exclude_watermark_id: false,
            exclude_self: true,
            keyword_filtered: false,
            delays: DelaySchedule {
                pre_engage: Duration::from_secs(delays.pre_engage_search_s),
                post_item: Duration::from_secs(delays.post_result_search_s),
                post_batch: Duration::ZERO,
            },
        }
    }

    /// Run one pass: load the watermark, fetch and process every batch, then
    /// persist the maximum collected id (if any). Fetch and registry errors
    /// propagate and abort the run; engagement errors are logged per item and
    /// the pass continues.
    pub async fn run(
        &self,
        client: &dyn PlatformClient,
        clock: &dyn Clock,
        store: &WatermarkStore,
        keywords: &KeywordSet,
        self_id: u64,
    ) -> Result<PassOutcome> {
        let since_id = store.load()?;
        let mut outcome = PassOutcome::default();

        match &self.source {
            PostSource::Timelines { registry } => {
                let handles = registry::load_handles(registry)?;
                for handle in &handles {
                    let posts = client.user_timeline(handle, since_id).await?;
                    self.process_batch(client, clock, keywords, self_id, since_id, posts, &mut outcome)
                        .await;
                    clock.sleep(self.delays.post_batch).await;
                    tracing::info!(pass = self.name, handle = handle.as_str(), "done checking timeline");
                }
            }
            PostSource::Search { query, lang } => {
                let posts = client.search(query, since_id, lang).await?;
                self.process_batch(client, clock, keywords, self_id, since_id, posts, &mut outcome)
                    .await;
            }
        }

        if let Some(high) = outcome.high_water() {
            store.save(high)?;
        }

        Ok(outcome)
    }

    /// Process one batch of posts, oldest first (the platform delivers
    /// newest-first, so the batch is reversed here).
    #[allow(clippy::too_many_arguments)]
    async fn process_batch(
        &self,
        client: &dyn PlatformClient,
        clock: &dyn Clock,
        keywords: &KeywordSet,
        self_id: u64,
        since_id: u64,
        posts: Vec<Post>,
        outcome: &mut PassOutcome,
    ) {
        for post in posts.into_iter().rev() {
            if post.is_reply() {
                continue;
            }
            if self.exclude_watermark_id && post.id == since_id {
                continue;
            }
            if self.exclude_self && post.user.id == self_id {
                continue;
            }

            let should_engage = !self.keyword_filtered || keywords.matches(&post.text);
            if should_engage {
                tracing::info!(
                    pass = self.name,
                    id = post.id,
                    author = post.user.handle.as_str(),
                    posted_at = post.created_at.map(|t| t.to_rfc3339()).as_deref(),
                    "found a new post"
                );
                clock.sleep(self.delays.pre_engage).await;
                match engage(client, post.id).await {
                    Ok(()) => {
                        outcome.engaged += 1;
                        tracing::info!(
                            pass = self.name,
                            id = post.id,
                            author = post.user.handle.as_str(),
                            "reposted and liked"
                        );
                    }
                    Err(e) => {
                        outcome.failed += 1;
                        tracing::error!(
                            pass = self.name,
                            id = post.id,
                            author = post.user.handle.as_str(),
                            error = %format!("{:#}", e),
                            "engagement failed"
                        );
                    }
                }
            }

            clock.sleep(self.delays.post_item).await;
            outcome.collected.push(post.id);
        }
    }
}

/// The combined engagement action. A repost failure short-circuits the like,
/// matching the single guarded block the behavior is specified with.
async fn engage(client: &dyn PlatformClient, post_id: u64) -> Result<()> {
    client.repost(post_id).await?;
    client.like(post_id).await
}
