use crate::clock::Clock;
use crate::config::Config;
use crate::engine::keywords::KeywordSet;
use crate::engine::pass::EngagementPass;
use crate::platform::PlatformClient;
use crate::watermark::WatermarkStore;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

/// The engagement bot: three configured passes run in fixed order, forever.
/// Strictly sequential; the only waits are courtesy delays through `Clock`.
pub struct Bot {
    store: WatermarkStore,
    keywords: KeywordSet,
    instructor_pass: EngagementPass,
    club_pass: EngagementPass,
    search_pass: EngagementPass,
    cycle_start: Duration,
    inter_pass: Duration,
    inter_cycle: Duration,
}

impl Bot {
    pub fn new(config: &Config) -> Self {
        let delays = &config.delays;
        Self {
            store: WatermarkStore::new(&config.state.watermark_file),
            keywords: KeywordSet::new(config.engagement.keywords.iter().cloned()),
            instructor_pass: EngagementPass::instructor_timelines(
                PathBuf::from(&config.registries.instructors),
                delays,
            ),
            club_pass: EngagementPass::club_timelines(
                PathBuf::from(&config.registries.clubs),
                delays,
            ),
            search_pass: EngagementPass::keyword_search(
                config.engagement.search_query.clone(),
                config.platform.search_lang.clone(),
                delays,
            ),
            cycle_start: Duration::from_secs(delays.cycle_start_s),
            inter_pass: Duration::from_secs(delays.inter_pass_s),
            inter_cycle: Duration::from_secs(delays.inter_cycle_s),
        }
    }

    /// Verify credentials once, then loop forever. Returns only on a fatal
    /// error; there is no graceful-shutdown path.
    pub async fn run(&self, client: &dyn PlatformClient, clock: &dyn Clock) -> Result<()> {
        let me = client
            .verify_credentials()
            .await
            .context("credential verification failed")?;
        tracing::info!(id = me.id, handle = me.handle.as_str(), "authenticated");

        loop {
            self.run_cycle(client, clock, me.id).await?;
        }
    }

    /// One full cycle: instructor pass, club pass, search pass, then the
    /// long inter-cycle delay.
    pub async fn run_cycle(
        &self,
        client: &dyn PlatformClient,
        clock: &dyn Clock,
        self_id: u64,
    ) -> Result<()> {
        tracing::info!("engagement cycle started");
        clock.sleep(self.cycle_start).await;

        let outcome = self
            .instructor_pass
            .run(client, clock, &self.store, &self.keywords, self_id)
            .await?;
        tracing::info!(
            pass = self.instructor_pass.name,
            engaged = outcome.engaged,
            failed = outcome.failed,
            "pass complete"
        );
        clock.sleep(self.inter_pass).await;

        let outcome = self
            .club_pass
            .run(client, clock, &self.store, &self.keywords, self_id)
            .await?;
        tracing::info!(
            pass = self.club_pass.name,
            engaged = outcome.engaged,
            failed = outcome.failed,
            "pass complete"
        );
        clock.sleep(self.inter_pass).await;

        let outcome = self
            .search_pass
            .run(client, clock, &self.store, &self.keywords, self_id)
            .await?;
        tracing::info!(
            pass = self.search_pass.name,
            engaged = outcome.engaged,
            failed = outcome.failed,
            "pass complete"
        );

        tracing::info!(
            resume_in_s = self.inter_cycle.as_secs(),
            "cycle complete, going quiet"
        );
        clock.sleep(self.inter_cycle).await;
        Ok(())
    }
}
