// Integration tests for the full engagement cycle: three passes sharing one
// watermark file, driven by a scripted platform client and a recording clock.

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use async_trait::async_trait;
    use signal_boost::bot::Bot;
    use signal_boost::clock::Clock;
    use signal_boost::config::Config;
    use signal_boost::platform::types::{Account, Author, Post};
    use signal_boost::platform::PlatformClient;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use std::time::Duration;

    const SELF_ID: u64 = 42;

    struct ScriptedClient {
        timelines: HashMap<String, Vec<Post>>,
        search_results: Vec<Post>,
        reposts: Mutex<Vec<u64>>,
        likes: Mutex<Vec<u64>>,
    }

    impl ScriptedClient {
        fn new() -> Self {
            Self {
                timelines: HashMap::new(),
                search_results: Vec::new(),
                reposts: Mutex::new(Vec::new()),
                likes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PlatformClient for ScriptedClient {
        async fn verify_credentials(&self) -> Result<Account> {
            Ok(Account { id: SELF_ID, handle: "boost_bot".to_string() })
        }

        // Platform-side since_id filtering, newest first.
        async fn user_timeline(&self, handle: &str, since_id: u64) -> Result<Vec<Post>> {
            let mut posts: Vec<Post> = self
                .timelines
                .get(handle)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .filter(|p| p.id > since_id)
                .collect();
            posts.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(posts)
        }

        async fn search(&self, _query: &str, since_id: u64, _lang: &str) -> Result<Vec<Post>> {
            let mut posts: Vec<Post> = self
                .search_results
                .iter()
                .filter(|p| p.id > since_id)
                .cloned()
                .collect();
            posts.sort_by(|a, b| b.id.cmp(&a.id));
            Ok(posts)
        }

        async fn repost(&self, post_id: u64) -> Result<()> {
            self.reposts.lock().unwrap().push(post_id);
            Ok(())
        }

        async fn like(&self, post_id: u64) -> Result<()> {
            self.likes.lock().unwrap().push(post_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingClock {
        slept: Mutex<Vec<Duration>>,
    }

    #[async_trait]
    impl Clock for RecordingClock {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    fn post(id: u64, author_id: u64, text: &str) -> Post {
        Post {
            id,
            user: Author { id: author_id, handle: format!("user{}", author_id) },
            text: text.to_string(),
            in_reply_to_id: None,
            created_at: None,
        }
    }

    struct Fixture {
        config: Config,
        files: Vec<PathBuf>,
    }

    impl Fixture {
        /// Config rooted in the temp dir, watermark seeded, both registries
        /// written with the given handle lists.
        fn new(name: &str, watermark: u64, instructors: &[&str], clubs: &[&str]) -> Self {
            let dir = std::env::temp_dir();
            let tag = format!("{}-{}", name, std::process::id());
            let watermark_file = dir.join(format!("signal-boost-it-wm-{}.txt", tag));
            let instructors_file = dir.join(format!("signal-boost-it-ins-{}.json", tag));
            let clubs_file = dir.join(format!("signal-boost-it-club-{}.json", tag));

            std::fs::write(&watermark_file, watermark.to_string()).unwrap();
            std::fs::write(
                &instructors_file,
                serde_json::json!({ "handles": instructors }).to_string(),
            )
            .unwrap();
            std::fs::write(
                &clubs_file,
                serde_json::json!({ "handles": clubs }).to_string(),
            )
            .unwrap();

            let toml_str = format!(
                r#"
                [platform]
                base_url = "https://api.microblog.example"

                [state]
                watermark_file = {:?}

                [registries]
                instructors = {:?}
                clubs = {:?}

                [engagement]
                keywords = ["dsc", "data science"]
                search_query = "\"data science\" -filter:reposts"
                "#,
                watermark_file.display().to_string(),
                instructors_file.display().to_string(),
                clubs_file.display().to_string(),
            );
            let config: Config = toml::from_str(&toml_str).unwrap();

            Self {
                config,
                files: vec![watermark_file, instructors_file, clubs_file],
            }
        }

        fn watermark(&self) -> u64 {
            std::fs::read_to_string(&self.files[0])
                .unwrap()
                .trim()
                .parse()
                .unwrap()
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            for f in &self.files {
                std::fs::remove_file(f).ok();
            }
        }
    }

    #[tokio::test]
    async fn test_full_cycle_threads_watermark_through_all_passes() {
        let fx = Fixture::new("full-cycle", 100, &["acct1"], &["acct2"]);

        let mut client = ScriptedClient::new();
        // Instructor pass: one matching post, advances watermark to 105.
        client
            .timelines
            .insert("acct1".to_string(), vec![post(105, 7, "we love data science")]);
        // Club pass: 103 is below the new watermark (platform-side filter),
        // 110 matches and advances the watermark again.
        client.timelines.insert(
            "acct2".to_string(),
            vec![post(103, 8, "dsc old news"), post(110, 8, "dsc hackathon")],
        );
        // Search pass: 115 is the bot's own post (skipped), 120 is engaged
        // without any local keyword check.
        client.search_results = vec![
            post(115, SELF_ID, "my own announcement"),
            post(120, 9, "unrelated text entirely"),
        ];

        let clock = RecordingClock::default();
        let bot = Bot::new(&fx.config);
        bot.run_cycle(&client, &clock, SELF_ID).await.unwrap();

        assert_eq!(*client.reposts.lock().unwrap(), vec![105, 110, 120]);
        assert_eq!(*client.likes.lock().unwrap(), vec![105, 110, 120]);
        assert_eq!(fx.watermark(), 120);
    }

    #[tokio::test]
    async fn test_quiet_cycle_leaves_watermark_untouched() {
        let fx = Fixture::new("quiet", 100, &["acct1"], &[]);
        let client = ScriptedClient::new();
        let clock = RecordingClock::default();

        let bot = Bot::new(&fx.config);
        bot.run_cycle(&client, &clock, SELF_ID).await.unwrap();

        assert!(client.reposts.lock().unwrap().is_empty());
        assert!(client.likes.lock().unwrap().is_empty());
        assert_eq!(fx.watermark(), 100);
    }

    #[tokio::test]
    async fn test_cycle_delays_bracket_the_passes() {
        let fx = Fixture::new("delays", 100, &[], &[]);
        let client = ScriptedClient::new();
        let clock = RecordingClock::default();

        let bot = Bot::new(&fx.config);
        bot.run_cycle(&client, &clock, SELF_ID).await.unwrap();

        // Empty registries and no search hits: only the loop-level delays.
        let slept = clock.slept.lock().unwrap().clone();
        assert_eq!(
            slept,
            vec![
                Duration::from_secs(2),  // cycle start
                Duration::from_secs(5),  // after instructor pass
                Duration::from_secs(5),  // after club pass
                Duration::from_secs(60), // inter-cycle
            ]
        );
    }

    #[tokio::test]
    async fn test_run_aborts_when_watermark_file_is_missing() {
        let fx = Fixture::new("fatal", 100, &[], &[]);
        std::fs::remove_file(&fx.files[0]).unwrap();

        let client = ScriptedClient::new();
        let clock = RecordingClock::default();
        let bot = Bot::new(&fx.config);

        assert!(bot.run_cycle(&client, &clock, SELF_ID).await.is_err());
        // Re-create so Drop's cleanup has something to remove.
        std::fs::write(&fx.files[0], "0").unwrap();
    }
}
