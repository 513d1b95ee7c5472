mod bot;
mod clock;
mod config;
mod engine;
mod platform;
mod registry;
mod watermark;

use anyhow::Result;
use bot::Bot;
use clock::SystemClock;
use config::Config;
use platform::rest::RestClient;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "signal_boost=info".into()),
        )
        .init();

    let config = Config::load(Path::new("config.toml"))?;

    // Saved token from .env (real env vars take precedence), else prompt.
    Config::load_env_file();
    let token = Config::api_token()?;

    let client = RestClient::new(token, &config.platform.base_url);
    let bot = Bot::new(&config);

    bot.run(&client, &SystemClock).await
}
