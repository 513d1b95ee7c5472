use anyhow::{Context, Result};
use serde::Deserialize;
use std::io::{self, Write};
use std::path::Path;

const ENV_FILE: &str = ".env";
const TOKEN_VAR: &str = "PLATFORM_API_TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub platform: PlatformConfig,
    pub state: StateConfig,
    pub registries: RegistriesConfig,
    pub engagement: EngagementConfig,
    #[serde(default)]
    pub delays: DelaysConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlatformConfig {
    pub base_url: String,
    #[serde(default = "default_search_lang")]
    pub search_lang: String,
}

fn default_search_lang() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateConfig {
    pub watermark_file: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RegistriesConfig {
    pub instructors: String,
    pub clubs: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EngagementConfig {
    pub keywords: Vec<String>,
    pub search_query: String,
}

/// Courtesy-delay schedule, in seconds. Defaults match the documented
/// behavior; config.toml may override any of them.
#[derive(Debug, Deserialize, Clone)]
pub struct DelaysConfig {
    #[serde(default = "default_pre_engage_timeline")]
    pub pre_engage_timeline_s: u64,
    #[serde(default = "default_post_handle_instructor")]
    pub post_handle_instructor_s: u64,
    #[serde(default = "default_post_handle_club")]
    pub post_handle_club_s: u64,
    #[serde(default = "default_pre_engage_search")]
    pub pre_engage_search_s: u64,
    #[serde(default = "default_post_result_search")]
    pub post_result_search_s: u64,
    #[serde(default = "default_inter_pass")]
    pub inter_pass_s: u64,
    #[serde(default = "default_cycle_start")]
    pub cycle_start_s: u64,
    #[serde(default = "default_inter_cycle")]
    pub inter_cycle_s: u64,
}

fn default_pre_engage_timeline() -> u64 { 2 }
fn default_post_handle_instructor() -> u64 { 5 }
fn default_post_handle_club() -> u64 { 2 }
fn default_pre_engage_search() -> u64 { 3 }
fn default_post_result_search() -> u64 { 30 }
fn default_inter_pass() -> u64 { 5 }
fn default_cycle_start() -> u64 { 2 }
fn default_inter_cycle() -> u64 { 60 }

impl Default for DelaysConfig {
    fn default() -> Self {
        Self {
            pre_engage_timeline_s: default_pre_engage_timeline(),
            post_handle_instructor_s: default_post_handle_instructor(),
            post_handle_club_s: default_post_handle_club(),
            pre_engage_search_s: default_pre_engage_search(),
            post_result_search_s: default_post_result_search(),
            inter_pass_s: default_inter_pass(),
            cycle_start_s: default_cycle_start(),
            inter_cycle_s: default_inter_cycle(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| "Failed to parse config TOML")?;
        Ok(config)
    }

    /// Load .env file into process environment. Real env vars take precedence.
    pub fn load_env_file() {
        let path = Path::new(ENV_FILE);
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => return,
        };
        // Strip BOM if present (common on Windows-created files)
        let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
        for line in content.lines() {
            let line = line.trim().trim_matches('\r');
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim();
                let value = value.trim().trim_matches('"').trim_matches('\'');
                if std::env::var(key).is_err() {
                    std::env::set_var(key, value);
                }
            }
        }
    }

    /// The API token comes from the environment, or is prompted at startup.
    /// Prompted values are saved to .env for future runs.
    pub fn api_token() -> Result<String> {
        match std::env::var(TOKEN_VAR) {
            Ok(token) if !token.is_empty() => Ok(sanitize_token(&token)),
            _ => {
                let token = prompt("Platform API token")?;
                save_env_var(TOKEN_VAR, &token);
                Ok(token)
            }
        }
    }
}

fn prompt(label: &str) -> Result<String> {
    print!("  {} > ", label);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let value = input.trim().to_string();
    if value.is_empty() {
        anyhow::bail!("{} cannot be empty", label);
    }
    Ok(value)
}

/// Strip carriage returns, BOM, and other invisible chars from a token value.
fn sanitize_token(raw: &str) -> String {
    raw.replace(['\r', '\u{feff}', '\u{200b}'], "")
        .trim()
        .to_string()
}

/// Append a KEY=VALUE line to .env and set it in the current process.
fn save_env_var(key: &str, value: &str) {
    std::env::set_var(key, value);
    let path = Path::new(ENV_FILE);
    let mut contents = std::fs::read_to_string(path).unwrap_or_default();
    if !contents.is_empty() && !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents.push_str(&format!("{}={}\n", key, value));
    let _ = std::fs::write(path, contents);
}
