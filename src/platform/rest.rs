use super::types::*;
use super::PlatformClient;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

pub struct RestClient {
    client: Client,
    token: String,
    base_url: String,
}

impl RestClient {
    pub fn new(token: String, base_url: &str) -> Self {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            token,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Authenticated GET, parsed as JSON.
    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str, what: &str) -> Result<T> {
        let resp = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("GET {} failed", what))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("GET {} failed ({}): {}", what, status, body);
        }
        resp.json()
            .await
            .with_context(|| format!("failed to parse {} response", what))
    }

    /// Authenticated POST with no meaningful response body.
    async fn post_action(&self, url: &str, what: &str) -> Result<()> {
        let resp = self
            .client
            .post(url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("POST {} failed", what))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("POST {} failed ({}): {}", what, status, body);
        }
        Ok(())
    }
}

#[async_trait]
impl PlatformClient for RestClient {
    async fn verify_credentials(&self) -> Result<Account> {
        let url = format!("{}/1.1/account/verify_credentials.json", self.base_url);
        self.get_json(&url, "verify_credentials").await
    }

    async fn user_timeline(&self, handle: &str, since_id: u64) -> Result<Vec<Post>> {
        let url = format!(
            "{}/1.1/statuses/user_timeline.json?handle={}&since_id={}",
            self.base_url, handle, since_id,
        );
        self.get_json(&url, "user_timeline").await
    }

    async fn search(&self, query: &str, since_id: u64, lang: &str) -> Result<Vec<Post>> {
        let url = format!(
            "{}/1.1/search/posts.json?q={}&since_id={}&lang={}",
            self.base_url,
            urlencode(query),
            since_id,
            lang,
        );
        let resp: SearchResponse = self.get_json(&url, "search").await?;
        Ok(resp.statuses)
    }

    async fn repost(&self, post_id: u64) -> Result<()> {
        let url = format!("{}/1.1/statuses/repost/{}.json", self.base_url, post_id);
        self.post_action(&url, "repost").await
    }

    async fn like(&self, post_id: u64) -> Result<()> {
        let url = format!("{}/1.1/favorites/create.json?id={}", self.base_url, post_id);
        self.post_action(&url, "like").await
    }
}

/// Percent-encode a query string for use in a URL. Unreserved characters
/// (RFC 3986) pass through untouched.
fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urlencode_quoted_phrases() {
        assert_eq!(urlencode("\"data science\""), "%22data%20science%22");
        assert_eq!(urlencode("abc-123_~."), "abc-123_~.");
        assert_eq!(urlencode("#python"), "%23python");
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let client = RestClient::new("t".to_string(), "https://api.example/");
        assert_eq!(client.base_url, "https://api.example");
    }
}
