use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::http_client::http_client;

pub const GROUPED_FEED_PATH: &str = "data/sports/soccer.json";

/// Where feed documents come from. Paths are relative, e.g. `data/epl.json`.
pub trait FeedSource: Sync {
    fn fetch_text(&self, path: &str) -> Result<String>;

    fn describe(&self) -> String;
}

/// Feed path for a flat league feed. League ids are plain slugs.
pub fn flat_feed_path(league: &str) -> Result<String> {
    let valid = !league.is_empty()
        && league
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(anyhow!("invalid league id {league:?}"));
    }
    Ok(format!("data/{league}.json"))
}

pub struct HttpFeedSource {
    base_url: String,
    client: Client,
}

impl HttpFeedSource {
    pub fn new(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch_text(&self, path: &str) -> Result<String> {
        let url = self.url_for(path);

        let resp = self
            .client
            .get(&url)
            .header(USER_AGENT, "arb_cards/0.1")
            .header(ACCEPT, "application/json")
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {status} for {url}"));
        }
        Ok(body)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

pub struct DirFeedSource {
    root: PathBuf,
}

impl DirFeedSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl FeedSource for DirFeedSource {
    fn fetch_text(&self, path: &str) -> Result<String> {
        let full = self.root.join(path.trim_start_matches('/'));
        fs::read_to_string(&full).with_context(|| format!("failed reading {}", full.display()))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// HTTP source for `http(s)://` roots, local directory otherwise.
pub fn source_for_root(root: &str, timeout_secs: u64) -> Result<Box<dyn FeedSource>> {
    let trimmed = root.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        let client = http_client(timeout_secs)?;
        Ok(Box::new(HttpFeedSource::new(trimmed, client)))
    } else {
        Ok(Box::new(DirFeedSource::new(trimmed)))
    }
}
