//! Instagram recent-media feed.
//!
//! Queries a Graph-style media endpoint and maps the `data` array to
//! [`InstagramPost`]s. Entries without a displayable image are dropped.
//! Network and parse failures surface as [`SourceError`] so the resolver can
//! log them and render the widget empty.

use std::time::Duration;

use serde::Deserialize;

use super::{SourceError, SourceResult};
use crate::config::InstagramConfig;
use crate::models::InstagramPost;

const MEDIA_FIELDS: &str = "id,caption,media_type,media_url,thumbnail_url,permalink,timestamp";

/// Client for the configured media endpoint.
pub struct InstagramFeed {
    url: String,
    token: Option<String>,
    limit: usize,
    client: reqwest::Client,
}

impl InstagramFeed {
    /// Build a feed client, or `None` when no endpoint is configured.
    pub fn from_config(config: &InstagramConfig) -> Option<Self> {
        if !config.is_enabled() {
            return None;
        }
        Some(Self {
            url: config.feed_url.clone(),
            token: config.access_token.clone(),
            limit: config.limit,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .unwrap_or_default(),
        })
    }

    /// Fetch the most recent posts, newest first as the endpoint returns them.
    pub async fn recent_posts(&self) -> SourceResult<Vec<InstagramPost>> {
        let limit = self.limit.to_string();
        let mut req = self
            .client
            .get(&self.url)
            .query(&[("fields", MEDIA_FIELDS), ("limit", limit.as_str())]);
        if let Some(token) = &self.token {
            req = req.query(&[("access_token", token.as_str())]);
        }

        let resp = req.send().await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status().as_u16()));
        }
        let text = resp.text().await?;
        let posts = parse_feed(&text, self.limit)?;
        tracing::debug!(count = posts.len(), "fetched instagram posts");
        Ok(posts)
    }
}

// ── Feed JSON ─────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FeedPage {
    #[serde(default)]
    data: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    id: String,
    #[serde(default)]
    caption: Option<String>,
    #[serde(default)]
    media_type: Option<String>,
    #[serde(default)]
    media_url: Option<String>,
    #[serde(default)]
    thumbnail_url: Option<String>,
    #[serde(default)]
    permalink: Option<String>,
    #[serde(default)]
    timestamp: Option<String>,
}

impl FeedItem {
    /// Videos are shown by their thumbnail; everything else by its media URL.
    fn image(&self) -> Option<&str> {
        let url = match self.media_type.as_deref() {
            Some("VIDEO") => self.thumbnail_url.as_deref().or(self.media_url.as_deref()),
            _ => self.media_url.as_deref(),
        };
        url.filter(|u| !u.is_empty())
    }
}

/// Parse a media response body, keeping at most `limit` displayable posts.
pub(crate) fn parse_feed(json: &str, limit: usize) -> SourceResult<Vec<InstagramPost>> {
    let page: FeedPage = serde_json::from_str(json)?;
    Ok(page
        .data
        .into_iter()
        .filter_map(|item| {
            let media_url = item.image()?.to_string();
            Some(InstagramPost {
                permalink: item.permalink.clone().unwrap_or_default(),
                id: item.id,
                caption: item.caption.filter(|c| !c.trim().is_empty()),
                media_url,
                timestamp: item.timestamp,
            })
        })
        .take(limit)
        .collect())
}
