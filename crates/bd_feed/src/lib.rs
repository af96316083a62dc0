//! RSS feed scanning for the automated draft flow.
//!
//! Fetch and parse failures never leave this crate: the scanner degrades to
//! an empty item list and the pipeline reports "nothing to do".

use async_trait::async_trait;
use bd_core::{Error, FeedItem, FeedSource, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
}

pub struct RssFeed {
    client: reqwest::Client,
}

impl RssFeed {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder().timeout(FETCH_TIMEOUT).build()?;
        Ok(Self { client })
    }

    async fn fetch(&self, feed_url: &str) -> Result<Vec<FeedItem>> {
        let body = self
            .client
            .get(feed_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        parse_rss(&body)
    }
}

#[async_trait]
impl FeedSource for RssFeed {
    async fn fetch_items(&self, feed_url: &str) -> Vec<FeedItem> {
        match self.fetch(feed_url).await {
            Ok(items) => {
                debug!("📡 Feed returned {} items", items.len());
                items
            }
            Err(e) => {
                warn!("📡 Feed fetch failed, treating as empty: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parses an `rss > channel > item` document into feed items.
pub fn parse_rss(xml: &str) -> Result<Vec<FeedItem>> {
    let rss: Rss = quick_xml::de::from_str(xml)
        .map_err(|e| Error::External(anyhow::anyhow!("feed parse failed: {}", e)))?;
    Ok(rss
        .channel
        .items
        .into_iter()
        .map(|item| FeedItem {
            title: item.title,
            link: item.link,
        })
        .collect())
}

/// Returns the first item whose title contains any keyword as a
/// case-sensitive substring, preserving feed order. No ranking.
pub fn select_by_keyword<'a>(items: &'a [FeedItem], keywords: &[&str]) -> Option<&'a FeedItem> {
    items
        .iter()
        .find(|item| keywords.iter().any(|keyword| item.title.contains(keyword)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>ニュース</title>
    <item>
      <title>株価速報</title>
      <link>https://example.com/a</link>
    </item>
    <item>
      <title>AI新技術発表</title>
      <link>https://example.com/b</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn test_parse_rss_yields_items_in_order() {
        let items = parse_rss(FEED).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "株価速報");
        assert_eq!(items[0].link, "https://example.com/a");
        assert_eq!(items[1].title, "AI新技術発表");
    }

    #[test]
    fn test_parse_rss_rejects_malformed_xml() {
        assert!(parse_rss("<rss><channel>").is_err());
        assert!(parse_rss("not xml at all").is_err());
    }

    #[test]
    fn test_parse_rss_handles_empty_channel() {
        let xml = r#"<rss version="2.0"><channel><title>empty</title></channel></rss>"#;
        assert!(parse_rss(xml).unwrap().is_empty());
    }

    #[test]
    fn test_select_by_keyword_first_match_wins() {
        let items = parse_rss(FEED).unwrap();
        let selected = select_by_keyword(&items, &["AI"]).unwrap();
        assert_eq!(selected.title, "AI新技術発表");
        assert_eq!(selected.link, "https://example.com/b");
    }

    #[test]
    fn test_select_by_keyword_preserves_feed_order() {
        let items = vec![
            FeedItem {
                title: "AI規制の動き".to_string(),
                link: "first".to_string(),
            },
            FeedItem {
                title: "生成AIの新モデル".to_string(),
                link: "second".to_string(),
            },
        ];
        let selected = select_by_keyword(&items, &["AI", "生成AI"]).unwrap();
        assert_eq!(selected.link, "first");
    }

    #[test]
    fn test_select_by_keyword_is_case_sensitive() {
        let items = vec![FeedItem {
            title: "ai lowercase only".to_string(),
            link: "x".to_string(),
        }];
        assert!(select_by_keyword(&items, &["AI"]).is_none());
    }

    #[test]
    fn test_select_by_keyword_empty_and_no_match() {
        assert!(select_by_keyword(&[], &["AI"]).is_none());
        let items = parse_rss(FEED).unwrap();
        assert!(select_by_keyword(&items, &["スポーツ"]).is_none());
    }
}
