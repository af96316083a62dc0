use crate::types::FeedItem;
use async_trait::async_trait;

#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the current items of a feed. Fetch and parse failures are
    /// absorbed: the result is an empty list, never an error.
    async fn fetch_items(&self, feed_url: &str) -> Vec<FeedItem>;
}
