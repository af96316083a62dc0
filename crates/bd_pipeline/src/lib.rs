//! Draft pipeline orchestration.
//!
//! One branch per invocation: manual (caller supplies title and content)
//! goes straight to persistence; automated scans the feed, generates an
//! article for the first keyword match and persists it. No retries, no
//! fan-out; every stage awaits its predecessor.

use std::sync::Arc;

use bd_core::{
    plain_text, ArticleGenerator, DraftSection, DraftStore, FeedSource, Result, SavedDraft,
};
use bd_feed::select_by_keyword;
use tracing::info;

/// Titles matching any of these run the automated draft flow.
pub const AI_KEYWORDS: &[&str] = &["AI", "人工知能", "生成AI", "LLM", "機械学習"];

#[derive(Debug, Clone)]
pub enum DraftRequest {
    Manual { title: String, content: String },
    Automated,
}

impl DraftRequest {
    /// Selects the branch once per invocation: manual iff both arguments
    /// are present and non-empty.
    pub fn from_args(title: Option<String>, content: Option<String>) -> Self {
        match (title, content) {
            (Some(title), Some(content))
                if !title.trim().is_empty() && !content.trim().is_empty() =>
            {
                DraftRequest::Manual { title, content }
            }
            _ => DraftRequest::Automated,
        }
    }
}

#[derive(Debug)]
pub enum PipelineOutcome {
    Drafted(SavedDraft),
    NothingToDo,
}

pub struct DraftPipeline {
    feed: Arc<dyn FeedSource>,
    generator: Arc<dyn ArticleGenerator>,
    store: Arc<dyn DraftStore>,
    feed_url: String,
    keywords: Vec<String>,
}

impl DraftPipeline {
    pub fn new(
        feed: Arc<dyn FeedSource>,
        generator: Arc<dyn ArticleGenerator>,
        store: Arc<dyn DraftStore>,
        feed_url: impl Into<String>,
    ) -> Self {
        Self {
            feed,
            generator,
            store,
            feed_url: feed_url.into(),
            keywords: AI_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    pub async fn run(&self, request: DraftRequest) -> Result<PipelineOutcome> {
        match request {
            DraftRequest::Manual { title, content } => {
                info!("📝 Manual draft: {}", title);
                let saved = self.store.save(&title, &content).await?;
                Ok(PipelineOutcome::Drafted(saved))
            }
            DraftRequest::Automated => {
                info!("📡 Scanning feed: {}", self.feed_url);
                let items = self.feed.fetch_items(&self.feed_url).await;
                let keywords: Vec<&str> = self.keywords.iter().map(String::as_str).collect();

                let Some(item) = select_by_keyword(&items, &keywords) else {
                    info!("⏭️ No feed item matched, nothing to do");
                    return Ok(PipelineOutcome::NothingToDo);
                };

                info!("🗞️ Selected feed item: {}", item.title);
                let article = self
                    .generator
                    .generate(&item.title, Some(item.link.as_str()))
                    .await?;
                info!("🤖 Article generated: {}", article.title);

                let saved = self.store.save(&article.title, &article.content).await?;
                Ok(PipelineOutcome::Drafted(saved))
            }
        }
    }

    /// Fetches an existing post, generates a summary and an opinion for it
    /// and appends both as new sections.
    pub async fn enrich(&self, document_id: &str) -> Result<SavedDraft> {
        let post = self.store.get_draft(document_id).await?;
        info!("📰 Enriching post: {}", post.title);

        let commentary = self.generator.commentary(&plain_text(&post.body)).await?;
        let sections = vec![
            DraftSection {
                heading: "まとめ".to_string(),
                markdown: commentary.summary,
            },
            DraftSection {
                heading: "私の持論".to_string(),
                markdown: commentary.opinion,
            },
        ];
        self.store.append_sections(document_id, &sections).await
    }
}
