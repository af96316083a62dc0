use crate::types::{Commentary, GeneratedArticle};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ArticleGenerator: Send + Sync {
    /// Returns the name of the generative model
    fn name(&self) -> &str;

    /// Generates a titled Markdown article for a topic, paraphrasing any
    /// linked source
    async fn generate(&self, topic: &str, source_link: Option<&str>)
        -> Result<GeneratedArticle>;

    /// Generates a summary and an opinion for an existing article body
    async fn commentary(&self, body_text: &str) -> Result<Commentary>;
}
