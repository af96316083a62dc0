use crate::types::{DraftSection, SavedDraft, StoredPost};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Converts Markdown to blocks and creates a new draft document. Every
    /// call creates a new id; nothing is ever overwritten.
    async fn save(&self, title: &str, markdown: &str) -> Result<SavedDraft>;

    /// Fetches an existing document by id
    async fn get_draft(&self, document_id: &str) -> Result<StoredPost>;

    /// Appends Markdown sections to an existing document body, keeping all
    /// prior content
    async fn append_sections(
        &self,
        document_id: &str,
        sections: &[DraftSection],
    ) -> Result<SavedDraft>;
}
