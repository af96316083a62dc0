//! `DraftStore` implementation on top of the Sanity client.

use async_trait::async_trait;
use bd_core::{Block, DraftSection, DraftStore, Error, Result, SavedDraft, StoredPost};
use chrono::{SecondsFormat, Utc};
use serde_json::json;
use tracing::info;

use crate::client::SanityClient;
use crate::slug;

pub struct SanityStore {
    client: SanityClient,
}

impl SanityStore {
    pub fn new(client: SanityClient) -> Self {
        Self { client }
    }
}

/// Builds the draft document for a create mutation. Conversion happens here,
/// before any network call, so a conversion failure never leaves a partial
/// document behind. Returns the draft id together with the document.
pub fn build_draft_document(
    title: &str,
    markdown: &str,
    unix_millis: i64,
    published_at: &str,
) -> Result<(String, serde_json::Value)> {
    let blocks = bd_blocks::convert(markdown)?;
    let slug = slug::derive_slug(title, unix_millis);
    let id = format!("drafts.{}", slug);
    let document = json!({
        "_type": "post",
        "_id": id,
        "title": title,
        "slug": { "_type": "slug", "current": slug },
        "body": blocks,
        "publishedAt": published_at,
    });
    Ok((id, document))
}

/// Renders appended sections as an h2 heading per section followed by the
/// section body, matching the shape of the drafts this pipeline creates.
pub fn sections_to_blocks(sections: &[DraftSection]) -> Result<Vec<Block>> {
    let markdown = sections
        .iter()
        .map(|section| format!("## {}\n\n{}", section.heading, section.markdown))
        .collect::<Vec<_>>()
        .join("\n\n");
    bd_blocks::convert(&markdown)
}

/// Appended blocks get a fresh key namespace so they cannot collide with
/// the keys already present in the stored body.
fn rekey(blocks: &mut [Block], prefix: &str) {
    for block in blocks {
        block.key = format!("{}{}", prefix, block.key);
        let def_keys: Vec<String> = block.mark_defs.iter().map(|def| def.key.clone()).collect();
        for def in &mut block.mark_defs {
            def.key = format!("{}{}", prefix, def.key);
        }
        for span in &mut block.children {
            span.key = format!("{}{}", prefix, span.key);
            for mark in &mut span.marks {
                if def_keys.iter().any(|key| key == mark) {
                    *mark = format!("{}{}", prefix, mark);
                }
            }
        }
    }
}

#[async_trait]
impl DraftStore for SanityStore {
    async fn save(&self, title: &str, markdown: &str) -> Result<SavedDraft> {
        self.client.require_token()?;

        let now = Utc::now();
        let published_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
        let (_, document) =
            build_draft_document(title, markdown, now.timestamp_millis(), &published_at)?;

        info!("💾 Saving draft to Sanity...");
        let id = self.client.create(&document).await?;
        info!("✨ Draft created with id: {}", id);

        Ok(SavedDraft {
            url: self.client.studio_url(&id),
            id,
        })
    }

    async fn get_draft(&self, document_id: &str) -> Result<StoredPost> {
        let result = self
            .client
            .fetch(
                "*[_id == $id][0]{_id, title, body}",
                &[("id", json!(document_id))],
            )
            .await?;

        if result.is_null() {
            return Err(Error::NotFound(format!(
                "document {} does not exist",
                document_id
            )));
        }
        Ok(serde_json::from_value(result)?)
    }

    async fn append_sections(
        &self,
        document_id: &str,
        sections: &[DraftSection],
    ) -> Result<SavedDraft> {
        self.client.require_token()?;

        let post = self.get_draft(document_id).await?;
        let mut appended = sections_to_blocks(sections)?;
        rekey(&mut appended, &format!("a{}-", post.body.len()));

        let mut body = post.body;
        body.extend(appended);

        info!("💾 Appending {} sections to {}", sections.len(), document_id);
        let id = self.client.patch_set(document_id, json!({ "body": body })).await?;
        info!("✨ Post updated: {}", id);

        Ok(SavedDraft {
            url: self.client.studio_url(&id),
            id,
        })
    }
}
