use serde::{Deserialize, Serialize};

/// A single Portable Text block as Sanity stores it in a `body` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(default = "default_style")]
    pub style: String,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<MarkDef>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(rename = "listItem", default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
}

fn default_style() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Span {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key")]
    pub key: String,
    pub text: String,
    #[serde(default)]
    pub marks: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

/// One entry from an external syndication feed. Fetched fresh on each
/// automated run, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
}

/// Title and Markdown body produced by the generative model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArticle {
    pub title: String,
    pub content: String,
}

/// Summary and opinion produced for an existing post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commentary {
    pub summary: String,
    pub opinion: String,
}

/// Result of a successful draft write: the document id and a studio link.
#[derive(Debug, Clone)]
pub struct SavedDraft {
    pub id: String,
    pub url: String,
}

/// Read-back projection of an existing post document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPost {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub body: Vec<Block>,
}

/// A Markdown section to append to an existing document body.
#[derive(Debug, Clone)]
pub struct DraftSection {
    pub heading: String,
    pub markdown: String,
}

/// Flattens Portable Text blocks into plain text: span text joined per
/// block, blocks separated by blank lines. Non-block entries are skipped.
pub fn plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .filter(|block| block.kind == "block")
        .map(|block| {
            block
                .children
                .iter()
                .map(|span| span.text.as_str())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str) -> Span {
        Span {
            kind: "span".to_string(),
            key: "s0".to_string(),
            text: text.to_string(),
            marks: vec![],
        }
    }

    fn block(texts: &[&str]) -> Block {
        Block {
            kind: "block".to_string(),
            key: "b0".to_string(),
            style: "normal".to_string(),
            mark_defs: vec![],
            children: texts.iter().map(|t| span(t)).collect(),
            list_item: None,
            level: None,
        }
    }

    #[test]
    fn test_plain_text_joins_spans_and_blocks() {
        let blocks = vec![block(&["Hello, ", "world"]), block(&["Second paragraph"])];
        assert_eq!(plain_text(&blocks), "Hello, world\n\nSecond paragraph");
    }

    #[test]
    fn test_plain_text_skips_non_block_entries() {
        let mut image = block(&["ignored"]);
        image.kind = "image".to_string();
        let blocks = vec![block(&["kept"]), image];
        assert_eq!(plain_text(&blocks), "kept");
    }

    #[test]
    fn test_block_serializes_with_sanity_field_names() {
        let b = block(&["text"]);
        let json = serde_json::to_value(&b).unwrap();
        assert_eq!(json["_type"], "block");
        assert_eq!(json["_key"], "b0");
        assert_eq!(json["markDefs"], serde_json::json!([]));
        assert_eq!(json["children"][0]["_type"], "span");
        assert!(json.get("listItem").is_none());
    }

    #[test]
    fn test_block_deserializes_from_stored_document() {
        let json = serde_json::json!({
            "_type": "block",
            "_key": "abc",
            "style": "h2",
            "markDefs": [],
            "children": [{"_type": "span", "_key": "def", "text": "Heading", "marks": []}]
        });
        let b: Block = serde_json::from_value(json).unwrap();
        assert_eq!(b.style, "h2");
        assert_eq!(b.children[0].text, "Heading");
    }
}
