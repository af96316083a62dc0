//! Strict parsing of the model's free-text response.
//!
//! The response is untrusted: the payload must sit inside a ```json fenced
//! block and deserialize into the expected shape. Anything else is a
//! `Generation` error, never a fallback value.

use bd_core::{Commentary, Error, GeneratedArticle, Result};
use serde::de::DeserializeOwned;

const FENCE_OPEN: &str = "```json";
const FENCE_CLOSE: &str = "```";

/// Locates the first ```json fenced block and returns its content.
pub fn extract_fenced_json(text: &str) -> Result<&str> {
    let start = text.find(FENCE_OPEN).ok_or_else(|| {
        Error::Generation(format!(
            "response contains no fenced JSON block: {}",
            summarize(text)
        ))
    })?;
    let rest = &text[start + FENCE_OPEN.len()..];
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let end = rest.find(FENCE_CLOSE).ok_or_else(|| {
        Error::Generation("fenced JSON block is not terminated".to_string())
    })?;
    Ok(&rest[..end])
}

fn parse_payload<T: DeserializeOwned>(text: &str, expected: &str) -> Result<T> {
    let json = extract_fenced_json(text)?;
    serde_json::from_str(json).map_err(|e| {
        Error::Generation(format!(
            "fenced block is not a valid {} payload: {}",
            expected, e
        ))
    })
}

/// Parses a `{title, content}` article payload out of a model response.
pub fn parse_article(text: &str) -> Result<GeneratedArticle> {
    parse_payload(text, "article")
}

/// Parses a `{summary, opinion}` commentary payload out of a model response.
pub fn parse_commentary(text: &str) -> Result<Commentary> {
    parse_payload(text, "commentary")
}

fn summarize(text: &str) -> String {
    const MAX: usize = 120;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX).collect();
        format!("{}...", head)
    }
}
