//! Slug derivation for draft documents.

/// Reduces a title to its URL-safe base: characters outside
/// `[A-Za-z0-9\s-]` are stripped, whitespace runs collapse to single
/// hyphens, the result is lowercased. Applying it twice yields the same
/// result as once.
pub fn slug_base(title: &str) -> String {
    let filtered: String = title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();
    filtered
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// Appends the creation timestamp so repeated runs never collide. A title
/// with no representable characters degrades to the bare timestamp.
pub fn derive_slug(title: &str, unix_millis: i64) -> String {
    let base = slug_base(title);
    if base.is_empty() {
        unix_millis.to_string()
    } else {
        format!("{}-{}", base, unix_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_base_is_lowercase_alphanumerics_and_hyphens() {
        let base = slug_base("OpenAI が GPT-5 を発表！ (速報)");
        assert!(base
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        assert_eq!(base, "openai-gpt-5");
    }

    #[test]
    fn test_slug_base_is_idempotent() {
        for title in ["Hello World", "AI: the next wave?", "  spaced   out  ", "GPT-5"] {
            let once = slug_base(title);
            assert_eq!(slug_base(&once), once);
        }
    }

    #[test]
    fn test_slug_base_collapses_whitespace_runs() {
        assert_eq!(slug_base("a  b\t c"), "a-b-c");
    }

    #[test]
    fn test_derive_slug_appends_timestamp() {
        assert_eq!(derive_slug("AIの最新トレンド", 1754911826690), "ai-1754911826690");
        assert_eq!(derive_slug("T", 42), "t-42");
    }

    #[test]
    fn test_derive_slug_of_unrepresentable_title_is_the_timestamp() {
        assert_eq!(derive_slug("人工知能の未来", 1754911826690), "1754911826690");
    }
}
