//! Prompt construction. Pure functions of their inputs; the JSON contract
//! they request is enforced by `payload`.

/// Prompt for drafting a full article on a topic. Asks for a title plus a
/// Markdown body with background, latest-news and outlook sections, and for
/// paraphrasing of anything taken from the source link.
pub fn draft_prompt(topic: &str, source_link: Option<&str>) -> String {
    let mut prompt = format!("以下のトピックに関するブログ記事を生成してください。\n\nトピック: {}\n", topic);

    if let Some(link) = source_link {
        prompt.push_str(&format!("参考リンク: {}\n", link));
    }

    prompt.push_str(
        r#"
記事の構成は以下のようにしてください。
- 読者の興味を引くタイトル
- 記事の本文（Markdown形式、1500字程度）
  - 背景説明
  - 最新情報
  - 今後の見通し

参考リンク先の固有名詞や引用文は、そのまま転載せず必ず言い換えてください。

出力は以下のJSON形式でお願いします。
```json
{
  "title": "記事のタイトル",
  "content": "記事の本文（Markdown形式）"
}
```
"#,
    );

    prompt
}

/// Prompt for summarizing an existing article body and adding an opinion.
pub fn commentary_prompt(body_text: &str) -> String {
    format!(
        r#"以下の記事を要約し、その内容に基づいたあなたの「持論」を述べてください。

出力は以下のJSON形式でお願いします。
```json
{{
  "summary": "記事の要約（Markdown形式）",
  "opinion": "あなたの持論（Markdown形式）"
}}
```

記事内容:
{}
"#,
        body_text
    )
}
