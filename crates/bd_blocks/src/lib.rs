//! Markdown to Portable Text conversion.
//!
//! Markdown is rendered to HTML with pulldown-cmark (CommonMark options
//! only), the HTML fragment is parsed with scraper, and the element tree is
//! mapped to Sanity block objects. Block and span keys come from a sequence
//! counter, so identical input always yields identical output.
//!
//! Content-bearing nodes the mapper cannot represent (tables, embeds,
//! unknown elements with text) fail with `Error::Conversion`. Decoration
//! nodes without text (`hr`, `img`) are omitted.

use bd_core::{Block, Error, MarkDef, Result, Span};
use pulldown_cmark::{Options, Parser};
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

pub use bd_core::plain_text;

/// Converts Markdown into a sequence of Portable Text blocks. Empty or
/// whitespace-only input yields an empty sequence.
pub fn convert(markdown: &str) -> Result<Vec<Block>> {
    if markdown.trim().is_empty() {
        return Ok(Vec::new());
    }
    let html = render_html(markdown);
    map_fragment(&html)
}

fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::empty());
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    html
}

#[derive(Default)]
struct KeySeq {
    counter: usize,
}

impl KeySeq {
    fn next_key(&mut self, prefix: &str) -> String {
        let key = format!("{}{}", prefix, self.counter);
        self.counter += 1;
        key
    }
}

fn map_fragment(html: &str) -> Result<Vec<Block>> {
    let fragment = Html::parse_fragment(html);
    let mut keys = KeySeq::default();
    let mut blocks = Vec::new();

    for node in fragment.root_element().children() {
        match node.value() {
            Node::Text(text) => {
                // bare text outside any element, keep it as a paragraph
                if !text.trim().is_empty() {
                    let span = make_span(&mut keys, text.to_string(), &[]);
                    blocks.push(make_block(&mut keys, "normal", vec![], vec![span], None, None));
                }
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(node) {
                    map_block_element(el, &mut keys, &mut blocks)?;
                }
            }
            _ => {}
        }
    }

    Ok(blocks)
}

fn map_block_element(el: ElementRef, keys: &mut KeySeq, out: &mut Vec<Block>) -> Result<()> {
    match el.value().name() {
        style @ ("h1" | "h2" | "h3" | "h4" | "h5" | "h6") => {
            push_text_block(el, style, None, None, keys, out)
        }
        "p" => push_text_block(el, "normal", None, None, keys, out),
        "blockquote" => map_blockquote(el, keys, out),
        "ul" => map_list(el, "bullet", 1, keys, out),
        "ol" => map_list(el, "number", 1, keys, out),
        "pre" => map_code_block(el, keys, out),
        "hr" => Ok(()),
        name => reject_or_skip(el, name),
    }
}

/// Unknown elements without text carry nothing representable and are
/// dropped; anything with text is a hard conversion failure.
fn reject_or_skip(el: ElementRef, name: &str) -> Result<()> {
    if el.text().any(|t| !t.trim().is_empty()) {
        return Err(Error::Conversion(format!(
            "cannot represent <{}> content as blocks",
            name
        )));
    }
    Ok(())
}

fn push_text_block(
    el: ElementRef,
    style: &str,
    list_item: Option<&str>,
    level: Option<u8>,
    keys: &mut KeySeq,
    out: &mut Vec<Block>,
) -> Result<()> {
    let mut spans = Vec::new();
    let mut mark_defs = Vec::new();
    collect_children(el, &[], &mut spans, &mut mark_defs, keys)?;

    if spans.iter().all(|s| s.text.trim().is_empty()) {
        return Ok(());
    }
    out.push(make_block(
        keys,
        style,
        mark_defs,
        spans,
        list_item.map(str::to_string),
        level,
    ));
    Ok(())
}

fn map_blockquote(el: ElementRef, keys: &mut KeySeq, out: &mut Vec<Block>) -> Result<()> {
    for node in el.children() {
        match node.value() {
            Node::Text(text) => {
                if !text.trim().is_empty() {
                    let span = make_span(keys, text.to_string(), &[]);
                    out.push(make_block(keys, "blockquote", vec![], vec![span], None, None));
                }
            }
            Node::Element(element) => {
                if let Some(child) = ElementRef::wrap(node) {
                    if element.name() == "p" {
                        push_text_block(child, "blockquote", None, None, keys, out)?;
                    } else {
                        map_block_element(child, keys, out)?;
                    }
                }
            }
            _ => {}
        }
    }
    Ok(())
}

fn map_list(el: ElementRef, kind: &str, level: u8, keys: &mut KeySeq, out: &mut Vec<Block>) -> Result<()> {
    for node in el.children() {
        if let Node::Element(element) = node.value() {
            if let Some(child) = ElementRef::wrap(node) {
                match element.name() {
                    "li" => map_list_item(child, kind, level, keys, out)?,
                    name => reject_or_skip(child, name)?,
                }
            }
        }
    }
    Ok(())
}

fn map_list_item(
    li: ElementRef,
    kind: &str,
    level: u8,
    keys: &mut KeySeq,
    out: &mut Vec<Block>,
) -> Result<()> {
    let mut spans = Vec::new();
    let mut mark_defs = Vec::new();
    let mut nested = Vec::new();

    for node in li.children() {
        match node.value() {
            Node::Element(element) => match element.name() {
                "ul" | "ol" => {
                    if let Some(child) = ElementRef::wrap(node) {
                        nested.push((child, element.name().to_string()));
                    }
                }
                // loose list items wrap their text in paragraphs
                "p" => {
                    if let Some(child) = ElementRef::wrap(node) {
                        if !spans.is_empty() {
                            spans.push(make_span(keys, "\n".to_string(), &[]));
                        }
                        collect_children(child, &[], &mut spans, &mut mark_defs, keys)?;
                    }
                }
                _ => collect_inline(node, &[], &mut spans, &mut mark_defs, keys)?,
            },
            _ => collect_inline(node, &[], &mut spans, &mut mark_defs, keys)?,
        }
    }

    trim_edges(&mut spans);
    if !spans.is_empty() {
        out.push(make_block(
            keys,
            "normal",
            mark_defs,
            spans,
            Some(kind.to_string()),
            Some(level),
        ));
    }

    for (list, name) in nested {
        let nested_kind = if name == "ol" { "number" } else { "bullet" };
        map_list(list, nested_kind, level + 1, keys, out)?;
    }
    Ok(())
}

fn map_code_block(el: ElementRef, keys: &mut KeySeq, out: &mut Vec<Block>) -> Result<()> {
    let text: String = el.text().collect();
    let text = text.strip_suffix('\n').unwrap_or(&text).to_string();
    if text.is_empty() {
        return Ok(());
    }
    let span = make_span(keys, text, &["code".to_string()]);
    out.push(make_block(keys, "normal", vec![], vec![span], None, None));
    Ok(())
}

fn collect_children(
    el: ElementRef,
    marks: &[String],
    spans: &mut Vec<Span>,
    mark_defs: &mut Vec<MarkDef>,
    keys: &mut KeySeq,
) -> Result<()> {
    for node in el.children() {
        collect_inline(node, marks, spans, mark_defs, keys)?;
    }
    Ok(())
}

fn collect_inline(
    node: NodeRef<'_, Node>,
    marks: &[String],
    spans: &mut Vec<Span>,
    mark_defs: &mut Vec<MarkDef>,
    keys: &mut KeySeq,
) -> Result<()> {
    match node.value() {
        Node::Text(text) => {
            if !text.is_empty() {
                spans.push(make_span(keys, text.to_string(), marks));
            }
        }
        Node::Element(element) => {
            let Some(el) = ElementRef::wrap(node) else {
                return Ok(());
            };
            match element.name() {
                "strong" | "b" => collect_marked(el, marks, "strong", spans, mark_defs, keys)?,
                "em" | "i" => collect_marked(el, marks, "em", spans, mark_defs, keys)?,
                "code" => collect_marked(el, marks, "code", spans, mark_defs, keys)?,
                "a" => {
                    let key = keys.next_key("l");
                    mark_defs.push(MarkDef {
                        kind: "link".to_string(),
                        key: key.clone(),
                        href: element.attr("href").map(str::to_string),
                    });
                    let mut inner = marks.to_vec();
                    inner.push(key);
                    collect_children(el, &inner, spans, mark_defs, keys)?;
                }
                "br" => spans.push(make_span(keys, "\n".to_string(), marks)),
                "img" => {}
                name => reject_or_skip(el, name)?,
            }
        }
        _ => {}
    }
    Ok(())
}

fn collect_marked(
    el: ElementRef,
    marks: &[String],
    mark: &str,
    spans: &mut Vec<Span>,
    mark_defs: &mut Vec<MarkDef>,
    keys: &mut KeySeq,
) -> Result<()> {
    let mut inner = marks.to_vec();
    if !inner.iter().any(|m| m == mark) {
        inner.push(mark.to_string());
    }
    collect_children(el, &inner, spans, mark_defs, keys)
}

/// List items keep the raw text nodes around nested lists; strip the
/// whitespace they contribute at either edge.
fn trim_edges(spans: &mut Vec<Span>) {
    while spans
        .first()
        .map(|s| s.text.trim().is_empty())
        .unwrap_or(false)
    {
        spans.remove(0);
    }
    while spans
        .last()
        .map(|s| s.text.trim().is_empty())
        .unwrap_or(false)
    {
        spans.pop();
    }
    if let Some(first) = spans.first_mut() {
        first.text = first.text.trim_start().to_string();
    }
    if let Some(last) = spans.last_mut() {
        last.text = last.text.trim_end().to_string();
    }
}

fn make_span(keys: &mut KeySeq, text: String, marks: &[String]) -> Span {
    Span {
        kind: "span".to_string(),
        key: keys.next_key("s"),
        text,
        marks: marks.to_vec(),
    }
}

fn make_block(
    keys: &mut KeySeq,
    style: &str,
    mark_defs: Vec<MarkDef>,
    children: Vec<Span>,
    list_item: Option<String>,
    level: Option<u8>,
) -> Block {
    Block {
        kind: "block".to_string(),
        key: keys.next_key("b"),
        style: style.to_string(),
        mark_defs,
        children,
        list_item,
        level,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(block: &Block) -> String {
        block.children.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_empty_markdown_yields_no_blocks() {
        assert!(convert("").unwrap().is_empty());
        assert!(convert("   \n\n  ").unwrap().is_empty());
    }

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = convert("# H\n\nBody").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].style, "h1");
        assert_eq!(text_of(&blocks[0]), "H");
        assert_eq!(blocks[1].style, "normal");
        assert_eq!(text_of(&blocks[1]), "Body");
    }

    #[test]
    fn test_heading_levels() {
        let blocks = convert("## 背景説明\n\n### 詳細").unwrap();
        assert_eq!(blocks[0].style, "h2");
        assert_eq!(blocks[1].style, "h3");
    }

    #[test]
    fn test_decorator_marks() {
        let blocks = convert("a **b** *c* `d`").unwrap();
        assert_eq!(blocks.len(), 1);
        let marks: Vec<Vec<String>> = blocks[0].children.iter().map(|s| s.marks.clone()).collect();
        assert!(blocks[0].children.iter().any(|s| s.text == "b" && s.marks == ["strong"]));
        assert!(blocks[0].children.iter().any(|s| s.text == "c" && s.marks == ["em"]));
        assert!(blocks[0].children.iter().any(|s| s.text == "d" && s.marks == ["code"]));
        // the unmarked text keeps empty marks
        assert!(marks.iter().any(|m| m.is_empty()));
    }

    #[test]
    fn test_link_becomes_mark_def() {
        let blocks = convert("see [the docs](https://example.com/docs)").unwrap();
        let block = &blocks[0];
        assert_eq!(block.mark_defs.len(), 1);
        let def = &block.mark_defs[0];
        assert_eq!(def.kind, "link");
        assert_eq!(def.href.as_deref(), Some("https://example.com/docs"));
        let linked = block
            .children
            .iter()
            .find(|s| s.text == "the docs")
            .unwrap();
        assert_eq!(linked.marks, vec![def.key.clone()]);
    }

    #[test]
    fn test_bullet_list() {
        let blocks = convert("- one\n- two").unwrap();
        assert_eq!(blocks.len(), 2);
        for (block, text) in blocks.iter().zip(["one", "two"]) {
            assert_eq!(block.list_item.as_deref(), Some("bullet"));
            assert_eq!(block.level, Some(1));
            assert_eq!(text_of(block), text);
        }
    }

    #[test]
    fn test_ordered_list() {
        let blocks = convert("1. first\n2. second").unwrap();
        assert_eq!(blocks[0].list_item.as_deref(), Some("number"));
        assert_eq!(text_of(&blocks[1]), "second");
    }

    #[test]
    fn test_nested_list_levels() {
        let blocks = convert("- outer\n  - inner").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].level, Some(1));
        assert_eq!(text_of(&blocks[0]), "outer");
        assert_eq!(blocks[1].level, Some(2));
        assert_eq!(text_of(&blocks[1]), "inner");
    }

    #[test]
    fn test_blockquote_style() {
        let blocks = convert("> quoted text").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].style, "blockquote");
        assert_eq!(text_of(&blocks[0]), "quoted text");
    }

    #[test]
    fn test_code_fence() {
        let blocks = convert("```\nlet x = 1;\n```").unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].children.len(), 1);
        assert_eq!(blocks[0].children[0].text, "let x = 1;");
        assert_eq!(blocks[0].children[0].marks, vec!["code".to_string()]);
    }

    #[test]
    fn test_horizontal_rule_is_omitted() {
        let blocks = convert("above\n\n---\n\nbelow").unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(text_of(&blocks[0]), "above");
        assert_eq!(text_of(&blocks[1]), "below");
    }

    #[test]
    fn test_image_only_paragraph_is_omitted() {
        let blocks = convert("![alt](https://example.com/pic.png)").unwrap();
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_table_content_is_a_conversion_error() {
        let markdown = "<table><tr><td>cell</td></tr></table>";
        let err = convert(markdown).unwrap_err();
        assert!(matches!(err, Error::Conversion(_)));
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let markdown = "# 見出し\n\n本文に[リンク](https://example.com)と**強調**があります。";
        let first = serde_json::to_string(&convert(markdown).unwrap()).unwrap();
        let second = serde_json::to_string(&convert(markdown).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_plain_text_projection() {
        let blocks = convert("# H\n\nBody").unwrap();
        assert_eq!(plain_text(&blocks), "H\n\nBody");
    }
}
