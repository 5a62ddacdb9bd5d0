//! DOM-to-Markdown serialization.
//!
//! The serializer is a single pass over the page tree that appends to one
//! output string. Elements are dispatched on [`Tag`]. Every handled tag
//! renders the *flattened* text content of its element; only unhandled tags
//! recurse into their children. Consequently inline formatting nested inside
//! a heading, paragraph, list item, blockquote or emphasis is emitted as
//! plain text, and Markdown metacharacters in source text are not escaped.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{Document, serialize};
//!
//! let doc = Document::parse_fragment("<h2>Intro</h2><p>Hello <b>there</b></p><hr>");
//! let markdown = serialize(&doc.root().into());
//! assert_eq!(markdown, "## Intro\n\nHello there\n\n---\n\n");
//! ```

use url::Url;

use crate::dom::{PageElement, PageNode};

/// Tag identities the serializer knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Heading(usize),
    Paragraph,
    Strong,
    Emphasis,
    Link,
    Image,
    UnorderedList,
    OrderedList,
    Blockquote,
    Code,
    Rule,
    Other,
}

impl Tag {
    /// Classifies a lowercase tag name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "a" => Tag::Link,
            "img" => Tag::Image,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "blockquote" => Tag::Blockquote,
            "pre" | "code" => Tag::Code,
            "hr" => Tag::Rule,
            _ => Tag::Other,
        }
    }
}

/// Serializer with optional URL resolution for link and image targets.
#[derive(Debug, Clone, Default)]
pub struct MarkdownSerializer {
    base_url: Option<Url>,
}

impl MarkdownSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves relative `href`/`src` values against `base_url`, the way a
    /// browser reports `a.href` and `img.src`.
    pub fn with_base_url(base_url: Url) -> Self {
        Self { base_url: Some(base_url) }
    }

    /// Serializes `node` and its subtree into Markdown.
    pub fn serialize(&self, node: &PageNode) -> String {
        let mut out = String::new();
        self.write_nodes(vec![node], &mut out);
        out
    }

    /// Serializes an element and its subtree into Markdown.
    pub fn serialize_element(&self, el: &PageElement) -> String {
        let mut out = String::new();
        self.write_element(el, Tag::from_name(&el.tag), &mut out);
        out
    }

    /// Walks `pending` (top of the stack last), descending only into
    /// unhandled tags.
    fn write_nodes(&self, mut pending: Vec<&PageNode>, out: &mut String) {
        while let Some(node) = pending.pop() {
            match node {
                PageNode::Text(text) => out.push_str(text),
                PageNode::Element(el) => match Tag::from_name(&el.tag) {
                    Tag::Other => pending.extend(el.children.iter().rev()),
                    tag => self.write_element(el, tag, out),
                },
            }
        }
    }

    fn write_element(&self, el: &PageElement, tag: Tag, out: &mut String) {
        match tag {
            Tag::Heading(level) => write_heading(el, level, out),
            Tag::Paragraph => write_paragraph(el, out),
            Tag::Strong => write_wrapped(el, "**", out),
            Tag::Emphasis => write_wrapped(el, "*", out),
            Tag::Link => self.write_link(el, out),
            Tag::Image => self.write_image(el, out),
            Tag::UnorderedList => write_list(el, |_| "-".to_string(), out),
            Tag::OrderedList => write_list(el, |i| format!("{}.", i + 1), out),
            Tag::Blockquote => write_blockquote(el, out),
            Tag::Code => write_code(el, out),
            Tag::Rule => out.push_str("---\n\n"),
            Tag::Other => self.write_nodes(el.children.iter().rev().collect(), out),
        }
    }

    fn write_link(&self, el: &PageElement, out: &mut String) {
        out.push('[');
        out.push_str(&el.text_content());
        out.push_str("](");
        out.push_str(&self.resolve(el.attr("href")));
        out.push(')');
    }

    fn write_image(&self, el: &PageElement, out: &mut String) {
        out.push_str("![");
        out.push_str(el.attr("alt").unwrap_or_default());
        out.push_str("](");
        out.push_str(&self.resolve(el.attr("src")));
        out.push_str(")\n\n");
    }

    /// Missing attributes resolve to an empty target.
    fn resolve(&self, target: Option<&str>) -> String {
        let Some(target) = target else {
            return String::new();
        };

        match &self.base_url {
            Some(base) => base.join(target.trim()).map(String::from).unwrap_or_else(|_| target.to_string()),
            None => target.to_string(),
        }
    }
}

fn write_heading(el: &PageElement, level: usize, out: &mut String) {
    out.push_str(&"#".repeat(level));
    out.push(' ');
    out.push_str(&el.text_content());
    out.push_str("\n\n");
}

fn write_paragraph(el: &PageElement, out: &mut String) {
    out.push_str(&el.text_content());
    out.push_str("\n\n");
}

fn write_wrapped(el: &PageElement, marker: &str, out: &mut String) {
    out.push_str(marker);
    out.push_str(&el.text_content());
    out.push_str(marker);
}

fn write_list(el: &PageElement, marker: impl Fn(usize) -> String, out: &mut String) {
    for (i, item) in el.element_children().enumerate() {
        out.push_str(&marker(i));
        out.push(' ');
        out.push_str(&item.text_content());
        out.push('\n');
    }
    out.push('\n');
}

fn write_blockquote(el: &PageElement, out: &mut String) {
    out.push_str("> ");
    out.push_str(&el.text_content());
    out.push_str("\n\n");
}

fn write_code(el: &PageElement, out: &mut String) {
    out.push_str("```\n");
    out.push_str(&el.text_content());
    out.push_str("\n```\n\n");
}

/// Serializes `node` without URL resolution.
pub fn serialize(node: &PageNode) -> String {
    MarkdownSerializer::new().serialize(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use rstest::rstest;

    fn fragment(html: &str) -> PageNode {
        Document::parse_fragment(html).root().into()
    }

    #[test]
    fn test_sample_document() {
        let md = serialize(&fragment("<h1>Title</h1><p>Hello <b>world</b></p><ul><li>a</li><li>b</li></ul>"));
        assert_eq!(md, "# Title\n\nHello world\n\n- a\n- b\n\n");
    }

    #[test]
    fn test_image() {
        let md = serialize(&fragment(r#"<img alt="x" src="http://e/y.png">"#));
        assert_eq!(md, "![x](http://e/y.png)\n\n");
    }

    #[test]
    fn test_image_without_alt_or_src() {
        let md = serialize(&PageElement::new("img").into());
        assert_eq!(md, "![]()\n\n");
    }

    #[test]
    fn test_default_case_concatenates_children() {
        let md = serialize(&fragment("<section><p>one</p><p>two</p></section>"));
        assert_eq!(md, "one\n\ntwo\n\n");
    }

    #[rstest]
    #[case("<h1>A</h1>", "# A\n\n")]
    #[case("<h2>A</h2>", "## A\n\n")]
    #[case("<h3>A</h3>", "### A\n\n")]
    #[case("<h4>A</h4>", "#### A\n\n")]
    #[case("<h5>A</h5>", "##### A\n\n")]
    #[case("<h6>A</h6>", "###### A\n\n")]
    #[case("<strong>A</strong>", "**A**")]
    #[case("<b>A</b>", "**A**")]
    #[case("<em>A</em>", "*A*")]
    #[case("<i>A</i>", "*A*")]
    #[case("<blockquote>A</blockquote>", "> A\n\n")]
    #[case("<pre>let x = 1;</pre>", "```\nlet x = 1;\n```\n\n")]
    #[case("<code>x</code>", "```\nx\n```\n\n")]
    #[case("<hr>", "---\n\n")]
    #[case("<ol><li>a</li><li>b</li><li>c</li></ol>", "1. a\n2. b\n3. c\n\n")]
    fn test_tag_dispatch(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(serialize(&fragment(html)), expected);
    }

    #[test]
    fn test_heading_flattens_inline_markup() {
        let md = serialize(&fragment("<h2>Big <em>news</em></h2>"));
        assert_eq!(md, "## Big news\n\n");
    }

    #[test]
    fn test_list_item_flattens_nested_list() {
        let md = serialize(&fragment("<ul><li>outer<ul><li>inner</li></ul></li></ul>"));
        assert_eq!(md, "- outerinner\n\n");
    }

    #[test]
    fn test_inline_tags_recurse_at_top_level() {
        let md = serialize(&fragment("<div>see <a href=\"/x\">this</a> and <em>that</em></div>"));
        assert_eq!(md, "see [this](/x) and *that*");
    }

    #[test]
    fn test_no_escaping_of_metacharacters() {
        let md = serialize(&fragment("<p>*not* emphasis # and [brackets]</p>"));
        assert_eq!(md, "*not* emphasis # and [brackets]\n\n");
    }

    #[test]
    fn test_link_resolution_against_base() {
        let base = Url::parse("https://example.com/blog/post.html").unwrap();
        let serializer = MarkdownSerializer::with_base_url(base);
        let md = serializer.serialize(&fragment(r#"<a href="../about">About</a><img src="img/a.png" alt="A">"#));
        assert_eq!(md, "[About](https://example.com/about)![A](https://example.com/blog/img/a.png)\n\n");
    }

    #[test]
    fn test_link_without_href() {
        let md = serialize(&fragment("<a name=\"top\">Top</a>"));
        assert_eq!(md, "[Top]()");
    }

    #[test]
    fn test_text_leaf_is_literal() {
        assert_eq!(serialize(&PageNode::Text("a_b*c".to_string())), "a_b*c");
    }

    #[test]
    fn test_empty_tree_serializes_to_empty_string() {
        assert_eq!(serialize(&PageElement::new("div").into()), "");
    }

    #[test]
    fn test_deeply_nested_terminates() {
        let mut el = PageElement::new("span").with_text("leaf");
        for _ in 0..20_000 {
            el = PageElement::new("div").with_child(el);
        }
        assert_eq!(MarkdownSerializer::new().serialize_element(&el), "leaf");
        assert_eq!(serialize(&el.into()), "leaf");
    }

    #[test]
    fn test_deeply_nested_page_serializes() {
        let depth = 10_000;
        let html = format!("<body>{}<p>Deep <b>text</b></p>{}</body>", "<div>".repeat(depth), "</div>".repeat(depth));
        let body = Document::parse(&html).body();
        assert_eq!(serialize(&body.into()), "Deep text\n\n");
    }
}
