//! Table of contents for the reader sidebar.

use serde::Serialize;

use crate::dom::{PageElement, PageNode};

/// Heading levels that appear in the table of contents.
const TOC_LEVELS: &[&str] = &["h1", "h2", "h3", "h4"];

/// Placeholder shown when the content has no headings.
pub const NO_HEADINGS: &str = "No headings found";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    pub level: usize,
    pub text: String,
    pub anchor: String,
}

fn heading_level(el: &PageElement) -> Option<usize> {
    TOC_LEVELS.iter().position(|t| *t == el.tag).map(|i| i + 1)
}

/// Collects `h1`-`h4` in document order and gives each an `id` of
/// `heading-<n>`, numbering all levels with one counter.
pub fn build_toc(container: &mut PageElement) -> Vec<TocEntry> {
    let mut entries = Vec::new();
    container.for_each_mut(&mut |el| {
        if let Some(level) = heading_level(el) {
            let anchor = format!("heading-{}", entries.len());
            el.set_attr("id", &anchor);
            entries.push(TocEntry { level, text: el.text_content(), anchor });
        }
    });
    entries
}

/// Renders the sidebar list (`ul.toc-list`).
pub fn render_toc(entries: &[TocEntry]) -> PageElement {
    let mut list = PageElement::new("ul").with_attr("class", "toc-list");

    if entries.is_empty() {
        list.children.push(PageNode::Element(
            PageElement::new("li").with_attr("class", "no-headings").with_text(NO_HEADINGS),
        ));
        return list;
    }

    for entry in entries {
        let link = PageElement::new("a")
            .with_attr("href", &format!("#{}", entry.anchor))
            .with_text(&entry.text);
        let item = PageElement::new("li")
            .with_attr("class", &format!("toc-item level-{}", entry.level))
            .with_child(link);
        list.children.push(PageNode::Element(item));
    }

    list
}
