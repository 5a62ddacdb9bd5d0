//! HTML parsing.
//!
//! This module provides the [`Document`] type, a thin wrapper over
//! `scraper::Html` that hands out [`PageElement`] snapshots for the locator
//! and serializer to work on.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Test</title></head>
//!         <body><article><p>Paragraph</p></article></body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html);
//! assert_eq!(doc.title(), Some("Test".to_string()));
//! assert_eq!(doc.body().tag, "body");
//! ```

use scraper::{Html, Selector};

use crate::dom::PageElement;
use crate::{ReaderError, Result};

/// Represents a parsed HTML document or fragment.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a complete HTML page.
    ///
    /// The HTML5 parser never fails; missing `<html>`, `<head>` and `<body>`
    /// elements are synthesised.
    pub fn parse(html: &str) -> Self {
        Self { html: Html::parse_document(html) }
    }

    /// Parses an HTML fragment. The fragment's nodes hang off a synthetic
    /// `<html>` root element.
    pub fn parse_fragment(html: &str) -> Self {
        Self { html: Html::parse_fragment(html) }
    }

    /// Gets the raw HTML representation.
    pub fn html(&self) -> &Html {
        &self.html
    }

    /// Gets the title of the document.
    ///
    /// Returns the trimmed content of the first `<title>` element, or `None`
    /// if it is missing or blank.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        let title = self.html.select(&selector).next()?.text().collect::<String>();
        let title = title.trim();
        if title.is_empty() { None } else { Some(title.to_string()) }
    }

    /// Snapshot of the whole tree, starting at the root element.
    pub fn root(&self) -> PageElement {
        PageElement::from_element_ref(self.html.root_element())
    }

    /// Snapshot of `<body>`, or of the root element when there is none.
    pub fn body(&self) -> PageElement {
        Selector::parse("body")
            .ok()
            .and_then(|sel| self.html.select(&sel).next())
            .map(PageElement::from_element_ref)
            .unwrap_or_else(|| self.root())
    }

    /// Selects elements using a CSS selector and snapshots each match.
    ///
    /// # Errors
    ///
    /// Returns [`ReaderError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<PageElement>> {
        let sel =
            Selector::parse(selector).map_err(|e| ReaderError::HtmlParseError(format!("Invalid selector: {}", e)))?;

        Ok(self.html.select(&sel).map(PageElement::from_element_ref).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title>  Test Page </title>
        </head>
        <body class="page">
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document_title() {
        let doc = Document::parse(SAMPLE_HTML);
        assert_eq!(doc.title(), Some("Test Page".to_string()));
    }

    #[test]
    fn test_blank_title_is_none() {
        let doc = Document::parse("<html><head><title>   </title></head><body></body></html>");
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_body_snapshot() {
        let doc = Document::parse(SAMPLE_HTML);
        let body = doc.body();
        assert_eq!(body.tag, "body");
        assert!(body.has_class("page"));
        let tags: Vec<&str> = body.element_children().map(|el| el.tag.as_str()).collect();
        assert_eq!(tags, vec!["h1", "p", "p", "a"]);
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML);
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text_content(), "Paragraph 1");
        assert_eq!(elements[1].text_content(), "Paragraph 2");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML);
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ReaderError::HtmlParseError(_))));
    }

    #[test]
    fn test_fragment_root() {
        let doc = Document::parse_fragment("<p>one</p><p>two</p>");
        let root = doc.root();
        assert_eq!(root.tag, "html");
        assert_eq!(root.element_children().count(), 2);
    }
}
