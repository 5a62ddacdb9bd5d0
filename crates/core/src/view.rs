//! The generated reader page.

use serde::Serialize;

use crate::dom::{PageElement, PageNode};
use crate::formatters::markdown::MarkdownSerializer;
use crate::settings::{ReaderSettings, Theme};
use crate::toc::{TocEntry, build_toc, render_toc};

/// Id of the element holding the article content.
pub const CONTAINER_ID: &str = "reader-mode-container";

/// Id of the table of contents sidebar.
pub const SIDEBAR_ID: &str = "reader-sidebar";

/// Elements whose text never renders.
const INERT_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Inline style that hides page chrome inside the reader content.
const HIDDEN_STYLE: &str = "display: none";

const READER_CSS: &str = r#"
body { margin: 0; }
body.theme-light { background: #fdfdfb; color: #1f2328; }
body.theme-dark { background: #1e1f22; color: #d4d4d4; }
#reader-mode-container {
  max-width: var(--reader-width, 800px);
  line-height: var(--reader-line-height, 1.6);
  margin: 0 auto;
  padding: 2rem 1.5rem;
}
#reader-mode-container img { max-width: 100%; height: auto; }
#reader-sidebar { position: fixed; top: 0; left: 0; width: 240px; height: 100vh; overflow-y: auto; }
#reader-sidebar .toc-list { list-style: none; padding-left: 1rem; }
#reader-sidebar .level-2 { padding-left: 0.75rem; }
#reader-sidebar .level-3 { padding-left: 1.5rem; }
#reader-sidebar .level-4 { padding-left: 2.25rem; }
@media (max-width: 768px) { #reader-sidebar:not(.show) { display: none; } }
"#;

const PRINT_CSS: &str = r#"
@media print {
  body { padding: 0; margin: 0; }
  #reader-sidebar { display: none; }
  #reader-mode-container {
    margin: 0 auto !important;
    padding: 2cm !important;
    width: 100% !important;
    max-width: none !important;
  }
  #reader-mode-container img {
    max-width: 100% !important;
    page-break-inside: avoid;
  }
  h1, h2, h3, h4 { page-break-after: avoid; }
  p, li { page-break-inside: avoid; }
}
"#;

/// Reader content with its table of contents and applied typography.
#[derive(Debug, Clone, Serialize)]
pub struct ReaderView {
    #[serde(skip)]
    container: PageElement,
    pub toc: Vec<TocEntry>,
    pub title: Option<String>,
    pub theme: Theme,
}

impl ReaderView {
    /// Builds the view from a located content element.
    ///
    /// The content is copied whole. Page chrome matching `is_hidden` stays in
    /// the copy with `display: none` appended to its inline style, headings
    /// receive anchors, and `settings` styles are applied.
    pub fn build(
        content: &PageElement, title: Option<String>, settings: &ReaderSettings,
        is_hidden: impl Fn(&PageElement) -> bool,
    ) -> Self {
        let mut container = PageElement::new("div").with_attr("id", CONTAINER_ID);
        container.children = content.children.clone();

        for child in container.children.iter_mut().filter_map(PageNode::as_element_mut) {
            child.for_each_mut(&mut |el| {
                if is_hidden(&*el) {
                    hide(el);
                }
            });
        }

        let toc = build_toc(&mut container);
        let mut view = Self { container, toc, title, theme: settings.theme };
        view.apply_settings(settings);
        view
    }

    /// Restyles the container and every paragraph and list item.
    ///
    /// Hidden elements keep their `display: none`.
    pub fn apply_settings(&mut self, settings: &ReaderSettings) {
        let text_style = settings.text_style();
        self.container.for_each_mut(&mut |el| {
            if matches!(el.tag.as_str(), "p" | "li") {
                if is_marked_hidden(el) {
                    el.set_attr("style", &format!("{}; {}", text_style, HIDDEN_STYLE));
                } else {
                    el.set_attr("style", &text_style);
                }
            }
        });
        self.container.set_attr("style", &settings.container_style());
        self.theme = settings.theme;
    }

    /// The `#reader-mode-container` element.
    pub fn container(&self) -> &PageElement {
        &self.container
    }

    /// The body that replaces the page's original body.
    pub fn body(&self) -> PageElement {
        let sidebar = PageElement::new("div")
            .with_attr("id", SIDEBAR_ID)
            .with_attr("class", "show")
            .with_child(
                PageElement::new("div")
                    .with_attr("class", "toc-container")
                    .with_child(PageElement::new("h3").with_text("Contents"))
                    .with_child(render_toc(&self.toc)),
            );

        PageElement::new("body").with_child(self.container.clone()).with_child(sidebar)
    }

    /// Markdown for the container contents.
    pub fn markdown(&self, serializer: &MarkdownSerializer) -> String {
        serializer.serialize_element(&self.container)
    }

    /// Rendered text of the content, without hidden chrome or script text.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut pending: Vec<&PageNode> = self.container.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            match node {
                PageNode::Text(text) => out.push_str(text),
                PageNode::Element(el) if INERT_TAGS.contains(&el.tag.as_str()) || is_marked_hidden(el) => {}
                PageNode::Element(el) => pending.extend(el.children.iter().rev()),
            }
        }
        out
    }

    /// Complete reader page.
    pub fn to_html(&self, prefers_dark: bool) -> String {
        self.render(prefers_dark, false)
    }

    /// Reader page with print rules, for saving as PDF from a browser.
    pub fn to_print_html(&self, prefers_dark: bool) -> String {
        self.render(prefers_dark, true)
    }

    fn render(&self, prefers_dark: bool, print: bool) -> String {
        let mut body = self.body();
        body.set_attr("class", self.theme.body_class(prefers_dark));

        // Copied scripts stay inert, as they do after an innerHTML copy.
        body.for_each_mut(&mut |el| {
            el.children.retain(|child| child.as_element().is_none_or(|inner| inner.tag != "script"));
        });

        let title = self.title.as_deref().unwrap_or("Reader");
        let mut css = READER_CSS.to_string();
        if print {
            css.push_str(PRINT_CSS);
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>{}</style>\n</head>\n{}\n</html>\n",
            html_escape::encode_text(title),
            css,
            body.to_html()
        )
    }
}

/// Appends `display: none` to the inline style of `el`.
fn hide(el: &mut PageElement) {
    if is_marked_hidden(el) {
        return;
    }
    let style = match el.attr("style").map(str::trim).filter(|style| !style.is_empty()) {
        Some(style) => format!("{}; {}", style.trim_end_matches(';'), HIDDEN_STYLE),
        None => HIDDEN_STYLE.to_string(),
    };
    el.set_attr("style", &style);
}

fn is_marked_hidden(el: &PageElement) -> bool {
    el.attr("style").is_some_and(|style| style.ends_with(HIDDEN_STYLE))
}
