//! Reader mode controller.
//!
//! [`ReaderMode`] owns one page and its reader state. Enabling swaps the page
//! body for the generated reader body; disabling puts the original back.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{Page, ReaderMode};
//!
//! let html = r#"<html><head><title>Post</title></head>
//!     <body><nav>Home</nav><article><h1>Post</h1><p>Body</p></article></body></html>"#;
//!
//! let mut reader = ReaderMode::new(Page::parse(html, None));
//! assert!(reader.toggle());
//! assert_eq!(reader.markdown().as_deref(), Some("# Post\n\nBody\n\n"));
//! assert!(!reader.toggle());
//! ```

use url::Url;

use crate::dom::PageElement;
use crate::draft::DraftKeeper;
use crate::formatters::export::MarkdownExport;
use crate::formatters::markdown::MarkdownSerializer;
use crate::locate::Locator;
use crate::parse::Document;
use crate::settings::ReaderSettings;
use crate::view::ReaderView;

/// A loaded page.
#[derive(Debug, Clone)]
pub struct Page {
    pub title: Option<String>,
    /// Address links and images are resolved against.
    pub base_url: Option<Url>,
    pub body: PageElement,
}

impl Page {
    pub fn from_document(doc: &Document, base_url: Option<Url>) -> Self {
        Self { title: doc.title(), base_url, body: doc.body() }
    }

    /// Parses `html` as a complete page.
    pub fn parse(html: &str, base_url: Option<Url>) -> Self {
        Self::from_document(&Document::parse(html), base_url)
    }
}

/// Reader state for a single page.
///
/// Reader mode is on exactly when a [`ReaderView`] is present.
#[derive(Debug, Clone)]
pub struct ReaderMode {
    page: Page,
    original_body: Option<PageElement>,
    settings: ReaderSettings,
    locator: Locator,
    view: Option<ReaderView>,
}

impl ReaderMode {
    pub fn new(page: Page) -> Self {
        Self { page, original_body: None, settings: ReaderSettings::default(), locator: Locator::new(), view: None }
    }

    pub fn with_settings(mut self, settings: ReaderSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_locator(mut self, locator: Locator) -> Self {
        self.locator = locator;
        self
    }

    /// Turns reader mode on and returns whether it is on.
    ///
    /// When no content container can be located the page is left untouched
    /// and reader mode stays off.
    pub fn enable(&mut self) -> bool {
        if self.view.is_some() {
            return true;
        }

        let original = self.original_body.get_or_insert_with(|| self.page.body.clone());
        let Some(content) = self.locator.locate(original) else {
            tracing::debug!("no readable content, reader mode stays off");
            return false;
        };

        let config = self.locator.config();
        let view = ReaderView::build(content, self.page.title.clone(), &self.settings, |el| config.is_hidden(el));

        self.page.body = view.body();
        self.view = Some(view);
        tracing::debug!("reader mode enabled");
        true
    }

    /// Restores the original page body.
    pub fn disable(&mut self) {
        if self.view.take().is_none() {
            return;
        }
        if let Some(original) = &self.original_body {
            self.page.body = original.clone();
        }
        tracing::debug!("reader mode disabled");
    }

    /// Flips reader mode and returns the new state.
    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
            false
        } else {
            self.enable()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.view.is_some()
    }

    pub fn view(&self) -> Option<&ReaderView> {
        self.view.as_ref()
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Replaces the settings, restyling the reader when it is on.
    pub fn set_settings(&mut self, settings: ReaderSettings) {
        self.settings = settings;
        if let Some(view) = &mut self.view {
            view.apply_settings(&self.settings);
            self.page.body = view.body();
        }
    }

    fn serializer(&self) -> MarkdownSerializer {
        match &self.page.base_url {
            Some(url) => MarkdownSerializer::with_base_url(url.clone()),
            None => MarkdownSerializer::new(),
        }
    }

    /// Markdown of the reader content, or `None` when reader mode is off.
    pub fn markdown(&self) -> Option<String> {
        self.view.as_ref().map(|view| view.markdown(&self.serializer()))
    }

    /// The Markdown download for the current content.
    pub fn markdown_export(&self) -> Option<MarkdownExport> {
        self.markdown().map(|body| MarkdownExport::new(self.page.title.as_deref(), body))
    }

    /// Text to show in the Markdown editor: the saved draft if there is
    /// one, else a fresh conversion.
    pub async fn open_editor(&self, drafts: &DraftKeeper) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }
        match drafts.load().await {
            Some(draft) => Some(draft),
            None => self.markdown(),
        }
    }

    /// Closes the editor, discarding the draft.
    pub async fn close_editor(&self, drafts: &mut DraftKeeper) {
        drafts.clear().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::DRAFT_KEY;
    use crate::settings::Theme;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    const ARTICLE: &str = r#"<html><head><title>A Post</title></head><body>
        <header>Site</header>
        <article><h1>A Post</h1><div class="social-share">Share</div><p>First <a href="/next">next</a></p><h2>Part</h2><img src="../img/a.png" alt="pic"><p>Second</p></article>
        <footer>Copyright</footer>
    </body></html>"#;

    fn reader() -> ReaderMode {
        ReaderMode::new(Page::parse(ARTICLE, Url::parse("https://example.com/posts/1").ok()))
    }

    #[test]
    fn test_enable_replaces_body() {
        let mut reader = reader();
        let original = reader.page().body.clone();

        assert!(reader.enable());
        assert!(reader.is_enabled());

        let body = &reader.page().body;
        assert_ne!(body, &original);
        let container = body.element_children().next().unwrap();
        assert_eq!(container.attr("id"), Some("reader-mode-container"));
        let share = container.descendants().find(|el| el.has_class("social-share")).unwrap();
        assert_eq!(share.attr("style"), Some("display: none"));
        assert!(!reader.view().unwrap().text().contains("Share"));
        assert!(!body.text_content().contains("Copyright"));
        assert_eq!(reader.view().unwrap().toc.len(), 2);
    }

    #[test]
    fn test_disable_restores_original() {
        let mut reader = reader();
        let original = reader.page().body.clone();

        reader.enable();
        reader.disable();
        assert!(!reader.is_enabled());
        assert_eq!(reader.page().body, original);
        assert!(reader.markdown().is_none());
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut reader = reader();
        assert!(reader.toggle());
        assert!(!reader.toggle());
        assert!(reader.toggle());
        assert!(reader.enable());
    }

    #[test]
    fn test_enable_without_content_is_noop() {
        let mut reader = ReaderMode::new(Page::parse("<p>just a line</p><span>x</span>", None));
        let original = reader.page().body.clone();

        assert!(!reader.enable());
        assert!(!reader.toggle());
        assert!(!reader.is_enabled());
        assert_eq!(reader.page().body, original);
    }

    #[test]
    fn test_markdown_resolves_image_sources() {
        let mut reader = reader();
        reader.enable();
        assert_eq!(
            reader.markdown().unwrap(),
            "# A Post\n\nShareFirst next\n\n## Part\n\n![pic](https://example.com/img/a.png)\n\nSecond\n\n"
        );
    }

    #[test]
    fn test_markdown_keeps_hidden_chrome_text() {
        let html = r#"<article><p>Intro</p><div class="comments">3 comments</div><nav>Next</nav><p>End</p></article>"#;
        let mut reader = ReaderMode::new(Page::parse(html, None));
        assert!(reader.enable());
        assert_eq!(reader.markdown().unwrap(), "Intro\n\n3 commentsNextEnd\n\n");
        assert_eq!(reader.view().unwrap().text(), "IntroEnd");
    }

    #[test]
    fn test_enable_on_deeply_nested_page() {
        let depth = 10_000;
        let html = format!("<body>{}<p>Deep</p>{}</body>", "<div>".repeat(depth), "</div>".repeat(depth));
        let mut reader = ReaderMode::new(Page::parse(&html, None));

        assert!(reader.enable());
        assert_eq!(reader.markdown().unwrap(), "Deep\n\n");
        reader.disable();
        assert!(!reader.is_enabled());
    }

    #[test]
    fn test_markdown_export_named_after_title() {
        let mut reader = reader();
        assert!(reader.markdown_export().is_none());
        reader.enable();
        let export = reader.markdown_export().unwrap();
        assert_eq!(export.file_name, "A Post.md");
        assert!(export.body.starts_with("# A Post"));
    }

    #[test]
    fn test_set_settings_restyles_live_view() {
        let mut reader = reader();
        reader.enable();
        reader.set_settings(ReaderSettings { width: 640, theme: Theme::Dark, ..Default::default() });

        let container = reader.page().body.element_children().next().unwrap();
        assert!(container.attr("style").unwrap().starts_with("--reader-width: 640px"));
        assert!(reader.view().unwrap().to_html(false).contains("theme-dark"));
    }

    #[test]
    fn test_settings_survive_while_disabled() {
        let mut reader = reader();
        reader.set_settings(ReaderSettings { font_size: 22, ..Default::default() });
        reader.enable();
        let p = reader.page().body.descendants().find(|el| el.tag == "p").unwrap();
        assert_eq!(p.attr("style"), Some("font-size: 22px; font-weight: normal"));
    }

    #[tokio::test]
    async fn test_editor_prefers_saved_draft() {
        let store = Arc::new(MemoryStore::new());
        let mut drafts = DraftKeeper::new(store.clone());
        let mut reader = reader();

        assert_eq!(reader.open_editor(&drafts).await, None);
        reader.enable();
        assert_eq!(reader.open_editor(&drafts).await, reader.markdown());

        store.set(DRAFT_KEY, serde_json::json!("edited")).await.unwrap();
        assert_eq!(reader.open_editor(&drafts).await.as_deref(), Some("edited"));

        reader.close_editor(&mut drafts).await;
        assert_eq!(store.get(DRAFT_KEY).await.unwrap(), None);
    }
}
