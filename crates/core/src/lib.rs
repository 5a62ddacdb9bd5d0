//! Reader mode for web pages.
//!
//! `readmode-core` finds the main content of a page, re-renders it as a
//! distraction-free reader view with adjustable typography, and converts it
//! to Markdown.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{Document, locate, serialize};
//! use readmode_core::dom::PageNode;
//!
//! let doc = Document::parse("<body><nav>Menu</nav><article><h1>Title</h1><p>Hello <b>world</b></p></article></body>");
//! let body = doc.body();
//! let content = locate(&body).unwrap();
//! assert_eq!(serialize(&PageNode::Element(content.clone())), "# Title\n\nHello world\n\n");
//! ```

pub mod dom;
pub mod draft;
pub mod error;
pub mod fetch;
pub mod formatters;
pub mod locate;
pub mod parse;
pub mod protocol;
pub mod reader;
pub mod settings;
pub mod store;
pub mod toc;
pub mod view;

pub use dom::{PageElement, PageNode};
pub use draft::{DRAFT_DELAY, DRAFT_KEY, DraftKeeper};
pub use error::{ReaderError, Result};
pub use fetch::{FetchConfig, fetch_file, fetch_stdin, parse_page_url};
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use formatters::{MARKDOWN_CONTENT_TYPE, MarkdownExport, MarkdownSerializer, markdown_file_name, serialize};
pub use locate::{ContentPattern, Location, Locator, LocatorConfig, LocatorConfigBuilder, locate};
pub use parse::Document;
pub use protocol::{Request, Response, handle_json, handle_message};
pub use reader::{Page, ReaderMode};
pub use settings::{FontWeight, ReaderSettings, SETTINGS_KEY, Theme};
pub use store::{FileStore, KeyValueStore, MemoryStore, load_settings, save_settings};
pub use toc::{TocEntry, build_toc, render_toc};
pub use view::ReaderView;
