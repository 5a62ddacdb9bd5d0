//! Output formats generated from reader content.

pub mod export;
pub mod markdown;

pub use export::{MARKDOWN_CONTENT_TYPE, MarkdownExport, markdown_file_name};
pub use markdown::{MarkdownSerializer, Tag, serialize};
