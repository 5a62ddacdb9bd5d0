//! Generated file downloads.
//!
//! Markdown export produces a file named after the page title, falling back
//! to `article.md` when the page has no usable title.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::Result;

/// Content type attached to Markdown downloads.
pub const MARKDOWN_CONTENT_TYPE: &str = "text/markdown;charset=utf-8";

/// Base name used when the page has no title.
pub const FALLBACK_NAME: &str = "article";

static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f\x7f]"#).expect("valid file name regex"));

/// A Markdown document ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownExport {
    pub file_name: String,
    pub content_type: &'static str,
    pub body: String,
}

impl MarkdownExport {
    pub fn new(title: Option<&str>, body: String) -> Self {
        Self { file_name: markdown_file_name(title), content_type: MARKDOWN_CONTENT_TYPE, body }
    }

    /// Writes the export into `dir` and returns the written path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.body)?;
        Ok(path)
    }
}

/// `<title>.md`, or `article.md` for a missing or blank title.
///
/// Path separators and characters that are reserved in file names are
/// replaced with `_`, so the result is always a single path component.
pub fn markdown_file_name(title: Option<&str>) -> String {
    let title = title.map(str::trim).filter(|t| !t.is_empty());
    let stem = match title {
        Some(title) => UNSAFE_FILE_CHARS.replace_all(title, "_").into_owned(),
        None => FALLBACK_NAME.to_string(),
    };

    let stem = if stem.chars().all(|c| c == '.') { FALLBACK_NAME.to_string() } else { stem };
    format!("{}.md", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(Some("My Post"), "My Post.md")]
    #[case(Some("  Padded  "), "Padded.md")]
    #[case(Some("a/b\\c: d?"), "a_b_c_ d_.md")]
    #[case(Some(""), "article.md")]
    #[case(Some("   "), "article.md")]
    #[case(Some(".."), "article.md")]
    #[case(None, "article.md")]
    fn test_markdown_file_name(#[case] title: Option<&str>, #[case] expected: &str) {
        assert_eq!(markdown_file_name(title), expected);
    }

    #[test]
    fn test_export_content_type() {
        let export = MarkdownExport::new(Some("T"), "# T\n\n".to_string());
        assert_eq!(export.content_type, "text/markdown;charset=utf-8");
        assert_eq!(export.file_name, "T.md");
    }

    #[test]
    fn test_write_to_directory() {
        let tmp = TempDir::new().unwrap();
        let export = MarkdownExport::new(None, "body\n".to_string());

        let path = export.write_to(tmp.path()).unwrap();
        assert_eq!(path, tmp.path().join("article.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "body\n");
    }
}
