//! Main-content location.
//!
//! The locator picks the single element most likely to be the article body:
//!
//! 1. Try each [`ContentPattern`] in priority order and return the first
//!    element, in document order, that matches the current pattern.
//! 2. Otherwise scan every element of the density tag (`div` by default) and
//!    keep the one with the strictly greatest visible text length. Ties go to
//!    the first in document order.
//! 3. If no container has any visible text, report nothing found.
//!
//! The density scan looks at a single tag class only.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::{Document, locate};
//!
//! let doc = Document::parse("<body><div>short</div><main><p>Body</p></main></body>");
//! let body = doc.body();
//! let content = locate(&body).unwrap();
//! assert_eq!(content.tag, "main");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::dom::{PageElement, PageNode};
use crate::{ReaderError, Result};

/// Elements whose text never renders.
const NON_RENDERED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Content-wrapper conventions, most specific first.
pub const DEFAULT_PATTERNS: &[&str] =
    &["article", "[role=\"main\"]", ".post-content", ".article-content", ".entry-content", "main"];

/// Page chrome hidden before the density scan measures text.
pub const DEFAULT_HIDDEN: &[&str] = &[
    "header",
    "footer",
    "nav",
    "aside",
    ".advertisement",
    ".social-share",
    ".related-posts",
    ".comments",
];

/// A single-compound selector: `tag`, `.class`, `#id`, `[attr]` or `[attr="value"]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPattern {
    Tag(String),
    Class(String),
    Id(String),
    Attr { name: String, value: Option<String> },
}

impl ContentPattern {
    /// Whether `el` matches this pattern.
    pub fn matches(&self, el: &PageElement) -> bool {
        match self {
            ContentPattern::Tag(tag) => el.tag == *tag,
            ContentPattern::Class(class) => el.has_class(class),
            ContentPattern::Id(id) => el.attr("id") == Some(id.as_str()),
            ContentPattern::Attr { name, value: None } => el.attr(name).is_some(),
            ContentPattern::Attr { name, value: Some(value) } => el.attr(name) == Some(value.as_str()),
        }
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl FromStr for ContentPattern {
    type Err = ReaderError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || ReaderError::InvalidPattern(s.to_string());

        if let Some(class) = s.strip_prefix('.') {
            return if is_ident(class) { Ok(ContentPattern::Class(class.to_string())) } else { Err(invalid()) };
        }

        if let Some(id) = s.strip_prefix('#') {
            return if is_ident(id) { Ok(ContentPattern::Id(id.to_string())) } else { Err(invalid()) };
        }

        if let Some(inner) = s.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            return match inner.split_once('=') {
                None if is_ident(inner.trim()) => {
                    Ok(ContentPattern::Attr { name: inner.trim().to_ascii_lowercase(), value: None })
                }
                None => Err(invalid()),
                Some((name, value)) => {
                    let name = name.trim();
                    let value = value.trim();
                    let value = value
                        .strip_prefix('"')
                        .and_then(|v| v.strip_suffix('"'))
                        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
                        .unwrap_or(value);
                    if is_ident(name) && !value.contains(['"', '\'', ']']) {
                        Ok(ContentPattern::Attr { name: name.to_ascii_lowercase(), value: Some(value.to_string()) })
                    } else {
                        Err(invalid())
                    }
                }
            };
        }

        if is_ident(s) { Ok(ContentPattern::Tag(s.to_ascii_lowercase())) } else { Err(invalid()) }
    }
}

impl fmt::Display for ContentPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentPattern::Tag(tag) => write!(f, "{}", tag),
            ContentPattern::Class(class) => write!(f, ".{}", class),
            ContentPattern::Id(id) => write!(f, "#{}", id),
            ContentPattern::Attr { name, value: None } => write!(f, "[{}]", name),
            ContentPattern::Attr { name, value: Some(value) } => write!(f, "[{}=\"{}\"]", name, value),
        }
    }
}

fn parse_all(patterns: &[&str]) -> Vec<ContentPattern> {
    patterns.iter().filter_map(|p| p.parse().ok()).collect()
}

/// Configuration for the main-content locator.
///
/// # Example
///
/// ```rust
/// use readmode_core::LocatorConfig;
///
/// let config = LocatorConfig::builder()
///     .prepend_pattern(".story-body".parse().unwrap())
///     .density_tag("section")
///     .build();
/// assert_eq!(config.patterns[0].to_string(), ".story-body");
/// ```
#[derive(Debug, Clone)]
pub struct LocatorConfig {
    /// Priority-ordered content patterns.
    pub patterns: Vec<ContentPattern>,
    /// The single tag class examined by the density scan (default: `div`).
    pub density_tag: String,
    /// Elements whose text does not count as visible.
    pub hidden: Vec<ContentPattern>,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self { patterns: parse_all(DEFAULT_PATTERNS), density_tag: "div".to_string(), hidden: parse_all(DEFAULT_HIDDEN) }
    }
}

impl LocatorConfig {
    /// Creates a new builder for LocatorConfig.
    pub fn builder() -> LocatorConfigBuilder {
        LocatorConfigBuilder::new()
    }

    /// Whether `el` is page chrome that the reader hides.
    pub fn is_hidden(&self, el: &PageElement) -> bool {
        self.hidden.iter().any(|p| p.matches(el))
    }
}

/// Builder for LocatorConfig.
pub struct LocatorConfigBuilder {
    config: LocatorConfig,
}

impl LocatorConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: LocatorConfig::default() }
    }

    /// Replaces the pattern list.
    pub fn patterns(mut self, patterns: Vec<ContentPattern>) -> Self {
        self.config.patterns = patterns;
        self
    }

    /// Adds a pattern ahead of all existing ones.
    pub fn prepend_pattern(mut self, pattern: ContentPattern) -> Self {
        self.config.patterns.insert(0, pattern);
        self
    }

    /// Sets the density scan tag.
    pub fn density_tag(mut self, tag: &str) -> Self {
        self.config.density_tag = tag.to_ascii_lowercase();
        self
    }

    /// Replaces the hidden pattern list.
    pub fn hidden(mut self, hidden: Vec<ContentPattern>) -> Self {
        self.config.hidden = hidden;
        self
    }

    /// Builds the config.
    pub fn build(self) -> LocatorConfig {
        self.config
    }
}

impl Default for LocatorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// How the content element was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Matched the pattern at this index of [`LocatorConfig::patterns`].
    Pattern(usize),
    /// Won the density scan with this many visible characters.
    Density { length: usize },
}

/// Main-content locator.
#[derive(Debug, Clone, Default)]
pub struct Locator {
    config: LocatorConfig,
}

impl Locator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LocatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Returns the element judged most likely to be the article body.
    pub fn locate<'a>(&self, root: &'a PageElement) -> Option<&'a PageElement> {
        self.locate_with_reason(root).map(|(el, _)| el)
    }

    /// Like [`Locator::locate`], also reporting which phase decided.
    pub fn locate_with_reason<'a>(&self, root: &'a PageElement) -> Option<(&'a PageElement, Location)> {
        for (index, pattern) in self.config.patterns.iter().enumerate() {
            if let Some(el) = root.descendants().find(|el| pattern.matches(el)) {
                tracing::debug!(pattern = %pattern, tag = %el.tag, "content matched pattern");
                return Some((el, Location::Pattern(index)));
            }
        }

        let mut best: Option<&PageElement> = None;
        let mut best_len = 0;

        for (el, len) in self.visible_lengths(root) {
            if el.tag == self.config.density_tag && len > best_len {
                best_len = len;
                best = Some(el);
            }
        }

        match best {
            Some(el) => {
                tracing::debug!(length = best_len, "content chosen by text density");
                Some((el, Location::Density { length: best_len }))
            }
            None => {
                tracing::debug!("no content container found");
                None
            }
        }
    }

    /// Number of characters of rendered text below `el`.
    ///
    /// Text inside `script`/`style`/`noscript`/`template` and inside hidden
    /// page chrome is not counted.
    pub fn visible_text_len(&self, el: &PageElement) -> usize {
        self.visible_lengths(el).first().map_or(0, |(_, len)| *len)
    }

    /// Visible text length of every element below `root`, in document order.
    ///
    /// Elements are listed parents first, so a reverse sweep folds each
    /// element's total into its parent in one pass.
    fn visible_lengths<'a>(&self, root: &'a PageElement) -> Vec<(&'a PageElement, usize)> {
        let mut parents: Vec<Option<usize>> = Vec::new();
        let mut lengths: Vec<(&'a PageElement, usize)> = Vec::new();
        let mut stack = vec![(root, None)];

        while let Some((el, parent)) = stack.pop() {
            let index = lengths.len();
            let own: usize = el
                .children
                .iter()
                .map(|child| match child {
                    PageNode::Text(text) => text.chars().count(),
                    PageNode::Element(_) => 0,
                })
                .sum();
            lengths.push((el, own));
            parents.push(parent);
            stack.extend(el.element_children().rev().map(|child| (child, Some(index))));
        }

        for index in (0..lengths.len()).rev() {
            let (el, len) = lengths[index];
            if NON_RENDERED_TAGS.contains(&el.tag.as_str()) || self.config.is_hidden(el) {
                lengths[index].1 = 0;
            } else if let Some(parent) = parents[index] {
                lengths[parent].1 += len;
            }
        }

        lengths
    }
}

/// Locates main content with the default configuration.
pub fn locate(root: &PageElement) -> Option<&PageElement> {
    Locator::new().locate(root)
}
