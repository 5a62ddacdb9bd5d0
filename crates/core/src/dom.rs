//! Read-only page tree snapshot.
//!
//! The locator and the Markdown serializer are pure functions over this
//! tree. A [`PageElement`] is built once from the `scraper` parse tree and
//! owns its children, so nodes never have more than one parent and the tree
//! is acyclic by construction.
//!
//! # Example
//!
//! ```rust
//! use readmode_core::dom::{PageElement, PageNode};
//!
//! let p = PageElement::new("p")
//!     .with_text("Hello ")
//!     .with_child(PageElement::new("b").with_text("world"));
//!
//! assert_eq!(p.text_content(), "Hello world");
//! assert_eq!(p.element_children().count(), 1);
//! assert!(matches!(p.children[0], PageNode::Text(_)));
//! ```

use ego_tree::iter::Edge;
use scraper::{ElementRef, Node};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// A node in the page tree: either a text leaf or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageNode {
    Text(String),
    Element(PageElement),
}

impl PageNode {
    /// Text content of this node (the literal string for text leaves).
    pub fn text_content(&self) -> String {
        match self {
            PageNode::Text(text) => text.clone(),
            PageNode::Element(el) => el.text_content(),
        }
    }

    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&PageElement> {
        match self {
            PageNode::Element(el) => Some(el),
            PageNode::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut PageElement> {
        match self {
            PageNode::Element(el) => Some(el),
            PageNode::Text(_) => None,
        }
    }
}

impl From<PageElement> for PageNode {
    fn from(el: PageElement) -> Self {
        PageNode::Element(el)
    }
}

/// An element with a lowercase tag name, ordered attributes and ordered children.
#[derive(Debug)]
pub struct PageElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<PageNode>,
}

impl PageElement {
    /// Creates an empty element.
    pub fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), attrs: Vec::new(), children: Vec::new() }
    }

    /// Builder: adds (or replaces) an attribute.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Builder: appends a child element.
    pub fn with_child(mut self, child: PageElement) -> Self {
        self.children.push(PageNode::Element(child));
        self
    }

    /// Builder: appends a text leaf.
    pub fn with_text(mut self, text: &str) -> Self {
        self.children.push(PageNode::Text(text.to_string()));
        self
    }

    /// Snapshots a `scraper` element and everything below it.
    ///
    /// Comments, doctypes and processing instructions are dropped.
    pub fn from_element_ref(element: ElementRef<'_>) -> Self {
        let mut open: Vec<PageElement> = Vec::new();
        let mut root = None;

        for edge in element.traverse() {
            match edge {
                Edge::Open(node) => match node.value() {
                    Node::Element(value) => open.push(Self::shallow(value)),
                    Node::Text(text) => {
                        if let Some(parent) = open.last_mut() {
                            parent.children.push(PageNode::Text(String::from(&**text)));
                        }
                    }
                    _ => {}
                },
                Edge::Close(node) if node.value().is_element() => {
                    let Some(done) = open.pop() else { continue };
                    match open.last_mut() {
                        Some(parent) => parent.children.push(PageNode::Element(done)),
                        None => root = Some(done),
                    }
                }
                Edge::Close(_) => {}
            }
        }

        root.unwrap_or_else(|| Self::shallow(element.value()))
    }

    fn shallow(value: &scraper::node::Element) -> Self {
        Self {
            tag: value.name().to_ascii_lowercase(),
            attrs: value.attrs().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
            children: Vec::new(),
        }
    }

    fn shallow_clone(&self) -> Self {
        Self { tag: self.tag.clone(), attrs: self.attrs.clone(), children: Vec::new() }
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attrs.push((name.to_ascii_lowercase(), value.to_string())),
        }
    }

    /// Whether the whitespace-separated `class` attribute contains `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|c| c == class))
    }

    /// Concatenation of all descendant text leaves, like DOM `textContent`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        let mut pending: Vec<&PageNode> = self.children.iter().rev().collect();
        while let Some(node) = pending.pop() {
            match node {
                PageNode::Text(text) => out.push_str(text),
                PageNode::Element(el) => pending.extend(el.children.iter().rev()),
            }
        }
    }

    /// Direct element children, skipping text leaves (DOM `children`).
    pub fn element_children(&self) -> impl DoubleEndedIterator<Item = &PageElement> {
        self.children.iter().filter_map(PageNode::as_element)
    }

    /// All elements of the subtree in document order, starting with `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Visits every element of the subtree mutably, parents before children.
    pub fn for_each_mut(&mut self, f: &mut impl FnMut(&mut PageElement)) {
        let mut stack: Vec<&mut PageElement> = vec![self];
        while let Some(el) = stack.pop() {
            f(el);
            stack.extend(el.children.iter_mut().rev().filter_map(PageNode::as_element_mut));
        }
    }

    /// Whether this element is a void element (`img`, `hr`, ...).
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Serializes the children of this element to HTML.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        write_html(self.children.iter().rev().map(Step::from).collect(), &mut out);
        out
    }

    /// Serializes this element and its subtree to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_html(vec![Step::Open(self)], &mut out);
        out
    }
}

impl Clone for PageElement {
    fn clone(&self) -> Self {
        let mut frames: Vec<(&PageElement, PageElement, usize)> = vec![(self, self.shallow_clone(), 0)];
        let mut root = None;

        while let Some(frame) = frames.last_mut() {
            let source = frame.0;
            match source.children.get(frame.2) {
                Some(PageNode::Text(text)) => {
                    frame.2 += 1;
                    frame.1.children.push(PageNode::Text(text.clone()));
                }
                Some(PageNode::Element(child)) => {
                    frame.2 += 1;
                    frames.push((child, child.shallow_clone(), 0));
                }
                None => {
                    let Some((_, done, _)) = frames.pop() else { break };
                    match frames.last_mut() {
                        Some(parent) => parent.1.children.push(PageNode::Element(done)),
                        None => root = Some(done),
                    }
                }
            }
        }

        root.unwrap_or_else(|| self.shallow_clone())
    }
}

impl PartialEq for PageElement {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if a.tag != b.tag || a.attrs != b.attrs || a.children.len() != b.children.len() {
                return false;
            }
            for pair in a.children.iter().zip(&b.children) {
                match pair {
                    (PageNode::Text(x), PageNode::Text(y)) if x == y => {}
                    (PageNode::Element(x), PageNode::Element(y)) => pairs.push((x, y)),
                    _ => return false,
                }
            }
        }
        true
    }
}

impl Eq for PageElement {}

/// Subtrees are torn down from a heap stack instead of nested drop calls.
impl Drop for PageElement {
    fn drop(&mut self) {
        let mut pending: Vec<PageElement> = Vec::new();
        detach_children(&mut self.children, &mut pending);
        while let Some(mut el) = pending.pop() {
            detach_children(&mut el.children, &mut pending);
        }
    }
}

fn detach_children(children: &mut Vec<PageNode>, pending: &mut Vec<PageElement>) {
    pending.extend(children.drain(..).filter_map(|node| match node {
        PageNode::Element(el) => Some(el),
        PageNode::Text(_) => None,
    }));
}

enum Step<'a> {
    Open(&'a PageElement),
    Text(&'a str),
    Close(&'a str),
}

impl<'a> From<&'a PageNode> for Step<'a> {
    fn from(node: &'a PageNode) -> Self {
        match node {
            PageNode::Text(text) => Step::Text(text),
            PageNode::Element(el) => Step::Open(el),
        }
    }
}

fn write_html(mut steps: Vec<Step<'_>>, out: &mut String) {
    while let Some(step) = steps.pop() {
        match step {
            Step::Text(text) => out.push_str(&html_escape::encode_text(text)),
            Step::Close(tag) => {
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            Step::Open(el) => {
                write_start_tag(el, out);
                if el.is_void() {
                    continue;
                }
                steps.push(Step::Close(&el.tag));

                // Raw text elements keep their content verbatim.
                if matches!(el.tag.as_str(), "script" | "style") {
                    out.push_str(&el.text_content());
                } else {
                    steps.extend(el.children.iter().rev().map(Step::from));
                }
            }
        }
    }
}

fn write_start_tag(el: &PageElement, out: &mut String) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(value));
        out.push('"');
    }
    out.push('>');
}

/// Pre-order iterator over the elements of a subtree.
pub struct Descendants<'a> {
    stack: Vec<&'a PageElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a PageElement;

    fn next(&mut self) -> Option<Self::Item> {
        let el = self.stack.pop()?;
        self.stack.extend(el.element_children().rev());
        Some(el)
    }
}
