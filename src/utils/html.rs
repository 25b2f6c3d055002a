//! Minimal HTML query layer.
//!
//! Scraping code only needs "find the first/all elements with this tag that
//! satisfy a predicate", text content, attributes, and relative URL
//! resolution. Keeping those behind [`HtmlPage`] and [`HtmlNode`] means the
//! scraping algorithm never touches the parser's API directly.
//!
//! `scraper::Html` is not `Send`, so a parsed page must not be held across an
//! `.await`; extract owned values first.

use scraper::{ElementRef, Html};
use url::Url;

/// A parsed HTML document
pub struct HtmlPage {
    document: Html,
}

impl HtmlPage {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// The document's root element
    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode {
            element: self.document.root_element(),
        }
    }

    /// First element in document order with the given tag that satisfies `predicate`
    pub fn find_first<'a, P>(&'a self, tag: &str, predicate: P) -> Option<HtmlNode<'a>>
    where
        P: Fn(&HtmlNode<'a>) -> bool,
    {
        let root = self.root();
        if root.tag() == tag && predicate(&root) {
            return Some(root);
        }
        root.find_first(tag, predicate)
    }

    /// All elements in document order with the given tag that satisfy `predicate`
    pub fn find_all<'a, P>(&'a self, tag: &str, predicate: P) -> Vec<HtmlNode<'a>>
    where
        P: Fn(&HtmlNode<'a>) -> bool,
    {
        let root = self.root();
        let mut found = Vec::new();
        if root.tag() == tag && predicate(&root) {
            found.push(root);
        }
        found.extend(root.find_all(tag, predicate));
        found
    }
}

/// A single element inside an [`HtmlPage`]
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a> {
    element: ElementRef<'a>,
}

impl<'a> HtmlNode<'a> {
    /// Lowercase tag name
    pub fn tag(&self) -> &'a str {
        self.element.value().name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    pub fn id(&self) -> Option<&'a str> {
        self.element.value().id()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.element.value().classes().any(|c| c == class)
    }

    /// Concatenated text of every descendant text node, untouched
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// First descendant (excluding self) with the given tag satisfying `predicate`
    pub fn find_first<P>(&self, tag: &str, predicate: P) -> Option<HtmlNode<'a>>
    where
        P: Fn(&HtmlNode<'a>) -> bool,
    {
        self.descendants().find(|node| node.tag() == tag && predicate(node))
    }

    /// All descendants (excluding self) with the given tag satisfying `predicate`
    pub fn find_all<P>(&self, tag: &str, predicate: P) -> Vec<HtmlNode<'a>>
    where
        P: Fn(&HtmlNode<'a>) -> bool,
    {
        self.descendants()
            .filter(|node| node.tag() == tag && predicate(node))
            .collect()
    }

    fn descendants(&self) -> impl Iterator<Item = HtmlNode<'a>> {
        self.element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|element| HtmlNode { element })
    }
}

/// Predicate accepting every element
pub fn any(_: &HtmlNode<'_>) -> bool {
    true
}

/// Resolve a possibly relative `href` against `base`.
pub fn resolve_url(base: &Url, href: &str) -> Result<Url, url::ParseError> {
    base.join(href.trim())
}
