//! HTML parsing and DOM manipulation.
//!
//! This module provides the [`Document`] and [`Element`] types for parsing
//! HTML, navigating the DOM tree with CSS selectors, and detaching subtrees
//! in place.
//!
//! Elements are identified across borrows by their [`NodeId`]: read-only
//! passes hand out ids, mutating passes take them back.
//!
//! # Example
//!
//! ```rust
//! use unclutter_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <body>
//!             <h1>Title</h1>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};

use crate::{Result, UnclutterError};

/// Represents a parsed, mutable HTML document.
///
/// # Example
///
/// ```rust
/// use unclutter_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title(), Some("Test".to_string()));
/// ```
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// The parser follows the HTML5 tree construction rules, so an implicit
    /// `<html>`, `<head>` and `<body>` are synthesised when missing.
    pub fn parse(html: &str) -> Result<Self> {
        let html = Html::parse_document(html);
        Ok(Self { html })
    }

    /// Gets the entire HTML as a string.
    ///
    /// Detached subtrees are not part of the output.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects attached elements using a CSS selector, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`UnclutterError::HtmlParseError`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use unclutter_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;
        let root = self.root_element();

        // `Html::select` walks the whole node arena, detached nodes included,
        // so selection always starts from the live root element.
        let mut matched = Vec::new();
        if root.matches(&sel) {
            matched.push(root);
        }
        matched.extend(root.select_with(&sel));
        Ok(matched)
    }

    /// Gets the title of the document.
    pub fn title(&self) -> Option<String> {
        let selector = Selector::parse("title").ok()?;
        self.root_element()
            .select_with(&selector)
            .next()
            .map(|el| el.text())
    }

    /// Gets all text content from the document.
    pub fn text_content(&self) -> String {
        self.html.root_element().text().collect()
    }

    /// The document element (`<html>`).
    pub fn root_element(&self) -> Element<'_> {
        Element { element: self.html.root_element() }
    }

    /// The `<body>` element, if the document has one.
    ///
    /// Frameset documents have no body.
    pub fn body(&self) -> Option<Element<'_>> {
        self.root_element()
            .child_elements()
            .find(|child| child.local_name() == "body")
    }

    /// Inner HTML of the body, if the document has one.
    pub fn body_html(&self) -> Option<String> {
        self.body().map(|body| body.inner_html())
    }

    /// Looks up an element by id.
    ///
    /// Returns `None` for ids outside this document and for non-element nodes.
    /// Detached elements are still returned; see [`Document::is_attached`].
    pub fn element(&self, id: NodeId) -> Option<Element<'_>> {
        self.html
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Whether the node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.html.tree.root().id();
        self.html.tree.get(id).is_some_and(|node| {
            node.id() == root || node.ancestors().last().is_some_and(|top| top.id() == root)
        })
    }

    /// Detaches a node and its whole subtree from the document.
    ///
    /// Returns `false` if the id does not belong to this document.
    pub fn detach(&mut self, id: NodeId) -> bool {
        match self.html.tree.get_mut(id) {
            Some(mut node) => {
                node.detach();
                true
            }
            None => false,
        }
    }

    /// Number of attached elements, the document element included.
    pub fn element_count(&self) -> usize {
        1 + self.root_element().descendant_elements().count()
    }
}

/// A wrapper around scraper's ElementRef for easier DOM navigation.
///
/// # Example
///
/// ```rust
/// use unclutter_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Stable identity of this element within its document.
    pub fn node_id(&self) -> NodeId {
        self.element.id()
    }

    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    ///
    /// Returns the concatenation of all text nodes within this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Length of the text content after collapsing whitespace runs and trimming.
    pub fn condensed_text_len(&self) -> usize {
        condensed_len(&self.text())
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }

    /// Whether the attribute is present, whatever its value.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    /// Gets the tag name of this element as an owned string.
    pub fn tag_name(&self) -> String {
        self.local_name().to_string()
    }

    /// The element's local name as stored by the parser.
    ///
    /// HTML elements are already lowercased by tree construction.
    pub fn local_name(&self) -> &'a str {
        self.element.value().name()
    }

    /// Whether this element matches a compiled selector.
    pub fn matches(&self, selector: &Selector) -> bool {
        selector.matches(&self.element)
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`UnclutterError::HtmlParseError`] if the selector is invalid.
    pub fn select(&self, selector: &str) -> Result<Vec<Element<'a>>> {
        let sel = parse_selector(selector)?;
        Ok(self.select_with(&sel).collect())
    }

    /// Descendant elements matching a compiled selector, in document order.
    pub fn select_with<'b>(&self, selector: &'b Selector) -> impl Iterator<Item = Element<'a>> + use<'a, 'b> {
        self.element.select(selector).map(|element| Element { element })
    }

    /// The nearest element, starting with this one, that matches the selector.
    pub fn closest(&self, selector: &Selector) -> Option<Element<'a>> {
        std::iter::once(*self)
            .chain(self.ancestors())
            .find(|el| el.matches(selector))
    }

    /// Immediate child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element
            .children()
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// All descendant elements in document order.
    pub fn descendant_elements(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Ancestor elements, nearest first.
    pub fn ancestors(&self) -> impl Iterator<Item = Element<'a>> + use<'a> {
        self.element
            .ancestors()
            .filter_map(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// The parent element, if any.
    pub fn parent_element(&self) -> Option<Element<'a>> {
        self.element
            .parent()
            .and_then(ElementRef::wrap)
            .map(|element| Element { element })
    }
}

impl PartialEq for Element<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node_id() == other.node_id()
    }
}

impl Eq for Element<'_> {}

/// Compiles a selector, mapping parse failures onto the crate error.
pub(crate) fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| UnclutterError::HtmlParseError(format!("Invalid selector: {}", e)))
}

/// Character count of `text` with whitespace runs collapsed to one space and
/// leading/trailing whitespace removed.
pub fn condensed_len(text: &str) -> usize {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| word.chars().count() + usize::from(i > 0))
        .sum()
}
