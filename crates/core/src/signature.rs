//! Content signatures: the fast path of boilerplate removal.
//!
//! Many pages mark their main content with semantic HTML, microdata or a
//! well-known CMS class. When one of those markers matches exactly one
//! element in the body, that element is taken as the content root without
//! running the heuristic scorer.

use std::sync::LazyLock;

use ego_tree::NodeId;
use scraper::Selector;
use serde::Serialize;
use tracing::{debug, trace};

use crate::parse::{Document, parse_selector};
use crate::Result;

/// Built-in content signatures, in priority order.
///
/// The order is significant: the first selector with a unique match wins even
/// when a later one would also match uniquely.
pub const CONTENT_SIGNATURES: &[&str] = &[
    "article",
    ".hentry",
    ".entry-content",
    "#article",
    ".articleText",
    ".articleBody",
    "#articleBody",
    ".article_body",
    ".articleContent",
    ".full-article",
    ".repository-content",
    "[itemprop=\"articleBody\"]",
    "[role=\"article\"]",
    "[itemtype=\"http://schema.org/Article\"]",
    "[itemtype=\"http://schema.org/NewsArticle\"]",
    "[itemtype=\"http://schema.org/BlogPosting\"]",
    "[itemtype=\"http://schema.org/Blog\"]",
    "[itemtype=\"http://schema.org/WebPage\"]",
    "[itemtype=\"http://schema.org/TechArticle\"]",
    "[itemtype=\"http://schema.org/ScholarlyArticle\"]",
    "#WNStoryBody",
    ".WNStoryBody",
    ".main-article",
    ".article",
    ".article_content",
    ".article-content",
    ".entry",
    ".post-content",
    ".post-body",
    ".postcontent",
    ".post",
    "#post",
    ".storybody",
    "#story",
    ".story",
    "#content",
];

#[derive(Debug, Clone)]
struct Signature {
    source: String,
    selector: Selector,
}

static BUILTIN_SIGNATURES: LazyLock<Vec<Signature>> = LazyLock::new(|| {
    CONTENT_SIGNATURES
        .iter()
        .filter_map(|source| {
            Selector::parse(source)
                .ok()
                .map(|selector| Signature { source: source.to_string(), selector })
        })
        .collect()
});

/// An element picked by a signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureMatch {
    /// The matched element
    #[serde(skip)]
    pub node: NodeId,
    /// The selector that matched it
    pub selector: String,
}

/// Ordered list of compiled content signatures.
///
/// # Example
///
/// ```rust
/// use unclutter_core::{Document, SignatureMatcher};
///
/// let html = r#"<body><div class="entry-content"><p>Story</p></div><div class="side">x</div></body>"#;
/// let doc = Document::parse(html).unwrap();
/// let found = SignatureMatcher::default().find(&doc).unwrap();
/// assert_eq!(found.selector, ".entry-content");
/// ```
#[derive(Debug, Clone)]
pub struct SignatureMatcher {
    signatures: Vec<Signature>,
}

impl SignatureMatcher {
    /// Compiles a custom signature list, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UnclutterError::HtmlParseError`] for the first invalid selector.
    pub fn from_selectors<I, S>(selectors: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let signatures = selectors
            .into_iter()
            .map(|source| {
                let source = source.as_ref();
                parse_selector(source).map(|selector| Signature { source: source.to_string(), selector })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { signatures })
    }

    /// User signatures tried first, followed by the built-in list.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UnclutterError::HtmlParseError`] for the first invalid selector.
    pub fn with_extra<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut matcher = Self::from_selectors(extra)?;
        matcher.signatures.extend(BUILTIN_SIGNATURES.iter().cloned());
        Ok(matcher)
    }

    /// A matcher that never matches.
    pub fn empty() -> Self {
        Self { signatures: Vec::new() }
    }

    /// Number of signatures.
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// Whether the matcher has no signatures.
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    /// The selector sources, in priority order.
    pub fn selectors(&self) -> impl Iterator<Item = &str> {
        self.signatures.iter().map(|sig| sig.source.as_str())
    }

    /// Finds the first signature that matches exactly one element in the body.
    ///
    /// Returns `None` when the document has no body or when every signature
    /// matches zero or several elements.
    pub fn find(&self, doc: &Document) -> Option<SignatureMatch> {
        let body = doc.body()?;

        for sig in &self.signatures {
            let mut matches = body.select_with(&sig.selector);
            match (matches.next(), matches.next()) {
                (Some(only), None) => {
                    debug!(selector = %sig.source, tag = only.local_name(), "content signature matched");
                    return Some(SignatureMatch { node: only.node_id(), selector: sig.source.clone() });
                }
                (Some(_), Some(_)) => trace!(selector = %sig.source, "ambiguous signature skipped"),
                _ => {}
            }
        }

        None
    }
}

impl Default for SignatureMatcher {
    fn default() -> Self {
        Self { signatures: BUILTIN_SIGNATURES.clone() }
    }
}
