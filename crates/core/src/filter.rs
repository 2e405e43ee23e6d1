//! Boilerplate removal API.
//!
//! This module wires the three stages together: content signatures first,
//! the heuristic scorer as fallback, then pruning of everything outside the
//! chosen content root. The main entry point is [`BoilerplateFilter`], along
//! with the one-call [`remove_boilerplate`].
//!
//! # Example
//!
//! ```rust
//! use unclutter_core::{Document, remove_boilerplate};
//!
//! let html = r#"<html><body>
//!     <nav><a href="/">Home</a></nav>
//!     <div class="entry-content"><p>The story.</p></div>
//! </body></html>"#;
//!
//! let mut doc = Document::parse(html).unwrap();
//! remove_boilerplate(&mut doc);
//! assert!(doc.select("nav").unwrap().is_empty());
//! ```

use std::sync::LazyLock;

use ego_tree::NodeId;
use serde::Serialize;
use tracing::debug;

use crate::Result;
use crate::annotate::{Annotation, AnnotationSink, Discard};
use crate::extract::find_best_element;
use crate::parse::Document;
use crate::prune::prune;
use crate::scoring::ScoreConfig;
use crate::signature::SignatureMatcher;

/// Configuration for the boilerplate filter.
///
/// # Example
///
/// ```rust
/// use unclutter_core::FilterConfig;
///
/// let config = FilterConfig::builder()
///     .annotate(true)
///     .signature(".story-body")
///     .build();
/// assert!(config.annotate);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FilterConfig {
    /// Record scoring annotations and skip pruning (default: false).
    pub annotate: bool,

    /// Try content signatures before scoring (default: true).
    pub use_signatures: bool,

    /// Extra signatures tried before the built-in ones, in order (default: empty).
    pub extra_signatures: Vec<String>,

    /// Scoring weights.
    pub score: ScoreConfig,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self { annotate: false, use_signatures: true, extra_signatures: Vec::new(), score: ScoreConfig::default() }
    }
}

impl FilterConfig {
    /// Creates a new builder for FilterConfig.
    pub fn builder() -> FilterConfigBuilder {
        FilterConfigBuilder::new()
    }
}

/// Builder for FilterConfig.
pub struct FilterConfigBuilder {
    config: FilterConfig,
}

impl FilterConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: FilterConfig::default() }
    }

    /// Sets annotate mode.
    pub fn annotate(mut self, value: bool) -> Self {
        self.config.annotate = value;
        self
    }

    /// Sets whether content signatures are tried.
    pub fn use_signatures(mut self, value: bool) -> Self {
        self.config.use_signatures = value;
        self
    }

    /// Appends one extra signature selector.
    pub fn signature(mut self, selector: impl Into<String>) -> Self {
        self.config.extra_signatures.push(selector.into());
        self
    }

    /// Replaces the extra signature selectors.
    pub fn extra_signatures(mut self, selectors: Vec<String>) -> Self {
        self.config.extra_signatures = selectors;
        self
    }

    /// Sets the scoring weights.
    pub fn score(mut self, score: ScoreConfig) -> Self {
        self.config.score = score;
        self
    }

    /// Builds the config.
    pub fn build(self) -> FilterConfig {
        self.config
    }
}

impl Default for FilterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// How the content root was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    /// A content signature matched exactly one element.
    Signature { selector: String },
    /// A heuristic candidate scored above zero.
    Heuristic,
    /// Nothing qualified; the document element was kept as is.
    Fallback,
}

/// Report of a single filter run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    /// How the content root was chosen
    pub strategy: Strategy,
    /// The content root
    #[serde(skip)]
    pub best: NodeId,
    /// Tag name of the content root
    pub best_tag: String,
    /// Heuristic score of the content root, when it came from scoring
    pub score: Option<f64>,
    /// Number of elements detached
    pub removed: usize,
    /// Whether the run only annotated
    pub annotated: bool,
}

/// Main entry point for boilerplate removal.
///
/// # Example
///
/// ```rust
/// use unclutter_core::{BoilerplateFilter, Document, Strategy};
///
/// let html = r#"<html><body><div>menu</div><article><p>Text</p></article></body></html>"#;
/// let mut doc = Document::parse(html).unwrap();
/// let outcome = BoilerplateFilter::new().apply(&mut doc);
/// assert_eq!(outcome.strategy, Strategy::Signature { selector: "article".to_string() });
/// assert_eq!(outcome.removed, 1);
/// ```
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
    config: FilterConfig,
    signatures: SignatureMatcher,
}

impl BoilerplateFilter {
    /// Creates a filter with default settings and the built-in signatures.
    pub fn new() -> Self {
        Self { config: FilterConfig::default(), signatures: SignatureMatcher::default() }
    }

    /// Creates a filter with a custom configuration.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UnclutterError::HtmlParseError`] if an extra signature
    /// is not a valid selector.
    pub fn with_config(config: FilterConfig) -> Result<Self> {
        let signatures = SignatureMatcher::with_extra(&config.extra_signatures)?;
        Ok(Self { config, signatures })
    }

    /// The active configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Picks the content root without touching the document.
    pub fn find_content_root(&self, doc: &Document) -> NodeId {
        self.choose(doc, &mut Discard).1
    }

    /// Removes boilerplate from the document in place.
    pub fn apply(&self, doc: &mut Document) -> Outcome {
        self.apply_with_sink(doc, &mut Discard)
    }

    /// Like [`BoilerplateFilter::apply`], reporting annotations to `sink`
    /// when annotate mode is on. Annotate mode never prunes.
    pub fn apply_with_sink(&self, doc: &mut Document, sink: &mut dyn AnnotationSink) -> Outcome {
        if self.config.annotate { self.run(doc, sink) } else { self.run(doc, &mut Discard) }
    }

    fn run(&self, doc: &mut Document, sink: &mut dyn AnnotationSink) -> Outcome {
        let (strategy, best, score) = self.choose(doc, sink);
        let best_tag = doc.element(best).map(|el| el.tag_name()).unwrap_or_default();
        sink.record(Annotation::BestElement { node: best, tag_name: best_tag.clone(), score });

        let removed = if self.config.annotate {
            debug!("annotate mode, document left intact");
            0
        } else {
            prune(doc, best)
        };

        debug!(?strategy, best = %best_tag, removed, "boilerplate filter finished");
        Outcome { strategy, best, best_tag, score, removed, annotated: self.config.annotate }
    }

    fn choose(&self, doc: &Document, sink: &mut dyn AnnotationSink) -> (Strategy, NodeId, Option<f64>) {
        if self.config.use_signatures
            && let Some(found) = self.signatures.find(doc)
        {
            sink.record(Annotation::Signature { node: found.node, selector: found.selector.clone() });
            return (Strategy::Signature { selector: found.selector }, found.node, None);
        }

        let best = find_best_element(doc, &self.config.score, sink);
        if best.from_candidate {
            (Strategy::Heuristic, best.node, Some(best.score))
        } else {
            (Strategy::Fallback, best.node, None)
        }
    }
}

impl Default for BoilerplateFilter {
    fn default() -> Self {
        Self::new()
    }
}

static DEFAULT_FILTER: LazyLock<BoilerplateFilter> = LazyLock::new(BoilerplateFilter::new);

/// Removes boilerplate from `doc` in place with default settings.
///
/// Never fails: documents without a body, or without anything that looks
/// like content, are left as they are.
pub fn remove_boilerplate(doc: &mut Document) {
    DEFAULT_FILTER.apply(doc);
}

/// Parses `html`, removes boilerplate and serializes the result.
pub fn remove_boilerplate_html(html: &str) -> Result<String> {
    let mut doc = Document::parse(html)?;
    remove_boilerplate(&mut doc);
    Ok(doc.as_string())
}
