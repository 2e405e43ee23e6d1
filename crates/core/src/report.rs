//! JSON report of a single filter run.

use serde::Serialize;

use crate::Result;
use crate::annotate::Annotation;
use crate::filter::Outcome;
use crate::parse::Document;

/// Outcome, annotations and the remaining body content, ready to print.
///
/// # Example
///
/// ```rust
/// use unclutter_core::{BoilerplateFilter, Document, Report};
///
/// let mut doc = Document::parse("<body><nav>Menu</nav><article><p>Story</p></article></body>").unwrap();
/// let outcome = BoilerplateFilter::new().apply(&mut doc);
/// let json = Report::new(&outcome, &[], &doc).to_json().unwrap();
/// assert!(json.contains("\"selector\": \"article\""));
/// ```
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub outcome: &'a Outcome,
    pub annotations: &'a [Annotation],
    /// Inner HTML of the body after filtering
    pub content: Option<String>,
}

impl<'a> Report<'a> {
    pub fn new(outcome: &'a Outcome, annotations: &'a [Annotation], doc: &Document) -> Self {
        Self { outcome, annotations, content: doc.body_html() }
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::UnclutterError::SerializeError`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
