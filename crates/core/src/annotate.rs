//! Scoring annotations for tuning bias weights offline.
//!
//! When annotation is enabled the engine reports every scored candidate,
//! the signature that fired (if any) and the winning element to an
//! [`AnnotationSink`] instead of pruning the document. The document itself
//! is never written to.

use ego_tree::NodeId;
use serde::Serialize;

use crate::scoring::ScoreResult;

/// A single observation made while choosing the content root.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// A heuristic candidate and all of its sub-biases.
    Candidate {
        #[serde(skip)]
        node: NodeId,
        /// Position among the candidates, in document order
        position: usize,
        score: ScoreResult,
    },
    /// A content signature picked the element.
    Signature {
        #[serde(skip)]
        node: NodeId,
        selector: String,
    },
    /// The element chosen as content root.
    BestElement {
        #[serde(skip)]
        node: NodeId,
        tag_name: String,
        score: Option<f64>,
    },
}

impl Annotation {
    /// The element this annotation is about.
    pub fn node(&self) -> NodeId {
        match self {
            Annotation::Candidate { node, .. } | Annotation::Signature { node, .. } | Annotation::BestElement { node, .. } => {
                *node
            }
        }
    }
}

/// Receives annotations as they are produced.
pub trait AnnotationSink {
    fn record(&mut self, annotation: Annotation);
}

impl AnnotationSink for Vec<Annotation> {
    fn record(&mut self, annotation: Annotation) {
        self.push(annotation);
    }
}

/// A sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct Discard;

impl AnnotationSink for Discard {
    fn record(&mut self, _annotation: Annotation) {}
}
