//! Heuristic scorer: picks the content root when no signature matched.

use std::sync::LazyLock;

use ego_tree::NodeId;
use scraper::Selector;
use serde::Serialize;
use tracing::{debug, trace};

use crate::annotate::{Annotation, AnnotationSink};
use crate::parse::{Document, Element};
use crate::scoring::{ScoreConfig, ScoreResult, calculate_score};

/// Tags that are considered potential content containers.
///
/// List items, headers, footers and navigation are deliberately absent: they
/// only ever act as negative signals.
pub const CANDIDATE_TAGS: &[&str] = &["article", "content", "div", "layer", "main", "section", "span", "td"];

static CANDIDATE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&CANDIDATE_TAGS.join(", ")).expect("candidate selector is valid"));

/// A candidate element with its score
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    /// The element itself
    pub element: Element<'a>,
    /// The calculated score result
    pub score_result: ScoreResult,
}

impl<'a> Candidate<'a> {
    fn new(element: Element<'a>, score_result: ScoreResult) -> Self {
        Self { element, score_result }
    }

    /// Get the final score of this candidate
    pub fn score(&self) -> f64 {
        self.score_result.final_score
    }
}

/// The element chosen by the heuristic scorer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestElement {
    /// The chosen element
    #[serde(skip)]
    pub node: NodeId,
    /// Its score; 0.0 when no candidate scored above zero
    pub score: f64,
    /// False when the result fell back to the document element
    pub from_candidate: bool,
}

/// Scores every candidate in the body, in document order.
///
/// Returns an empty list for documents without a body.
pub fn score_candidates<'a>(doc: &'a Document, config: &ScoreConfig) -> Vec<Candidate<'a>> {
    let Some(body) = doc.body() else {
        return Vec::new();
    };

    body.select_with(&CANDIDATE_SELECTOR)
        .map(|element| {
            let score_result = calculate_score(&element, config);
            Candidate::new(element, score_result)
        })
        .collect()
}

/// Picks the highest-scoring candidate.
///
/// Starts from the document element with a high score of zero and only
/// replaces it on a strictly greater score, so ties keep the earlier element
/// and a page where nothing scores above zero keeps the whole document.
/// Every candidate is reported to `sink`.
pub fn find_best_element(doc: &Document, config: &ScoreConfig, sink: &mut dyn AnnotationSink) -> BestElement {
    let mut best = BestElement { node: doc.root_element().node_id(), score: 0.0, from_candidate: false };

    let candidates = score_candidates(doc, config);
    if candidates.is_empty() {
        debug!("no content candidates, keeping the document element");
        return best;
    }

    for (position, candidate) in candidates.into_iter().enumerate() {
        let node = candidate.element.node_id();
        let score = candidate.score();
        trace!(position, tag = candidate.element.local_name(), score, "scored candidate");

        if score > best.score {
            best = BestElement { node, score, from_candidate: true };
        }

        sink.record(Annotation::Candidate { node, position, score: candidate.score_result });
    }

    debug!(score = best.score, from_candidate = best.from_candidate, "heuristic scoring finished");
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::Discard;

    fn best_of(html: &str) -> (Document, BestElement) {
        let doc = Document::parse(html).unwrap();
        let best = find_best_element(&doc, &ScoreConfig::default(), &mut Discard);
        (doc, best)
    }

    #[test]
    fn test_candidate_tags_only() {
        let html = r#"<html><body>
            <ul><li>Item</li></ul>
            <p>Paragraph</p>
            <div>Block</div>
            <span>Inline</span>
            <table><tr><td>Cell</td></tr></table>
            <section>Section</section>
            <main>Main</main>
            <layer>Legacy</layer>
        </body></html>"#;
        let doc = Document::parse(html).unwrap();
        let candidates = score_candidates(&doc, &ScoreConfig::default());

        let tags: Vec<_> = candidates.iter().map(|c| c.element.local_name()).collect();
        assert_eq!(tags, vec!["div", "span", "td", "section", "main", "layer"]);
    }

    #[test]
    fn test_highest_score_wins() {
        let long = "Sentence of article prose. ".repeat(40);
        let html = format!(
            r#"<html><body>
                <div id="side"><a href="/a">Related link one</a> <a href="/b">Related link two</a></div>
                <div id="story"><p>{long}</p><p>{long}</p></div>
            </body></html>"#
        );
        let (doc, best) = best_of(&html);

        assert!(best.from_candidate);
        assert_eq!(doc.element(best.node).unwrap().attr("id"), Some("story"));
    }

    #[test]
    fn test_ties_keep_first_candidate() {
        let html = r#"<html><body>
            <span id="first">same words</span>
            <span id="second">same words</span>
        </body></html>"#;
        let (doc, best) = best_of(html);

        assert_eq!(doc.element(best.node).unwrap().attr("id"), Some("first"));
    }

    #[test]
    fn test_nothing_positive_falls_back_to_root() {
        let html = r##"<html><body>
            <nav><div><a href="/1">Home</a><a href="/2">About</a></div></nav>
        </body></html>"##;
        let (doc, best) = best_of(html);

        assert!(!best.from_candidate);
        assert_eq!(best.node, doc.root_element().node_id());
        assert_eq!(best.score, 0.0);
    }

    #[test]
    fn test_missing_body_falls_back_to_root() {
        let (doc, best) = best_of("<html><head></head><frameset><frame src=\"a.html\"></frameset></html>");
        assert_eq!(best.node, doc.root_element().node_id());
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let html = r#"<html><body>
            <div class="content"><p>Some text for the article body.</p></div>
            <div class="ads">Buy</div>
        </body></html>"#;
        let doc = Document::parse(html).unwrap();
        let config = ScoreConfig::default();

        let mut first: Vec<Annotation> = Vec::new();
        let mut second: Vec<Annotation> = Vec::new();
        let a = find_best_element(&doc, &config, &mut first);
        let b = find_best_element(&doc, &config, &mut second);

        assert_eq!(a, b);
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_every_candidate_is_annotated_in_order() {
        let html = r#"<html><body><div id="a">x</div><p>skipped</p><span id="b">y</span></body></html>"#;
        let doc = Document::parse(html).unwrap();
        let mut sink: Vec<Annotation> = Vec::new();
        find_best_element(&doc, &ScoreConfig::default(), &mut sink);

        let positions: Vec<_> = sink
            .iter()
            .map(|a| match a {
                Annotation::Candidate { position, .. } => *position,
                _ => usize::MAX,
            })
            .collect();
        assert_eq!(positions, vec![0, 1]);
    }
}
