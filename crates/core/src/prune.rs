//! Subtree pruning around the chosen content root.

use std::collections::HashSet;

use ego_tree::NodeId;
use tracing::debug;

use crate::parse::Document;

/// Detaches every body element that is neither an ancestor nor an inclusive
/// descendant of `best`. Returns the number of elements detached.
///
/// The body's elements are collected once, in document order. A parent is
/// always visited before its children, so once it is detached its whole
/// subtree is gone and the attachment check skips the rest of it.
///
/// Nothing is removed when `best` is the document element or the body, or
/// when the document has no body.
///
/// # Panics
///
/// Panics if `best` does not name an element attached to `doc`. That is a
/// caller bug, not bad input.
pub fn prune(doc: &mut Document, best: NodeId) -> usize {
    let best_element = doc.element(best).expect("best element must belong to the document");
    assert!(doc.is_attached(best), "best element must be attached to the document");

    if best == doc.root_element().node_id() {
        return 0;
    }
    let Some(body) = doc.body() else {
        return 0;
    };
    if best == body.node_id() {
        return 0;
    }

    let ancestors: HashSet<NodeId> = best_element.ancestors().map(|el| el.node_id()).collect();
    let elements: Vec<NodeId> = body.descendant_elements().map(|el| el.node_id()).collect();

    let mut removed = 0;
    for id in elements {
        if ancestors.contains(&id) || is_inclusive_descendant(doc, id, best) || !doc.is_attached(id) {
            continue;
        }
        doc.detach(id);
        removed += 1;
    }

    debug!(removed, "pruned elements outside the content root");
    removed
}

fn is_inclusive_descendant(doc: &Document, id: NodeId, ancestor: NodeId) -> bool {
    id == ancestor
        || doc
            .element(id)
            .is_some_and(|el| el.ancestors().any(|a| a.node_id() == ancestor))
}
