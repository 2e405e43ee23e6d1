pub mod annotate;
pub mod error;
pub mod extract;
pub mod filter;
pub mod input;
pub mod parse;
pub mod prune;
pub mod report;
pub mod scoring;
pub mod signature;

pub use annotate::{Annotation, AnnotationSink, Discard};
pub use ego_tree::NodeId;
pub use error::{Result, UnclutterError};
#[doc(hidden)]
pub use extract::{BestElement, CANDIDATE_TAGS, Candidate, find_best_element, score_candidates};
pub use filter::{
    BoilerplateFilter, FilterConfig, FilterConfigBuilder, Outcome, Strategy, remove_boilerplate,
    remove_boilerplate_html,
};
pub use input::{Source, read_file, read_stdin, write_file};
pub use parse::{Document, Element};
pub use prune::prune;
pub use report::Report;
#[doc(hidden)]
pub use scoring::{
    IMAGE_AREA_BIASES, ScoreConfig, ScoreResult, ancestor_bias, anchor_text_length, attribute_bias, calculate_score,
    image_bias, list_penalty, nav_penalty, tag_bias, text_bias, token_weight,
};
pub use signature::{CONTENT_SIGNATURES, SignatureMatch, SignatureMatcher};
