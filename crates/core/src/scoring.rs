//! Bias computations for boilerplate scoring.
//!
//! A candidate's score is the plain sum of independent biases, each an
//! empirically tuned number of points:
//!
//! - text density: long runs of non-link text
//! - list and navigation ancestry penalties
//! - immediate child composition ("ancestor bias")
//! - immediate child images
//! - tokens found in the `id`, `name` and `class` attributes
//!
//! The weights live in [`ScoreConfig`] and in the static tables
//! [`tag_bias`], [`token_weight`] and [`IMAGE_AREA_BIASES`]. They are kept
//! verbatim; there is no derivation behind them beyond tuning on real pages.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use scraper::Selector;
use serde::Serialize;

use crate::parse::Element;

/// Scalar weights for the scoring algorithm.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreConfig {
    /// Points per character of condensed text
    pub text_weight: f64,
    /// Points removed per character of link text
    pub anchor_weight: f64,
    /// Added when the candidate sits inside (or is) a list element
    pub list_penalty: f64,
    /// Added when the candidate sits inside (or is) a navigation element
    pub nav_penalty: f64,
    /// Added once per child image beyond the first
    pub carousel_penalty: f64,
    /// Bonus for an image with an `alt` attribute
    pub image_alt_bias: f64,
    /// Bonus for an image with a `title` attribute
    pub image_title_bias: f64,
    /// Bonus for an image inside a captioned figure
    pub image_caption_bias: f64,
    /// Area bias for an image with a known area below every bucket
    pub small_image_bias: f64,
    /// Attribute strings shorter than this contribute nothing
    pub min_attribute_len: usize,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            text_weight: 0.25,
            anchor_weight: 0.7,
            list_penalty: -200.0,
            nav_penalty: -500.0,
            carousel_penalty: -50.0,
            image_alt_bias: 20.0,
            image_title_bias: 30.0,
            image_caption_bias: 100.0,
            small_image_bias: -10.0,
            min_attribute_len: 3,
        }
    }
}

/// Result of scoring an element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// The element's tag name
    pub tag_name: String,
    /// The element's class attribute (if present)
    pub class: Option<String>,
    /// The element's id attribute (if present)
    pub id: Option<String>,
    /// Text length reward minus link text penalty
    pub text_bias: f64,
    /// List ancestry penalty (0 or `list_penalty`)
    pub list_penalty: f64,
    /// Navigation ancestry penalty (0 or `nav_penalty`)
    pub nav_penalty: f64,
    /// Sum of tag biases over immediate children
    pub ancestor_bias: f64,
    /// Bias from immediate child images
    pub image_bias: f64,
    /// Bias from id/name/class tokens
    pub attribute_bias: f64,
    /// Final calculated score
    pub final_score: f64,
}

/// Image area buckets, largest first: an area strictly above the threshold
/// earns the bias.
pub const IMAGE_AREA_BIASES: &[(u64, f64)] = &[(100_000, 500.0), (50_000, 300.0), (20_000, 50.0)];

static LIST_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li, ol, ul, dd, dl, dt").expect("list selector is valid"));

static NAV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("aside, header, footer, nav, menu, menuitem").expect("nav selector is valid"));

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

static FIGURE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figure").expect("figure selector is valid"));

static FIGCAPTION_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("figcaption").expect("figcaption selector is valid"));

static TOKEN_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-_0-9]+").expect("token pattern is valid"));

/// Bias contributed by an immediate child with the given tag name.
///
/// Paragraph-like children suggest content; wrappers, lists and navigation
/// suggest chrome.
pub fn tag_bias(tag_name: &str) -> f64 {
    match tag_name {
        "a" => -5.0,
        "aside" => -50.0,
        "blockquote" => 20.0,
        "br" => 3.0,
        "div" => -50.0,
        "figure" => 20.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => 10.0,
        "nav" => -100.0,
        "ol" => -20.0,
        "p" => 10.0,
        "pre" => 10.0,
        "section" => -20.0,
        "ul" => -20.0,
        _ => 0.0,
    }
}

/// Weight of a single lowercase attribute token.
pub fn token_weight(token: &str) -> f64 {
    match token {
        "ad" | "ads" | "advert" => -500.0,
        "article" => 500.0,
        "body" => 500.0,
        "comment" => -500.0,
        "content" => 500.0,
        "contentpane" => 500.0,
        "gutter" => -300.0,
        "left" => -50.0,
        "main" => 500.0,
        "meta" => -50.0,
        "nav" | "navbar" => -200.0,
        "newsarticle" => 500.0,
        "page" => 200.0,
        "post" => 300.0,
        "promo" => -100.0,
        "rail" => -300.0,
        "rel" => -50.0,
        "relate" | "related" => -500.0,
        "right" => -50.0,
        "social" => -200.0,
        "story" => 100.0,
        "storytxt" => 500.0,
        "tool" | "tools" => -200.0,
        "widget" => -200.0,
        "zone" => -500.0,
        _ => 0.0,
    }
}

/// Total condensed text length of the `<a href>` descendants.
pub fn anchor_text_length(element: &Element<'_>) -> usize {
    element
        .select_with(&ANCHOR_SELECTOR)
        .map(|anchor| anchor.condensed_text_len())
        .sum()
}

/// Rewards long text and penalizes link text.
///
/// Follows the shallow text feature observation that article blocks are long
/// and link-sparse while navigation blocks are short and link-dense.
pub fn text_bias(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let text_len = element.condensed_text_len() as f64;
    let anchor_len = anchor_text_length(element) as f64;
    config.text_weight * text_len - config.anchor_weight * anchor_len
}

/// `list_penalty` if the element is, or sits inside, a list element.
pub fn list_penalty(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    if element.closest(&LIST_SELECTOR).is_some() { config.list_penalty } else { 0.0 }
}

/// `nav_penalty` if the element is, or sits inside, a navigation element.
pub fn nav_penalty(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    if element.closest(&NAV_SELECTOR).is_some() { config.nav_penalty } else { 0.0 }
}

/// Raw sum of [`tag_bias`] over the immediate child elements.
pub fn ancestor_bias(element: &Element<'_>) -> f64 {
    element
        .child_elements()
        .map(|child| tag_bias(child.local_name()))
        .sum()
}

/// Parses a dimension attribute the way HTML parses non-negative integers:
/// leading whitespace is skipped and parsing stops at the first non-digit.
fn parse_dimension(value: &str) -> Option<u64> {
    let trimmed = value.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let digits = &trimmed[..end];
    if digits.is_empty() {
        return None;
    }
    // A digit run only fails to parse on overflow.
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Declared pixel area of an image, if both dimensions are usable.
pub fn image_area(image: &Element<'_>) -> Option<u64> {
    let width = image.attr("width").and_then(parse_dimension)?;
    let height = image.attr("height").and_then(parse_dimension)?;
    let area = width.saturating_mul(height);
    (area > 0).then_some(area)
}

/// Bias for an image area; unknown areas contribute nothing.
pub fn image_area_bias(area: Option<u64>, config: &ScoreConfig) -> f64 {
    let Some(area) = area else {
        return 0.0;
    };

    IMAGE_AREA_BIASES
        .iter()
        .find(|(threshold, _)| area > *threshold)
        .map_or(config.small_image_bias, |(_, bias)| *bias)
}

/// Whether the image sits in a figure that carries a caption.
pub fn has_caption(image: &Element<'_>) -> bool {
    image
        .closest(&FIGURE_SELECTOR)
        .is_some_and(|figure| figure.select_with(&FIGCAPTION_SELECTOR).next().is_some())
}

fn single_image_bias(image: &Element<'_>, config: &ScoreConfig) -> f64 {
    let mut bias = image_area_bias(image_area(image), config);
    if image.has_attr("alt") {
        bias += config.image_alt_bias;
    }
    if image.has_attr("title") {
        bias += config.image_title_bias;
    }
    if has_caption(image) {
        bias += config.image_caption_bias;
    }
    bias
}

/// Bias from the element's immediate `<img>` children.
///
/// Every image beyond the first adds `carousel_penalty`: galleries are rarely
/// the article itself.
pub fn image_bias(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let (count, bias) = element
        .child_elements()
        .filter(|child| child.local_name() == "img")
        .fold((0usize, 0.0), |(count, bias), image| (count + 1, bias + single_image_bias(&image, config)));

    if count > 1 { bias + config.carousel_penalty * (count - 1) as f64 } else { bias }
}

/// Distinct lowercase tokens of the element's `id`, `name` and `class`.
///
/// Returns an empty set when the combined attribute string is shorter than
/// `min_attribute_len` characters.
pub fn attribute_tokens(element: &Element<'_>, config: &ScoreConfig) -> HashSet<String> {
    let combined = ["id", "name", "class"]
        .iter()
        .filter_map(|name| element.attr(name))
        .collect::<Vec<_>>()
        .join(" ");

    if combined.chars().count() < config.min_attribute_len {
        return HashSet::new();
    }

    TOKEN_SPLIT
        .split(&combined.to_lowercase())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Sum of [`token_weight`] over the distinct attribute tokens.
pub fn attribute_bias(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    attribute_tokens(element, config)
        .iter()
        .map(|token| token_weight(token))
        .sum()
}

/// Calculate the final score for an element
///
/// The final score is the sum of every bias; nothing is normalized.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> ScoreResult {
    let text_bias = text_bias(element, config);
    let list_penalty = list_penalty(element, config);
    let nav_penalty = nav_penalty(element, config);
    let ancestor_bias = ancestor_bias(element);
    let image_bias = image_bias(element, config);
    let attribute_bias = attribute_bias(element, config);

    let final_score = text_bias + list_penalty + nav_penalty + ancestor_bias + image_bias + attribute_bias;

    ScoreResult {
        tag_name: element.tag_name(),
        class: element.attr("class").map(|s| s.to_string()),
        id: element.attr("id").map(|s| s.to_string()),
        text_bias,
        list_penalty,
        nav_penalty,
        ancestor_bias,
        image_bias,
        attribute_bias,
        final_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Document;
    use rstest::rstest;

    fn first<'a>(doc: &'a Document, selector: &str) -> Element<'a> {
        doc.select(selector).unwrap().into_iter().next().unwrap()
    }

    #[rstest]
    #[case("a", -5.0)]
    #[case("aside", -50.0)]
    #[case("blockquote", 20.0)]
    #[case("br", 3.0)]
    #[case("div", -50.0)]
    #[case("figure", 20.0)]
    #[case("h1", 10.0)]
    #[case("h6", 10.0)]
    #[case("nav", -100.0)]
    #[case("ol", -20.0)]
    #[case("p", 10.0)]
    #[case("pre", 10.0)]
    #[case("section", -20.0)]
    #[case("ul", -20.0)]
    #[case("span", 0.0)]
    fn test_tag_bias_table(#[case] tag: &str, #[case] expected: f64) {
        assert_eq!(tag_bias(tag), expected);
    }

    #[rstest]
    #[case("article", 500.0)]
    #[case("newsarticle", 500.0)]
    #[case("storytxt", 500.0)]
    #[case("post", 300.0)]
    #[case("page", 200.0)]
    #[case("story", 100.0)]
    #[case("ads", -500.0)]
    #[case("comment", -500.0)]
    #[case("gutter", -300.0)]
    #[case("widget", -200.0)]
    #[case("meta", -50.0)]
    #[case("wrapper", 0.0)]
    fn test_token_weight_table(#[case] token: &str, #[case] expected: f64) {
        assert_eq!(token_weight(token), expected);
    }

    #[test]
    fn test_text_bias_plain_text() {
        let text = "a".repeat(400);
        let html = format!("<div>{}</div>", text);
        let doc = Document::parse(&html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(text_bias(&element, &ScoreConfig::default()), 100.0);
    }

    #[test]
    fn test_text_bias_collapses_whitespace() {
        let doc = Document::parse("<div>  four   word \n\n text  here </div>").unwrap();
        let element = first(&doc, "div");
        // "four word text here" is 19 characters
        assert_eq!(text_bias(&element, &ScoreConfig::default()), 19.0 * 0.25);
    }

    #[test]
    fn test_text_bias_penalizes_links() {
        let html = r##"<div>0123456789<a href="#">0123456789</a></div>"##;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        let expected = 0.25 * 20.0 - 0.7 * 10.0;
        assert!((text_bias(&element, &ScoreConfig::default()) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_anchor_without_href_is_not_link_text() {
        let html = r##"<div><a name="top">anchor text</a><a href="/x">link</a></div>"##;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(anchor_text_length(&element), 4);
    }

    #[test]
    fn test_list_and_nav_penalties_stack() {
        let html = r#"<nav><ul><li><div id="x">Menu</div></li></ul></nav><div id="y">Body</div>"#;
        let doc = Document::parse(html).unwrap();
        let config = ScoreConfig::default();

        let inside = first(&doc, "#x");
        assert_eq!(list_penalty(&inside, &config), -200.0);
        assert_eq!(nav_penalty(&inside, &config), -500.0);

        let outside = first(&doc, "#y");
        assert_eq!(list_penalty(&outside, &config), 0.0);
        assert_eq!(nav_penalty(&outside, &config), 0.0);
    }

    #[test]
    fn test_ancestor_bias_counts_immediate_children_only() {
        let html = r#"<div id="c"><p>a</p><p>b</p><h2>t</h2><div><p>nested</p></div></div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "#c");
        assert_eq!(ancestor_bias(&element), 10.0 + 10.0 + 10.0 - 50.0);
    }

    #[rstest]
    #[case(Some(400 * 300), 500.0)]
    #[case(Some(300 * 200), 300.0)]
    #[case(Some(200 * 150), 50.0)]
    #[case(Some(100 * 100), -10.0)]
    #[case(Some(100_000), 300.0)]
    #[case(None, 0.0)]
    fn test_image_area_buckets(#[case] area: Option<u64>, #[case] expected: f64) {
        assert_eq!(image_area_bias(area, &ScoreConfig::default()), expected);
    }

    #[rstest]
    #[case(r#"<img width="300" height="200">"#, Some(60_000))]
    #[case(r#"<img width="300px" height=" 200">"#, Some(60_000))]
    #[case(r#"<img width="wide" height="200">"#, None)]
    #[case(r#"<img width="300">"#, None)]
    #[case(r#"<img width="0" height="200">"#, None)]
    #[case(r#"<img width="5000000000" height="5000000000">"#, Some(u64::MAX))]
    #[case(r#"<img width="99999999999999999999" height="10">"#, Some(u64::MAX))]
    fn test_image_area_parsing(#[case] html: &str, #[case] expected: Option<u64>) {
        let doc = Document::parse(html).unwrap();
        let image = first(&doc, "img");
        assert_eq!(image_area(&image), expected);
    }

    #[test]
    fn test_image_bias_carousel_penalty() {
        let html = r#"<div><img alt="1"><img alt="2"><img alt="3"></div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(image_bias(&element, &ScoreConfig::default()), 20.0 * 3.0 - 50.0 * 2.0);
    }

    #[test]
    fn test_image_bias_single_large_captioned_image() {
        let html = r#"<figure><div><img src="a.jpg" width="500" height="400" alt="x" title="y"></div>
            <figcaption>Caption</figcaption></figure>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(image_bias(&element, &ScoreConfig::default()), 500.0 + 20.0 + 30.0 + 100.0);
    }

    #[test]
    fn test_image_bias_huge_declared_size_is_large() {
        let html = r#"<div><img width="5000000000" height="5000000000" alt="x"></div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(image_bias(&element, &ScoreConfig::default()), 500.0 + 20.0);
    }

    #[test]
    fn test_image_bias_ignores_nested_images() {
        let html = r#"<div><p><img alt="deep"></p></div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(image_bias(&element, &ScoreConfig::default()), 0.0);
    }

    #[test]
    fn test_figure_without_caption() {
        let html = r#"<figure><img alt="x"></figure>"#;
        let doc = Document::parse(html).unwrap();
        assert!(!has_caption(&first(&doc, "img")));
    }

    #[test]
    fn test_attribute_bias_positive_tokens() {
        let html = r#"<article class="article-content">Text</article>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "article");
        assert_eq!(attribute_bias(&element, &ScoreConfig::default()), 1000.0);
    }

    #[test]
    fn test_attribute_bias_counts_duplicate_tokens_once() {
        let html = r#"<div id="ad" class="ad ad_box ad-2">Text</div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(attribute_bias(&element, &ScoreConfig::default()), -500.0);
    }

    #[test]
    fn test_attribute_bias_splits_on_digits_and_case() {
        let html = r#"<div id="Main2Content" name="x">Text</div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        let tokens = attribute_tokens(&element, &ScoreConfig::default());
        assert!(tokens.contains("main"));
        assert!(tokens.contains("content"));
        assert!(tokens.contains("x"));
        assert_eq!(attribute_bias(&element, &ScoreConfig::default()), 1000.0);
    }

    #[test]
    fn test_attribute_bias_short_string_ignored() {
        let html = r#"<div id="ad">Text</div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        assert_eq!(attribute_bias(&element, &ScoreConfig::default()), 0.0);
    }

    #[test]
    fn test_attribute_bias_missing_attributes() {
        let doc = Document::parse("<div>Text</div>").unwrap();
        let element = first(&doc, "div");
        assert_eq!(attribute_bias(&element, &ScoreConfig::default()), 0.0);
    }

    #[test]
    fn test_calculate_score_combined() {
        let html = r##"<article class="main-content" id="post">
            <p>This is a long piece of text that should score well.</p>
            <p>Another paragraph of prose with a <a href="/more">small link</a> inside.</p>
            <img alt="photo">
        </article>"##;

        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "article");
        let config = ScoreConfig::default();
        let result = calculate_score(&element, &config);

        assert_eq!(result.tag_name, "article");
        assert_eq!(result.class, Some("main-content".to_string()));
        assert_eq!(result.id, Some("post".to_string()));
        assert_eq!(result.ancestor_bias, 20.0);
        assert_eq!(result.image_bias, 20.0);
        assert_eq!(result.attribute_bias, 1300.0);
        assert_eq!(result.list_penalty, 0.0);
        assert_eq!(result.nav_penalty, 0.0);

        let sum = result.text_bias
            + result.list_penalty
            + result.nav_penalty
            + result.ancestor_bias
            + result.image_bias
            + result.attribute_bias;
        assert!((result.final_score - sum).abs() < 1e-9);
    }

    #[test]
    fn test_calculate_score_nav_penalized() {
        let html = r##"<nav><div class="menu">
            <a href="/1">Link 1</a>
            <a href="/2">Link 2</a>
            <a href="/3">Link 3</a>
        </div></nav>"##;

        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        let result = calculate_score(&element, &ScoreConfig::default());

        assert_eq!(result.nav_penalty, -500.0);
        assert!(result.text_bias < 0.0);
        assert!(result.final_score < -500.0);
    }

    #[test]
    fn test_calculate_score_is_repeatable() {
        let html = r#"<div class="story"><p>Some words here.</p><img alt="a" width="10" height="10"></div>"#;
        let doc = Document::parse(html).unwrap();
        let element = first(&doc, "div");
        let config = ScoreConfig::default();
        assert_eq!(calculate_score(&element, &config), calculate_score(&element, &config));
    }
}
