use crate::parse::Element;

/// Tunable weights for candidate scoring.
///
/// These are empirically chosen starting points, not derived constants.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreConfig {
    /// Word count an element must exceed to be accepted by a selector tier
    pub min_word_count: usize,
    /// Words per base-score point
    pub words_per_point: f64,
    /// Cap on the word-derived base score
    pub max_base_score: f64,
    /// Bonus per contained paragraph
    pub paragraph_bonus: f64,
    /// Links-per-word ratio above which the link penalty applies
    pub link_density_threshold: f64,
    /// Penalty subtracted from link-heavy candidates
    pub link_density_penalty: f64,
    /// Bonus for `<article>` candidates
    pub article_tag_bonus: f64,
    /// Bonus for `<main>` candidates
    pub main_tag_bonus: f64,
    /// Class/id contains "content"
    pub content_class_bonus: f64,
    /// Class/id contains "post" or "article"
    pub post_class_bonus: f64,
    /// Class/id contains "sidebar", "footer" or "header"
    pub chrome_class_penalty: f64,
    /// Class/id contains "nav"
    pub nav_class_penalty: f64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            min_word_count: 30,
            words_per_point: 10.0,
            max_base_score: 50.0,
            paragraph_bonus: 2.0,
            link_density_threshold: 0.3,
            link_density_penalty: 20.0,
            article_tag_bonus: 15.0,
            main_tag_bonus: 10.0,
            content_class_bonus: 10.0,
            post_class_bonus: 8.0,
            chrome_class_penalty: -10.0,
            nav_class_penalty: -15.0,
        }
    }
}

/// Result of scoring an element
#[derive(Debug, Clone)]
pub struct ScoreResult {
    /// The element's tag name
    pub tag_name: String,
    /// Words in the element's plain text
    pub word_count: usize,
    /// Number of contained `<p>` elements
    pub paragraph_count: usize,
    /// Number of contained `<a>` elements
    pub link_count: usize,
    /// Score from word count, capped
    pub base_score: f64,
    /// Bonus from the tag name
    pub tag_bonus: f64,
    /// Adjustment from class/id patterns
    pub class_weight: f64,
    /// Links per word
    pub link_density: f64,
    /// Final score, floored at zero
    pub final_score: f64,
}

/// Bonus for tags that usually wrap the main content.
pub fn tag_bonus(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    match element.tag_name().as_str() {
        "article" => config.article_tag_bonus,
        "main" => config.main_tag_bonus,
        _ => 0.0,
    }
}

/// Class/id heuristics. Each pattern group applies at most once.
pub fn class_id_weight(element: &Element<'_>, config: &ScoreConfig) -> f64 {
    let names = element.class_and_id();
    if names.trim().is_empty() {
        return 0.0;
    }

    let mut weight = 0.0;
    if names.contains("content") {
        weight += config.content_class_bonus;
    }
    if names.contains("post") || names.contains("article") {
        weight += config.post_class_bonus;
    }
    if names.contains("sidebar") || names.contains("footer") || names.contains("header") {
        weight += config.chrome_class_penalty;
    }
    if names.contains("nav") {
        weight += config.nav_class_penalty;
    }
    weight
}

/// Links per word: `link_count / max(word_count, 1)`.
pub fn link_density(link_count: usize, word_count: usize) -> f64 {
    link_count as f64 / word_count.max(1) as f64
}

/// Score a content candidate.
///
/// `min(words / 10, 50)`, plus 2 per paragraph, minus 20 when link density
/// exceeds 0.3, plus tag and class/id adjustments, floored at zero.
pub fn calculate_score(element: &Element<'_>, config: &ScoreConfig) -> ScoreResult {
    let tag_name = element.tag_name();
    let word_count = element.word_count();
    let paragraph_count = element.count("p");
    let link_count = element.count("a");

    let base_score = (word_count as f64 / config.words_per_point).min(config.max_base_score);
    let ld = link_density(link_count, word_count);
    let tag_bonus = tag_bonus(element, config);
    let class_weight = class_id_weight(element, config);

    let mut score = base_score + paragraph_count as f64 * config.paragraph_bonus;
    if ld > config.link_density_threshold {
        score -= config.link_density_penalty;
    }
    score += tag_bonus + class_weight;

    ScoreResult {
        tag_name,
        word_count,
        paragraph_count,
        link_count,
        base_score,
        tag_bonus,
        class_weight,
        link_density: ld,
        final_score: score.max(0.0),
    }
}
