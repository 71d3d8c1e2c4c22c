//! ContentExtractor: article body text through a cascading chain of guesses.
//!
//! The chain is an ordered list of pure probes, each `Document -> ProbeResult`:
//!
//! | Tier | Probe | Source of the selector |
//! |------|-------|------------------------|
//! | 1 | element with the known body id | `content_id` |
//! | 2 | historical container selectors, in priority order | `content_selectors` |
//! | 3 | generic `<article>` | fixed |
//! | 4 | any element whose class contains a hint substring | `content_class_hints` |
//!
//! A probe only matches an element with non-empty visible text. The first
//! match stops the chain; later tiers are never consulted. When a redesign
//! breaks extraction, a new selector is appended to tier 2 and the old ones
//! stay, since older article pages keep their older markup.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::{debug, instrument, warn};

use crate::config::SiteRules;
use crate::error::ExtractError;
use crate::utils::collapse_whitespace;

static ARTICLE: Lazy<Selector> = Lazy::new(|| Selector::parse("article").unwrap());
static WITH_CLASS: Lazy<Selector> = Lazy::new(|| Selector::parse("[class]").unwrap());

/// Elements whose text never counts as article body.
const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that separate words in rendered text.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "main", "nav",
    "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Too broad to ever be the body container, whatever their class says.
const DOCUMENT_TAGS: &[&str] = &["html", "body"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    ContentId = 1,
    KnownSelector = 2,
    ArticleTag = 3,
    ClassHint = 4,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::ContentId => "content_id",
            Tier::KnownSelector => "known_selector",
            Tier::ArticleTag => "article_tag",
            Tier::ClassHint => "class_hint",
        };
        write!(f, "{} ({name})", *self as u8)
    }
}

#[derive(Debug)]
pub enum ProbeResult<'a> {
    Matched { element: ElementRef<'a>, text: String },
    NoMatch,
}

type Probe = for<'a> fn(&'a Html, &SiteRules) -> ProbeResult<'a>;

const CHAIN: [(Tier, Probe); 4] = [
    (Tier::ContentId, probe_content_id),
    (Tier::KnownSelector, probe_known_selectors),
    (Tier::ArticleTag, probe_article_tag),
    (Tier::ClassHint, probe_class_hints),
];

/// Body text and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub tier: Tier,
    pub text: String,
}

/// Run the chain against an article page.
///
/// # Errors
///
/// [`ExtractError::ContentNotFound`] carrying `url` when every tier misses.
#[instrument(level = "info", skip(doc, rules))]
pub fn extract_content(doc: &Html, rules: &SiteRules, url: &str) -> Result<Extraction, ExtractError> {
    for (tier, probe) in CHAIN {
        match probe(doc, rules) {
            ProbeResult::Matched { element, text } => {
                debug!(%tier, tag = element.value().name(), chars = text.chars().count(), "Content tier matched");
                return Ok(Extraction { tier, text });
            }
            ProbeResult::NoMatch => debug!(%tier, "Content tier missed"),
        }
    }
    warn!(%url, "Every content tier missed");
    Err(ExtractError::ContentNotFound {
        url: url.to_string(),
    })
}

pub fn probe_content_id<'a>(doc: &'a Html, rules: &SiteRules) -> ProbeResult<'a> {
    match &rules.content_id {
        Some(selector) => first_with_text(doc.select(selector)),
        None => ProbeResult::NoMatch,
    }
}

pub fn probe_known_selectors<'a>(doc: &'a Html, rules: &SiteRules) -> ProbeResult<'a> {
    for selector in &rules.content_selectors {
        if let hit @ ProbeResult::Matched { .. } = first_with_text(doc.select(selector)) {
            return hit;
        }
    }
    ProbeResult::NoMatch
}

pub fn probe_article_tag<'a>(doc: &'a Html, _rules: &SiteRules) -> ProbeResult<'a> {
    first_with_text(doc.select(&ARTICLE))
}

pub fn probe_class_hints<'a>(doc: &'a Html, rules: &SiteRules) -> ProbeResult<'a> {
    if rules.content_class_hints.is_empty() {
        return ProbeResult::NoMatch;
    }
    let hinted = doc.select(&WITH_CLASS).filter(|el| {
        if DOCUMENT_TAGS.contains(&el.value().name()) {
            return false;
        }
        let class = el.value().attr("class").unwrap_or_default().to_lowercase();
        rules.content_class_hints.iter().any(|hint| class.contains(hint.as_str()))
    });
    first_with_text(hinted)
}

fn first_with_text<'a>(mut elements: impl Iterator<Item = ElementRef<'a>>) -> ProbeResult<'a> {
    elements
        .find_map(|element| {
            let text = visible_text(element);
            (!text.is_empty()).then_some(ProbeResult::Matched { element, text })
        })
        .unwrap_or(ProbeResult::NoMatch)
}

/// Whitespace-collapsed text of `el`, skipping script and style content.
///
/// Text nodes are concatenated as they appear, so inline markup inside a
/// word (`<b>패션비즈</b>는`) does not split it. A space is inserted only
/// where a block element starts or ends.
pub fn visible_text(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        if node.value().as_element().is_some_and(|e| is_block(e.name())) {
            out.push(' ');
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|e| HIDDEN_TAGS.contains(&e.name()))
        });
        if hidden {
            continue;
        }
        let after_block = node
            .prev_sibling()
            .and_then(|prev| prev.value().as_element().map(|e| is_block(e.name())))
            .unwrap_or(false);
        if after_block {
            out.push(' ');
        }
        out.push_str(text);
    }
    collapse_whitespace(&out)
}

fn is_block(name: &str) -> bool {
    BLOCK_TAGS.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteProfile;

    const URL: &str = "https://www.fashionbiz.co.kr/news/articleView.html?idxno=1";

    fn rules() -> SiteRules {
        SiteProfile::default().compile().unwrap()
    }

    fn extract(html: &str) -> Result<Extraction, ExtractError> {
        extract_content(&Html::parse_document(html), &rules(), URL)
    }

    #[test]
    fn test_tier_one_content_id() {
        let got = extract(
            r#"<div id="article-view-content-div"> First  paragraph.
                <p>Second</p></div><article>ignored</article>"#,
        )
        .unwrap();
        assert_eq!(got.tier, Tier::ContentId);
        assert_eq!(got.text, "First paragraph. Second");
    }

    #[test]
    fn test_tier_two_respects_priority_order() {
        // div.article_view comes after div.view_txt in the profile
        let got = extract(
            r#"<div class="article_view">later rule</div><div class="view_txt">earlier rule</div>"#,
        )
        .unwrap();
        assert_eq!(got.tier, Tier::KnownSelector);
        assert_eq!(got.text, "earlier rule");
    }

    #[test]
    fn test_tier_two_beats_later_tiers() {
        let got = extract(
            r#"<article>generic</article>
               <div class="main-content">hinted</div>
               <div class="news_view">known</div>"#,
        )
        .unwrap();
        assert_eq!(got.tier, Tier::KnownSelector);
        assert_eq!(got.text, "known");
    }

    #[test]
    fn test_tier_three_article_tag() {
        let got = extract(r#"<div class="page-content">hint</div><article> Story text </article>"#).unwrap();
        assert_eq!(got.tier, Tier::ArticleTag);
        assert_eq!(got.text, "Story text");
    }

    #[test]
    fn test_tier_four_class_hint() {
        let got = extract(
            "<div class=\"sc-a1b2\"><div class=\"extra-content-wrapper\">\n  Body   text\n here </div></div>",
        )
        .unwrap();
        assert_eq!(got.tier, Tier::ClassHint);
        assert_eq!(got.text, "Body text here");
    }

    #[test]
    fn test_tier_four_matches_body_hint_case_insensitively() {
        let got = extract(r#"<section class="Post-Body">Hello</section>"#).unwrap();
        assert_eq!(got.tier, Tier::ClassHint);
        assert_eq!(got.text, "Hello");
    }

    #[test]
    fn test_empty_match_falls_through() {
        let got = extract(r#"<div id="article-view-content-div">  </div><article>Filled</article>"#).unwrap();
        assert_eq!(got.tier, Tier::ArticleTag);
    }

    #[test]
    fn test_script_and_style_text_ignored() {
        let got = extract(
            r#"<article><script>var x = 1;</script><style>.a{}</style><p>Visible</p></article>"#,
        )
        .unwrap();
        assert_eq!(got.text, "Visible");
    }

    #[test]
    fn test_inline_markup_does_not_split_words() {
        let got = extract(
            r#"<article><p><b>패션비즈</b>는 <a href="/x">Fashion</a>Biz와 e<i>x</i>tra</p></article>"#,
        )
        .unwrap();
        assert_eq!(got.text, "패션비즈는 FashionBiz와 extra");
    }

    #[test]
    fn test_block_boundaries_separate_words() {
        let got = extract(
            r#"<article><p>One</p><p>Two</p>Three<br>Four<ul><li>Five</li><li>Six</li></ul></article>"#,
        )
        .unwrap();
        assert_eq!(got.text, "One Two Three Four Five Six");
    }

    #[test]
    fn test_body_class_does_not_count() {
        let err = extract(r#"<html><body class="content-page"><p>nav only</p></body></html>"#).unwrap_err();
        assert!(matches!(err, ExtractError::ContentNotFound { .. }));
    }

    #[test]
    fn test_content_not_found_carries_url() {
        let err = extract("<div class=\"sidebar\">links</div>").unwrap_err();
        assert_eq!(err.url(), URL);
    }

    #[test]
    fn test_each_probe_is_independent() {
        let doc = Html::parse_document(r#"<article>a</article><div class="content">b</div>"#);
        let rules = rules();
        assert!(matches!(probe_content_id(&doc, &rules), ProbeResult::NoMatch));
        assert!(matches!(probe_known_selectors(&doc, &rules), ProbeResult::NoMatch));
        assert!(matches!(probe_article_tag(&doc, &rules), ProbeResult::Matched { .. }));
        match probe_class_hints(&doc, &rules) {
            ProbeResult::Matched { text, .. } => assert_eq!(text, "b"),
            ProbeResult::NoMatch => panic!("class hint probe should match"),
        }
    }

    #[test]
    fn test_tier_display() {
        assert_eq!(Tier::ClassHint.to_string(), "4 (class_hint)");
    }
}
