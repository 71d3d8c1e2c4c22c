//! CandidateFilter: reduce a section's anchors to article links.
//!
//! Two explicit steps, each usable on its own:
//!
//! 1. [`collect_anchors`]: every descendant `<a>` with a non-empty `href`
//! 2. [`retain_article_shaped`]: keep only hrefs matching the article pattern
//!
//! [`filter_candidates`] composes them and, when step 2 leaves nothing, falls
//! back to the full step-1 set. A located section with some links is never
//! reported as having none.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};
use tracing::{debug, instrument, warn};

use crate::extract::link::normalize_link;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// A hyperlink provisionally treated as pointing to an article.
#[derive(Debug, Clone)]
pub struct ArticleCandidate<'a> {
    pub anchor: ElementRef<'a>,
    /// The trimmed `href`, as written in the markup.
    pub href: String,
}

impl ArticleCandidate<'_> {
    /// The candidate's absolute URL against `base_origin`.
    pub fn absolute_url(&self, base_origin: &str) -> String {
        normalize_link(&self.href, base_origin)
    }
}

/// Every descendant anchor of `container` carrying a non-empty `href`, in document order.
pub fn collect_anchors<'a>(container: ElementRef<'a>) -> Vec<ArticleCandidate<'a>> {
    container
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() {
                None
            } else {
                Some(ArticleCandidate {
                    anchor,
                    href: href.to_string(),
                })
            }
        })
        .collect()
}

/// Keep only the candidates whose href matches the article-URL pattern.
pub fn retain_article_shaped<'a>(
    anchors: &[ArticleCandidate<'a>],
    pattern: &Regex,
) -> Vec<ArticleCandidate<'a>> {
    anchors
        .iter()
        .filter(|c| pattern.is_match(&c.href))
        .cloned()
        .collect()
}

/// Article candidates in `container`, first element being the latest article.
#[instrument(level = "debug", skip_all)]
pub fn filter_candidates<'a>(container: ElementRef<'a>, pattern: &Regex) -> Vec<ArticleCandidate<'a>> {
    let anchors = collect_anchors(container);
    let shaped = retain_article_shaped(&anchors, pattern);

    if shaped.is_empty() && !anchors.is_empty() {
        warn!(
            anchors = anchors.len(),
            pattern = %pattern,
            "No anchor matched the article pattern; falling back to all anchors"
        );
        return anchors;
    }

    debug!(anchors = anchors.len(), matched = shaped.len(), "Filtered article candidates");
    shaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::section::locate_section;
    use scraper::Html;

    fn article_pattern() -> Regex {
        Regex::new("articleView").unwrap()
    }

    fn root(doc: &Html) -> ElementRef<'_> {
        doc.root_element()
    }

    #[test]
    fn test_single_article_link_in_section() {
        let doc = Html::parse_document(
            r#"<h3>최신 기사</h3><div><a href="/news/articleView.html?idxno=1"><p class="tit">Title A</p></a></div>"#,
        );
        let section = locate_section(&doc, "최신 기사").unwrap();
        let candidates = filter_candidates(section, &article_pattern());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].href, "/news/articleView.html?idxno=1");
    }

    #[test]
    fn test_pattern_drops_non_article_links_and_keeps_order() {
        let doc = Html::parse_document(
            r#"<div>
                <a href="/news/list.html">전체보기</a>
                <a href="/news/articleView.html?idxno=9">newest</a>
                <a href="https://ads.example.com/x">ad</a>
                <a href="/news/articleView.html?idxno=8">older</a>
            </div>"#,
        );
        let candidates = filter_candidates(root(&doc), &article_pattern());
        let hrefs: Vec<_> = candidates.iter().map(|c| c.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec!["/news/articleView.html?idxno=9", "/news/articleView.html?idxno=8"]
        );
    }

    #[test]
    fn test_falls_back_to_all_anchors_when_pattern_matches_none() {
        let doc = Html::parse_document(
            r#"<ul><li><a href="/story/123">a</a></li><li><a href="/story/122">b</a></li></ul>"#,
        );
        let candidates = filter_candidates(root(&doc), &article_pattern());
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].href, "/story/123");
    }

    #[test]
    fn test_blank_and_missing_hrefs_are_ignored() {
        let doc = Html::parse_document(r#"<div><a>no href</a><a href="  ">blank</a><a href=" /x ">x</a></div>"#);
        let anchors = collect_anchors(root(&doc));
        assert_eq!(anchors.len(), 1);
        assert_eq!(anchors[0].href, "/x");
    }

    #[test]
    fn test_no_anchors_is_empty() {
        let doc = Html::parse_document("<div><p>nothing to see</p></div>");
        assert!(filter_candidates(root(&doc), &article_pattern()).is_empty());
    }

    #[test]
    fn test_retain_step_alone_may_be_empty() {
        let doc = Html::parse_document(r#"<div><a href="/story/1">a</a></div>"#);
        let anchors = collect_anchors(root(&doc));
        assert!(retain_article_shaped(&anchors, &article_pattern()).is_empty());
    }

    #[test]
    fn test_absolute_url_uses_origin() {
        let doc = Html::parse_document(r#"<div><a href="/news/articleView.html?idxno=1">a</a></div>"#);
        let anchors = collect_anchors(root(&doc));
        assert_eq!(
            anchors[0].absolute_url("https://www.fashionbiz.co.kr"),
            "https://www.fashionbiz.co.kr/news/articleView.html?idxno=1"
        );
    }
}
