//! ExtractionPipeline: listing page in, one [`ExtractedArticle`] out.
//!
//! ```text
//! FetchListing → LocateSection → FilterCandidates → SelectFirst
//!   → ResolveTitleAndLink → FetchArticle → ExtractContent → Done
//! ```
//!
//! Any stage may end the run with an [`ExtractError`]; nothing is retried.
//! Parsed documents are confined to synchronous helpers so none is held
//! across the two network awaits.

use scraper::Html;
use tracing::{debug, info, instrument};

use crate::config::SiteRules;
use crate::error::{ExtractError, Stage};
use crate::extract::candidates::filter_candidates;
use crate::extract::content::extract_content;
use crate::extract::fetch::{PageFetcher, parse_document};
use crate::extract::section::locate_section;
use crate::extract::title::resolve_title;
use crate::models::ExtractedArticle;
use crate::utils::truncate_for_log;

#[derive(Debug)]
pub struct ExtractionPipeline {
    fetcher: PageFetcher,
    rules: SiteRules,
}

/// Title and absolute link of the latest listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub title: String,
    pub link: String,
}

impl ExtractionPipeline {
    pub fn new(fetcher: PageFetcher, rules: SiteRules) -> Self {
        Self { fetcher, rules }
    }

    pub fn rules(&self) -> &SiteRules {
        &self.rules
    }

    /// Extract the latest article from the configured listing page.
    #[instrument(level = "info", skip(self), fields(listing_url = %self.rules.listing_url))]
    pub async fn run(&self) -> Result<ExtractedArticle, ExtractError> {
        let listing_url = self.rules.listing_url.as_str();

        debug!(stage = %Stage::FetchListing, "Entering stage");
        let listing = self
            .fetcher
            .fetch(listing_url)
            .await
            .map_err(|source| ExtractError::ListingUnavailable {
                url: listing_url.to_string(),
                source,
            })?;
        let listing_doc = parse_document(&listing, listing_url).map_err(|source| {
            ExtractError::ListingUnavailable {
                url: listing_url.to_string(),
                source,
            }
        })?;
        let entry = self.select_latest(&listing_doc, listing_url)?;
        drop(listing_doc);
        info!(title = %entry.title, link = %entry.link, "Selected latest article");

        debug!(stage = %Stage::FetchArticle, link = %entry.link, "Entering stage");
        let article = self
            .fetcher
            .fetch(&entry.link)
            .await
            .map_err(|source| ExtractError::ArticleUnavailable {
                url: entry.link.clone(),
                source,
            })?;
        let content = self.extract_body(&article, &entry.link)?;

        debug!(stage = %Stage::Done, "Extraction complete");
        Ok(ExtractedArticle {
            title: entry.title,
            link: entry.link,
            content,
        })
    }

    /// LocateSection → FilterCandidates → SelectFirst → ResolveTitleAndLink on a parsed listing.
    pub fn select_latest(&self, doc: &Html, listing_url: &str) -> Result<ListingEntry, ExtractError> {
        debug!(stage = %Stage::LocateSection, anchor = %self.rules.anchor_text, "Entering stage");
        let section = locate_section(doc, &self.rules.anchor_text).ok_or_else(|| {
            ExtractError::SectionNotFound {
                url: listing_url.to_string(),
                anchor: self.rules.anchor_text.clone(),
            }
        })?;

        debug!(stage = %Stage::FilterCandidates, "Entering stage");
        let candidates = filter_candidates(section, &self.rules.article_link);

        debug!(stage = %Stage::SelectFirst, count = candidates.len(), "Entering stage");
        let first = candidates
            .into_iter()
            .next()
            .ok_or_else(|| ExtractError::NoCandidates {
                url: listing_url.to_string(),
            })?;

        debug!(stage = %Stage::ResolveTitleAndLink, href = %first.href, "Entering stage");
        let title = resolve_title(first.anchor, &self.rules.title_selectors);
        if title.is_empty() {
            return Err(ExtractError::TitleUnresolved {
                url: listing_url.to_string(),
                href: first.href,
            });
        }
        let link = first.absolute_url(&self.rules.base_origin);

        Ok(ListingEntry { title, link })
    }

    /// DocumentParser → ContentExtractor on a fetched article body.
    fn extract_body(&self, markup: &str, link: &str) -> Result<String, ExtractError> {
        debug!(stage = %Stage::ExtractContent, "Entering stage");
        let doc = parse_document(markup, link).map_err(|source| ExtractError::ArticleUnavailable {
            url: link.to_string(),
            source,
        })?;
        let extraction = extract_content(&doc, &self.rules, link)?;
        info!(
            tier = %extraction.tier,
            chars = extraction.text.chars().count(),
            preview = %truncate_for_log(&extraction.text, 80),
            "Extracted article body"
        );
        Ok(extraction.text)
    }
}
