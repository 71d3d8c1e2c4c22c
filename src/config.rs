//! Site profile: the literal selectors for one live news site.
//!
//! The fallback chain structure is fixed in code; what varies per site (and
//! per site redesign) is data. A profile is loaded once at process start from
//! YAML, validated, and compiled into [`SiteRules`]. Nothing here is re-read
//! mid-run.
//!
//! ```yaml
//! listing_url: https://www.fashionbiz.co.kr/
//! base_origin: https://www.fashionbiz.co.kr
//! anchor_text: 최신 기사
//! article_link_pattern: articleView
//! title_selectors: ["p.tit", ".tit"]
//! content_id: article-view-content-div
//! content_selectors: ["div.view_txt", "div.article_view"]
//! content_class_hints: ["content", "body"]
//! ```

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use url::Url;

use crate::error::ConfigError;

/// Raw, user-editable site profile. Every field has a default.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SiteProfile {
    /// Listing page holding the "latest articles" region.
    pub listing_url: String,
    /// Scheme + host prepended to absolute-path hrefs.
    pub base_origin: String,
    /// Exact heading text that anchors the listing region.
    pub anchor_text: String,
    /// Regex an href must match to count as an article link.
    pub article_link_pattern: String,
    /// CSS selectors for the title-role descendant of a candidate, in order.
    pub title_selectors: Vec<String>,
    /// Element id of the article body container (tier 1).
    pub content_id: String,
    /// Historical body-container selectors, oldest redesign last (tier 2).
    /// New redesigns append here; entries are never removed.
    pub content_selectors: Vec<String>,
    /// Class-attribute substrings for the generic last-resort tier (tier 4).
    pub content_class_hints: Vec<String>,
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self {
            listing_url: "https://www.fashionbiz.co.kr/".to_string(),
            base_origin: "https://www.fashionbiz.co.kr".to_string(),
            anchor_text: "최신 기사".to_string(),
            article_link_pattern: "articleView".to_string(),
            title_selectors: vec!["p.tit".to_string(), ".tit".to_string(), ".title".to_string()],
            content_id: "article-view-content-div".to_string(),
            content_selectors: vec![
                "div.view_txt".to_string(),
                "div.article_view".to_string(),
                "div.news_view".to_string(),
                "div.article-body".to_string(),
            ],
            content_class_hints: vec!["content".to_string(), "body".to_string()],
        }
    }
}

/// A validated profile with its regex and selectors compiled.
#[derive(Debug)]
pub struct SiteRules {
    pub listing_url: String,
    pub base_origin: String,
    pub anchor_text: String,
    pub article_link: Regex,
    pub title_selectors: Vec<Selector>,
    /// Tier 1 selector; `None` when the profile leaves `content_id` empty.
    pub content_id: Option<Selector>,
    pub content_selectors: Vec<Selector>,
    pub content_class_hints: Vec<String>,
}

impl SiteProfile {
    /// Load a profile from a YAML file, or the built-in default when `path` is `None`.
    #[instrument(level = "info")]
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            info!("Using built-in site profile");
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let profile = Self::from_yaml(&raw).map_err(|source| ConfigError::Yaml {
            path: path.to_string(),
            source,
        })?;
        info!(%path, listing_url = %profile.listing_url, "Loaded site profile");
        Ok(profile)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(raw)
    }

    /// Validate URLs and compile every pattern and selector.
    pub fn compile(&self) -> Result<SiteRules, ConfigError> {
        check_http_url("listing_url", &self.listing_url)?;
        check_http_url("base_origin", &self.base_origin)?;

        // An empty anchor matches any text-less heading, an empty pattern every href
        let anchor_text = self.anchor_text.trim();
        if anchor_text.is_empty() {
            return Err(ConfigError::Empty { field: "anchor_text" });
        }
        if self.article_link_pattern.trim().is_empty() {
            return Err(ConfigError::Empty {
                field: "article_link_pattern",
            });
        }

        let article_link =
            Regex::new(&self.article_link_pattern).map_err(|source| ConfigError::InvalidPattern {
                pattern: self.article_link_pattern.clone(),
                source,
            })?;

        let title_selectors = self
            .title_selectors
            .iter()
            .map(|s| parse_selector("title", s))
            .collect::<Result<Vec<_>, _>>()?;

        let content_id = match self.content_id.trim() {
            "" => None,
            id => Some(parse_selector("content_id", &format!("[id=\"{id}\"]"))?),
        };

        let content_selectors = self
            .content_selectors
            .iter()
            .map(|s| parse_selector("content", s))
            .collect::<Result<Vec<_>, _>>()?;

        let content_class_hints = self
            .content_class_hints
            .iter()
            .map(|h| h.trim().to_lowercase())
            .filter(|h| !h.is_empty())
            .collect();

        Ok(SiteRules {
            listing_url: self.listing_url.clone(),
            base_origin: self.base_origin.trim_end_matches('/').to_string(),
            anchor_text: anchor_text.to_string(),
            article_link,
            title_selectors,
            content_id,
            content_selectors,
            content_class_hints,
        })
    }
}

fn check_http_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let parsed = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(invalid("missing host".to_string())),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

fn parse_selector(field: &'static str, selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector).map_err(|e| ConfigError::InvalidSelector {
        field,
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}
