//! Error taxonomy for extraction, configuration, and storage.
//!
//! Extraction failures are never recovered inside the pipeline. Each one is a
//! hard stop for the current run and carries the [`Stage`] it happened in
//! plus the URL involved, so a human can open the live page and extend the
//! relevant fallback chain.

use std::fmt;
use thiserror::Error;

/// Pipeline states, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchListing,
    LocateSection,
    FilterCandidates,
    SelectFirst,
    ResolveTitleAndLink,
    FetchArticle,
    ExtractContent,
    Done,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::FetchListing => "fetch_listing",
            Stage::LocateSection => "locate_section",
            Stage::FilterCandidates => "filter_candidates",
            Stage::SelectFirst => "select_first",
            Stage::ResolveTitleAndLink => "resolve_title_and_link",
            Stage::FetchArticle => "fetch_article",
            Stage::ExtractContent => "extract_content",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single page fetch that did not yield usable markup.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },
}

/// Terminal failure of one extraction run.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("[{stage}] listing page unavailable: {source}", stage = Stage::FetchListing)]
    ListingUnavailable {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("[{stage}] no heading \"{anchor}\" followed by a container on {url}", stage = Stage::LocateSection)]
    SectionNotFound { url: String, anchor: String },

    #[error("[{stage}] located section on {url} holds no usable links", stage = Stage::FilterCandidates)]
    NoCandidates { url: String },

    #[error("[{stage}] first candidate on {url} has no title text (href {href})", stage = Stage::ResolveTitleAndLink)]
    TitleUnresolved { url: String, href: String },

    #[error("[{stage}] article page unavailable: {source}", stage = Stage::FetchArticle)]
    ArticleUnavailable {
        url: String,
        #[source]
        source: FetchError,
    },

    #[error("[{stage}] no content container matched on {url}", stage = Stage::ExtractContent)]
    ContentNotFound { url: String },
}

impl ExtractError {
    /// The pipeline stage that failed.
    pub fn stage(&self) -> Stage {
        match self {
            ExtractError::ListingUnavailable { .. } => Stage::FetchListing,
            ExtractError::SectionNotFound { .. } => Stage::LocateSection,
            ExtractError::NoCandidates { .. } => Stage::FilterCandidates,
            ExtractError::TitleUnresolved { .. } => Stage::ResolveTitleAndLink,
            ExtractError::ArticleUnavailable { .. } => Stage::FetchArticle,
            ExtractError::ContentNotFound { .. } => Stage::ExtractContent,
        }
    }

    /// The URL the failing stage was working against.
    pub fn url(&self) -> &str {
        match self {
            ExtractError::ListingUnavailable { url, .. }
            | ExtractError::SectionNotFound { url, .. }
            | ExtractError::NoCandidates { url }
            | ExtractError::TitleUnresolved { url, .. }
            | ExtractError::ArticleUnavailable { url, .. }
            | ExtractError::ContentNotFound { url } => url,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read site profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid site profile YAML in {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid {field} \"{value}\": {reason}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("invalid article link pattern \"{pattern}\": {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid {field} selector \"{selector}\": {reason}")]
    InvalidSelector {
        field: &'static str,
        selector: String,
        reason: String,
    },

    #[error("HTTP client could not be built: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error while saving record: {0}")]
    Http(#[from] reqwest::Error),

    #[error("store rejected record with HTTP status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}
