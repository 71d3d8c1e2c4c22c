//! Data models passed between the pipeline and its collaborators.
//!
//! - [`ExtractedArticle`]: the extraction pipeline's output
//! - [`ArticleRecord`]: the one record handed to the storage collaborator

use serde::{Deserialize, Serialize};

/// The latest article as extracted from the live site.
///
/// When the pipeline returns one of these, all three fields are non-empty,
/// `link` is an absolute http(s) URL and `content` is whitespace-collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractedArticle {
    pub title: String,
    pub link: String,
    pub content: String,
}

/// One stored digest entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ArticleRecord {
    pub title: String,
    pub summary: String,
    /// Absolute URL of the source article.
    pub link: String,
    /// Run date in `YYYY-MM-DD` form.
    pub date: String,
}

impl ArticleRecord {
    pub fn new(article: &ExtractedArticle, summary: String, date: String) -> Self {
        Self {
            title: article.title.clone(),
            summary,
            link: article.link.clone(),
            date,
        }
    }
}
