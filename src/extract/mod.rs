//! Resilient content locator for one news listing site.
//!
//! The listing page's containers carry auto-generated class names that change
//! with every deploy, so nothing here matches on them. Each stage degrades
//! through known fallbacks and then fails loudly with a diagnosable error.
//!
//! # Stages
//!
//! | Stage | Module | Notes |
//! |-------|--------|-------|
//! | PageFetcher, DocumentParser | [`fetch`] | explicit timeout, non-2xx is an error |
//! | SectionLocator | [`section`] | heading text + next container sibling |
//! | CandidateFilter | [`candidates`] | URL-pattern filter, falls back to all anchors |
//! | TitleResolver | [`title`] | title-role descendant, then anchor text |
//! | LinkNormalizer | [`link`] | absolute-path hrefs only |
//! | ContentExtractor | [`content`] | four-tier probe chain |
//! | ExtractionPipeline | [`pipeline`] | strictly sequential, single shot |

pub mod candidates;
pub mod content;
pub mod fetch;
pub mod link;
pub mod pipeline;
pub mod section;
pub mod title;

pub use fetch::PageFetcher;
pub use pipeline::ExtractionPipeline;
