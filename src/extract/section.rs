//! SectionLocator: find the listing region by heading text and adjacency.
//!
//! Class names on the surrounding containers are auto-generated and churn on
//! every redesign, so they are never matched. The heading text is the stable
//! landmark; the region is the container element that follows it.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, instrument};

static HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

const CONTAINER_TAGS: &[&str] = &[
    "div", "ul", "ol", "section", "article", "nav", "aside", "main", "table", "dl",
];

const HEADING_TAGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Locate the container that follows the heading whose trimmed text equals `anchor_text`.
///
/// Walks the heading's following element siblings: non-container elements
/// (a "more" link, a `<span>`) are skipped, and another heading ends the
/// search since it starts the next section. Returns `None` when no heading
/// matches or the matching heading has no following container; absence is a
/// normal outcome here.
#[instrument(level = "debug", skip(doc))]
pub fn locate_section<'a>(doc: &'a Html, anchor_text: &str) -> Option<ElementRef<'a>> {
    let heading = doc
        .select(&HEADING)
        .find(|h| element_text(h).trim() == anchor_text)?;

    let container = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|el| !HEADING_TAGS.contains(&el.value().name()))
        .find(|el| CONTAINER_TAGS.contains(&el.value().name()));

    match container {
        Some(el) => debug!(tag = el.value().name(), "Located section container"),
        None => debug!(heading = heading.value().name(), "Anchor heading has no following container"),
    }
    container
}

fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect()
}
