//! TitleResolver.
//!
//! Fallback chain, first non-empty result wins:
//!
//! 1. text of the first descendant matching a title-role selector, tried in
//!    profile order (`p.tit` on the default site)
//! 2. the anchor's own text
//! 3. the anchor's `title` attribute
//!
//! Results are trimmed at both ends; internal whitespace is kept as written.

use scraper::{ElementRef, Selector};
use tracing::debug;

/// Resolve the display title of a candidate anchor. Empty only when every tier is.
pub fn resolve_title(anchor: ElementRef<'_>, title_selectors: &[Selector]) -> String {
    for (idx, selector) in title_selectors.iter().enumerate() {
        let found = anchor
            .select(selector)
            .map(trimmed_text)
            .find(|text| !text.is_empty());
        if let Some(title) = found {
            debug!(selector_index = idx, "Title from title-role descendant");
            return title;
        }
    }

    let own = trimmed_text(anchor);
    if !own.is_empty() {
        debug!("Title from anchor text");
        return own;
    }

    let attr = anchor.value().attr("title").map(str::trim).unwrap_or_default();
    if !attr.is_empty() {
        debug!("Title from anchor title attribute");
    }
    attr.to_string()
}

fn trimmed_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}
