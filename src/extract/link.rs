//! LinkNormalizer.
//!
//! Only absolute-path references are resolved. Relative-path hrefs
//! (`../x`, `x.html`) are joined onto the origin as-is, which yields a
//! well-formed but possibly wrong URL rather than an error.

/// Turn `href` into an absolute URL against `base_origin` (`scheme://host[:port]`).
///
/// - `http://` / `https://` hrefs are returned unchanged
/// - protocol-relative `//host/path` takes the origin's scheme
/// - anything else is appended to the origin
///
/// Idempotent: the output always carries a scheme, so normalizing it again
/// returns it unchanged.
pub fn normalize_link(href: &str, base_origin: &str) -> String {
    let href = href.trim();
    if has_http_scheme(href) {
        return href.to_string();
    }

    let origin = base_origin.trim_end_matches('/');
    if let Some(rest) = href.strip_prefix("//") {
        let scheme = origin.split_once("://").map_or("https", |(scheme, _)| scheme);
        return format!("{scheme}://{rest}");
    }

    if href.starts_with('/') {
        format!("{origin}{href}")
    } else {
        format!("{origin}/{href}")
    }
}

fn has_http_scheme(href: &str) -> bool {
    let lower = href.get(..8).unwrap_or(href).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN: &str = "https://www.fashionbiz.co.kr";

    #[test]
    fn test_absolute_href_unchanged() {
        let href = "https://other.example.com/news/articleView.html?idxno=3";
        assert_eq!(normalize_link(href, ORIGIN), href);
        assert_eq!(normalize_link("HTTP://X.example.com/a", ORIGIN), "HTTP://X.example.com/a");
    }

    #[test]
    fn test_absolute_path_joined_to_origin() {
        assert_eq!(
            normalize_link("/news/articleView.html?idxno=1", ORIGIN),
            "https://www.fashionbiz.co.kr/news/articleView.html?idxno=1"
        );
    }

    #[test]
    fn test_origin_trailing_slash_not_doubled() {
        assert_eq!(
            normalize_link("/a", "https://www.fashionbiz.co.kr/"),
            "https://www.fashionbiz.co.kr/a"
        );
    }

    #[test]
    fn test_protocol_relative_takes_origin_scheme() {
        assert_eq!(normalize_link("//cdn.example.com/a", "http://news.example.com"), "http://cdn.example.com/a");
    }

    #[test]
    fn test_relative_path_is_not_resolved() {
        assert_eq!(
            normalize_link("../news/1", ORIGIN),
            "https://www.fashionbiz.co.kr/../news/1"
        );
    }

    #[test]
    fn test_idempotent() {
        for href in [
            "/news/articleView.html?idxno=1",
            "https://www.fashionbiz.co.kr/x",
            "//cdn.example.com/a",
            "article.html",
            "  /padded  ",
        ] {
            let once = normalize_link(href, ORIGIN);
            assert_eq!(normalize_link(&once, ORIGIN), once, "href {href:?}");
        }
    }
}
