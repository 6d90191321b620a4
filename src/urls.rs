//! URL clean-up applied to product links and image sources.

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Forces a URL onto `https://`.
///
/// Protocol-relative URLs get an `https:` prefix, `http://` is upgraded and
/// scheme-less URLs get `https://` prepended. The rewrite is idempotent.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();

    if url.starts_with("//") {
        format!("https:{url}")
    } else if starts_with_ignore_case(url, "https://") {
        url.to_string()
    } else if starts_with_ignore_case(url, "http://") {
        format!("https://{}", &url["http://".len()..])
    } else {
        format!("https://{url}")
    }
}

/// True for sources that are already absolute HTTP(S) or protocol-relative.
///
/// Data URIs, lazy-load placeholders and relative paths are rejected.
pub fn is_absolute_source(src: &str) -> bool {
    let src = src.trim();
    src.starts_with("//")
        || starts_with_ignore_case(src, "http://")
        || starts_with_ignore_case(src, "https://")
}

/// Turns a raw `href` from a listing into an absolute product URL.
///
/// Returns `None` when the link cannot be dereferenced, in which case the
/// record keeps its default link and enrichment is skipped.
pub fn resolve_product_link(href: &str, origin: &str) -> Option<String> {
    let href = href.trim();

    if href.starts_with("//") {
        Some(normalize_url(href))
    } else if href.starts_with('/') {
        Some(normalize_url(&format!(
            "{}{}",
            origin.trim_end_matches('/'),
            href
        )))
    } else if is_absolute_source(href) {
        Some(normalize_url(href))
    } else {
        None
    }
}

/// First URL of a `srcset`/`data-srcset` attribute
pub fn first_srcset_candidate(srcset: &str) -> Option<&str> {
    srcset
        .split(',')
        .next()
        .and_then(|candidate| candidate.split_whitespace().next())
        .filter(|url| !url.is_empty())
}
