use super::CompiledSelectors;
use super::html::{attribute, find_first, inline_text};
use crate::urls::{first_srcset_candidate, is_absolute_source, normalize_url};
use scraper::{ElementRef, Html};

/// Fields read from one item container on the listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingItem {
    pub title: Option<String>,
    /// Raw `href` of the title anchor
    pub href: Option<String>,
    pub price: Option<String>,
    /// Normalized thumbnail URL
    pub thumbnail: Option<String>,
}

/// Everything the listing page yields before enrichment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub category: Option<String>,
    pub items: Vec<ListingItem>,
}

/// Parses a fully revealed listing page.
///
/// Items come back in document order. A selector that matches nothing only
/// leaves the corresponding field empty.
pub fn parse_listing(markup: &str, selectors: &CompiledSelectors) -> ListingPage {
    let doc = Html::parse_document(markup);

    let category = doc.select(&selectors.category).next().and_then(inline_text);
    if category.is_none() {
        ::log::debug!("No category label on listing page");
    }

    let items = doc
        .select(&selectors.item)
        .map(|item| parse_item(item, selectors))
        .collect::<Vec<_>>();

    ::log::debug!("Listing parser found {} item containers", items.len());

    ListingPage { category, items }
}

fn parse_item(item: ElementRef<'_>, selectors: &CompiledSelectors) -> ListingItem {
    let anchor = match &selectors.title_block {
        Some(block) => find_first(item, block).and_then(|b| find_first(b, &selectors.title_anchor)),
        None => find_first(item, &selectors.title_anchor),
    };

    let (title, href) = match anchor {
        Some(anchor) => (
            inline_text(anchor),
            attribute(anchor, "href").map(str::to_string),
        ),
        None => (None, None),
    };

    let price = selectors
        .price
        .as_ref()
        .and_then(|sel| find_first(item, sel))
        .and_then(inline_text);

    let thumbnail = selectors
        .listing_image
        .as_ref()
        .and_then(|sel| find_first(item, sel))
        .and_then(thumbnail_source);

    ListingItem {
        title,
        href,
        price,
        thumbnail,
    }
}

/// Picks the thumbnail URL, preferring lazy-load srcsets over `src`
fn thumbnail_source(image: ElementRef<'_>) -> Option<String> {
    let candidates = [
        attribute(image, "data-srcset").and_then(first_srcset_candidate),
        attribute(image, "srcset").and_then(first_srcset_candidate),
        attribute(image, "src"),
        attribute(image, "data-src"),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|src| is_absolute_source(src))
        .map(normalize_url)
}
