//! Record extraction: listing page plus optional detail pages into product records.

use crate::config::SiteConfig;
use crate::error::Result;
use crate::fetch::DetailFetcher;
use crate::parsers::text::coerce_price;
use crate::parsers::{CompiledSelectors, ListingItem, parse_detail, parse_listing};
use crate::results::{NO_CATEGORY, ProductRecord};
use crate::urls::resolve_product_link;
use std::time::Duration;

/// Turns rendered listing markup into product records
#[derive(Debug, Clone)]
pub struct Extractor {
    selectors: CompiledSelectors,
    origin: String,
    coerce_price: bool,
    item_delay: Duration,
}

impl Extractor {
    /// Compiles the site's selectors and resolves its origin
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            selectors: CompiledSelectors::compile(&config.selectors)?,
            origin: config.resolved_origin()?,
            coerce_price: config.coerce_price,
            item_delay: config.timings.item_delay(),
        })
    }

    pub fn with_selectors(selectors: CompiledSelectors, origin: &str) -> Self {
        Self {
            selectors,
            origin: origin.trim_end_matches('/').to_string(),
            coerce_price: false,
            item_delay: Duration::ZERO,
        }
    }

    /// Replace raw price text with its numeric value when it has one
    pub fn coerce_prices(mut self, enabled: bool) -> Self {
        self.coerce_price = enabled;
        self
    }

    /// Pause between consecutive items
    pub fn item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Extracts one record per item container, in document order.
    ///
    /// With a fetcher, each item with a valid link is enriched from its
    /// detail page before the next item starts. A failed detail page only
    /// degrades its own record.
    pub async fn extract(
        &self,
        listing_markup: &str,
        mut fetcher: Option<&mut dyn DetailFetcher>,
    ) -> Vec<ProductRecord> {
        let page = parse_listing(listing_markup, &self.selectors);
        let category = page.category.unwrap_or_else(|| NO_CATEGORY.to_string());
        let total = page.items.len();
        ::log::info!("Found {} products in category {:?}", total, category);

        let mut records = Vec::with_capacity(total);
        for (index, item) in page.items.into_iter().enumerate() {
            if index > 0 && !self.item_delay.is_zero() {
                tokio::time::sleep(self.item_delay).await;
            }

            let mut record = self.listing_record(&category, &item);

            match fetcher.as_mut() {
                Some(fetcher) if record.has_link() => {
                    self.enrich(&mut record, item.thumbnail, &mut **fetcher).await
                }
                _ => {
                    if let Some(thumbnail) = item.thumbnail {
                        record.images = vec![thumbnail];
                    }
                }
            }

            ::log::info!("Extracted {}/{}: {}", index + 1, total, record.title);
            records.push(record);
        }

        records
    }

    /// Record holding everything the listing page knows about one item
    fn listing_record(&self, category: &str, item: &ListingItem) -> ProductRecord {
        let mut record = ProductRecord {
            category: category.to_string(),
            ..ProductRecord::default()
        };

        match &item.title {
            Some(title) => record.title = title.clone(),
            None => ::log::debug!("Item without title anchor, using defaults"),
        }

        if let Some(price) = &item.price {
            record.price = match coerce_price(price) {
                Some(numeric) if self.coerce_price => numeric.to_string(),
                _ => price.clone(),
            };
        }

        if let Some(href) = &item.href {
            match resolve_product_link(href, &self.origin) {
                Some(link) => record.link = link,
                None => ::log::debug!("Ignoring unusable product link {:?}", href),
            }
        }

        record
    }

    async fn enrich(
        &self,
        record: &mut ProductRecord,
        thumbnail: Option<String>,
        fetcher: &mut dyn DetailFetcher,
    ) {
        let markup = match fetcher.fetch(&record.link).await {
            Ok(markup) => markup,
            Err(e) => {
                ::log::warn!("Error loading {}: {}", record.link, e);
                return;
            }
        };

        let detail = parse_detail(&markup, &self.selectors);

        if !detail.images.is_empty() {
            record.images = detail.images;
        } else if let Some(thumbnail) = thumbnail {
            record.images = vec![thumbnail];
        }

        match detail.description {
            Some(description) => record.description = description,
            None => ::log::debug!("No description on {}", record.link),
        }
    }
}
