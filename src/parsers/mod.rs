pub mod detail;
pub mod html;
pub mod listing;
pub mod text;

#[cfg(test)]
mod tests;

use crate::config::SiteSelectors;
use crate::error::Result;
use scraper::Selector;

pub use detail::{DetailFields, parse_detail};
pub use listing::{ListingItem, ListingPage, parse_listing};

/// Site selectors compiled once, before any page is parsed
#[derive(Debug, Clone)]
pub struct CompiledSelectors {
    pub category: Selector,
    pub item: Selector,
    pub title_block: Option<Selector>,
    pub title_anchor: Selector,
    pub price: Option<Selector>,
    pub listing_image: Option<Selector>,
    pub gallery: Option<Selector>,
    pub description: Option<Selector>,
    /// `img`, used inside gallery containers
    pub image: Selector,
}

impl CompiledSelectors {
    /// Compiles every configured selector, failing on the first invalid one
    pub fn compile(selectors: &SiteSelectors) -> Result<Self> {
        Ok(Self {
            category: html::compile(&selectors.category)?,
            item: html::compile(&selectors.item)?,
            title_block: html::compile_opt(selectors.title_block.as_ref())?,
            title_anchor: html::compile(&selectors.title_anchor)?,
            price: html::compile_opt(selectors.price.as_ref())?,
            listing_image: html::compile_opt(selectors.listing_image.as_ref())?,
            gallery: html::compile_opt(selectors.gallery.as_ref())?,
            description: html::compile_opt(selectors.description.as_ref())?,
            image: html::compile_css("img")?,
        })
    }
}
