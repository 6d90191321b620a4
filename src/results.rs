use serde::{Deserialize, Serialize};

pub const NO_CATEGORY: &str = "No category available";
pub const NO_TITLE: &str = "No title available";
pub const NO_LINK: &str = "No link available";
pub const NO_PRICE: &str = "No price available";
pub const NO_IMAGE: &str = "No image available";
pub const NO_DESCRIPTION: &str = "No description available";

/// Snapshot of a rendered page once the completion loop has stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    /// Last measured document height
    pub measured_height: i64,

    /// Page source at the time of the last measurement
    pub rendered_markup: String,
}

/// One product discovered on a listing page.
///
/// Every field always carries either a scraped value or its documented
/// default, so sinks never need to deal with missing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub category: String,
    pub title: String,
    pub link: String,
    pub price: String,
    pub images: Vec<String>,
    pub description: String,
}

impl Default for ProductRecord {
    fn default() -> Self {
        Self {
            category: NO_CATEGORY.to_string(),
            title: NO_TITLE.to_string(),
            link: NO_LINK.to_string(),
            price: NO_PRICE.to_string(),
            images: vec![NO_IMAGE.to_string()],
            description: NO_DESCRIPTION.to_string(),
        }
    }
}

impl ProductRecord {
    /// Whether the record carries a real, dereferenceable product link
    pub fn has_link(&self) -> bool {
        self.link != NO_LINK
    }

    /// Image URLs joined the way tabular sinks store them
    pub fn joined_images(&self) -> String {
        self.images.join(", ")
    }
}
