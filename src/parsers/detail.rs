use super::CompiledSelectors;
use super::html::{attribute, block_text};
use crate::urls::{is_absolute_source, normalize_url};
use scraper::{ElementRef, Html};

/// Fields read from a product's detail page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailFields {
    /// Normalized gallery image URLs, one per gallery container, in document order
    pub images: Vec<String>,
    pub description: Option<String>,
}

/// Parses a detail page for gallery images and the description
pub fn parse_detail(markup: &str, selectors: &CompiledSelectors) -> DetailFields {
    let doc = Html::parse_document(markup);

    let mut images = Vec::new();
    if let Some(gallery) = &selectors.gallery {
        for image in doc.select(gallery).filter_map(|c| first_image(c, selectors)) {
            match attribute(image, "src") {
                Some(src) if is_absolute_source(src) => images.push(normalize_url(src)),
                Some(src) => ::log::trace!("Skipping non-absolute image source: {}", src),
                None => {}
            }
        }
    }

    let description = selectors
        .description
        .as_ref()
        .and_then(|sel| doc.select(sel).next())
        .and_then(block_text);

    DetailFields {
        images,
        description,
    }
}

/// First image of a gallery container; slides often repeat it as zoom or thumbnail variants
fn first_image<'a>(container: ElementRef<'a>, selectors: &CompiledSelectors) -> Option<ElementRef<'a>> {
    // The gallery selector may point straight at the images
    if container.value().name() == "img" {
        return Some(container);
    }
    container.select(&selectors.image).next()
}
