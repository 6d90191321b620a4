use crate::config::{ElementSelector, SiteSelectors};
use crate::parsers::{CompiledSelectors, ListingItem, parse_listing};

#[cfg(test)]
mod tests {
    use super::*;

    fn selectors() -> SiteSelectors {
        SiteSelectors {
            category: ElementSelector::tag("h2"),
            item: ElementSelector::tag_class("div", "product-item"),
            title_block: None,
            title_anchor: ElementSelector::tag_class("a", "card-title"),
            price: Some(ElementSelector::tag_class("span", "price-item--sale")),
            listing_image: Some(ElementSelector::tag_class("img", "motion-reduce")),
            gallery: None,
            description: None,
        }
    }

    const LISTING: &str = r#"
        <html><body>
          <h2>  Refurbished
                iPhones </h2>
          <div class="product-item">
            <img class="motion-reduce" src="//cdn.shop.com/a_100x.jpg">
            <a class="card-title" href="/products/iphone-12">  iPhone 12
               <span>128GB</span></a>
            <span class="price-item price-item--sale">AED 1,234.50</span>
          </div>
          <div class="product-item">
            <a class="card-title">iPhone 13</a>
          </div>
          <div class="product-item sold-out">
            <a class="other" href="/products/iphone-14">iPhone 14</a>
            <span class="price-item--sale">   </span>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_parse_listing_in_document_order() {
        let compiled = CompiledSelectors::compile(&selectors()).unwrap();
        let page = parse_listing(LISTING, &compiled);

        assert_eq!(page.category.as_deref(), Some("Refurbished iPhones"));
        assert_eq!(page.items.len(), 3);

        assert_eq!(
            page.items[0],
            ListingItem {
                title: Some("iPhone 12 128GB".to_string()),
                href: Some("/products/iphone-12".to_string()),
                price: Some("AED 1,234.50".to_string()),
                thumbnail: Some("https://cdn.shop.com/a_100x.jpg".to_string()),
            }
        );
    }

    #[test]
    fn test_anchor_without_href_keeps_title() {
        let compiled = CompiledSelectors::compile(&selectors()).unwrap();
        let page = parse_listing(LISTING, &compiled);

        assert_eq!(page.items[1].title.as_deref(), Some("iPhone 13"));
        assert_eq!(page.items[1].href, None);
        assert_eq!(page.items[1].price, None);
        assert_eq!(page.items[1].thumbnail, None);
    }

    #[test]
    fn test_unmatched_anchor_and_blank_price() {
        let compiled = CompiledSelectors::compile(&selectors()).unwrap();
        let page = parse_listing(LISTING, &compiled);

        assert_eq!(page.items[2], ListingItem::default());
    }

    #[test]
    fn test_title_block_chain() {
        let mut sel = selectors();
        sel.item = ElementSelector::tag_class("div", "electron-loop-product");
        sel.title_block = Some(ElementSelector::tag_class("h6", "product-name"));
        sel.title_anchor = ElementSelector::tag("a");
        let compiled = CompiledSelectors::compile(&sel).unwrap();

        let markup = r#"
            <div class="electron-loop-product">
              <a href="/wishlist">Add to wishlist</a>
              <h6 class="product-name"><a href="https://x.com/p/1">Laptop One</a></h6>
            </div>
            <div class="electron-loop-product">
              <a href="/wishlist">Add to wishlist</a>
            </div>
        "#;
        let page = parse_listing(markup, &compiled);

        assert_eq!(page.category, None);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].title.as_deref(), Some("Laptop One"));
        assert_eq!(page.items[0].href.as_deref(), Some("https://x.com/p/1"));

        // The anchor outside the title block must not be picked up
        assert_eq!(page.items[1].title, None);
        assert_eq!(page.items[1].href, None);
    }

    #[test]
    fn test_thumbnail_prefers_srcset_and_skips_placeholders() {
        let compiled = CompiledSelectors::compile(&selectors()).unwrap();
        let markup = r#"
            <div class="product-item">
              <img class="motion-reduce" data-srcset="//cdn.shop.com/b_165x.jpg 165w, //cdn.shop.com/b_360x.jpg 360w" src="//cdn.shop.com/b.jpg">
            </div>
            <div class="product-item">
              <img class="motion-reduce" src="data:image/png;base64,AAAA">
            </div>
        "#;
        let page = parse_listing(markup, &compiled);

        assert_eq!(
            page.items[0].thumbnail.as_deref(),
            Some("https://cdn.shop.com/b_165x.jpg")
        );
        assert_eq!(page.items[1].thumbnail, None);
    }

    #[test]
    fn test_empty_listing() {
        let compiled = CompiledSelectors::compile(&selectors()).unwrap();
        let page = parse_listing("<html><body></body></html>", &compiled);
        assert!(page.items.is_empty());
        assert_eq!(page.category, None);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let mut sel = selectors();
        sel.item = ElementSelector::css("div[");
        assert!(CompiledSelectors::compile(&sel).is_err());
    }
}
