use crate::error::{Error, Result};
use crate::sink::{Column, OutputFormat};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// A tag/class/id triple locating one kind of element on a page.
///
/// `css` wins over the other fields when set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSelector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Whitespace separated class names, all of which must be present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Raw CSS selector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
}

impl ElementSelector {
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            ..Self::default()
        }
    }

    pub fn tag_class(tag: &str, class: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            class: Some(class.to_string()),
            ..Self::default()
        }
    }

    pub fn tag_id(tag: &str, id: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            id: Some(id.to_string()),
            ..Self::default()
        }
    }

    pub fn css(css: &str) -> Self {
        Self {
            css: Some(css.to_string()),
            ..Self::default()
        }
    }

    /// Renders the selector as a CSS selector string
    pub fn to_css(&self) -> String {
        if let Some(css) = self.css.as_deref().filter(|c| !c.trim().is_empty()) {
            return css.trim().to_string();
        }

        let mut out = self
            .tag
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or("")
            .to_string();

        if let Some(class) = &self.class {
            for name in class.split_whitespace() {
                out.push('.');
                out.push_str(name);
            }
        }

        if let Some(id) = self.id.as_deref().map(str::trim).filter(|i| !i.is_empty()) {
            out.push('#');
            out.push_str(id);
        }

        if out.is_empty() { "*".to_string() } else { out }
    }
}

/// How more items are revealed on an already rendered page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RevealStrategy {
    /// Scroll to the bottom until the page height stops growing
    #[default]
    Scroll,
    /// Click a "load more" control until it disappears
    Click { control: ElementSelector },
    /// Take the page as rendered
    Static,
}

/// Where detail pages come from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailSource {
    /// Re-render each product link in the listing's browser session
    #[default]
    Browser,
    /// Plain HTTP GET with a browser User-Agent
    Http,
    /// Do not visit detail pages
    Skip,
}

/// Selectors for every semantic field of a listing and its detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Category label, looked up once per listing page
    #[serde(default = "default_category_selector")]
    pub category: ElementSelector,

    /// One match per product
    pub item: ElementSelector,

    /// Block wrapping the title anchor inside an item
    #[serde(default)]
    pub title_block: Option<ElementSelector>,

    /// Anchor carrying the title text and the product link
    #[serde(default = "default_anchor_selector")]
    pub title_anchor: ElementSelector,

    #[serde(default)]
    pub price: Option<ElementSelector>,

    /// Thumbnail inside an item on the listing page
    #[serde(default)]
    pub listing_image: Option<ElementSelector>,

    /// Gallery containers on the detail page
    #[serde(default)]
    pub gallery: Option<ElementSelector>,

    /// Description container on the detail page
    #[serde(default)]
    pub description: Option<ElementSelector>,
}

/// Fixed waits used by the completion loop and the enrichment pass, in milliseconds
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timings {
    #[serde(default = "default_scroll_delay_ms")]
    pub scroll_delay_ms: u64,

    #[serde(default = "default_click_delay_ms")]
    pub click_delay_ms: u64,

    /// How long to wait for the "load more" control to become clickable
    #[serde(default = "default_control_wait_ms")]
    pub control_wait_ms: u64,

    /// Page load timeout applied to detail pages only
    #[serde(default = "default_detail_load_timeout_ms")]
    pub detail_load_timeout_ms: u64,

    /// Wait after a detail page has been rendered
    #[serde(default = "default_detail_settle_ms")]
    pub detail_settle_ms: u64,

    /// Pause between items
    #[serde(default)]
    pub item_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            scroll_delay_ms: default_scroll_delay_ms(),
            click_delay_ms: default_click_delay_ms(),
            control_wait_ms: default_control_wait_ms(),
            detail_load_timeout_ms: default_detail_load_timeout_ms(),
            detail_settle_ms: default_detail_settle_ms(),
            item_delay_ms: 0,
        }
    }
}

impl Timings {
    pub fn scroll_delay(&self) -> Duration {
        Duration::from_millis(self.scroll_delay_ms)
    }

    pub fn click_delay(&self) -> Duration {
        Duration::from_millis(self.click_delay_ms)
    }

    pub fn control_wait(&self) -> Duration {
        Duration::from_millis(self.control_wait_ms)
    }

    pub fn detail_load_timeout(&self) -> Duration {
        Duration::from_millis(self.detail_load_timeout_ms)
    }

    pub fn detail_settle(&self) -> Duration {
        Duration::from_millis(self.detail_settle_ms)
    }

    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.item_delay_ms)
    }
}

/// Everything needed to harvest one listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Listing page to load
    pub listing_url: String,

    /// Origin prefixed to root-relative product links (defaults to the listing URL's origin)
    #[serde(default)]
    pub origin: Option<String>,

    #[serde(default)]
    pub reveal: RevealStrategy,

    pub selectors: SiteSelectors,

    #[serde(default)]
    pub detail_source: DetailSource,

    /// Reveal strategy run on each detail page rendered in the browser
    #[serde(default = "default_detail_reveal")]
    pub detail_reveal: RevealStrategy,

    /// Replace the raw price text with its numeric value
    #[serde(default)]
    pub coerce_price: bool,

    #[serde(default)]
    pub timings: Timings,

    /// Optional upper bound on reveal rounds
    #[serde(default)]
    pub max_reveal_rounds: Option<usize>,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    #[serde(default)]
    pub headless: bool,

    /// User-Agent sent by the lightweight detail fetcher
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub output_format: OutputFormat,
}

impl SiteConfig {
    /// Create a configuration with default selectors for the given listing URL
    pub fn new(listing_url: &str, item: ElementSelector) -> Self {
        Self {
            listing_url: listing_url.to_string(),
            origin: None,
            reveal: RevealStrategy::default(),
            selectors: SiteSelectors {
                category: default_category_selector(),
                item,
                title_block: None,
                title_anchor: default_anchor_selector(),
                price: None,
                listing_image: None,
                gallery: None,
                description: None,
            },
            detail_source: DetailSource::default(),
            detail_reveal: default_detail_reveal(),
            coerce_price: false,
            timings: Timings::default(),
            max_reveal_rounds: None,
            webdriver_url: default_webdriver_url(),
            headless: false,
            user_agent: default_user_agent(),
            columns: default_columns(),
            output_format: OutputFormat::default(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up a built-in site configuration by name
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "laptopengine" => Some(laptopengine()),
            "revibe" => Some(revibe()),
            _ => None,
        }
    }

    pub fn preset_names() -> &'static [&'static str] {
        &["laptopengine", "revibe"]
    }

    /// Checks the listing URL and resolves the origin used for relative links
    pub fn validate(&self) -> Result<()> {
        self.resolved_origin().map(|_| ())
    }

    /// Origin prefixed to product links that start with `/`
    pub fn resolved_origin(&self) -> Result<String> {
        if let Some(origin) = self.origin.as_deref().filter(|o| !o.trim().is_empty()) {
            return Ok(origin.trim().trim_end_matches('/').to_string());
        }

        let url = Url::parse(&self.listing_url)?;
        match url.origin() {
            origin @ url::Origin::Tuple(..) => Ok(origin.ascii_serialization()),
            url::Origin::Opaque(_) => Err(Error::Config(format!(
                "listing URL `{}` has no origin",
                self.listing_url
            ))),
        }
    }
}

/// Click-to-load catalogue with browser-rendered detail pages
fn laptopengine() -> SiteConfig {
    let mut config = SiteConfig::new(
        "https://www.laptopengine.com/product-category/laptops-laptops-computers/",
        ElementSelector::tag_class("div", "electron-loop-product"),
    );
    config.reveal = RevealStrategy::Click {
        control: ElementSelector::css(".electron-load-more"),
    };
    config.selectors.title_block = Some(ElementSelector::tag_class("h6", "product-name"));
    config.selectors.price = Some(ElementSelector::tag_class("span", "price-item--sale"));
    config.selectors.gallery = Some(ElementSelector::tag_class("div", "swiper-slide"));
    config.selectors.description = Some(ElementSelector::tag_class("div", "product-desc-content"));
    config
}

/// Infinite-scroll catalogue whose detail pages are plain HTML
fn revibe() -> SiteConfig {
    let mut config = SiteConfig::new(
        "https://revibe.me/collections/refurbished-iphones-uae",
        ElementSelector::tag_class("div", "product-item"),
    );
    config.selectors.title_anchor = ElementSelector::tag_class("a", "card-title");
    config.selectors.price = Some(ElementSelector::tag_class("span", "price-item--sale"));
    config.selectors.listing_image = Some(ElementSelector::tag_class("img", "motion-reduce"));
    config.selectors.description =
        Some(ElementSelector::tag_id("div", "tab-technical-specifications"));
    config.detail_source = DetailSource::Http;
    config.timings.item_delay_ms = 2000;
    config
}

fn default_category_selector() -> ElementSelector {
    ElementSelector::tag("h2")
}

fn default_anchor_selector() -> ElementSelector {
    ElementSelector::tag("a")
}

fn default_detail_reveal() -> RevealStrategy {
    RevealStrategy::Static
}

fn default_scroll_delay_ms() -> u64 {
    2000
}

fn default_click_delay_ms() -> u64 {
    5000
}

fn default_control_wait_ms() -> u64 {
    10_000
}

fn default_detail_load_timeout_ms() -> u64 {
    10_000
}

fn default_detail_settle_ms() -> u64 {
    2000
}

/// Default value for webdriver_url
pub fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36".to_string()
}

fn default_columns() -> Vec<Column> {
    Column::all().to_vec()
}
