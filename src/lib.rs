pub mod completion;
pub mod config;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod parsers;
pub mod render;
pub mod results;
pub mod sink;
pub mod urls;
pub mod utils;

#[cfg(test)]
mod testing;

// Re-export commonly used types for convenience
pub use completion::{CompletionOptions, load_until_stable};
pub use config::{DetailSource, ElementSelector, RevealStrategy, SiteConfig};
pub use error::{Error, Result};
pub use extract::Extractor;
pub use render::{Renderer, SessionOptions, WebDriverSession};
pub use results::{PageState, ProductRecord};
pub use sink::{Column, OutputFormat};

use fetch::{BrowserFetcher, DetailFetcher, HttpFetcher};
use std::path::Path;

/// Main builder for harvesting one listing page into product records
pub struct Harvest {
    config: SiteConfig,
}

impl Harvest {
    /// Create a new Harvest builder from a site configuration
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a JSON file
    pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(SiteConfig::from_file(path)?))
    }

    /// Load configuration from a JSON string
    pub fn from_config_str(json: &str) -> Result<Self> {
        Ok(Self::new(SiteConfig::from_json(json)?))
    }

    /// Start from one of the built-in site configurations
    pub fn preset(name: &str) -> Result<Self> {
        SiteConfig::preset(name).map(Self::new).ok_or_else(|| {
            Error::Config(format!(
                "unknown preset `{}` (available: {})",
                name,
                SiteConfig::preset_names().join(", ")
            ))
        })
    }

    /// Override the listing page to load
    pub fn with_listing_url(mut self, url: &str) -> Self {
        self.config.listing_url = url.to_string();
        self
    }

    pub fn with_reveal(mut self, reveal: RevealStrategy) -> Self {
        self.config.reveal = reveal;
        self
    }

    pub fn with_detail_source(mut self, source: DetailSource) -> Self {
        self.config.detail_source = source;
        self
    }

    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn with_coerce_price(mut self, enabled: bool) -> Self {
        self.config.coerce_price = enabled;
        self
    }

    /// Cap the number of reveal rounds on the listing page
    pub fn with_max_rounds(mut self, rounds: usize) -> Self {
        self.config.max_reveal_rounds = Some(rounds);
        self
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Open a browser session, harvest the listing and close the session.
    ///
    /// Fails without records when no session can be created. The session is
    /// closed whatever the outcome of the harvest.
    pub async fn run(self) -> Result<Vec<ProductRecord>> {
        let mut config = self.config;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                config.webdriver_url = webdriver_url;
            }
        }

        config.validate()?;
        let extractor = Extractor::new(&config)?;

        ::log::info!("Harvesting {}", config.listing_url);
        let mut session =
            WebDriverSession::connect(&config.webdriver_url, &SessionOptions::from(&config))
                .await?;

        harvest_and_close(&mut session, &config, &extractor).await
    }
}

/// Runs [`harvest_with`] and closes the renderer whatever the outcome.
///
/// A failure to close is logged and does not replace the harvest outcome.
pub async fn harvest_and_close<R>(
    renderer: &mut R,
    config: &SiteConfig,
    extractor: &Extractor,
) -> Result<Vec<ProductRecord>>
where
    R: Renderer + ?Sized,
{
    let outcome = harvest_with(renderer, config, extractor).await;

    if let Err(e) = renderer.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }

    outcome
}

/// Harvests the configured listing through an already open renderer.
///
/// The renderer stays open; closing it is the caller's job.
pub async fn harvest_with<R>(
    renderer: &mut R,
    config: &SiteConfig,
    extractor: &Extractor,
) -> Result<Vec<ProductRecord>>
where
    R: Renderer + ?Sized,
{
    let completion = CompletionOptions::from_timings(&config.timings, config.max_reveal_rounds);

    renderer.render(&config.listing_url).await?;
    let state = load_until_stable(renderer, &config.reveal, &completion).await?;
    ::log::debug!(
        "Listing settled at height {} ({} bytes)",
        state.measured_height,
        state.rendered_markup.len()
    );

    let records = match config.detail_source {
        DetailSource::Skip => extractor.extract(&state.rendered_markup, None).await,
        DetailSource::Http => {
            let mut fetcher =
                HttpFetcher::new(&config.user_agent, config.timings.detail_load_timeout())?;
            extractor
                .extract(&state.rendered_markup, Some(&mut fetcher as &mut dyn DetailFetcher))
                .await
        }
        DetailSource::Browser => {
            let mut fetcher = BrowserFetcher::new(
                renderer,
                config.timings.detail_load_timeout(),
                config.timings.detail_settle(),
            );
            if config.detail_reveal != RevealStrategy::Static {
                fetcher = fetcher.with_reveal(config.detail_reveal.clone(), completion.clone());
            }
            extractor
                .extract(&state.rendered_markup, Some(&mut fetcher as &mut dyn DetailFetcher))
                .await
        }
    };

    ::log::info!("Harvested {} records", records.len());
    Ok(records)
}
