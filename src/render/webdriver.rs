use super::Renderer;
use crate::config::{ElementSelector, RevealStrategy, SiteConfig};
use crate::error::{Error, Result};
use async_trait::async_trait;
use fantoccini::error::NewSessionError;
use fantoccini::wd::{Capabilities, TimeoutConfiguration};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight);";
const DOCUMENT_HEIGHT: &str = "return document.body.scrollHeight;";
const CLICK_ELEMENT: &str = "arguments[0].click();";

// Common alternatives tried when the configured endpoint does not answer
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // IP instead of localhost
];

/// Options for creating a browser session
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub headless: bool,
    /// How long to wait for a "load more" control to appear
    pub control_wait: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            headless: false,
            control_wait: Duration::from_secs(10),
        }
    }
}

impl From<&SiteConfig> for SessionOptions {
    fn from(config: &SiteConfig) -> Self {
        Self {
            headless: config.headless,
            control_wait: config.timings.control_wait(),
        }
    }
}

/// One WebDriver browser session.
///
/// Call [`Renderer::close`] when done. A session dropped while still open
/// schedules its own close on the current tokio runtime.
pub struct WebDriverSession {
    client: Option<Client>,
    endpoint: String,
    control_wait: Duration,
}

impl WebDriverSession {
    /// Connects to `webdriver_url`, falling back to well-known local endpoints.
    ///
    /// Fails when no endpoint can create a session; callers treat this as fatal.
    pub async fn connect(webdriver_url: &str, options: &SessionOptions) -> Result<Self> {
        let caps = capabilities(options.headless);

        let primary_error = match try_connect(webdriver_url, &caps).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", webdriver_url);
                return Ok(Self::from_client(client, webdriver_url, options));
            }
            // The server answered but could not start a browser: no point trying others
            Err(e @ NewSessionError::SessionNotCreated(_)) => {
                ::log::error!("WebDriver at {} could not create a session: {}", webdriver_url, e);
                return Err(Error::Session {
                    url: webdriver_url.to_string(),
                    source: e,
                });
            }
            Err(e) => {
                ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
                e
            }
        };

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = try_connect(url, &caps).await {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(Self::from_client(client, url, options));
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(Error::NoWebDriver(format!(
            "{webdriver_url} ({primary_error}), {}",
            FALLBACK_WEBDRIVER_URLS.join(", ")
        )))
    }

    fn from_client(client: Client, endpoint: &str, options: &SessionOptions) -> Self {
        Self {
            client: Some(client),
            endpoint: endpoint.to_string(),
            control_wait: options.control_wait,
        }
    }

    /// WebDriver endpoint this session is connected to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn client(&self) -> Result<&Client> {
        self.client.as_ref().ok_or(Error::SessionClosed)
    }

    async fn click_control(&self, control: &ElementSelector) -> Result<()> {
        let client = self.client()?;
        let css = control.to_css();

        client.execute(SCROLL_TO_BOTTOM, vec![]).await?;

        let element = client
            .wait()
            .at_most(self.control_wait)
            .for_element(Locator::Css(&css))
            .await
            .map_err(|e| {
                ::log::debug!("Reveal control {} did not appear: {}", css, e);
                Error::ControlUnavailable(css.clone())
            })?;

        if !element.is_displayed().await? || !element.is_enabled().await? {
            return Err(Error::ControlUnavailable(css));
        }

        // Script click so overlays such as cookie bars cannot intercept it
        client
            .execute(CLICK_ELEMENT, vec![serde_json::to_value(&element)?])
            .await?;
        ::log::info!("Clicked reveal control {}", css);
        Ok(())
    }
}

async fn try_connect(url: &str, caps: &Capabilities) -> std::result::Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(caps.clone());
    builder.connect(url).await
}

fn capabilities(headless: bool) -> Capabilities {
    let chrome_args = if headless {
        vec!["--headless", "--no-sandbox", "--disable-dev-shm-usage"]
    } else {
        vec!["--start-maximized"]
    };
    let firefox_args: Vec<&str> = if headless { vec!["-headless"] } else { vec![] };

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

#[async_trait]
impl Renderer for WebDriverSession {
    async fn render(&mut self, url: &str) -> Result<()> {
        ::log::debug!("RENDER: {}", url);
        self.client()?.goto(url).await?;
        Ok(())
    }

    async fn current_metric(&mut self) -> Result<i64> {
        let value = self.client()?.execute(DOCUMENT_HEIGHT, vec![]).await?;
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|h| h as i64))
            .ok_or_else(|| Error::Script(format!("document height was {value}")))
    }

    async fn current_markup(&mut self) -> Result<String> {
        Ok(self.client()?.source().await?)
    }

    async fn perform_reveal(&mut self, strategy: &RevealStrategy) -> Result<()> {
        match strategy {
            RevealStrategy::Scroll => {
                self.client()?.execute(SCROLL_TO_BOTTOM, vec![]).await?;
                Ok(())
            }
            RevealStrategy::Click { control } => self.click_control(control).await,
            RevealStrategy::Static => Ok(()),
        }
    }

    async fn set_load_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.client()?
            .update_timeouts(TimeoutConfiguration::new(None, Some(timeout), None))
            .await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.close().await?;
            ::log::debug!("Closed browser session at {}", self.endpoint);
        }
        Ok(())
    }
}

impl Drop for WebDriverSession {
    fn drop(&mut self) {
        let Some(client) = self.client.take() else {
            return;
        };

        ::log::warn!("Browser session dropped while open, closing it in the background");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        ::log::warn!("Failed to close browser session: {}", e);
                    }
                });
            }
            Err(e) => ::log::warn!(
                "No tokio runtime to close the browser session at {}, it may stay open: {}",
                self.endpoint,
                e
            ),
        }
    }
}
