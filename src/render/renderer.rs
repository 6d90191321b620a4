use crate::config::RevealStrategy;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A live rendered page that can be navigated, probed and nudged to load more content
#[async_trait]
pub trait Renderer: Send {
    /// Navigate to `url` and wait for the browser to report it loaded
    async fn render(&mut self, url: &str) -> Result<()>;

    /// Current document height
    async fn current_metric(&mut self) -> Result<i64>;

    /// Current page source
    async fn current_markup(&mut self) -> Result<String>;

    /// Scroll to the bottom, or find and click the "load more" control
    async fn perform_reveal(&mut self, strategy: &RevealStrategy) -> Result<()>;

    /// Upper bound for subsequent `render` calls
    async fn set_load_timeout(&mut self, timeout: Duration) -> Result<()>;

    /// Release the underlying session
    async fn close(&mut self) -> Result<()>;
}
