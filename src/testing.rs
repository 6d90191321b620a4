//! Scripted stand-ins for the browser and the detail fetcher.

use crate::config::RevealStrategy;
use crate::error::{Error, Result};
use crate::fetch::DetailFetcher;
use crate::render::Renderer;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

/// Renderer replaying a fixed height sequence; the last height repeats once the script runs out
#[derive(Debug, Default)]
pub struct ScriptedRenderer {
    pub heights: VecDeque<i64>,
    pub last_height: i64,
    pub markup: String,
    /// Markup served per URL by `render`
    pub pages: HashMap<String, String>,
    /// URLs whose `render` times out
    pub failing: HashSet<String>,
    pub clicks_available: usize,
    pub clicks: usize,
    pub reveals: usize,
    /// Reveals after this many calls fail
    pub fail_reveal_after: Option<usize>,
    pub fail_markup: bool,
    pub rendered: Vec<String>,
    pub load_timeout: Option<Duration>,
    pub closed: bool,
}

impl ScriptedRenderer {
    pub fn with_heights(heights: &[i64]) -> Self {
        Self {
            heights: heights.iter().copied().collect(),
            markup: "<html><body><p>rendered</p></body></html>".to_string(),
            ..Self::default()
        }
    }

    pub fn with_pages(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, markup)| (url.to_string(), markup.to_string()))
                .collect(),
            ..Self::with_heights(&[100])
        }
    }
}

#[async_trait]
impl Renderer for ScriptedRenderer {
    async fn render(&mut self, url: &str) -> Result<()> {
        self.rendered.push(url.to_string());
        if self.failing.contains(url) {
            return Err(Error::Timeout(format!("loading {url}")));
        }
        if let Some(markup) = self.pages.get(url) {
            self.markup = markup.clone();
        }
        Ok(())
    }

    async fn current_metric(&mut self) -> Result<i64> {
        if let Some(height) = self.heights.pop_front() {
            self.last_height = height;
        }
        Ok(self.last_height)
    }

    async fn current_markup(&mut self) -> Result<String> {
        if self.fail_markup {
            return Err(Error::SessionClosed);
        }
        Ok(self.markup.clone())
    }

    async fn perform_reveal(&mut self, strategy: &RevealStrategy) -> Result<()> {
        self.reveals += 1;
        if self.fail_reveal_after.is_some_and(|n| self.reveals > n) {
            return Err(Error::Script("connection dropped".to_string()));
        }

        match strategy {
            RevealStrategy::Click { control } => {
                if self.clicks_available == 0 {
                    return Err(Error::ControlUnavailable(control.to_css()));
                }
                self.clicks_available -= 1;
                self.clicks += 1;
                Ok(())
            }
            RevealStrategy::Scroll | RevealStrategy::Static => Ok(()),
        }
    }

    async fn set_load_timeout(&mut self, timeout: Duration) -> Result<()> {
        self.load_timeout = Some(timeout);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Fetcher serving canned detail pages
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    pub pages: HashMap<String, String>,
    pub timeouts: HashSet<String>,
    pub requested: Vec<String>,
}

impl ScriptedFetcher {
    pub fn new(pages: &[(&str, &str)]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|(url, markup)| (url.to_string(), markup.to_string()))
                .collect(),
            ..Self::default()
        }
    }

    pub fn time_out_on(mut self, url: &str) -> Self {
        self.timeouts.insert(url.to_string());
        self
    }
}

#[async_trait]
impl DetailFetcher for ScriptedFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        self.requested.push(url.to_string());
        if self.timeouts.contains(url) {
            return Err(Error::Timeout(format!("fetching {url}")));
        }
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| Error::Script(format!("no page scripted for {url}")))
    }
}
