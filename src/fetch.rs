//! Detail page retrieval for the enrichment pass.

use crate::completion::{CompletionOptions, load_until_stable};
use crate::config::RevealStrategy;
use crate::error::Result;
use crate::render::Renderer;
use async_trait::async_trait;
use std::time::Duration;

/// Source of detail page markup
#[async_trait]
pub trait DetailFetcher: Send {
    async fn fetch(&mut self, url: &str) -> Result<String>;
}

/// Re-renders each detail page in the listing's browser session
pub struct BrowserFetcher<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    reveal: RevealStrategy,
    completion: CompletionOptions,
    load_timeout: Duration,
    settle: Duration,
    timeout_applied: bool,
}

impl<'a, R: Renderer + ?Sized> BrowserFetcher<'a, R> {
    pub fn new(renderer: &'a mut R, load_timeout: Duration, settle: Duration) -> Self {
        Self {
            renderer,
            reveal: RevealStrategy::Static,
            completion: CompletionOptions::default(),
            load_timeout,
            settle,
            timeout_applied: false,
        }
    }

    /// Reveal content on every detail page before reading it
    pub fn with_reveal(mut self, reveal: RevealStrategy, completion: CompletionOptions) -> Self {
        self.reveal = reveal;
        self.completion = completion;
        self
    }
}

#[async_trait]
impl<R: Renderer + ?Sized> DetailFetcher for BrowserFetcher<'_, R> {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        // The load timeout only applies to detail pages, never the listing
        if !self.timeout_applied {
            self.renderer.set_load_timeout(self.load_timeout).await?;
            self.timeout_applied = true;
        }

        self.renderer.render(url).await?;
        tokio::time::sleep(self.settle).await;

        if self.reveal == RevealStrategy::Static {
            return self.renderer.current_markup().await;
        }

        let state = load_until_stable(&mut *self.renderer, &self.reveal, &self.completion).await?;
        Ok(state.rendered_markup)
    }
}

/// Plain HTTP GET for detail pages that need no scripting
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Identifies as `user_agent`; each request is bounded by `timeout`
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl DetailFetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> Result<String> {
        ::log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}
