//! Page completion: reveal more content until the page stops changing.

use crate::config::{RevealStrategy, Timings};
use crate::error::Result;
use crate::render::Renderer;
use crate::results::PageState;
use std::time::Duration;

/// Tuning for [`load_until_stable`]
#[derive(Debug, Clone)]
pub struct CompletionOptions {
    /// Wait after each scroll before measuring
    pub scroll_delay: Duration,

    /// Wait after each successful click
    pub click_delay: Duration,

    /// Consecutive unchanged measurements needed before a scrolled page counts as complete
    pub idle_checks: usize,

    /// Hard cap on reveal rounds
    pub max_rounds: Option<usize>,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            scroll_delay: Duration::from_secs(2),
            click_delay: Duration::from_secs(5),
            idle_checks: 1,
            max_rounds: None,
        }
    }
}

impl CompletionOptions {
    pub fn from_timings(timings: &Timings, max_rounds: Option<usize>) -> Self {
        Self {
            scroll_delay: timings.scroll_delay(),
            click_delay: timings.click_delay(),
            idle_checks: 1,
            max_rounds,
        }
    }

    fn exhausted(&self, rounds: usize) -> bool {
        self.max_rounds.is_some_and(|max| rounds >= max)
    }
}

/// Reveals content on the current page until it looks complete.
///
/// Stability is inferred from the environment: the height stops growing
/// (scroll) or the control can no longer be clicked (click). Any error while
/// revealing or measuring ends the loop, so the returned state is best effort
/// complete. Only failing to read the final markup is reported as an error.
pub async fn load_until_stable<R>(
    renderer: &mut R,
    strategy: &RevealStrategy,
    options: &CompletionOptions,
) -> Result<PageState>
where
    R: Renderer + ?Sized,
{
    let measured_height = match strategy {
        RevealStrategy::Scroll => scroll_until_stable(renderer, strategy, options).await,
        RevealStrategy::Click { .. } => click_until_exhausted(renderer, strategy, options).await,
        RevealStrategy::Static => renderer.current_metric().await.unwrap_or_else(|e| {
            ::log::debug!("Could not measure static page: {}", e);
            0
        }),
    };

    let rendered_markup = renderer.current_markup().await?;

    Ok(PageState {
        measured_height,
        rendered_markup,
    })
}

async fn scroll_until_stable<R>(
    renderer: &mut R,
    strategy: &RevealStrategy,
    options: &CompletionOptions,
) -> i64
where
    R: Renderer + ?Sized,
{
    let mut last_height = match renderer.current_metric().await {
        Ok(height) => height,
        Err(e) => {
            ::log::warn!("Could not measure page height, taking page as is: {}", e);
            return 0;
        }
    };

    let idle_checks = options.idle_checks.max(1);
    let mut idle = 0;
    let mut rounds = 0;

    while !options.exhausted(rounds) {
        rounds += 1;

        if let Err(e) = renderer.perform_reveal(strategy).await {
            ::log::info!("Scrolling stopped after {} rounds: {}", rounds, e);
            break;
        }

        tokio::time::sleep(options.scroll_delay).await;

        let height = match renderer.current_metric().await {
            Ok(height) => height,
            Err(e) => {
                ::log::info!("Height probe failed after {} rounds: {}", rounds, e);
                break;
            }
        };

        if height == last_height {
            idle += 1;
            if idle >= idle_checks {
                ::log::info!("Page height settled at {} after {} rounds", height, rounds);
                break;
            }
        } else {
            ::log::debug!("Page height grew from {} to {}", last_height, height);
            idle = 0;
            last_height = height;
        }
    }

    last_height
}

async fn click_until_exhausted<R>(
    renderer: &mut R,
    strategy: &RevealStrategy,
    options: &CompletionOptions,
) -> i64
where
    R: Renderer + ?Sized,
{
    let mut clicks = 0;

    while !options.exhausted(clicks) {
        match renderer.perform_reveal(strategy).await {
            Ok(()) => {
                clicks += 1;
                ::log::debug!("Reveal control clicked {} times", clicks);
                tokio::time::sleep(options.click_delay).await;
            }
            Err(e) => {
                ::log::info!("All items loaded or control gone after {} clicks: {}", clicks, e);
                break;
            }
        }
    }

    renderer.current_metric().await.unwrap_or_else(|e| {
        ::log::debug!("Could not measure page after clicking: {}", e);
        0
    })
}
