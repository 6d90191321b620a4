use thiserror::Error;

/// Errors raised while harvesting a listing.
///
/// Only the session variants are fatal to a run. Everything raised while
/// revealing content or enriching a single item is caught where it happens
/// and turned into default field values.
#[derive(Debug, Error)]
pub enum Error {
    /// The WebDriver endpoint refused to create a session
    #[error("failed to start a browser session at {url}: {source}")]
    Session {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// None of the configured or fallback WebDriver endpoints answered
    #[error("no WebDriver server reachable (tried: {0})")]
    NoWebDriver(String),

    /// The session was used after `close()`
    #[error("browser session already closed")]
    SessionClosed,

    #[error("browser command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// The "load more" control was missing, hidden or disabled
    #[error("reveal control `{0}` is not available")]
    ControlUnavailable(String),

    #[error("unexpected script result: {0}")]
    Script(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid selector `{0}`")]
    Selector(String),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for failures that must abort the whole run
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Session { .. } | Error::NoWebDriver(_))
    }

    /// Which stage of a run failed, for the CLI diagnostic
    pub fn summary(&self) -> &'static str {
        if self.is_fatal() {
            "Could not start a browser session"
        } else {
            "Harvest failed"
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
