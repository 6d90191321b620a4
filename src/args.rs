use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use yield_products::{DetailSource, ElementSelector, OutputFormat, RevealStrategy, SiteConfig};

#[derive(Parser, Debug)]
#[command(name = "yield-products")]
#[command(about = "Harvests product records from a dynamically loaded listing page")]
#[command(version)]
pub struct Args {
    /// Listing page URL (overrides the preset or config file URL)
    pub url: Option<String>,

    /// JSON site configuration file
    #[arg(short, long, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Built-in site configuration (laptopengine, revibe)
    #[arg(short, long)]
    pub preset: Option<String>,

    /// CSS selector matching one product on the listing page
    #[arg(long)]
    pub item: Option<String>,

    /// How more products are revealed on the listing page
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// CSS selector of the "load more" control (implies the click strategy)
    #[arg(long)]
    pub load_more: Option<String>,

    /// WebDriver endpoint
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Run the browser without a window
    #[arg(long)]
    pub headless: bool,

    /// Only read the listing page, do not visit product pages
    #[arg(long, conflicts_with = "http_details")]
    pub no_details: bool,

    /// Fetch product pages over plain HTTP instead of the browser
    #[arg(long)]
    pub http_details: bool,

    /// Store prices as numbers
    #[arg(long)]
    pub coerce_price: bool,

    /// Directory the export file is written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Export format
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Upper bound on reveal rounds
    #[arg(long)]
    pub max_rounds: Option<usize>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Scroll,
    Click,
    Static,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Json,
    Xlsx,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Xlsx => OutputFormat::Xlsx,
        }
    }
}

/// Builds the site configuration from a config file, a preset or bare flags, then applies overrides
pub fn build_config(args: &Args) -> Result<SiteConfig, String> {
    let mut config = if let Some(path) = &args.config {
        SiteConfig::from_file(path).map_err(|e| format!("{}: {}", path.display(), e))?
    } else if let Some(name) = &args.preset {
        SiteConfig::preset(name).ok_or_else(|| {
            format!(
                "unknown preset `{}` (available: {})",
                name,
                SiteConfig::preset_names().join(", ")
            )
        })?
    } else {
        let url = args
            .url
            .as_deref()
            .ok_or("a listing URL, --config or --preset is required")?;
        let item = args
            .item
            .as_deref()
            .ok_or("--item is required without --config or --preset")?;
        SiteConfig::new(url, ElementSelector::css(item))
    };

    if let Some(url) = &args.url {
        config.listing_url = url.clone();
    }
    if let Some(item) = &args.item {
        config.selectors.item = ElementSelector::css(item);
    }

    match (args.strategy, &args.load_more) {
        (Some(StrategyArg::Click), None) => {
            if !matches!(config.reveal, RevealStrategy::Click { .. }) {
                return Err("--strategy click needs --load-more".to_string());
            }
        }
        (Some(StrategyArg::Scroll), None) => config.reveal = RevealStrategy::Scroll,
        (Some(StrategyArg::Static), None) => config.reveal = RevealStrategy::Static,
        (None | Some(StrategyArg::Click), Some(control)) => {
            config.reveal = RevealStrategy::Click {
                control: ElementSelector::css(control),
            }
        }
        (Some(other), Some(_)) => {
            return Err(format!("--load-more conflicts with --strategy {other:?}"));
        }
        (None, None) => {}
    }

    if let Some(url) = &args.webdriver_url {
        config.webdriver_url = url.clone();
    }
    if args.headless {
        config.headless = true;
    }
    if args.no_details {
        config.detail_source = DetailSource::Skip;
    } else if args.http_details {
        config.detail_source = DetailSource::Http;
    }
    if args.coerce_price {
        config.coerce_price = true;
    }
    if let Some(format) = args.format {
        config.output_format = format.into();
    }
    if args.max_rounds.is_some() {
        config.max_reveal_rounds = args.max_rounds;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}
