use clap::Parser;
use std::error::Error;
use std::path::PathBuf;
use yield_products::{DetailSource, Harvest, sink};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in site configuration
    #[arg(short, long, default_value = "revibe")]
    preset: String,

    /// Path to a JSON site configuration (replaces the preset)
    #[arg(short, long)]
    config_file: Option<String>,

    /// Listing URL override
    #[arg(short, long)]
    url: Option<String>,

    /// Stop after this many reveal rounds
    #[arg(short, long)]
    max_rounds: Option<usize>,

    /// Skip product pages
    #[arg(long)]
    listing_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args = Args::parse();

    let mut harvest = match &args.config_file {
        Some(path) => {
            println!("Loading configuration from file: {}", path);
            Harvest::from_config_file(path)?
        }
        None => Harvest::preset(&args.preset)?,
    };

    if let Some(url) = &args.url {
        harvest = harvest.with_listing_url(url);
    }
    if let Some(rounds) = args.max_rounds {
        println!("Capping reveal rounds at {}", rounds);
        harvest = harvest.with_max_rounds(rounds);
    }
    if args.listing_only {
        harvest = harvest.with_detail_source(DetailSource::Skip);
    }

    let columns = harvest.config().columns.clone();
    let format = harvest.config().output_format;
    println!("Harvesting {}", harvest.config().listing_url);

    let records = harvest.with_headless(true).run().await?;
    for record in records.iter().take(5) {
        println!("{} | {} | {}", record.title, record.price, record.link);
    }

    let path = sink::export(&records, &columns, format, &PathBuf::from("."))?;
    println!("Saved {} products to {}", records.len(), path.display());
    Ok(())
}
