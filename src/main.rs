use clap::Parser;
use yield_products::{Harvest, sink};

mod args;
use args::{Args, build_config};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Invalid arguments: {}", e);
            std::process::exit(2);
        }
    };

    println!("Note: Harvesting requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
    );

    let columns = config.columns.clone();
    let format = config.output_format;

    let start_time = std::time::Instant::now();
    ::log::info!("Starting harvest of {}", config.listing_url);

    let records = match Harvest::new(config).run().await {
        Ok(records) => records,
        Err(e) => {
            ::log::error!("{}: {}", e.summary(), e);
            std::process::exit(1);
        }
    };

    match sink::export(&records, &columns, format, &args.output_dir) {
        Ok(path) => println!("Saved {} products to {}", records.len(), path.display()),
        Err(e) => {
            ::log::error!("Failed to write output: {}", e);
            std::process::exit(1);
        }
    }

    let duration = start_time.elapsed();
    ::log::info!(
        "Harvest complete - {} products in {:.2} seconds",
        records.len(),
        duration.as_secs_f64()
    );
}
