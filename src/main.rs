//! Photocurate command-line entrypoint.
//!
//! ```text
//! photocurate [--max N] [--city CITY] <query words...>
//! ```
//!
//! With `--city`, the query words are treated as an article title and reduced to
//! an image query first. Accepted candidates are printed as JSON.

use anyhow::bail;
use clap::Parser;
use mimalloc::MiMalloc;

use photocurate::config::Config;
use photocurate::curator::ImageCurator;
use photocurate::events::Diagnostics;
use photocurate::search::build_image_query;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Command-line arguments for photocurate
#[derive(Parser, Debug)]
#[command(name = "photocurate")]
#[command(about = "Find license-cleared editorial photos for a query")]
#[command(version)]
struct Args {
    /// Query words (an article title when --city is set)
    #[arg(required = true)]
    query: Vec<String>,

    /// Maximum number of accepted photos
    #[arg(short = 'n', long = "max", default_value_t = 5, env = "PHOTOCURATE_MAX_RESULTS")]
    max_results: usize,

    /// City appended to the reduced title query
    #[arg(long)]
    city: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = Config::from_env()?;
    config.validate()?;
    if config.searxng_url.is_none() {
        bail!("PHOTOCURATE_SEARXNG_URL is not set");
    }

    let query = match &args.city {
        Some(city) => build_image_query(&args.query.join(" "), city),
        None => args.query.join(" "),
    };

    tracing::info!(
        query = %query,
        max_results = args.max_results,
        workers = config.workers,
        "Photocurate starting"
    );

    let diagnostics = Diagnostics::new()
        .with_fault(|stage, err| tracing::error!(stage, error = %err, "Validation worker fault"))
        .with_classification(|event| {
            tracing::info!(
                url = %event.url,
                class = %event.class,
                confidence = event.confidence,
                source = %event.source,
                "Classification decision"
            )
        });

    let curator = ImageCurator::builder(config)
        .diagnostics(diagnostics)
        .build()?;

    let accepted = curator.search_images(&query, args.max_results).await;
    println!("{}", serde_json::to_string_pretty(&accepted)?);

    Ok(())
}
