use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};

use cb_resolver::apis::crunchbase::CrunchbaseClient;
use cb_resolver::config::Config;
use cb_resolver::constants::API_KEY_ENV;
use cb_resolver::input;
use cb_resolver::logging;
use cb_resolver::resolver::Resolver;
use cb_resolver::sink::CsvSink;
use cb_resolver::types::EntityKind;

#[derive(Parser)]
#[command(name = "cb_resolver")]
#[command(about = "Batch Crunchbase entity lookup resolver")]
#[command(version = "0.1.0")]
struct Cli {
    /// File with one entity UUID per line
    #[arg(long)]
    input: PathBuf,

    /// Output CSV file
    #[arg(long, default_value = "resolved.csv")]
    output: PathBuf,

    /// Entity collection to resolve against
    #[arg(long, value_enum, default_value_t = EntityKind::Organizations)]
    entity: EntityKind,

    /// Config file path
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();

    let config = if cli.config.exists() {
        Config::load(&cli.config)?
    } else {
        info!("No config file at {}, using defaults", cli.config.display());
        Config::default()
    };

    let api_key = std::env::var(API_KEY_ENV)
        .map_err(|_| format!("{} must be set to a Crunchbase API key", API_KEY_ENV))?;

    let ids = input::read_identifiers(&cli.input)?;
    println!(
        "🔎 Resolving {} identifiers against {}...",
        ids.len(),
        cli.entity
    );

    let span = tracing::info_span!("Resolving entities", entity = %cli.entity);
    let _enter = span.enter();

    let client = CrunchbaseClient::new(
        cli.entity,
        api_key,
        Duration::from_secs(config.crunchbase.timeout_seconds),
    )?;
    let mut sink = CsvSink::create(&cli.output)?;
    let resolver = Resolver::new(
        Box::new(client),
        Duration::from_millis(config.crunchbase.delay_ms),
    );

    info!("Starting resolution run");
    match resolver.run(&ids, &mut sink).await {
        Ok(report) => {
            info!("Resolution run finished");
            println!("\n📊 Resolution results for {}:", cli.entity);
            println!("   Total identifiers: {}", report.total);
            println!("   Resolved: {}", report.resolved);
            println!("   Not found: {}", report.not_found);
            println!("   Unexpected shape: {}", report.unexpected_shape);
            println!("   Output file: {}", report.output_file);
            Ok(())
        }
        Err(e) => {
            error!("Resolution run failed: {}", e);
            println!("❌ Resolution run failed: {}", e);
            Err(e.into())
        }
    }
}
