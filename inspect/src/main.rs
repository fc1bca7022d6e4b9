use anyhow::Result;
use catalog::persist::load_catalog;
use catalog::PageRequest;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(name = "inspect")]
#[command(about = "Validate a course dataset and query it offline", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a dataset file
    Check {
        /// Dataset path (JSON array of courses)
        #[arg(long)]
        data: String,
    },
    /// Run a title keyword search against a dataset file
    Search {
        /// Dataset path (JSON array of courses)
        #[arg(long)]
        data: String,
        /// Comma-separated title words; omit to page through every course
        #[arg(long, default_value = "")]
        words: String,
        #[arg(long, default_value_t = 1)]
        page_number: i64,
        #[arg(long, default_value_t = 10)]
        page_size: i64,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { data } => check(&data),
        Commands::Search { data, words, page_number, page_size } => search(&data, &words, page_number, page_size),
    }
}

fn check(data: &str) -> Result<()> {
    let catalog = load_catalog(data)?;
    println!("{}: {} courses, {} keywords", data, catalog.len(), catalog.keyword_count());
    Ok(())
}

fn search(data: &str, words: &str, page_number: i64, page_size: i64) -> Result<()> {
    let catalog = load_catalog(data)?;
    let page = PageRequest::new(page_number, page_size)?;
    let words: Vec<&str> = words.split(',').collect();
    let result = catalog.list(&words, page);
    tracing::info!(hits = result.metadata.record_count, returned = result.data.len(), "search complete");
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
