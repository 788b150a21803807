use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use jobtrawl::{
    read_job_links, write_report, AppConfig, BatchPipeline, GeminiClient, PageFetcher,
};

#[derive(Parser)]
#[command(name = "jobtrawl")]
#[command(about = "Extract structured job-posting data into a spreadsheet")]
struct Cli {
    /// Optional config file (yaml); defaults apply when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// URL list, one job posting per line
    #[arg(long)]
    input: Option<PathBuf>,

    /// Report destination; extension picks the format (.xlsx or .csv)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Skip the "Applied Date" column
    #[arg(long)]
    no_applied_date: bool,

    /// Host pattern that gets a visible browser session (repeatable),
    /// replacing the configured rules
    #[arg(long = "headful-host")]
    headful_hosts: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Conventional home for GOOGLE_API_KEY; absence only matters once the
    // first model call fails.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(input) = cli.input {
        config.input_path = input;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if cli.no_applied_date {
        config.applied_date = false;
    }
    if !cli.headful_hosts.is_empty() {
        config.headful_hosts = cli.headful_hosts;
    }

    let urls = read_job_links(&config.input_path)?;
    info!(
        "Processing {} urls from {}",
        urls.len(),
        config.input_path.display()
    );

    let fetcher = PageFetcher::new(config.headful_hosts.clone());
    let extractor = GeminiClient::from_env()?;

    let mut pipeline = BatchPipeline::new(&fetcher, &extractor);
    if config.applied_date {
        pipeline = pipeline.with_applied_date(chrono::Local::now().date_naive());
    }

    let rows = pipeline.run(&urls).await;
    info!("Extracted {} of {} postings", rows.len(), urls.len());

    write_report(&rows, &config.output_path, config.applied_date)?;

    Ok(())
}
