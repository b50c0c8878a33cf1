//! Config Ingest CLI
//!
//! Fetches a config from a URL, verifies it, and prints it in the current
//! schema.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use provision_config::config::OutputFormat;
use provision_config::{ingest, FetchOptions, Fetcher, HashAlgorithm, Settings};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "provision-ingest")]
#[command(about = "Fetch, verify and normalize a provisioning config")]
struct Cli {
    /// URL of the config (data:, oem:, ...)
    url: String,

    /// Declared compression of the resource
    #[arg(short, long)]
    compression: Option<String>,

    /// Expected digest, e.g. sha512-<hex>
    #[arg(long)]
    hash: Option<String>,

    /// Settings file
    #[arg(long)]
    config: Option<String>,

    /// Write the verified bytes without parsing them
    #[arg(long)]
    raw: bool,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load_from(cli.config.as_deref()).context("loading settings")?;
    let fetcher = Fetcher::from_settings(&settings.fetch);
    let url = Url::parse(&cli.url).with_context(|| format!("parsing {}", cli.url))?;

    let mut opts = FetchOptions {
        compression: cli.compression,
        timeout: settings.fetch.timeout(),
        ..FetchOptions::default()
    };
    if let Some(hash) = cli.hash.as_deref() {
        let (algorithm, sum) = HashAlgorithm::parse_verification(hash)?;
        opts = opts.with_verification(algorithm, sum);
    }

    let output = if cli.raw {
        fetcher.fetch_to_buffer(&url, &opts)?
    } else {
        let config = ingest::load(&fetcher, &url, &opts)?;
        let mut json = match settings.ingest.output_format {
            OutputFormat::Pretty => serde_json::to_vec_pretty(&config)?,
            OutputFormat::Compact => serde_json::to_vec(&config)?,
        };
        json.push(b'\n');
        json
    };

    match cli.output {
        Some(path) => std::fs::write(&path, &output)
            .with_context(|| format!("writing {}", path.display()))?,
        None => std::io::stdout().write_all(&output)?,
    }
    Ok(())
}
