use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use scrapex_common::observability::{LogConfig, init_logging};
use scrapex_config::{ScrapexConfig, ScrapexConfigLoader, default_config_path};
use scrapex_web::Scraper;

use cli::Cli;
mod cli;

const LOCAL_CONFIG: &str = "scrapex.yaml";

fn load_config(cli: &Cli) -> Result<ScrapexConfig> {
    let loader = match &cli.config {
        Some(path) => ScrapexConfigLoader::new().with_file(path),
        None => {
            let mut loader = ScrapexConfigLoader::new();
            if let Some(user) = default_config_path() {
                loader = loader.with_optional_file(user);
            }
            // Working-directory file wins over the user-wide one.
            loader.with_optional_file(LOCAL_CONFIG)
        }
    };
    loader.load().context("failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;

    let log_path = init_logging(LogConfig {
        emit_stderr: cli.verbose,
        ..LogConfig::default()
    })?;
    tracing::info!(
        address = %cli.address,
        direct = cli.direct,
        relays = cfg.relays.len(),
        log = %log_path.display(),
        "scrape.start"
    );

    let options = cli.options(cfg.options);
    let scraper = if cli.direct {
        Scraper::direct(&cfg.fetch)?
    } else {
        Scraper::with_relays(cfg.relays, &cfg.fetch)?
    };

    let result = scraper.scrape(&cli.address, options).await;
    let rendered = if cli.compact {
        serde_json::to_string(&result)?
    } else {
        serde_json::to_string_pretty(&result)?
    };
    println!("{rendered}");

    Ok(if result.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
