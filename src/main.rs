use clap::Parser;
use std::time::Duration;

mod cli;
mod config;
mod extract;
mod fetch;
mod generate;
mod ingest;
mod record;
mod store;
#[cfg(test)]
mod tests;

use config::Config;
use fetch::plain::PlainFetcher;
use fetch::PageFetcher;
use generate::gemini::GeminiModel;
use ingest::Ingestor;
use record::{IngestRequest, ResourceType};
use store::{JsonlStore, Store};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("linkdex=info")),
        )
        .init();

    let args = cli::Args::parse();
    let config = Config::load();

    match args.command {
        cli::Command::Add {
            url,
            source,
            no_headless,
        } => {
            let request = IngestRequest {
                url,
                resource_type: ResourceType::Article,
                description: None,
                source: source.or_else(|| Some("cli".to_string())),
            };
            let record = build_ingestor(&config, no_headless)?.ingest(request)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        cli::Command::Tool {
            url,
            description,
            source,
            no_headless,
        } => {
            let request = IngestRequest {
                url,
                resource_type: ResourceType::Resource,
                description,
                source: source.or_else(|| Some("cli".to_string())),
            };
            let record = build_ingestor(&config, no_headless)?.ingest(request)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        cli::Command::List { limit } => {
            let store = JsonlStore::new(config.records_path())?;
            let records = store.list(limit)?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }

    Ok(())
}

fn build_ingestor(config: &Config, no_headless: bool) -> anyhow::Result<Ingestor> {
    let static_fetcher = Box::new(PlainFetcher::new(
        config.user_agent.clone(),
        Duration::from_secs(config.fetch_timeout_secs),
    ));
    let model = Box::new(GeminiModel::from_env(&config.model));
    let store = Box::new(JsonlStore::new(config.records_path())?);

    Ok(Ingestor::new(
        config.clone(),
        static_fetcher,
        dynamic_fetcher(config, no_headless),
        model,
        store,
    ))
}

#[cfg(feature = "headless")]
fn dynamic_fetcher(config: &Config, no_headless: bool) -> Option<Box<dyn PageFetcher>> {
    if no_headless {
        return None;
    }

    Some(Box::new(fetch::DynamicFetcher::new(
        Box::new(fetch::headless::ChromeLauncher::new(
            config.user_agent.clone(),
        )),
        Duration::from_secs(config.navigation_timeout_secs),
        Duration::from_secs(config.settle_delay_secs),
    )))
}

#[cfg(not(feature = "headless"))]
fn dynamic_fetcher(_config: &Config, _no_headless: bool) -> Option<Box<dyn PageFetcher>> {
    None
}
