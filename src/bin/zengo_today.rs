// Print today's word as JSON
//
// Usage:
//   cargo run --bin zengo_today
//   cargo run --bin zengo_today -- --index 42     (1-based catalog position, wraps)
//
// Resource URLs and retry settings come from the same environment variables
// as the API server.

use anyhow::{bail, Context};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use zengo_daily::{Clock, Config, Fetcher, HttpFetcher, LocalClock, ZenService};

fn parse_index(args: &[String]) -> anyhow::Result<Option<i64>> {
    match args {
        [] => Ok(None),
        [flag, value] if flag == "--index" => {
            let position: i64 = value
                .parse()
                .with_context(|| format!("--index expects an integer, got {:?}", value))?;
            let index = position
                .checked_sub(1)
                .with_context(|| format!("--index {} is out of range", position))?;
            Ok(Some(index))
        }
        _ => bail!("usage: zengo_today [--index N]"),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("zengo_daily=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let index = parse_index(&args)?;

    let config = Config::from_env();
    config.validate()?;
    let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::new()?);
    let clock: Arc<dyn Clock> = Arc::new(LocalClock);
    let service = ZenService::new(&config, fetcher, clock);

    let view = match index {
        Some(i) => service.at_index(i).await,
        None => service.today().await,
    };

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
