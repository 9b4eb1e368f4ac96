use std::process::ExitCode;
use std::sync::Arc;

use almanac_core::{AggregatorBuilder, AlmanacConfig};
use almanac_web::{app, AppState, WebConfig, WebError};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("almanac=info")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("almanac web server stopped: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), WebError> {
    let config = AlmanacConfig::from_env()?;
    let web = WebConfig::from_env()?;

    let aggregator = AggregatorBuilder::new(config).build();
    for source in aggregator.snapshots() {
        info!(
            provider = %source.id,
            category = %source.category,
            status = source.status_label(),
            "registered source"
        );
    }

    let router = app(AppState::new(Arc::new(aggregator)));
    let address = web.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|source| WebError::Bind {
            address: address.clone(),
            source,
        })?;

    info!("almanac web server listening on {address}");
    axum::serve(listener, router).await?;
    Ok(())
}
