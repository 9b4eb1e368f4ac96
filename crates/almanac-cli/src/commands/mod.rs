mod feed;
mod sources;

use std::sync::Arc;
use std::time::Duration;

use almanac_core::{Aggregator, AggregatorBuilder, AlmanacConfig, FeedResponse};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub use sources::SourceRow;

/// Result of one CLI invocation, ready for rendering.
pub enum CommandOutput {
    Feed(FeedResponse),
    Sources(Vec<SourceRow>),
}

impl CommandOutput {
    pub fn served_fallback(&self) -> bool {
        matches!(self, Self::Feed(response) if response.is_fallback())
    }
}

pub async fn run(cli: &Cli) -> Result<CommandOutput, CliError> {
    let aggregator = Arc::new(build_aggregator(cli.timeout_ms)?);

    match &cli.command {
        Command::Events(args) => feed::events(args, aggregator).await,
        Command::Scotus(args) => feed::scotus(args, aggregator).await,
        Command::Regulations(args) => feed::regulations(args, aggregator).await,
        Command::Sources => Ok(sources::run(&aggregator)),
    }
}

fn build_aggregator(timeout_ms: Option<u64>) -> Result<Aggregator, CliError> {
    let mut config = AlmanacConfig::from_env()?;
    if let Some(timeout_ms) = timeout_ms {
        if timeout_ms == 0 {
            return Err(CliError::Command(String::from(
                "--timeout-ms must be greater than zero",
            )));
        }
        config = config.with_adapter_timeout(Duration::from_millis(timeout_ms));
    }
    Ok(AggregatorBuilder::new(config).build())
}
