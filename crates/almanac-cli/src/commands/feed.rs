use std::sync::Arc;

use almanac_core::{Aggregator, Feed, FeedKind, FeedQuery};
use tracing::warn;

use crate::cli::{EventsArgs, LimitArgs, ScotusArgs};
use crate::error::CliError;

use super::CommandOutput;

pub async fn events(
    args: &EventsArgs,
    aggregator: Arc<Aggregator>,
) -> Result<CommandOutput, CliError> {
    let mut query = query_with_limit(&args.limit);
    if let Some(category) = &args.category {
        query = query.with_category(category.as_str());
    }
    Ok(respond(FeedKind::Events, aggregator, &query).await)
}

pub async fn scotus(
    args: &ScotusArgs,
    aggregator: Arc<Aggregator>,
) -> Result<CommandOutput, CliError> {
    let mut query = query_with_limit(&args.limit);
    if let Some(term) = args.term {
        query = query.with_term(term.to_string());
    }
    Ok(respond(FeedKind::Scotus, aggregator, &query).await)
}

pub async fn regulations(
    args: &LimitArgs,
    aggregator: Arc<Aggregator>,
) -> Result<CommandOutput, CliError> {
    let query = query_with_limit(args);
    Ok(respond(FeedKind::Regulations, aggregator, &query).await)
}

fn query_with_limit(args: &LimitArgs) -> FeedQuery {
    match args.limit {
        Some(limit) => FeedQuery::default().with_limit(limit.to_string()),
        None => FeedQuery::default(),
    }
}

async fn respond(kind: FeedKind, aggregator: Arc<Aggregator>, query: &FeedQuery) -> CommandOutput {
    let response = Feed::new(kind, aggregator).respond(query).await;
    if let Some(error) = response.error() {
        warn!(
            feed = kind.as_str(),
            count = response.events().len(),
            "no live data, printing fallback records: {error}"
        );
    }
    CommandOutput::Feed(response)
}

#[cfg(test)]
mod tests {
    use almanac_core::{AggregatorBuilder, AlmanacConfig};

    use super::*;

    fn empty_aggregator() -> Arc<Aggregator> {
        Arc::new(
            AggregatorBuilder::new(AlmanacConfig::default())
                .without_builtin_adapters()
                .build(),
        )
    }

    #[tokio::test]
    async fn events_without_sources_serve_fallback_for_the_category() {
        let args = EventsArgs {
            category: Some(String::from("judicial")),
            limit: LimitArgs { limit: Some(1) },
        };

        let output = events(&args, empty_aggregator()).await.expect("feed runs");

        assert!(output.served_fallback());
        let CommandOutput::Feed(response) = output else {
            panic!("expected a feed response");
        };
        assert_eq!(response.events().len(), 1);
        assert_eq!(response.events()[0].id, "fallback-judicial-1");
    }

    #[tokio::test]
    async fn regulations_fallback_is_newest_first() {
        let output = regulations(&LimitArgs { limit: None }, empty_aggregator())
            .await
            .expect("feed runs");

        let CommandOutput::Feed(response) = output else {
            panic!("expected a feed response");
        };
        let dates: Vec<&str> = response.events().iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, ["2024-06-20", "2024-06-03"]);
    }

    #[test]
    fn limit_is_forwarded_verbatim() {
        let query = query_with_limit(&LimitArgs { limit: Some(-3) });
        assert_eq!(query.limit.as_deref(), Some("-3"));
        assert_eq!(query_with_limit(&LimitArgs { limit: None }).limit, None);
    }
}
