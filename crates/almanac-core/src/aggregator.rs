//! Concurrent fan-out over the registered provider adapters.

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::future::join_all;
use futures::FutureExt;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::adapters::{
    CongressAdapter, CourtListenerAdapter, FredAdapter, RegulationsAdapter, TreasuryAdapter,
};
use crate::config::{AlmanacConfig, DEFAULT_ADAPTER_TIMEOUT};
use crate::data_source::{DataSource, FetchRequest};
use crate::http_client::{HttpClient, ReqwestHttpClient};
use crate::{Category, CategoryFilter, NormalizedRecord, ProviderId};

/// Merged output of one aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    /// Records in adapter registration order, then emission order.
    pub records: Vec<NormalizedRecord>,
    /// Providers invoked, in registration order.
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("no records available from {} for this request", describe_chain(.source_chain))]
    NoData {
        source_chain: Vec<ProviderId>,
        latency_ms: u64,
    },
    #[error("aggregation fault: {message}")]
    Fault { message: String },
}

fn describe_chain(chain: &[ProviderId]) -> String {
    if chain.is_empty() {
        return String::from("any source");
    }
    chain
        .iter()
        .map(|provider| provider.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Source snapshot used by the `sources` CLI command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceSnapshot {
    pub id: ProviderId,
    pub category: Category,
    pub configured: bool,
}

impl SourceSnapshot {
    pub fn label(self) -> &'static str {
        self.id.label()
    }

    pub fn status_label(self) -> &'static str {
        if self.configured {
            "configured"
        } else {
            "missing_credential"
        }
    }
}

/// Adapter registry and fan-out engine. Holds no per-request state.
pub struct Aggregator {
    adapters: Vec<Arc<dyn DataSource>>,
    adapter_timeout: Duration,
}

impl Aggregator {
    pub fn new(adapters: Vec<Arc<dyn DataSource>>) -> Self {
        Self {
            adapters,
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
        }
    }

    pub fn with_adapter_timeout(mut self, adapter_timeout: Duration) -> Self {
        self.adapter_timeout = adapter_timeout;
        self
    }

    pub fn adapter_timeout(&self) -> Duration {
        self.adapter_timeout
    }

    /// Adapters whose category matches `filter`, in registration order.
    pub fn select(&self, filter: CategoryFilter) -> Vec<Arc<dyn DataSource>> {
        self.adapters
            .iter()
            .filter(|adapter| filter.matches(adapter.category()))
            .cloned()
            .collect()
    }

    pub fn snapshots(&self) -> Vec<SourceSnapshot> {
        self.adapters
            .iter()
            .map(|adapter| SourceSnapshot {
                id: adapter.id(),
                category: adapter.category(),
                configured: adapter.configured(),
            })
            .collect()
    }

    /// Runs every selected adapter concurrently and concatenates their records.
    ///
    /// # Errors
    ///
    /// Returns [`AggregateError::NoData`] when no selected adapter produced a record.
    pub async fn aggregate(&self, req: &FetchRequest) -> Result<Aggregation, AggregateError> {
        let started = Instant::now();
        let selected = self.select(req.filter);
        let source_chain: Vec<ProviderId> = selected.iter().map(|adapter| adapter.id()).collect();

        let batches = join_all(
            selected
                .iter()
                .map(|adapter| self.invoke(adapter.as_ref(), req)),
        )
        .await;

        let mut seen = HashSet::new();
        let mut records = Vec::new();
        for (provider, batch) in source_chain.iter().zip(batches) {
            for record in batch {
                if let Err(error) = record.validate() {
                    warn!(provider = %provider, "dropping malformed record: {error}");
                    continue;
                }
                if !seen.insert(record.id.clone()) {
                    debug!(provider = %provider, id = %record.id, "dropping duplicate record id");
                    continue;
                }
                records.push(record);
            }
        }

        let latency_ms = started.elapsed().as_millis() as u64;
        if records.is_empty() {
            warn!(
                filter = %req.filter,
                sources = source_chain.len(),
                latency_ms,
                "no adapter produced records"
            );
            return Err(AggregateError::NoData {
                source_chain,
                latency_ms,
            });
        }

        info!(
            filter = %req.filter,
            count = records.len(),
            sources = source_chain.len(),
            latency_ms,
            "aggregation complete"
        );
        Ok(Aggregation {
            records,
            source_chain,
            latency_ms,
        })
    }

    async fn invoke(&self, adapter: &dyn DataSource, req: &FetchRequest) -> Vec<NormalizedRecord> {
        let provider = adapter.id();
        let guarded = AssertUnwindSafe(adapter.fetch(req)).catch_unwind();

        match tokio::time::timeout(self.adapter_timeout, guarded).await {
            Ok(Ok(records)) => {
                debug!(provider = %provider, count = records.len(), "adapter finished");
                records
            }
            Ok(Err(_)) => {
                warn!(provider = %provider, "adapter panicked, continuing without its records");
                Vec::new()
            }
            Err(_) => {
                warn!(
                    provider = %provider,
                    timeout_ms = self.adapter_timeout.as_millis() as u64,
                    "adapter timed out, continuing without its records"
                );
                Vec::new()
            }
        }
    }
}

/// Builds an [`Aggregator`] from explicit configuration.
///
/// Credentials come from [`AlmanacConfig`]; adapters never read the
/// environment themselves.
///
/// # Example
///
/// ```rust,ignore
/// use almanac_core::{AggregatorBuilder, AlmanacConfig, ProviderId};
///
/// let aggregator = AggregatorBuilder::new(AlmanacConfig::from_env()?)
///     .with_provider_enabled(ProviderId::Treasury, false)
///     .build();
/// ```
pub struct AggregatorBuilder {
    config: AlmanacConfig,
    http_client: Option<Arc<dyn HttpClient>>,
    disabled: HashSet<ProviderId>,
    extra_adapters: Vec<Arc<dyn DataSource>>,
}

impl AggregatorBuilder {
    pub fn new(config: AlmanacConfig) -> Self {
        Self {
            config,
            http_client: None,
            disabled: HashSet::new(),
            extra_adapters: Vec::new(),
        }
    }

    /// Shares `http_client` across every built-in adapter.
    pub fn with_http_client(mut self, http_client: Arc<dyn HttpClient>) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn with_provider_enabled(mut self, provider: ProviderId, enabled: bool) -> Self {
        if enabled {
            self.disabled.remove(&provider);
        } else {
            self.disabled.insert(provider);
        }
        self
    }

    /// Disables every built-in adapter; only adapters added with
    /// [`with_adapter`](Self::with_adapter) remain.
    pub fn without_builtin_adapters(mut self) -> Self {
        self.disabled.extend(ProviderId::ALL);
        self
    }

    /// Registers an additional adapter after the built-in ones.
    pub fn with_adapter(mut self, adapter: Arc<dyn DataSource>) -> Self {
        self.extra_adapters.push(adapter);
        self
    }

    pub fn build(self) -> Aggregator {
        let config = &self.config;
        let http_client = self.http_client.clone().unwrap_or_else(|| {
            Arc::new(ReqwestHttpClient::new(&config.user_agent)) as Arc<dyn HttpClient>
        });
        let credentials = &config.credentials;
        let timeout_ms = config.request_timeout_ms();
        let key = |provider| credentials.for_provider(provider).map(str::to_owned);

        let mut adapters: Vec<Arc<dyn DataSource>> = Vec::new();
        for provider in ProviderId::ALL {
            if self.disabled.contains(&provider) {
                continue;
            }
            let client = Arc::clone(&http_client);
            let retry = config.retry.clone();
            let adapter: Arc<dyn DataSource> = match provider {
                ProviderId::Congress => Arc::new(
                    CongressAdapter::new(client, key(provider))
                        .with_retry(retry)
                        .with_timeout_ms(timeout_ms),
                ),
                ProviderId::Fred => Arc::new(
                    FredAdapter::new(client, key(provider))
                        .with_retry(retry)
                        .with_timeout_ms(timeout_ms),
                ),
                ProviderId::Treasury => Arc::new(
                    TreasuryAdapter::new(client)
                        .with_retry(retry)
                        .with_timeout_ms(timeout_ms),
                ),
                ProviderId::CourtListener => Arc::new(
                    CourtListenerAdapter::new(client, key(provider))
                        .with_retry(retry)
                        .with_timeout_ms(timeout_ms),
                ),
                ProviderId::Regulations => Arc::new(
                    RegulationsAdapter::new(client, key(provider))
                        .with_retry(retry)
                        .with_timeout_ms(timeout_ms),
                ),
            };
            adapters.push(adapter);
        }
        adapters.extend(self.extra_adapters);

        Aggregator::new(adapters).with_adapter_timeout(config.adapter_timeout)
    }
}
