use thiserror::Error;

/// Startup failures of the feed server. Request handling itself never fails.
#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Config(#[from] almanac_core::ValidationError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}
