//! Tracing setup and span constructors.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the configured level.
pub fn init(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Standardized span constructors for request observability.
pub mod spans {
    use tracing::{Span, info_span};

    /// Create a span for one REST request.
    pub fn request(method: &str, bucket: &str, endpoint: &str) -> Span {
        info_span!("request", method = %method, bucket = %bucket, endpoint = %endpoint)
    }
}
