//! Error types for the zengo_daily crate.

use std::time::Duration;

/// Why a single fetch attempt failed.
///
/// Every variant except `InvalidUrl` counts as one failed attempt and is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Connection, TLS or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The attempt did not finish within its own timeout.
    #[error("attempt timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The body arrived but was not the expected JSON document.
    #[error("invalid JSON document: {0}")]
    Decode(String),

    /// The request could not even be built (relative or malformed URL).
    #[error("invalid request URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Whether another attempt could possibly succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::InvalidUrl(_))
    }
}

/// Error type for all fallible operations in the zengo_daily crate.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ZenError {
    /// All retries exhausted and no cached value to fall back on.
    #[error("failed to fetch {url} after {attempts} attempts: {source}")]
    FetchFailure {
        /// Resource that could not be loaded.
        url: String,
        /// Number of attempts made.
        attempts: u32,
        /// Failure of the last attempt.
        #[source]
        source: FetchError,
    },

    /// A caller broke an input contract, e.g. selecting from an empty catalog.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// A lookup table had nothing to resolve against.
    #[error("no data: {0}")]
    NoData(&'static str),

    /// A configured value is unusable, e.g. a resource URL that is not absolute.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_fetch_failure_message() {
        let e = ZenError::FetchFailure {
            url: "json/zen_words.json".to_string(),
            attempts: 10,
            source: FetchError::Status(503),
        };
        assert_eq!(
            e.to_string(),
            "failed to fetch json/zen_words.json after 10 attempts: HTTP error! status: 503"
        );
    }

    #[test]
    fn error_timeout_message() {
        let e = FetchError::Timeout(Duration::from_secs(30));
        assert_eq!(e.to_string(), "attempt timed out after 30000ms");
    }

    #[test]
    fn error_invalid_argument() {
        let e = ZenError::InvalidArgument("catalog is empty");
        assert_eq!(e.to_string(), "invalid argument: catalog is empty");
    }

    #[test]
    fn error_invalid_url_is_not_retryable() {
        assert!(!FetchError::InvalidUrl("builder error".to_string()).is_retryable());
        assert!(FetchError::Status(503).is_retryable());
        assert!(FetchError::Timeout(Duration::from_secs(30)).is_retryable());
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + 'static>() {}
        assert_impl::<ZenError>();
        assert_impl::<FetchError>();
    }
}
