//! Retry and URI helpers shared by the object-store code paths.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::warn;

// ============================================================================
// Retry Helper
// ============================================================================

/// Configuration for retry behavior
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5000,
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// No waiting between attempts; for tests and fakes.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            max_delay_ms: 0,
            backoff_multiplier: 1.0,
        }
    }
}

/// Retry `operation` while it fails with a transient [`ErrorKind`].
///
/// # Errors
///
/// Returns the last error once it is not retryable or `max_attempts` is reached.
pub fn retry_with_backoff<F, T>(config: &RetryConfig, mut operation: F) -> CloudResult<T>
where
    F: FnMut() -> CloudResult<T>,
{
    let mut attempt = 0;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        attempt += 1;
        match operation() {
            Ok(result) => return Ok(result),
            Err(err) => {
                if !err.kind.is_retryable() || attempt >= config.max_attempts {
                    return Err(err);
                }
                warn!(attempt, error = %err, "transient object store error, retrying");

                std::thread::sleep(Duration::from_millis(delay_ms));

                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
                let next = (delay_ms as f64 * config.backoff_multiplier) as u64;
                delay_ms = next.min(config.max_delay_ms);
            }
        }
    }
}

// ============================================================================
// Resource Identifier Parsing
// ============================================================================

static S3_URI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^s3[na]?://([^/]+)(?:/(.*))?$").expect("static S3 URI pattern")
});

/// Split an `s3://`, `s3n://` or `s3a://` URI into `(bucket, key)`.
///
/// The key may be empty for a bucket root (`s3://bucket` or `s3://bucket/`).
///
/// # Errors
///
/// Returns `InvalidInput` if the URI has another scheme or no bucket.
pub fn parse_s3_uri(uri: &str) -> CloudResult<(String, String)> {
    let caps = S3_URI.captures(uri).ok_or_else(|| {
        CloudIOError::new(ErrorKind::InvalidInput, format!("Invalid S3 URI: {uri}"))
    })?;
    let bucket = caps[1].to_string();
    let key = caps.get(2).map_or("", |m| m.as_str()).to_string();
    Ok((bucket, key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_uri_variants() {
        assert_eq!(
            parse_s3_uri("s3://bucket/a/b.txt").unwrap(),
            ("bucket".to_string(), "a/b.txt".to_string())
        );
        assert_eq!(
            parse_s3_uri("S3N://bucket/key").unwrap(),
            ("bucket".to_string(), "key".to_string())
        );
        assert_eq!(
            parse_s3_uri("s3a://bucket").unwrap(),
            ("bucket".to_string(), String::new())
        );
        assert_eq!(
            parse_s3_uri("s3://bucket/").unwrap(),
            ("bucket".to_string(), String::new())
        );
    }

    #[test]
    fn s3_uri_rejects_other_schemes() {
        let err = parse_s3_uri("gs://bucket/key").unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidInput);
        assert!(parse_s3_uri("s3:///key").is_err());
        assert!(parse_s3_uri("/local/path").is_err());
    }

    #[test]
    fn retry_stops_on_permanent_error() {
        let mut calls = 0;
        let result: CloudResult<()> = retry_with_backoff(&RetryConfig::immediate(5), || {
            calls += 1;
            Err(CloudIOError::new(ErrorKind::NotFound, "gone"))
        });
        assert_eq!(result.unwrap_err().kind, ErrorKind::NotFound);
        assert_eq!(calls, 1);
    }

    #[test]
    fn retry_recovers_from_transient_errors() {
        let mut calls = 0;
        let result = retry_with_backoff(&RetryConfig::immediate(3), || {
            calls += 1;
            if calls < 3 {
                Err(CloudIOError::new(ErrorKind::Network, "flaky"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
    }
}
