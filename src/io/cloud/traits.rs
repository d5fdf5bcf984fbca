//! Object-store contract and its error type.
//!
//! Everything here is blocking. A real S3 client is expected to drive its own
//! runtime internally and expose these calls synchronously, the same way the
//! record readers consume local files.

use std::error::Error;
use std::fmt;

/// Failure reported by an object store.
#[derive(Debug, Clone)]
pub struct CloudIOError {
    pub message: String,
    pub kind: ErrorKind,
    pub source: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    NotFound,
    InvalidInput,
    Network,
    Timeout,
    ServiceUnavailable,
    RateLimited,
    Other,
}

impl ErrorKind {
    /// Transient kinds worth another attempt.
    #[must_use]
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Timeout | Self::ServiceUnavailable | Self::RateLimited
        )
    }
}

impl fmt::Display for CloudIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)?;
        if let Some(source) = &self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl Error for CloudIOError {}

impl CloudIOError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            source: None,
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

pub type CloudResult<T> = Result<T, CloudIOError>;

/// One listed object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    pub key: String,
    pub size: u64,
    /// Unix timestamp, seconds.
    pub last_modified: Option<i64>,
}

/// Object storage operations needed by job orchestration and the object file system.
pub trait ObjectIO: Send + Sync {
    /// Whether the bucket exists and is visible to these credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the check itself fails (network, permissions)
    fn bucket_exists(&self, bucket: &str) -> CloudResult<bool>;

    /// Upload an object, replacing any previous content
    ///
    /// # Errors
    ///
    /// Returns an error if the bucket doesn't exist or the upload fails
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()>;

    /// Download a whole object
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the object doesn't exist, or another kind if the download fails
    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>>;

    /// List objects, optionally restricted to a key prefix, sorted by key
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the bucket doesn't exist, or another kind if the listing fails
    fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> CloudResult<Vec<ObjectSummary>>;

    /// Whether an object exists
    ///
    /// # Errors
    ///
    /// Returns an error if the check fails
    fn object_exists(&self, bucket: &str, key: &str) -> CloudResult<bool>;

    /// Summary of a single object without downloading it
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the object doesn't exist
    fn get_metadata(&self, bucket: &str, key: &str) -> CloudResult<ObjectSummary>;
}
