//! Object storage for job inputs.
//!
//! Provider-agnostic: [`ObjectIO`] is the only contract, so the same listing
//! helpers and the [`ObjectFileSystem`](crate::io::fs::ObjectFileSystem)
//! adapter work against S3, a compatible service, or the in-memory
//! [`FakeObjectIO`].
//!
//! ## Usage
//! ```
//! use docinput::io::cloud::*;
//!
//! # fn main() -> CloudResult<()> {
//! let store = FakeObjectIO::new();
//! store.put_object("jobs", "input/2011/11/02/a.txt", b"hello")?;
//! store.put_object("jobs", "input/2011/11/02/_SUCCESS", b"")?;
//!
//! let keys = list_object_keys(&store, "jobs", true)?;
//! assert_eq!(keys, vec!["input/2011/11/02/a.txt"]);
//! assert!(all_uris_exist(&store, &["s3://jobs/input/2011/11/02/a.txt"]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Store operations return [`CloudResult<T>`]; [`ErrorKind`] separates
//! transient failures (`Network`, `Timeout`, `ServiceUnavailable`,
//! `RateLimited`), which [`helpers::retry_with_backoff`] retries, from
//! permanent ones.

pub mod fake;
pub mod helpers;
pub mod listing;
pub mod traits;

pub use fake::*;
pub use listing::*;
pub use traits::*;
