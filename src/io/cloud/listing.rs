//! Bucket listing and existence checks used before launching a job.
//!
//! Missing buckets and objects are logged with `tracing` and reported as
//! `false`/errors; nothing here panics on a bad bucket name.

use crate::io::cloud::helpers::{RetryConfig, parse_s3_uri, retry_with_backoff};
use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Every key in `bucket`, in listing order.
///
/// With `exclude_blanks`, zero-byte objects (folder markers, `_SUCCESS` files)
/// are skipped.
///
/// # Errors
///
/// Returns `NotFound` if the bucket does not exist, or the listing error once
/// retries are exhausted.
pub fn list_object_keys(
    store: &dyn ObjectIO,
    bucket: &str,
    exclude_blanks: bool,
) -> CloudResult<Vec<String>> {
    let retry = RetryConfig::default();
    if !retry_with_backoff(&retry, || store.bucket_exists(bucket))? {
        warn!(bucket, "bucket does not exist");
        return Err(CloudIOError::new(
            ErrorKind::NotFound,
            format!("Bucket {bucket} does not exist"),
        ));
    }

    info!(bucket, "listing objects");
    let objects = retry_with_backoff(&retry, || store.list_objects(bucket, None))?;
    let keys: Vec<String> = objects
        .into_iter()
        .filter(|obj| !exclude_blanks || obj.size > 0)
        .inspect(|obj| debug!(key = %obj.key, size = obj.size, "listed object"))
        .map(|obj| obj.key)
        .collect();
    Ok(keys)
}

/// Keys in `bucket` that start with `folder`.
///
/// # Errors
///
/// Same as [`list_object_keys`].
pub fn list_objects_in_folder(
    store: &dyn ObjectIO,
    bucket: &str,
    folder: &str,
) -> CloudResult<Vec<String>> {
    let keys = list_object_keys(store, bucket, false)?;
    Ok(keys.into_iter().filter(|k| k.starts_with(folder)).collect())
}

/// Whether every key in `keys` is present in `bucket`.
///
/// A missing bucket or a failed listing counts as "not all present". The
/// first missing key is logged.
pub fn all_objects_exist<S: AsRef<str>>(store: &dyn ObjectIO, bucket: &str, keys: &[S]) -> bool {
    let listed: HashSet<String> = match list_object_keys(store, bucket, false) {
        Ok(listed) => listed.into_iter().collect(),
        Err(err) => {
            warn!(bucket, error = %err, "cannot list bucket");
            return false;
        }
    };

    match keys
        .iter()
        .map(AsRef::<str>::as_ref)
        .find(|key| !listed.contains(*key))
    {
        Some(missing) => {
            warn!(bucket, key = missing, "object does not exist");
            false
        }
        None => true,
    }
}

/// Whether every `s3://bucket/key` URI names an existing object.
///
/// Malformed URIs, missing buckets and store errors all answer `false`.
pub fn all_uris_exist<S: AsRef<str>>(store: &dyn ObjectIO, uris: &[S]) -> bool {
    let retry = RetryConfig::default();
    uris.iter().all(|uri| {
        let uri: &str = uri.as_ref();
        let Ok((bucket, key)) = parse_s3_uri(uri) else {
            warn!(uri, "not an S3 URI");
            return false;
        };
        let found = retry_with_backoff(&retry, || {
            Ok(store.bucket_exists(&bucket)? && store.object_exists(&bucket, &key)?)
        });
        match found {
            Ok(true) => true,
            Ok(false) => {
                warn!(uri, "object does not exist");
                false
            }
            Err(err) => {
                warn!(uri, error = %err, "existence check failed");
                false
            }
        }
    })
}
