//! File-system abstraction the readers and planners run against.
//!
//! A [`FileSystem`] opens raw byte streams and lists directories. Two
//! implementations ship with the crate: [`LocalFileSystem`] over `std::fs` and
//! [`ObjectFileSystem`], which maps `s3://bucket/key` paths onto any
//! [`ObjectIO`] store (directories are key prefixes).

use crate::io::cloud::helpers::parse_s3_uri;
use crate::io::cloud::traits::ObjectIO;
use anyhow::{Context, Result, bail};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufReader, Cursor, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// What a file system knows about one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStatus {
    pub path: String,
    pub len: u64,
    pub is_dir: bool,
}

/// Blocking file-system operations used by input formats.
pub trait FileSystem: Send + Sync {
    /// Open `path` for reading from its first byte.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist or cannot be read.
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>>;

    /// Describe a single path.
    ///
    /// # Errors
    ///
    /// Returns an error if the path does not exist.
    fn status(&self, path: &str) -> Result<FileStatus>;

    /// List the direct children of a directory.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` does not exist or cannot be listed.
    fn list_status(&self, dir: &str) -> Result<Vec<FileStatus>>;
}

/// The local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let f = File::open(path).with_context(|| format!("open {path}"))?;
        Ok(Box::new(BufReader::new(f)))
    }

    fn status(&self, path: &str) -> Result<FileStatus> {
        let meta = std::fs::metadata(path).with_context(|| format!("stat {path}"))?;
        Ok(FileStatus {
            path: path.to_string(),
            len: meta.len(),
            is_dir: meta.is_dir(),
        })
    }

    fn list_status(&self, dir: &str) -> Result<Vec<FileStatus>> {
        let entries = std::fs::read_dir(dir).with_context(|| format!("list {dir}"))?;
        let mut out = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("read entry in {dir}"))?;
            let meta = entry
                .metadata()
                .with_context(|| format!("stat {}", entry.path().display()))?;
            out.push(FileStatus {
                path: entry.path().to_string_lossy().into_owned(),
                len: meta.len(),
                is_dir: meta.is_dir(),
            });
        }
        // read_dir order is platform dependent
        out.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(out)
    }
}

/// `s3://bucket/key` paths served from an object store.
///
/// Objects are fetched whole on `open`. A path ending in `/` is always a
/// directory; otherwise it is one when some key lives under `<key>/` and no
/// non-empty object sits at the key itself, so zero-byte folder markers are
/// never read as documents.
pub struct ObjectFileSystem<O: ObjectIO> {
    store: Arc<O>,
}

impl<O: ObjectIO> ObjectFileSystem<O> {
    pub fn new(store: Arc<O>) -> Self {
        Self { store }
    }
}

impl<O: ObjectIO> FileSystem for ObjectFileSystem<O> {
    fn open(&self, path: &str) -> Result<Box<dyn Read + Send>> {
        let (bucket, key) = parse_s3_uri(path)?;
        let data = self
            .store
            .get_object(&bucket, &key)
            .with_context(|| format!("open {path}"))?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn status(&self, path: &str) -> Result<FileStatus> {
        let (bucket, key) = parse_s3_uri(path)?;
        let prefix = dir_prefix(&key);
        let directory = FileStatus {
            path: path.trim_end_matches('/').to_string(),
            len: 0,
            is_dir: true,
        };

        // `key/` names a folder, whether or not a marker object sits at it
        if key.is_empty() || key.ends_with('/') {
            if self.store.list_objects(&bucket, Some(&prefix))?.is_empty() {
                bail!("no such prefix: {path}");
            }
            return Ok(directory);
        }

        let has_children = || -> Result<bool> {
            Ok(!self.store.list_objects(&bucket, Some(&prefix))?.is_empty())
        };
        if self.store.object_exists(&bucket, &key)? {
            let meta = self.store.get_metadata(&bucket, &key)?;
            if meta.size == 0 && has_children()? {
                return Ok(directory);
            }
            return Ok(FileStatus {
                path: path.to_string(),
                len: meta.size,
                is_dir: false,
            });
        }
        if !has_children()? {
            bail!("no such object or prefix: {path}");
        }
        Ok(directory)
    }

    fn list_status(&self, dir: &str) -> Result<Vec<FileStatus>> {
        let (bucket, key) = parse_s3_uri(dir)?;
        let prefix = dir_prefix(&key);
        let objects = self
            .store
            .list_objects(&bucket, Some(&prefix))
            .with_context(|| format!("list {dir}"))?;

        let mut files = Vec::new();
        let mut subdirs = BTreeSet::new();
        for obj in objects {
            let rest = &obj.key[prefix.len()..];
            match rest.split_once('/') {
                Some((child, _)) => {
                    subdirs.insert(child.to_string());
                }
                None if !rest.is_empty() => files.push(FileStatus {
                    path: format!("s3://{bucket}/{}", obj.key),
                    len: obj.size,
                    is_dir: false,
                }),
                None => {}
            }
        }
        // a zero-byte `name` beside a `name/` prefix is a folder marker
        files.retain(|f| {
            f.len > 0 || !subdirs.contains(f.path.rsplit('/').next().unwrap_or_default())
        });
        files.extend(subdirs.into_iter().map(|child| FileStatus {
            path: format!("s3://{bucket}/{prefix}{child}"),
            len: 0,
            is_dir: true,
        }));
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }
}

/// A raw stream that counts the bytes pulled through it.
///
/// The counter is shared, so the position stays observable after a decoder
/// takes ownership of the stream.
pub struct PositionedStream<R> {
    inner: R,
    consumed: Arc<AtomicU64>,
}

impl<R: Read> PositionedStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            consumed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Handle onto the byte counter.
    #[must_use]
    pub fn position_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.consumed)
    }
}

impl<R: Read> Read for PositionedStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.consumed.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

/// Recursively enumerate every file below `dir`, depth first.
///
/// Paths are returned once each, in listing order. A plain file passed as
/// `dir` yields just itself.
///
/// # Errors
///
/// Returns an error if any directory on the way cannot be listed.
pub fn enumerate_files(fs: &dyn FileSystem, dir: &str) -> Result<Vec<String>> {
    let root = fs.status(dir)?;
    let mut files = Vec::new();
    if root.is_dir {
        collect_files(fs, &root.path, &mut files)?;
    } else {
        files.push(root.path);
    }
    debug!(dir, count = files.len(), "enumerated input files");
    Ok(files)
}

fn collect_files(fs: &dyn FileSystem, dir: &str, files: &mut Vec<String>) -> Result<()> {
    for status in fs.list_status(dir)? {
        if status.is_dir {
            collect_files(fs, &status.path, files)?;
        } else if !files.contains(&status.path) {
            debug!(path = %status.path, "found file");
            files.push(status.path);
        }
    }
    Ok(())
}

/// Whether `path` should be routed to an object store rather than local disk.
#[must_use]
pub fn is_object_uri(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    ["s3://", "s3n://", "s3a://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Key prefix that lists the children of `key`; the bucket root is `""`.
fn dir_prefix(key: &str) -> String {
    let key = key.trim_end_matches('/');
    if key.is_empty() {
        String::new()
    } else {
        format!("{key}/")
    }
}
