//! Input units and the format/reader contracts a job runs against.
//!
//! An [`InputFormat`] plans [`FileSplit`]s over a set of files and opens one
//! [`RecordReader`] session per split. The default planner cuts splittable
//! files into ranges of at most [`InputFormat::split_size`] bytes; formats that
//! must see a file whole override [`InputFormat::is_splittable`].

use crate::conf::{JobConf, SPLIT_MAX_SIZE};
use crate::io::fs::FileSystem;
use anyhow::{Result, ensure};
use tracing::debug;

/// Default split size, 64 MiB.
pub const DEFAULT_SPLIT_SIZE: u64 = 64 * 1024 * 1024;

/// Split size configured under `docinput.split.maxsize`, or the default.
///
/// Zero and unparsable values fall back to [`DEFAULT_SPLIT_SIZE`].
#[must_use]
pub fn split_size_from(conf: &JobConf) -> u64 {
    conf.get_u64(SPLIT_MAX_SIZE)
        .filter(|&size| size > 0)
        .unwrap_or(DEFAULT_SPLIT_SIZE)
}

/// A byte range of one file, assigned as a unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSplit {
    pub path: String,
    pub start: u64,
    pub length: u64,
}

impl FileSplit {
    /// A split covering all `len` bytes of `path`.
    pub fn whole(path: impl Into<String>, len: u64) -> Self {
        Self {
            path: path.into(),
            start: 0,
            length: len,
        }
    }
}

/// A session producing records from one split.
///
/// `close` may be called any number of times; readers also release their
/// stream when dropped.
pub trait RecordReader {
    type Key;

    /// The next record, or `None` once the split is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying stream fails; the split is then
    /// considered failed.
    fn next_record(&mut self) -> Result<Option<(Self::Key, Vec<u8>)>>;

    /// Raw bytes consumed from the underlying stream so far.
    fn pos(&self) -> u64;

    /// Fraction of the split processed, in `[0, 1]`.
    fn progress(&self) -> f32;

    /// Release the underlying stream.
    ///
    /// # Errors
    ///
    /// Returns an error if releasing the stream fails.
    fn close(&mut self) -> Result<()>;
}

/// Plans splits over files and opens a reader per split.
///
/// Formats hold their own options. A format whose files may be split and
/// that honours `docinput.split.maxsize` stores [`split_size_from`] in
/// [`configure`](Self::configure) and returns it from
/// [`split_size`](Self::split_size).
pub trait InputFormat: Send + Sync {
    type Key: Send;
    type Reader: RecordReader<Key = Self::Key>;

    /// Pick up options from the job configuration.
    fn configure(&mut self, conf: &JobConf);

    fn is_splittable(&self, _path: &str) -> bool {
        true
    }

    /// Largest split the default planner cuts.
    ///
    /// Formats that never read `docinput.split.maxsize` keep
    /// [`DEFAULT_SPLIT_SIZE`].
    fn split_size(&self) -> u64 {
        DEFAULT_SPLIT_SIZE
    }

    /// Plan the splits for `files`, in file order.
    ///
    /// Non-splittable and empty files get exactly one split each.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be stat'ed or the split size is zero.
    fn splits(&self, fs: &dyn FileSystem, files: &[String]) -> Result<Vec<FileSplit>> {
        let split_size = self.split_size();
        ensure!(split_size > 0, "split size must be positive");

        let mut splits = Vec::new();
        for path in files {
            let len = fs.status(path)?.len;
            if len == 0 || !self.is_splittable(path) {
                splits.push(FileSplit::whole(path.as_str(), len));
                continue;
            }
            let mut start = 0;
            while start < len {
                let length = split_size.min(len - start);
                splits.push(FileSplit {
                    path: path.clone(),
                    start,
                    length,
                });
                start += length;
            }
        }
        debug!(files = files.len(), splits = splits.len(), "planned splits");
        Ok(splits)
    }

    /// Open a reader session for `split`.
    ///
    /// # Errors
    ///
    /// Returns an error if the split's file cannot be opened.
    fn record_reader(&self, split: &FileSplit, fs: &dyn FileSystem) -> Result<Self::Reader>;
}
