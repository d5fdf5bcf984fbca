//! Whole-document input: every file becomes exactly one record.
//!
//! Useful for processing raw documents as a whole. The reader opens the file,
//! undoes any compression picked from the file name, reads the stream to the
//! end, and hands back the bytes as a single value. Files are never split.
//!
//! Two formats share the reader:
//!
//! | format | key | `docinput.prepend.key` |
//! |---|---|---|
//! | [`DocumentInputFormat`] | the file path | any non-empty value is the delimiter |
//! | [`OffsetDocumentInputFormat`] | `0u64` | boolean; when set the delimiter is `<` |
//!
//! With prepending enabled the value is `<path><delimiter><content>`. Row
//! engines such as Hive only see values, so this is how they recover the
//! source path.
//!
//! The whole file is held in memory; very large documents will exhaust it.
//!
//! ```no_run
//! use docinput::conf::{JobConf, PREPEND_KEY};
//! use docinput::io::document::DocumentInputFormat;
//! use docinput::io::fs::LocalFileSystem;
//! use docinput::io::split::{FileSplit, InputFormat, RecordReader};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut format = DocumentInputFormat::new();
//! format.configure(&JobConf::new().with(PREPEND_KEY, "\t"));
//!
//! let split = FileSplit::whole("corpus/letter.txt.gz", 0);
//! let mut reader = format.record_reader(&split, &LocalFileSystem)?;
//! while let Some((path, doc)) = reader.next_record()? {
//!     println!("{path}: {} bytes", doc.len());
//! }
//! reader.close()?;
//! # Ok(())
//! # }
//! ```

use crate::conf::{JobConf, PREPEND_KEY};
use crate::io::compression::codec_for_path;
use crate::io::fs::{FileSystem, PositionedStream};
use crate::io::split::{FileSplit, InputFormat, RecordReader};
use anyhow::{Context, Result, anyhow, bail};
use std::io::{ErrorKind, Read};
use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Read granularity when draining a document.
pub const CHUNK_SIZE: usize = 16 * 1024;

/// Delimiter used by [`OffsetDocumentInputFormat`].
pub const OFFSET_FORMAT_DELIMITER: &str = "<";

/// How a document format derives its record key from the path.
pub trait DocumentKey: Send + Sized {
    fn for_path(path: &str) -> Self;
}

impl DocumentKey for String {
    fn for_path(path: &str) -> Self {
        path.to_string()
    }
}

/// Position-marker keys are always zero: the whole file starts at offset 0.
impl DocumentKey for u64 {
    fn for_path(_path: &str) -> Self {
        0
    }
}

/// Emits one record holding the complete, decompressed content of a file.
pub struct DocumentRecordReader<K> {
    path: String,
    stream: Option<Box<dyn Read + Send>>,
    position: Arc<AtomicU64>,
    delimiter: Option<String>,
    emitted: bool,
    failed: bool,
    _key: PhantomData<fn() -> K>,
}

impl<K: DocumentKey> DocumentRecordReader<K> {
    /// Open `path` on `fs`, wrapping it in a decompressor when the name asks for one.
    ///
    /// `delimiter` enables the `<path><delimiter>` prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or the decoder cannot be set up.
    pub fn open(path: &str, fs: &dyn FileSystem, delimiter: Option<String>) -> Result<Self> {
        let codec = codec_for_path(path);
        let raw = PositionedStream::new(fs.open(path)?);
        let position = raw.position_handle();

        let stream: Box<dyn Read + Send> = match &codec {
            Some(codec) => codec
                .wrap_reader_dyn(Box::new(raw))
                .with_context(|| format!("open {} decoder for {path}", codec.name()))?,
            None => Box::new(raw),
        };
        debug!(
            path,
            codec = codec.as_ref().map_or("none", |c| c.name()),
            prepend = delimiter.is_some(),
            "opened document"
        );

        Ok(Self {
            path: path.to_string(),
            stream: Some(stream),
            position,
            delimiter,
            emitted: false,
            failed: false,
            _key: PhantomData,
        })
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    fn read_document(&mut self) -> Result<Vec<u8>> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| anyhow!("reader for {} is closed", self.path))?;

        let mut value = Vec::new();
        if let Some(delimiter) = &self.delimiter {
            value.extend_from_slice(self.path.as_bytes());
            value.extend_from_slice(delimiter.as_bytes());
        }

        let mut chunk = vec![0u8; CHUNK_SIZE];
        loop {
            match stream.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => value.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e).with_context(|| format!("read {}", self.path)),
            }
        }
        Ok(value)
    }
}

impl<K: DocumentKey> RecordReader for DocumentRecordReader<K> {
    type Key = K;

    fn next_record(&mut self) -> Result<Option<(K, Vec<u8>)>> {
        if self.emitted {
            return Ok(None);
        }
        if self.failed {
            bail!("reading {} already failed", self.path);
        }
        let value = match self.read_document() {
            Ok(value) => value,
            Err(err) => {
                // the stream is past an unknown number of bytes; never resume it
                self.failed = true;
                self.stream = None;
                return Err(err);
            }
        };
        self.emitted = true;
        debug!(path = %self.path, bytes = value.len(), "emitted document");
        Ok(Some((K::for_path(&self.path), value)))
    }

    fn pos(&self) -> u64 {
        self.position.load(Ordering::Relaxed)
    }

    fn progress(&self) -> f32 {
        if self.emitted { 1.0 } else { 0.0 }
    }

    fn close(&mut self) -> Result<()> {
        if self.stream.take().is_some() {
            debug!(path = %self.path, "closed document");
        }
        Ok(())
    }
}

/// Whole documents keyed by path; `docinput.prepend.key` is the delimiter.
#[derive(Debug, Clone, Default)]
pub struct DocumentInputFormat {
    prepend_key: Option<String>,
}

impl DocumentInputFormat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefix every value with `<path><delimiter>`; an empty delimiter disables it.
    #[must_use]
    pub fn with_prepend_key(mut self, delimiter: impl Into<String>) -> Self {
        self.prepend_key = Some(delimiter.into()).filter(|d| !d.is_empty());
        self
    }
}

impl InputFormat for DocumentInputFormat {
    type Key = String;
    type Reader = DocumentRecordReader<String>;

    fn configure(&mut self, conf: &JobConf) {
        self.prepend_key = conf
            .get(PREPEND_KEY)
            .filter(|d| !d.is_empty())
            .map(str::to_string);
    }

    fn is_splittable(&self, _path: &str) -> bool {
        false
    }

    fn record_reader(&self, split: &FileSplit, fs: &dyn FileSystem) -> Result<Self::Reader> {
        DocumentRecordReader::open(&split.path, fs, self.prepend_key.clone())
    }
}

/// Whole documents under a constant zero key; prepending uses a fixed `<`.
///
/// `docinput.prepend.key` is read as a boolean. Values that are not
/// recognizably true leave prepending off.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetDocumentInputFormat {
    prepend: bool,
}

impl OffsetDocumentInputFormat {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prepend(mut self, prepend: bool) -> Self {
        self.prepend = prepend;
        self
    }
}

impl InputFormat for OffsetDocumentInputFormat {
    type Key = u64;
    type Reader = DocumentRecordReader<u64>;

    fn configure(&mut self, conf: &JobConf) {
        self.prepend = conf.get_bool(PREPEND_KEY).unwrap_or(false);
    }

    fn is_splittable(&self, _path: &str) -> bool {
        false
    }

    fn record_reader(&self, split: &FileSplit, fs: &dyn FileSystem) -> Result<Self::Reader> {
        let delimiter = self.prepend.then(|| OFFSET_FORMAT_DELIMITER.to_string());
        DocumentRecordReader::open(&split.path, fs, delimiter)
    }
}
