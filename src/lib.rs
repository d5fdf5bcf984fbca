//! # docinput
//!
//! Whole-document input for batch jobs, plus the small helpers orchestration
//! scripts need around it.
//!
//! ## Whole-document input
//!
//! [`DocumentInputFormat`] treats every file as one indivisible unit and emits
//! exactly one record for it: the key is the file path and the value is the
//! complete file content, decompressed when the name ends in a registered
//! codec suffix (`.gz`, `.zst`, `.bz2`, `.xz`, or anything added through
//! [`io::compression::register_codec`]). [`OffsetDocumentInputFormat`] is the
//! same reader keyed by a constant `0`.
//!
//! Setting `docinput.prepend.key` prefixes each value with its path, for
//! consumers (Hive-style row engines) that never see keys.
//!
//! ```no_run
//! use docinput::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut format = DocumentInputFormat::new();
//! format.configure(&JobConf::new().merge_env("DOCINPUT"));
//!
//! let docs = Runner::default().run(&format, &LocalFileSystem, &["corpus/**/*.txt.gz"])?;
//! for (path, content) in &docs {
//!     println!("{path}: {} bytes", content.len());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Object stores
//!
//! [`io::cloud`] defines the [`ObjectIO`](io::cloud::ObjectIO) contract, an
//! in-memory fake, and listing helpers (all keys, keys under a folder,
//! existence of keys and `s3://` URIs). [`ObjectFileSystem`] lets the document
//! formats read straight from a store.
//!
//! ## Orchestration helpers
//!
//! [`helpers`] checks one-to-one input/output correspondence of copy jobs and
//! shifts or reformats partition dates.
//!
//! ## Module Overview
//!
//! - [`io::document`] - the whole-document formats and reader
//! - [`io::compression`] - codec registry
//! - [`io::fs`] - file-system abstraction, local and object-store backed
//! - [`io::split`] - splits, `InputFormat` and `RecordReader`
//! - [`runner`] - local sequential/parallel execution
//! - [`conf`] - job configuration
//! - [`testing`] - document fixtures for tests

pub mod conf;
pub mod helpers;
pub mod io;
pub mod runner;
pub mod testing;

pub use conf::JobConf;
pub use helpers::*;
pub use io::document::{DocumentInputFormat, DocumentRecordReader, OffsetDocumentInputFormat};
pub use io::fs::{FileSystem, LocalFileSystem, ObjectFileSystem};
pub use io::split::{FileSplit, InputFormat, RecordReader};
pub use runner::{ExecMode, Runner};
