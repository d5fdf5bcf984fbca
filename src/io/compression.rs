//! Pluggable codec registry for transparent decompression of input documents.
//!
//! A codec is picked purely from the file name: the lowercase path is matched
//! against every registered codec's suffix list and the first hit wins. The
//! lookup happens once, when a record reader opens its unit, so the reader
//! itself never needs to know which algorithms exist.
//!
//! ## Built-in Codecs
//!
//! When enabled via feature flags, the following codecs are available:
//! - **Gzip** (`.gz`, `.gzip`) - via `flate2` (feature: `compression-gzip`)
//! - **Zstd** (`.zst`, `.zstd`) - via `zstd` (feature: `compression-zstd`)
//! - **Bzip2** (`.bz2`, `.bzip2`) - via `bzip2` (feature: `compression-bzip2`)
//! - **Xz** (`.xz`) - via `xz2` (feature: `compression-xz`)
//!
//! ## Custom Codecs
//! ```
//! use docinput::io::compression::{codec_for_path, register_codec, CompressionCodec};
//! use std::io::{Read, Write};
//! use std::sync::Arc;
//!
//! struct Identity;
//!
//! impl CompressionCodec for Identity {
//!     fn name(&self) -> &str { "identity" }
//!     fn extensions(&self) -> &[&str] { &[".ident"] }
//!     fn wrap_reader_dyn(&self, r: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
//!         Ok(r)
//!     }
//!     fn wrap_writer_dyn(&self, w: Box<dyn Write + Send>) -> std::io::Result<Box<dyn Write + Send>> {
//!         Ok(w)
//!     }
//! }
//!
//! register_codec(Arc::new(Identity));
//! assert_eq!(codec_for_path("notes.txt.ident").map(|c| c.name().to_string()), Some("identity".into()));
//! ```

use anyhow::{Context, Result};
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

/// Global codec registry.
static CODEC_REGISTRY: RwLock<Option<Vec<Arc<dyn CompressionCodec>>>> = RwLock::new(None);

fn builtin_codecs() -> Vec<Arc<dyn CompressionCodec>> {
    vec![
        #[cfg(feature = "compression-gzip")]
        Arc::new(GzipCodec),
        #[cfg(feature = "compression-zstd")]
        Arc::new(ZstdCodec),
        #[cfg(feature = "compression-bzip2")]
        Arc::new(Bzip2Codec),
        #[cfg(feature = "compression-xz")]
        Arc::new(XzCodec),
    ]
}

/// Snapshot of the registry, initializing it with the built-ins on first use.
fn registry() -> Vec<Arc<dyn CompressionCodec>> {
    if let Some(codecs) = CODEC_REGISTRY
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
    {
        return codecs.clone();
    }
    let mut lock = CODEC_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(builtin_codecs).clone()
}

/// Register a custom compression codec globally.
///
/// Codecs registered later are consulted after the built-ins, so a custom
/// codec cannot shadow `.gz` and friends.
pub fn register_codec(codec: Arc<dyn CompressionCodec>) {
    let mut lock = CODEC_REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    lock.get_or_insert_with(builtin_codecs).push(codec);
}

/// A reversible byte-stream transform selected by file-name suffix.
///
/// Implementations must be `Send + Sync`; they live in a global registry and
/// readers on different threads share them.
pub trait CompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g., "gzip", "zstd").
    fn name(&self) -> &str;

    /// File suffixes associated with this codec, lowercase, with the leading dot.
    fn extensions(&self) -> &[&str];

    /// Wrap a raw stream with a decompressor.
    fn wrap_reader_dyn(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>>;

    /// Wrap a raw sink with a compressor.
    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn Write + Send>,
    ) -> std::io::Result<Box<dyn Write + Send>>;
}

/// Find the codec for a path by suffix, case-insensitively.
pub fn codec_for_path(path: impl AsRef<Path>) -> Option<Arc<dyn CompressionCodec>> {
    let path_str = path.as_ref().to_string_lossy().to_lowercase();
    registry()
        .into_iter()
        .find(|codec| codec.extensions().iter().any(|ext| path_str.ends_with(ext)))
}

/// Wrap `reader` with a decompressor when `path_hint` names a compressed file.
///
/// Unrecognized suffixes return the stream untouched.
pub fn auto_detect_reader<R: Read + Send + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Read + Send>> {
    match codec_for_path(&path_hint) {
        Some(codec) => codec
            .wrap_reader_dyn(Box::new(reader))
            .with_context(|| format!("wrap reader with {} codec", codec.name())),
        None => Ok(Box::new(reader)),
    }
}

/// Wrap `writer` with a compressor when `path_hint` names a compressed file.
///
/// Compressed writers finish their frame when dropped; call `flush` first so
/// I/O errors surface.
pub fn auto_detect_writer<W: Write + Send + 'static>(
    writer: W,
    path_hint: impl AsRef<Path>,
) -> Result<Box<dyn Write + Send>> {
    if let Some(codec) = codec_for_path(&path_hint) {
        return codec
            .wrap_writer_dyn(Box::new(writer))
            .with_context(|| format!("wrap writer with {} codec", codec.name()));
    }

    Ok(Box::new(BufWriter::new(writer)))
}

// ============================================================================
// Built-in Codec Implementations
// ============================================================================

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl CompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn extensions(&self) -> &[&str] {
        &[".gz", ".gzip"]
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        // Multi-member files are common when logs are appended as gzip chunks.
        use flate2::read::MultiGzDecoder;
        Ok(Box::new(MultiGzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn Write + Send>,
    ) -> std::io::Result<Box<dyn Write + Send>> {
        use flate2::Compression;
        use flate2::write::GzEncoder;
        Ok(Box::new(GzEncoder::new(writer, Compression::default())))
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl CompressionCodec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn extensions(&self) -> &[&str] {
        &[".zst", ".zstd"]
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        zstd::stream::read::Decoder::new(reader).map(|d| Box::new(d) as Box<dyn Read + Send>)
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn Write + Send>,
    ) -> std::io::Result<Box<dyn Write + Send>> {
        zstd::stream::write::Encoder::new(writer, 3)
            .map(|e| Box::new(e.auto_finish()) as Box<dyn Write + Send>)
    }
}

#[cfg(feature = "compression-bzip2")]
struct Bzip2Codec;

#[cfg(feature = "compression-bzip2")]
impl CompressionCodec for Bzip2Codec {
    fn name(&self) -> &str {
        "bzip2"
    }

    fn extensions(&self) -> &[&str] {
        &[".bz2", ".bzip2"]
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        use bzip2::read::BzDecoder;
        Ok(Box::new(BzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn Write + Send>,
    ) -> std::io::Result<Box<dyn Write + Send>> {
        use bzip2::Compression;
        use bzip2::write::BzEncoder;
        Ok(Box::new(BzEncoder::new(writer, Compression::default())))
    }
}

#[cfg(feature = "compression-xz")]
struct XzCodec;

#[cfg(feature = "compression-xz")]
impl CompressionCodec for XzCodec {
    fn name(&self) -> &str {
        "xz"
    }

    fn extensions(&self) -> &[&str] {
        &[".xz"]
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read + Send>) -> std::io::Result<Box<dyn Read + Send>> {
        use xz2::read::XzDecoder;
        Ok(Box::new(XzDecoder::new(reader)))
    }

    fn wrap_writer_dyn(
        &self,
        writer: Box<dyn Write + Send>,
    ) -> std::io::Result<Box<dyn Write + Send>> {
        use xz2::write::XzEncoder;
        Ok(Box::new(XzEncoder::new(writer, 6)))
    }
}
