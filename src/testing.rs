//! Fixtures for tests of document formats and jobs built on them.
//!
//! [`DocumentFixtures`] owns a temporary directory and writes documents into
//! it, compressing them when the file name carries a codec suffix:
//!
//! ```
//! use docinput::testing::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let docs = DocumentFixtures::new()?;
//! let plain = docs.write("a/letter.txt", b"Dear reader")?;
//! let packed = docs.write("a/letter.txt.gz", b"Dear reader")?;
//! assert!(plain.ends_with("letter.txt"));
//! assert!(packed.ends_with("letter.txt.gz"));
//! # Ok(())
//! # }
//! ```

use crate::io::compression::auto_detect_writer;
use anyhow::{Context, Result};
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

/// A temporary directory of documents, removed on drop.
pub struct DocumentFixtures {
    dir: TempDir,
}

impl DocumentFixtures {
    /// # Errors
    ///
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: TempDir::new().context("create fixture directory")?,
        })
    }

    /// The fixture root as a string path.
    #[must_use]
    pub fn root(&self) -> String {
        self.dir.path().to_string_lossy().into_owned()
    }

    /// Absolute path of `name` under the root.
    #[must_use]
    pub fn path(&self, name: &str) -> String {
        self.dir.path().join(name).to_string_lossy().into_owned()
    }

    /// Write `content` to `name`, compressing by suffix. Returns the full path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parents cannot be created.
    pub fn write(&self, name: &str, content: &[u8]) -> Result<String> {
        let path = self.path(name);
        if let Some(parent) = Path::new(&path).parent() {
            create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
        }
        let file = File::create(&path).with_context(|| format!("create {path}"))?;
        let mut writer = auto_detect_writer(file, &path)?;
        writer.write_all(content)?;
        writer.flush()?;
        // compressed writers finish their trailer on drop
        drop(writer);
        Ok(path)
    }
}

/// `len` bytes of printable text, a fixed line repeated.
#[must_use]
pub fn sample_text(len: usize) -> Vec<u8> {
    const LINE: &[u8] = b"The quick brown fox jumps over the lazy dog 0123456789.\n";
    LINE.iter().copied().cycle().take(len).collect()
}
