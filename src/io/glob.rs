//! Glob expansion for local input paths.
//!
//! Lets a job name its documents as `corpus/2011/*/*.txt.gz` instead of
//! listing them. Results contain files only and are sorted so that split
//! order, and therefore record order, is deterministic.
//!
//! ```no_run
//! use docinput::io::glob::expand_glob;
//!
//! let letters = expand_glob("corpus/year=2011/month=*/*.txt")?;
//! # use anyhow::Error; Ok::<(), Error>(())
//! ```

use anyhow::{Context, Result, bail};
use glob::glob;
use std::path::PathBuf;

/// Expand `pattern` into a sorted list of matching files.
///
/// Supports `*`, `?`, `**`, `[abc]` and `[!abc]`. No matches is not an error.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or a matched entry cannot be read.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob(pattern).with_context(|| format!("invalid glob pattern: {pattern}"))?;

    let mut result = Vec::new();
    for entry in paths {
        let path =
            entry.with_context(|| format!("error reading glob entry for pattern: {pattern}"))?;
        if path.is_file() {
            result.push(path);
        }
    }
    result.sort();
    Ok(result)
}

/// Like [`expand_glob`], but zero matches is an error.
///
/// # Errors
///
/// Returns an error if the pattern is invalid, unreadable, or matches nothing.
pub fn expand_glob_required(pattern: &str) -> Result<Vec<PathBuf>> {
    let files = expand_glob(pattern)?;
    if files.is_empty() {
        bail!("no files found matching pattern: {pattern}");
    }
    Ok(files)
}
