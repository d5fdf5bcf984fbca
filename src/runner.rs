//! Local execution of an input format over a set of inputs.
//!
//! The runner stands in for a cluster scheduler: it expands the inputs into
//! files, asks the format for splits, and runs one reader session per split.
//! Sessions share nothing, so the parallel mode simply hands splits to rayon.

use crate::io::fs::{FileSystem, enumerate_files, is_object_uri};
use crate::io::glob::expand_glob_required;
use crate::io::split::{FileSplit, InputFormat, RecordReader};
use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug)]
pub enum ExecMode {
    Sequential,
    Parallel { threads: Option<usize> },
}

pub struct Runner {
    pub mode: ExecMode,
}

impl Default for Runner {
    fn default() -> Self {
        Self {
            mode: ExecMode::Parallel { threads: None },
        }
    }
}

impl Runner {
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            mode: ExecMode::Sequential,
        }
    }

    /// Read every record the format produces for `inputs`.
    ///
    /// Each input is a file, a directory (walked recursively), or, for local
    /// paths, a glob pattern. Records come back in split order regardless of
    /// mode.
    ///
    /// # Errors
    ///
    /// Returns the first failure among input expansion, split planning, or
    /// any unit's open/read/close.
    pub fn run<F: InputFormat>(
        &self,
        format: &F,
        fs: &dyn FileSystem,
        inputs: &[&str],
    ) -> Result<Vec<(F::Key, Vec<u8>)>> {
        let files = expand_inputs(fs, inputs)?;
        let splits = format.splits(fs, &files)?;
        info!(
            inputs = inputs.len(),
            files = files.len(),
            splits = splits.len(),
            "starting local run"
        );

        let per_split: Vec<Vec<(F::Key, Vec<u8>)>> = match self.mode {
            ExecMode::Sequential => splits
                .iter()
                .map(|split| run_split(format, fs, split))
                .collect::<Result<_>>()?,
            ExecMode::Parallel { threads } => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads.unwrap_or(0))
                    .build()
                    .context("build worker pool")?;
                pool.install(|| {
                    splits
                        .par_iter()
                        .map(|split| run_split(format, fs, split))
                        .collect::<Result<_>>()
                })?
            }
        };

        let records: Vec<_> = per_split.into_iter().flatten().collect();
        info!(records = records.len(), "local run finished");
        Ok(records)
    }
}

/// One open/drain/close lifecycle. The reader is closed on every path.
fn run_split<F: InputFormat>(
    format: &F,
    fs: &dyn FileSystem,
    split: &FileSplit,
) -> Result<Vec<(F::Key, Vec<u8>)>> {
    let mut reader = format
        .record_reader(split, fs)
        .with_context(|| format!("open split {}@{}", split.path, split.start))?;

    let drained = drain(&mut reader);
    let closed = reader.close();
    let records = drained.with_context(|| format!("read split {}@{}", split.path, split.start))?;
    closed.with_context(|| format!("close split {}", split.path))?;

    debug!(path = %split.path, records = records.len(), "split done");
    Ok(records)
}

fn drain<R: RecordReader>(reader: &mut R) -> Result<Vec<(R::Key, Vec<u8>)>> {
    let mut records = Vec::new();
    while let Some(record) = reader.next_record()? {
        records.push(record);
    }
    Ok(records)
}

fn expand_inputs(fs: &dyn FileSystem, inputs: &[&str]) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for input in inputs {
        let found = if !is_object_uri(input) && input.contains(['*', '?', '[']) {
            expand_glob_required(input)?
                .into_iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect()
        } else {
            enumerate_files(fs, input)?
        };
        for file in found {
            if !files.contains(&file) {
                files.push(file);
            }
        }
    }
    Ok(files)
}
