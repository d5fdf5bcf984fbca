//! Default split planning, as seen by a format that does allow splitting.

use anyhow::Result;
use docinput::conf::SPLIT_MAX_SIZE;
use docinput::io::split::{DEFAULT_SPLIT_SIZE, split_size_from};
use docinput::testing::{DocumentFixtures, sample_text};
use docinput::*;

/// Reports each split's range instead of reading it.
#[derive(Default)]
struct RangeFormat {
    split_size: u64,
}

struct RangeReader {
    range: Option<(u64, u64)>,
}

impl RecordReader for RangeReader {
    type Key = u64;

    fn next_record(&mut self) -> Result<Option<(u64, Vec<u8>)>> {
        Ok(self
            .range
            .take()
            .map(|(start, length)| (start, length.to_le_bytes().to_vec())))
    }

    fn pos(&self) -> u64 {
        0
    }

    fn progress(&self) -> f32 {
        if self.range.is_some() { 0.0 } else { 1.0 }
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

impl InputFormat for RangeFormat {
    type Key = u64;
    type Reader = RangeReader;

    fn configure(&mut self, conf: &JobConf) {
        self.split_size = split_size_from(conf);
    }

    fn split_size(&self) -> u64 {
        self.split_size
    }

    fn record_reader(&self, split: &FileSplit, _fs: &dyn FileSystem) -> Result<RangeReader> {
        Ok(RangeReader {
            range: Some((split.start, split.length)),
        })
    }
}

#[test]
fn split_size_falls_back_to_default() {
    assert_eq!(split_size_from(&JobConf::new()), DEFAULT_SPLIT_SIZE);
    assert_eq!(
        split_size_from(&JobConf::new().with(SPLIT_MAX_SIZE, "0")),
        DEFAULT_SPLIT_SIZE
    );
    assert_eq!(
        split_size_from(&JobConf::new().with(SPLIT_MAX_SIZE, "big")),
        DEFAULT_SPLIT_SIZE
    );
    assert_eq!(split_size_from(&JobConf::new().with(SPLIT_MAX_SIZE, "4096")), 4096);
}

#[test]
fn splittable_files_are_cut_into_ranges() -> Result<()> {
    let docs = DocumentFixtures::new()?;
    let a = docs.write("a.txt", &sample_text(250))?;
    let b = docs.write("b.txt", &sample_text(100))?;
    let empty = docs.write("c.txt", b"")?;

    let mut format = RangeFormat::default();
    format.configure(&JobConf::new().with(SPLIT_MAX_SIZE, "100"));
    let splits = format.splits(&LocalFileSystem, &[a.clone(), b.clone(), empty.clone()])?;

    let ranges: Vec<(&str, u64, u64)> = splits
        .iter()
        .map(|s| (s.path.as_str(), s.start, s.length))
        .collect();
    assert_eq!(
        ranges,
        vec![
            (a.as_str(), 0, 100),
            (a.as_str(), 100, 100),
            (a.as_str(), 200, 50),
            (b.as_str(), 0, 100),
            (empty.as_str(), 0, 0),
        ]
    );
    Ok(())
}

#[test]
fn runner_opens_one_session_per_split() -> Result<()> {
    let docs = DocumentFixtures::new()?;
    docs.write("a.txt", &sample_text(250))?;

    let mut format = RangeFormat::default();
    format.configure(&JobConf::new().with(SPLIT_MAX_SIZE, "100"));
    let records = Runner::sequential().run(&format, &LocalFileSystem, &[docs.root().as_str()])?;

    let starts: Vec<u64> = records.iter().map(|(start, _)| *start).collect();
    assert_eq!(starts, vec![0, 100, 200]);
    Ok(())
}

/// Same ranges as [`RangeFormat`], but ignores the job configuration.
struct FixedFormat;

impl InputFormat for FixedFormat {
    type Key = u64;
    type Reader = RangeReader;

    fn configure(&mut self, _conf: &JobConf) {}

    fn record_reader(&self, split: &FileSplit, _fs: &dyn FileSystem) -> Result<RangeReader> {
        Ok(RangeReader {
            range: Some((split.start, split.length)),
        })
    }
}

#[test]
fn formats_that_skip_the_setting_keep_the_default() -> Result<()> {
    let docs = DocumentFixtures::new()?;
    let a = docs.write("a.txt", &sample_text(250))?;

    let mut format = FixedFormat;
    format.configure(&JobConf::new().with(SPLIT_MAX_SIZE, "100"));
    assert_eq!(format.split_size(), DEFAULT_SPLIT_SIZE);
    assert_eq!(
        format.splits(&LocalFileSystem, std::slice::from_ref(&a))?,
        vec![FileSplit::whole(a, 250)]
    );
    Ok(())
}

#[test]
fn zero_split_size_is_rejected() -> Result<()> {
    let docs = DocumentFixtures::new()?;
    let a = docs.write("a.txt", b"abc")?;
    let format = RangeFormat { split_size: 0 };
    assert!(format.splits(&LocalFileSystem, &[a]).is_err());
    Ok(())
}
