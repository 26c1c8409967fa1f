//! Instrument lookup tables.
//!
//! Both tables are JSON documents stored in the configuration directory as
//! `<INSTRUMENT>_rangeTable.json` and `<INSTRUMENT>_ditTable.json`. They are read once when
//! the instrument is created and never modified afterwards.
//!
//! - [`range_table`]: allowed values and defaults of every template keyword
//! - [`dit_table`]: detector integration time as a function of K magnitude

pub mod dit_table;
pub mod range_table;

#[cfg(test)]
mod range_table_tests;

pub use dit_table::{DitBuckets, DitTable, TelescopeDits, REFERENCE_TELESCOPE};
pub use range_table::{KeywordRange, RangeBound, RangeTable, TemplateRanges};

use std::path::{Path, PathBuf};

pub fn range_table_path(conf_dir: &Path, instrument: &str) -> PathBuf {
    conf_dir.join(format!("{}_rangeTable.json", instrument))
}

pub fn dit_table_path(conf_dir: &Path, instrument: &str) -> PathBuf {
    conf_dir.join(format!("{}_ditTable.json", instrument))
}
