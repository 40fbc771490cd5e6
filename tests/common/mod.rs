//! Shared fixtures: on-disk inputs in a temporary directory.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;

pub const HEADER: &str = "Ticker,Date,Open,High,Low,Close,Volume,AdjClose,Change";

pub const SAMPLE: &str = "Ticker,Date,Open,High,Low,Close,Volume,AdjClose,Change\n\
    AAPL,2024-01-01,1,2,3,4,5,6,1.50\n\
    AAPL,2024-01-02,1,2,3,4,5,6,-0.50\n\
    MSFT,2024-01-01,1,2,3,4,5,6,2.00\n";

pub fn d(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// A nine-column row with only ticker and change filled in meaningfully.
pub fn row(ticker: &str, change: &str) -> String {
    format!("{ticker},2024-01-01,100.00,101.00,99.00,100.50,12345678,100.50,{change}")
}

/// Writes `files` into a fresh temp dir, returning the dir and the paths in order.
///
/// The caller must keep the `TempDir` alive for as long as the files are read.
pub fn write_inputs(files: &[(&str, &str)]) -> (tempfile::TempDir, Vec<PathBuf>) {
    let dir = tempfile::tempdir().unwrap();
    let paths = files
        .iter()
        .map(|(name, content)| {
            let path = dir.path().join(name);
            fs::write(&path, content).unwrap();
            path
        })
        .collect();
    (dir, paths)
}
