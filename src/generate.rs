//! Synthetic stock files in the nine-column layout the engine reads.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::{Result, StatsError};

pub const HEADER: &str = "Ticker,Date,Open,High,Low,Close,Volume,AdjClose,Change";

pub const DEFAULT_TICKERS: [&str; 21] = [
    "AAPL", "MSFT", "GOOGL", "AMZN", "META", "TSLA", "NVDA", "JPM", "V", "WMT", "SKE", "QQW", "NJXE",
    "KJKLSJ", "PLMNO", "ZXCVB", "QWERTY", "ASDFG", "HJKLZ", "POIUY", "MNBVC",
];

const DAYS_PER_YEAR: usize = 365;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub output_dir: PathBuf,
    pub file_count: usize,
    pub records_per_file: usize,
    pub tickers: Vec<String>,
    /// File `n` is generated from `seed + n`, so output is reproducible.
    pub seed: u64,
    pub start_date: NaiveDate,
}

impl GeneratorConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_count: 5,
            records_per_file: 1_000_000,
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            seed: 0,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }

    pub fn with_file_count(mut self, file_count: usize) -> Self {
        self.file_count = file_count;
        self
    }

    pub fn with_records_per_file(mut self, records: usize) -> Self {
        self.records_per_file = records;
        self
    }

    pub fn with_tickers(mut self, tickers: Vec<String>) -> Self {
        self.tickers = tickers;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tickers.is_empty() {
            return Err(StatsError::InvalidConfig("at least one ticker is required".into()));
        }
        if let Some(bad) = self
            .tickers
            .iter()
            .find(|t| t.is_empty() || t.contains(&[',', '\n', '\r'][..]))
        {
            return Err(StatsError::InvalidConfig(format!("unusable ticker {bad:?}")));
        }
        if self.start_date.checked_add_days(Days::new(DAYS_PER_YEAR as u64)).is_none() {
            return Err(StatsError::InvalidConfig("start date is out of range".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub records: usize,
    pub bytes: u64,
}

/// Writes `stocks_1.csv` .. `stocks_{file_count}.csv`, one file per rayon task.
pub fn generate(config: &GeneratorConfig) -> Result<Vec<GeneratedFile>> {
    config.validate()?;
    fs::create_dir_all(&config.output_dir)?;
    info!(
        files = config.file_count,
        records_per_file = config.records_per_file,
        dir = %config.output_dir.display(),
        "generating data"
    );

    let files = (0..config.file_count)
        .into_par_iter()
        .map(|index| write_file(config, index))
        .collect::<Result<Vec<_>>>()?;

    for file in &files {
        info!(path = %file.path.display(), kib = file.bytes / 1024, "generated");
    }
    info!(
        records = config.file_count * config.records_per_file,
        bytes = files.iter().map(|f| f.bytes).sum::<u64>(),
        "generation finished"
    );
    Ok(files)
}

fn write_file(config: &GeneratorConfig, index: usize) -> Result<GeneratedFile> {
    let path = file_path(&config.output_dir, index);
    let mut rng = StdRng::seed_from_u64(config.seed.wrapping_add(index as u64));
    let mut out = BufWriter::new(File::create(&path)?);

    writeln!(out, "{HEADER}")?;
    for row in 0..config.records_per_file {
        let ticker = &config.tickers[rng.gen_range(0..config.tickers.len())];
        let date = config
            .start_date
            .checked_add_days(Days::new((row % DAYS_PER_YEAR) as u64))
            .ok_or_else(|| StatsError::InvalidConfig("start date is out of range".into()))?;
        let bar = Bar::random(&mut rng);
        writeln!(
            out,
            "{ticker},{date},{},{},{},{},{},{},{}",
            bar.open, bar.high, bar.low, bar.close, bar.volume, bar.close, bar.change
        )?;
    }
    out.flush()?;
    drop(out);

    let bytes = fs::metadata(&path)?.len();
    Ok(GeneratedFile {
        path,
        records: config.records_per_file,
        bytes,
    })
}

fn file_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("stocks_{}.csv", index + 1))
}

/// One day of prices, all in whole cents.
struct Bar {
    open: Decimal,
    high: Decimal,
    low: Decimal,
    close: Decimal,
    volume: u64,
    change: Decimal,
}

impl Bar {
    fn random<R: Rng>(rng: &mut R) -> Self {
        let open: i64 = rng.gen_range(10_000..40_000);
        let volatility: i64 = rng.gen_range(0..1_000);
        let high = open + volatility;
        let low = open - volatility;
        let close = rng.gen_range(low..=high);
        Self {
            open: Decimal::new(open, 2),
            high: Decimal::new(high, 2),
            low: Decimal::new(low, 2),
            close: Decimal::new(close, 2),
            volume: rng.gen_range(10_000_000..100_000_000),
            change: Decimal::new(close - open, 2),
        }
    }
}
