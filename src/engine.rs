use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::config::EngineConfig;
use crate::error::{LineError, Result, StatsError};
use crate::extract::FieldExtractor;
use crate::source::{open_source, RecordSource};
use crate::stat::Report;
use crate::table::AggregateTable;

/// Counters and errors collected over a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub inputs_read: usize,
    pub records: u64,
    pub blank_lines: u64,
    pub malformed_lines: u64,
    /// Inputs that could not be opened or read to the end.
    pub failed_inputs: Vec<StatsError>,
    /// The first malformed lines, up to the configured sample size.
    pub malformed: Vec<StatsError>,
}

impl RunSummary {
    pub fn merge(&mut self, other: RunSummary) {
        self.inputs_read += other.inputs_read;
        self.records += other.records;
        self.blank_lines += other.blank_lines;
        self.malformed_lines += other.malformed_lines;
        self.failed_inputs.extend(other.failed_inputs);
        self.malformed.extend(other.malformed);
    }
}

/// Result of a run: the finished table plus what happened along the way.
#[derive(Debug)]
pub struct Aggregation {
    pub table: AggregateTable,
    pub summary: RunSummary,
}

impl Aggregation {
    pub fn report(&self, key: &str) -> Result<Report> {
        self.table.report(key)
    }
}

/// Single-pass, single-threaded aggregation over a list of inputs.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    extractor: FieldExtractor,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let extractor = FieldExtractor::new(&config.layout);
        Ok(Self { config, extractor })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Aggregates every input, in order, into one shared table.
    ///
    /// An input that cannot be opened or read fails the whole run when
    /// `fail_fast` is set; otherwise it is recorded in
    /// [`RunSummary::failed_inputs`] and the run moves on. Records already
    /// folded from an input that fails part way stay in the table.
    pub fn run<P: AsRef<Path>>(&self, inputs: &[P]) -> Result<Aggregation> {
        self.run_with(inputs, |path| open_source(path, self.config.source))
    }

    /// `run` with the way an input is opened supplied by the caller.
    fn run_with<P, S, F>(&self, inputs: &[P], mut open: F) -> Result<Aggregation>
    where
        P: AsRef<Path>,
        S: RecordSource,
        F: FnMut(&Path) -> io::Result<S>,
    {
        let started = Instant::now();
        let mut table = AggregateTable::new();
        let mut summary = RunSummary::default();

        for input in inputs {
            let path = input.as_ref();
            match self.run_input(path, &mut open, &mut table, &mut summary) {
                Ok(()) => summary.inputs_read += 1,
                Err(err) if self.config.fail_fast => {
                    error!(path = %path.display(), error = %err, "aborting run");
                    return Err(err);
                }
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping input");
                    summary.failed_inputs.push(err);
                }
            }
        }

        info!(
            inputs = summary.inputs_read,
            failed = summary.failed_inputs.len(),
            records = summary.records,
            malformed = summary.malformed_lines,
            keys = table.len(),
            elapsed = ?started.elapsed(),
            "aggregation finished"
        );
        Ok(Aggregation { table, summary })
    }

    fn run_input<S, F>(
        &self,
        path: &Path,
        open: &mut F,
        table: &mut AggregateTable,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        S: RecordSource,
        F: FnMut(&Path) -> io::Result<S>,
    {
        let unavailable = |source: io::Error| StatsError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let mut source = open(path).map_err(unavailable)?;
        debug!(path = %path.display(), kind = ?self.config.source, "input opened");

        let before = summary.records;
        self.ingest(path, &mut source, table, summary).map_err(unavailable)?;
        info!(path = %path.display(), records = summary.records - before, "input aggregated");
        Ok(())
    }

    /// Folds one opened source into `table`.
    ///
    /// The first line is a header and is discarded unread. Blank lines are
    /// counted and skipped; malformed lines, including values that would
    /// overflow their key's total, are counted, sampled and skipped. Only I/O
    /// errors from the source stop the loop.
    pub fn ingest<S: RecordSource>(
        &self,
        path: &Path,
        source: &mut S,
        table: &mut AggregateTable,
        summary: &mut RunSummary,
    ) -> io::Result<()> {
        if source.next_line()?.is_none() {
            return Ok(());
        }

        let mut line_no: u64 = 1;
        while let Some(line) = source.next_line()? {
            line_no += 1;
            match self.extractor.extract(line) {
                Ok(Some(record)) => match table.observe(record.key, record.value) {
                    Ok(()) => summary.records += 1,
                    Err(overflow) => self.reject(path, line_no, overflow.into(), summary),
                },
                Ok(None) => summary.blank_lines += 1,
                Err(reason) => self.reject(path, line_no, reason, summary),
            }
        }
        Ok(())
    }

    fn reject(&self, path: &Path, line: u64, reason: LineError, summary: &mut RunSummary) {
        summary.malformed_lines += 1;
        if summary.malformed.len() < self.config.malformed_samples {
            warn!(path = %path.display(), line, %reason, "skipping malformed line");
            summary.malformed.push(StatsError::MalformedLine {
                path: path.to_path_buf(),
                line,
                reason,
            });
        } else {
            debug!(path = %path.display(), line, %reason, "skipping malformed line");
        }
    }
}

/// Expands directories into the regular files directly inside them, sorted
/// by name. Other paths are passed through untouched.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut inputs = Vec::new();
    for path in paths {
        let path = path.as_ref();
        if !path.is_dir() {
            inputs.push(path.to_path_buf());
            continue;
        }
        let unavailable = |source: io::Error| StatsError::InputUnavailable {
            path: path.to_path_buf(),
            source,
        };
        let mut files = Vec::new();
        for entry in path.read_dir().map_err(unavailable)? {
            let entry = entry.map_err(unavailable)?;
            if entry.file_type().map_err(unavailable)?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        inputs.extend(files);
    }
    Ok(inputs)
}
