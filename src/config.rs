use crate::error::{Result, StatsError};

pub const DEFAULT_COLUMNS: usize = 9;
pub const DEFAULT_KEY_COLUMN: usize = 0;
/// `Change`, the last column of `Ticker,Date,Open,High,Low,Close,Volume,AdjClose,Change`.
pub const DEFAULT_VALUE_COLUMN: usize = 8;
pub const DEFAULT_MALFORMED_SAMPLES: usize = 10;

/// Where the key and value live in a delimited row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub columns: usize,
    pub key_column: usize,
    pub value_column: usize,
    pub delimiter: u8,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            key_column: DEFAULT_KEY_COLUMN,
            value_column: DEFAULT_VALUE_COLUMN,
            delimiter: b',',
        }
    }
}

impl ColumnLayout {
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(StatsError::InvalidConfig("column count must be at least 1".into()));
        }
        if self.key_column >= self.columns || self.value_column >= self.columns {
            return Err(StatsError::InvalidConfig(format!(
                "key column {} and value column {} must both be below column count {}",
                self.key_column, self.value_column, self.columns
            )));
        }
        if self.key_column == self.value_column {
            return Err(StatsError::InvalidConfig(
                "key and value must be different columns".into(),
            ));
        }
        Ok(())
    }
}

/// How an input file is turned into lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SourceKind {
    /// `BufReader` with a single reused line buffer.
    #[default]
    Buffered,
    /// Read-only memory map, lines sliced out on demand.
    Mapped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub layout: ColumnLayout,
    /// Abort the whole run on the first unreadable input.
    pub fail_fast: bool,
    pub source: SourceKind,
    /// Malformed-line errors kept verbatim in the run summary.
    pub malformed_samples: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            layout: ColumnLayout::default(),
            fail_fast: false,
            source: SourceKind::default(),
            malformed_samples: DEFAULT_MALFORMED_SAMPLES,
        }
    }
}

impl EngineConfig {
    pub fn with_layout(mut self, layout: ColumnLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn with_source(mut self, source: SourceKind) -> Self {
        self.source = source;
        self
    }

    pub fn with_malformed_samples(mut self, samples: usize) -> Self {
        self.malformed_samples = samples;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.layout.validate()
    }
}
