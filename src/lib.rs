//! Streaming per-ticker statistics over delimited stock files.
//!
//! Each input is read line by line; only the ticker and the `Change` column
//! are sliced out of a row, and the value is folded straight into a running
//! `(count, min, max, total)` for its ticker. Nothing proportional to the
//! input size is kept in memory.
//!
//! ```no_run
//! use stock_stats::{Engine, EngineConfig};
//!
//! let engine = Engine::new(EngineConfig::default())?;
//! let aggregation = engine.run(&["Data/stocks_1.csv", "Data/stocks_2.csv"])?;
//! let aapl = aggregation.report("AAPL")?;
//! println!("{} {} {}", aapl.min, aapl.max, aapl.average);
//! # Ok::<(), stock_stats::StatsError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod generate;
pub mod report;
pub mod source;
pub mod stat;
pub mod table;

pub use config::{ColumnLayout, EngineConfig, SourceKind};
pub use engine::{collect_inputs, Aggregation, Engine, RunSummary};
pub use error::{LineError, Result, StatsError};
pub use extract::{FieldExtractor, RawRecord};
pub use source::{open_source, InputSource, LineSource, MappedSource, RecordSource};
pub use stat::{Report, RunningStat};
pub use table::AggregateTable;
