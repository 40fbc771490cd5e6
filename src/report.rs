use rust_decimal::{Decimal, RoundingStrategy};

use crate::engine::RunSummary;
use crate::table::AggregateTable;

pub const DEFAULT_PRECISION: usize = 2;

/// One `key: min=.. max=.. average=..` line per key, ordered by key.
///
/// Values are rounded half away from zero to `precision` digits, then padded.
pub fn render(table: &AggregateTable, precision: usize) -> Vec<String> {
    let dp = u32::try_from(precision).unwrap_or(u32::MAX);
    let round =
        |value: Decimal| value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    table
        .sorted()
        .into_iter()
        .map(|(key, stat)| {
            let report = stat.report();
            format!(
                "{key}: min={:.p$} max={:.p$} average={:.p$}",
                round(report.min),
                round(report.max),
                round(report.average),
                p = precision
            )
        })
        .collect()
}

pub fn render_summary(summary: &RunSummary) -> String {
    format!(
        "{} records from {} input(s); {} malformed line(s), {} blank line(s), {} failed input(s)",
        summary.records,
        summary.inputs_read,
        summary.malformed_lines,
        summary.blank_lines,
        summary.failed_inputs.len()
    )
}
