use rust_decimal::Decimal;

use crate::error::TotalOverflow;

/// Running statistic for one grouping key.
///
/// Only the four running numbers are kept; individual observations are
/// folded in and forgotten. A `RunningStat` always holds at least one
/// observation, so `min <= average <= max` holds for every instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunningStat {
    count: u64,
    min: Decimal,
    max: Decimal,
    total: Decimal,
}

impl RunningStat {
    /// Starts a statistic from its first observation.
    pub fn new(value: Decimal) -> Self {
        Self {
            count: 1,
            min: value,
            max: value,
            total: value,
        }
    }

    /// Folds one more observation in; on overflow nothing is changed.
    #[inline]
    pub fn fold(&mut self, value: Decimal) -> Result<(), TotalOverflow> {
        self.total = self.total.checked_add(value).ok_or(TotalOverflow)?;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.count += 1;
        Ok(())
    }

    /// Combines two partial statistics for the same key; on overflow
    /// nothing is changed.
    pub fn merge(&mut self, other: &RunningStat) -> Result<(), TotalOverflow> {
        self.total = self.total.checked_add(other.total).ok_or(TotalOverflow)?;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count += other.count;
        Ok(())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// `total / count`, computed on every call.
    pub fn average(&self) -> Decimal {
        self.total / Decimal::from(self.count)
    }

    pub fn report(&self) -> Report {
        Report {
            min: self.min,
            max: self.max,
            average: self.average(),
        }
    }
}

/// The `(min, max, average)` view handed to consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub min: Decimal,
    pub max: Decimal,
    pub average: Decimal,
}
