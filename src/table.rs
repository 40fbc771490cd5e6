use hashbrown::hash_map::EntryRef;
use hashbrown::HashMap;
use rust_decimal::Decimal;

use crate::error::{Result, StatsError, TotalOverflow};
use crate::stat::{Report, RunningStat};

/// Grouping key to running statistic.
///
/// Keys are matched exactly and case-sensitively. A key is only present once
/// it has been observed at least once.
#[derive(Debug, Clone)]
pub struct AggregateTable {
    stats: HashMap<String, RunningStat, ahash::RandomState>,
}

impl Default for AggregateTable {
    fn default() -> Self {
        Self::new()
    }
}

impl AggregateTable {
    pub fn new() -> Self {
        Self {
            stats: HashMap::with_hasher(ahash::RandomState::new()),
        }
    }

    /// Folds one value into `key`'s statistic, creating it on first sight.
    ///
    /// The key is only copied into an owned `String` when it is new. A value
    /// that would overflow the key's total is refused and the statistic is
    /// left as it was.
    #[inline]
    pub fn observe(&mut self, key: &str, value: Decimal) -> std::result::Result<(), TotalOverflow> {
        match self.stats.entry_ref(key) {
            EntryRef::Occupied(mut entry) => entry.get_mut().fold(value),
            EntryRef::Vacant(entry) => {
                entry.insert(RunningStat::new(value));
                Ok(())
            }
        }
    }

    /// `(min, max, average)` for a key that has been observed.
    pub fn report(&self, key: &str) -> Result<Report> {
        self.stats
            .get(key)
            .map(RunningStat::report)
            .ok_or_else(|| StatsError::KeyNotFound(key.to_owned()))
    }

    pub fn get(&self, key: &str) -> Option<&RunningStat> {
        self.stats.get(key)
    }

    /// Unions `other` into `self`, combining statistics of shared keys.
    ///
    /// Every key is merged. A shared key whose combined total would overflow
    /// keeps its own statistic, and the first such key is returned as
    /// [`StatsError::Overflow`].
    pub fn merge(&mut self, other: AggregateTable) -> Result<()> {
        let mut overflowed = None;
        for (key, stat) in other.stats {
            match self.stats.get_mut(key.as_str()) {
                Some(existing) => {
                    if existing.merge(&stat).is_err() && overflowed.is_none() {
                        overflowed = Some(key);
                    }
                }
                None => {
                    self.stats.insert(key, stat);
                }
            }
        }
        match overflowed {
            Some(key) => Err(StatsError::Overflow(key)),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RunningStat)> {
        self.stats.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Entries ordered by key.
    pub fn sorted(&self) -> Vec<(&str, &RunningStat)> {
        let mut entries = self.iter().collect::<Vec<_>>();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
