//! Accumulators that fold raw records into summary statistics.
//!
//! Every accumulator is owned by a single pass and merges records one at a
//! time. Orderings are stable: when two keys tie, the one seen first ranks
//! first.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::ranked::Ranked;

/// Rounds to 3 decimal places.
#[must_use]
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Running per-key totals in first-seen order.
#[derive(Debug, Clone, Default)]
pub struct Tally {
    index: HashMap<String, usize>,
    entries: Vec<(String, u64)>,
    total: u64,
    folded: usize,
}

impl Tally {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one record contributing `amount` to `key`.
    pub fn add(&mut self, key: &str, amount: u64) {
        match self.index.get(key) {
            Some(&slot) => self.entries[slot].1 += amount,
            None => {
                self.index.insert(key.to_owned(), self.entries.len());
                self.entries.push((key.to_owned(), amount));
            }
        }
        self.total += amount;
        self.folded += 1;
    }

    #[must_use]
    pub fn get(&self, key: &str) -> u64 {
        self.index.get(key).map_or(0, |&slot| self.entries[slot].1)
    }

    /// Sum of all amounts folded so far.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of records folded so far.
    #[must_use]
    pub fn folded(&self) -> usize {
        self.folded
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All keys sorted by amount descending, ties in first-seen order.
    #[must_use]
    pub fn ranked(&self) -> Ranked<u64> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        Ranked::new(entries)
    }

    /// The `n` highest-ranked keys.
    #[must_use]
    pub fn top_keys(&self, n: usize) -> Vec<String> {
        self.ranked()
            .into_inner()
            .into_iter()
            .take(n)
            .map(|(key, _)| key)
            .collect()
    }

    /// Each key's share of the total, in rank order, rounded to 3 decimals.
    ///
    /// Returns `None` when the total is zero.
    #[must_use]
    pub fn percentages(&self) -> Option<Ranked<f64>> {
        if self.total == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let total = self.total as f64;
        Some(
            self.ranked()
                .into_inner()
                .into_iter()
                .map(|(key, amount)| {
                    #[allow(clippy::cast_precision_loss)]
                    let share = amount as f64 / total;
                    (key, round3(share))
                })
                .collect(),
        )
    }
}

/// Bounded top-N selection by a `u64` key, ties resolved first-seen.
#[derive(Debug, Clone)]
pub struct TopN<T> {
    capacity: usize,
    items: Vec<(u64, T)>,
}

impl<T> TopN<T> {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            items: Vec::with_capacity(capacity.min(64)),
        }
    }

    pub fn push(&mut self, key: u64, item: T) {
        // Items stay sorted descending; a new item lands after every equal key.
        let pos = self.items.partition_point(|(k, _)| *k >= key);
        if pos >= self.capacity {
            return;
        }
        self.items.insert(pos, (key, item));
        self.items.truncate(self.capacity);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter().map(|(_, item)| item)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.items.into_iter().map(|(_, item)| item).collect()
    }
}

/// Buckets holding `[recent_count, all_time_count]` pairs.
#[derive(Debug, Clone, Default)]
pub struct DualWindow {
    index: HashMap<String, usize>,
    entries: Vec<(String, [u64; 2])>,
}

impl DualWindow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `count` to the all-time component of `bucket`, and to the recent
    /// component when `recent` is set.
    pub fn record(&mut self, bucket: &str, recent: bool, count: u64) {
        let slot = match self.index.get(bucket) {
            Some(&slot) => slot,
            None => {
                self.index.insert(bucket.to_owned(), self.entries.len());
                self.entries.push((bucket.to_owned(), [0, 0]));
                self.entries.len() - 1
            }
        };
        let pair = &mut self.entries[slot].1;
        if recent {
            pair[0] += count;
        }
        pair[1] += count;
    }

    #[must_use]
    pub fn get(&self, bucket: &str) -> Option<[u64; 2]> {
        self.index.get(bucket).map(|&slot| self.entries[slot].1)
    }

    /// Column sums: `[recent_total, all_time_total]`.
    #[must_use]
    pub fn totals(&self) -> [u64; 2] {
        self.entries
            .iter()
            .fold([0, 0], |acc, (_, pair)| [acc[0] + pair[0], acc[1] + pair[1]])
    }

    /// Buckets sorted by the recent component descending, ties first-seen.
    #[must_use]
    pub fn ranked(&self) -> Ranked<[u64; 2]> {
        let mut entries = self.entries.clone();
        entries.sort_by(|a, b| b.1[0].cmp(&a.1[0]));
        Ranked::new(entries)
    }
}

/// Contribution counts per weekday (`Mon`..`Sun`) and month (`Jan`..`Dec`),
/// each split into last-365-days and all-time windows relative to `now`.
#[derive(Debug, Clone)]
pub struct DayMonthHistogram {
    cutoff: DateTime<Utc>,
    per_day: DualWindow,
    per_month: DualWindow,
    days_folded: usize,
}

impl DayMonthHistogram {
    #[must_use]
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            cutoff: now - TimeDelta::days(365),
            per_day: DualWindow::new(),
            per_month: DualWindow::new(),
            days_folded: 0,
        }
    }

    /// Whether `date` (taken at midnight UTC) lies within 365 days of `now`.
    #[must_use]
    pub fn is_recent(&self, date: NaiveDate) -> bool {
        date.and_time(NaiveTime::MIN).and_utc() >= self.cutoff
    }

    pub fn record(&mut self, date: NaiveDate, count: u64) {
        let recent = self.is_recent(date);
        self.per_day
            .record(&date.format("%a").to_string(), recent, count);
        self.per_month
            .record(&date.format("%b").to_string(), recent, count);
        self.days_folded += 1;
    }

    #[must_use]
    pub fn days_folded(&self) -> usize {
        self.days_folded
    }

    #[must_use]
    pub fn per_day(&self) -> &DualWindow {
        &self.per_day
    }

    #[must_use]
    pub fn per_month(&self) -> &DualWindow {
        &self.per_month
    }
}

/// Repository owner classification reported by the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    User,
    Organization,
}

impl OwnerKind {
    /// Parses an upstream type name (`"User"` / `"Organization"`).
    #[must_use]
    pub fn parse(type_name: &str) -> Option<Self> {
        match type_name {
            "User" => Some(Self::User),
            "Organization" => Some(Self::Organization),
            _ => None,
        }
    }
}

/// Routes per-owner counts into separate user and organization tallies.
#[derive(Debug, Clone, Default)]
pub struct OwnerAttribution {
    users: Tally,
    organizations: Tally,
}

impl OwnerAttribution {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: OwnerKind, owner: &str, count: u64) {
        match kind {
            OwnerKind::User => self.users.add(owner, count),
            OwnerKind::Organization => self.organizations.add(owner, count),
        }
    }

    #[must_use]
    pub fn users(&self) -> &Tally {
        &self.users
    }

    #[must_use]
    pub fn organizations(&self) -> &Tally {
        &self.organizations
    }
}
