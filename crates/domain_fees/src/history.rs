//! Period history
//!
//! Groups a student's records by academic period. The grouping is a
//! borrowing view over the caller's slice and can be rebuilt at any time.

use serde::{Deserialize, Serialize};

use core_kernel::{AcademicPeriod, Money};

use crate::record::FeeRecord;

/// Records of one period, in the order they were supplied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodGroup<'a> {
    pub period: &'a AcademicPeriod,
    pub records: Vec<&'a FeeRecord>,
}

impl<'a> PeriodGroup<'a> {
    /// Sum of `paid` across the group
    pub fn total_paid(&self) -> Money {
        self.records.iter().map(|r| r.paid).sum()
    }

    /// Owned copy of the group, for returning past the record slice
    pub fn to_bucket(&self) -> PeriodBucket {
        PeriodBucket {
            period: self.period.clone(),
            records: self.records.iter().map(|r| (*r).clone()).collect(),
            total_paid: self.total_paid(),
        }
    }
}

/// Owned form of a [`PeriodGroup`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    pub period: AcademicPeriod,
    pub records: Vec<FeeRecord>,
    pub total_paid: Money,
}

/// Period buckets in order of first appearance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodHistory<'a> {
    groups: Vec<PeriodGroup<'a>>,
}

impl<'a> PeriodHistory<'a> {
    pub fn groups(&self) -> &[PeriodGroup<'a>] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, period: &AcademicPeriod) -> Option<&PeriodGroup<'a>> {
        self.groups.iter().find(|g| g.period == period)
    }

    /// Buckets reordered oldest period first
    ///
    /// Unparseable labels follow the parseable ones, alphabetically.
    pub fn sorted_chronologically(mut self) -> Self {
        self.groups.sort_by(|a, b| a.period.chronological_cmp(b.period));
        self
    }

    /// Sum of `paid` over every bucket
    pub fn total_paid(&self) -> Money {
        self.groups.iter().map(PeriodGroup::total_paid).sum()
    }

    pub fn to_buckets(&self) -> Vec<PeriodBucket> {
        self.groups.iter().map(PeriodGroup::to_bucket).collect()
    }
}

impl<'a> IntoIterator for PeriodHistory<'a> {
    type Item = PeriodGroup<'a>;
    type IntoIter = std::vec::IntoIter<PeriodGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Groups records by period label, keeping discovery order
pub fn group_by_period(records: &[FeeRecord]) -> PeriodHistory<'_> {
    let mut groups: Vec<PeriodGroup<'_>> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|g| g.period == &record.period) {
            Some(group) => group.records.push(record),
            None => groups.push(PeriodGroup {
                period: &record.period,
                records: vec![record],
            }),
        }
    }
    PeriodHistory { groups }
}
