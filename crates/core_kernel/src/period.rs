//! Academic period labels
//!
//! Fee obligations and payment history are scoped by a free-form term label
//! such as `"2025 Spring"`. The label itself is the identity; when it follows
//! the `<year> <term>` shape it also gets a chronological sort key.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Errors raised when building a period label
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PeriodError {
    #[error("Academic period label must not be empty")]
    Empty,
}

/// Term within an academic year, in calendar order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Term {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Term {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "winter" => Some(Term::Winter),
            "spring" => Some(Term::Spring),
            "summer" => Some(Term::Summer),
            "fall" | "autumn" => Some(Term::Fall),
            _ => None,
        }
    }
}

/// An academic period (semester/term) label
///
/// Equality and hashing use the trimmed label verbatim, so `"2025 Spring"`
/// and `"2025 spring"` are different periods, matching how the stored
/// records were labelled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AcademicPeriod(String);

impl AcademicPeriod {
    /// Creates a period from a label, trimming surrounding whitespace
    pub fn new(label: impl Into<String>) -> Result<Self, PeriodError> {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return Err(PeriodError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Parses `<year> <term>` (or `<term> <year>`) into its parts
    pub fn year_and_term(&self) -> Option<(i32, Term)> {
        let mut parts = self.0.split_whitespace();
        let first = parts.next()?;
        let second = parts.next()?;
        if parts.next().is_some() {
            return None;
        }

        if let Ok(year) = first.parse::<i32>() {
            return Term::parse(second).map(|term| (year, term));
        }
        let year = second.parse::<i32>().ok()?;
        Term::parse(first).map(|term| (year, term))
    }

    /// Chronological ordering: parsed labels by (year, term) first,
    /// unparsed labels after them in lexicographic order
    pub fn chronological_cmp(&self, other: &Self) -> Ordering {
        match (self.year_and_term(), other.year_and_term()) {
            (Some(a), Some(b)) => a.cmp(&b).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl fmt::Display for AcademicPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for AcademicPeriod {
    type Error = PeriodError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        Self::new(label)
    }
}

impl From<AcademicPeriod> for String {
    fn from(period: AcademicPeriod) -> String {
        period.0
    }
}

impl std::str::FromStr for AcademicPeriod {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_year_first_and_term_first() {
        let a = AcademicPeriod::new("2025 Spring").unwrap();
        let b = AcademicPeriod::new("Fall 2024").unwrap();
        assert_eq!(a.year_and_term(), Some((2025, Term::Spring)));
        assert_eq!(b.year_and_term(), Some((2024, Term::Fall)));
    }

    #[test]
    fn test_chronological_order() {
        let mut periods: Vec<AcademicPeriod> = ["2025 Spring", "Term A", "2024 Fall", "2025 Winter"]
            .into_iter()
            .map(|l| AcademicPeriod::new(l).unwrap())
            .collect();
        periods.sort_by(|a, b| a.chronological_cmp(b));

        let labels: Vec<&str> = periods.iter().map(|p| p.label()).collect();
        assert_eq!(labels, vec!["2024 Fall", "2025 Winter", "2025 Spring", "Term A"]);
    }

    #[test]
    fn test_empty_label_rejected() {
        assert_eq!(AcademicPeriod::new("   "), Err(PeriodError::Empty));
    }
}
