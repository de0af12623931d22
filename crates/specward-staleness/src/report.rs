//! Staleness tiers, records, and the priority-ordered report.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const STALENESS_CHECK_KIND: &str = "specward.staleness.v1";

/// Priority tier for one implementation/specification pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalenessTier {
    Critical,
    High,
    Medium,
    Low,
    UpToDate,
}

impl StalenessTier {
    pub fn label(&self) -> &'static str {
        match self {
            StalenessTier::Critical => "critical",
            StalenessTier::High => "high",
            StalenessTier::Medium => "medium",
            StalenessTier::Low => "low",
            StalenessTier::UpToDate => "up_to_date",
        }
    }
}

impl fmt::Display for StalenessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a positive day delta into a staleness tier.
pub fn classify_days(days: i64) -> StalenessTier {
    if days > 30 {
        StalenessTier::Critical
    } else if days > 7 {
        StalenessTier::High
    } else if days >= 1 {
        StalenessTier::Medium
    } else {
        StalenessTier::Low
    }
}

/// One correlated implementation/specification pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StalenessRecord {
    pub impl_path: PathBuf,
    pub spec_path: PathBuf,
    pub spec_timestamp: DateTime<Utc>,
    pub impl_timestamp: DateTime<Utc>,
    /// Signed: positive when the specification is newer.
    pub days_stale: i64,
    pub tier: StalenessTier,
}

impl StalenessRecord {
    pub fn new(
        impl_path: PathBuf,
        spec_path: PathBuf,
        spec_timestamp: DateTime<Utc>,
        impl_timestamp: DateTime<Utc>,
    ) -> Self {
        let days_stale = (spec_timestamp - impl_timestamp).num_days();
        let tier = if spec_timestamp > impl_timestamp {
            classify_days(days_stale)
        } else {
            StalenessTier::UpToDate
        };
        Self {
            impl_path,
            spec_path,
            spec_timestamp,
            impl_timestamp,
            days_stale,
            tier,
        }
    }
}

/// Priority-ordered staleness report over one implementation tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StalenessReport {
    pub check_kind: String,
    pub critical: Vec<StalenessRecord>,
    pub high: Vec<StalenessRecord>,
    pub medium: Vec<StalenessRecord>,
    pub low: Vec<StalenessRecord>,
    pub up_to_date: Vec<StalenessRecord>,
    /// Specs whose timestamps could not be read.
    pub warnings: Vec<String>,
}

impl StalenessReport {
    pub fn new() -> Self {
        Self {
            check_kind: STALENESS_CHECK_KIND.to_string(),
            ..Self::default()
        }
    }

    pub fn push(&mut self, record: StalenessRecord) {
        match record.tier {
            StalenessTier::Critical => self.critical.push(record),
            StalenessTier::High => self.high.push(record),
            StalenessTier::Medium => self.medium.push(record),
            StalenessTier::Low => self.low.push(record),
            StalenessTier::UpToDate => self.up_to_date.push(record),
        }
    }

    pub fn stale_count(&self) -> usize {
        self.critical.len() + self.high.len() + self.medium.len() + self.low.len()
    }

    pub fn total(&self) -> usize {
        self.stale_count() + self.up_to_date.len()
    }

    /// Worst tier present, if any pair was found at all.
    pub fn worst_tier(&self) -> Option<StalenessTier> {
        if !self.critical.is_empty() {
            Some(StalenessTier::Critical)
        } else if !self.high.is_empty() {
            Some(StalenessTier::High)
        } else if !self.medium.is_empty() {
            Some(StalenessTier::Medium)
        } else if !self.low.is_empty() {
            Some(StalenessTier::Low)
        } else if !self.up_to_date.is_empty() {
            Some(StalenessTier::UpToDate)
        } else {
            None
        }
    }

    /// Exit-code policy: critical drift is a usage-level failure (2), high
    /// drift fails the run (1), anything else passes.
    pub fn exit_code(&self) -> i32 {
        match self.worst_tier() {
            Some(StalenessTier::Critical) => 2,
            Some(StalenessTier::High) => 1,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(spec: (i32, u32, u32), implementation: (i32, u32, u32)) -> StalenessRecord {
        StalenessRecord::new(
            PathBuf::from("src/login.rs"),
            PathBuf::from("specs/test-cases/TC-1.yaml"),
            Utc.with_ymd_and_hms(spec.0, spec.1, spec.2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(implementation.0, implementation.1, implementation.2, 0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn thirty_five_day_delta_is_critical() {
        let r = record((2024, 2, 5), (2024, 1, 1));
        assert_eq!(r.days_stale, 35);
        assert_eq!(r.tier, StalenessTier::Critical);
    }

    #[test]
    fn three_day_delta_is_medium() {
        let r = record((2024, 1, 4), (2024, 1, 1));
        assert_eq!(r.days_stale, 3);
        assert_eq!(r.tier, StalenessTier::Medium);
    }

    #[test]
    fn negative_delta_is_up_to_date() {
        let r = record((2024, 1, 1), (2024, 2, 5));
        assert!(r.days_stale < 0);
        assert_eq!(r.tier, StalenessTier::UpToDate);
    }

    #[test]
    fn seven_day_delta_sits_in_the_medium_tier() {
        assert_eq!(classify_days(31), StalenessTier::Critical);
        assert_eq!(classify_days(30), StalenessTier::High);
        assert_eq!(classify_days(8), StalenessTier::High);
        assert_eq!(classify_days(7), StalenessTier::Medium);
        assert_eq!(classify_days(1), StalenessTier::Medium);
        assert_eq!(classify_days(0), StalenessTier::Low);
    }

    #[test]
    fn exit_code_tracks_worst_tier() {
        let mut report = StalenessReport::new();
        assert_eq!(report.exit_code(), 0);

        report.push(record((2024, 1, 4), (2024, 1, 1)));
        assert_eq!(report.exit_code(), 0);

        report.push(record((2024, 1, 20), (2024, 1, 1)));
        assert_eq!(report.exit_code(), 1);

        report.push(record((2024, 3, 1), (2024, 1, 1)));
        assert_eq!(report.exit_code(), 2);
        assert_eq!(report.stale_count(), 3);
    }
}
