//! # specward-staleness
//!
//! Staleness analysis: detect implementations that have drifted from the
//! specification they claim to satisfy.
//!
//! Implementation source files embed two line-oriented markers:
//!
//! ```text
//! // Implements: /specs/test-cases/TC-101.yaml
//! // Case Timestamp: 2024-01-01T00:00:00Z
//! ```
//!
//! References and timestamps are extracted in file order and paired by
//! index. For each pair, the referenced specification's own timestamp is
//! compared against the recorded one; a specification newer than its
//! implementation is stale, classified into priority tiers by day delta.
//!
//! This pipeline is independent of the type registry and the validator: it
//! reads timestamps with a line scan, not the full document parser.

pub mod markers;
pub mod report;
pub mod scan;

pub use markers::{MarkerPair, extract_markers, parse_iso_utc};
pub use report::{
    STALENESS_CHECK_KIND, StalenessRecord, StalenessReport, StalenessTier, classify_days,
};
pub use scan::{ScanError, analyze_tree, collect_impl_files, spec_timestamp};
