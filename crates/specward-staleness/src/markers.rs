//! Marker extraction from implementation sources.
//!
//! Two independent passes collect all `Implements:` references and all
//! `Case Timestamp:` values in file order; pairs are formed by index.
//! Positional pairing is load-bearing compatibility behavior: files with
//! unequal marker counts silently drop the unpaired tail, exactly as the
//! ecosystem already expects.

use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::OnceLock;

/// One reference/timestamp pair found in an implementation file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerPair {
    /// Corpus-rooted spec path, e.g. `/specs/test-cases/TC-101.yaml`.
    pub spec_path: String,
    /// The implementation's recorded timestamp.
    pub timestamp: DateTime<Utc>,
}

fn implements_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?:Implements|implements):\s*(/specs/(?:test|scenario|precondition)-cases/[A-Z]+-\d+(?:-[a-z0-9_]+)?\.yaml)",
        )
        .expect("implements regex must compile")
    })
}

fn case_timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?:Case Timestamp|case_timestamp):\s*([0-9TZ:\-]+)")
            .expect("case timestamp regex must compile")
    })
}

/// Parse an ISO-8601 UTC timestamp, with or without the trailing `Z`.
pub fn parse_iso_utc(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Extract reference/timestamp pairs from one file's text.
///
/// Pairs whose timestamp does not parse are dropped; references without a
/// positional partner are dropped.
pub fn extract_markers(text: &str) -> Vec<MarkerPair> {
    let spec_paths: Vec<&str> = implements_re()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let timestamps: Vec<&str> = case_timestamp_re()
        .captures_iter(text)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    spec_paths
        .iter()
        .enumerate()
        .filter_map(|(idx, spec_path)| {
            let raw = timestamps.get(idx)?;
            let timestamp = parse_iso_utc(raw)?;
            Some(MarkerPair {
                spec_path: spec_path.to_string(),
                timestamp,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn pairs_are_formed_in_file_order() {
        let text = "\
// Implements: /specs/test-cases/TC-1.yaml
// Case Timestamp: 2024-01-01T00:00:00Z
fn one() {}

// Implements: /specs/precondition-cases/PC-2.yaml
// Case Timestamp: 2024-02-05T00:00:00Z
fn two() {}
";
        let pairs = extract_markers(text);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].spec_path, "/specs/test-cases/TC-1.yaml");
        assert_eq!(
            pairs[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(pairs[1].spec_path, "/specs/precondition-cases/PC-2.yaml");
    }

    #[test]
    fn unpaired_trailing_reference_is_dropped() {
        let text = "\
# Implements: /specs/test-cases/TC-1.yaml
# Case Timestamp: 2024-01-01T00:00:00Z
# Implements: /specs/test-cases/TC-2.yaml
";
        let pairs = extract_markers(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].spec_path, "/specs/test-cases/TC-1.yaml");
    }

    #[test]
    fn descriptive_filenames_are_recognized() {
        let text = "\
// Implements: /specs/test-cases/TC-7-login_flow.yaml
// Case Timestamp: 2024-01-01T00:00:00Z
";
        let pairs = extract_markers(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].spec_path, "/specs/test-cases/TC-7-login_flow.yaml");
    }

    #[test]
    fn unparseable_timestamp_drops_the_pair() {
        let text = "\
// Implements: /specs/test-cases/TC-1.yaml
// Case Timestamp: 2024-13-99T99:99:99Z
";
        assert!(extract_markers(text).is_empty());
    }

    #[test]
    fn lowercase_marker_spelling_is_accepted() {
        let text = "\
# implements: /specs/scenario-cases/SC-3.yaml
# case_timestamp: 2024-06-15T12:30:00Z
";
        let pairs = extract_markers(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].spec_path, "/specs/scenario-cases/SC-3.yaml");
    }

    #[test]
    fn timestamps_without_zone_suffix_parse_as_utc() {
        assert_eq!(
            parse_iso_utc("2024-01-01T00:00:00"),
            Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert!(parse_iso_utc("not a timestamp").is_none());
    }
}
