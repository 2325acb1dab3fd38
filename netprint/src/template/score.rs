//! Confidence scoring of parsed records.

use serde::{Deserialize, Serialize};

use super::TemplateCategory;
use super::record::{ParsedRecord, field};

const NEIGHBOR_FIELDS: &[&str] = &[
    "LOCAL_INTERFACE",
    "NEIGHBOR_PORT_ID",
    "NEIGHBOR_NAME",
    "MGMT_ADDRESS",
    "NEIGHBOR_DESCRIPTION",
];

const SYSTEM_FIELDS: &[&str] = &["VERSION", "MODEL", "HARDWARE", "OS", "HOSTNAME", "UPTIME", "SERIAL"];

/// The three factors a score is made of.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Record count factor, 0 to 30.
    pub volume: f64,
    /// Critical field population factor, 0 to 40.
    pub population: f64,
    /// Field plausibility factor, 0 to 30.
    pub quality: f64,
}

impl ScoreBreakdown {
    /// Total score, 0 to 100.
    pub fn total(&self) -> f64 {
        self.volume + self.population + self.quality
    }
}

/// Score how well `records` look like real output of a `category` command.
///
/// Returns exactly zero for an empty record list.
pub fn score(records: &[ParsedRecord], category: TemplateCategory) -> ScoreBreakdown {
    let Some(first) = records.first() else {
        return ScoreBreakdown::default();
    };

    let volume = match category {
        TemplateCategory::Version if records.len() == 1 => 30.0,
        TemplateCategory::Version => 15.0,
        _ => (10.0 * records.len() as f64).min(30.0),
    };

    let critical = match category {
        TemplateCategory::Neighbors => NEIGHBOR_FIELDS,
        _ => SYSTEM_FIELDS,
    };
    let populated = critical
        .iter()
        .filter(|name| field(first, name).is_some_and(|v| !v.trim().is_empty()))
        .count();
    let population = 40.0 * populated as f64 / critical.len() as f64;

    let quality = match category {
        TemplateCategory::Neighbors => neighbor_quality(first),
        _ => system_quality(first),
    };

    ScoreBreakdown {
        volume,
        population,
        quality,
    }
}

fn neighbor_quality(record: &ParsedRecord) -> f64 {
    let mut quality = 0.0;
    if field(record, "LOCAL_INTERFACE")
        .is_some_and(|v| ["Gi", "Eth", "Te"].iter().any(|p| v.contains(p)))
    {
        quality += 10.0;
    }
    if field(record, "MGMT_ADDRESS").is_some_and(|v| v.matches('.').count() == 3) {
        quality += 10.0;
    }
    if field(record, "NEIGHBOR_NAME").is_some_and(|v| {
        let v = v.to_lowercase();
        !["show", "invalid", "total"].iter().any(|w| v.contains(w))
    }) {
        quality += 10.0;
    }
    quality
}

fn system_quality(record: &ParsedRecord) -> f64 {
    ["VERSION", "MODEL", "OS"]
        .iter()
        .filter(|name| field(record, name).is_some_and(|v| v.chars().count() > 3))
        .count() as f64
        * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> ParsedRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_empty_records_score_zero() {
        for category in [
            TemplateCategory::Version,
            TemplateCategory::Neighbors,
            TemplateCategory::Generic,
        ] {
            assert_eq!(score(&[], category).total(), 0.0);
        }
    }

    #[test]
    fn test_full_version_record_scores_100() {
        let rec = record(&[
            ("VERSION", "15.2(4)M"),
            ("MODEL", "C2951"),
            ("HARDWARE", "CISCO2951/K9"),
            ("OS", "C2951-UNIVERSALK9-M"),
            ("HOSTNAME", "rtr1"),
            ("UPTIME", "3 weeks"),
            ("SERIAL", "FTX1234"),
        ]);
        let breakdown = score(&[rec], TemplateCategory::Version);
        assert_eq!(breakdown.volume, 30.0);
        assert_eq!(breakdown.population, 40.0);
        assert_eq!(breakdown.quality, 30.0);
        assert_eq!(breakdown.total(), 100.0);
    }

    #[test]
    fn test_version_multiple_records_and_blank_fields() {
        let first = record(&[("VERSION", "7.0"), ("MODEL", "   "), ("OS", "NX-OS")]);
        let breakdown = score(&[first.clone(), first], TemplateCategory::Version);
        assert_eq!(breakdown.volume, 15.0);
        // VERSION and OS populated out of seven
        assert!((breakdown.population - 40.0 * 2.0 / 7.0).abs() < 1e-9);
        // "7.0" is too short, blank MODEL is too short, "NX-OS" counts
        assert_eq!(breakdown.quality, 10.0);
    }

    #[test]
    fn test_neighbor_scoring() {
        let good = record(&[
            ("LOCAL_INTERFACE", "GigabitEthernet0/1"),
            ("NEIGHBOR_PORT_ID", "Ethernet1"),
            ("NEIGHBOR_NAME", "core-2"),
            ("MGMT_ADDRESS", "10.0.0.2"),
            ("NEIGHBOR_DESCRIPTION", "Arista"),
        ]);
        let records = vec![good; 4];
        let breakdown = score(&records, TemplateCategory::Neighbors);
        assert_eq!(breakdown.volume, 30.0);
        assert_eq!(breakdown.population, 40.0);
        assert_eq!(breakdown.quality, 30.0);

        let junk = record(&[
            ("LOCAL_INTERFACE", "xe-0/0/0"),
            ("MGMT_ADDRESS", "fe80::1"),
            ("NEIGHBOR_NAME", "Total entries displayed: 2"),
        ]);
        let breakdown = score(&[junk], TemplateCategory::Neighbors);
        assert_eq!(breakdown.volume, 10.0);
        assert_eq!(breakdown.quality, 0.0);
    }

    #[test]
    fn test_field_names_case_insensitive() {
        let rec = record(&[("version", "16.9.4"), ("model", "ISR4451")]);
        let breakdown = score(&[rec], TemplateCategory::Generic);
        assert_eq!(breakdown.volume, 10.0);
        assert_eq!(breakdown.quality, 20.0);
    }

    #[test]
    fn test_score_bounded() {
        let noisy: Vec<ParsedRecord> = (0..50)
            .map(|i| record(&[("VERSION", format!("v{i}.0.0").as_str()), ("EXTRA", "x")]))
            .collect();
        for category in [
            TemplateCategory::Version,
            TemplateCategory::Neighbors,
            TemplateCategory::Generic,
        ] {
            let total = score(&noisy, category).total();
            assert!((0.0..=100.0).contains(&total), "{category:?}: {total}");
        }
    }
}
