//! Output of a successful fingerprinting run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::template::ParsedRecord;
use crate::vendor::Vendor;

/// Everything learned about one device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintResult {
    /// Vendor identified by paging, the version banner, or the matched template.
    pub vendor: Option<Vendor>,

    /// Paging commands that succeeded for the identified vendor.
    pub paging_commands: Vec<(Vendor, String)>,

    /// The device's CLI prompt.
    pub detected_prompt: String,

    /// Records parsed from the version output.
    pub parsed_data: Vec<ParsedRecord>,

    /// Id of the template that parsed the version output.
    pub template_id: String,

    /// Match score of that template, 0 to 100.
    pub confidence: f64,

    /// Wall time of the run, connection included.
    pub processing_time: Duration,

    /// Platform name taken from the template, e.g. `cisco_ios`.
    pub device_type: String,

    /// Raw neighbor listing, when the neighbor phase ran and got output.
    pub neighbor_output: Option<String>,

    /// Neighbor records, when a neighbor template matched `neighbor_output`.
    pub neighbors: Vec<ParsedRecord>,
}

impl FingerprintResult {
    /// First value of `name` (case-insensitive) in the version records.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.parsed_data
            .first()
            .and_then(|record| crate::template::field(record, name))
    }
}

/// Platform name for a template label: the label minus its last two words.
///
/// `cisco_ios_show_version` gives `cisco_ios`. Labels of two words or fewer
/// give an empty string.
pub fn device_type(label: &str) -> String {
    let parts: Vec<&str> = label.split('_').collect();
    parts[..parts.len().saturating_sub(2)].join("_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_type() {
        assert_eq!(device_type("cisco_ios_show_version"), "cisco_ios");
        assert_eq!(device_type("huawei_vrp_display_version"), "huawei_vrp");
        assert_eq!(device_type("juniper_junos_show_version"), "juniper_junos");
        assert_eq!(device_type("show_version"), "");
        assert_eq!(device_type(""), "");
    }

    #[test]
    fn test_serde_round_trip_keeps_vendor_name() {
        let mut record = ParsedRecord::new();
        record.insert("VERSION".into(), "4.27.0F".into());
        let result = FingerprintResult {
            vendor: Some(Vendor::Arista),
            paging_commands: vec![(Vendor::Arista, "terminal length 0".into())],
            detected_prompt: "leaf1#".into(),
            parsed_data: vec![record],
            template_id: "arista_eos_show_version".into(),
            confidence: 82.5,
            processing_time: Duration::from_millis(1500),
            device_type: "arista_eos".into(),
            neighbor_output: None,
            neighbors: vec![],
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["vendor"], "arista");
        assert_eq!(json["paging_commands"][0][0], "arista");
        assert_eq!(result.field("version"), Some("4.27.0F"));

        let back: FingerprintResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }
}
