//! Fingerprinting run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing and feature switches for a fingerprinting run.
///
/// Durations are (de)serialized as `{ "secs": .., "nanos": .. }`. Missing
/// fields take their defaults, so a partial JSON document is enough:
///
/// ```rust
/// let config: netprint::FingerprintConfig =
///     serde_json::from_str(r#"{ "neighbor_discovery": false }"#).unwrap();
/// assert!(!config.neighbor_discovery);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Wait after the session opens before draining the login banner.
    pub banner_delay: Duration,

    /// Settle delay before reading the reply to the prompt probe.
    pub prompt_settle: Duration,

    /// Settle delay before reading the reply to each paging command.
    pub command_settle: Duration,

    /// Settle delay before reading `show version` output.
    pub version_settle: Duration,

    /// Settle delay before reading neighbor output.
    pub neighbor_settle: Duration,

    /// Give up connecting after this long.
    pub connect_timeout: Duration,

    /// Extra time a read may take beyond its settle delay. A read that runs
    /// over counts as empty.
    pub read_timeout: Duration,

    /// Command that prints the system summary.
    pub version_command: String,

    /// Run the neighbor phase after a confident match.
    pub neighbor_discovery: bool,

    /// Confidence the version match must exceed before neighbors are fetched.
    pub neighbor_min_confidence: f64,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            banner_delay: Duration::from_secs(2),
            prompt_settle: Duration::from_secs(1),
            command_settle: Duration::from_secs(1),
            version_settle: Duration::from_secs(2),
            neighbor_settle: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(30),
            read_timeout: Duration::from_secs(10),
            version_command: "show version".to_string(),
            neighbor_discovery: true,
            neighbor_min_confidence: 40.0,
        }
    }
}
