//! TextFSM template store and best-match selection.
//!
//! A [`TemplateRepository`] holds parsing templates keyed by the command they
//! parse (`cisco_ios_show_version`, `arista_eos_show_lldp_neighbors_detail`,
//! ...). The [`TemplateMatcher`] runs every candidate over a block of raw CLI
//! output and keeps the one whose records [`score`] highest.

mod matcher;
mod record;
mod repository;
mod score;

use serde::{Deserialize, Serialize};

pub use matcher::{MatchOutcome, TemplateMatcher};
pub use record::{ParsedRecord, field, parse};
pub use repository::TemplateRepository;
pub use score::{ScoreBreakdown, score};

/// What kind of command output a template parses, derived from its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    /// Neighbor discovery tables (CDP/LLDP).
    Neighbors,
    /// `show version` style system summaries.
    Version,
    /// Anything else.
    Generic,
}

impl TemplateCategory {
    /// Classify a context label. Neighbor labels win over version labels.
    pub fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("neighbors") {
            Self::Neighbors
        } else if label.contains("version") {
            Self::Version
        } else {
            Self::Generic
        }
    }
}

/// A parsing template. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Stable identifier within the repository.
    pub id: String,

    /// Command keyword tag, e.g. `cisco_ios_show_version`.
    pub context_label: String,

    /// TextFSM source.
    pub body: String,

    /// Category derived from `context_label`.
    pub category: TemplateCategory,
}

impl Template {
    /// Create a template, classifying it from its label.
    pub fn new(
        id: impl Into<String>,
        context_label: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        let context_label = context_label.into();
        Self {
            id: id.into(),
            category: TemplateCategory::from_label(&context_label),
            context_label,
            body: body.into(),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Templates and captured device output shared by tests.

    pub const CISCO_IOS_SHOW_VERSION: &str = r"Value VERSION ([^,\s]+)
Value HOSTNAME (\S+)
Value UPTIME (.+)
Value HARDWARE (\S+)
Value SERIAL (\S+)
Value MODEL (\S+)
Value OS ([^)]+)

Start
  ^.*Software\s+\(${OS}\),\s+Version\s+${VERSION},
  ^\s*${HOSTNAME}\s+uptime\s+is\s+${UPTIME}
  ^[Cc]isco\s+${HARDWARE}\s+\(
  ^[Mm]odel\s+[Nn]umber\s+:\s+${MODEL}
  ^[Ss]ystem\s+[Ss]erial\s+[Nn]umber\s+:\s+${SERIAL} -> Record
";

    pub const CISCO_IOS_SHOW_VERSION_OUTPUT: &str = "show version
Cisco IOS Software, C3750E Software (C3750E-UNIVERSALK9-M), Version 15.0(2)SE11, RELEASE SOFTWARE (fc3)
Technical Support: http://www.cisco.com/techsupport
Copyright (c) 1986-2017 by Cisco Systems, Inc.

ROM: Bootstrap program is C3750E boot loader
sw-core-01 uptime is 2 years, 10 weeks, 3 days, 4 hours, 12 minutes
System image file is \"flash:c3750e-universalk9-mz.150-2.SE11.bin\"

cisco WS-C3750X-48P (PowerPC405) processor (revision A0) with 262144K bytes of memory.
Processor board ID FDO1234X5YZ

Model number                    : WS-C3750X-48P-S
System serial number            : FDO1234X5YZ
sw-core-01#";

    /// Loose template that yields one sparse record per line of any output.
    pub const GENERIC_SHOW_VERSION: &str = r"Value VERSION (\S+)

Start
  ^${VERSION} -> Record
";

    pub const HP_COMWARE_DISPLAY_VERSION: &str = r"Value VERSION (\S+)
Value RELEASE (\S+)
Value MODEL (\S+)
Value UPTIME (.+)

Start
  ^Comware Software, Version ${VERSION}, Release ${RELEASE}
  ^HPE?\s+${MODEL}\s+.*uptime\s+is\s+${UPTIME} -> Record
";

    pub const HP_COMWARE_DISPLAY_VERSION_OUTPUT: &str = "display version
HPE Comware Platform Software
Comware Software, Version 7.1.045, Release 3208P03
Copyright (c) 2010-2017 Hewlett Packard Enterprise Development LP
HPE 5130-24G-4SFP+ EI uptime is 0 weeks, 2 days, 3 hours, 11 minutes
Last reboot reason : User reboot
<hp-sw1>";

    pub const CISCO_IOS_SHOW_CDP_NEIGHBORS_DETAIL: &str = r"Value NEIGHBOR_NAME (\S+)
Value MGMT_ADDRESS (\d+\.\d+\.\d+\.\d+)
Value LOCAL_INTERFACE (\S+)
Value NEIGHBOR_PORT_ID (\S+)
Value NEIGHBOR_DESCRIPTION (.+)

Start
  ^Device ID:\s*${NEIGHBOR_NAME}
  ^\s+IP address:\s*${MGMT_ADDRESS}
  ^Platform:\s*${NEIGHBOR_DESCRIPTION},
  ^Interface:\s*${LOCAL_INTERFACE},\s+Port ID \(outgoing port\):\s*${NEIGHBOR_PORT_ID} -> Record
";

    pub const CISCO_IOS_SHOW_CDP_NEIGHBORS_DETAIL_OUTPUT: &str = "show cdp neighbors detail
-------------------------
Device ID: dist-sw-02
Entry address(es):
  IP address: 10.10.0.2
Platform: cisco WS-C4500X-16,  Capabilities: Router Switch IGMP
Interface: GigabitEthernet1/0/49,  Port ID (outgoing port): TenGigabitEthernet1/1/1
Holdtime : 150 sec

-------------------------
Device ID: dist-sw-03
Entry address(es):
  IP address: 10.10.0.3
Platform: cisco WS-C4500X-16,  Capabilities: Router Switch IGMP
Interface: GigabitEthernet1/0/50,  Port ID (outgoing port): TenGigabitEthernet1/1/2
Holdtime : 163 sec

sw-core-01#";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_label() {
        assert_eq!(
            TemplateCategory::from_label("cisco_ios_show_version"),
            TemplateCategory::Version
        );
        assert_eq!(
            TemplateCategory::from_label("cisco_ios_show_cdp_neighbors_detail"),
            TemplateCategory::Neighbors
        );
        assert_eq!(
            TemplateCategory::from_label("Show_Version_Neighbors"),
            TemplateCategory::Neighbors
        );
        assert_eq!(
            TemplateCategory::from_label("cisco_ios_show_interfaces"),
            TemplateCategory::Generic
        );
    }

    #[test]
    fn test_template_new_classifies() {
        let template = Template::new("7", "huawei_vrp_display_version", "Value X (.*)\n\nStart\n");
        assert_eq!(template.category, TemplateCategory::Version);
        assert_eq!(template.id, "7");
    }
}
