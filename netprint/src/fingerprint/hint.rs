//! Template hint derivation from version output.

use crate::vendor::{Vendor, VendorRegistry};

/// Hint used when nothing more specific is known.
pub const GENERIC_VERSION_HINT: &str = "show_version";

/// Retry filter after a vendor-specific hint: any version template, whatever
/// the vendor calls its version command.
pub const BROADENED_VERSION_HINT: &str = "version";

struct HintRule {
    vendor_token: &'static str,
    os_token: &'static str,
    vendor: Vendor,
    hint: &'static str,
}

/// Checked in order; the first rule whose tokens both occur wins. The vendor
/// token is matched ignoring case, the OS token exactly. An empty vendor
/// token always matches.
const RULES: &[HintRule] = &[
    HintRule {
        vendor_token: "cisco",
        os_token: "Nexus",
        vendor: Vendor::Cisco,
        hint: "cisco_nxos_show_version",
    },
    HintRule {
        vendor_token: "cisco",
        os_token: "IOS XR",
        vendor: Vendor::Cisco,
        hint: "cisco_xr_show_version",
    },
    HintRule {
        vendor_token: "cisco",
        os_token: "Adaptive Security Appliance",
        vendor: Vendor::Asa,
        hint: "cisco_asa_show_version",
    },
    HintRule {
        vendor_token: "cisco",
        os_token: "IOS",
        vendor: Vendor::Cisco,
        hint: "cisco_ios_show_version",
    },
    HintRule {
        vendor_token: "arista",
        os_token: "EOS",
        vendor: Vendor::Arista,
        hint: "arista_eos_show_version",
    },
    HintRule {
        vendor_token: "",
        os_token: "JUNOS",
        vendor: Vendor::Juniper,
        hint: "juniper_junos_show_version",
    },
    HintRule {
        vendor_token: "huawei",
        os_token: "VRP",
        vendor: Vendor::Huawei,
        hint: "huawei_vrp_display_version",
    },
];

/// Template filter to try first, and the vendor it implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateHint {
    /// Repository filter.
    pub filter: String,

    /// Vendor named by the matching rule, if a rule matched.
    pub vendor: Option<Vendor>,
}

impl TemplateHint {
    /// Derive the hint for `output`.
    ///
    /// Falls back to the paging vendor's version template, then to the
    /// generic `show_version` filter.
    pub fn derive(output: &str, paging_vendor: Option<Vendor>, registry: &VendorRegistry) -> Self {
        let lowered = output.to_lowercase();
        if let Some(rule) = RULES
            .iter()
            .find(|rule| lowered.contains(rule.vendor_token) && output.contains(rule.os_token))
        {
            return Self {
                filter: rule.hint.to_string(),
                vendor: Some(rule.vendor),
            };
        }

        let filter = paging_vendor
            .and_then(|vendor| registry.get(vendor))
            .map(|profile| profile.version_hint())
            .unwrap_or_else(|| GENERIC_VERSION_HINT.to_string());
        Self {
            filter,
            vendor: None,
        }
    }

    /// Filter for the single retry after the first search found nothing.
    ///
    /// `None` means search the whole repository.
    pub fn broadened(&self) -> Option<&'static str> {
        (self.filter != GENERIC_VERSION_HINT).then_some(BROADENED_VERSION_HINT)
    }
}
