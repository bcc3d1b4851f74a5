//! Minimum Live edition inference.

use serde::{Deserialize, Serialize};

use crate::devices::{STANDARD_DEVICES, SUITE_ONLY_DEVICES};
use crate::rack::{flatten_devices, Chain};

/// Live product tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    Intro,
    Standard,
    Suite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditionAnalysis {
    pub required_edition: Edition,
    pub suite_devices: Vec<String>,
    pub standard_devices: Vec<String>,
    pub total_devices: usize,
}

/// Tier a single device tag belongs to, if any.
///
/// The lowercased tag is looked up first, then the same with trailing digits
/// removed, so both `Eq8` and `Compressor2` resolve.
pub fn device_tier(tag: &str) -> Option<Edition> {
    let lowered = tag.to_lowercase();
    let stripped = lowered.trim_end_matches(|c: char| c.is_ascii_digit());
    let tier = [lowered.as_str(), stripped].into_iter().find_map(|key| {
        if SUITE_ONLY_DEVICES.contains(&key) {
            Some(Edition::Suite)
        } else if STANDARD_DEVICES.contains(&key) {
            Some(Edition::Standard)
        } else {
            None
        }
    });
    tier
}

/// Walk the extracted tree depth-first and infer the required edition.
///
/// Any Suite-only device makes the rack `suite`; the scan still runs to the
/// end so `suite_devices` is complete. A Standard device only counts while
/// the requirement is still `intro`, so `standard_devices` names at most the
/// one device that raised it. Devices in neither tier leave the requirement
/// unchanged. Devices are listed by their display `name`.
pub fn analyze_edition(chains: &[Chain]) -> EditionAnalysis {
    let devices = flatten_devices(chains);
    let mut required = Edition::Intro;
    let mut suite_devices = Vec::new();
    let mut standard_devices = Vec::new();

    for device in &devices {
        match device_tier(&device.device_type) {
            Some(Edition::Suite) => {
                required = Edition::Suite;
                suite_devices.push(device.name.clone());
            }
            Some(Edition::Standard) if required == Edition::Intro => {
                required = Edition::Standard;
                standard_devices.push(device.name.clone());
            }
            _ => {}
        }
    }

    EditionAnalysis {
        required_edition: required,
        suite_devices,
        standard_devices,
        total_devices: devices.len(),
    }
}
