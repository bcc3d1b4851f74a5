//! Chain and device tree types.
//!
//! The tree is owned top-down: a rack owns its root chains, a chain owns its
//! devices, a group device owns its nested chains. Nothing is shared and
//! nothing is mutated after extraction.

use serde::{Deserialize, Serialize};

/// One parallel signal path inside a rack or nested rack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chain {
    pub name: String,
    /// Position among sibling chains, 0-based.
    pub chain_index: usize,
    pub is_soloed: bool,
    pub devices: Vec<Device>,
    pub annotations: ChainAnnotations,
}

impl Chain {
    /// Default display name for an unnamed chain.
    pub fn default_name(index: usize) -> String {
        format!("Chain {}", index + 1)
    }

    /// Devices in this chain including every nested chain below it.
    pub fn device_count(&self) -> usize {
        self.devices.iter().map(Device::device_count).sum()
    }
}

/// Zone ranges from the source plus fields reserved for manual curation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainAnnotations {
    pub key_range: Option<KeyRange>,
    pub velocity_range: Option<VelocityRange>,
    pub description: Option<String>,
    pub purpose: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyRange {
    pub low_key: i32,
    pub high_key: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VelocityRange {
    pub low_vel: i32,
    pub high_vel: i32,
}

/// One processing unit in a chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Raw XML tag name.
    #[serde(rename = "type")]
    pub device_type: String,
    pub standard_name: String,
    /// User override when set and different from `standard_name`.
    pub name: String,
    /// Tag not found in the classification table.
    pub is_custom_device: bool,
    pub is_on: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_bypassed: Option<bool>,
    /// Present (possibly empty) only on group devices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<Chain>>,
}

impl Device {
    pub fn is_group(&self) -> bool {
        self.chains.is_some()
    }

    /// This device plus everything nested below it.
    pub fn device_count(&self) -> usize {
        1 + self
            .chains
            .iter()
            .flatten()
            .map(Chain::device_count)
            .sum::<usize>()
    }
}

/// A user-labeled macro knob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroControl {
    pub name: String,
    pub value: f64,
    pub index: usize,
}

/// Depth-first flattening: each device, then the devices of its nested
/// chains, in chain order.
pub fn flatten_devices(chains: &[Chain]) -> Vec<&Device> {
    fn walk<'a>(chains: &'a [Chain], out: &mut Vec<&'a Device>) {
        for chain in chains {
            for device in &chain.devices {
                out.push(device);
                if let Some(nested) = &device.chains {
                    walk(nested, out);
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(chains, &mut out);
    out
}
