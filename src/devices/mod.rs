//! Device classification.
//!
//! Maps raw XML device tags to display names and identifies the three group
//! device kinds that can hold nested chains.

pub mod table;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

pub use table::{BRANCH_TYPE_MAP, DEFAULT_DEVICE_MAP, STANDARD_DEVICES, SUITE_ONLY_DEVICES};

/// Root classification of a rack file.
///
/// `Unknown` is only produced by partial recovery, when the document could be
/// loaded but no rack structure was extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RackType {
    AudioEffectGroupDevice,
    InstrumentGroupDevice,
    MidiEffectGroupDevice,
    Unknown,
}

impl RackType {
    /// Group kinds in detection order.
    pub const GROUP_KINDS: [RackType; 3] = [
        RackType::AudioEffectGroupDevice,
        RackType::InstrumentGroupDevice,
        RackType::MidiEffectGroupDevice,
    ];

    /// Parse a raw XML tag. Only the three group kinds match.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::GROUP_KINDS
            .iter()
            .copied()
            .find(|kind| kind.as_str() == tag)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RackType::AudioEffectGroupDevice => "AudioEffectGroupDevice",
            RackType::InstrumentGroupDevice => "InstrumentGroupDevice",
            RackType::MidiEffectGroupDevice => "MidiEffectGroupDevice",
            RackType::Unknown => "Unknown",
        }
    }

    /// Tag of the branch presets serialized under this group kind.
    pub fn branch_tag(&self) -> Option<&'static str> {
        BRANCH_TYPE_MAP
            .iter()
            .find(|(group, _)| *group == self.as_str())
            .map(|(_, branch)| *branch)
    }
}

impl fmt::Display for RackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub standard_name: String,
    pub is_custom: bool,
}

/// Exact-match lookup over the built-in table plus per-instance overrides.
#[derive(Debug, Clone)]
pub struct DeviceClassifier {
    map: HashMap<String, String>,
}

impl Default for DeviceClassifier {
    fn default() -> Self {
        Self::new(std::iter::empty())
    }
}

impl DeviceClassifier {
    /// Build a classifier with `custom` mappings merged over the defaults.
    ///
    /// Custom entries win on key collisions.
    pub fn new<'c, I>(custom: I) -> Self
    where
        I: IntoIterator<Item = (&'c String, &'c String)>,
    {
        let mut map: HashMap<String, String> = DEFAULT_DEVICE_MAP
            .iter()
            .map(|(tag, name)| (tag.to_string(), name.to_string()))
            .collect();
        map.extend(custom.into_iter().map(|(k, v)| (k.clone(), v.clone())));
        Self { map }
    }

    /// Classify a raw tag. Unknown tags keep their tag as display name and
    /// are flagged custom (Max for Live, third-party).
    pub fn classify(&self, tag: &str) -> Classification {
        match self.map.get(tag) {
            Some(name) => Classification {
                standard_name: name.clone(),
                is_custom: false,
            },
            None => Classification {
                standard_name: tag.to_string(),
                is_custom: true,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
