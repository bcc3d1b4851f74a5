//! Recursive chain/device tree extraction.
//!
//! Live serializes a rack as
//!
//! ```text
//! GroupDevicePreset
//! ├── Device/<GroupKind>            main device: macros, name
//! └── BranchPresets/<BranchTag>*    one per chain
//!     └── DevicePresets/<Preset>*
//!         ├── Device/<Tag>          the chain's devices, in order
//!         └── BranchPresets/...     chains of a nested group device
//! ```
//!
//! Depth is threaded through every call: root chains sit at depth 0, their
//! devices at 1, a nested chain one below its device. A device deeper than
//! `max_depth` is dropped with its whole subtree.
//!
//! Per-unit failures (one chain, one nested chain, one macro) become
//! warnings and extraction continues with the siblings. Only a missing rack
//! root and the deadline escalate.

use std::path::Path;

use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use super::macros::extract_macros;
use super::types::{Chain, ChainAnnotations, Device, KeyRange, MacroControl, VelocityRange};
use crate::adg::QueryCache;
use crate::analyzer::deadline::Deadline;
use crate::analyzer::error::AnalysisError;
use crate::devices::{DeviceClassifier, RackType};

pub const DEFAULT_MAX_DEPTH: usize = 15;

/// What to report when a device is dropped for exceeding `max_depth`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthLimitPolicy {
    /// Drop without a warning.
    #[default]
    Silent,
    /// One warning per file, on the first drop.
    WarnOnce,
}

/// Everything extracted from one rack document.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub rack_type: RackType,
    pub rack_name: String,
    pub macro_controls: Vec<MacroControl>,
    pub chains: Vec<Chain>,
    pub warnings: Vec<String>,
}

/// Walks one parsed document. Create a fresh extractor per document.
pub struct RackExtractor<'q, 'a, 'input> {
    classifier: &'q DeviceClassifier,
    queries: &'q QueryCache<'a, 'input>,
    deadline: &'q Deadline,
    max_depth: usize,
    depth_policy: DepthLimitPolicy,
    warnings: Vec<String>,
    depth_limit_hit: bool,
}

impl<'q, 'a, 'input> RackExtractor<'q, 'a, 'input> {
    pub fn new(
        classifier: &'q DeviceClassifier,
        queries: &'q QueryCache<'a, 'input>,
        deadline: &'q Deadline,
    ) -> Self {
        Self {
            classifier,
            queries,
            deadline,
            max_depth: DEFAULT_MAX_DEPTH,
            depth_policy: DepthLimitPolicy::default(),
            warnings: Vec::new(),
            depth_limit_hit: false,
        }
    }

    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn depth_limit_policy(mut self, policy: DepthLimitPolicy) -> Self {
        self.depth_policy = policy;
        self
    }

    /// Extract rack type, name, macros and the chain tree.
    ///
    /// # Errors
    ///
    /// - `InvalidRackFormat` when no group device can serve as rack root
    /// - `Timeout` when the deadline passes mid-walk
    pub fn extract(
        mut self,
        doc: &'a Document<'input>,
        filename: &str,
    ) -> Result<Extraction, AnalysisError> {
        let top = doc.root();

        if self.queries.first(top, ".//GroupDevicePreset").is_none() {
            self.warnings.push(
                "Missing expected node: GroupDevicePreset. XML structure may be incompatible or corrupted."
                    .to_string(),
            );
        }

        let Some((rack_type, main_device)) = self.detect_rack_type_and_main_device(top) else {
            return Err(AnalysisError::InvalidRackFormat(
                "Unable to detect rack type or main device".to_string(),
            ));
        };
        tracing::debug!("Detected {} rack", rack_type);

        let rack_name = self.extract_rack_name(top, Some(main_device), filename);
        let macro_controls = extract_macros(self.queries, main_device, &mut self.warnings);
        let chains = self.parse_root_chains(top, rack_type)?;

        if chains.is_empty() {
            self.warnings.push(
                "No chains found in rack. XML structure may be incomplete or incompatible."
                    .to_string(),
            );
        }

        Ok(Extraction {
            rack_type,
            rack_name,
            macro_controls,
            chains,
            warnings: self.warnings,
        })
    }

    /// Find the rack's root group device.
    ///
    /// First a group-kind child of `GroupDevicePreset/Device`, then any
    /// group-kind element in the document, kinds tried in the order Audio,
    /// Instrument, MIDI.
    pub fn detect_rack_type_and_main_device(
        &self,
        top: Node<'a, 'input>,
    ) -> Option<(RackType, Node<'a, 'input>)> {
        if let Some(preset) = self.queries.first(top, ".//GroupDevicePreset") {
            for child in self.queries.query(preset, "Device/*") {
                if let Some(kind) = RackType::from_tag(child.tag_name().name()) {
                    return Some((kind, child));
                }
            }
        }

        RackType::GROUP_KINDS.iter().find_map(|kind| {
            self.queries
                .first(top, &format!(".//{}", kind.as_str()))
                .map(|node| (*kind, node))
        })
    }

    /// Display name for the rack. Blank values are skipped at every step.
    pub fn extract_rack_name(
        &self,
        top: Node<'a, 'input>,
        main_device: Option<Node<'a, 'input>>,
        filename: &str,
    ) -> String {
        self.queries
            .non_empty_value(top, ".//GroupDevicePreset/Name")
            .or_else(|| main_device.and_then(|d| self.queries.non_empty_value(d, "UserName")))
            .or_else(|| {
                self.queries
                    .query(top, ".//Name")
                    .into_iter()
                    .filter_map(|n| n.attribute("Value"))
                    .map(str::trim)
                    .find(|v| !v.is_empty())
            })
            .map(String::from)
            .or_else(|| {
                Path::new(filename)
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
            })
            .unwrap_or_else(|| "Unknown".to_string())
    }

    fn parse_root_chains(
        &mut self,
        top: Node<'a, 'input>,
        rack_type: RackType,
    ) -> Result<Vec<Chain>, AnalysisError> {
        let Some(branch_tag) = rack_type.branch_tag() else {
            return Ok(Vec::new());
        };
        let Some(branch_presets) = self.queries.first(top, ".//GroupDevicePreset/BranchPresets")
        else {
            return Ok(Vec::new());
        };

        let mut chains = Vec::new();
        for (index, branch) in self
            .queries
            .query(branch_presets, branch_tag)
            .into_iter()
            .enumerate()
        {
            match self.parse_chain_branch(branch, index, 0) {
                Ok(chain) => chains.push(chain),
                Err(e) => self.absorb(e, format!("Failed to parse chain {}", index))?,
            }
        }
        Ok(chains)
    }

    /// Parse one branch preset into a chain at `depth`.
    ///
    /// # Errors
    ///
    /// - `InvalidRackFormat` for a branch without `DevicePresets` or with a
    ///   non-numeric zone bound
    /// - `Timeout` from any device below
    pub fn parse_chain_branch(
        &mut self,
        branch: Node<'a, 'input>,
        index: usize,
        depth: usize,
    ) -> Result<Chain, AnalysisError> {
        let name = self
            .queries
            .value(branch, "Name")
            .filter(|v| !v.trim().is_empty())
            .map(String::from)
            .unwrap_or_else(|| Chain::default_name(index));
        let is_soloed = self.queries.value(branch, "IsSoloed") == Some("true");

        let key_range = self
            .zone(branch, "KeyRange")?
            .map(|(low_key, high_key)| KeyRange { low_key, high_key });
        let velocity_range = self
            .zone(branch, "VelocityRange")?
            .map(|(low_vel, high_vel)| VelocityRange { low_vel, high_vel });

        let Some(device_presets) = self.queries.first(branch, "DevicePresets") else {
            return Err(AnalysisError::InvalidRackFormat(
                "branch has no DevicePresets element".to_string(),
            ));
        };

        let mut devices = Vec::new();
        for preset in self.queries.query(device_presets, "*") {
            for node in self.queries.query(preset, "Device/*") {
                if let Some(device) = self.parse_device(node, Some(preset), depth + 1)? {
                    devices.push(device);
                }
            }
        }

        Ok(Chain {
            name,
            chain_index: index,
            is_soloed,
            devices,
            annotations: ChainAnnotations {
                key_range,
                velocity_range,
                ..ChainAnnotations::default()
            },
        })
    }

    /// Parse one device element at `depth`.
    ///
    /// `Ok(None)` means the device sits below `max_depth` and was dropped.
    /// `enclosing_preset` is the preset element wrapping this device; a group
    /// device without its own `BranchPresets` takes its chains from there.
    ///
    /// # Errors
    ///
    /// `Timeout` only. Failing nested chains become warnings.
    pub fn parse_device(
        &mut self,
        node: Node<'a, 'input>,
        enclosing_preset: Option<Node<'a, 'input>>,
        depth: usize,
    ) -> Result<Option<Device>, AnalysisError> {
        if depth > self.max_depth {
            self.note_depth_limit(node.tag_name().name(), depth);
            return Ok(None);
        }
        self.deadline.check()?;

        let tag = node.tag_name().name();
        let classification = self.classifier.classify(tag);
        let name = self
            .queries
            .non_empty_value(node, "UserName")
            .filter(|n| *n != classification.standard_name)
            .map(String::from)
            .unwrap_or_else(|| classification.standard_name.clone());

        let is_on = self
            .queries
            .first(node, "On/Manual")
            .map_or(true, |n| n.attribute("Value").unwrap_or("true") == "true");
        let is_bypassed = self
            .queries
            .first(node, "Bypass/Manual")
            .map(|n| n.attribute("Value") == Some("true"));

        let chains = match RackType::from_tag(tag) {
            Some(kind) => Some(self.parse_nested_chains(node, enclosing_preset, kind, depth)?),
            None => None,
        };

        Ok(Some(Device {
            device_type: tag.to_string(),
            standard_name: classification.standard_name,
            name,
            is_custom_device: classification.is_custom,
            is_on,
            is_bypassed,
            chains,
        }))
    }

    fn parse_nested_chains(
        &mut self,
        device: Node<'a, 'input>,
        enclosing_preset: Option<Node<'a, 'input>>,
        kind: RackType,
        depth: usize,
    ) -> Result<Vec<Chain>, AnalysisError> {
        let Some(branch_tag) = kind.branch_tag() else {
            return Ok(Vec::new());
        };
        let branch_presets = self.queries.first(device, "BranchPresets").or_else(|| {
            enclosing_preset.and_then(|preset| self.queries.first(preset, "BranchPresets"))
        });
        let Some(branch_presets) = branch_presets else {
            return Ok(Vec::new());
        };

        let mut chains = Vec::new();
        for (index, branch) in self
            .queries
            .query(branch_presets, branch_tag)
            .into_iter()
            .enumerate()
        {
            match self.parse_chain_branch(branch, index, depth + 1) {
                Ok(chain) => chains.push(chain),
                Err(e) => self.absorb(
                    e,
                    format!("Failed to parse nested chain {} in {}", index, kind),
                )?,
            }
        }
        Ok(chains)
    }

    /// Both bounds of a `KeyRange`/`VelocityRange`, or `None` unless both
    /// are present.
    fn zone(
        &self,
        branch: Node<'a, 'input>,
        tag: &str,
    ) -> Result<Option<(i32, i32)>, AnalysisError> {
        let min = self.queries.value(branch, &format!("{}/Min", tag));
        let max = self.queries.value(branch, &format!("{}/Max", tag));
        match (min, max) {
            (Some(low), Some(high)) => Ok(Some((
                parse_bound(tag, "Min", low)?,
                parse_bound(tag, "Max", high)?,
            ))),
            _ => Ok(None),
        }
    }

    /// Record a per-unit failure as a warning. Timeouts are passed back up.
    fn absorb(&mut self, err: AnalysisError, context: String) -> Result<(), AnalysisError> {
        if matches!(err, AnalysisError::Timeout { .. }) {
            return Err(err);
        }
        let warning = format!("{}: {}", context, err);
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
        Ok(())
    }

    fn note_depth_limit(&mut self, tag: &str, depth: usize) {
        tracing::debug!(
            "Dropping {} at depth {} (max {})",
            tag,
            depth,
            self.max_depth
        );
        if self.depth_policy == DepthLimitPolicy::WarnOnce && !self.depth_limit_hit {
            self.warnings.push(format!(
                "Device nesting exceeds max depth {}; deeper devices were omitted",
                self.max_depth
            ));
        }
        self.depth_limit_hit = true;
    }
}

fn parse_bound(tag: &str, bound: &str, raw: &str) -> Result<i32, AnalysisError> {
    let trimmed = raw.trim();
    trimmed
        .parse::<i32>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v as i32)
        })
        .ok_or_else(|| {
            AnalysisError::InvalidRackFormat(format!(
                "{}/{} value '{}' is not a number",
                tag, bound, raw
            ))
        })
}
