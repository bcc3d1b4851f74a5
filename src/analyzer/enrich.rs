//! Auxiliary metadata passes over the raw document.
//!
//! Each pass is independent and returns `None` when nothing matched, so an
//! absent key means "not applicable" and a present key is never empty.
//! Values are read from an attribute first, then from a `<Name Value=".."/>`
//! child, then defaulted.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

use crate::adg::QueryCache;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chain_selector: Option<Vec<ChainSelectorInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zones: Option<ZoneInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub automation_mappings: Option<Vec<AutomationMapping>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_references: Option<Vec<SampleReference>>,
}

impl EnrichedMetadata {
    pub fn is_empty(&self) -> bool {
        self.chain_selector.is_none()
            && self.zones.is_none()
            && self.automation_mappings.is_none()
            && self.sample_references.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSelectorInfo {
    pub value: f64,
    pub automation_target: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_zones: Vec<Zone>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub velocity_zones: Vec<Zone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Zone {
    pub min: i64,
    pub max: i64,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationMapping {
    pub macro_index: i64,
    pub parameter_id: String,
    pub min_value: f64,
    pub max_value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleReference {
    pub name: String,
    pub path: String,
    pub path_type: i64,
    #[serde(rename = "type")]
    pub ref_type: i64,
}

/// Run all four passes against the document rooted at `top`.
pub fn enrich<'a, 'input>(queries: &QueryCache<'a, 'input>, top: Node<'a, 'input>) -> EnrichedMetadata {
    EnrichedMetadata {
        chain_selector: chain_selector(queries, top),
        zones: zones(queries, top),
        automation_mappings: automation_mappings(queries, top),
        sample_references: sample_references(queries, top),
    }
}

pub fn chain_selector<'a, 'input>(
    queries: &QueryCache<'a, 'input>,
    top: Node<'a, 'input>,
) -> Option<Vec<ChainSelectorInfo>> {
    let selectors: Vec<_> = queries
        .query(top, ".//ChainSelector")
        .into_iter()
        .map(|node| ChainSelectorInfo {
            value: field(queries, node, "Value", "Manual")
                .and_then(parse_f64)
                .unwrap_or(0.0),
            automation_target: node
                .attribute("AutomationTarget")
                .or_else(|| {
                    queries
                        .first(node, "AutomationTarget")
                        .and_then(|t| t.attribute("Id"))
                })
                .unwrap_or_default()
                .to_string(),
        })
        .collect();
    non_empty(selectors)
}

pub fn zones<'a, 'input>(queries: &QueryCache<'a, 'input>, top: Node<'a, 'input>) -> Option<ZoneInfo> {
    let read = |tag: &str| -> Vec<Zone> {
        queries
            .query(top, &format!(".//{}", tag))
            .into_iter()
            .map(|node| Zone {
                min: field(queries, node, "Min", "Min")
                    .and_then(parse_i64)
                    .unwrap_or(0),
                max: field(queries, node, "Max", "Max")
                    .and_then(parse_i64)
                    .unwrap_or(127),
                enabled: field(queries, node, "Enabled", "Enabled")
                    .map_or(true, |v| v.trim() == "true"),
            })
            .collect()
    };

    let info = ZoneInfo {
        key_zones: read("KeyRange"),
        velocity_zones: read("VelocityRange"),
    };
    if info.key_zones.is_empty() && info.velocity_zones.is_empty() {
        None
    } else {
        Some(info)
    }
}

pub fn automation_mappings<'a, 'input>(
    queries: &QueryCache<'a, 'input>,
    top: Node<'a, 'input>,
) -> Option<Vec<AutomationMapping>> {
    let mappings: Vec<_> = queries
        .query(top, ".//MacroControlTarget")
        .into_iter()
        .map(|node| AutomationMapping {
            macro_index: field(queries, node, "MacroIndex", "MacroIndex")
                .and_then(parse_i64)
                .unwrap_or(0),
            parameter_id: field(queries, node, "ParameterId", "ParameterId")
                .unwrap_or_default()
                .to_string(),
            min_value: field(queries, node, "Min", "Min")
                .and_then(parse_f64)
                .unwrap_or(0.0),
            max_value: field(queries, node, "Max", "Max")
                .and_then(parse_f64)
                .unwrap_or(1.0),
        })
        .collect();
    non_empty(mappings)
}

pub fn sample_references<'a, 'input>(
    queries: &QueryCache<'a, 'input>,
    top: Node<'a, 'input>,
) -> Option<Vec<SampleReference>> {
    let refs: Vec<_> = queries
        .query(top, ".//FileRef")
        .into_iter()
        .map(|node| SampleReference {
            name: queries.value(node, "Name").unwrap_or_default().to_string(),
            path: queries
                .value(node, "RelativePath")
                .or_else(|| queries.value(node, "Path"))
                .unwrap_or_default()
                .to_string(),
            path_type: queries
                .value(node, "RelativePathType")
                .and_then(parse_i64)
                .unwrap_or(0),
            ref_type: queries.value(node, "Type").and_then(parse_i64).unwrap_or(0),
        })
        .collect();
    non_empty(refs)
}

/// Attribute `attr` on `node`, else `@Value` of its `child` element.
fn field<'a, 'input>(
    queries: &QueryCache<'a, 'input>,
    node: Node<'a, 'input>,
    attr: &str,
    child: &str,
) -> Option<&'a str> {
    node.attribute(attr).or_else(|| queries.value(node, child))
}

fn parse_i64(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .map(|v| v as i64)
    })
}

fn parse_f64(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
