//! Live version detection from the document root.

use roxmltree::Node;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionDetails {
    pub major: Option<u32>,
    pub minor: Option<u32>,
    pub build_number: Option<u32>,
    pub revision: Option<String>,
}

/// Read version attributes from the root element.
///
/// Returns the display version (`"major.minor"`, else the `Version`
/// attribute, else the number in a `Creator="Ableton Live x.y.z"` string)
/// alongside the structured details.
pub fn extract_version(root: Node) -> (Option<String>, VersionDetails) {
    let details = VersionDetails {
        major: root.attribute("MajorVersion").and_then(leading_int),
        minor: root.attribute("MinorVersion").and_then(leading_int),
        build_number: root.attribute("BuildNumber").and_then(leading_int),
        revision: root
            .attribute("Revision")
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from),
    };

    let display = match (details.major, details.minor) {
        (Some(major), Some(minor)) => Some(format!("{}.{}", major, minor)),
        _ => root
            .attribute("Version")
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .or_else(|| {
                root.attribute("Creator")
                    .filter(|c| c.contains("Ableton Live"))
                    .and_then(dotted_version)
            }),
    };

    (display, details)
}

/// Integer prefix of an attribute: `"11.0_433"` -> 11.
fn leading_int(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(i, _)| i);
    raw[..end].parse().ok()
}

/// First `N.N` or `N.N.N` run in `text`.
fn dotted_version(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    let mut start = 0;
    while start < bytes.len() {
        if !bytes[start].is_ascii_digit() {
            start += 1;
            continue;
        }
        let mut end = start;
        let mut groups = 1;
        loop {
            while end < bytes.len() && bytes[end].is_ascii_digit() {
                end += 1;
            }
            let next_is_group = groups < 3
                && end + 1 < bytes.len()
                && bytes[end] == b'.'
                && bytes[end + 1].is_ascii_digit();
            if !next_is_group {
                break;
            }
            end += 1;
            groups += 1;
        }
        if groups >= 2 {
            return Some(text[start..end].to_string());
        }
        start = end;
    }
    None
}
