//! Classify command handler

use std::path::Path;

use anyhow::Result;
use serde_json::json;

use adg_analyzer::analyzer::device_tier;
use adg_analyzer::DeviceClassifier;

use super::load_config;

/// Print the classification of one device tag as JSON.
#[cfg(not(tarpaulin_include))]
pub fn handle(tag: &str, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let classifier = DeviceClassifier::new(&config.analyzer.custom_device_mappings);
    let classification = classifier.classify(tag);

    let output = json!({
        "tag": tag,
        "standardName": classification.standard_name,
        "isCustom": classification.is_custom,
        "edition": device_tier(tag),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
