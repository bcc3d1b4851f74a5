//! Unit tests for the analysis pipeline

use adg_analyzer::analyzer::PARTIAL_RECOVERY_WARNING;
use adg_analyzer::rack::{flatten_devices, DepthLimitPolicy};
use adg_analyzer::{AnalyzerConfig, Edition, RackAnalyzer, RackType};

use super::helpers::{fixture_adg, gzip, load_fixture, rack_xml, without_timing};

fn analyzer() -> RackAnalyzer {
    RackAnalyzer::new(AnalyzerConfig::default())
}

// ============================================================================
// Full extraction
// ============================================================================

#[test]
fn instrument_rack_is_fully_extracted() {
    let analysis = analyzer()
        .analyze_bytes("Sub Bass.adg", &fixture_adg("bass_rack.xml"))
        .unwrap();

    assert!(analysis.is_valid(), "{:?}", analysis.parsing_errors);
    assert!(analysis.parsing_warnings.is_empty(), "{:?}", analysis.parsing_warnings);
    assert_eq!(analysis.rack_name, "Sub Bass");
    assert_eq!(analysis.use_case, "Sub Bass");
    assert_eq!(analysis.rack_type, Some(RackType::InstrumentGroupDevice));
    assert_eq!(analysis.ableton_version.as_deref(), Some("5.11"));
    assert_eq!(analysis.version_details.major, Some(5));
    assert_eq!(analysis.version_details.minor, Some(11));
    assert_eq!(analysis.file_hash.len(), 64);

    let names: Vec<_> = analysis.chains.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Sub", "Grit"]);
    assert!(analysis.chains[1].is_soloed);

    let sub = &analysis.chains[0];
    assert_eq!(sub.devices[0].standard_name, "Simpler");
    assert_eq!(sub.devices[0].name, "Sine Sub");
    assert_eq!(sub.devices[1].standard_name, "EQ Eight");
    let key_range = sub.annotations.key_range.as_ref().unwrap();
    assert_eq!((key_range.low_key, key_range.high_key), (0, 48));

    let compressor = &analysis.chains[1].devices[1];
    assert_eq!(compressor.device_type, "Compressor2");
    assert!(!compressor.is_on);
    assert_eq!(compressor.is_bypassed, Some(true));
}

#[test]
fn nested_racks_take_chains_from_enclosing_preset() {
    let analysis = analyzer()
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();

    assert_eq!(analysis.rack_type, Some(RackType::AudioEffectGroupDevice));
    assert_eq!(analysis.rack_name, "Space Chain");
    assert_eq!(analysis.ableton_version.as_deref(), Some("12.1"));

    let group = &analysis.chains[0].devices[1];
    assert!(group.is_group());
    assert_eq!(group.name, "Texture");
    let inner = group.chains.as_ref().unwrap();
    assert_eq!(inner.len(), 1);
    assert_eq!(inner[0].name, "Inner");
    let tags: Vec<_> = inner[0].devices.iter().map(|d| d.device_type.as_str()).collect();
    assert_eq!(tags, vec!["Vocoder", "Utility"]);

    let custom = &analysis.chains[1].devices[0];
    assert!(custom.is_custom_device);
    assert_eq!(custom.standard_name, "MxDeviceAudioEffect");
    assert_eq!(custom.name, "Spectral Blur");
}

#[test]
fn plain_xml_input_is_accepted() {
    let xml = load_fixture("bass_rack.xml");
    let analysis = analyzer().analyze_bytes("Sub Bass.adg", xml.as_bytes()).unwrap();
    assert!(analysis.is_valid());
    assert_eq!(analysis.chains.len(), 2);
}

// ============================================================================
// Structural properties
// ============================================================================

#[test]
fn device_totals_agree_with_edition_analysis() {
    for fixture in ["bass_rack.xml", "nested_fx_rack.xml", "broken_midi_rack.xml"] {
        let analysis = analyzer()
            .analyze_bytes("rack.adg", &fixture_adg(fixture))
            .unwrap();
        let edition = analysis.edition_analysis.as_ref().unwrap();
        assert_eq!(analysis.total_devices(), edition.total_devices, "{}", fixture);
        assert_eq!(flatten_devices(&analysis.chains).len(), edition.total_devices);
    }
}

#[test]
fn chain_indices_are_sequential_without_failures() {
    let analysis = analyzer()
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();
    let indices: Vec<_> = analysis.chains.iter().map(|c| c.chain_index).collect();
    assert_eq!(indices, vec![0, 1]);
}

#[test]
fn depth_limit_bounds_the_tree() {
    let config = AnalyzerConfig::default().max_depth(2);
    let analysis = RackAnalyzer::new(config)
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();

    // Root devices sit at depth 1, the nested chain at 2, its devices at 3
    let group = &analysis.chains[0].devices[1];
    let inner = group.chains.as_ref().unwrap();
    assert_eq!(inner.len(), 1);
    assert!(inner[0].devices.is_empty());
    assert_eq!(analysis.total_devices(), 3);
    assert!(analysis.parsing_warnings.is_empty());
}

#[test]
fn depth_limit_can_warn_once() {
    let mut config = AnalyzerConfig::default().max_depth(2);
    config.depth_limit_policy = DepthLimitPolicy::WarnOnce;
    let analysis = RackAnalyzer::new(config)
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();

    assert_eq!(analysis.parsing_warnings.len(), 1);
    assert!(analysis.parsing_warnings[0].contains("max depth 2"));
    assert!(analysis.is_valid());
}

#[test]
fn repeated_analysis_is_identical() {
    let bytes = fixture_adg("nested_fx_rack.xml");
    let analyzer = analyzer();
    let first = analyzer.analyze_bytes("Space.adg", &bytes).unwrap();
    let second = analyzer.analyze_bytes("Space.adg", &bytes).unwrap();
    assert_eq!(without_timing(first), without_timing(second));
}

#[test]
fn default_macro_labels_are_filtered() {
    let analysis = analyzer()
        .analyze_bytes("Sub Bass.adg", &fixture_adg("bass_rack.xml"))
        .unwrap();

    let macros: Vec<_> = analysis
        .macro_controls
        .iter()
        .map(|m| (m.index, m.name.as_str(), m.value))
        .collect();
    assert_eq!(macros, vec![(0, "Cutoff", 64.0), (2, "Drive", 10.5)]);
}

#[test]
fn failing_chain_does_not_hide_siblings() {
    let analysis = analyzer()
        .analyze_bytes("Arp.adg", &fixture_adg("broken_midi_rack.xml"))
        .unwrap();

    assert!(analysis.is_valid());
    let indices: Vec<_> = analysis.chains.iter().map(|c| c.chain_index).collect();
    assert_eq!(indices, vec![0, 2]);
    assert_eq!(analysis.chains[1].devices.len(), 2);

    assert_eq!(analysis.parsing_warnings.len(), 2, "{:?}", analysis.parsing_warnings);
    assert!(analysis.parsing_warnings[0].starts_with("Failed to parse macro 0"));
    assert!(analysis.parsing_warnings[1].starts_with("Failed to parse chain 1: "));

    // The macro with a bad value is skipped, the next one kept
    assert_eq!(analysis.macro_controls.len(), 1);
    assert_eq!(analysis.macro_controls[0].name, "Gate");
}

// ============================================================================
// Edition inference
// ============================================================================

#[test]
fn suite_device_anywhere_requires_suite() {
    let analysis = analyzer()
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();

    assert_eq!(analysis.required_edition, Some(Edition::Suite));
    let edition = analysis.edition_analysis.unwrap();
    assert_eq!(edition.suite_devices, vec!["Vocoder"]);
    assert_eq!(edition.standard_devices, vec!["Reverb"]);
}

#[test]
fn edition_precedence_is_order_independent() {
    let forward = rack_xml("AudioEffectGroupDevice", "F", &[&["Eq8", "Saturator", "Utility"]]);
    let reverse = rack_xml("AudioEffectGroupDevice", "R", &[&["Utility", "Saturator", "Eq8"]]);
    let mut upgraded_by = Vec::new();
    for xml in [forward, reverse] {
        let analysis = analyzer().analyze_bytes("fx.adg", &gzip(xml.as_bytes())).unwrap();
        assert_eq!(analysis.required_edition, Some(Edition::Suite));
        upgraded_by.push(analysis.edition_analysis.unwrap().standard_devices);
    }
    // Only a Standard device met while still at intro is listed
    assert_eq!(upgraded_by[0], vec!["EQ Eight"]);
    assert!(upgraded_by[1].is_empty());

    let standard = rack_xml("AudioEffectGroupDevice", "S", &[&["Utility", "Eq8"]]);
    let analysis = analyzer()
        .analyze_bytes("fx.adg", &gzip(standard.as_bytes()))
        .unwrap();
    assert_eq!(analysis.required_edition, Some(Edition::Standard));

    let intro = rack_xml("MidiEffectGroupDevice", "I", &[&["Arpeggiator", "Chord"]]);
    let analysis = analyzer().analyze_bytes("fx.adg", &gzip(intro.as_bytes())).unwrap();
    assert_eq!(analysis.required_edition, Some(Edition::Intro));
}

#[test]
fn optional_passes_can_be_disabled() {
    let mut config = AnalyzerConfig::default();
    config.detect_edition = false;
    config.enable_metadata_enrichment = false;
    let analysis = RackAnalyzer::new(config)
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();

    assert!(analysis.is_valid());
    assert_eq!(analysis.required_edition, None);
    assert!(analysis.edition_analysis.is_none());
    assert!(analysis.enriched_metadata.is_none());
}

// ============================================================================
// Enrichment
// ============================================================================

#[test]
fn enrichment_reads_selector_mappings_and_samples() {
    let analysis = analyzer()
        .analyze_bytes("Space.adg", &fixture_adg("nested_fx_rack.xml"))
        .unwrap();
    let meta = analysis.enriched_metadata.unwrap();

    let selector = &meta.chain_selector.unwrap()[0];
    assert_eq!(selector.value, 3.0);
    assert_eq!(selector.automation_target, "8123");

    let mapping = &meta.automation_mappings.unwrap()[0];
    assert_eq!(mapping.parameter_id, "Reverb.DryWet");
    assert_eq!((mapping.min_value, mapping.max_value), (0.2, 0.9));

    assert!(meta.zones.is_none());
    assert!(meta.sample_references.is_none());
}

#[test]
fn enrichment_reads_zones_and_sample_refs() {
    let analysis = analyzer()
        .analyze_bytes("Sub Bass.adg", &fixture_adg("bass_rack.xml"))
        .unwrap();
    let meta = analysis.enriched_metadata.unwrap();

    let zones = meta.zones.unwrap();
    assert_eq!(zones.key_zones.len(), 1);
    assert_eq!((zones.key_zones[0].min, zones.key_zones[0].max), (0, 48));
    assert_eq!(zones.velocity_zones.len(), 1);

    let sample = &meta.sample_references.unwrap()[0];
    assert_eq!(sample.name, "sub.wav");
    assert_eq!(sample.path, "Samples/Imported/sub.wav");
    assert_eq!(sample.path_type, 3);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn gzip_of_non_xml_is_an_xml_error() {
    let bytes = gzip("this is definitely not a rack document ".repeat(8).as_bytes());
    let analysis = analyzer().analyze_bytes("Corrupt.adg", &bytes).unwrap();

    assert!(!analysis.is_valid());
    assert_eq!(analysis.rack_type, None);
    assert!(analysis.chains.is_empty());
    assert_eq!(analysis.rack_name, "Corrupt");
    assert!(analysis.parsing_errors[0].starts_with("XML_PARSE_ERROR: "));
    assert!(analysis.parsing_errors[0].contains(" | Recovery failed: "));
}

#[test]
fn errors_without_recovery_are_tagged_once() {
    let config = AnalyzerConfig::default().error_recovery(false);
    let bytes = gzip("this is definitely not a rack document ".repeat(8).as_bytes());
    let analysis = RackAnalyzer::new(config).analyze_bytes("Corrupt.adg", &bytes).unwrap();

    assert_eq!(analysis.parsing_errors.len(), 1);
    assert!(analysis.parsing_errors[0].starts_with("XML_PARSE_ERROR: Failed to parse XML: "));
    assert!(!analysis.parsing_errors[0].contains("Recovery failed"));
}

#[test]
fn rack_without_group_device_is_partially_recovered() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<Ableton MajorVersion="5" MinorVersion="11.0_433"><GroupDevicePreset><Name Value="Orphan"/><Device><Reverb/></Device></GroupDevicePreset></Ableton>"#;
    let analysis = analyzer().analyze_bytes("x.adg", &gzip(xml.as_bytes())).unwrap();

    assert_eq!(analysis.rack_type, Some(RackType::Unknown));
    assert_eq!(analysis.rack_name, "Orphan");
    assert_eq!(analysis.ableton_version.as_deref(), Some("5.11"));
    assert!(analysis.chains.is_empty());
    assert!(analysis.macro_controls.is_empty());
    assert_eq!(
        analysis.parsing_errors,
        vec!["Partial parsing: INVALID_RACK_FORMAT: Invalid rack format: Unable to detect rack type or main device"]
    );
    assert_eq!(analysis.parsing_warnings, vec![PARTIAL_RECOVERY_WARNING]);
}

#[test]
fn dtd_is_a_security_violation() {
    let xml = format!(
        "<?xml version=\"1.0\"?><!DOCTYPE Ableton [<!ENTITY boom \"{}\">]><Ableton>&boom;</Ableton>",
        "x".repeat(64)
    );
    let config = AnalyzerConfig::default().error_recovery(false);
    let analysis = RackAnalyzer::new(config)
        .analyze_bytes("evil.adg", &gzip(xml.as_bytes()))
        .unwrap();

    assert_eq!(analysis.rack_type, None);
    assert!(analysis.parsing_errors[0].starts_with("SECURITY_VIOLATION: "));
}

#[test]
fn memory_ceiling_is_checked_before_parsing() {
    let mut config = AnalyzerConfig::default();
    config.max_memory_usage = 1;
    let err = RackAnalyzer::new(config)
        .analyze_bytes("Sub Bass.adg", &fixture_adg("bass_rack.xml"))
        .unwrap_err();
    assert_eq!(err.code(), "MEMORY_LIMIT_EXCEEDED");
}

fn gzip_bomb(mib: usize) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let block = vec![b' '; 1024 * 1024];
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(b"<Ableton>").unwrap();
    for _ in 0..mib {
        encoder.write_all(&block).unwrap();
    }
    encoder.finish().unwrap()
}

#[test]
fn decompression_bomb_stops_at_memory_ceiling_without_retry() {
    let bomb = gzip_bomb(64);
    assert!(bomb.len() < 1024 * 1024);

    let mut config = AnalyzerConfig::default().caching(false);
    config.max_memory_usage =
        adg_analyzer::analyzer::memory::current_usage().unwrap_or(0) + 16 * 1024 * 1024;
    let analysis = RackAnalyzer::new(config)
        .analyze_bytes("Bomb.adg", &bomb)
        .unwrap();

    assert_eq!(analysis.rack_type, None);
    assert_eq!(analysis.parsing_errors.len(), 1);
    assert!(
        analysis.parsing_errors[0].starts_with("MEMORY_LIMIT_EXCEEDED: "),
        "{:?}",
        analysis.parsing_errors
    );
    assert!(!analysis.parsing_errors[0].contains("Recovery failed"));
}
