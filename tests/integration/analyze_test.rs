//! End-to-end analysis of rack files on disk

use std::fs;

use adg_analyzer::adg::Strategy;
use adg_analyzer::{AnalysisError, AnalyzerConfig, Edition, RackAnalyzer, RackType};
use tempfile::TempDir;

use super::helpers::{fixture_adg, gzip, load_fixture, temp_rack, write_file};

// ============================================================================
// Validation
// ============================================================================

#[test]
fn missing_file_is_file_not_found() {
    let dir = TempDir::new().unwrap();
    let err = RackAnalyzer::default()
        .analyze(&dir.path().join("absent.adg"))
        .unwrap_err();
    assert!(matches!(err, AnalysisError::FileNotFound { .. }));
}

#[test]
fn directory_is_not_a_rack_file() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("folder.adg");
    fs::create_dir(&sub).unwrap();
    let err = RackAnalyzer::default().analyze(&sub).unwrap_err();
    assert_eq!(err.code(), "FILE_NOT_FOUND");
}

#[test]
fn size_limits_apply_in_both_directions() {
    let dir = TempDir::new().unwrap();
    let tiny = write_file(dir.path(), "tiny.adg", &[0x1f, 0x8b, 8, 0]);
    let err = RackAnalyzer::default().analyze(&tiny).unwrap_err();
    assert!(matches!(err, AnalysisError::FileTooLarge { size: 4, min: 100, .. }));

    let mut config = AnalyzerConfig::default();
    config.max_file_size = 1024;
    let (_dir, rack) = temp_rack("bass_rack.xml");
    let err = RackAnalyzer::new(config).analyze(&rack).unwrap_err();
    assert_eq!(err.code(), "FILE_TOO_LARGE");
}

#[test]
fn extension_is_checked_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let bytes = fixture_adg("bass_rack.xml");

    let wrong = write_file(dir.path(), "rack.als", &bytes);
    let err = RackAnalyzer::default().analyze(&wrong).unwrap_err();
    assert_eq!(err.code(), "SECURITY_VIOLATION");

    let upper = write_file(dir.path(), "RACK.ADG", &bytes);
    let analysis = RackAnalyzer::default().analyze(&upper).unwrap();
    assert!(analysis.is_valid());
}

// ============================================================================
// Analysis from disk
// ============================================================================

#[test]
fn analyzes_fixture_from_disk() {
    let (_dir, path) = temp_rack("bass_rack.xml");
    let analysis = RackAnalyzer::default().analyze(&path).unwrap();

    assert!(analysis.is_valid());
    assert_eq!(analysis.rack_type, Some(RackType::InstrumentGroupDevice));
    assert_eq!(analysis.required_edition, Some(Edition::Standard));
    assert_eq!(analysis.total_devices(), 4);

    let metrics = analysis.performance_metrics.unwrap();
    assert_eq!(metrics.decompression, Some(Strategy::Buffer));
    assert_eq!(
        metrics.decompressed_bytes,
        load_fixture("bass_rack.xml").len() as u64
    );
    assert!(metrics.xpath_cache_misses > 0);
    assert!(!metrics.from_cache);
}

#[test]
fn file_and_bytes_entry_points_agree() {
    let (_dir, path) = temp_rack("nested_fx_rack.xml");
    let analyzer = RackAnalyzer::default();
    let from_file = analyzer.analyze(&path).unwrap();
    let from_bytes = analyzer
        .analyze_bytes("nested_fx_rack.adg", &fs::read(&path).unwrap())
        .unwrap();

    assert_eq!(from_file.file_hash, from_bytes.file_hash);
    assert_eq!(from_file.chains, from_bytes.chains);
    assert_eq!(from_file.rack_name, from_bytes.rack_name);
}

#[test]
fn large_files_stream_from_disk() {
    let mut config = AnalyzerConfig::default();
    config.stream_parsing_threshold = 128;
    let (_dir, path) = temp_rack("nested_fx_rack.xml");
    let analysis = RackAnalyzer::new(config).analyze(&path).unwrap();

    assert!(analysis.is_valid());
    let metrics = analysis.performance_metrics.unwrap();
    assert_eq!(metrics.decompression, Some(Strategy::Stream));
}

#[test]
fn truncated_gzip_is_recovered_manually() {
    let dir = TempDir::new().unwrap();
    let mut bytes = gzip(load_fixture("bass_rack.xml").as_bytes());
    // Drop the CRC/size trailer
    bytes.truncate(bytes.len() - 8);
    let path = write_file(dir.path(), "Truncated.adg", &bytes);

    let analysis = RackAnalyzer::default().analyze(&path).unwrap();
    assert!(analysis.is_valid(), "{:?}", analysis.parsing_errors);
    assert_eq!(analysis.rack_name, "Sub Bass");
    let metrics = analysis.performance_metrics.unwrap();
    assert_eq!(metrics.decompression, Some(Strategy::Manual));
}

#[test]
fn random_bytes_fail_decompression() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0x1f, 0x8b, 8, 0, 0, 0, 0, 0, 0, 255];
    bytes.extend((0..200u32).map(|i| (i * 37 % 251) as u8 | 0x07));
    let path = write_file(dir.path(), "Noise.adg", &bytes);

    let analysis = RackAnalyzer::default().analyze(&path).unwrap();
    assert_eq!(analysis.rack_type, None);
    assert!(analysis.parsing_errors[0].starts_with("DECOMPRESSION_FAILED: "));
}

// ============================================================================
// Serialized shape
// ============================================================================

#[test]
fn json_uses_camel_case_and_omits_absent_fields() {
    let (_dir, path) = temp_rack("nested_fx_rack.xml");
    let analysis = RackAnalyzer::default().analyze(&path).unwrap();
    let json = serde_json::to_value(&analysis).unwrap();

    assert_eq!(json["rackName"], "Space Chain");
    assert_eq!(json["rackType"], "AudioEffectGroupDevice");
    assert_eq!(json["requiredEdition"], "suite");
    assert_eq!(json["macroControls"][0]["name"], "Mix");

    let reverb = &json["chains"][0]["devices"][0];
    assert_eq!(reverb["type"], "Reverb");
    assert_eq!(reverb["standardName"], "Reverb");
    assert_eq!(reverb["isCustomDevice"], false);
    assert!(reverb.get("chains").is_none());
    assert!(reverb.get("isBypassed").is_none());

    let group = &json["chains"][0]["devices"][1];
    assert_eq!(group["chains"][0]["name"], "Inner");

    let meta = &json["enrichedMetadata"];
    assert!(meta.get("chainSelector").is_some());
    assert!(meta.get("zones").is_none());
    assert!(meta.get("sampleReferences").is_none());
}
