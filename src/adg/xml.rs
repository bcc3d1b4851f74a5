//! Secure XML loading.
//!
//! Rack documents never carry a DTD. The parser runs with DTD support off
//! and a DTD it meets is reported as a security violation, which rules out
//! external entity resolution and entity-expansion bombs. Markup-like text
//! inside comments or CDATA is not a declaration and parses normally.
//! There is no node-count ceiling; the memory ceiling is checked once
//! before parsing starts.

use roxmltree::{Document, ParsingOptions};

use crate::analyzer::error::AnalysisError;
use crate::analyzer::memory;

/// Root elements a rack file is expected to have.
pub const EXPECTED_ROOTS: [&str; 3] = ["Ableton", "GroupDevicePreset", "PresetRef"];

/// Turn decompressed bytes into text.
///
/// # Errors
///
/// `XmlParseError` when the payload is not UTF-8.
pub fn decode_text(bytes: Vec<u8>) -> Result<String, AnalysisError> {
    let mut text = String::from_utf8(bytes).map_err(|e| {
        AnalysisError::XmlParseError(format!(
            "document is not valid UTF-8 at byte {}",
            e.utf8_error().valid_up_to()
        ))
    })?;
    if text.starts_with('\u{feff}') {
        text.drain(..'\u{feff}'.len_utf8());
    }
    Ok(text)
}

/// Parse a rack document with the memory ceiling checked up front.
///
/// Parsing is all-or-nothing: on failure no partial tree is returned.
///
/// # Errors
///
/// - `MemoryLimitExceeded` if there is no headroom for the parse
/// - `SecurityViolation` for a DOCTYPE declaration
/// - `XmlParseError` carrying the parser's first diagnostic
pub fn parse(text: &str, max_memory: u64) -> Result<Document<'_>, AnalysisError> {
    memory::ensure_headroom(text.len() as u64, max_memory)?;

    let mut opt = ParsingOptions::default();
    opt.allow_dtd = false;

    let doc = Document::parse_with_options(text, opt).map_err(|e| match e {
        roxmltree::Error::DtdDetected => AnalysisError::SecurityViolation(
            "document contains a disallowed DOCTYPE declaration".into(),
        ),
        e => AnalysisError::XmlParseError(e.to_string()),
    })?;

    let root = doc.root_element().tag_name().name();
    if !EXPECTED_ROOTS.contains(&root) {
        tracing::warn!("Unexpected root element <{}>, continuing", root);
    }
    Ok(doc)
}
