//! Gzip decoding for `.adg` payloads.
//!
//! Three strategies, chosen per input:
//!
//! - **Stream**: inputs above the streaming threshold. Files are decoded
//!   straight from disk without holding the compressed bytes.
//! - **Buffer**: smaller inputs, decoded from memory.
//! - **Manual**: when either of the above fails, the gzip member header is
//!   parsed by hand and the raw deflate body inflated, keeping whatever was
//!   decoded before a truncation point.
//!
//! All three read in 8 KiB chunks with a running memory and deadline check,
//! so a small file that inflates past the ceiling is cut off mid-decode.
//!
//! Input that is already plain XML passes through untouched, as Live's own
//! reader accepts uncompressed presets.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::{DeflateDecoder, MultiGzDecoder};
use serde::{Deserialize, Serialize};

use crate::analyzer::deadline::Deadline;
use crate::analyzer::error::AnalysisError;
use crate::analyzer::memory;

/// Bytes read per decode step.
pub const CHUNK_SIZE: usize = 8192;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];
const METHOD_DEFLATE: u8 = 8;
const FHCRC: u8 = 0x02;
const FEXTRA: u8 = 0x04;
const FNAME: u8 = 0x08;
const FCOMMENT: u8 = 0x10;

/// Which path produced the XML bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Stream,
    Buffer,
    Manual,
    Passthrough,
}

/// Decoded document bytes plus provenance.
#[derive(Debug, Clone)]
pub struct Decompressed {
    pub xml: Vec<u8>,
    pub strategy: Strategy,
}

/// Gzip decoder with memory and deadline guards.
///
/// Every path decodes through the same chunked loop, so the memory ceiling
/// holds for small inputs that inflate to huge outputs too.
#[derive(Debug, Clone)]
pub struct Decompressor {
    stream_threshold: u64,
    max_memory: u64,
}

/// Why a chunked decode stopped early.
enum Interrupted {
    /// Memory ceiling or deadline; never retried
    Guard(AnalysisError),
    /// The decoder itself failed; carries what was decoded before
    Decode(io::Error, Vec<u8>),
}

impl Decompressor {
    pub fn new(stream_threshold: u64, max_memory: u64) -> Self {
        Self {
            stream_threshold,
            max_memory,
        }
    }

    /// Decode an in-memory `.adg` payload.
    ///
    /// # Errors
    ///
    /// - `DecompressionFailed` when both the primary and the manual path fail,
    ///   or the output is empty
    /// - `MemoryLimitExceeded` as soon as the decoded output would push the
    ///   process past the ceiling, on any path
    /// - `Timeout` when the deadline passes mid-decode
    pub fn decompress(
        &self,
        bytes: &[u8],
        deadline: &Deadline,
    ) -> Result<Decompressed, AnalysisError> {
        if !bytes.starts_with(&GZIP_MAGIC) && looks_like_xml(bytes) {
            tracing::debug!("Input is not gzip-wrapped, treating as plain XML");
            return Ok(Decompressed {
                xml: bytes.to_vec(),
                strategy: Strategy::Passthrough,
            });
        }

        let strategy = if bytes.len() as u64 > self.stream_threshold {
            Strategy::Stream
        } else {
            Strategy::Buffer
        };

        let primary_err = match self.drain(MultiGzDecoder::new(bytes), deadline) {
            Ok(xml) if !xml.is_empty() => return Ok(Decompressed { xml, strategy }),
            Ok(_) => "gzip stream decoded to zero bytes".to_string(),
            Err(Interrupted::Guard(e)) => return Err(e),
            Err(Interrupted::Decode(e, partial)) => {
                format!("gzip decode failed after {} bytes: {}", partial.len(), e)
            }
        };

        tracing::debug!("Primary gzip decode failed ({}), trying manual inflate", primary_err);
        match self.inflate_member(bytes, deadline) {
            Ok(xml) if !xml.is_empty() => {
                tracing::warn!(
                    "Recovered {} bytes with manual inflate after: {}",
                    xml.len(),
                    primary_err
                );
                Ok(Decompressed {
                    xml,
                    strategy: Strategy::Manual,
                })
            }
            Ok(_) => Err(AnalysisError::DecompressionFailed(format!(
                "{}; manual inflate produced no data",
                primary_err
            ))),
            Err(AnalysisError::DecompressionFailed(manual_err)) => {
                Err(AnalysisError::DecompressionFailed(format!(
                    "{}; manual inflate failed: {}",
                    primary_err, manual_err
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Open and decode a file. Large files are streamed straight from disk.
    ///
    /// # Errors
    ///
    /// Same as [`decompress`](Self::decompress), plus `FileNotFound` when the
    /// file cannot be opened.
    pub fn decompress_file(
        &self,
        path: &Path,
        deadline: &Deadline,
    ) -> Result<Decompressed, AnalysisError> {
        let display = path.display().to_string();
        let size = std::fs::metadata(path)
            .map_err(|e| AnalysisError::from_io(&display, &e))?
            .len();

        if size > self.stream_threshold {
            let file = File::open(path).map_err(|e| AnalysisError::from_io(&display, &e))?;
            match self.drain(MultiGzDecoder::new(BufReader::new(file)), deadline) {
                Ok(xml) if !xml.is_empty() => {
                    return Ok(Decompressed {
                        xml,
                        strategy: Strategy::Stream,
                    })
                }
                Err(Interrupted::Guard(e)) => return Err(e),
                _ => {}
            }
        }

        let bytes = std::fs::read(path).map_err(|e| AnalysisError::from_io(&display, &e))?;
        self.decompress(&bytes, deadline)
    }

    /// Parse one gzip member header by hand and inflate its deflate body.
    ///
    /// Output decoded before a corrupt or truncated point is kept.
    ///
    /// # Errors
    ///
    /// `DecompressionFailed` for a bad header or a body that yields nothing,
    /// `MemoryLimitExceeded`/`Timeout` from the running guards.
    pub fn inflate_member(
        &self,
        bytes: &[u8],
        deadline: &Deadline,
    ) -> Result<Vec<u8>, AnalysisError> {
        let body = deflate_body(bytes).map_err(AnalysisError::DecompressionFailed)?;
        match self.drain(DeflateDecoder::new(body), deadline) {
            Ok(xml) => Ok(xml),
            Err(Interrupted::Guard(e)) => Err(e),
            Err(Interrupted::Decode(e, partial)) if partial.is_empty() => Err(
                AnalysisError::DecompressionFailed(format!("inflate failed: {}", e)),
            ),
            Err(Interrupted::Decode(e, partial)) => {
                tracing::debug!("Inflate stopped after {} bytes: {}", partial.len(), e);
                Ok(partial)
            }
        }
    }

    /// Read `reader` to the end in `CHUNK_SIZE` steps. After every chunk the
    /// process baseline plus the output so far is held against the memory
    /// ceiling and the deadline is checked.
    fn drain<R: Read>(&self, mut reader: R, deadline: &Deadline) -> Result<Vec<u8>, Interrupted> {
        let baseline = memory::current_usage().unwrap_or(0);
        let mut out = Vec::new();
        let mut chunk = [0u8; CHUNK_SIZE];

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Interrupted::Decode(e, out)),
            };

            let used = baseline.saturating_add((out.len() + n) as u64);
            if used > self.max_memory {
                return Err(Interrupted::Guard(AnalysisError::MemoryLimitExceeded {
                    used,
                    limit: self.max_memory,
                }));
            }
            out.extend_from_slice(&chunk[..n]);
            deadline.check().map_err(Interrupted::Guard)?;
        }

        tracing::debug!("Decoded {} bytes", out.len());
        Ok(out)
    }
}

/// Slice past the gzip member header (RFC 1952 section 2.3).
fn deflate_body(bytes: &[u8]) -> Result<&[u8], String> {
    if bytes.len() < 10 {
        return Err(format!("{} bytes is shorter than a gzip header", bytes.len()));
    }
    if !bytes.starts_with(&GZIP_MAGIC) {
        return Err("missing gzip magic bytes".to_string());
    }
    if bytes[2] != METHOD_DEFLATE {
        return Err(format!("unsupported compression method {}", bytes[2]));
    }

    let flags = bytes[3];
    let mut pos = 10usize;

    if flags & FEXTRA != 0 {
        let len_bytes = bytes
            .get(pos..pos + 2)
            .ok_or_else(|| "truncated FEXTRA length".to_string())?;
        let xlen = u16::from_le_bytes([len_bytes[0], len_bytes[1]]) as usize;
        pos += 2 + xlen;
    }
    if flags & FNAME != 0 {
        pos = skip_zero_terminated(bytes, pos).ok_or_else(|| "unterminated FNAME".to_string())?;
    }
    if flags & FCOMMENT != 0 {
        pos = skip_zero_terminated(bytes, pos)
            .ok_or_else(|| "unterminated FCOMMENT".to_string())?;
    }
    if flags & FHCRC != 0 {
        pos += 2;
    }

    match bytes.get(pos..) {
        Some(body) if !body.is_empty() => Ok(body),
        _ => Err("gzip header has no deflate body".to_string()),
    }
}

fn skip_zero_terminated(bytes: &[u8], start: usize) -> Option<usize> {
    let rest = bytes.get(start..)?;
    let nul = rest.iter().position(|b| *b == 0)?;
    Some(start + nul + 1)
}

fn looks_like_xml(bytes: &[u8]) -> bool {
    let trimmed = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    trimmed
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'<')
}
