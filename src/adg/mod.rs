//! `.adg` file format layer: gzip decoding, secure XML loading and
//! structural queries.

pub mod decompress;
pub mod query;
pub mod xml;

pub use decompress::{Decompressed, Decompressor, Strategy};
pub use query::QueryCache;
