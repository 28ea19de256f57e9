//! CPF font bundle codec.
//!
//! CPF is a fixed-layout, little-endian container for pre-rasterized fonts,
//! read directly by e-paper reader firmware: a 26-byte header, a table of
//! code point intervals, a table of fixed-size glyph records, and one
//! concatenated blob of packed 1-bit or 2-bit glyph bitmaps.
//!
//! This crate holds the data model ([`FontBundle`]), the glyph quantizer
//! ([`pack_bitmap`]), and the serializer/parser pair. It knows nothing about
//! font engines; rasterization lives in `inkfont-raster`.

mod bitmap;
mod decode;
mod encode;
mod error;
mod types;

pub use bitmap::{GrayBitmap, pack_bitmap};
pub use error::{CodecError, Result};
pub use types::{BitDepth, CodepointInterval, FontBundle, GlyphRecord, LineMetrics};

/// Format magic: "CPF" plus a one-byte format version.
pub const MAGIC: [u8; 4] = *b"CPF\x01";

/// Serialized header size in bytes, magic included.
pub const HEADER_LEN: usize = 26;

/// Serialized size of one code point interval record.
pub const INTERVAL_RECORD_LEN: usize = 12;

/// Serialized size of one glyph record, reserved bytes included.
pub const GLYPH_RECORD_LEN: usize = 16;
