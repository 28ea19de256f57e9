//! Binary serialization of a [`FontBundle`].

use crate::error::{CodecError, Result};
use crate::types::{FontBundle, GlyphRecord, u32_field};
use crate::{GLYPH_RECORD_LEN, HEADER_LEN, INTERVAL_RECORD_LEN, MAGIC};

/// Interval field widths, summed the way the device struct lays them out.
const INTERVAL_FIELD_WIDTHS: usize = 4 + 4 + 4;

/// Glyph field widths including the reserved padding bytes at offsets 3 and
/// 10..12; the decoder maps records onto a fixed-size struct and the padding
/// must be present even though unused.
const GLYPH_FIELD_WIDTHS: usize = 1 + 1 + 1 + 1 + 2 + 2 + 2 + 2 + 4;

/// Verify the computed record sizes against the format constants.
///
/// A mismatch means the layout drifted and every downstream offset would be
/// wrong; the run aborts before any output exists.
fn check_record_layout() -> Result<()> {
    if INTERVAL_FIELD_WIDTHS != INTERVAL_RECORD_LEN {
        return Err(CodecError::LayoutDrift("interval record size"));
    }
    if GLYPH_FIELD_WIDTHS != GLYPH_RECORD_LEN {
        return Err(CodecError::LayoutDrift("glyph record size"));
    }
    Ok(())
}

fn glyph_record_bytes(glyph: &GlyphRecord) -> [u8; GLYPH_RECORD_LEN] {
    let mut out = [0u8; GLYPH_RECORD_LEN];
    out[0] = glyph.width;
    out[1] = glyph.height;
    out[2] = glyph.advance_x;
    // out[3] reserved
    out[4..6].copy_from_slice(&glyph.left.to_le_bytes());
    out[6..8].copy_from_slice(&glyph.top.to_le_bytes());
    out[8..10].copy_from_slice(&glyph.data_length.to_le_bytes());
    // out[10..12] reserved
    out[12..16].copy_from_slice(&glyph.data_offset.to_le_bytes());
    out
}

impl FontBundle {
    /// Serialize into the fixed little-endian layout.
    ///
    /// Record sizes and every structural invariant are checked first; any
    /// mismatch aborts with an error and no bytes are produced. Encoding the
    /// same bundle twice yields byte-identical output.
    pub fn encode(&self) -> Result<Vec<u8>> {
        check_record_layout()?;
        self.validate()?;

        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&MAGIC);
        out.push(self.metrics.advance_y);
        out.extend_from_slice(&self.metrics.ascender.to_le_bytes());
        out.extend_from_slice(&self.metrics.descender.to_le_bytes());
        out.push(self.bit_depth.flag());
        out.extend_from_slice(&u32_field(self.intervals.len() as i64, "interval count")?.to_le_bytes());
        out.extend_from_slice(&u32_field(self.glyphs.len() as i64, "glyph count")?.to_le_bytes());
        out.extend_from_slice(&u32_field(self.bitmap.len() as i64, "bitmap size")?.to_le_bytes());
        if out.len() != HEADER_LEN {
            return Err(CodecError::LayoutDrift("header size"));
        }

        for interval in &self.intervals {
            out.extend_from_slice(&interval.first.to_le_bytes());
            out.extend_from_slice(&interval.last.to_le_bytes());
            out.extend_from_slice(&interval.glyph_offset.to_le_bytes());
        }
        for glyph in &self.glyphs {
            out.extend_from_slice(&glyph_record_bytes(glyph));
        }
        out.extend_from_slice(&self.bitmap);

        if out.len() != self.encoded_len() {
            return Err(CodecError::LayoutDrift("bundle size"));
        }
        Ok(out)
    }
}
