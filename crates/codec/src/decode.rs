//! Parsing of serialized CPF bundles, mirroring the firmware loader's checks.

use crate::error::{CodecError, Result};
use crate::types::{BitDepth, CodepointInterval, FontBundle, GlyphRecord, LineMetrics};
use crate::{GLYPH_RECORD_LEN, HEADER_LEN, INTERVAL_RECORD_LEN, MAGIC};

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        let end = self.pos.checked_add(len).ok_or(CodecError::Truncated {
            needed: usize::MAX,
            available: self.buf.len(),
        })?;
        let slice = self.buf.get(self.pos..end).ok_or(CodecError::Truncated {
            needed: end,
            available: self.buf.len(),
        })?;
        self.pos = end;
        Ok(slice)
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16_le(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    fn i16_le(&mut self) -> Result<i16> {
        Ok(self.u16_le()? as i16)
    }

    fn u32_le(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn i32_le(&mut self) -> Result<i32> {
        Ok(self.u32_le()? as i32)
    }
}

impl FontBundle {
    /// Parse a serialized bundle.
    ///
    /// Rejects a bad magic, any input whose total length differs from the
    /// layout the header declares (the same exact-size check the firmware
    /// performs before mapping the tables), and any bundle that fails
    /// [`FontBundle::validate`] after parsing.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        if reader.take(MAGIC.len())? != MAGIC {
            return Err(CodecError::BadMagic);
        }

        let advance_y = reader.u8()?;
        let ascender = reader.i32_le()?;
        let descender = reader.i32_le()?;
        let bit_depth = BitDepth::from_flag(reader.u8()?)?;
        let interval_count = reader.u32_le()?;
        let glyph_count = reader.u32_le()?;
        let bitmap_size = reader.u32_le()?;

        let expected = HEADER_LEN as u64
            + u64::from(interval_count) * INTERVAL_RECORD_LEN as u64
            + u64::from(glyph_count) * GLYPH_RECORD_LEN as u64
            + u64::from(bitmap_size);
        if expected != data.len() as u64 {
            return Err(CodecError::LengthMismatch { expected, actual: data.len() as u64 });
        }

        let mut intervals = Vec::with_capacity(interval_count as usize);
        for _ in 0..interval_count {
            intervals.push(CodepointInterval {
                first: reader.u32_le()?,
                last: reader.u32_le()?,
                glyph_offset: reader.u32_le()?,
            });
        }

        let mut glyphs = Vec::with_capacity(glyph_count as usize);
        for _ in 0..glyph_count {
            let width = reader.u8()?;
            let height = reader.u8()?;
            let advance_x = reader.u8()?;
            reader.take(1)?; // reserved
            let left = reader.i16_le()?;
            let top = reader.i16_le()?;
            let data_length = reader.u16_le()?;
            reader.take(2)?; // reserved
            let data_offset = reader.u32_le()?;
            glyphs.push(GlyphRecord { width, height, advance_x, left, top, data_length, data_offset });
        }

        let bitmap = reader.take(bitmap_size as usize)?.to_vec();

        let bundle = Self {
            metrics: LineMetrics { advance_y, ascender, descender },
            bit_depth,
            intervals,
            glyphs,
            bitmap,
        };
        bundle.validate()?;
        Ok(bundle)
    }
}
