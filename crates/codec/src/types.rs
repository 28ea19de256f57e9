//! CPF bundle data model.

use std::fmt;

use crate::error::{CodecError, Result};
use crate::{GLYPH_RECORD_LEN, HEADER_LEN, INTERVAL_RECORD_LEN};

/// Packed bitmap bit depth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BitDepth {
    /// Pure black and white, 8 pixels per byte.
    One,
    /// Four grey levels, 4 pixels per byte.
    #[default]
    Two,
}

impl BitDepth {
    /// Header flag byte: 1 = 2-bit greyscale, 0 = 1-bit black and white.
    pub(crate) fn flag(self) -> u8 {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    pub(crate) fn from_flag(flag: u8) -> Result<Self> {
        match flag {
            0 => Ok(Self::One),
            1 => Ok(Self::Two),
            other => Err(CodecError::Inconsistent(format!(
                "unknown bit depth flag {other}"
            ))),
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => write!(f, "1-bit"),
            Self::Two => write!(f, "2-bit"),
        }
    }
}

/// A contiguous run of code points all confirmed renderable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodepointInterval {
    /// First code point, inclusive.
    pub first: u32,
    /// Last code point, inclusive.
    pub last: u32,
    /// Running glyph count of every interval before this one.
    pub glyph_offset: u32,
}

impl CodepointInterval {
    /// Number of code points covered.
    pub fn count(&self) -> u32 {
        self.last - self.first + 1
    }

    pub fn contains(&self, code_point: u32) -> bool {
        (self.first..=self.last).contains(&code_point)
    }
}

/// Metrics and placement for one packed glyph.
///
/// `left`/`top` position the bitmap origin relative to the pen; both may be
/// negative. `data_offset` points into the bundle's concatenated bitmap blob.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlyphRecord {
    pub width: u8,
    pub height: u8,
    /// Horizontal pen advance in whole pixels, floor-rounded from 26.6.
    pub advance_x: u8,
    pub left: i16,
    pub top: i16,
    /// Packed byte length of this glyph's bitmap.
    pub data_length: u16,
    /// Byte offset of this glyph's bitmap within the blob.
    pub data_offset: u32,
}

impl GlyphRecord {
    /// Build a record, rejecting values that overflow the fixed field widths.
    ///
    /// A glyph too large for its record is a fatal condition: a silently
    /// truncated field would break every downstream offset.
    pub fn new(
        width: usize,
        height: usize,
        advance_x: i64,
        left: i32,
        top: i32,
        data_length: usize,
        data_offset: usize,
    ) -> Result<Self> {
        Ok(Self {
            width: u8_field(width as i64, "glyph width")?,
            height: u8_field(height as i64, "glyph height")?,
            advance_x: u8_field(advance_x, "glyph advance")?,
            left: i16_field(i64::from(left), "glyph left offset")?,
            top: i16_field(i64::from(top), "glyph top offset")?,
            data_length: u16_field(data_length as i64, "glyph data length")?,
            data_offset: u32_field(data_offset as i64, "glyph data offset")?,
        })
    }
}

/// Face-wide vertical metrics in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    /// Line height, ceil-rounded from 26.6.
    pub advance_y: u8,
    /// Ceil-rounded ascender.
    pub ascender: i32,
    /// Floor-rounded descender, conventionally negative.
    pub descender: i32,
}

impl LineMetrics {
    /// Build metrics, rejecting values that overflow the header fields.
    pub fn new(advance_y: i64, ascender: i64, descender: i64) -> Result<Self> {
        Ok(Self {
            advance_y: u8_field(advance_y, "line height")?,
            ascender: i32_field(ascender, "ascender")?,
            descender: i32_field(descender, "descender")?,
        })
    }
}

/// A complete font bundle held in memory.
///
/// Constructed once per conversion run, validated, then serialized; nothing
/// mutates after encoding starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontBundle {
    pub metrics: LineMetrics,
    pub bit_depth: BitDepth,
    /// Coverage intervals, ascending and non-overlapping.
    pub intervals: Vec<CodepointInterval>,
    /// Glyph records in ascending code point order.
    pub glyphs: Vec<GlyphRecord>,
    /// All packed glyph bitmaps, concatenated in glyph order.
    pub bitmap: Vec<u8>,
}

impl FontBundle {
    /// Check every structural invariant the firmware reader relies on.
    ///
    /// Interval ordering and glyph offsets, the `data_offset` prefix-sum
    /// chain, and the declared bitmap size must all agree before a single
    /// byte is written.
    pub fn validate(&self) -> Result<()> {
        let mut expected_offset = 0u64;
        let mut previous_last = None;
        for interval in &self.intervals {
            if interval.first > interval.last {
                return Err(CodecError::Inconsistent(format!(
                    "empty interval U+{:04X}..U+{:04X}",
                    interval.first, interval.last
                )));
            }
            if let Some(last) = previous_last
                && interval.first <= last
            {
                return Err(CodecError::Inconsistent(format!(
                    "interval U+{:04X}..U+{:04X} overlaps its predecessor",
                    interval.first, interval.last
                )));
            }
            if u64::from(interval.glyph_offset) != expected_offset {
                return Err(CodecError::Inconsistent(format!(
                    "interval U+{:04X}..U+{:04X} has glyph offset {}, expected {}",
                    interval.first, interval.last, interval.glyph_offset, expected_offset
                )));
            }
            expected_offset += u64::from(interval.last) - u64::from(interval.first) + 1;
            previous_last = Some(interval.last);
        }
        if expected_offset != self.glyphs.len() as u64 {
            return Err(CodecError::Inconsistent(format!(
                "intervals cover {expected_offset} code points but {} glyphs are present",
                self.glyphs.len()
            )));
        }

        let mut cursor = 0u64;
        for (index, glyph) in self.glyphs.iter().enumerate() {
            if u64::from(glyph.data_offset) != cursor {
                return Err(CodecError::Inconsistent(format!(
                    "glyph {index} bitmap offset {} does not follow its predecessor ({cursor})",
                    glyph.data_offset
                )));
            }
            cursor += u64::from(glyph.data_length);
        }
        if cursor != self.bitmap.len() as u64 {
            return Err(CodecError::Inconsistent(format!(
                "glyphs declare {cursor} bitmap bytes but the blob holds {}",
                self.bitmap.len()
            )));
        }
        Ok(())
    }

    /// Locate the glyph record for a code point, as the device reader does.
    pub fn glyph_for(&self, code_point: u32) -> Option<&GlyphRecord> {
        let interval = match self
            .intervals
            .binary_search_by_key(&code_point, |interval| interval.first)
        {
            Ok(index) => &self.intervals[index],
            Err(0) => return None,
            Err(index) => &self.intervals[index - 1],
        };
        if !interval.contains(code_point) {
            return None;
        }
        self.glyphs
            .get((interval.glyph_offset + (code_point - interval.first)) as usize)
    }

    /// Borrow one glyph's packed bytes out of the bitmap blob.
    pub fn bitmap_slice(&self, glyph: &GlyphRecord) -> Option<&[u8]> {
        let start = glyph.data_offset as usize;
        let end = start.checked_add(glyph.data_length as usize)?;
        self.bitmap.get(start..end)
    }

    /// Total serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self.intervals.len() * INTERVAL_RECORD_LEN
            + self.glyphs.len() * GLYPH_RECORD_LEN
            + self.bitmap.len()
    }
}

pub(crate) fn u8_field(value: i64, field: &'static str) -> Result<u8> {
    u8::try_from(value).map_err(|_| CodecError::FieldOverflow { field, value })
}

pub(crate) fn i16_field(value: i64, field: &'static str) -> Result<i16> {
    i16::try_from(value).map_err(|_| CodecError::FieldOverflow { field, value })
}

pub(crate) fn u16_field(value: i64, field: &'static str) -> Result<u16> {
    u16::try_from(value).map_err(|_| CodecError::FieldOverflow { field, value })
}

pub(crate) fn i32_field(value: i64, field: &'static str) -> Result<i32> {
    i32::try_from(value).map_err(|_| CodecError::FieldOverflow { field, value })
}

pub(crate) fn u32_field(value: i64, field: &'static str) -> Result<u32> {
    u32::try_from(value).map_err(|_| CodecError::FieldOverflow { field, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(first: u32, last: u32, glyph_offset: u32) -> CodepointInterval {
        CodepointInterval { first, last, glyph_offset }
    }

    fn glyph(data_length: u16, data_offset: u32) -> GlyphRecord {
        GlyphRecord { data_length, data_offset, ..GlyphRecord::default() }
    }

    fn sample_bundle() -> FontBundle {
        FontBundle {
            metrics: LineMetrics { advance_y: 16, ascender: 12, descender: -4 },
            bit_depth: BitDepth::Two,
            intervals: vec![interval(0x41, 0x42, 0), interval(0x50, 0x50, 2)],
            glyphs: vec![glyph(2, 0), glyph(1, 2), glyph(3, 3)],
            bitmap: vec![0; 6],
        }
    }

    #[test]
    fn valid_bundle_passes() {
        sample_bundle().validate().unwrap();
    }

    #[test]
    fn rejects_overlapping_intervals() {
        let mut bundle = sample_bundle();
        bundle.intervals[1].first = 0x42;
        bundle.intervals[1].last = 0x42;
        assert!(matches!(
            bundle.validate(),
            Err(CodecError::Inconsistent(message)) if message.contains("overlaps")
        ));
    }

    #[test]
    fn rejects_wrong_glyph_offset() {
        let mut bundle = sample_bundle();
        bundle.intervals[1].glyph_offset = 1;
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn rejects_broken_offset_chain() {
        let mut bundle = sample_bundle();
        bundle.glyphs[2].data_offset = 4;
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn rejects_bitmap_size_mismatch() {
        let mut bundle = sample_bundle();
        bundle.bitmap.push(0);
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn glyph_lookup_follows_intervals() {
        let bundle = sample_bundle();
        assert_eq!(bundle.glyph_for(0x41).unwrap().data_offset, 0);
        assert_eq!(bundle.glyph_for(0x42).unwrap().data_offset, 2);
        assert_eq!(bundle.glyph_for(0x50).unwrap().data_offset, 3);
        assert!(bundle.glyph_for(0x40).is_none());
        assert!(bundle.glyph_for(0x43).is_none());
        assert!(bundle.glyph_for(0x51).is_none());
    }

    #[test]
    fn bitmap_slice_spans_declared_bytes() {
        let mut bundle = sample_bundle();
        bundle.bitmap = vec![1, 2, 3, 4, 5, 6];
        let glyph = bundle.glyph_for(0x42).unwrap();
        assert_eq!(bundle.bitmap_slice(glyph).unwrap(), &[3]);
        let out_of_range = GlyphRecord { data_length: 4, data_offset: 4, ..GlyphRecord::default() };
        assert!(bundle.bitmap_slice(&out_of_range).is_none());
    }

    #[test]
    fn record_fields_reject_overflow() {
        assert!(matches!(
            GlyphRecord::new(300, 0, 0, 0, 0, 0, 0),
            Err(CodecError::FieldOverflow { field: "glyph width", .. })
        ));
        assert!(GlyphRecord::new(0, 0, -1, 0, 0, 0, 0).is_err());
        assert!(GlyphRecord::new(0, 0, 0, 0, 0, 1 << 16, 0).is_err());
        assert!(GlyphRecord::new(8, 8, 4, -2, 7, 16, 128).is_ok());
        assert!(LineMetrics::new(300, 0, 0).is_err());
        assert!(LineMetrics::new(16, 12, -4).is_ok());
    }
}
