//! The conversion pipeline: coverage, render, pack, assemble.

use inkfont_codec::{BitDepth, FontBundle, GlyphRecord, GrayBitmap, pack_bitmap};
use log::{debug, info};

use crate::coverage::{RequestedInterval, build_coverage};
use crate::error::{RasterError, Result};
use crate::stack::{FontStack, floor_26_6};

/// Built-in requested intervals, matching the device's expected repertoire.
/// Overlapping entries collapse during request merging.
pub const DEFAULT_INTERVALS: &[RequestedInterval] = &[
    (0x0000, 0x007F), // Basic Latin
    (0x0080, 0x00FF), // Latin-1 Supplement
    (0x0100, 0x017F), // Latin Extended-A
    (0x2000, 0x206F), // General Punctuation
    (0x2010, 0x203A), // Basic Symbols
    (0x2040, 0x205F), // misc punctuation
    (0x20A0, 0x20CF), // common currency symbols
    (0x0300, 0x036F), // Combining Diacritical Marks
    (0x0400, 0x04FF), // Cyrillic
    (0x2070, 0x209F), // Superscripts and Subscripts
    (0x2200, 0x22FF), // General math operators
    (0x2190, 0x21FF), // Arrows
    (0xFFFD, 0xFFFD), // Replacement Character
];

/// Conversion parameters.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Target pixel size.
    pub size: u32,
    pub bit_depth: BitDepth,
    /// Extra requested intervals on top of the defaults.
    pub extra_intervals: Vec<RequestedInterval>,
}

/// Run the full pipeline over `stack` and assemble a bundle.
///
/// One coverage pre-pass probes the stack, then every covered code point is
/// rendered, quantized, and packed in ascending order, and line metrics are
/// derived from the reference glyph. The bundle is complete and internally
/// consistent on return; nothing has been written anywhere.
pub fn convert(stack: &mut FontStack, options: &ConvertOptions) -> Result<FontBundle> {
    let mut requested = DEFAULT_INTERVALS.to_vec();
    requested.extend_from_slice(&options.extra_intervals);

    let intervals = build_coverage(&requested, |code_point| stack.probe(code_point));
    if intervals.is_empty() {
        return Err(RasterError::EmptyCoverage);
    }
    let glyph_count: u32 = intervals.iter().map(|interval| interval.count()).sum();
    debug!("coverage: {} intervals, {glyph_count} glyphs", intervals.len());

    stack.set_pixel_size(options.size)?;

    let mut glyphs = Vec::with_capacity(glyph_count as usize);
    let mut bitmap = Vec::new();
    for interval in &intervals {
        for code_point in interval.first..=interval.last {
            let rendered = stack
                .render(code_point)?
                .ok_or(RasterError::CoverageDrift(code_point))?;
            let packed = pack_bitmap(
                &GrayBitmap {
                    width: rendered.width,
                    rows: rendered.rows,
                    pitch: rendered.pitch,
                    data: &rendered.coverage,
                },
                options.bit_depth,
            );
            glyphs.push(GlyphRecord::new(
                rendered.width,
                rendered.rows,
                floor_26_6(rendered.advance_x),
                rendered.left,
                rendered.top,
                packed.len(),
                bitmap.len(),
            )?);
            bitmap.extend_from_slice(&packed);
        }
    }

    let metrics = stack.line_metrics()?;
    info!(
        "rasterized {} glyphs across {} intervals at {} px, {} bitmap bytes",
        glyphs.len(),
        intervals.len(),
        options.size,
        bitmap.len()
    );

    Ok(FontBundle { metrics, bit_depth: options.bit_depth, intervals, glyphs, bitmap })
}
