//! Priority-ordered FreeType face stack.

use std::path::Path;

use freetype::{Face, Library, face::LoadFlag};
use log::debug;

use inkfont_codec::LineMetrics;

use crate::error::{RasterError, Result};

/// Dots per inch used when scaling faces, matching the device renderer.
const RENDER_DPI: u32 = 150;

/// Code point used to derive face-wide line metrics. The vertical bar exists
/// in virtually every font, and rendering it populates the size metrics.
const REFERENCE_CODE_POINT: u32 = '|' as u32;

/// One glyph copied out of a face's render slot.
///
/// The engine keeps a single mutable glyph slot per face, so the slot
/// contents are copied out before any further engine call can overwrite
/// them.
#[derive(Debug, Clone, Default)]
pub struct RenderedGlyph {
    pub width: usize,
    pub rows: usize,
    /// Source row stride in bytes; at least `width`.
    pub pitch: usize,
    /// Anti-aliased coverage, one byte per pixel, row-major via `pitch`.
    pub coverage: Vec<u8>,
    /// Horizontal advance in 26.6 fixed-point units.
    pub advance_x: i64,
    pub left: i32,
    pub top: i32,
}

/// Priority-ordered stack of outline faces.
///
/// Higher-priority faces shadow lower-priority ones for any code point both
/// define; styles are never merged. The stack exclusively owns its face
/// handles for the pipeline's duration.
pub struct FontStack {
    faces: Vec<Face>,
    _library: Library,
}

impl FontStack {
    /// Open faces in descending priority order.
    ///
    /// Any source that cannot be opened or parsed fails the whole run before
    /// output exists.
    pub fn load<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let library = Library::init()?;
        let mut faces = Vec::with_capacity(paths.len());
        for path in paths {
            let path = path.as_ref();
            let face = library
                .new_face(path, 0)
                .map_err(|source| RasterError::Face { path: path.to_path_buf(), source })?;
            debug!("loaded face {} from {}", faces.len(), path.display());
            faces.push(face);
        }
        Ok(Self { faces, _library: library })
    }

    /// Scale every face to `size` pixels at the device DPI.
    pub fn set_pixel_size(&mut self, size: u32) -> Result<()> {
        for face in &self.faces {
            face.set_char_size(
                (size as isize) << 6,
                (size as isize) << 6,
                RENDER_DPI,
                RENDER_DPI,
            )?;
        }
        Ok(())
    }

    /// Find the first face defining `code_point`, with its glyph index.
    fn resolve(&self, code_point: u32) -> Option<(&Face, u32)> {
        self.faces
            .iter()
            .find_map(|face| face.get_char_index(code_point as usize).map(|index| (face, index)))
    }

    /// Whether any face in the stack defines `code_point`.
    pub fn probe(&self, code_point: u32) -> bool {
        self.resolve(code_point).is_some()
    }

    /// Resolve and render one glyph at the active pixel size.
    ///
    /// `None` means no face defines the code point; the caller excludes it
    /// from coverage rather than treating it as an error.
    pub fn render(&mut self, code_point: u32) -> Result<Option<RenderedGlyph>> {
        let Some((face, index)) = self.resolve(code_point) else {
            return Ok(None);
        };
        face.load_glyph(index, LoadFlag::RENDER)?;
        Ok(Some(copy_slot(face)))
    }

    /// Derive line metrics from the reference glyph's face.
    ///
    /// Fatal when no face in the stack defines the reference glyph, since
    /// the bundle header cannot be filled without it.
    pub fn line_metrics(&mut self) -> Result<LineMetrics> {
        let (face, index) = self
            .resolve(REFERENCE_CODE_POINT)
            .ok_or(RasterError::MissingReferenceGlyph)?;
        face.load_glyph(index, LoadFlag::RENDER)?;
        let metrics = face.size_metrics().ok_or(RasterError::MissingSizeMetrics)?;
        Ok(LineMetrics::new(
            ceil_26_6(i64::from(metrics.height)),
            ceil_26_6(i64::from(metrics.ascender)),
            floor_26_6(i64::from(metrics.descender)),
        )?)
    }
}

/// Copy the active glyph slot out of `face`.
fn copy_slot(face: &Face) -> RenderedGlyph {
    let slot = face.glyph();
    let bitmap = slot.bitmap();
    let width = bitmap.width() as usize;
    let rows = bitmap.rows() as usize;
    let pitch = bitmap.pitch().unsigned_abs() as usize;
    // Space-like glyphs render with no bitmap storage; skip the buffer read.
    let coverage = if width == 0 || rows == 0 {
        Vec::new()
    } else {
        bitmap.buffer()[..rows * pitch].to_vec()
    };
    RenderedGlyph {
        width,
        rows,
        pitch,
        coverage,
        advance_x: i64::from(slot.advance().x),
        left: slot.bitmap_left(),
        top: slot.bitmap_top(),
    }
}

/// Floor a 26.6 fixed-point value to whole pixels.
pub(crate) fn floor_26_6(value: i64) -> i64 {
    value >> 6
}

/// Ceil a 26.6 fixed-point value to whole pixels.
pub(crate) fn ceil_26_6(value: i64) -> i64 {
    (value + 63) >> 6
}
