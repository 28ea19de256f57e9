//! Error types for font loading and rasterization.

use std::{path::PathBuf, result};

/// Errors that can occur while resolving, rendering, or assembling glyphs.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("failed to load font {}: {source}", path.display())]
    Face { path: PathBuf, source: freetype::Error },

    #[error("font engine error: {0}")]
    Engine(#[from] freetype::Error),

    #[error("no font in the stack defines the reference glyph '|'")]
    MissingReferenceGlyph,

    #[error("face size metrics unavailable; was the pixel size set?")]
    MissingSizeMetrics,

    #[error("no glyphs found for any requested interval")]
    EmptyCoverage,

    #[error("code point U+{0:04X} was covered but no longer resolves")]
    CoverageDrift(u32),

    #[error(transparent)]
    Codec(#[from] inkfont_codec::CodecError),
}

pub type Result<T> = result::Result<T, RasterError>;
