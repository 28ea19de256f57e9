//! The `inspect` subcommand.

use std::{fs::read, path::Path};

use anyhow::{Context, Result};

use inkfont_codec::FontBundle;

pub fn run_inspect(path: &Path) -> Result<()> {
    let data =
        read(path).with_context(|| format!("Failed to read bundle: {}", path.display()))?;
    let bundle = FontBundle::decode(&data)?;

    println!("{}: {} bytes, {}", path.display(), data.len(), bundle.bit_depth);
    println!(
        "  line height {} px, ascender {} px, descender {} px",
        bundle.metrics.advance_y, bundle.metrics.ascender, bundle.metrics.descender
    );

    println!("  intervals:");
    for interval in &bundle.intervals {
        println!(
            "    U+{:04X}..U+{:04X}  {} glyphs at offset {}",
            interval.first,
            interval.last,
            interval.count(),
            interval.glyph_offset
        );
    }

    let drawn = bundle.glyphs.iter().filter(|glyph| glyph.data_length > 0).count();
    let widest = bundle.glyphs.iter().map(|glyph| glyph.width).max().unwrap_or(0);
    println!(
        "  {} glyphs ({drawn} with bitmap data, widest {widest} px), {} bitmap bytes",
        bundle.glyphs.len(),
        bundle.bitmap.len()
    );
    Ok(())
}
