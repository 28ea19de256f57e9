//! The `convert` subcommand.

use std::fs::write;

use anyhow::{Context, Result};

use inkfont_raster::{ConvertOptions, FontStack, convert};

use crate::cli::ConvertArgs;

pub fn run_convert(args: &ConvertArgs) -> Result<()> {
    let mut stack = FontStack::load(&args.fonts)?;
    let options = ConvertOptions {
        size: args.size,
        bit_depth: args.bit_depth,
        extra_intervals: args.intervals.clone(),
    };

    // Encode fully in memory; a failed run must not leave a partial file.
    let bundle = convert(&mut stack, &options)?;
    let encoded = bundle.encode()?;
    write(&args.output, &encoded)
        .with_context(|| format!("Failed to write bundle: {}", args.output.display()))?;

    println!(
        "Written: {} ({} bytes, {} glyphs, {} intervals, {})",
        args.output.display(),
        encoded.len(),
        bundle.glyphs.len(),
        bundle.intervals.len(),
        bundle.bit_depth,
    );
    Ok(())
}
