//! CLI definitions and command dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use inkfont_codec::BitDepth;
use inkfont_raster::RequestedInterval;

use crate::{convert::run_convert, inspect::run_inspect};

#[derive(Parser)]
#[command(name = "inkfont")]
#[command(about = "Convert outline fonts into packed CPF bundles for e-paper readers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ConvertArgs {
    /// Target pixel size.
    #[arg(short, long)]
    pub size: u32,
    /// Font files in descending priority order.
    #[arg(required = true)]
    pub fonts: Vec<PathBuf>,
    /// Output bundle path.
    #[arg(short, long)]
    pub output: PathBuf,
    /// Packed bitmap depth: 2 (four grey levels) or 1 (black and white).
    #[arg(long, default_value = "2", value_parser = parse_bit_depth)]
    pub bit_depth: BitDepth,
    /// Extra code point interval as `min,max` (decimal or 0x-hex); repeatable.
    #[arg(long = "interval", value_name = "MIN,MAX", value_parser = parse_interval)]
    pub intervals: Vec<RequestedInterval>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rasterize a font stack into a CPF bundle.
    Convert {
        #[command(flatten)]
        args: ConvertArgs,
    },
    /// Print the contents of an existing CPF bundle.
    Inspect {
        /// Bundle to read.
        path: PathBuf,
    },
}

impl Commands {
    pub fn run(self) -> Result<()> {
        match self {
            Commands::Convert { args } => run_convert(&args),
            Commands::Inspect { path } => run_inspect(&path),
        }
    }
}

fn parse_bit_depth(value: &str) -> Result<BitDepth, String> {
    match value {
        "1" => Ok(BitDepth::One),
        "2" => Ok(BitDepth::Two),
        _ => Err(format!("invalid bit depth '{value}', expected 1 or 2")),
    }
}

/// Parse `min,max` with decimal or `0x`-prefixed hexadecimal bounds.
fn parse_interval(value: &str) -> Result<RequestedInterval, String> {
    let (min, max) = value
        .split_once(',')
        .ok_or_else(|| format!("invalid interval '{value}', expected min,max"))?;
    let min = parse_code_point(min.trim())?;
    let max = parse_code_point(max.trim())?;
    if min > max {
        return Err(format!("invalid interval '{value}': min is greater than max"));
    }
    Ok((min, max))
}

fn parse_code_point(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    let code_point = parsed.map_err(|_| format!("invalid code point '{value}'"))?;
    if code_point > 0x0010_FFFF {
        return Err(format!("code point '{value}' is outside the Unicode range"));
    }
    Ok(code_point)
}
