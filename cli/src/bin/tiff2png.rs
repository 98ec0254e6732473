//! Float TIFF to 8-bit color PNG conversion.
//!
//! The value-to-gray function is affine; values outside [vMin, vMax] are
//! assumed invalid and written in cyan.

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;

use sv_io::{read_gray_f32, render_gray};

#[derive(Parser)]
#[command(name = "tiff2png", about = "Float TIFF to 8-bit color PNG conversion", version)]
struct Cli {
    /// Input float TIFF
    input: PathBuf,
    /// Value mapped to grayMin
    #[arg(allow_negative_numbers = true)]
    v_min: f32,
    /// Value mapped to grayMax
    #[arg(allow_negative_numbers = true)]
    v_max: f32,
    /// Output PNG
    output: PathBuf,

    /// Gray level for vMin
    #[arg(short = 'm', long = "min", default_value_t = 255)]
    gray_min: i32,
    /// Gray level for vMax
    #[arg(short = 'M', long = "max", default_value_t = 0)]
    gray_max: i32,
}

fn main() -> Result<()> {
    let cli = Cli::try_parse().unwrap_or_else(|e| {
        let _ = e.print();
        process::exit(1);
    });

    if cli.v_max < cli.v_min {
        bail!("vMax ({}) < vMin ({})", cli.v_max, cli.v_min);
    }

    let (values, width, height) = read_gray_f32(&cli.input)
        .with_context(|| format!("unable to read {} as TIFF", cli.input.display()))?;
    let img = render_gray(
        &values,
        width,
        height,
        cli.v_min,
        cli.v_max,
        cli.gray_min,
        cli.gray_max,
    )?;
    img.save(&cli.output)
        .with_context(|| format!("unable to write file {}", cli.output.display()))?;

    Ok(())
}
